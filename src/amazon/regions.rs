//! Product Advertising API locales and their endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported API locales with their retail domains, endpoints and currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    Us,
    Uk,
    De,
    Fr,
    Es,
    It,
    Ca,
    Jp,
    In,
    Br,
    Mx,
    Cn,
}

impl Region {
    /// Returns the retail domain for this region.
    pub fn domain(&self) -> &'static str {
        match self {
            Region::Us => "amazon.com",
            Region::Uk => "amazon.co.uk",
            Region::De => "amazon.de",
            Region::Fr => "amazon.fr",
            Region::Es => "amazon.es",
            Region::It => "amazon.it",
            Region::Ca => "amazon.ca",
            Region::Jp => "amazon.co.jp",
            Region::In => "amazon.in",
            Region::Br => "amazon.com.br",
            Region::Mx => "amazon.com.mx",
            Region::Cn => "amazon.cn",
        }
    }

    /// Returns the web service host used for signed requests.
    pub fn endpoint_host(&self) -> String {
        format!("webservices.{}", self.domain())
    }

    /// Returns the web service base URL.
    pub fn endpoint_url(&self) -> String {
        format!("https://{}", self.endpoint_host())
    }

    /// Returns the product page prefix used for associate links.
    pub fn product_base_url(&self) -> String {
        format!("https://www.{}/dp/", self.domain())
    }

    /// Returns the currency code for this region.
    pub fn currency(&self) -> &'static str {
        match self {
            Region::Us => "USD",
            Region::Uk => "GBP",
            Region::De | Region::Fr | Region::Es | Region::It => "EUR",
            Region::Ca => "CAD",
            Region::Jp => "JPY",
            Region::In => "INR",
            Region::Br => "BRL",
            Region::Mx => "MXN",
            Region::Cn => "CNY",
        }
    }

    /// Returns all supported regions.
    pub fn all() -> &'static [Region] {
        &[
            Region::Us,
            Region::Uk,
            Region::De,
            Region::Fr,
            Region::Es,
            Region::It,
            Region::Ca,
            Region::Jp,
            Region::In,
            Region::Br,
            Region::Mx,
            Region::Cn,
        ]
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Region::Us => "us",
            Region::Uk => "uk",
            Region::De => "de",
            Region::Fr => "fr",
            Region::Es => "es",
            Region::It => "it",
            Region::Ca => "ca",
            Region::Jp => "jp",
            Region::In => "in",
            Region::Br => "br",
            Region::Mx => "mx",
            Region::Cn => "cn",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for Region {
    type Err = RegionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "us" | "usa" | "united states" => Ok(Region::Us),
            "uk" | "gb" | "united kingdom" => Ok(Region::Uk),
            "de" | "germany" => Ok(Region::De),
            "fr" | "france" => Ok(Region::Fr),
            "es" | "spain" => Ok(Region::Es),
            "it" | "italy" => Ok(Region::It),
            "ca" | "canada" => Ok(Region::Ca),
            "jp" | "japan" => Ok(Region::Jp),
            "in" | "india" => Ok(Region::In),
            "br" | "brazil" => Ok(Region::Br),
            "mx" | "mexico" => Ok(Region::Mx),
            "cn" | "china" => Ok(Region::Cn),
            _ => Err(RegionParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegionParseError(String);

impl fmt::Display for RegionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown region '{}'. Valid regions: us, uk, de, fr, es, it, ca, jp, in, br, mx, cn",
            self.0
        )
    }
}

impl std::error::Error for RegionParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_parsing() {
        assert_eq!(Region::from_str("us").unwrap(), Region::Us);
        assert_eq!(Region::from_str("US").unwrap(), Region::Us);
        assert_eq!(Region::from_str("united states").unwrap(), Region::Us);
        assert_eq!(Region::from_str("gb").unwrap(), Region::Uk);
        assert_eq!(Region::from_str("UK").unwrap(), Region::Uk);
        assert_eq!(Region::from_str("Germany").unwrap(), Region::De);
        assert_eq!(Region::from_str(" jp ").unwrap(), Region::Jp);
        assert_eq!(Region::from_str("china").unwrap(), Region::Cn);

        let err = Region::from_str("atlantis").unwrap_err();
        assert!(err.to_string().contains("Unknown region 'atlantis'"));
        assert!(Region::from_str("").is_err());
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(Region::Us.endpoint_host(), "webservices.amazon.com");
        assert_eq!(Region::Uk.endpoint_url(), "https://webservices.amazon.co.uk");
        assert_eq!(Region::Jp.endpoint_host(), "webservices.amazon.co.jp");
    }

    #[test]
    fn test_product_base_url() {
        assert_eq!(Region::Us.product_base_url(), "https://www.amazon.com/dp/");
        assert_eq!(Region::Br.product_base_url(), "https://www.amazon.com.br/dp/");
    }

    #[test]
    fn test_currencies() {
        assert_eq!(Region::Us.currency(), "USD");
        assert_eq!(Region::Uk.currency(), "GBP");
        assert_eq!(Region::It.currency(), "EUR");
        assert_eq!(Region::Cn.currency(), "CNY");
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for region in Region::all() {
            assert_eq!(Region::from_str(&region.to_string()).unwrap(), *region);
        }
        assert_eq!(Region::all().len(), 12);
    }

    #[test]
    fn test_region_default() {
        assert_eq!(Region::default(), Region::Us);
    }
}
