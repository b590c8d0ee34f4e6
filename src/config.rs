//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::amazon::client::Credentials;
use crate::amazon::regions::Region;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// AWS access key id
    #[serde(default)]
    pub access_key: Option<String>,

    /// AWS secret key, used only for signing
    #[serde(default)]
    pub secret_key: Option<String>,

    /// Associate tag appended to every request and offer URL
    #[serde(default)]
    pub associate_tag: Option<String>,

    /// API locale
    #[serde(default)]
    pub region: Region,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Request rate limit; unset means unthrottled
    #[serde(default)]
    pub max_qps: Option<f64>,

    /// HTTP timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Response group for item operations
    #[serde(default = "default_response_group")]
    pub response_group: String,

    /// Maximum number of search results to print
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_response_group() -> String {
    "Large".to_string()
}

fn default_max_results() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            access_key: None,
            secret_key: None,
            associate_tag: None,
            region: Region::Us,
            proxy: None,
            max_qps: None,
            timeout_secs: default_timeout_secs(),
            response_group: default_response_group(),
            max_results: default_max_results(),
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("amz-product-api").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides. Unparseable values are ignored.
    pub fn with_env(mut self) -> Self {
        if let Ok(key) = std::env::var("AMZ_ACCESS_KEY") {
            self.access_key = Some(key);
        }

        if let Ok(secret) = std::env::var("AMZ_SECRET_KEY") {
            self.secret_key = Some(secret);
        }

        if let Ok(tag) = std::env::var("AMZ_ASSOCIATE_TAG") {
            self.associate_tag = Some(tag);
        }

        if let Ok(region) = std::env::var("AMZ_REGION") {
            if let Ok(r) = region.parse() {
                self.region = r;
            }
        }

        if let Ok(proxy) = std::env::var("AMZ_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(qps) = std::env::var("AMZ_MAX_QPS") {
            if let Ok(q) = qps.parse() {
                self.max_qps = Some(q);
            }
        }

        self
    }

    /// Returns the signing credentials, failing when any part is missing.
    pub fn credentials(&self) -> Result<Credentials> {
        fn required(value: &Option<String>) -> Option<String> {
            value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
        }

        let Some(access_key) = required(&self.access_key) else {
            bail!("Missing access key: set access_key in config.toml or AMZ_ACCESS_KEY");
        };
        let Some(secret_key) = required(&self.secret_key) else {
            bail!("Missing secret key: set secret_key in config.toml or AMZ_SECRET_KEY");
        };
        let Some(associate_tag) = required(&self.associate_tag) else {
            bail!("Missing associate tag: set associate_tag in config.toml or AMZ_ASSOCIATE_TAG");
        };

        Ok(Credentials { access_key, secret_key, associate_tag })
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
    Xml,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            "xml" => Ok(OutputFormat::Xml),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv, xml", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Xml => write!(f, "xml"),
        }
    }
}
