//! Item lookup and similarity lookup commands.

use crate::amazon::{AmazonApi, Product, RequestParams};
use crate::config::Config;
use crate::format::Formatter;
use anyhow::{bail, Context, Result};
use tracing::{info, warn};

/// The service accepts at most this many ids per `ItemLookup`.
const MAX_IDS_PER_REQUEST: usize = 10;

/// Looks up products by ASIN (or another id type).
pub struct LookupCommand {
    config: Config,
}

impl LookupCommand {
    /// Creates a new lookup command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Looks up the given ids and returns formatted output.
    pub async fn execute(&self, ids: &[String], id_type: Option<&str>) -> Result<String> {
        let api = AmazonApi::from_config(&self.config).context("Failed to create API client")?;
        self.execute_with_api(&api, ids, id_type).await
    }

    /// Looks up ids with a provided API (for testing).
    pub async fn execute_with_api(
        &self,
        api: &AmazonApi,
        ids: &[String],
        id_type: Option<&str>,
    ) -> Result<String> {
        let ids = normalize_ids(ids, id_type)?;
        let mut products: Vec<Product> = Vec::new();

        for chunk in ids.chunks(MAX_IDS_PER_REQUEST) {
            let params = self.params(chunk, id_type);
            let found = api.lookup_bulk(params).await?;
            if found.len() < chunk.len() {
                warn!("{} of {} id(s) not found", chunk.len() - found.len(), chunk.len());
            }
            products.extend(found);
        }

        if products.is_empty() {
            bail!("ASIN(s) not found: '{}'", ids.join(","));
        }

        info!("Found {} product(s)", products.len());
        let formatter = Formatter::new(self.config.format);
        Ok(if products.len() == 1 {
            formatter.format_product(&products[0])
        } else {
            formatter.format_products(&products)
        })
    }

    /// Finds products similar to all of the given ASINs.
    pub async fn execute_similar(&self, ids: &[String]) -> Result<String> {
        let api = AmazonApi::from_config(&self.config).context("Failed to create API client")?;
        self.execute_similar_with_api(&api, ids).await
    }

    /// Similarity lookup with a provided API (for testing).
    pub async fn execute_similar_with_api(&self, api: &AmazonApi, ids: &[String]) -> Result<String> {
        let ids = normalize_ids(ids, None)?;
        let params = self.params(&ids, None);
        let products = api.similarity_lookup(params).await?;

        info!("Found {} similar product(s)", products.len());
        Ok(Formatter::new(self.config.format).format_products(&products))
    }

    fn params(&self, ids: &[String], id_type: Option<&str>) -> RequestParams {
        let mut params = RequestParams::new()
            .with("ItemId", ids.join(","))
            .with("ResponseGroup", &self.config.response_group);
        if let Some(id_type) = id_type {
            params.set("IdType", id_type);
            // Non-ASIN id types need a search index
            if !id_type.eq_ignore_ascii_case("ASIN") {
                params.set("SearchIndex", "All");
            }
        }
        params
    }
}

/// Splits comma separated ids. ASINs (the default id type) are upper-cased
/// and must be alphanumeric; other id types such as SKU pass through as given.
fn normalize_ids(ids: &[String], id_type: Option<&str>) -> Result<Vec<String>> {
    let is_asin = id_type.map_or(true, |t| t.eq_ignore_ascii_case("ASIN"));
    let ids: Vec<String> = ids
        .iter()
        .flat_map(|id| id.split(','))
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| if is_asin { id.to_uppercase() } else { id.to_string() })
        .collect();

    if ids.is_empty() {
        bail!("At least one item id is required");
    }
    if is_asin {
        if let Some(bad) = ids.iter().find(|id| !id.chars().all(|c| c.is_ascii_alphanumeric())) {
            bail!("Invalid item id: '{}'. ASINs should be alphanumeric.", bad);
        }
    }
    Ok(ids)
}
