//! Search command implementation.

use crate::amazon::{AmazonApi, RequestParams};
use crate::config::Config;
use crate::format::Formatter;
use anyhow::{bail, Context, Result};
use tracing::info;

/// Executes a keyword search.
pub struct SearchCommand {
    config: Config,
}

impl SearchCommand {
    /// Creates a new search command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the search and returns formatted output.
    pub async fn execute(&self, keywords: &str, search_index: &str) -> Result<String> {
        let api = AmazonApi::from_config(&self.config).context("Failed to create API client")?;
        self.execute_with_api(&api, keywords, search_index).await
    }

    /// Executes the search with a provided API (for testing).
    pub async fn execute_with_api(
        &self,
        api: &AmazonApi,
        keywords: &str,
        search_index: &str,
    ) -> Result<String> {
        let keywords = keywords.trim();
        if keywords.is_empty() {
            bail!("Search keywords must not be empty");
        }

        info!("Searching {} for: {}", search_index, keywords);

        let params = RequestParams::new()
            .with("Keywords", keywords)
            .with("SearchIndex", search_index)
            .with("ResponseGroup", &self.config.response_group);

        let mut search = api.search(params);
        let products = search.take(self.config.max_results).await?;

        info!(
            "Found {} products after {} page(s)",
            products.len(),
            search.current_page().saturating_sub(1)
        );

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_products(&products))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amazon::api::tests::{api_with, MockTransport};
    use crate::config::OutputFormat;

    fn page(asins: &[&str], total_pages: u32) -> String {
        let items: String = asins
            .iter()
            .map(|a| format!("<Item><ASIN>{a}</ASIN><ItemAttributes><Title>Book {a}</Title></ItemAttributes></Item>"))
            .collect();
        format!(
            "<ItemSearchResponse><Items><Request><IsValid>True</IsValid></Request>\
             <TotalPages>{total_pages}</TotalPages>{items}</Items></ItemSearchResponse>"
        )
    }

    fn command(max_results: usize) -> SearchCommand {
        SearchCommand::new(Config { max_results, format: OutputFormat::Table, ..Config::default() })
    }

    #[tokio::test]
    async fn test_search_stops_at_max_results() {
        let p1 = page(&["A000000001", "A000000002"], 3);
        let p2 = page(&["A000000003", "A000000004"], 3);
        let transport = MockTransport::new(vec![p1.as_str(), p2.as_str()]);
        let api = api_with(transport.clone());

        let output = command(3).execute_with_api(&api, "rust", "Books").await.unwrap();
        assert!(output.contains("A000000003"));
        assert!(!output.contains("A000000004"));
        assert!(output.contains("Total: 3 products"));
        assert_eq!(transport.call_count(), 2);

        let (operation, params) = transport.request(1);
        assert_eq!(operation, "ItemSearch");
        assert_eq!(params.get("Keywords"), Some("rust"));
        assert_eq!(params.get("SearchIndex"), Some("Books"));
        assert_eq!(params.get("ItemPage"), Some("2"));
    }

    #[tokio::test]
    async fn test_search_fewer_results_than_max() {
        let p1 = page(&["A000000001"], 1);
        let transport = MockTransport::new(vec![p1.as_str()]);
        let api = api_with(transport.clone());

        let output = command(10).execute_with_api(&api, "rust", "All").await.unwrap();
        assert!(output.contains("Total: 1 products"));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_search_error() {
        let bad = "<ItemSearchResponse><Items><Request><IsValid>False</IsValid><Errors><Error>\
            <Code>AWS.InvalidEnumeratedParameter</Code><Message>bad index</Message></Error>\
            </Errors></Request></Items></ItemSearchResponse>";
        let api = api_with(MockTransport::new(vec![bad]));

        let err = command(5).execute_with_api(&api, "rust", "Nope").await.unwrap_err();
        assert!(err.to_string().contains("AWS.InvalidEnumeratedParameter"));
    }

    #[tokio::test]
    async fn test_empty_keywords() {
        let transport = MockTransport::new(vec![]);
        let api = api_with(transport.clone());
        assert!(command(5).execute_with_api(&api, "  ", "All").await.is_err());
        assert_eq!(transport.call_count(), 0);
    }
}
