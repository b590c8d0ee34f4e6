//! Browse node lookup command.

use crate::amazon::{AmazonApi, RequestParams};
use crate::config::Config;
use crate::format::Formatter;
use anyhow::{bail, Context, Result};
use tracing::info;

pub struct BrowseCommand {
    config: Config,
}

impl BrowseCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn execute(&self, node_ids: &[u64]) -> Result<String> {
        let api = AmazonApi::from_config(&self.config).context("Failed to create API client")?;
        self.execute_with_api(&api, node_ids).await
    }

    /// Looks up nodes with a provided API (for testing).
    pub async fn execute_with_api(&self, api: &AmazonApi, node_ids: &[u64]) -> Result<String> {
        if node_ids.is_empty() {
            bail!("At least one browse node id is required");
        }

        let ids: Vec<String> = node_ids.iter().map(u64::to_string).collect();
        let params = RequestParams::new().with("BrowseNodeId", ids.join(","));
        let nodes = api.browse_node_lookup(params).await?;

        info!("Found {} browse node(s)", nodes.len());
        Ok(Formatter::new(self.config.format).format_browse_nodes(&nodes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amazon::api::tests::{api_with, MockTransport};
    use crate::config::OutputFormat;

    const NODES: &str = "<BrowseNodeLookupResponse><BrowseNodes><Request><IsValid>True</IsValid></Request>\
        <BrowseNode><BrowseNodeId>2642129011</BrowseNodeId><Name>eBook Readers</Name>\
        <Ancestors><BrowseNode><BrowseNodeId>1268192011</BrowseNodeId><Name>Kindle E-readers</Name></BrowseNode></Ancestors>\
        </BrowseNode></BrowseNodes></BrowseNodeLookupResponse>";

    #[tokio::test]
    async fn test_browse_table() {
        let transport = MockTransport::new(vec![NODES]);
        let api = api_with(transport.clone());
        let cmd = BrowseCommand::new(Config::default());

        let output = cmd.execute_with_api(&api, &[2642129011]).await.unwrap();
        assert!(output.contains("eBook Readers [2642129011]"));
        assert!(output.contains("Kindle E-readers > eBook Readers"));
        assert_eq!(transport.request(0).1.get("BrowseNodeId"), Some("2642129011"));
    }

    #[tokio::test]
    async fn test_browse_json_multiple_ids() {
        let transport = MockTransport::new(vec![NODES]);
        let api = api_with(transport.clone());
        let cmd = BrowseCommand::new(Config { format: OutputFormat::Json, ..Config::default() });

        let output = cmd.execute_with_api(&api, &[2642129011, 1036682]).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["name"], "eBook Readers");
        assert_eq!(transport.request(0).1.get("BrowseNodeId"), Some("2642129011,1036682"));
    }

    #[tokio::test]
    async fn test_browse_requires_ids() {
        let api = api_with(MockTransport::new(vec![]));
        assert!(BrowseCommand::new(Config::default()).execute_with_api(&api, &[]).await.is_err());
    }
}
