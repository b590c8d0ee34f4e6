//! Remote cart commands.

use crate::amazon::{AmazonApi, CartAddItem, CartModifyItem};
use crate::config::Config;
use crate::format::Formatter;
use anyhow::{anyhow, Context, Result};
use tracing::info;

/// A cart operation with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    Create { items: Vec<CartAddItem> },
    Add { cart_id: String, hmac: String, items: Vec<CartAddItem> },
    Modify { cart_id: String, hmac: String, items: Vec<CartModifyItem> },
    Clear { cart_id: String, hmac: String },
    Get { cart_id: String, hmac: String },
}

pub struct CartCommand {
    config: Config,
}

impl CartCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn execute(&self, action: CartAction) -> Result<String> {
        let api = AmazonApi::from_config(&self.config).context("Failed to create API client")?;
        self.execute_with_api(&api, action).await
    }

    /// Runs a cart action with a provided API (for testing).
    pub async fn execute_with_api(&self, api: &AmazonApi, action: CartAction) -> Result<String> {
        let cart = match action {
            CartAction::Create { items } => api.cart_create(&items).await?,
            CartAction::Add { cart_id, hmac, items } => api.cart_add(&items, &cart_id, &hmac).await?,
            CartAction::Modify { cart_id, hmac, items } => {
                api.cart_modify(&items, &cart_id, &hmac).await?
            }
            CartAction::Clear { cart_id, hmac } => api.cart_clear(&cart_id, &hmac).await?,
            CartAction::Get { cart_id, hmac } => api.cart_get(&cart_id, &hmac).await?,
        };

        info!("Cart {} has {} line(s)", cart.cart_id().unwrap_or("?"), cart.len());
        Ok(Formatter::new(self.config.format).format_cart(&cart))
    }
}

/// Parses `ID` or `ID:QTY` (quantity defaults to 1).
fn split_item(arg: &str) -> Result<(String, u32)> {
    let (id, quantity) = match arg.rsplit_once(':') {
        Some((id, qty)) => {
            let qty = qty.trim().parse().map_err(|_| anyhow!("Invalid quantity in '{}'", arg))?;
            (id, qty)
        }
        None => (arg, 1),
    };
    let id = id.trim();
    if id.is_empty() {
        return Err(anyhow!("Missing id in '{}'", arg));
    }
    Ok((id.to_string(), quantity))
}

/// Parses `OFFER_ID[:QTY]` arguments for create and add.
pub fn parse_add_items(args: &[String]) -> Result<Vec<CartAddItem>> {
    args
        .iter()
        .map(|arg| split_item(arg).map(|(id, qty)| CartAddItem::new(id, qty)))
        .collect()
}

/// Parses `CART_ITEM_ID:QTY` arguments for modify.
pub fn parse_modify_items(args: &[String]) -> Result<Vec<CartModifyItem>> {
    args
        .iter()
        .map(|arg| {
            if !arg.contains(':') {
                return Err(anyhow!("Expected CART_ITEM_ID:QTY, got '{}'", arg));
            }
            split_item(arg).map(|(id, qty)| CartModifyItem::new(id, qty))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amazon::api::tests::{api_with, MockTransport};
    use crate::amazon::ApiError;

    const CART: &str = include_str!("../../tests/fixtures/cart.xml");

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_add_items() {
        let items = parse_add_items(&args(&["offerA", "offerB:3"])).unwrap();
        assert_eq!(items, vec![CartAddItem::new("offerA", 1), CartAddItem::new("offerB", 3)]);

        assert!(parse_add_items(&args(&["offer:many"])).is_err());
        assert!(parse_add_items(&args(&[":2"])).is_err());
    }

    #[test]
    fn test_parse_modify_items() {
        let items = parse_modify_items(&args(&["U1RZPSF6YBEYHA:0"])).unwrap();
        assert_eq!(items, vec![CartModifyItem::new("U1RZPSF6YBEYHA", 0)]);
        assert!(parse_modify_items(&args(&["U1RZPSF6YBEYHA"])).is_err());
    }

    #[tokio::test]
    async fn test_create_formats_cart() {
        let transport = MockTransport::new(vec![CART]);
        let api = api_with(transport.clone());
        let cmd = CartCommand::new(Config::default());

        let items = parse_add_items(&args(&["offer-listing-1:2"])).unwrap();
        let output = cmd.execute_with_api(&api, CartAction::Create { items }).await.unwrap();
        assert!(output.contains("186-4328921-0113561"));
        assert!(output.contains("Subtotal: USD 37.97"));
        assert_eq!(transport.request(0).0, "CartCreate");
    }

    #[tokio::test]
    async fn test_get_with_wrong_hmac() {
        let mismatch = "<CartGetResponse><Cart><Request><IsValid>True</IsValid><Errors><Error>\
            <Code>AWS.ECommerceService.CartInfoMismatch</Code><Message>mismatch</Message>\
            </Error></Errors></Request></Cart></CartGetResponse>";
        let api = api_with(MockTransport::new(vec![mismatch]));
        let cmd = CartCommand::new(Config::default());

        let err = cmd
            .execute_with_api(
                &api,
                CartAction::Get { cart_id: "186-4328921-0113561".into(), hmac: "wrong".into() },
            )
            .await
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::CartInfoMismatch(_))));
    }
}
