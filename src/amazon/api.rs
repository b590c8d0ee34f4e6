//! High-level operations over a [`Transport`].

use crate::amazon::browse_node::BrowseNode;
use crate::amazon::cart::Cart;
use crate::amazon::client::{ProductAdvertisingClient, RequestParams, Transport};
use crate::amazon::error::{ApiError, Result, CART_INFO_MISMATCH};
use crate::amazon::product::Product;
use crate::amazon::regions::Region;
use crate::amazon::response;
use crate::amazon::search::ItemSearch;
use crate::amazon::xml::Element;
use crate::config::Config;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Response group used for item operations unless the caller sets one.
pub const DEFAULT_RESPONSE_GROUP: &str = "Large";

/// Response group used for browse node lookups unless the caller sets one.
pub const BROWSE_NODE_RESPONSE_GROUP: &str = "BrowseNodeInfo";

/// The service accepts at most this many items per cart call.
pub const MAX_CART_ITEMS: usize = 10;

/// A line to add to a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartAddItem {
    pub offer_id: String,
    pub quantity: u32,
}

impl CartAddItem {
    pub fn new(offer_id: impl Into<String>, quantity: u32) -> Self {
        Self { offer_id: offer_id.into(), quantity }
    }
}

/// A quantity change for an existing cart line. Quantity 0 removes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartModifyItem {
    pub cart_item_id: String,
    pub quantity: u32,
}

impl CartModifyItem {
    pub fn new(cart_item_id: impl Into<String>, quantity: u32) -> Self {
        Self { cart_item_id: cart_item_id.into(), quantity }
    }
}

/// Entry point for catalog lookups, searches and cart operations.
#[derive(Clone)]
pub struct AmazonApi {
    transport: Arc<dyn Transport>,
    associate_tag: Arc<str>,
    region: Region,
}

impl fmt::Debug for AmazonApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmazonApi")
            .field("associate_tag", &self.associate_tag)
            .field("region", &self.region)
            .finish()
    }
}

impl AmazonApi {
    /// Creates an API over any transport.
    pub fn new(transport: Arc<dyn Transport>, associate_tag: &str, region: Region) -> Self {
        Self { transport, associate_tag: Arc::from(associate_tag), region }
    }

    /// Creates an API backed by a signed HTTP client built from `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = ProductAdvertisingClient::new(config)?;
        Ok(Self::with_client(client))
    }

    /// Creates an API backed by an already configured client.
    pub fn with_client(client: ProductAdvertisingClient) -> Self {
        let tag = client.associate_tag().to_string();
        let region = client.region();
        Self::new(Arc::new(client), &tag, region)
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn associate_tag(&self) -> &str {
        &self.associate_tag
    }

    /// Issues one operation and parses the payload.
    pub(crate) async fn call(&self, operation: &str, params: &RequestParams) -> Result<Element> {
        let body = self.transport.call(operation, params).await?;
        response::parse(&body)
    }

    /// Wraps every `Item` child of an `Items` section.
    pub(crate) fn products(&self, items: &Element) -> Vec<Product> {
        items.children_named("Item").map(|item| Product::new(item.clone(), self.clone())).collect()
    }

    /// Looks up one or more items (`ItemId` may be comma separated).
    ///
    /// Fails with [`ApiError::AsinNotFound`] when the service returns no item.
    pub async fn lookup(&self, params: RequestParams) -> Result<Vec<Product>> {
        let item_id = params.get("ItemId").unwrap_or_default().to_string();
        let products = self.item_lookup(params).await?;
        if products.is_empty() {
            return Err(ApiError::AsinNotFound(item_id));
        }
        Ok(products)
    }

    /// Looks up a single item and returns the first result.
    pub async fn lookup_one(&self, params: RequestParams) -> Result<Product> {
        let item_id = params.get("ItemId").unwrap_or_default().to_string();
        self.lookup(params)
            .await?
            .into_iter()
            .next()
            .ok_or(ApiError::AsinNotFound(item_id))
    }

    /// Looks up items, returning an empty list when none match.
    pub async fn lookup_bulk(&self, params: RequestParams) -> Result<Vec<Product>> {
        self.item_lookup(params).await
    }

    async fn item_lookup(&self, mut params: RequestParams) -> Result<Vec<Product>> {
        params.set_default("ResponseGroup", DEFAULT_RESPONSE_GROUP);
        info!("Looking up item(s): {}", params.get("ItemId").unwrap_or_default());

        let root = self.call("ItemLookup", &params).await?;
        if let Some(err) = response::request_error(&root, "Items") {
            return Err(ApiError::Lookup { code: err.code, message: err.message });
        }

        let products = self.products(response::section(&root, "Items")?);
        debug!("Lookup returned {} item(s)", products.len());
        Ok(products)
    }

    /// Returns up to ten products similar to all of the given items.
    pub async fn similarity_lookup(&self, mut params: RequestParams) -> Result<Vec<Product>> {
        params.set_default("ResponseGroup", DEFAULT_RESPONSE_GROUP);
        info!("Similarity lookup for: {}", params.get("ItemId").unwrap_or_default());

        let root = self.call("SimilarityLookup", &params).await?;
        if let Some(err) = response::request_error(&root, "Items") {
            return Err(ApiError::SimilarityLookup { code: err.code, message: err.message });
        }

        Ok(root.child("Items").map(|items| self.products(items)).unwrap_or_default())
    }

    /// Starts a lazy, paginated search. No request is sent until the first
    /// call to [`ItemSearch::next`].
    pub fn search(&self, params: RequestParams) -> ItemSearch {
        ItemSearch::new(self.clone(), params)
    }

    /// Searches and returns at most the first `n` results.
    pub async fn search_n(&self, n: usize, params: RequestParams) -> Result<Vec<Product>> {
        self.search(params).take(n).await
    }

    /// Looks up browse nodes (`BrowseNodeId` may be comma separated).
    pub async fn browse_node_lookup(&self, mut params: RequestParams) -> Result<Vec<BrowseNode>> {
        params.set_default("ResponseGroup", BROWSE_NODE_RESPONSE_GROUP);
        info!("Browse node lookup: {}", params.get("BrowseNodeId").unwrap_or_default());

        let root = self.call("BrowseNodeLookup", &params).await?;
        if let Some(err) = response::request_error(&root, "BrowseNodes") {
            return Err(ApiError::BrowseNodeLookup { code: err.code, message: err.message });
        }

        let nodes = response::section(&root, "BrowseNodes")?;
        Ok(nodes.children_named("BrowseNode").cloned().map(BrowseNode::new).collect())
    }

    /// Creates a remote cart holding the given offers.
    pub async fn cart_create(&self, items: &[CartAddItem]) -> Result<Cart> {
        let params = offer_params(items)?;
        self.cart_call("CartCreate", params).await
    }

    /// Adds offers to an existing cart.
    pub async fn cart_add(&self, items: &[CartAddItem], cart_id: &str, hmac: &str) -> Result<Cart> {
        let mut params = offer_params(items)?;
        set_cart_auth(&mut params, "CartAdd", cart_id, hmac)?;
        self.cart_call("CartAdd", params).await
    }

    /// Changes quantities of existing cart lines.
    pub async fn cart_modify(
        &self,
        items: &[CartModifyItem],
        cart_id: &str,
        hmac: &str,
    ) -> Result<Cart> {
        check_item_count(items.len())?;
        let mut params = RequestParams::new();
        for (i, item) in items.iter().enumerate() {
            params.set(format!("Item.{}.CartItemId", i + 1), &item.cart_item_id);
            params.set(format!("Item.{}.Quantity", i + 1), item.quantity);
        }
        set_cart_auth(&mut params, "CartModify", cart_id, hmac)?;
        self.cart_call("CartModify", params).await
    }

    /// Removes every line from a cart.
    pub async fn cart_clear(&self, cart_id: &str, hmac: &str) -> Result<Cart> {
        let mut params = RequestParams::new();
        set_cart_auth(&mut params, "CartClear", cart_id, hmac)?;
        self.cart_call("CartClear", params).await
    }

    /// Fetches the current state of a cart.
    pub async fn cart_get(&self, cart_id: &str, hmac: &str) -> Result<Cart> {
        let mut params = RequestParams::new();
        set_cart_auth(&mut params, "CartGet", cart_id, hmac)?;
        self.cart_call("CartGet", params).await
    }

    async fn cart_call(&self, operation: &str, params: RequestParams) -> Result<Cart> {
        info!("{} ({} parameters)", operation, params.len());

        let root = self.call(operation, &params).await?;
        if let Some(err) = response::cart_error(&root) {
            if err.code == CART_INFO_MISMATCH {
                return Err(ApiError::CartInfoMismatch(format!("{} failed: {}", operation, err.code)));
            }
            return Err(ApiError::Cart(format!(
                "{} failed: {}: {}",
                operation, err.code, err.message
            )));
        }

        response::section(&root, "Cart")?;
        Ok(Cart::new(root))
    }
}

fn check_item_count(count: usize) -> Result<()> {
    if count == 0 {
        return Err(ApiError::Cart("at least one item is required".to_string()));
    }
    if count > MAX_CART_ITEMS {
        return Err(ApiError::Cart(format!(
            "You can't add more than {} items at once",
            MAX_CART_ITEMS
        )));
    }
    Ok(())
}

fn offer_params(items: &[CartAddItem]) -> Result<RequestParams> {
    check_item_count(items.len())?;
    let mut params = RequestParams::new();
    for (i, item) in items.iter().enumerate() {
        params.set(format!("Item.{}.OfferListingId", i + 1), &item.offer_id);
        params.set(format!("Item.{}.Quantity", i + 1), item.quantity);
    }
    Ok(params)
}

fn set_cart_auth(params: &mut RequestParams, operation: &str, cart_id: &str, hmac: &str) -> Result<()> {
    if cart_id.trim().is_empty() || hmac.trim().is_empty() {
        return Err(ApiError::Cart(format!("CartId and HMAC are required for {} call", operation)));
    }
    params.set("CartId", cart_id);
    params.set("HMAC", hmac);
    Ok(())
}
