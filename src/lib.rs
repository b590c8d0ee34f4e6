//! amz-product-api - Typed client and CLI for the Amazon Product Advertising API
//!
//! Signed requests, lazy paginated search, and product, cart and browse
//! node views over the service's XML responses.

pub mod amazon;
pub mod commands;
pub mod config;
pub mod format;

pub use amazon::{
    AmazonApi, ApiError, BrowseNode, Cart, CartItem, Element, ItemSearch, Price, Product,
    ProductAdvertisingClient, ProductSummary, Region, RequestParams, Transport,
};
pub use config::Config;
