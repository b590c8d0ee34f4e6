//! Product Advertising API client, response views and data models.

pub mod api;
pub mod browse_node;
pub mod cart;
pub mod client;
pub mod error;
pub mod models;
pub mod product;
pub mod regions;
pub mod response;
pub mod search;
pub mod xml;

pub use api::{AmazonApi, CartAddItem, CartModifyItem};
pub use browse_node::BrowseNode;
pub use cart::{Cart, CartItem};
pub use client::{ProductAdvertisingClient, RequestParams, Transport};
pub use error::{ApiError, Result};
pub use models::{Price, ProductSummary};
pub use product::Product;
pub use regions::Region;
pub use search::ItemSearch;
pub use xml::Element;
