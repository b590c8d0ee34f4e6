//! Error types for Product Advertising API operations.
//!
//! Variants are grouped by the operation that raised them so callers can
//! tell a failed lookup from a failed search or cart call.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Error code the service returns when `ItemPage` is past the last page.
pub const PARAMETER_OUT_OF_RANGE: &str = "AWS.ParameterOutOfRange";

/// Error code for a cart id / HMAC / associate tag mismatch.
pub const CART_INFO_MISMATCH: &str = "AWS.ECommerceService.CartInfoMismatch";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Amazon Product Lookup Error: '{code}', '{message}'")]
    Lookup { code: String, message: String },

    #[error("ASIN(s) not found: '{0}'")]
    AsinNotFound(String),

    #[error("Amazon Search Error: '{code}', '{message}'")]
    Search { code: String, message: String },

    #[error("Amazon Similarity Lookup Error: '{code}', '{message}'")]
    SimilarityLookup { code: String, message: String },

    #[error("Amazon BrowseNode Lookup Error: '{code}', '{message}'")]
    BrowseNodeLookup { code: String, message: String },

    #[error("Cart operation failed: {0}")]
    Cart(String),

    #[error(
        "Cart info mismatch: {0}. Make sure AssociateTag, CartId and HMAC are correct \
         (use HMAC, not URLEncodedHMAC)"
    )]
    CartInfoMismatch(String),

    #[error("Invalid element path: '{0}'")]
    InvalidPath(String),

    #[error("Invalid date '{value}' at '{path}'")]
    InvalidDate { path: String, value: String },

    #[error("XML parse error: {0}")]
    Xml(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

impl ApiError {
    /// Returns the service error code, if this error carries one.
    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Lookup { code, .. }
            | ApiError::Search { code, .. }
            | ApiError::SimilarityLookup { code, .. }
            | ApiError::BrowseNodeLookup { code, .. } => Some(code),
            ApiError::CartInfoMismatch(_) => Some(CART_INFO_MISMATCH),
            _ => None,
        }
    }
}
