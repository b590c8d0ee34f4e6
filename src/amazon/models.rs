//! Value types derived from product, cart and browse-node views.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A price with its ISO currency code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in major units (dollars, euros, ...)
    pub amount: f64,
    /// ISO currency code, when the service reported one
    pub currency: Option<String>,
}

impl Price {
    /// Creates a price from a major-unit amount.
    pub fn new(amount: f64, currency: Option<String>) -> Self {
        Self { amount, currency }
    }

    /// Creates a price from the service's integer minor-unit amount
    /// (`"1249"` means 12.49). Returns `None` for non-numeric amounts.
    pub fn from_minor_units(amount: &str, currency: Option<&str>) -> Option<Self> {
        let minor: f64 = amount.trim().parse().ok()?;
        Some(Self { amount: minor / 100.0, currency: currency.map(str::to_string) })
    }

    /// Currency code or an empty string.
    pub fn currency_code(&self) -> &str {
        self.currency.as_deref().unwrap_or("")
    }
}

/// Customer review availability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reviews {
    pub has_reviews: bool,
    /// URL of the embeddable reviews page
    pub iframe_url: Option<String>,
}

/// A contributor and their role ("Author", "Narrator", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub name: String,
    pub role: String,
}

/// Another edition or format of the same work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternateVersion {
    pub asin: Option<String>,
    pub title: Option<String>,
    pub binding: Option<String>,
}

/// Serializable snapshot of the commonly used product fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSummary {
    pub asin: Option<String>,
    pub title: Option<String>,
    pub brand: Option<String>,
    pub author: Option<String>,
    pub binding: Option<String>,
    pub product_group: Option<String>,
    pub price: Option<Price>,
    pub list_price: Option<Price>,
    pub formatted_price: Option<String>,
    pub availability: Option<String>,
    pub sales_rank: Option<u64>,
    pub publication_date: Option<NaiveDate>,
    pub image_url: Option<String>,
    pub detail_page_url: Option<String>,
    pub offer_url: Option<String>,
}

impl ProductSummary {
    /// Current price amount, if any.
    pub fn current_price(&self) -> Option<f64> {
        self.price.as_ref().map(|p| p.amount)
    }

    /// Discount against the list price, in whole percent.
    pub fn discount_percent(&self) -> Option<u8> {
        let current = self.price.as_ref()?.amount;
        let list = self.list_price.as_ref()?.amount;
        if list <= 0.0 || current >= list {
            return None;
        }
        let discount = ((list - current) / list * 100.0).round() as u8;
        Some(discount.min(99))
    }
}

/// Serializable snapshot of a browse node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowseNodeSummary {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub is_category_root: bool,
    /// Ancestor names, nearest first
    pub ancestors: Vec<String>,
    pub children: Vec<String>,
}

/// Serializable snapshot of one cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemSummary {
    pub cart_item_id: Option<String>,
    pub asin: Option<String>,
    pub title: Option<String>,
    pub quantity: Option<u32>,
    pub price: Option<Price>,
}

/// Serializable snapshot of a cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSummary {
    pub cart_id: Option<String>,
    pub hmac: Option<String>,
    pub purchase_url: Option<String>,
    pub subtotal: Option<Price>,
    pub items: Vec<CartItemSummary>,
}
