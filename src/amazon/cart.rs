//! Remote shopping cart views.

use crate::amazon::models::{CartItemSummary, CartSummary, Price};
use crate::amazon::xml::Element;

/// A cart as returned by any cart operation.
///
/// Wraps the whole response document; all paths start at `Cart`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    root: Element,
}

impl Cart {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    pub fn element(&self) -> &Element {
        &self.root
    }

    fn text(&self, path: &str) -> Option<&str> {
        self.root.find_text(&format!("Cart.{}", path))
    }

    pub fn cart_id(&self) -> Option<&str> {
        self.text("CartId")
    }

    pub fn purchase_url(&self) -> Option<&str> {
        self.text("PurchaseURL")
    }

    /// HMAC to pass back on later calls.
    pub fn hmac(&self) -> Option<&str> {
        self.text("HMAC")
    }

    /// URL-encoded HMAC, for building links only.
    pub fn url_encoded_hmac(&self) -> Option<&str> {
        self.text("URLEncodedHMAC")
    }

    pub fn amount(&self) -> Option<&str> {
        self.text("SubTotal.Amount")
    }

    pub fn formatted_price(&self) -> Option<&str> {
        self.text("SubTotal.FormattedPrice")
    }

    pub fn currency_code(&self) -> Option<&str> {
        self.text("SubTotal.CurrencyCode")
    }

    pub fn subtotal(&self) -> Option<Price> {
        Price::from_minor_units(self.amount()?, self.currency_code())
    }

    pub fn is_valid(&self) -> bool {
        self.text("Request.IsValid") == Some("True")
    }

    pub fn items(&self) -> Vec<CartItem> {
        self.root
            .find_all("Cart.CartItems.CartItem")
            .into_iter()
            .cloned()
            .map(CartItem::new)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.root.find_all("Cart.CartItems.CartItem").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finds a line by its cart item id.
    pub fn get(&self, cart_item_id: &str) -> Option<CartItem> {
        self.items().into_iter().find(|item| item.cart_item_id() == Some(cart_item_id))
    }

    pub fn summary(&self) -> CartSummary {
        CartSummary {
            cart_id: self.cart_id().map(str::to_string),
            hmac: self.hmac().map(str::to_string),
            purchase_url: self.purchase_url().map(str::to_string),
            subtotal: self.subtotal(),
            items: self.items().iter().map(CartItem::summary).collect(),
        }
    }
}

/// One line of a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    element: Element,
}

impl CartItem {
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    pub fn cart_item_id(&self) -> Option<&str> {
        self.element.find_text("CartItemId")
    }

    pub fn asin(&self) -> Option<&str> {
        self.element.find_text("ASIN")
    }

    pub fn title(&self) -> Option<&str> {
        self.element.find_text("Title")
    }

    pub fn product_group(&self) -> Option<&str> {
        self.element.find_text("ProductGroup")
    }

    pub fn quantity(&self) -> Option<u32> {
        self.element.find_text("Quantity")?.parse().ok()
    }

    pub fn amount(&self) -> Option<&str> {
        self.element.find_text("Price.Amount")
    }

    pub fn formatted_price(&self) -> Option<&str> {
        self.element.find_text("Price.FormattedPrice")
    }

    pub fn currency_code(&self) -> Option<&str> {
        self.element.find_text("Price.CurrencyCode")
    }

    pub fn price(&self) -> Option<Price> {
        Price::from_minor_units(self.amount()?, self.currency_code())
    }

    pub fn summary(&self) -> CartItemSummary {
        CartItemSummary {
            cart_item_id: self.cart_item_id().map(str::to_string),
            asin: self.asin().map(str::to_string),
            title: self.title().map(str::to_string),
            quantity: self.quantity(),
            price: self.price(),
        }
    }
}
