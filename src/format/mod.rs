//! Output formatting for products, browse nodes and carts (table, JSON,
//! markdown, CSV, raw XML).

use crate::amazon::models::{BrowseNodeSummary, CartSummary, Price, ProductSummary};
use crate::amazon::{BrowseNode, Cart, Element, Product};
use crate::config::OutputFormat;

/// Formats API results for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a single product.
    pub fn format_product(&self, product: &Product) -> String {
        let summary = product.summary();
        match self.format {
            OutputFormat::Json => json(&summary, "{}"),
            OutputFormat::Table => self.table_single(&summary),
            OutputFormat::Markdown => self.markdown_single(&summary),
            OutputFormat::Csv => self.csv_products(std::slice::from_ref(&summary)),
            OutputFormat::Xml => xml(product.element()),
        }
    }

    /// Formats multiple products.
    pub fn format_products(&self, products: &[Product]) -> String {
        if products.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => self.csv_header(),
                OutputFormat::Xml => String::new(),
                _ => "No products found.".to_string(),
            };
        }

        let summaries: Vec<ProductSummary> = products.iter().map(Product::summary).collect();
        match self.format {
            OutputFormat::Json => json(&summaries, "[]"),
            OutputFormat::Table => self.table_products(&summaries),
            OutputFormat::Markdown => self.markdown_products(&summaries),
            OutputFormat::Csv => self.csv_products(&summaries),
            OutputFormat::Xml => {
                products.iter().map(|p| xml(p.element())).collect::<Vec<_>>().join("\n")
            }
        }
    }

    /// Formats browse nodes with their ancestry and children.
    pub fn format_browse_nodes(&self, nodes: &[BrowseNode]) -> String {
        if nodes.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Xml => String::new(),
                _ => "No browse nodes found.".to_string(),
            };
        }

        let summaries: Vec<BrowseNodeSummary> = nodes.iter().map(BrowseNode::summary).collect();
        match self.format {
            OutputFormat::Json => json(&summaries, "[]"),
            OutputFormat::Xml => nodes.iter().map(|n| xml(n.element())).collect::<Vec<_>>().join("\n"),
            OutputFormat::Csv => {
                let mut lines = vec!["id,name,is_category_root,ancestors,children".to_string()];
                for node in &summaries {
                    lines.push(format!(
                        "{},{},{},{},{}",
                        node.id.map(|id| id.to_string()).unwrap_or_default(),
                        csv_escape(node.name.as_deref().unwrap_or_default()),
                        node.is_category_root,
                        csv_escape(&node.ancestors.join(" > ")),
                        csv_escape(&node.children.join("; "))
                    ));
                }
                lines.join("\n")
            }
            OutputFormat::Table | OutputFormat::Markdown => {
                let markdown = self.format == OutputFormat::Markdown;
                summaries
                    .iter()
                    .map(|node| browse_node_block(node, markdown))
                    .collect::<Vec<_>>()
                    .join("\n\n")
            }
        }
    }

    /// Formats a cart and its lines.
    pub fn format_cart(&self, cart: &Cart) -> String {
        let summary = cart.summary();
        match self.format {
            OutputFormat::Json => json(&summary, "{}"),
            OutputFormat::Xml => xml(cart.element()),
            OutputFormat::Csv => self.csv_cart(&summary),
            OutputFormat::Table => self.table_cart(&summary),
            OutputFormat::Markdown => self.markdown_cart(&summary),
        }
    }

    // Table formatting

    fn table_single(&self, product: &ProductSummary) -> String {
        let mut lines = Vec::new();

        lines.push(format!("ASIN:    {}", product.asin.as_deref().unwrap_or("N/A")));
        lines.push(format!("Title:   {}", product.title.as_deref().unwrap_or("N/A")));
        if let Some(url) = &product.offer_url {
            lines.push(format!("URL:     {}", url));
        }

        match (&product.price, &product.list_price) {
            (Some(price), Some(list)) if list.amount > price.amount => lines.push(format!(
                "Price:   {} (was {:.2})",
                price_text(price),
                list.amount
            )),
            (Some(price), _) => lines.push(format!("Price:   {}", price_text(price))),
            (None, _) => lines.push("Price:   N/A".to_string()),
        }

        if let Some(author) = &product.author {
            lines.push(format!("Author:  {}", author));
        }
        if let Some(brand) = &product.brand {
            lines.push(format!("Brand:   {}", brand));
        }
        if let Some(binding) = &product.binding {
            lines.push(format!("Binding: {}", binding));
        }
        if let Some(rank) = product.sales_rank {
            lines.push(format!("Rank:    #{}", rank));
        }
        if let Some(date) = product.publication_date {
            lines.push(format!("Date:    {}", date));
        }
        if let Some(availability) = &product.availability {
            lines.push(format!("Stock:   {}", availability));
        }

        lines.join("\n")
    }

    fn table_products(&self, products: &[ProductSummary]) -> String {
        let asin_width = 10;
        let price_width = 12;
        let rank_width = 9;
        let binding_width = 14;
        let title_width = 50;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<asin_width$}  {:<price_width$}  {:<rank_width$}  {:<binding_width$}  {}",
            "ASIN", "Price", "Rank", "Binding", "Title"
        ));
        lines.push(format!(
            "{:-<asin_width$}  {:-<price_width$}  {:-<rank_width$}  {:-<binding_width$}  {:-<title_width$}",
            "", "", "", "", ""
        ));

        for product in products {
            let price_str = product
                .price
                .as_ref()
                .map(|p| format!("{:.2}", p.amount))
                .unwrap_or_else(|| "N/A".to_string());
            let rank_str =
                product.sales_rank.map(|r| r.to_string()).unwrap_or_else(|| "N/A".to_string());
            let binding = truncate(product.binding.as_deref().unwrap_or(""), binding_width);
            let title = truncate(product.title.as_deref().unwrap_or(""), title_width);

            lines.push(format!(
                "{:<asin_width$}  {:>price_width$}  {:>rank_width$}  {:<binding_width$}  {}",
                product.asin.as_deref().unwrap_or(""),
                price_str,
                rank_str,
                binding,
                title
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} products", products.len()));

        lines.join("\n")
    }

    fn table_cart(&self, cart: &CartSummary) -> String {
        let mut lines = Vec::new();
        lines.push(format!("Cart:     {}", cart.cart_id.as_deref().unwrap_or("N/A")));
        lines.push(format!("HMAC:     {}", cart.hmac.as_deref().unwrap_or("N/A")));
        if let Some(url) = &cart.purchase_url {
            lines.push(format!("Checkout: {}", url));
        }

        if cart.items.is_empty() {
            lines.push("Cart is empty.".to_string());
        } else {
            lines.push(String::new());
            lines.push(format!("{:<14}  {:<10}  {:>3}  {:>10}  {}", "Item", "ASIN", "Qty", "Price", "Title"));
            lines.push(format!("{:-<14}  {:-<10}  {:->3}  {:->10}  {:-<40}", "", "", "", "", ""));
            for item in &cart.items {
                lines.push(format!(
                    "{:<14}  {:<10}  {:>3}  {:>10}  {}",
                    item.cart_item_id.as_deref().unwrap_or(""),
                    item.asin.as_deref().unwrap_or(""),
                    item.quantity.map(|q| q.to_string()).unwrap_or_default(),
                    item.price.as_ref().map(|p| format!("{:.2}", p.amount)).unwrap_or_default(),
                    truncate(item.title.as_deref().unwrap_or(""), 40)
                ));
            }
        }

        if let Some(subtotal) = &cart.subtotal {
            lines.push(String::new());
            lines.push(format!("Subtotal: {}", price_text(subtotal)));
        }

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_single(&self, product: &ProductSummary) -> String {
        let mut lines = Vec::new();

        lines.push(format!("## {}", product.title.as_deref().unwrap_or("Untitled")));
        lines.push(String::new());

        lines.push(format!("- **ASIN:** {}", product.asin.as_deref().unwrap_or("N/A")));
        if let Some(url) = &product.offer_url {
            lines.push(format!("- **URL:** [View on Amazon]({})", url));
        }

        match (&product.price, &product.list_price) {
            (Some(price), Some(list)) if list.amount > price.amount => lines.push(format!(
                "- **Price:** {} ~~{:.2}~~",
                price_text(price),
                list.amount
            )),
            (Some(price), _) => lines.push(format!("- **Price:** {}", price_text(price))),
            (None, _) => {}
        }

        if let Some(author) = &product.author {
            lines.push(format!("- **Author:** {}", author));
        }
        if let Some(brand) = &product.brand {
            lines.push(format!("- **Brand:** {}", brand));
        }
        if let Some(rank) = product.sales_rank {
            lines.push(format!("- **Sales rank:** #{}", rank));
        }

        lines.join("\n")
    }

    fn markdown_products(&self, products: &[ProductSummary]) -> String {
        let mut lines = Vec::new();

        lines.push("| ASIN | Price | Rank | Binding | Title |".to_string());
        lines.push("|------|-------|------|---------|-------|".to_string());

        for product in products {
            let price_str = product
                .price
                .as_ref()
                .map(|p| format!("{:.2}", p.amount))
                .unwrap_or_else(|| "N/A".to_string());
            let rank_str =
                product.sales_rank.map(|r| r.to_string()).unwrap_or_else(|| "N/A".to_string());
            let title = truncate(product.title.as_deref().unwrap_or(""), 40);

            lines.push(format!(
                "| {} | {} | {} | {} | [{}]({}) |",
                product.asin.as_deref().unwrap_or(""),
                price_str,
                rank_str,
                product.binding.as_deref().unwrap_or(""),
                title,
                product.offer_url.as_deref().unwrap_or("")
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{} products found*", products.len()));

        lines.join("\n")
    }

    fn markdown_cart(&self, cart: &CartSummary) -> String {
        let mut lines = Vec::new();
        lines.push(format!("## Cart {}", cart.cart_id.as_deref().unwrap_or("")));
        lines.push(String::new());
        if let Some(url) = &cart.purchase_url {
            lines.push(format!("[Proceed to checkout]({})", url));
            lines.push(String::new());
        }

        lines.push("| Item | ASIN | Qty | Price | Title |".to_string());
        lines.push("|------|------|-----|-------|-------|".to_string());
        for item in &cart.items {
            lines.push(format!(
                "| {} | {} | {} | {} | {} |",
                item.cart_item_id.as_deref().unwrap_or(""),
                item.asin.as_deref().unwrap_or(""),
                item.quantity.map(|q| q.to_string()).unwrap_or_default(),
                item.price.as_ref().map(price_text).unwrap_or_default(),
                item.title.as_deref().unwrap_or("")
            ));
        }

        if let Some(subtotal) = &cart.subtotal {
            lines.push(String::new());
            lines.push(format!("**Subtotal:** {}", price_text(subtotal)));
        }

        lines.join("\n")
    }

    // CSV formatting

    fn csv_header(&self) -> String {
        "asin,title,author,brand,binding,price,list_price,currency,sales_rank,publication_date,availability,url"
            .to_string()
    }

    fn csv_products(&self, products: &[ProductSummary]) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_header());

        for product in products {
            let text = |value: &Option<String>| csv_escape(value.as_deref().unwrap_or_default());
            let amount = |price: &Option<Price>| {
                price.as_ref().map(|p| p.amount.to_string()).unwrap_or_default()
            };

            lines.push(format!(
                "{},{},{},{},{},{},{},{},{},{},{},{}",
                text(&product.asin),
                text(&product.title),
                text(&product.author),
                text(&product.brand),
                text(&product.binding),
                amount(&product.price),
                amount(&product.list_price),
                product.price.as_ref().map(|p| p.currency_code().to_string()).unwrap_or_default(),
                product.sales_rank.map(|r| r.to_string()).unwrap_or_default(),
                product.publication_date.map(|d| d.to_string()).unwrap_or_default(),
                text(&product.availability),
                text(&product.offer_url)
            ));
        }

        lines.join("\n")
    }

    fn csv_cart(&self, cart: &CartSummary) -> String {
        let mut lines = vec!["cart_item_id,asin,title,quantity,price,currency".to_string()];
        for item in &cart.items {
            lines.push(format!(
                "{},{},{},{},{},{}",
                item.cart_item_id.as_deref().unwrap_or_default(),
                item.asin.as_deref().unwrap_or_default(),
                csv_escape(item.title.as_deref().unwrap_or_default()),
                item.quantity.map(|q| q.to_string()).unwrap_or_default(),
                item.price.as_ref().map(|p| p.amount.to_string()).unwrap_or_default(),
                item.price.as_ref().map(|p| p.currency_code().to_string()).unwrap_or_default()
            ));
        }
        lines.join("\n")
    }
}

fn json<T: serde::Serialize + ?Sized>(value: &T, fallback: &str) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| fallback.to_string())
}

fn xml(element: &Element) -> String {
    element.to_xml_string().unwrap_or_else(|e| format!("<!-- {} -->", e))
}

fn price_text(price: &Price) -> String {
    match price.currency.as_deref() {
        Some(currency) => format!("{} {:.2}", currency, price.amount),
        None => format!("{:.2}", price.amount),
    }
}

fn browse_node_block(node: &BrowseNodeSummary, markdown: bool) -> String {
    let id = node.id.map(|id| id.to_string()).unwrap_or_else(|| "?".to_string());
    let name = node.name.as_deref().unwrap_or("Unnamed");
    let mut lines = Vec::new();

    if markdown {
        lines.push(format!("## {} ({})", name, id));
    } else {
        lines.push(format!("{} [{}]{}", name, id, if node.is_category_root { " (root)" } else { "" }));
    }

    if !node.ancestors.is_empty() {
        let mut path: Vec<&str> = node.ancestors.iter().rev().map(String::as_str).collect();
        path.push(name);
        let path = path.join(" > ");
        lines.push(if markdown { format!("- **Path:** {}", path) } else { format!("  Path:     {}", path) });
    }

    for child in &node.children {
        lines.push(if markdown { format!("- {}", child) } else { format!("  Child:    {}", child) });
    }

    lines.join("\n")
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
