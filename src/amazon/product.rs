//! Read-only view over an `<Item>` element.

use crate::amazon::api::AmazonApi;
use crate::amazon::browse_node::BrowseNode;
use crate::amazon::client::RequestParams;
use crate::amazon::error::Result;
use crate::amazon::models::{AlternateVersion, Creator, Price, ProductSummary, Reviews};
use crate::amazon::xml::Element;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;
use tokio::sync::OnceCell;
use tracing::debug;

const LISTING: &str = "Offers.Offer.OfferListing";
const AVAILABILITY: &str = "Offers.Offer.OfferListing.AvailabilityAttributes";

/// A catalog item as returned by lookups and searches.
///
/// Every accessor is total: an absent element yields `None` (or an empty
/// list), never an error.
#[derive(Clone)]
pub struct Product {
    item: Element,
    api: AmazonApi,
    parent: OnceCell<Option<Box<Product>>>,
}

impl fmt::Debug for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Product")
            .field("asin", &self.asin())
            .field("title", &self.title())
            .finish()
    }
}

impl Product {
    pub(crate) fn new(item: Element, api: AmazonApi) -> Self {
        Self { item, api, parent: OnceCell::new() }
    }

    /// The underlying `<Item>` element.
    pub fn element(&self) -> &Element {
        &self.item
    }

    fn text(&self, path: &str) -> Option<&str> {
        self.item.find_text(path)
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.item.find_text(&format!("ItemAttributes.{}", name))
    }

    fn attr_list(&self, name: &str) -> Vec<String> {
        self.item.find_all_text(&format!("ItemAttributes.{}", name))
    }

    pub fn asin(&self) -> Option<&str> {
        self.text("ASIN")
    }

    /// Parent ASIN of a variation; can be used to test whether a parent exists.
    pub fn parent_asin(&self) -> Option<&str> {
        self.text("ParentASIN")
    }

    /// Associate link to the product page on the region's retail site.
    pub fn offer_url(&self) -> Option<String> {
        let asin = self.asin()?;
        Some(format!(
            "{}{}/?tag={}",
            self.api.region().product_base_url(),
            asin,
            self.api.associate_tag()
        ))
    }

    pub fn detail_page_url(&self) -> Option<&str> {
        self.text("DetailPageURL")
    }

    pub fn title(&self) -> Option<&str> {
        self.attr("Title")
    }

    /// First listed author.
    pub fn author(&self) -> Option<&str> {
        self.attr("Author")
    }

    pub fn authors(&self) -> Vec<String> {
        self.attr_list("Author")
    }

    /// Contributors with their `Role` attribute.
    pub fn creators(&self) -> Vec<Creator> {
        self.item
            .find_all("ItemAttributes.Creator")
            .into_iter()
            .filter_map(|creator| {
                Some(Creator {
                    name: creator.text()?.to_string(),
                    role: creator.attribute("Role").unwrap_or_default().to_string(),
                })
            })
            .collect()
    }

    pub fn publisher(&self) -> Option<&str> {
        self.attr("Publisher")
    }

    pub fn label(&self) -> Option<&str> {
        self.attr("Label")
    }

    pub fn manufacturer(&self) -> Option<&str> {
        self.attr("Manufacturer")
    }

    pub fn brand(&self) -> Option<&str> {
        self.attr("Brand")
    }

    pub fn studio(&self) -> Option<&str> {
        self.attr("Studio")
    }

    pub fn isbn(&self) -> Option<&str> {
        self.attr("ISBN")
    }

    pub fn eisbn(&self) -> Option<&str> {
        self.attr("EISBN")
    }

    /// EAN, falling back to the first entry of `EANList`.
    pub fn ean(&self) -> Option<&str> {
        self.attr("EAN").or_else(|| self.attr("EANList.EANListElement"))
    }

    /// UPC, falling back to the first entry of `UPCList`.
    pub fn upc(&self) -> Option<&str> {
        self.attr("UPC").or_else(|| self.attr("UPCList.UPCListElement"))
    }

    pub fn sku(&self) -> Option<&str> {
        self.attr("SKU")
    }

    pub fn mpn(&self) -> Option<&str> {
        self.attr("MPN")
    }

    pub fn model(&self) -> Option<&str> {
        self.attr("Model")
    }

    pub fn part_number(&self) -> Option<&str> {
        self.attr("PartNumber")
    }

    pub fn binding(&self) -> Option<&str> {
        self.attr("Binding")
    }

    pub fn edition(&self) -> Option<&str> {
        self.attr("Edition")
    }

    pub fn pages(&self) -> Option<u32> {
        self.attr("NumberOfPages")?.parse().ok()
    }

    pub fn color(&self) -> Option<&str> {
        self.attr("Color")
    }

    pub fn product_group(&self) -> Option<&str> {
        self.attr("ProductGroup")
    }

    pub fn product_type_name(&self) -> Option<&str> {
        self.attr("ProductTypeName")
    }

    pub fn running_time(&self) -> Option<&str> {
        self.attr("RunningTime")
    }

    pub fn is_adult(&self) -> Option<bool> {
        self.attr("IsAdultProduct").and_then(parse_flag)
    }

    pub fn genre(&self) -> Option<&str> {
        self.attr("Genre")
    }

    pub fn actors(&self) -> Vec<String> {
        self.attr_list("Actor")
    }

    pub fn directors(&self) -> Vec<String> {
        self.attr_list("Director")
    }

    /// Publication date; anything other than `YYYY-MM-DD` maps to `None`.
    pub fn publication_date(&self) -> Option<NaiveDate> {
        self.item.find_date("ItemAttributes.PublicationDate")
    }

    /// Publication date, failing on an unparseable value.
    pub fn publication_date_strict(&self) -> Result<Option<NaiveDate>> {
        self.item.find_date_strict("ItemAttributes.PublicationDate")
    }

    pub fn release_date(&self) -> Option<NaiveDate> {
        self.item.find_date("ItemAttributes.ReleaseDate")
    }

    pub fn large_image_url(&self) -> Option<&str> {
        self.text("LargeImage.URL")
    }

    pub fn medium_image_url(&self) -> Option<&str> {
        self.text("MediumImage.URL")
    }

    pub fn small_image_url(&self) -> Option<&str> {
        self.text("SmallImage.URL")
    }

    pub fn tiny_image_url(&self) -> Option<&str> {
        self.text("TinyImage.URL")
    }

    /// Large image URL of every image set.
    pub fn images(&self) -> Vec<String> {
        self.item
            .find_all("ImageSets.ImageSet")
            .into_iter()
            .filter_map(|set| set.find_string("LargeImage.URL"))
            .collect()
    }

    pub fn reviews(&self) -> Reviews {
        Reviews {
            has_reviews: self.text("CustomerReviews.HasReviews").and_then(parse_flag).unwrap_or(false),
            iframe_url: self.text("CustomerReviews.IFrameURL").map(str::to_string),
        }
    }

    /// Content of the first editorial review.
    pub fn editorial_review(&self) -> Option<&str> {
        self.text("EditorialReviews.EditorialReview.Content")
    }

    pub fn editorial_reviews(&self) -> Vec<String> {
        self.item
            .find_all("EditorialReviews.EditorialReview")
            .into_iter()
            .filter_map(|review| review.find_string("Content"))
            .collect()
    }

    pub fn features(&self) -> Vec<String> {
        self.attr_list("Feature")
    }

    /// Distinct language names, lower-cased, in document order.
    pub fn languages(&self) -> Vec<String> {
        let mut languages: Vec<String> = Vec::new();
        let entries = self.item.find_all("ItemAttributes.Languages.Language");
        for name in entries.into_iter().filter_map(|language| language.find_text("Name")) {
            let name = name.to_lowercase();
            if !languages.contains(&name) {
                languages.push(name);
            }
        }
        languages
    }

    /// Current price, trying the sale price, then the offer price, then the
    /// lowest new price.
    pub fn price_and_currency(&self) -> Option<Price> {
        [
            format!("{}.SalePrice", LISTING),
            format!("{}.Price", LISTING),
            "OfferSummary.LowestNewPrice".to_string(),
        ]
        .iter()
        .find_map(|path| self.price_at(path))
    }

    pub fn list_price(&self) -> Option<Price> {
        self.price_at("ItemAttributes.ListPrice")
    }

    fn price_at(&self, path: &str) -> Option<Price> {
        let element = self.item.find(path)?;
        Price::from_minor_units(element.find_text("Amount")?, element.find_text("CurrencyCode"))
    }

    pub fn formatted_price(&self) -> Option<&str> {
        self.text(&format!("{}.Price.FormattedPrice", LISTING))
    }

    /// Offer listing id used to add this product to a cart.
    pub fn offer_id(&self) -> Option<&str> {
        self.text(&format!("{}.OfferListingId", LISTING))
    }

    pub fn availability(&self) -> Option<&str> {
        self.text(&format!("{}.Availability", LISTING))
    }

    pub fn availability_type(&self) -> Option<&str> {
        self.text(&format!("{}.AvailabilityType", AVAILABILITY))
    }

    pub fn availability_min_hours(&self) -> Option<u32> {
        self.text(&format!("{}.MinimumHours", AVAILABILITY))?.parse().ok()
    }

    pub fn availability_max_hours(&self) -> Option<u32> {
        self.text(&format!("{}.MaximumHours", AVAILABILITY))?.parse().ok()
    }

    pub fn is_preorder(&self) -> Option<bool> {
        self.text(&format!("{}.IsPreorder", AVAILABILITY)).and_then(parse_flag)
    }

    pub fn sales_rank(&self) -> Option<u64> {
        self.text("SalesRank")?.parse().ok()
    }

    pub fn alternate_versions(&self) -> Vec<AlternateVersion> {
        self.item
            .find_all("AlternateVersions.AlternateVersion")
            .into_iter()
            .map(|version| AlternateVersion {
                asin: version.find_string("ASIN"),
                title: version.find_string("Title"),
                binding: version.find_string("Binding"),
            })
            .collect()
    }

    pub fn browse_nodes(&self) -> Vec<BrowseNode> {
        self.item
            .find_all("BrowseNodes.BrowseNode")
            .into_iter()
            .cloned()
            .map(BrowseNode::new)
            .collect()
    }

    /// Text of `ItemAttributes.{name}`; `name` may itself be a dotted path.
    pub fn get_attribute(&self, name: &str) -> Result<Option<&str>> {
        let path = format!("ItemAttributes.{}", name);
        Ok(self.item.lookup(&path)?.and_then(Element::text))
    }

    /// Values of the named attributes that are present.
    pub fn get_attributes(&self, names: &[&str]) -> Result<BTreeMap<String, String>> {
        let mut values = BTreeMap::new();
        for name in names {
            if let Some(value) = self.get_attribute(name)? {
                values.insert(name.to_string(), value.to_string());
            }
        }
        Ok(values)
    }

    /// XML attributes of `ItemAttributes.{name}`, such as `Units`.
    pub fn get_attribute_details(&self, name: &str) -> Result<Option<&BTreeMap<String, String>>> {
        let path = format!("ItemAttributes.{}", name);
        Ok(self.item.lookup(&path)?.map(Element::attributes))
    }

    /// Fetches the parent product once and memoizes the result.
    ///
    /// Returns `None` without a request when there is no `ParentASIN`.
    pub async fn get_parent(&self) -> Result<Option<&Product>> {
        let parent = self
            .parent
            .get_or_try_init(|| async {
                let Some(parent_asin) = self.parent_asin() else {
                    return Ok(None);
                };
                debug!("Fetching parent {} of {}", parent_asin, self.asin().unwrap_or("?"));
                let params = RequestParams::new().with("ItemId", parent_asin);
                self.api.lookup_one(params).await.map(|product| Some(Box::new(product)))
            })
            .await?;
        Ok(parent.as_deref())
    }

    /// Pretty-printed XML of the item.
    pub fn to_xml_string(&self) -> Result<String> {
        self.item.to_xml_string()
    }

    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            asin: self.asin().map(str::to_string),
            title: self.title().map(str::to_string),
            brand: self.brand().map(str::to_string),
            author: self.author().map(str::to_string),
            binding: self.binding().map(str::to_string),
            product_group: self.product_group().map(str::to_string),
            price: self.price_and_currency(),
            list_price: self.list_price(),
            formatted_price: self.formatted_price().map(str::to_string),
            availability: self.availability().map(str::to_string),
            sales_rank: self.sales_rank(),
            publication_date: self.publication_date(),
            image_url: self.large_image_url().map(str::to_string),
            detail_page_url: self.detail_page_url().map(str::to_string),
            offer_url: self.offer_url(),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
