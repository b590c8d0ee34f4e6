//! Lazy, page-at-a-time item search.

use crate::amazon::api::{AmazonApi, DEFAULT_RESPONSE_GROUP};
use crate::amazon::client::RequestParams;
use crate::amazon::error::{ApiError, Result, PARAMETER_OUT_OF_RANGE};
use crate::amazon::product::Product;
use crate::amazon::response;
use std::collections::VecDeque;
use tracing::{debug, info, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Active,
    Exhausted,
    Failed,
}

/// Iterates over every product matching a search, fetching pages on demand.
///
/// Pages are requested with an increasing `ItemPage` starting at 1. The
/// stream ends when the service reports `AWS.ParameterOutOfRange` or the
/// last page given by `Items.TotalPages` has been consumed. A valid page
/// without items does not end it. Any other failure is yielded once and ends
/// the stream.
#[derive(Debug)]
pub struct ItemSearch {
    api: AmazonApi,
    params: RequestParams,
    current_page: u32,
    buffer: VecDeque<Product>,
    state: State,
    is_last_page: bool,
}

impl ItemSearch {
    pub(crate) fn new(api: AmazonApi, mut params: RequestParams) -> Self {
        params.set_default("ResponseGroup", DEFAULT_RESPONSE_GROUP);
        Self {
            api,
            params,
            current_page: 1,
            buffer: VecDeque::new(),
            state: State::Active,
            is_last_page: false,
        }
    }

    /// The page the next fetch will request.
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// True once the final page has been fetched.
    pub fn is_last_page(&self) -> bool {
        self.is_last_page
    }

    /// Returns the next product, fetching another page when the buffer runs dry.
    #[allow(clippy::should_implement_trait)]
    pub async fn next(&mut self) -> Option<Result<Product>> {
        loop {
            if let Some(product) = self.buffer.pop_front() {
                trace!("Yielding {}", product.asin().unwrap_or("?"));
                return Some(Ok(product));
            }
            if self.state != State::Active {
                return None;
            }
            if let Err(err) = self.fetch_page().await {
                self.state = State::Failed;
                return Some(Err(err));
            }
        }
    }

    /// Collects at most `n` products. `take(0)` sends no request.
    pub async fn take(&mut self, n: usize) -> Result<Vec<Product>> {
        let mut products = Vec::with_capacity(n.min(10));
        while products.len() < n {
            match self.next().await {
                Some(Ok(product)) => products.push(product),
                Some(Err(err)) => return Err(err),
                None => break,
            }
        }
        Ok(products)
    }

    /// Collects every remaining product.
    pub async fn collect_all(&mut self) -> Result<Vec<Product>> {
        self.take(usize::MAX).await
    }

    async fn fetch_page(&mut self) -> Result<()> {
        let mut params = self.params.clone();
        params.set("ItemPage", self.current_page);
        info!("Fetching search page {}", self.current_page);

        let root = self.api.call("ItemSearch", &params).await?;
        if let Some(err) = response::request_error(&root, "Items") {
            if err.code == PARAMETER_OUT_OF_RANGE {
                debug!("Page {} is out of range, search exhausted", self.current_page);
                self.finish();
                return Ok(());
            }
            return Err(ApiError::Search { code: err.code, message: err.message });
        }

        let items = response::section(&root, "Items")?;
        let total_pages = items.find_text("TotalPages").and_then(|t| t.parse::<u32>().ok());
        let products = self.api.products(items);
        debug!(
            "Page {} returned {} item(s), total pages {:?}",
            self.current_page,
            products.len(),
            total_pages
        );
        self.buffer.extend(products);

        if total_pages.is_some_and(|total| self.current_page >= total) {
            self.finish();
        }
        self.current_page += 1;
        Ok(())
    }

    fn finish(&mut self) {
        self.state = State::Exhausted;
        self.is_last_page = true;
    }
}

#[cfg(test)]
mod tests {
    use crate::amazon::api::tests::{api_with, MockTransport};
    use crate::amazon::client::RequestParams;
    use crate::amazon::error::ApiError;

    fn page(asins: &[&str], total_pages: Option<u32>) -> String {
        let items: String = asins.iter().map(|a| format!("<Item><ASIN>{a}</ASIN></Item>")).collect();
        let total = total_pages.map(|t| format!("<TotalPages>{t}</TotalPages>")).unwrap_or_default();
        format!(
            "<ItemSearchResponse><Items><Request><IsValid>True</IsValid></Request>{total}{items}</Items></ItemSearchResponse>"
        )
    }

    fn invalid(code: &str) -> String {
        format!(
            "<ItemSearchResponse><Items><Request><IsValid>False</IsValid><Errors><Error>\
             <Code>{code}</Code><Message>failed</Message></Error></Errors></Request></Items>\
             </ItemSearchResponse>"
        )
    }

    fn params() -> RequestParams {
        RequestParams::from([("Keywords", "Python"), ("SearchIndex", "Books")])
    }

    #[tokio::test]
    async fn test_pages_until_out_of_range() {
        let p1 = page(&["A1", "A2"], None);
        let p2 = page(&["B1"], None);
        let end = invalid("AWS.ParameterOutOfRange");
        let transport = MockTransport::new(vec![p1.as_str(), p2.as_str(), end.as_str()]);
        let api = api_with(transport.clone());

        let mut search = api.search(params());
        let products = search.collect_all().await.unwrap();
        let asins: Vec<_> = products.iter().map(|p| p.asin().unwrap()).collect();
        assert_eq!(asins, vec!["A1", "A2", "B1"]);
        assert!(search.is_last_page());
        assert!(search.next().await.is_none());

        assert_eq!(transport.call_count(), 3);
        for (i, expected) in ["1", "2", "3"].iter().enumerate() {
            let (operation, sent) = transport.request(i);
            assert_eq!(operation, "ItemSearch");
            assert_eq!(sent.get("ItemPage"), Some(*expected));
            assert_eq!(sent.get("Keywords"), Some("Python"));
            assert_eq!(sent.get("ResponseGroup"), Some("Large"));
        }
    }

    #[tokio::test]
    async fn test_no_request_before_first_next() {
        let transport = MockTransport::new(vec![]);
        let api = api_with(transport.clone());

        let mut search = api.search(params());
        assert_eq!(search.current_page(), 1);
        assert!(search.take(0).await.unwrap().is_empty());
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_stops_at_total_pages() {
        let p1 = page(&["A1"], Some(2));
        let p2 = page(&["B1"], Some(2));
        let transport = MockTransport::new(vec![p1.as_str(), p2.as_str()]);
        let api = api_with(transport.clone());

        let products = api.search(params()).collect_all().await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_page_does_not_end_stream() {
        let p1 = page(&["A1"], None);
        let empty = page(&[], None);
        let p3 = page(&["B1"], None);
        let end = invalid("AWS.ParameterOutOfRange");
        let transport =
            MockTransport::new(vec![p1.as_str(), empty.as_str(), p3.as_str(), end.as_str()]);
        let api = api_with(transport.clone());

        let mut search = api.search(params());
        let products = search.collect_all().await.unwrap();
        let asins: Vec<_> = products.iter().map(|p| p.asin().unwrap()).collect();
        assert_eq!(asins, vec!["A1", "B1"]);
        assert!(search.is_last_page());
        assert_eq!(transport.call_count(), 4);
        assert_eq!(transport.request(2).1.get("ItemPage"), Some("3"));
    }

    #[tokio::test]
    async fn test_empty_last_page_by_total_pages() {
        let empty = page(&[], Some(1));
        let transport = MockTransport::new(vec![empty.as_str()]);
        let api = api_with(transport.clone());

        let mut search = api.search(params());
        assert!(search.next().await.is_none());
        assert!(search.is_last_page());
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_error_mid_stream_yields_once() {
        let p1 = page(&["A1"], None);
        let bad = invalid("AWS.InvalidParameterValue");
        let transport = MockTransport::new(vec![p1.as_str(), bad.as_str()]);
        let api = api_with(transport.clone());

        let mut search = api.search(params());
        assert_eq!(search.next().await.unwrap().unwrap().asin(), Some("A1"));

        match search.next().await {
            Some(Err(ApiError::Search { code, .. })) => assert_eq!(code, "AWS.InvalidParameterValue"),
            other => panic!("expected search error, got {other:?}"),
        }
        assert!(search.next().await.is_none());
        assert!(!search.is_last_page());
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_search_n_limits_requests() {
        let p1 = page(&["A1", "A2", "A3"], Some(5));
        let transport = MockTransport::new(vec![p1.as_str()]);
        let api = api_with(transport.clone());

        let products = api.search_n(2, params()).await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_take_propagates_error() {
        let bad = invalid("AWS.MissingParameters");
        let api = api_with(MockTransport::new(vec![bad.as_str()]));

        let err = api.search_n(5, params()).await.unwrap_err();
        assert!(matches!(err, ApiError::Search { .. }));
    }
}
