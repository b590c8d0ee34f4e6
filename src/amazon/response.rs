//! Validity checks shared by every operation's response.

use crate::amazon::error::{ApiError, Result};
use crate::amazon::xml::Element;

/// Error code and message reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    pub code: String,
    pub message: String,
}

impl ServiceError {
    fn from_error_element(error: &Element) -> Self {
        Self {
            code: error.find_string("Code").unwrap_or_default(),
            message: error.find_string("Message").unwrap_or_default(),
        }
    }
}

/// Parses a raw payload into its root element.
pub fn parse(xml: &str) -> Result<Element> {
    Element::parse(xml)
}

/// Checks the `IsValid` flag of `{section}.Request`.
///
/// Also recognizes top-level `<Error>` documents, which the service sends
/// when it rejects a request before reaching the operation.
pub fn request_error(root: &Element, section: &str) -> Option<ServiceError> {
    let request = root.find(section).and_then(|s| s.child("Request"));

    if let Some(request) = request {
        if request.find_text("IsValid") == Some("False") {
            return Some(match request.find("Errors.Error") {
                Some(error) => ServiceError::from_error_element(error),
                None => ServiceError { code: String::new(), message: String::new() },
            });
        }
        return None;
    }

    root.child("Error").map(ServiceError::from_error_element)
}

/// Returns the first error under `Cart.Request.Errors`, whether or not the
/// request was flagged invalid.
pub fn cart_error(root: &Element) -> Option<ServiceError> {
    root.find("Cart.Request.Errors.Error")
        .or_else(|| root.child("Error"))
        .map(ServiceError::from_error_element)
}

/// Returns a required top-level section or a [`ApiError::MalformedResponse`].
pub fn section<'a>(root: &'a Element, name: &str) -> Result<&'a Element> {
    root.child(name).ok_or_else(|| {
        ApiError::MalformedResponse(format!("<{}> has no <{}> element", root.name(), name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request() {
        let root = parse(
            "<R><Items><Request><IsValid>True</IsValid></Request><Item/></Items></R>",
        )
        .unwrap();
        assert!(request_error(&root, "Items").is_none());
        assert!(section(&root, "Items").is_ok());
    }

    #[test]
    fn test_invalid_request() {
        let root = parse(
            "<R><Items><Request><IsValid>False</IsValid><Errors><Error>\
             <Code>AWS.ParameterOutOfRange</Code><Message>Too far</Message>\
             </Error></Errors></Request></Items></R>",
        )
        .unwrap();
        let err = request_error(&root, "Items").unwrap();
        assert_eq!(err.code, "AWS.ParameterOutOfRange");
        assert_eq!(err.message, "Too far");
    }

    #[test]
    fn test_top_level_error_document() {
        let root = parse(
            "<ItemLookupErrorResponse><Error><Code>SignatureDoesNotMatch</Code>\
             <Message>nope</Message></Error></ItemLookupErrorResponse>",
        )
        .unwrap();
        let err = request_error(&root, "Items").unwrap();
        assert_eq!(err.code, "SignatureDoesNotMatch");
        assert!(matches!(section(&root, "Items"), Err(ApiError::MalformedResponse(_))));
    }

    #[test]
    fn test_cart_error() {
        let root = parse(
            "<CartGetResponse><Cart><Request><IsValid>True</IsValid><Errors><Error>\
             <Code>AWS.ECommerceService.CartInfoMismatch</Code><Message>m</Message>\
             </Error></Errors></Request></Cart></CartGetResponse>",
        )
        .unwrap();
        assert_eq!(cart_error(&root).unwrap().code, "AWS.ECommerceService.CartInfoMismatch");

        let ok = parse("<CartGetResponse><Cart><Request><IsValid>True</IsValid></Request></Cart></CartGetResponse>")
            .unwrap();
        assert!(cart_error(&ok).is_none());
    }
}
