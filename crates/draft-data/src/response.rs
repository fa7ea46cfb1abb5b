//! HTTP response handling.

use crate::FetchError;
use serde::de::DeserializeOwned;

/// Longest slice of an error body kept for diagnostics.
const MAX_ERROR_TEXT: usize = 2048;

/// An HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code.
    pub status: u16,
    /// The response body.
    pub body: Vec<u8>,
}

impl Response {
    /// Create a new response.
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body text for error reports, lossy and truncated.
    pub fn diagnostic_text(&self) -> String {
        let text = String::from_utf8_lossy(&self.body);
        match text.char_indices().nth(MAX_ERROR_TEXT) {
            Some((cut, _)) => format!("{}...", &text[..cut]),
            None => text.into_owned(),
        }
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|e| FetchError::ParseError(e.to_string()))
    }

    /// Convert to a Result, returning an error for non-2xx status codes.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(FetchError::HttpError {
                status: self.status,
                message: self.diagnostic_text(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_response(status: u16, body: &[u8]) -> Response {
        Response::new(status, body.to_vec())
    }

    // === Status Check Tests ===

    #[test]
    fn test_response_is_success() {
        assert!(make_response(200, b"").is_success());
        assert!(make_response(201, b"").is_success());
        assert!(!make_response(199, b"").is_success());
        assert!(!make_response(422, b"").is_success());
    }

    // === Body Tests ===

    #[test]
    fn test_diagnostic_text_is_lossy() {
        let resp = make_response(502, &[b'b', b'a', b'd', 0xff]);
        assert_eq!(resp.diagnostic_text(), "bad\u{FFFD}");
    }

    #[test]
    fn test_diagnostic_text_truncates() {
        let resp = make_response(500, "x".repeat(5000).as_bytes());
        let text = resp.diagnostic_text();
        assert!(text.ends_with("..."));
        assert_eq!(text.len(), MAX_ERROR_TEXT + 3);
    }

    #[test]
    fn test_response_json() {
        use serde::Deserialize;

        #[derive(Deserialize, Debug, PartialEq)]
        struct Data {
            value: i32,
        }

        let resp = make_response(200, br#"{"value": 42}"#);
        let data: Data = resp.json().unwrap();
        assert_eq!(data, Data { value: 42 });
        assert!(make_response(200, b"not json").json::<Data>().is_err());
    }

    // === error_for_status Tests ===

    #[test]
    fn test_response_error_for_status() {
        assert!(make_response(201, b"OK").error_for_status().is_ok());

        let err = make_response(422, b"bad line items")
            .error_for_status()
            .unwrap_err();
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.to_string(), "HTTP 422: bad line items");
    }
}
