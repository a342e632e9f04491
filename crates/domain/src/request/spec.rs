//! Request specification type

use serde::{Deserialize, Serialize};

use super::{Headers, HttpMethod};

/// Content type applied to bodies when the caller does not set one.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// A fully-resolved HTTP request, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute target URL
    pub url: String,
    /// HTTP headers
    #[serde(default)]
    pub headers: Headers,
    /// Request body, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Vec<u8>>,
}

impl RequestSpec {
    /// Creates a request with no headers and no body.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    /// Creates a GET request with the given URL.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// Creates a POST request carrying a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized.
    pub fn post_json<T: Serialize>(url: impl Into<String>, value: &T) -> serde_json::Result<Self> {
        let mut request = Self::new(HttpMethod::Post, url);
        request.body = Some(serde_json::to_vec(value)?);
        request.headers.set("Content-Type", CONTENT_TYPE_JSON);
        Ok(request)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_request() {
        let req = RequestSpec::get("http://localhost:8080/api/files");
        assert_eq!(req.method, HttpMethod::Get);
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn test_post_json_sets_content_type() {
        let req = RequestSpec::post_json(
            "http://localhost:8080/login",
            &serde_json::json!({"username": "alice"}),
        )
        .unwrap();

        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.headers.get("content-type"), Some(CONTENT_TYPE_JSON));
        assert_eq!(req.body.unwrap(), br#"{"username":"alice"}"#.to_vec());
    }
}
