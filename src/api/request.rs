//! Request model used between callers and the transport.

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::traits::{Headers, HttpRequest, Method};

/// A request that has not been resolved against a base URL yet.
///
/// `retried` is set once the request has been replayed after a credential
/// refresh; a request is replayed at most once. Requests built with
/// [`without_refresh`](Self::without_refresh) surface a 401 as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Headers,
    pub body: Option<Value>,
    pub retried: bool,
    pub refresh_on_unauthorized: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Headers::new(),
            body: None,
            retried: false,
            refresh_on_unauthorized: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Append a query parameter. Values are percent-encoded on resolution.
    pub fn with_query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Append a query parameter only when `value` is present.
    pub fn with_optional_query<V: ToString>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with_query(name, value),
            None => self,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize `body` as the JSON request body.
    pub fn with_json<T: Serialize + ?Sized>(self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(self.with_body(value))
    }

    /// Look up a header value, ignoring the case of the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some()
    }

    /// Do not refresh credentials when this request is rejected with 401.
    /// Used for sign-in endpoints where a 401 means bad credentials.
    pub fn without_refresh(mut self) -> Self {
        self.refresh_on_unauthorized = false;
        self
    }

    pub fn mark_retried(&mut self) {
        self.retried = true;
    }

    /// Path plus encoded query string, e.g. `/feed?cursor=abc&limit=10`.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }

        let query = self
            .query
            .iter()
            .map(|(name, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(name),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }

    /// Resolve against `base_url` into a wire request.
    pub fn to_http(&self, base_url: &str) -> HttpRequest {
        let url = format!("{}{}", base_url.trim_end_matches('/'), self.path_and_query());
        HttpRequest {
            method: self.method,
            url,
            headers: self.headers.clone(),
            body: self.body.as_ref().map(Value::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let request = ApiRequest::get("/profile");
        assert_eq!(request.method, Method::Get);
        assert!(request.query.is_empty());
        assert!(request.body.is_none());
        assert!(!request.retried);
        assert!(request.refresh_on_unauthorized);
        assert!(!request.without_refresh().refresh_on_unauthorized);
    }

    #[test]
    fn test_query_is_encoded() {
        let request = ApiRequest::get("/profile/search").with_query("query", "ana & bo");
        assert_eq!(request.path_and_query(), "/profile/search?query=ana%20%26%20bo");
    }

    #[test]
    fn test_optional_query() {
        let request = ApiRequest::get("/feed")
            .with_optional_query::<&str>("cursor", None)
            .with_optional_query("limit", Some(10));
        assert_eq!(request.path_and_query(), "/feed?limit=10");
    }

    #[test]
    fn test_to_http_joins_base_url() {
        let request = ApiRequest::patch("/notifications/read")
            .with_body(json!({"ids": ["a"]}))
            .with_header("Content-Type", "application/json");
        let http = request.to_http("http://localhost:3000/");

        assert_eq!(http.url, "http://localhost:3000/notifications/read");
        assert_eq!(http.method, Method::Patch);
        assert_eq!(http.body.as_deref(), Some(r#"{"ids":["a"]}"#));
        assert_eq!(http.header("content-type"), Some("application/json"));
    }

    #[test]
    fn test_with_json() {
        #[derive(Serialize)]
        struct Login<'a> {
            identifier: &'a str,
        }
        let request = ApiRequest::post("/auth/login")
            .with_json(&Login { identifier: "ana" })
            .unwrap();
        assert_eq!(request.body, Some(json!({"identifier": "ana"})));
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let request = ApiRequest::get("/feed").with_header("X-Request-Id", "abc");
        assert_eq!(request.header("x-request-id"), Some("abc"));
        assert!(!request.has_header("Authorization"));
    }
}
