//! Mock HTTP transport for testing.
//!
//! Responses are scripted per route, optionally narrowed to a specific
//! `Authorization` header, optionally delayed. A route matches its own URL
//! with or without a query string, never a longer path. Every request is recorded
//! before the response is produced.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::traits::{Headers, HttpClient, HttpError, HttpRequest, Method, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Headers,
    pub body: Option<String>,
}

impl RecordedRequest {
    /// The `Authorization` header value, if any.
    pub fn authorization(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("authorization"))
            .map(|(_, v)| v.as_str())
    }
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a response (any status)
    Success(Response),
    /// Return a transport error
    Error(HttpError),
}

impl MockResponse {
    /// Response with the given status and JSON body.
    pub fn json(status: u16, value: serde_json::Value) -> Self {
        MockResponse::Success(Response::json_body(status, &value))
    }

    /// Response with the given status and an empty body.
    pub fn status(status: u16) -> Self {
        MockResponse::Success(Response::new(status, Bytes::new()))
    }
}

#[derive(Debug, Clone)]
struct MockRule {
    url: String,
    authorization: Option<String>,
    response: MockResponse,
    delay: Option<Duration>,
}

impl MockRule {
    fn matches(&self, request: &HttpRequest) -> bool {
        if !route_matches(&self.url, &request.url) {
            return false;
        }
        match self.authorization {
            Some(ref expected) => request.header("Authorization") == Some(expected.as_str()),
            None => true,
        }
    }
}

/// Whether `url` is `route`, optionally followed by a query string.
fn route_matches(route: &str, url: &str) -> bool {
    match url.strip_prefix(route) {
        Some(rest) => rest.is_empty() || rest.starts_with('?'),
        None => false,
    }
}

/// Mock HTTP client for testing.
///
/// # Example
///
/// ```ignore
/// use realit::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.set_response_for_token(
///     "http://api.test/feed",
///     "expired",
///     MockResponse::status(401),
/// );
/// client.set_response("http://api.test/feed", MockResponse::json(200, json!([])));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    rules: Arc<Mutex<Vec<MockRule>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to every request for the route `url`.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        self.push_rule(url, None, response, None);
    }

    /// Respond to requests carrying `Authorization: Bearer <token>`. Rules
    /// with a token take precedence over rules without one.
    pub fn set_response_for_token(&self, url: &str, token: &str, response: MockResponse) {
        self.push_rule(url, Some(format!("Bearer {}", token)), response, None);
    }

    /// Like [`set_response`](Self::set_response) but wait `delay` first.
    pub fn set_delayed_response(&self, url: &str, delay: Duration, response: MockResponse) {
        self.push_rule(url, None, response, Some(delay));
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        *self.default_response.lock().unwrap() = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Recorded requests for the route `url`, any query string.
    pub fn requests_to(&self, url: &str) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| route_matches(url, &r.url))
            .cloned()
            .collect()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    /// Drop all scripted responses.
    pub fn clear_responses(&self) {
        self.rules.lock().unwrap().clear();
    }

    fn push_rule(
        &self,
        url: &str,
        authorization: Option<String>,
        response: MockResponse,
        delay: Option<Duration>,
    ) {
        self.rules.lock().unwrap().push(MockRule {
            url: url.to_string(),
            authorization,
            response,
            delay,
        });
    }

    fn find_rule(&self, request: &HttpRequest) -> Option<(MockResponse, Option<Duration>)> {
        let rules = self.rules.lock().unwrap();
        let mut matching = rules.iter().filter(|rule| rule.matches(request));
        let with_auth = rules
            .iter()
            .find(|rule| rule.authorization.is_some() && rule.matches(request));

        with_auth
            .or_else(|| matching.next())
            .map(|rule| (rule.response.clone(), rule.delay))
            .or_else(|| {
                self.default_response
                    .lock()
                    .unwrap()
                    .clone()
                    .map(|response| (response, None))
            })
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn send(&self, request: &HttpRequest) -> Result<Response, HttpError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: request.method,
            url: request.url.clone(),
            headers: request.headers.clone(),
            body: request.body.clone(),
        });

        let Some((response, delay)) = self.find_rule(request) else {
            return Err(HttpError::Other(format!(
                "No mock response for URL: {}",
                request.url
            )));
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match response {
            MockResponse::Success(response) => Ok(response),
            MockResponse::Error(err) => Err(err),
        }
    }
}
