//! Request stages applied before authentication.
//!
//! Each stage is a small transform over [`ApiRequest`]. The client applies
//! them in registration order and then attaches the access credential.

use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use super::request::ApiRequest;
use crate::traits::Headers;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// A transform applied to every outgoing request.
pub trait RequestStage: Send + Sync + fmt::Debug {
    fn apply(&self, request: ApiRequest) -> ApiRequest;
}

/// Adds headers the request does not already carry.
#[derive(Debug, Clone, Default)]
pub struct DefaultHeaders {
    headers: Headers,
}

impl DefaultHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Content-Type: application/json`, `Accept: application/json` and the
    /// given user agent.
    pub fn json(user_agent: &str) -> Self {
        Self::new()
            .with("Content-Type", "application/json")
            .with("Accept", "application/json")
            .with("User-Agent", user_agent)
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

impl RequestStage for DefaultHeaders {
    fn apply(&self, mut request: ApiRequest) -> ApiRequest {
        for (name, value) in &self.headers {
            if !request.has_header(name) {
                request.headers.insert(name.clone(), value.clone());
            }
        }
        request
    }
}

/// Tags each request with a random `X-Request-Id`. A replay keeps the id of
/// the original attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestId;

impl RequestStage for RequestId {
    fn apply(&self, request: ApiRequest) -> ApiRequest {
        if request.has_header(REQUEST_ID_HEADER) {
            return request;
        }
        request.with_header(REQUEST_ID_HEADER, Uuid::new_v4().to_string())
    }
}

/// Ordered list of stages.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    stages: Vec<Arc<dyn RequestStage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stage(mut self, stage: impl RequestStage + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn apply(&self, request: ApiRequest) -> ApiRequest {
        self.stages
            .iter()
            .fold(request, |request, stage| stage.apply(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_headers_do_not_override() {
        let stage = DefaultHeaders::json("realit/test");
        let request = ApiRequest::get("/feed").with_header("accept", "text/plain");

        let request = stage.apply(request);

        assert_eq!(request.header("Accept"), Some("text/plain"));
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(request.header("User-Agent"), Some("realit/test"));
        assert_eq!(request.headers.len(), 3);
    }

    #[test]
    fn test_request_id_is_stable_across_replays() {
        let request = RequestId.apply(ApiRequest::get("/feed"));
        let id = request.header(REQUEST_ID_HEADER).unwrap().to_string();
        assert!(Uuid::parse_str(&id).is_ok());

        let replay = RequestId.apply(request);
        assert_eq!(replay.header(REQUEST_ID_HEADER), Some(id.as_str()));
    }

    #[test]
    fn test_request_ids_differ() {
        let a = RequestId.apply(ApiRequest::get("/feed"));
        let b = RequestId.apply(ApiRequest::get("/feed"));
        assert_ne!(a.header(REQUEST_ID_HEADER), b.header(REQUEST_ID_HEADER));
    }

    #[test]
    fn test_pipeline_applies_in_order() {
        #[derive(Debug)]
        struct Tag(&'static str);
        impl RequestStage for Tag {
            fn apply(&self, request: ApiRequest) -> ApiRequest {
                let trail = request.header("X-Trail").unwrap_or_default().to_string();
                request.with_header("X-Trail", format!("{}{}", trail, self.0))
            }
        }

        let pipeline = Pipeline::new().with_stage(Tag("a")).with_stage(Tag("b"));
        let request = pipeline.apply(ApiRequest::get("/"));

        assert_eq!(pipeline.len(), 2);
        assert_eq!(request.header("X-Trail"), Some("ab"));
    }

    #[test]
    fn test_empty_pipeline_is_identity() {
        let request = ApiRequest::post("/post");
        assert_eq!(Pipeline::new().apply(request.clone()), request);
    }
}
