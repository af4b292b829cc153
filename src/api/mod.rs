//! Authenticated access to the Realit REST API.

pub mod client;
pub mod pipeline;
pub mod request;

pub use client::ApiClient;
pub use pipeline::{DefaultHeaders, Pipeline, RequestId, RequestStage};
pub use request::ApiRequest;
