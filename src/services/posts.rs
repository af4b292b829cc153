//! Post creation.
//!
//! Creating a post is two calls: `create_post` announces the media and
//! returns one upload slot per item, and `confirm_post` marks the uploaded
//! assets once the caller has transferred them.

use std::sync::Arc;

use crate::api::{ApiClient, ApiRequest};
use crate::error::{ApiError, ApiResult};
use crate::models::{ConfirmPostRequest, CreatePostRequest, CreatePostResponse};

#[derive(Debug, Clone)]
pub struct PostsService {
    client: Arc<ApiClient>,
}

impl PostsService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn create_post(&self, request: &CreatePostRequest) -> ApiResult<CreatePostResponse> {
        self.client.post("/post", request).await
    }

    /// Returns the server's confirmation body as-is.
    pub async fn confirm_post(&self, request: &ConfirmPostRequest) -> ApiResult<serde_json::Value> {
        let request = ApiRequest::post("/post/confirm").with_json(request)?;
        let response = self.client.execute(request).await?;
        if response.body.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        response
            .json()
            .map_err(|err| ApiError::Decode(err.to_string()))
    }
}
