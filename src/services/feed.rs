//! Home feed.

use std::sync::Arc;

use crate::api::{ApiClient, ApiRequest};
use crate::error::ApiResult;
use crate::models::{FeedPost, FeedQuery};

#[derive(Debug, Clone)]
pub struct FeedService {
    client: Arc<ApiClient>,
}

impl FeedService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Posts from followed users and the user's own, newest first. Only the
    /// query parameters that are set are sent.
    pub async fn get_feed(&self, query: &FeedQuery) -> ApiResult<Vec<FeedPost>> {
        let cursor = query.cursor.as_deref().filter(|c| !c.is_empty());
        let limit = query.limit.filter(|l| *l > 0);
        let request = ApiRequest::get("/feed")
            .with_optional_query("cursor", cursor)
            .with_optional_query("limit", limit);
        self.client.execute_json(request).await
    }
}
