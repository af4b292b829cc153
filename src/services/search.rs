//! User search.

use std::sync::Arc;
use tracing::debug;

use crate::api::{ApiClient, ApiRequest};
use crate::error::ApiResult;
use crate::models::UserSummary;

#[derive(Debug, Clone)]
pub struct SearchService {
    client: Arc<ApiClient>,
}

impl SearchService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Search users by name. An empty query returns no results without
    /// contacting the server.
    pub async fn search_users(&self, query: &str) -> ApiResult<Vec<UserSummary>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        debug!("Searching users for {:?}", query);
        let request = ApiRequest::get("/profile/search").with_query("query", query);
        self.client.execute_json(request).await
    }
}
