//! The signed-in user's profile and posts.

use std::sync::Arc;

use crate::api::{ApiClient, ApiRequest};
use crate::error::ApiResult;
use crate::models::{PaginationQuery, PostResponse, ProfileResponse};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_POSTS_LIMIT: u32 = 12;

#[derive(Debug, Clone)]
pub struct ProfileService {
    client: Arc<ApiClient>,
}

impl ProfileService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn get_profile(&self) -> ApiResult<ProfileResponse> {
        self.client.get("/profile").await
    }

    /// One page of the user's posts (default page 1, 12 per page).
    pub async fn get_user_posts(&self, query: PaginationQuery) -> ApiResult<Vec<PostResponse>> {
        let request = ApiRequest::get("/profile/posts")
            .with_query("page", query.page.unwrap_or(DEFAULT_PAGE))
            .with_query("limit", query.limit.unwrap_or(DEFAULT_POSTS_LIMIT));
        self.client.execute_json(request).await
    }
}
