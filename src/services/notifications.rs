//! Activity notifications.

use std::sync::Arc;

use crate::api::{ApiClient, ApiRequest};
use crate::error::ApiResult;
use crate::models::{MarkReadRequest, Notification};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 30;

#[derive(Debug, Clone)]
pub struct NotificationsService {
    client: Arc<ApiClient>,
}

impl NotificationsService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// One page of notifications, newest first.
    pub async fn get_notifications(&self, page: u32, limit: u32) -> ApiResult<Vec<Notification>> {
        let request = ApiRequest::get("/notifications")
            .with_query("page", page)
            .with_query("limit", limit);
        self.client.execute_json(request).await
    }

    /// The first page with the default page size.
    pub async fn latest(&self) -> ApiResult<Vec<Notification>> {
        self.get_notifications(DEFAULT_PAGE, DEFAULT_LIMIT).await
    }

    pub async fn mark_as_read(&self, ids: &[String]) -> ApiResult<()> {
        let body = MarkReadRequest { ids: ids.to_vec() };
        let request = ApiRequest::patch("/notifications/read").with_json(&body)?;
        self.client.execute_unit(request).await
    }

    pub async fn mark_all_as_read(&self) -> ApiResult<()> {
        self.client
            .execute_unit(ApiRequest::patch("/notifications/read-all"))
            .await
    }
}
