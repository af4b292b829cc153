//! Typed wrappers over the Realit REST endpoints.
//!
//! Every service shares one [`ApiClient`], so all of them take part in the
//! same credential refresh.

pub mod auth;
pub mod feed;
pub mod notifications;
pub mod posts;
pub mod profile;
pub mod search;

use std::sync::Arc;

use crate::api::ApiClient;

pub use auth::AuthService;
pub use feed::FeedService;
pub use notifications::NotificationsService;
pub use posts::PostsService;
pub use profile::ProfileService;
pub use search::SearchService;

/// All services over one shared client.
#[derive(Debug, Clone)]
pub struct Services {
    pub client: Arc<ApiClient>,
    pub auth: AuthService,
    pub profile: ProfileService,
    pub feed: FeedService,
    pub posts: PostsService,
    pub search: SearchService,
    pub notifications: NotificationsService,
}

impl Services {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            auth: AuthService::new(Arc::clone(&client)),
            profile: ProfileService::new(Arc::clone(&client)),
            feed: FeedService::new(Arc::clone(&client)),
            posts: PostsService::new(Arc::clone(&client)),
            search: SearchService::new(Arc::clone(&client)),
            notifications: NotificationsService::new(Arc::clone(&client)),
            client,
        }
    }
}
