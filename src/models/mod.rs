pub mod auth;
pub mod feed;
pub mod notification;
pub mod post;
pub mod profile;
pub mod user;

pub use auth::{AuthResponse, LoginRequest, SignupRequest};
pub use feed::{FeedPost, FeedPostAuthor, FeedQuery};
pub use notification::{MarkReadRequest, Notification, NotificationActor, NotificationType};
pub use post::{
    ConfirmPostRequest, CreatePostRequest, CreatePostResponse, MediaType, PostMedia,
    PostMediaItem, PostMediaUpload, PostResponse, VerificationStatus,
};
pub use profile::{PaginationQuery, ProfileResponse};
pub use user::UserSummary;

use serde::{Deserialize, Deserializer};

/// Helper to deserialize id as either string or integer
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer")
        }

        fn visit_str<E>(self, value: &str) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

/// Helper for nullable text fields the server sometimes omits.
pub(crate) fn deserialize_nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
