use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_id, deserialize_nullable_string};

/// Kind of media attached to a post. The server uses both cases.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[serde(alias = "IMAGE")]
    Image,
    #[serde(alias = "VIDEO")]
    Video,
}

/// How the post's media was verified at capture time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Verified,
    Ai,
    #[default]
    Unverified,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostMedia {
    pub media_url: String,
    pub media_type: MediaType,
    #[serde(default)]
    pub position: u32,
}

/// A post owned by the signed-in user, from `GET /profile/posts`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostResponse {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub media: Vec<PostMedia>,
    #[serde(default)]
    pub verification_status: VerificationStatus,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub comments_count: u64,
    pub created_at: DateTime<Utc>,
}

/// One media item announced when creating a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostMediaItem {
    pub media_type: MediaType,
    pub size_bytes: u64,
    pub filename: String,
}

/// Body of `POST /post`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
pub struct CreatePostRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_status: Option<VerificationStatus>,
    pub media: Vec<PostMediaItem>,
}

/// Where to upload one media item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostMediaUpload {
    #[serde(deserialize_with = "deserialize_id")]
    pub asset_id: String,
    pub upload_url: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub object_key: String,
}

/// Response of `POST /post`: the new post id and one upload slot per item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatePostResponse {
    #[serde(deserialize_with = "deserialize_id")]
    pub post_id: String,
    #[serde(default)]
    pub media: Vec<PostMediaUpload>,
}

/// Body of `POST /post/confirm`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfirmPostRequest {
    pub post_id: String,
    pub uploaded_asset_ids: Vec<String>,
}

impl ConfirmPostRequest {
    /// Confirm every upload slot of a created post.
    pub fn all_uploaded(created: &CreatePostResponse) -> Self {
        Self {
            post_id: created.post_id.clone(),
            uploaded_asset_ids: created.media.iter().map(|m| m.asset_id.clone()).collect(),
        }
    }
}
