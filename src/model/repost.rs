use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::RepostId;
use super::post::Post;
use super::user::UserSummary;

/// A post shared by another user.
///
/// `post` is the store's copy of the wrapped post and receives the same
/// updates as every other copy of that post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repost {
    #[serde(rename = "_id")]
    pub id: RepostId,
    pub repost_creator: UserSummary,
    pub post: Post,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
