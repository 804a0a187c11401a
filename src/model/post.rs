use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{PostId, UserId};
use super::user::UserSummary;

/// Image attachment stored on the media host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub url: String,
    /// Opaque identifier the media host uses for deletion.
    pub public_id: String,
}

/// A post or a reply.
///
/// Replies are posts with `parent` set; the parent lists them in `children`.
/// `likes` mirrors `liked_by.len()` for well-formed server documents and every
/// transform in this module keeps the two in step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: PostId,
    pub creator: UserSummary,
    pub content: String,
    #[serde(default)]
    pub image: Option<Image>,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub liked_by: Vec<UserId>,
    #[serde(default)]
    pub children: Vec<PostId>,
    #[serde(default)]
    pub parent: Option<PostId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn is_reply(&self) -> bool {
        self.parent.is_some()
    }

    pub fn is_liked_by(&self, user: &UserId) -> bool {
        self.liked_by.contains(user)
    }

    /// Record a like from `actor`. Liking twice is a no-op.
    pub fn liked(mut self, actor: &UserId) -> Self {
        if !self.is_liked_by(actor) {
            self.liked_by.push(actor.clone());
            self.likes += 1;
        }
        self
    }

    /// Exact inverse of [`Post::liked`].
    pub fn unliked(mut self, actor: &UserId) -> Self {
        if let Some(pos) = self.liked_by.iter().position(|u| u == actor) {
            self.liked_by.remove(pos);
            self.likes = self.likes.saturating_sub(1);
        }
        self
    }

    pub fn with_child(mut self, child: &PostId) -> Self {
        if !self.children.contains(child) {
            self.children.push(child.clone());
        }
        self
    }

    pub fn without_child(mut self, child: &PostId) -> Self {
        self.children.retain(|c| c != child);
        self
    }
}

/// A post page: the root post and its direct replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub post: Post,
    #[serde(default)]
    pub replies: Vec<Post>,
}
