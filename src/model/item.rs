use serde::{Deserialize, Serialize};

use super::ids::{PostId, UserId};
use super::post::Post;
use super::repost::Repost;

/// Entry of a mixed timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "itemType")]
pub enum FeedItem {
    Post(Post),
    Repost(Repost),
}

impl FeedItem {
    /// The post shown by this item, wrapped or not.
    pub fn post(&self) -> &Post {
        match self {
            FeedItem::Post(post) => post,
            FeedItem::Repost(repost) => &repost.post,
        }
    }

    pub fn post_mut(&mut self) -> &mut Post {
        match self {
            FeedItem::Post(post) => post,
            FeedItem::Repost(repost) => &mut repost.post,
        }
    }

    pub fn post_id(&self) -> &PostId {
        &self.post().id
    }

    /// The user who put this item on the timeline.
    pub fn author(&self) -> &UserId {
        match self {
            FeedItem::Post(post) => &post.creator.id,
            FeedItem::Repost(repost) => &repost.repost_creator.id,
        }
    }

    pub fn as_repost(&self) -> Option<&Repost> {
        match self {
            FeedItem::Repost(repost) => Some(repost),
            FeedItem::Post(_) => None,
        }
    }
}
