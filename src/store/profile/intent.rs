use crate::model::{FeedItem, Post, User};
use crate::store::mvi::Intent;

#[derive(Debug, Clone)]
pub enum ProfileIntent {
    /// Switching to another user drops the previous user's lists.
    ProfileLoaded(User),
    /// Posts and reposts of the viewed user.
    ItemsLoaded(Vec<FeedItem>),
    RepliesLoaded(Vec<Post>),
    ProfileClosed,
}

impl Intent for ProfileIntent {}
