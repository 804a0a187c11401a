//! Typed contract of the threads server.

use async_trait::async_trait;

use crate::config::AuthToken;
use crate::model::{FeedItem, Post, PostId, Repost, RepostId, Thread, User, UserId};

use super::error::ApiError;
use super::types::{AuthSession, Credentials, NewAccount, NewPost, PostEdit, ProfileEdit};

/// Remote data service.
///
/// Every call either returns the server's representation or a typed
/// [`ApiError`]. Implementations do no caching; the store owns all cached
/// state. Calls that write require a token set via [`RemoteService::set_token`].
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Install or forget the bearer token used for authenticated calls.
    fn set_token(&self, token: Option<AuthToken>);

    // Posts
    async fn list_feed(&self) -> Result<Vec<FeedItem>, ApiError>;
    async fn get_thread(&self, id: &PostId) -> Result<Thread, ApiError>;
    async fn list_user_posts(&self, user: &UserId) -> Result<Vec<FeedItem>, ApiError>;
    async fn list_user_replies(&self, user: &UserId) -> Result<Vec<Post>, ApiError>;
    async fn create_post(&self, post: NewPost) -> Result<Post, ApiError>;
    async fn create_reply(&self, parent: &PostId, reply: NewPost) -> Result<Post, ApiError>;
    async fn edit_post(&self, id: &PostId, edit: PostEdit) -> Result<Post, ApiError>;
    async fn delete_post(&self, id: &PostId) -> Result<(), ApiError>;
    async fn like_post(&self, id: &PostId) -> Result<(), ApiError>;
    async fn unlike_post(&self, id: &PostId) -> Result<(), ApiError>;

    // Reposts
    async fn list_user_reposts(&self, user: &UserId) -> Result<Vec<Repost>, ApiError>;
    async fn create_repost(&self, post: &PostId) -> Result<Repost, ApiError>;
    async fn delete_repost(&self, id: &RepostId) -> Result<(), ApiError>;

    // Users
    async fn login(&self, credentials: Credentials) -> Result<AuthSession, ApiError>;
    async fn signup(&self, account: NewAccount) -> Result<AuthSession, ApiError>;
    async fn current_user(&self) -> Result<User, ApiError>;
    async fn get_user(&self, id: &UserId) -> Result<User, ApiError>;
    async fn update_user(&self, edit: ProfileEdit) -> Result<User, ApiError>;
    async fn follow(&self, id: &UserId) -> Result<(), ApiError>;
    async fn unfollow(&self, id: &UserId) -> Result<(), ApiError>;
}
