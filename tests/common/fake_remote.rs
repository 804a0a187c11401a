//! In-memory `RemoteService` for coordinator tests.
//!
//! Keeps a tiny server-side model (posts, users, reposts), records every call
//! and lets a test fail an operation or hold it at a gate until released.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use threads_client::api::{
    ApiError, AuthSession, Credentials, NewAccount, NewPost, PostEdit, ProfileEdit, RemoteService,
};
use threads_client::config::AuthToken;
use threads_client::model::{FeedItem, Post, PostId, Repost, RepostId, Thread, User, UserId};

/// Handle to a held call.
pub struct Gate {
    entered: oneshot::Receiver<()>,
    release: oneshot::Sender<()>,
}

impl Gate {
    /// Wait until the held call has reached the fake.
    pub async fn entered(&mut self) {
        let _ = (&mut self.entered).await;
    }

    pub fn release(self) {
        let _ = self.release.send(());
    }
}

struct Held {
    entered: oneshot::Sender<()>,
    release: oneshot::Receiver<()>,
}

#[derive(Default)]
struct World {
    token: Option<AuthToken>,
    me: Option<User>,
    users: HashMap<UserId, User>,
    posts: Vec<Post>,
    reposts: Vec<Repost>,
    failures: HashMap<&'static str, ApiError>,
    calls: Vec<String>,
    next_id: u64,
}

#[derive(Default)]
pub struct FakeRemote {
    world: Mutex<World>,
    held: Mutex<HashMap<&'static str, Held>>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// The user the fake answers `current_user` and authorship with.
    pub fn with_me(self, user: User) -> Self {
        {
            let mut world = self.world.lock();
            world.users.insert(user.id.clone(), user.clone());
            world.me = Some(user);
        }
        self
    }

    pub fn with_user(self, user: User) -> Self {
        self.world.lock().users.insert(user.id.clone(), user);
        self
    }

    pub fn with_posts(self, posts: Vec<Post>) -> Self {
        self.world.lock().posts.extend(posts);
        self
    }

    pub fn with_reposts(self, reposts: Vec<Repost>) -> Self {
        self.world.lock().reposts.extend(reposts);
        self
    }

    /// Make every later call to `op` fail with `err`.
    pub fn fail(&self, op: &'static str, err: ApiError) {
        self.world.lock().failures.insert(op, err);
    }

    pub fn recover(&self, op: &'static str) {
        self.world.lock().failures.remove(op);
    }

    /// Hold the next call to `op` until the returned gate is released.
    pub fn hold(&self, op: &'static str) -> Gate {
        let (entered_tx, entered_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        self.held.lock().insert(
            op,
            Held {
                entered: entered_tx,
                release: release_rx,
            },
        );
        Gate {
            entered: entered_rx,
            release: release_tx,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.world.lock().calls.clone()
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.world
            .lock()
            .calls
            .iter()
            .filter(|c| c.as_str() == op)
            .count()
    }

    pub fn token(&self) -> Option<AuthToken> {
        self.world.lock().token.clone()
    }

    pub fn server_post(&self, id: &str) -> Option<Post> {
        let id = PostId::from(id);
        self.world.lock().posts.iter().find(|p| p.id == id).cloned()
    }

    /// Record the call, wait at its gate if held, then apply any injected failure.
    async fn enter(&self, op: &'static str) -> Result<(), ApiError> {
        self.world.lock().calls.push(op.to_string());
        let held = self.held.lock().remove(op);
        if let Some(held) = held {
            let _ = held.entered.send(());
            let _ = held.release.await;
        }
        match self.world.lock().failures.get(op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn me(&self) -> Result<User, ApiError> {
        let world = self.world.lock();
        if world.token.is_none() {
            return Err(ApiError::Unauthorized("no token".to_string()));
        }
        world
            .me
            .clone()
            .ok_or_else(|| ApiError::Unauthorized("unknown token".to_string()))
    }

    /// Server-side follow bookkeeping: the target's followers and the
    /// follower's `following` count, changed only when the relation flips.
    fn set_following(&self, follower: &UserId, target: &UserId, following: bool) {
        let mut world = self.world.lock();
        let Some(user) = world.users.get_mut(target) else {
            return;
        };
        if user.is_followed_by(follower) == following {
            return;
        }
        *user = if following {
            user.clone().with_follower(follower)
        } else {
            user.clone().without_follower(follower)
        };
        let mut me = world.me.clone();
        if let Some(me) = me.as_mut().filter(|me| &me.id == follower) {
            me.following = if following {
                me.following + 1
            } else {
                me.following.saturating_sub(1)
            };
            world.users.insert(me.id.clone(), me.clone());
        }
        world.me = me;
    }

    fn next_id(&self, prefix: &str) -> String {
        let mut world = self.world.lock();
        world.next_id += 1;
        format!("{}-{}", prefix, world.next_id)
    }

    fn find_post(&self, id: &PostId) -> Result<Post, ApiError> {
        self.world
            .lock()
            .posts
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("post {}", id)))
    }

    fn store_post(&self, new: NewPost, parent: Option<PostId>) -> Result<Post, ApiError> {
        let me = self.me()?;
        let now = Utc::now();
        let post = Post {
            id: PostId::new(self.next_id("post")),
            creator: me.summary(),
            content: new.content,
            image: None,
            likes: 0,
            liked_by: vec![],
            children: vec![],
            parent: parent.clone(),
            created_at: now,
            updated_at: now,
        };
        let mut world = self.world.lock();
        if let Some(parent) = &parent {
            for p in world.posts.iter_mut().filter(|p| &p.id == parent) {
                p.children.push(post.id.clone());
            }
        }
        world.posts.push(post.clone());
        Ok(post)
    }

    fn session_for(&self, username: &str) -> AuthSession {
        let mut world = self.world.lock();
        let user = world
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
            .unwrap_or_else(|| super::user(username));
        let token = AuthToken::new(format!("token-{}", username));
        world.users.insert(user.id.clone(), user.clone());
        world.me = Some(user.clone());
        world.token = Some(token.clone());
        AuthSession { token, user }
    }
}

#[async_trait]
impl RemoteService for FakeRemote {
    fn set_token(&self, token: Option<AuthToken>) {
        self.world.lock().token = token;
    }

    async fn list_feed(&self) -> Result<Vec<FeedItem>, ApiError> {
        self.enter("list_feed").await?;
        let world = self.world.lock();
        Ok(world
            .posts
            .iter()
            .filter(|p| !p.is_reply())
            .rev()
            .cloned()
            .map(FeedItem::Post)
            .collect())
    }

    async fn get_thread(&self, id: &PostId) -> Result<Thread, ApiError> {
        self.enter("get_thread").await?;
        let post = self.find_post(id)?;
        let replies = self
            .world
            .lock()
            .posts
            .iter()
            .filter(|p| p.parent.as_ref() == Some(id))
            .cloned()
            .collect();
        Ok(Thread { post, replies })
    }

    async fn list_user_posts(&self, user: &UserId) -> Result<Vec<FeedItem>, ApiError> {
        self.enter("list_user_posts").await?;
        let world = self.world.lock();
        let posts = world
            .posts
            .iter()
            .filter(|p| &p.creator.id == user && !p.is_reply())
            .cloned()
            .map(FeedItem::Post);
        let reposts = world
            .reposts
            .iter()
            .filter(|r| &r.repost_creator.id == user)
            .cloned()
            .map(FeedItem::Repost);
        Ok(posts.chain(reposts).collect())
    }

    async fn list_user_replies(&self, user: &UserId) -> Result<Vec<Post>, ApiError> {
        self.enter("list_user_replies").await?;
        Ok(self
            .world
            .lock()
            .posts
            .iter()
            .filter(|p| &p.creator.id == user && p.is_reply())
            .cloned()
            .collect())
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, ApiError> {
        self.enter("create_post").await?;
        self.store_post(post, None)
    }

    async fn create_reply(&self, parent: &PostId, reply: NewPost) -> Result<Post, ApiError> {
        self.enter("create_reply").await?;
        self.find_post(parent)?;
        self.store_post(reply, Some(parent.clone()))
    }

    async fn edit_post(&self, id: &PostId, edit: PostEdit) -> Result<Post, ApiError> {
        self.enter("edit_post").await?;
        let mut world = self.world.lock();
        let post = world
            .posts
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("post {}", id)))?;
        post.content = edit.content;
        post.updated_at = Utc::now();
        Ok(post.clone())
    }

    async fn delete_post(&self, id: &PostId) -> Result<(), ApiError> {
        self.enter("delete_post").await?;
        let mut world = self.world.lock();
        let before = world.posts.len();
        world.posts.retain(|p| &p.id != id);
        if world.posts.len() == before {
            return Err(ApiError::NotFound(format!("post {}", id)));
        }
        Ok(())
    }

    async fn like_post(&self, id: &PostId) -> Result<(), ApiError> {
        self.enter("like_post").await?;
        let me = self.me()?;
        let mut world = self.world.lock();
        if let Some(post) = world.posts.iter_mut().find(|p| &p.id == id) {
            *post = post.clone().liked(&me.id);
        }
        Ok(())
    }

    async fn unlike_post(&self, id: &PostId) -> Result<(), ApiError> {
        self.enter("unlike_post").await?;
        let me = self.me()?;
        let mut world = self.world.lock();
        if let Some(post) = world.posts.iter_mut().find(|p| &p.id == id) {
            *post = post.clone().unliked(&me.id);
        }
        Ok(())
    }

    async fn list_user_reposts(&self, user: &UserId) -> Result<Vec<Repost>, ApiError> {
        self.enter("list_user_reposts").await?;
        Ok(self
            .world
            .lock()
            .reposts
            .iter()
            .filter(|r| &r.repost_creator.id == user)
            .cloned()
            .collect())
    }

    async fn create_repost(&self, post: &PostId) -> Result<Repost, ApiError> {
        self.enter("create_repost").await?;
        let me = self.me()?;
        let post = self.find_post(post)?;
        let now = Utc::now();
        let repost = Repost {
            id: RepostId::new(self.next_id("repost")),
            repost_creator: me.summary(),
            post,
            created_at: now,
            updated_at: now,
        };
        self.world.lock().reposts.push(repost.clone());
        Ok(repost)
    }

    async fn delete_repost(&self, id: &RepostId) -> Result<(), ApiError> {
        self.enter("delete_repost").await?;
        let mut world = self.world.lock();
        let before = world.reposts.len();
        world.reposts.retain(|r| &r.id != id);
        if world.reposts.len() == before {
            return Err(ApiError::NotFound(format!("repost {}", id)));
        }
        Ok(())
    }

    async fn login(&self, credentials: Credentials) -> Result<AuthSession, ApiError> {
        self.enter("login").await?;
        Ok(self.session_for(&credentials.username))
    }

    async fn signup(&self, account: NewAccount) -> Result<AuthSession, ApiError> {
        self.enter("signup").await?;
        let taken = self
            .world
            .lock()
            .users
            .values()
            .any(|u| u.username == account.username);
        if taken {
            return Err(ApiError::Conflict("username taken".to_string()));
        }
        Ok(self.session_for(&account.username))
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        self.enter("current_user").await?;
        self.me()
    }

    async fn get_user(&self, id: &UserId) -> Result<User, ApiError> {
        self.enter("get_user").await?;
        self.world
            .lock()
            .users
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("user {}", id)))
    }

    async fn update_user(&self, edit: ProfileEdit) -> Result<User, ApiError> {
        self.enter("update_user").await?;
        let mut me = self.me()?;
        if let Some(name) = edit.name {
            me.name = name;
        }
        if let Some(bio) = edit.bio {
            me.bio = bio;
        }
        if let Some(link) = edit.link {
            me.link = Some(link);
        }
        let mut world = self.world.lock();
        world.users.insert(me.id.clone(), me.clone());
        world.me = Some(me.clone());
        Ok(me)
    }

    async fn follow(&self, id: &UserId) -> Result<(), ApiError> {
        self.enter("follow").await?;
        let me = self.me()?;
        self.set_following(&me.id, id, true);
        Ok(())
    }

    async fn unfollow(&self, id: &UserId) -> Result<(), ApiError> {
        self.enter("unfollow").await?;
        let me = self.me()?;
        self.set_following(&me.id, id, false);
        Ok(())
    }
}
