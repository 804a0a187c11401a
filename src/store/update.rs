//! Fan-out of entity updates.
//!
//! A post can be cached in several places at once: the global feed, a repost
//! wrapping it, the open thread, a profile timeline, a profile's replies, the
//! signed-in user's reposts. Every change is described once as an
//! [`EntityUpdate`] and [`fan_out`] applies it to every copy it can reach
//! through the [`Containers`] of a slice. Containers that do not hold the
//! target are left untouched.

use crate::model::{Post, PostId, Repost, RepostId, User, UserId, UserSummary};

/// Change to a single post, applied to each copy of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostChange {
    Like(UserId),
    Unlike(UserId),
    Edit { content: String },
    /// Server's canonical representation.
    Replace(Post),
    Remove,
}

impl PostChange {
    /// Transform one copy of the post. `Remove` is structural and handled by
    /// the containers; here it returns the post unchanged.
    pub fn apply(&self, post: Post) -> Post {
        match self {
            PostChange::Like(actor) => post.liked(actor),
            PostChange::Unlike(actor) => post.unliked(actor),
            PostChange::Edit { content } => Post {
                content: content.clone(),
                ..post
            },
            PostChange::Replace(canonical) => canonical.clone(),
            PostChange::Remove => post,
        }
    }
}

/// Change to a user, applied to each copy of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserChange {
    /// `follower` starts following the target. Also bumps the follower's
    /// `following` count wherever the follower is cached.
    Follow(UserId),
    Unfollow(UserId),
    /// Server-confirmed follow state. Updates the target's followers and
    /// replaces every copy of the follower with the server's copy, so the
    /// `following` count is set rather than adjusted.
    FollowSettled { follower: User, following: bool },
    Replace(User),
}

/// Tagged update message dispatched once and applied to every container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityUpdate {
    Post { id: PostId, change: PostChange },
    /// A post or reply the server just created.
    PostCreated(Post),
    RepostAdded(Repost),
    RepostRemoved(RepostId),
    User { id: UserId, change: UserChange },
}

impl EntityUpdate {
    pub fn post(id: PostId, change: PostChange) -> Self {
        EntityUpdate::Post { id, change }
    }

    pub fn user(id: UserId, change: UserChange) -> Self {
        EntityUpdate::User { id, change }
    }
}

/// Places inside a slice that hold copies of entities.
pub trait Containers {
    /// Every cached post copy, including posts wrapped by reposts.
    fn posts_mut(&mut self) -> Vec<&mut Post>;

    /// Every cached full user.
    fn users_mut(&mut self) -> Vec<&mut User> {
        Vec::new()
    }

    /// `repost_creator` of every cached repost.
    fn repost_creators_mut(&mut self) -> Vec<&mut UserSummary> {
        Vec::new()
    }

    /// Place a freshly created post or reply wherever it belongs.
    fn insert_post(&mut self, _post: &Post) {}

    /// Drop every copy of the post and every repost wrapping it.
    fn remove_post(&mut self, id: &PostId);

    fn insert_repost(&mut self, _repost: &Repost) {}

    fn remove_repost(&mut self, id: &RepostId);
}

/// Apply `update` to every copy held by `containers`.
pub fn fan_out<C: Containers + ?Sized>(containers: &mut C, update: &EntityUpdate) {
    match update {
        EntityUpdate::Post {
            id,
            change: PostChange::Remove,
        } => {
            containers.remove_post(id);
            for post in containers.posts_mut() {
                if post.children.contains(id) {
                    *post = post.clone().without_child(id);
                }
            }
        }
        EntityUpdate::Post { id, change } => {
            for post in containers.posts_mut() {
                if &post.id == id {
                    *post = change.apply(post.clone());
                }
            }
        }
        EntityUpdate::PostCreated(created) => {
            if let Some(parent) = &created.parent {
                for post in containers.posts_mut() {
                    if &post.id == parent {
                        *post = post.clone().with_child(&created.id);
                    }
                }
            }
            containers.insert_post(created);
        }
        EntityUpdate::RepostAdded(repost) => containers.insert_repost(repost),
        EntityUpdate::RepostRemoved(id) => containers.remove_repost(id),
        EntityUpdate::User { id, change } => fan_out_user(containers, id, change),
    }
}

fn fan_out_user<C: Containers + ?Sized>(containers: &mut C, id: &UserId, change: &UserChange) {
    match change {
        UserChange::Follow(follower) => {
            for user in containers.users_mut() {
                if &user.id == id && !user.is_followed_by(follower) {
                    *user = user.clone().with_follower(follower);
                } else if &user.id == follower {
                    user.following += 1;
                }
            }
        }
        UserChange::Unfollow(follower) => {
            for user in containers.users_mut() {
                if &user.id == id {
                    *user = user.clone().without_follower(follower);
                } else if &user.id == follower {
                    user.following = user.following.saturating_sub(1);
                }
            }
        }
        UserChange::FollowSettled { follower, following } => {
            for user in containers.users_mut() {
                if &user.id == id {
                    *user = if *following {
                        user.clone().with_follower(&follower.id)
                    } else {
                        user.clone().without_follower(&follower.id)
                    };
                } else if user.id == follower.id {
                    *user = follower.clone();
                }
            }
        }
        UserChange::Replace(canonical) => {
            for user in containers.users_mut() {
                if &user.id == id {
                    *user = canonical.clone();
                }
            }
            let summary = canonical.summary();
            for post in containers.posts_mut() {
                if &post.creator.id == id {
                    post.creator = summary.clone();
                }
            }
            for creator in containers.repost_creators_mut() {
                if &creator.id == id {
                    *creator = summary.clone();
                }
            }
        }
    }
}

/// Insert `item` at the front of `list` unless an element with the same key exists.
pub(crate) fn prepend_unique<T, K: PartialEq>(list: &mut Vec<T>, item: T, key: impl Fn(&T) -> K) {
    let k = key(&item);
    if !list.iter().any(|existing| key(existing) == k) {
        list.insert(0, item);
    }
}
