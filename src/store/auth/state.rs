use crate::config::AuthToken;
use crate::model::{Post, PostId, Repost, RepostId, User, UserId, UserSummary};
use crate::store::mvi::SliceState;
use crate::store::update::{prepend_unique, Containers};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthState {
    pub token: Option<AuthToken>,
    pub user: Option<User>,
    /// Reposts made by the signed-in user, newest first.
    pub reposts: Vec<Repost>,
}

impl SliceState for AuthState {}

impl AuthState {
    pub fn is_signed_in(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    pub fn viewer_id(&self) -> Option<&UserId> {
        self.user.as_ref().map(|u| &u.id)
    }

    /// The signed-in user's repost of `post`, if cached.
    pub fn own_repost_of(&self, post: &PostId) -> Option<&Repost> {
        self.reposts.iter().find(|r| &r.post.id == post)
    }
}

impl Containers for AuthState {
    fn posts_mut(&mut self) -> Vec<&mut Post> {
        self.reposts.iter_mut().map(|r| &mut r.post).collect()
    }

    fn users_mut(&mut self) -> Vec<&mut User> {
        self.user.iter_mut().collect()
    }

    fn repost_creators_mut(&mut self) -> Vec<&mut UserSummary> {
        self.reposts
            .iter_mut()
            .map(|r| &mut r.repost_creator)
            .collect()
    }

    fn remove_post(&mut self, id: &PostId) {
        self.reposts.retain(|r| &r.post.id != id);
    }

    fn insert_repost(&mut self, repost: &Repost) {
        if self.viewer_id() == Some(&repost.repost_creator.id) {
            prepend_unique(&mut self.reposts, repost.clone(), |r| r.id.clone());
        }
    }

    fn remove_repost(&mut self, id: &RepostId) {
        self.reposts.retain(|r| &r.id != id);
    }
}
