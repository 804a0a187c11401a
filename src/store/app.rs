//! Root state and reducer combining the three slices.

use crate::model::{FeedItem, Post, PostId, Repost, User, UserId};

use super::auth::{AuthIntent, AuthReducer, AuthState};
use super::mvi::{Intent, Reducer, SliceState};
use super::post::{PostIntent, PostReducer, PostState};
use super::profile::{ProfileIntent, ProfileReducer, ProfileState};
use super::update::{fan_out, Containers, EntityUpdate};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub auth: AuthState,
    pub post: PostState,
    pub profile: ProfileState,
}

impl SliceState for AppState {}

#[derive(Debug, Clone)]
pub enum Action {
    Auth(AuthIntent),
    Post(PostIntent),
    Profile(ProfileIntent),
    /// Applied to every slice in the same reduction.
    Entity(EntityUpdate),
}

impl Intent for Action {}

impl From<AuthIntent> for Action {
    fn from(intent: AuthIntent) -> Self {
        Action::Auth(intent)
    }
}

impl From<PostIntent> for Action {
    fn from(intent: PostIntent) -> Self {
        Action::Post(intent)
    }
}

impl From<ProfileIntent> for Action {
    fn from(intent: ProfileIntent) -> Self {
        Action::Profile(intent)
    }
}

impl From<EntityUpdate> for Action {
    fn from(update: EntityUpdate) -> Self {
        Action::Entity(update)
    }
}

pub struct AppReducer;

impl Reducer for AppReducer {
    type State = AppState;
    type Intent = Action;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            Action::Auth(intent) => AppState {
                auth: AuthReducer::reduce(state.auth, intent),
                ..state
            },
            Action::Post(intent) => AppState {
                post: PostReducer::reduce(state.post, intent),
                ..state
            },
            Action::Profile(intent) => AppState {
                profile: ProfileReducer::reduce(state.profile, intent),
                ..state
            },
            Action::Entity(update) => {
                let mut state = state;
                state.apply(&update);
                state
            }
        }
    }
}

impl AppState {
    /// Apply an entity update to every slice.
    pub fn apply(&mut self, update: &EntityUpdate) {
        let slices: [&mut dyn Containers; 3] = [&mut self.auth, &mut self.post, &mut self.profile];
        for slice in slices {
            fan_out(slice, update);
        }
    }

    pub fn viewer(&self) -> Option<&User> {
        self.auth.user.as_ref()
    }

    pub fn viewer_id(&self) -> Option<&UserId> {
        self.auth.viewer_id()
    }

    /// Any cached copy of the post. All copies are identical after fan-out.
    pub fn find_post(&self, id: &PostId) -> Option<&Post> {
        let feed = self.post.feed.iter().map(FeedItem::post);
        let thread = self
            .post
            .thread
            .iter()
            .flat_map(|t| std::iter::once(&t.post).chain(t.replies.iter()));
        let profile = self
            .profile
            .items
            .iter()
            .map(FeedItem::post)
            .chain(self.profile.replies.iter());
        let reposts = self.auth.reposts.iter().map(|r| &r.post);

        feed.chain(thread)
            .chain(profile)
            .chain(reposts)
            .find(|p| &p.id == id)
    }

    /// Any cached copy of the user.
    pub fn find_user(&self, id: &UserId) -> Option<&User> {
        self.auth
            .user
            .iter()
            .chain(self.profile.user.iter())
            .find(|u| &u.id == id)
    }

    /// The signed-in user's repost of `post`.
    pub fn own_repost_of(&self, post: &PostId) -> Option<&Repost> {
        self.auth.own_repost_of(post)
    }
}
