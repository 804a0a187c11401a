use crate::model::{FeedItem, Post, PostId, Repost, RepostId, User, UserId, UserSummary};
use crate::store::mvi::SliceState;
use crate::store::update::{prepend_unique, Containers};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileState {
    pub user: Option<User>,
    /// Posts and reposts, newest first.
    pub items: Vec<FeedItem>,
    pub replies: Vec<Post>,
}

impl SliceState for ProfileState {}

impl ProfileState {
    pub fn user_id(&self) -> Option<&UserId> {
        self.user.as_ref().map(|u| &u.id)
    }

    fn shows(&self, user: &UserId) -> bool {
        self.user_id() == Some(user)
    }
}

/// Identity of a timeline entry: reposts and the post they wrap are distinct.
fn item_key(item: &FeedItem) -> String {
    match item {
        FeedItem::Post(post) => format!("post:{}", post.id),
        FeedItem::Repost(repost) => format!("repost:{}", repost.id),
    }
}

impl Containers for ProfileState {
    fn posts_mut(&mut self) -> Vec<&mut Post> {
        self.items
            .iter_mut()
            .map(FeedItem::post_mut)
            .chain(self.replies.iter_mut())
            .collect()
    }

    fn users_mut(&mut self) -> Vec<&mut User> {
        self.user.iter_mut().collect()
    }

    fn repost_creators_mut(&mut self) -> Vec<&mut UserSummary> {
        self.items
            .iter_mut()
            .filter_map(|item| match item {
                FeedItem::Repost(repost) => Some(&mut repost.repost_creator),
                FeedItem::Post(_) => None,
            })
            .collect()
    }

    fn insert_post(&mut self, post: &Post) {
        if !self.shows(&post.creator.id) {
            return;
        }
        if post.is_reply() {
            prepend_unique(&mut self.replies, post.clone(), |p| p.id.clone());
        } else {
            prepend_unique(&mut self.items, FeedItem::Post(post.clone()), item_key);
        }
    }

    fn remove_post(&mut self, id: &PostId) {
        self.items.retain(|item| item.post_id() != id);
        self.replies.retain(|p| &p.id != id);
    }

    fn insert_repost(&mut self, repost: &Repost) {
        if self.shows(&repost.repost_creator.id) {
            prepend_unique(&mut self.items, FeedItem::Repost(repost.clone()), item_key);
        }
    }

    fn remove_repost(&mut self, id: &RepostId) {
        self.items
            .retain(|item| item.as_repost().map_or(true, |r| &r.id != id));
    }
}
