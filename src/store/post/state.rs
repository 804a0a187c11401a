use crate::model::{FeedItem, Post, PostId, RepostId, Thread, UserSummary};
use crate::store::mvi::SliceState;
use crate::store::update::{prepend_unique, Containers};

/// Create/edit form status.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormState {
    pub pending: bool,
    /// Inline error text from the last failed submission.
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PostState {
    /// Global feed, newest first.
    pub feed: Vec<FeedItem>,
    /// Thread page, if one is open.
    pub thread: Option<Thread>,
    pub form: FormState,
}

impl SliceState for PostState {}

impl PostState {
    pub fn is_thread_open(&self, root: &PostId) -> bool {
        self.thread.as_ref().is_some_and(|t| &t.post.id == root)
    }
}

impl Containers for PostState {
    fn posts_mut(&mut self) -> Vec<&mut Post> {
        let feed = self.feed.iter_mut().map(FeedItem::post_mut);
        let thread = self
            .thread
            .iter_mut()
            .flat_map(|t| std::iter::once(&mut t.post).chain(t.replies.iter_mut()));
        feed.chain(thread).collect()
    }

    fn repost_creators_mut(&mut self) -> Vec<&mut UserSummary> {
        self.feed
            .iter_mut()
            .filter_map(|item| match item {
                FeedItem::Repost(repost) => Some(&mut repost.repost_creator),
                FeedItem::Post(_) => None,
            })
            .collect()
    }

    fn insert_post(&mut self, post: &Post) {
        match &post.parent {
            Some(parent) => {
                if let Some(thread) = self.thread.as_mut().filter(|t| &t.post.id == parent) {
                    if !thread.replies.iter().any(|r| r.id == post.id) {
                        thread.replies.push(post.clone());
                    }
                }
            }
            None => prepend_unique(&mut self.feed, FeedItem::Post(post.clone()), |item| {
                (item.as_repost().is_none(), item.post_id().clone())
            }),
        }
    }

    fn remove_post(&mut self, id: &PostId) {
        self.feed.retain(|item| item.post_id() != id);
        if self.is_thread_open(id) {
            self.thread = None;
        } else if let Some(thread) = self.thread.as_mut() {
            thread.replies.retain(|r| &r.id != id);
        }
    }

    fn remove_repost(&mut self, id: &RepostId) {
        self.feed
            .retain(|item| item.as_repost().map_or(true, |r| &r.id != id));
    }
}
