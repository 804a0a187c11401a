use crate::model::{FeedItem, Thread};
use crate::store::mvi::Intent;

#[derive(Debug, Clone)]
pub enum PostIntent {
    FeedLoaded(Vec<FeedItem>),
    ThreadLoaded(Thread),
    /// User navigated away from the thread page.
    ThreadClosed,
    /// Create or edit form sent; blocks re-submission until resolved.
    FormSubmitted,
    /// Request failed; keep the text for inline display.
    FormFailed(String),
    FormSucceeded,
    /// Dismiss a previous error.
    FormReset,
}

impl Intent for PostIntent {}
