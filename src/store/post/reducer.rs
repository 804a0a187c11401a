use crate::store::mvi::Reducer;

use super::intent::PostIntent;
use super::state::{FormState, PostState};

pub struct PostReducer;

impl Reducer for PostReducer {
    type State = PostState;
    type Intent = PostIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            PostIntent::FeedLoaded(feed) => PostState { feed, ..state },
            PostIntent::ThreadLoaded(thread) => PostState {
                thread: Some(thread),
                ..state
            },
            PostIntent::ThreadClosed => PostState {
                thread: None,
                ..state
            },
            PostIntent::FormSubmitted => PostState {
                form: FormState {
                    pending: true,
                    error: None,
                },
                ..state
            },
            PostIntent::FormFailed(message) => PostState {
                form: FormState {
                    pending: false,
                    error: Some(message),
                },
                ..state
            },
            PostIntent::FormSucceeded | PostIntent::FormReset => PostState {
                form: FormState::default(),
                ..state
            },
        }
    }
}
