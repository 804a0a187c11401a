use thiserror::Error;

use crate::api::{ApiError, ErrorKind};
use crate::config::SessionError;
use crate::model::PostId;

use super::in_flight::MutationKind;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("A {kind} request for '{id}' is already in flight")]
    InFlight { kind: MutationKind, id: String },

    #[error("A form submission is already pending")]
    FormPending,

    #[error("No repost of post '{0}' by the signed-in user is cached")]
    RepostNotFound(PostId),

    #[error("Sign in to perform this action")]
    NotSignedIn,

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl CoordinatorError {
    /// Error kind of the underlying remote failure, if there was one.
    pub fn api_kind(&self) -> Option<ErrorKind> {
        match self {
            CoordinatorError::Api(err) => Some(err.kind()),
            CoordinatorError::NotSignedIn => Some(ErrorKind::Authorization),
            _ => None,
        }
    }
}
