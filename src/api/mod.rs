//! Remote data service: typed queries and mutations against the threads server.

mod error;
mod http;
mod service;
mod types;

pub use error::{ApiError, ErrorKind};
pub use http::HttpService;
pub use service::RemoteService;
pub use types::{
    AuthSession, Credentials, ImageUpload, NewAccount, NewPost, PostEdit, ProfileEdit,
};
