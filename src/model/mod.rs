//! Entities cached by the client.
//!
//! Field names follow the server's JSON documents (`_id`, camelCase).

mod ids;
mod item;
mod post;
mod repost;
mod user;

pub use ids::{PostId, RepostId, UserId};
pub use item::FeedItem;
pub use post::{Image, Post, Thread};
pub use repost::Repost;
pub use user::{User, UserSummary};
