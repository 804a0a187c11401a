//! Client state store.
//!
//! Three slices (auth, post, profile) each own their own copies of cached
//! entities. Slice intents are reduced by the slice's reducer; an
//! [`EntityUpdate`] is reduced by every slice at once so that all copies of
//! an entity stay consistent.

pub mod auth;
pub mod mvi;
pub mod post;
pub mod profile;

mod app;
mod optimistic;
mod update;

pub use app::{Action, AppReducer, AppState};
pub use optimistic::{PendingId, Store};
pub use update::{fan_out, Containers, EntityUpdate, PostChange, UserChange};
