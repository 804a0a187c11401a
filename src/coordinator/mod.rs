//! Optimistic mutation coordinator.
//!
//! For each write the coordinator:
//! 1. claims the entity's in-flight slot,
//! 2. applies the change to the store immediately,
//! 3. sends the request to the remote service,
//! 4. commits the change (or the server's version of it) on success, or
//!    rolls it back and publishes a [`Notice`] on failure.

mod engine;
mod error;
mod in_flight;
mod mutations;
mod notice;
mod queries;

pub use engine::Coordinator;
pub use error::CoordinatorError;
pub use in_flight::{InFlight, InFlightGuard, MutationKey, MutationKind};
pub use notice::Notice;
