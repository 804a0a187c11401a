//! Client for a social "threads" service.
//!
//! - [`api`]: typed remote data service
//! - [`store`]: client state store with per-view slices and fan-out updates
//! - [`coordinator`]: optimistic writes with rollback
//! - [`config`]: configuration and the persisted session

pub mod api;
pub mod config;
pub mod coordinator;
pub mod logging;
pub mod model;
pub mod store;
