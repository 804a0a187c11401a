//! Slice primitives.
//!
//! Every slice is a plain value reduced by a pure function:
//!
//! ```text
//! remote data / user write ──→ Intent ──→ Reducer::reduce ──→ new SliceState
//! ```
//!
//! Reducers never perform I/O. The coordinator issues requests and feeds
//! their outcomes back in as intents or entity updates.

/// Snapshot of one slice.
///
/// `PartialEq` is what lets a rollback be checked against the state it
/// replaced.
pub trait SliceState: Clone + PartialEq + Default + Send + 'static {}

/// Message a reducer understands.
pub trait Intent: Send + 'static {}

pub trait Reducer {
    type State: SliceState;
    type Intent: Intent;

    /// `(state, intent) -> state`, with no side effects.
    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}
