//! Thread-safe store with an optimistic layer.
//!
//! The store keeps the confirmed state (what the server has acknowledged) and
//! an ordered list of pending optimistic updates. The visible state is the
//! confirmed state with every pending update replayed on top. Rolling back a
//! failed mutation drops its entry and replays the rest, so the visible state
//! returns to exactly what it was before the mutation while other in-flight
//! mutations stay applied.

use std::sync::Arc;

use parking_lot::Mutex;

use super::app::{Action, AppReducer, AppState};
use super::mvi::Reducer;
use super::update::EntityUpdate;

/// Handle to one pending optimistic update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PendingId(u64);

struct Pending {
    id: PendingId,
    update: EntityUpdate,
}

struct StoreInner {
    confirmed: AppState,
    pending: Vec<Pending>,
    visible: AppState,
    next_id: u64,
}

impl StoreInner {
    fn recompute(&mut self) {
        let mut visible = self.confirmed.clone();
        for pending in &self.pending {
            visible.apply(&pending.update);
        }
        self.visible = visible;
    }
}

/// Single source of truth for cached entities.
///
/// Cloning yields another handle to the same store.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Mutex<StoreInner>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

impl Store {
    pub fn new(initial: AppState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                visible: initial.clone(),
                confirmed: initial,
                pending: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Snapshot of the visible state.
    pub fn state(&self) -> AppState {
        self.inner.lock().visible.clone()
    }

    /// Read from the visible state without cloning all of it.
    pub fn select<T>(&self, f: impl FnOnce(&AppState) -> T) -> T {
        f(&self.inner.lock().visible)
    }

    /// Snapshot of the confirmed state.
    pub fn confirmed(&self) -> AppState {
        self.inner.lock().confirmed.clone()
    }

    /// Apply a confirmed action atomically.
    pub fn dispatch(&self, action: impl Into<Action>) {
        let action = action.into();
        let mut inner = self.inner.lock();
        let confirmed = std::mem::take(&mut inner.confirmed);
        inner.confirmed = AppReducer::reduce(confirmed, action);
        inner.recompute();
    }

    /// Show `update` immediately, ahead of server confirmation.
    pub fn apply_optimistic(&self, update: EntityUpdate) -> PendingId {
        let mut inner = self.inner.lock();
        let id = PendingId(inner.next_id);
        inner.next_id += 1;
        inner.visible.apply(&update);
        inner.pending.push(Pending { id, update });
        id
    }

    /// Promote a pending update to confirmed.
    ///
    /// `canonical` replaces the optimistic update when the server returned its
    /// own representation (edits, reposts). `None` confirms the optimistic
    /// update as-is. Unknown ids are ignored.
    pub fn commit(&self, id: PendingId, canonical: Option<EntityUpdate>) {
        let mut inner = self.inner.lock();
        let Some(pos) = inner.pending.iter().position(|p| p.id == id) else {
            return;
        };
        let pending = inner.pending.remove(pos);
        let update = canonical.unwrap_or(pending.update);
        inner.confirmed.apply(&update);
        inner.recompute();
    }

    /// Discard a pending update, restoring the state it replaced.
    pub fn rollback(&self, id: PendingId) {
        let mut inner = self.inner.lock();
        let before = inner.pending.len();
        inner.pending.retain(|p| p.id != id);
        if inner.pending.len() != before {
            inner.recompute();
        }
    }

    pub fn pending_count(&self) -> usize {
        self.inner.lock().pending.len()
    }
}
