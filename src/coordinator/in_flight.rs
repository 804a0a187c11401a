//! Per-entity in-flight registry.
//!
//! Toggle requests on the same entity must not overlap at the network layer,
//! so each write holds a key until its remote call resolves. A second request
//! for a held key is rejected instead of queued.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

/// Family of writes that share one in-flight slot per entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    /// like and unlike
    Like,
    /// repost and unrepost
    Repost,
    /// follow and unfollow
    Follow,
    Edit,
    Delete,
    /// create/edit form submission
    Form,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MutationKind::Like => "like",
            MutationKind::Repost => "repost",
            MutationKind::Follow => "follow",
            MutationKind::Edit => "edit",
            MutationKind::Delete => "delete",
            MutationKind::Form => "form",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MutationKey {
    pub kind: MutationKind,
    pub id: String,
}

impl MutationKey {
    pub fn new(kind: MutationKind, id: impl fmt::Display) -> Self {
        Self {
            kind,
            id: id.to_string(),
        }
    }

    /// The single post form.
    pub fn form() -> Self {
        Self::new(MutationKind::Form, "post-form")
    }
}

#[derive(Clone, Default)]
pub struct InFlight {
    keys: Arc<Mutex<HashSet<MutationKey>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `key`, or `None` if a request for it is already in flight.
    pub fn try_acquire(&self, key: MutationKey) -> Option<InFlightGuard> {
        if !self.keys.lock().insert(key.clone()) {
            return None;
        }
        Some(InFlightGuard {
            keys: Arc::clone(&self.keys),
            key,
        })
    }

    pub fn contains(&self, key: &MutationKey) -> bool {
        self.keys.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Releases its key on drop.
pub struct InFlightGuard {
    keys: Arc<Mutex<HashSet<MutationKey>>>,
    key: MutationKey,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.keys.lock().remove(&self.key);
    }
}
