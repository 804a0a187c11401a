use std::future::Future;
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::api::{ApiError, RemoteService};
use crate::config::SessionStore;
use crate::model::User;
use crate::store::post::PostIntent;
use crate::store::{EntityUpdate, Store};

use super::error::CoordinatorError;
use super::in_flight::{InFlight, InFlightGuard, MutationKey};
use super::notice::Notice;

const NOTICE_CAPACITY: usize = 64;

/// Runs user writes against the store and the remote service.
///
/// Every write is shown locally before its request is sent, then committed
/// or rolled back once the server answers. Cloning the inner `Arc`s is cheap;
/// wrap the coordinator in an `Arc` to drive several writes concurrently.
pub struct Coordinator<R> {
    pub(super) remote: Arc<R>,
    pub(super) store: Store,
    pub(super) in_flight: InFlight,
    pub(super) session: Option<SessionStore>,
    notices: broadcast::Sender<Notice>,
}

impl<R: RemoteService> Coordinator<R> {
    pub fn new(remote: Arc<R>, store: Store) -> Self {
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        Self {
            remote,
            store,
            in_flight: InFlight::new(),
            session: None,
            notices,
        }
    }

    /// Persist the auth token through `session`.
    pub fn with_session(mut self, session: SessionStore) -> Self {
        self.session = Some(session);
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn remote(&self) -> &Arc<R> {
        &self.remote
    }

    pub fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    /// Transient notices for rolled-back writes.
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    pub(super) fn viewer(&self) -> Result<User, CoordinatorError> {
        self.store
            .select(|s| s.viewer().cloned())
            .ok_or(CoordinatorError::NotSignedIn)
    }

    pub(super) fn claim(&self, key: MutationKey) -> Result<InFlightGuard, CoordinatorError> {
        let kind = key.kind;
        let id = key.id.clone();
        self.in_flight.try_acquire(key).ok_or_else(|| {
            tracing::debug!(kind = %kind, id = %id, "rejected: request already in flight");
            CoordinatorError::InFlight { kind, id }
        })
    }

    /// Publish a notice for a failed write and convert the error.
    pub(super) fn report(&self, action: &str, err: ApiError) -> CoordinatorError {
        // No subscribers is fine: notices are transient.
        let _ = self.notices.send(Notice::failed(action, &err));
        err.into()
    }

    /// Show `update` now, await `call`, then commit or roll back.
    ///
    /// `reconcile` maps the server's response to the canonical update to
    /// commit; `None` commits the optimistic update itself.
    pub(super) async fn optimistic<T, Fut>(
        &self,
        action: &'static str,
        update: EntityUpdate,
        call: Fut,
        reconcile: impl FnOnce(&T) -> Option<EntityUpdate>,
    ) -> Result<T, ApiError>
    where
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let pending = self.store.apply_optimistic(update);
        match call.await {
            Ok(value) => {
                let canonical = reconcile(&value);
                self.store.commit(pending, canonical);
                tracing::info!(action, "write confirmed");
                Ok(value)
            }
            Err(err) => {
                self.store.rollback(pending);
                tracing::warn!(
                    action,
                    error = %err,
                    retryable = err.is_retryable(),
                    "write failed, rolled back"
                );
                Err(err)
            }
        }
    }

    /// Settle the form with the outcome of a submission.
    pub(super) fn settle_form<T>(&self, result: Result<T, ApiError>) -> Result<T, CoordinatorError> {
        match result {
            Ok(value) => {
                self.store.dispatch(PostIntent::FormSucceeded);
                Ok(value)
            }
            Err(err) => {
                self.store.dispatch(PostIntent::FormFailed(err.to_string()));
                Err(err.into())
            }
        }
    }
}
