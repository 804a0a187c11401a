//! Session lifecycle and loading server state into the store.

use crate::api::{ApiError, Credentials, NewAccount, RemoteService};
use crate::config::AuthToken;
use crate::model::{PostId, User, UserId};
use crate::store::auth::AuthIntent;
use crate::store::post::PostIntent;
use crate::store::profile::ProfileIntent;

use super::engine::Coordinator;
use super::error::CoordinatorError;

impl<R: RemoteService> Coordinator<R> {
    pub async fn sign_in(&self, credentials: Credentials) -> Result<User, CoordinatorError> {
        let session = self.remote.login(credentials).await?;
        self.establish(session.token, session.user).await
    }

    pub async fn sign_up(&self, account: NewAccount) -> Result<User, CoordinatorError> {
        let session = self.remote.signup(account).await?;
        self.establish(session.token, session.user).await
    }

    /// Resume the session saved by a previous run.
    ///
    /// Returns `None` when there is no saved token or the server no longer
    /// accepts it; a rejected token is forgotten.
    pub async fn restore_session(&self) -> Result<Option<User>, CoordinatorError> {
        let Some(session) = &self.session else {
            return Ok(None);
        };
        let Some(token) = session.load()? else {
            return Ok(None);
        };

        self.remote.set_token(Some(token.clone()));
        match self.remote.current_user().await {
            Ok(user) => self.establish(token, user).await.map(Some),
            Err(ApiError::Unauthorized(reason)) => {
                tracing::warn!(reason = %reason, "saved session rejected, signing out");
                self.remote.set_token(None);
                session.clear()?;
                Ok(None)
            }
            Err(err) => {
                self.remote.set_token(None);
                Err(err.into())
            }
        }
    }

    pub fn sign_out(&self) -> Result<(), CoordinatorError> {
        self.remote.set_token(None);
        if let Some(session) = &self.session {
            session.clear()?;
        }
        self.store.dispatch(AuthIntent::SignedOut);
        tracing::info!("signed out");
        Ok(())
    }

    async fn establish(&self, token: AuthToken, user: User) -> Result<User, CoordinatorError> {
        self.remote.set_token(Some(token.clone()));
        if let Some(session) = &self.session {
            session.save(&token)?;
        }
        tracing::info!(user = %user.username, "signed in");
        self.store.dispatch(AuthIntent::SignedIn {
            token,
            user: user.clone(),
        });
        self.refresh_own_reposts().await?;
        Ok(user)
    }

    /// Reload the signed-in user's reposts, which unrepost resolves against.
    pub async fn refresh_own_reposts(&self) -> Result<(), CoordinatorError> {
        let viewer = self.viewer()?;
        let reposts = self.remote.list_user_reposts(&viewer.id).await?;
        self.store.dispatch(AuthIntent::RepostsLoaded(reposts));
        Ok(())
    }

    pub async fn load_feed(&self) -> Result<(), CoordinatorError> {
        let feed = self.remote.list_feed().await?;
        tracing::debug!(items = feed.len(), "feed loaded");
        self.store.dispatch(PostIntent::FeedLoaded(feed));
        Ok(())
    }

    pub async fn load_thread(&self, post: &PostId) -> Result<(), CoordinatorError> {
        let thread = self.remote.get_thread(post).await?;
        self.store.dispatch(PostIntent::ThreadLoaded(thread));
        Ok(())
    }

    /// Leave the thread page. In-flight writes still land in the other views.
    pub fn close_thread(&self) {
        self.store.dispatch(PostIntent::ThreadClosed);
    }

    /// Load a profile with its timeline and replies.
    pub async fn load_profile(&self, user: &UserId) -> Result<(), CoordinatorError> {
        let (profile, items, replies) = tokio::try_join!(
            self.remote.get_user(user),
            self.remote.list_user_posts(user),
            self.remote.list_user_replies(user),
        )?;
        self.store.dispatch(ProfileIntent::ProfileLoaded(profile));
        self.store.dispatch(ProfileIntent::ItemsLoaded(items));
        self.store.dispatch(ProfileIntent::RepliesLoaded(replies));
        Ok(())
    }

    pub fn close_profile(&self) {
        self.store.dispatch(ProfileIntent::ProfileClosed);
    }
}
