//! User-triggered writes.

use chrono::Utc;

use crate::api::{ApiError, NewPost, PostEdit, ProfileEdit, RemoteService};
use crate::model::{Post, PostId, Repost, RepostId, User, UserId};
use crate::store::post::PostIntent;
use crate::store::{EntityUpdate, PostChange, UserChange};

use super::engine::Coordinator;
use super::error::CoordinatorError;
use super::in_flight::{MutationKey, MutationKind};

/// Deleting something the server no longer has counts as done.
fn already_gone(result: Result<(), ApiError>) -> Result<(), ApiError> {
    match result {
        Err(err) if err.is_not_found() => {
            tracing::debug!(error = %err, "delete target already gone");
            Ok(())
        }
        other => other,
    }
}

/// Commit for a confirmed follow change: the server's follower copy sets the
/// `following` count on every cached copy.
fn settled_follow(target: &UserId, fresh: &Option<User>, following: bool) -> Option<EntityUpdate> {
    fresh.as_ref().map(|follower| {
        EntityUpdate::user(
            target.clone(),
            UserChange::FollowSettled {
                follower: follower.clone(),
                following,
            },
        )
    })
}

impl<R: RemoteService> Coordinator<R> {
    pub async fn like(&self, post: &PostId) -> Result<(), CoordinatorError> {
        let viewer = self.viewer()?;
        let _guard = self.claim(MutationKey::new(MutationKind::Like, post))?;
        if self.store.select(|s| {
            s.find_post(post)
                .is_some_and(|p| p.is_liked_by(&viewer.id))
        }) {
            return Ok(());
        }

        let update = EntityUpdate::post(post.clone(), PostChange::Like(viewer.id));
        self.optimistic("like post", update, self.remote.like_post(post), |_| None)
            .await
            .map_err(|err| self.report("like post", err))
    }

    pub async fn unlike(&self, post: &PostId) -> Result<(), CoordinatorError> {
        let viewer = self.viewer()?;
        let _guard = self.claim(MutationKey::new(MutationKind::Like, post))?;
        if self.store.select(|s| {
            s.find_post(post)
                .is_some_and(|p| !p.is_liked_by(&viewer.id))
        }) {
            return Ok(());
        }

        let update = EntityUpdate::post(post.clone(), PostChange::Unlike(viewer.id));
        self.optimistic("unlike post", update, self.remote.unlike_post(post), |_| None)
            .await
            .map_err(|err| self.report("unlike post", err))
    }

    /// Like or unlike depending on the cached state. Returns whether the post
    /// is now liked.
    pub async fn toggle_like(&self, post: &PostId) -> Result<bool, CoordinatorError> {
        let viewer = self.viewer()?;
        let liked = self.store.select(|s| {
            s.find_post(post)
                .is_some_and(|p| p.is_liked_by(&viewer.id))
        });
        if liked {
            self.unlike(post).await?;
        } else {
            self.like(post).await?;
        }
        Ok(!liked)
    }

    /// Repost `post`. A provisional repost is shown until the server
    /// returns the real one. Reposting twice returns the existing repost.
    pub async fn repost(&self, post: &PostId) -> Result<Repost, CoordinatorError> {
        let viewer = self.viewer()?;
        let _guard = self.claim(MutationKey::new(MutationKind::Repost, post))?;
        if let Some(existing) = self.store.select(|s| s.own_repost_of(post).cloned()) {
            return Ok(existing);
        }

        let call = self.remote.create_repost(post);
        let Some(cached) = self.store.select(|s| s.find_post(post).cloned()) else {
            // Nothing to show optimistically; wait for the server's copy.
            let repost = call.await.map_err(|err| self.report("repost", err))?;
            self.store.dispatch(EntityUpdate::RepostAdded(repost.clone()));
            return Ok(repost);
        };

        let now = Utc::now();
        let provisional = Repost {
            id: RepostId::provisional(),
            repost_creator: viewer.summary(),
            post: cached,
            created_at: now,
            updated_at: now,
        };
        self.optimistic(
            "repost",
            EntityUpdate::RepostAdded(provisional),
            call,
            |confirmed: &Repost| Some(EntityUpdate::RepostAdded(confirmed.clone())),
        )
        .await
        .map_err(|err| self.report("repost", err))
    }

    /// Remove the signed-in user's repost of `post`.
    ///
    /// The repost id comes from the cached reposts of the signed-in user. If
    /// none is cached this is a no-op that returns
    /// [`CoordinatorError::RepostNotFound`].
    pub async fn unrepost(&self, post: &PostId) -> Result<(), CoordinatorError> {
        self.viewer()?;
        let _guard = self.claim(MutationKey::new(MutationKind::Repost, post))?;
        let Some(repost) = self.store.select(|s| s.own_repost_of(post).cloned()) else {
            tracing::warn!(post = %post, "unrepost skipped: no cached repost for this post");
            return Err(CoordinatorError::RepostNotFound(post.clone()));
        };

        let id = repost.id;
        let call = async { already_gone(self.remote.delete_repost(&id).await) };
        self.optimistic(
            "undo repost",
            EntityUpdate::RepostRemoved(id.clone()),
            call,
            |_| None,
        )
        .await
        .map_err(|err| self.report("undo repost", err))
    }

    /// Delete a post or reply everywhere it is cached.
    pub async fn delete_post(&self, post: &PostId) -> Result<(), CoordinatorError> {
        self.viewer()?;
        let _guard = self.claim(MutationKey::new(MutationKind::Delete, post))?;
        let call = async { already_gone(self.remote.delete_post(post).await) };
        self.optimistic(
            "delete post",
            EntityUpdate::post(post.clone(), PostChange::Remove),
            call,
            |_| None,
        )
        .await
        .map_err(|err| self.report("delete post", err))
    }

    /// Edit through the post form. The new text is shown at once; the
    /// server's copy replaces it on success.
    pub async fn edit_post(&self, post: &PostId, edit: PostEdit) -> Result<Post, CoordinatorError> {
        self.viewer()?;
        let _form = self
            .claim(MutationKey::form())
            .map_err(|_| CoordinatorError::FormPending)?;
        let _guard = self.claim(MutationKey::new(MutationKind::Edit, post))?;
        if let Err(err) = edit.validate() {
            return self.settle_form(Err(err));
        }

        self.store.dispatch(PostIntent::FormSubmitted);
        let update = EntityUpdate::post(
            post.clone(),
            PostChange::Edit {
                content: edit.content.clone(),
            },
        );
        let result = self
            .optimistic(
                "edit post",
                update,
                self.remote.edit_post(post, edit),
                |canonical: &Post| {
                    Some(EntityUpdate::post(
                        canonical.id.clone(),
                        PostChange::Replace(canonical.clone()),
                    ))
                },
            )
            .await;
        self.settle_form(result)
    }

    /// Publish a new top-level post through the post form.
    pub async fn create_post(&self, new: NewPost) -> Result<Post, CoordinatorError> {
        self.viewer()?;
        let _form = self
            .claim(MutationKey::form())
            .map_err(|_| CoordinatorError::FormPending)?;
        if let Err(err) = new.validate() {
            return self.settle_form(Err(err));
        }

        self.store.dispatch(PostIntent::FormSubmitted);
        let result = self.remote.create_post(new).await;
        if let Ok(created) = &result {
            tracing::info!(post = %created.id, "post created");
            self.store.dispatch(EntityUpdate::PostCreated(created.clone()));
        }
        self.settle_form(result)
    }

    /// Reply to `parent` through the post form.
    pub async fn create_reply(&self, parent: &PostId, new: NewPost) -> Result<Post, CoordinatorError> {
        self.viewer()?;
        let _form = self
            .claim(MutationKey::form())
            .map_err(|_| CoordinatorError::FormPending)?;
        if let Err(err) = new.validate() {
            return self.settle_form(Err(err));
        }

        self.store.dispatch(PostIntent::FormSubmitted);
        let result = self.remote.create_reply(parent, new).await;
        if let Ok(created) = &result {
            tracing::info!(post = %created.id, parent = %parent, "reply created");
            self.store.dispatch(EntityUpdate::PostCreated(created.clone()));
        }
        self.settle_form(result)
    }

    pub async fn follow(&self, target: &UserId) -> Result<(), CoordinatorError> {
        let viewer = self.viewer()?;
        if &viewer.id == target {
            return Err(ApiError::Validation("you cannot follow yourself".to_string()).into());
        }
        let _guard = self.claim(MutationKey::new(MutationKind::Follow, target))?;
        if self.store.select(|s| {
            s.find_user(target)
                .is_some_and(|u| u.is_followed_by(&viewer.id))
        }) {
            return Ok(());
        }

        let update = EntityUpdate::user(target.clone(), UserChange::Follow(viewer.id));
        let call = async {
            self.remote.follow(target).await?;
            Ok::<_, ApiError>(self.reread_viewer().await)
        };
        self.optimistic("follow user", update, call, |fresh| {
            settled_follow(target, fresh, true)
        })
        .await
        .map(|_| ())
        .map_err(|err| self.report("follow user", err))
    }

    pub async fn unfollow(&self, target: &UserId) -> Result<(), CoordinatorError> {
        let viewer = self.viewer()?;
        let _guard = self.claim(MutationKey::new(MutationKind::Follow, target))?;
        if self.store.select(|s| {
            s.find_user(target)
                .is_some_and(|u| !u.is_followed_by(&viewer.id))
        }) {
            return Ok(());
        }

        let update = EntityUpdate::user(target.clone(), UserChange::Unfollow(viewer.id));
        let call = async {
            self.remote.unfollow(target).await?;
            Ok::<_, ApiError>(self.reread_viewer().await)
        };
        self.optimistic("unfollow user", update, call, |fresh| {
            settled_follow(target, fresh, false)
        })
        .await
        .map(|_| ())
        .map_err(|err| self.report("unfollow user", err))
    }

    /// Server copy of the signed-in user after a follow change. `None` when
    /// it cannot be read; the optimistic change is committed instead.
    async fn reread_viewer(&self) -> Option<User> {
        match self.remote.current_user().await {
            Ok(user) => Some(user),
            Err(err) => {
                tracing::debug!(error = %err, "could not re-read signed-in user after follow change");
                None
            }
        }
    }

    /// Update the signed-in user's profile through the form. Not optimistic:
    /// the new picture URL only exists once the server has stored it.
    pub async fn update_profile(&self, edit: ProfileEdit) -> Result<User, CoordinatorError> {
        self.viewer()?;
        let _form = self
            .claim(MutationKey::form())
            .map_err(|_| CoordinatorError::FormPending)?;

        self.store.dispatch(PostIntent::FormSubmitted);
        let result = self.remote.update_user(edit).await;
        if let Ok(user) = &result {
            tracing::info!(user = %user.id, "profile updated");
            self.store.dispatch(EntityUpdate::user(
                user.id.clone(),
                UserChange::Replace(user.clone()),
            ));
        }
        self.settle_form(result)
    }
}
