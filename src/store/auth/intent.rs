use crate::config::AuthToken;
use crate::model::{Repost, User};
use crate::store::mvi::Intent;

#[derive(Debug, Clone)]
pub enum AuthIntent {
    SignedIn { token: AuthToken, user: User },
    RepostsLoaded(Vec<Repost>),
    SignedOut,
}

impl Intent for AuthIntent {}
