use crate::store::mvi::Reducer;

use super::intent::AuthIntent;
use super::state::AuthState;

pub struct AuthReducer;

impl Reducer for AuthReducer {
    type State = AuthState;
    type Intent = AuthIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            AuthIntent::SignedIn { token, user } => AuthState {
                token: Some(token),
                user: Some(user),
                reposts: Vec::new(),
            },
            AuthIntent::RepostsLoaded(reposts) => AuthState { reposts, ..state },
            AuthIntent::SignedOut => AuthState::default(),
        }
    }
}
