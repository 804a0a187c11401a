use crate::store::mvi::Reducer;

use super::intent::ProfileIntent;
use super::state::ProfileState;

pub struct ProfileReducer;

impl Reducer for ProfileReducer {
    type State = ProfileState;
    type Intent = ProfileIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            ProfileIntent::ProfileLoaded(user) => {
                if state.user_id() == Some(&user.id) {
                    ProfileState {
                        user: Some(user),
                        ..state
                    }
                } else {
                    ProfileState {
                        user: Some(user),
                        ..ProfileState::default()
                    }
                }
            }
            ProfileIntent::ItemsLoaded(items) => ProfileState { items, ..state },
            ProfileIntent::RepliesLoaded(replies) => ProfileState { replies, ..state },
            ProfileIntent::ProfileClosed => ProfileState::default(),
        }
    }
}
