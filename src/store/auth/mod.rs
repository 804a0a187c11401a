//! Signed-in session slice.
//!
//! Holds the bearer token, the signed-in user and that user's reposts.
//! The reposts are what `unrepost` resolves against.

mod intent;
mod reducer;
mod state;

pub use intent::AuthIntent;
pub use reducer::AuthReducer;
pub use state::AuthState;
