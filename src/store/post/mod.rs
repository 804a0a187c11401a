//! Post slice: the global feed, the open thread page and the post form.

mod intent;
mod reducer;
mod state;

pub use intent::PostIntent;
pub use reducer::PostReducer;
pub use state::{FormState, PostState};
