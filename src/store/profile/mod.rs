//! Profile slice: the viewed user, their timeline and their replies.

mod intent;
mod reducer;
mod state;

pub use intent::ProfileIntent;
pub use reducer::ProfileReducer;
pub use state::ProfileState;
