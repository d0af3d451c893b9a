//! Command Handlers
//!
//! Entry points used by the CLI (and any other front end). Every handler
//! takes the shared [`AppState`](crate::state::AppState) and returns a
//! [`CommandResponse`](crate::models::response::CommandResponse).

pub mod analysis;
pub mod documents;
pub mod health;
pub mod settings;

pub use analysis::*;
pub use documents::*;
pub use health::*;
pub use settings::*;
