//! Data Models
//!
//! Domain types for documents, analysis results and session state, plus
//! configuration and command response envelopes.

pub mod analysis;
pub mod document;
pub mod response;
pub mod session;
pub mod settings;

pub use analysis::*;
pub use document::*;
pub use response::*;
pub use session::*;
pub use settings::*;
