//! Storage Layer
//!
//! Handles persistence that outlives a session: keyring secrets and JSON config.
//! Session state itself is never written to disk.

pub mod config;
pub mod keyring;

pub use config::*;
pub use keyring::*;
