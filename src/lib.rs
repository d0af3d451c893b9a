//! DraftCheck - Document Review Assistant Library
//!
//! Sends a document to a generative-model service for grammar and style
//! corrections, source discovery, claim verification, AI-authorship
//! estimation and summarization, then keeps the results in an in-memory
//! session where corrections can be accepted one by one.
//!
//! It includes:
//! - Command handlers returning `CommandResponse` envelopes
//! - Services: model gateway, analysis orchestrator, suggestion engine,
//!   upload boundary, session controller
//! - Storage layer (Keyring, Config)
//! - Data models and utilities

pub mod commands;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

// Re-export models (avoiding settings module conflict)
pub use models::response::*;
pub use models::settings::{AppConfig, SettingsUpdate};
pub use services::{DocumentSession, ModelGateway, RunOutcome};
pub use state::AppState;
pub use utils::error::{AppError, AppResult};
