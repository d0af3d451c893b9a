//! DraftCheck Core
//!
//! Foundational types shared by every crate in the DraftCheck workspace.
//! This crate has no dependency on the model provider layer or on the
//! application crate.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `proxy` - Proxy configuration data types used by the HTTP client factory
//! - `text` - Char-safe text primitives: prefix truncation, selection ranges,
//!   literal first-occurrence replacement

pub mod error;
pub mod proxy;
pub mod text;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Proxy Types ────────────────────────────────────────────────────────
pub use proxy::{ProxyConfig, ProxyProtocol};

// ── Text Primitives ────────────────────────────────────────────────────
pub use text::{replace_first, truncate_chars, TextRange};
