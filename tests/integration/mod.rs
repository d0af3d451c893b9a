//! Integration Tests Module
//!
//! End-to-end tests that drive the command layer against a mock Gemini
//! server: full scans, selection verification, uploads and settings.

// Shared mock server and state setup
mod common;

// Full scan, routing and suggestion acceptance
mod scan_test;

// Selection fact-checking
mod verify_test;

// File upload and transcription
mod upload_test;

// Settings persistence and credential precedence
mod settings_test;
