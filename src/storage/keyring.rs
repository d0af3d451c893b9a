//! Keyring Integration
//!
//! Secure secret storage using OS-native keyring (Credential Manager, Keychain, Secret Service).

use keyring::Entry;

use crate::utils::error::{AppError, AppResult};

/// Service name used for keyring entries
const SERVICE_NAME: &str = "draftcheck";

/// Account holding the Gemini API key
pub const GEMINI_ACCOUNT: &str = "gemini";

/// Account holding the proxy password
pub const PROXY_ACCOUNT: &str = "proxy";

/// Keyring service for secure secret storage
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringService;

impl KeyringService {
    /// Create a new keyring service
    pub fn new() -> Self {
        Self
    }

    fn entry(account: &str) -> AppResult<Entry> {
        Entry::new(SERVICE_NAME, account)
            .map_err(|e| AppError::keyring(format!("Failed to create keyring entry: {}", e)))
    }

    /// Store a secret under an account
    pub fn set_secret(&self, account: &str, secret: &str) -> AppResult<()> {
        if secret.trim().is_empty() {
            return Err(AppError::validation("Refusing to store an empty secret"));
        }
        Self::entry(account)?
            .set_password(secret)
            .map_err(|e| AppError::keyring(format!("Failed to store secret: {}", e)))
    }

    /// Retrieve the secret for an account
    pub fn get_secret(&self, account: &str) -> AppResult<Option<String>> {
        match Self::entry(account)?.get_password() {
            Ok(password) => Ok(Some(password)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(AppError::keyring(format!(
                "Failed to retrieve secret: {}",
                e
            ))),
        }
    }

    /// Delete the secret for an account
    pub fn delete_secret(&self, account: &str) -> AppResult<()> {
        match Self::entry(account)?.delete_credential() {
            Ok(_) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()), // Already deleted, not an error
            Err(e) => Err(AppError::keyring(format!(
                "Failed to delete secret: {}",
                e
            ))),
        }
    }

    pub fn set_gemini_key(&self, key: &str) -> AppResult<()> {
        self.set_secret(GEMINI_ACCOUNT, key.trim())
    }

    pub fn gemini_key(&self) -> AppResult<Option<String>> {
        self.get_secret(GEMINI_ACCOUNT)
    }

    pub fn delete_gemini_key(&self) -> AppResult<()> {
        self.delete_secret(GEMINI_ACCOUNT)
    }

    /// Check if the keyring service is healthy (can access the keyring)
    pub fn is_healthy(&self) -> bool {
        Entry::new(SERVICE_NAME, "health_check").is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_secret_rejected() {
        let service = KeyringService::new();
        let err = service.set_secret(GEMINI_ACCOUNT, "   ").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    // Round-trips through the OS keyring need a platform secret store and
    // are left to manual runs.
}
