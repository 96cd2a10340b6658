//! Session credentials.
//!
//! The controller never owns the session: it reads the latest cached token
//! through [`CredentialProvider`] at the moment a query is dispatched.

use parking_lot::RwLock;

/// Wrapper for sensitive strings that prevents accidental logging.
///
/// The inner value is never exposed via Debug or Display traits.
/// Use `expose()` to access the actual value when building a request.
#[derive(Clone, PartialEq, Eq)]
pub struct SecureString(String);

impl SecureString {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureString(••••••••)")
    }
}

impl std::fmt::Display for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "••••••••")
    }
}

/// Token of an authenticated account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub account_pk: Option<u32>,
    token: SecureString,
}

impl AuthToken {
    pub fn new(account_pk: Option<u32>, token: impl Into<String>) -> Self {
        Self {
            account_pk,
            token: SecureString::new(token.into()),
        }
    }

    pub fn expose(&self) -> &str {
        self.token.expose()
    }

    pub fn is_blank(&self) -> bool {
        self.token.is_empty()
    }
}

/// Source of the latest known credential.
pub trait CredentialProvider: Send + Sync {
    /// Current token, if a session is active. Must not block.
    fn cached_token(&self) -> Option<AuthToken>;
}

/// Holds the token of the signed-in account.
#[derive(Default)]
pub struct SessionManager {
    cached: RwLock<Option<AuthToken>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: AuthToken) -> Self {
        Self {
            cached: RwLock::new(Some(token)),
        }
    }

    pub fn login(&self, token: AuthToken) {
        tracing::info!(account_pk = ?token.account_pk, "Session token cached");
        *self.cached.write() = Some(token);
    }

    pub fn logout(&self) {
        if self.cached.write().take().is_some() {
            tracing::info!("Session token cleared");
        }
    }
}

impl CredentialProvider for SessionManager {
    fn cached_token(&self) -> Option<AuthToken> {
        self.cached.read().clone()
    }
}
