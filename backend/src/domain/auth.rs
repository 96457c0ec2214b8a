//! Authentication primitives: login credentials and bearer tokens.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use super::account::{AccountProfile, AccountValidationError, Email, Password};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email was missing or malformed.
    #[error(transparent)]
    Email(#[from] AccountValidationError),
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is normalised via [`Email::new`].
/// - `password` must be non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use medicare_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Admin@Medicare.demo", "admin123").unwrap();
/// assert_eq!(creds.email().as_str(), "admin@medicare.demo");
/// ```
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    email: Email,
    password: Password,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = Email::new(email)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Password::for_login(password),
        })
    }

    /// Normalised email used for account lookups.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Number of random bytes in an issued token.
pub const ACCESS_TOKEN_BYTES: usize = 32;

/// Raised when a presented bearer token is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("access token must be {expected} hexadecimal characters")]
pub struct AccessTokenFormatError {
    expected: usize,
}

/// Opaque bearer credential handed to clients.
///
/// Only the SHA-256 [`TokenDigest`] is ever persisted.
#[derive(Clone)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Generate a fresh random token.
    pub fn generate() -> Self {
        let bytes: [u8; ACCESS_TOKEN_BYTES] = rand::random();
        Self(Zeroizing::new(hex::encode(bytes)))
    }

    /// Parse a token presented in an `Authorization` header.
    pub fn parse(raw: &str) -> Result<Self, AccessTokenFormatError> {
        let expected = ACCESS_TOKEN_BYTES * 2;
        let trimmed = raw.trim();
        if trimmed.len() != expected || !trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(AccessTokenFormatError { expected });
        }
        Ok(Self(Zeroizing::new(trimmed.to_ascii_lowercase())))
    }

    /// Token text to return to the client exactly once.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Digest stored server side.
    pub fn digest(&self) -> TokenDigest {
        TokenDigest(Sha256::digest(self.0.as_bytes()).into())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// SHA-256 digest of an [`AccessToken`].
#[derive(Clone, Copy, Eq)]
pub struct TokenDigest([u8; 32]);

impl TokenDigest {
    /// Wrap raw digest bytes loaded from storage.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl PartialEq for TokenDigest {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl std::hash::Hash for TokenDigest {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Debug for TokenDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = self.0.get(..4).map(hex::encode).unwrap_or_default();
        write!(f, "TokenDigest({prefix}..)")
    }
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: AccessToken,
    pub expires_at: DateTime<Utc>,
    pub profile: AccountProfile,
}
