use std::fmt;

use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error reported by a credential hasher
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    /// The secret itself is unacceptable (empty, too long)
    #[error("Password rejected: {0}")]
    Rejected(String),

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Password verification failed: {0}")]
    VerificationFailed(String),
}

/// Storage-level error taxonomy of a user directory
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryError {
    /// A uniqueness constraint rejected the write; nothing was stored
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Stored record is invalid: {0}")]
    InvalidRecord(String),

    #[error("User directory unavailable: {0}")]
    Unavailable(String),
}

/// Why a token-gated request was turned away.
///
/// Logged for observability; callers only ever see a uniform rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthenticatedReason {
    MissingToken,
    MalformedToken,
    InvalidSignature,
    Expired,
    SubjectNotFound,
}

impl fmt::Display for UnauthenticatedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            UnauthenticatedReason::MissingToken => "no token supplied",
            UnauthenticatedReason::MalformedToken => "token is malformed",
            UnauthenticatedReason::InvalidSignature => "token signature is invalid",
            UnauthenticatedReason::Expired => "token has expired",
            UnauthenticatedReason::SubjectNotFound => "subject no longer exists",
        };
        f.write_str(reason)
    }
}

impl From<auth::JwtError> for UnauthenticatedReason {
    fn from(err: auth::JwtError) -> Self {
        match err {
            auth::JwtError::InvalidSignature => UnauthenticatedReason::InvalidSignature,
            auth::JwtError::TokenExpired => UnauthenticatedReason::Expired,
            auth::JwtError::Malformed(_) | auth::JwtError::EncodingFailed(_) => {
                UnauthenticatedReason::MalformedToken
            }
        }
    }
}

/// Top-level error for registration, sign-in and request authentication
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    // Caller input errors, reported before any side effect
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    #[error("Passwords do not match")]
    SecretMismatch,

    // Domain-level errors
    #[error("User with email {0} already exists")]
    DuplicateUser(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Unauthenticated: {0}")]
    Unauthenticated(UnauthenticatedReason),

    // Infrastructure errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Whether this is a caller input error.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidEmail(_) | AuthError::InvalidPassword(_) | AuthError::SecretMismatch
        )
    }
}

impl From<DirectoryError> for AuthError {
    fn from(err: DirectoryError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<UnauthenticatedReason> for AuthError {
    fn from(reason: UnauthenticatedReason) -> Self {
        AuthError::Unauthenticated(reason)
    }
}
