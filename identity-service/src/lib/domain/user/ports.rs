use async_trait::async_trait;
use auth::TokenPair;

use crate::domain::user::errors::AuthError;
use crate::domain::user::errors::CredentialError;
use crate::domain::user::errors::DirectoryError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Identity;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::SignInCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserRecord;

/// Port for authentication operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Arguments
    /// * `command` - Raw email, password and password confirmation
    ///
    /// # Returns
    /// Persisted user, without password hash
    ///
    /// # Errors
    /// * `InvalidEmail` - Email fails format validation
    /// * `SecretMismatch` - Confirmation differs from password
    /// * `InvalidPassword` - Password rejected by the hasher
    /// * `DuplicateUser` - Email is already registered
    /// * `Internal` - Hashing or storage failed
    async fn register(&self, command: RegisterCommand) -> Result<User, AuthError>;

    /// Verify credentials and issue an access/refresh token pair.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `Internal` - Storage or token signing failed
    async fn sign_in(&self, command: SignInCommand) -> Result<TokenPair, AuthError>;

    /// Exchange a valid refresh token for a new access token.
    ///
    /// The refresh token itself is not rotated.
    ///
    /// # Errors
    /// * `Unauthenticated` - Refresh token invalid, expired, or its subject is gone
    /// * `Internal` - Storage or token signing failed
    async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError>;

    /// Resolve the identity behind a request token.
    ///
    /// # Arguments
    /// * `token` - Token extracted from the request, if any
    ///
    /// # Errors
    /// * `Unauthenticated` - Missing, malformed, expired or forged token, or unknown subject
    /// * `Internal` - Storage failed
    async fn resolve_identity(&self, token: Option<&str>) -> Result<Identity, AuthError>;
}

/// User record store.
///
/// Implementations must make `insert` atomic with respect to email
/// uniqueness: a conflicting insert stores nothing.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    /// Retrieve user by normalized email address.
    ///
    /// # Returns
    /// Optional user record (None if not found)
    ///
    /// # Errors
    /// * `Unavailable` - Storage operation failed
    async fn find_by_email(&self, email: &EmailAddress)
        -> Result<Option<UserRecord>, DirectoryError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user record (None if not found)
    ///
    /// # Errors
    /// * `Unavailable` - Storage operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, DirectoryError>;

    /// Persist a new user record.
    ///
    /// # Returns
    /// Identifier of the inserted record
    ///
    /// # Errors
    /// * `DuplicateKey` - Email is already taken
    /// * `Unavailable` - Storage operation failed
    async fn insert(&self, record: UserRecord) -> Result<UserId, DirectoryError>;
}

/// One-way hashing of user passwords.
pub trait CredentialHasher: Send + Sync + 'static {
    /// Hash a plaintext password into a storable digest.
    ///
    /// # Errors
    /// * `Rejected` - Password is unacceptable as input
    /// * `HashingFailed` - Hashing operation failed
    fn hash(&self, password: &str) -> Result<String, CredentialError>;

    /// Check a candidate password against a stored digest.
    ///
    /// # Returns
    /// True if the candidate matches
    ///
    /// # Errors
    /// * `VerificationFailed` - Digest is unparsable
    fn verify(&self, digest: &str, candidate: &str) -> Result<bool, CredentialError>;
}
