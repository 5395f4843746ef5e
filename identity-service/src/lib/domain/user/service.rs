use std::sync::Arc;
use std::sync::OnceLock;

use async_trait::async_trait;
use auth::TokenIssuer;
use auth::TokenPair;
use chrono::Utc;

use crate::domain::user::errors::AuthError;
use crate::domain::user::errors::CredentialError;
use crate::domain::user::errors::DirectoryError;
use crate::domain::user::errors::UnauthenticatedReason;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Identity;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Role;
use crate::domain::user::models::SignInCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserRecord;
use crate::domain::user::ports::AuthServicePort;
use crate::domain::user::ports::CredentialHasher;
use crate::domain::user::ports::UserDirectory;

const TIMING_DUMMY_PASSWORD: &str = "timing-equalization-dummy-password";

/// Domain service implementation for authentication.
///
/// Holds no state of its own beyond its collaborators. The directory and
/// hasher are injected; the token issuer owns the shared key material.
pub struct AuthService<D, H>
where
    D: UserDirectory,
    H: CredentialHasher,
{
    directory: Arc<D>,
    hasher: Arc<H>,
    tokens: TokenIssuer,
    dummy_digest: OnceLock<Option<String>>,
}

impl<D, H> AuthService<D, H>
where
    D: UserDirectory,
    H: CredentialHasher,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `directory` - User record store
    /// * `hasher` - Password hashing implementation
    /// * `tokens` - Token issuer holding the loaded key pair
    pub fn new(directory: Arc<D>, hasher: Arc<H>, tokens: TokenIssuer) -> Self {
        Self {
            directory,
            hasher,
            tokens,
            dummy_digest: OnceLock::new(),
        }
    }

    pub fn token_issuer(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Run one verification against a throwaway digest so an unknown email
    /// costs about as much as a wrong password.
    fn verify_against_dummy(&self, candidate: &str) {
        let digest = self
            .dummy_digest
            .get_or_init(|| self.hasher.hash(TIMING_DUMMY_PASSWORD).ok());

        if let Some(digest) = digest {
            // Outcome is irrelevant; only the work done matters.
            let _timing_only = self.hasher.verify(digest, candidate);
        }
    }
}

#[async_trait]
impl<D, H> AuthServicePort for AuthService<D, H>
where
    D: UserDirectory,
    H: CredentialHasher,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, AuthError> {
        let email = EmailAddress::new(&command.email)?;

        if command.password != command.password_confirm {
            return Err(AuthError::SecretMismatch);
        }

        let password_hash = self.hasher.hash(&command.password).map_err(|e| match e {
            CredentialError::Rejected(reason) => AuthError::InvalidPassword(reason),
            other => AuthError::Internal(other.to_string()),
        })?;

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            email,
            role: Role::default(),
            verified: true,
            created_at: now,
            updated_at: now,
        };

        let record = UserRecord {
            user: user.clone(),
            password_hash,
        };

        match self.directory.insert(record).await {
            Ok(id) => {
                tracing::info!(user_id = %id, "User registered");
                Ok(User { id, ..user })
            }
            Err(DirectoryError::DuplicateKey(_)) => {
                tracing::debug!("Registration rejected: email already registered");
                Err(AuthError::DuplicateUser(user.email.to_string()))
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to persist new user");
                Err(AuthError::from(e))
            }
        }
    }

    async fn sign_in(&self, command: SignInCommand) -> Result<TokenPair, AuthError> {
        let Ok(email) = EmailAddress::new(&command.email) else {
            self.verify_against_dummy(&command.password);
            return Err(AuthError::InvalidCredentials);
        };

        let Some(record) = self.directory.find_by_email(&email).await? else {
            self.verify_against_dummy(&command.password);
            tracing::debug!("Sign-in rejected: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        match self.hasher.verify(&record.password_hash, &command.password) {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(user_id = %record.user.id, "Sign-in rejected: wrong password");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                tracing::error!(
                    user_id = %record.user.id,
                    error = %e,
                    "Stored password hash could not be verified"
                );
                return Err(AuthError::InvalidCredentials);
            }
        }

        let pair = self
            .tokens
            .issue_pair(&record.user.id.to_string())
            .map_err(|e| AuthError::Internal(format!("Token generation failed: {}", e)))?;

        tracing::info!(user_id = %record.user.id, "User signed in");

        Ok(pair)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let identity = self.resolve_identity(Some(refresh_token)).await?;

        self.tokens
            .issue_access(&identity.user_id().to_string())
            .map_err(|e| AuthError::Internal(format!("Token generation failed: {}", e)))
    }

    async fn resolve_identity(&self, token: Option<&str>) -> Result<Identity, AuthError> {
        let token = token
            .filter(|token| !token.is_empty())
            .ok_or(UnauthenticatedReason::MissingToken)?;

        let subject = self
            .tokens
            .validate(token)
            .map_err(UnauthenticatedReason::from)?;

        let user_id =
            UserId::from_string(&subject).map_err(|_| UnauthenticatedReason::MalformedToken)?;

        let record = self
            .directory
            .find_by_id(&user_id)
            .await?
            .ok_or(UnauthenticatedReason::SubjectNotFound)?;

        Ok(Identity::new(record.user))
    }
}
