use auth::PasswordError;
use auth::PasswordHasher;

use crate::domain::user::errors::CredentialError;
use crate::domain::user::ports::CredentialHasher;

impl CredentialHasher for PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, CredentialError> {
        PasswordHasher::hash(self, password).map_err(CredentialError::from)
    }

    fn verify(&self, digest: &str, candidate: &str) -> Result<bool, CredentialError> {
        PasswordHasher::verify(self, candidate, digest).map_err(CredentialError::from)
    }
}

impl From<PasswordError> for CredentialError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::Empty | PasswordError::TooLong { .. } => {
                CredentialError::Rejected(err.to_string())
            }
            PasswordError::InvalidParams(_) | PasswordError::HashingFailed(_) => {
                CredentialError::HashingFailed(err.to_string())
            }
            PasswordError::VerificationFailed(_) => {
                CredentialError::VerificationFailed(err.to_string())
            }
        }
    }
}
