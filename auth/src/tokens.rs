use chrono::Duration;

use crate::jwt::JwtError;
use crate::jwt::TokenCodec;

/// Lifetimes of the two token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
}

/// Access and refresh token minted together at sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Short-lived token presented on every request
    pub access_token: String,
    /// Longer-lived token exchanged for new access tokens
    pub refresh_token: String,
}

/// Token issuance coordinator.
///
/// Both token kinds are produced by the same codec and differ only in the
/// lifetime applied here.
#[derive(Clone)]
pub struct TokenIssuer {
    codec: TokenCodec,
    lifetimes: TokenLifetimes,
}

impl TokenIssuer {
    /// Create a new token issuer.
    ///
    /// # Arguments
    /// * `codec` - Codec holding the loaded key pair
    /// * `lifetimes` - Access and refresh token lifetimes
    pub fn new(codec: TokenCodec, lifetimes: TokenLifetimes) -> Self {
        Self { codec, lifetimes }
    }

    pub fn lifetimes(&self) -> TokenLifetimes {
        self.lifetimes
    }

    /// Mint an access token and a refresh token for `subject`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Either token could not be signed; nothing is returned
    pub fn issue_pair(&self, subject: &str) -> Result<TokenPair, JwtError> {
        let access_token = self.issue_access(subject)?;
        let refresh_token = self.codec.issue(subject, self.lifetimes.refresh)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Mint an access token only.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn issue_access(&self, subject: &str) -> Result<String, JwtError> {
        self.codec.issue(subject, self.lifetimes.access)
    }

    /// Validate a token of either kind and return its subject.
    ///
    /// # Errors
    /// * `InvalidSignature`, `TokenExpired`, `Malformed` - see [`TokenCodec::validate`]
    pub fn validate(&self, token: &str) -> Result<String, JwtError> {
        self.codec.validate(token)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::jwt::KeyMaterial;

    const RSA_PRIVATE: &str = include_str!("../tests/fixtures/rsa_private.pem");
    const RSA_PUBLIC: &str = include_str!("../tests/fixtures/rsa_public.pem");

    fn issuer(access: Duration, refresh: Duration) -> TokenIssuer {
        let keys = KeyMaterial::from_pem(RSA_PRIVATE.as_bytes(), RSA_PUBLIC.as_bytes())
            .expect("Failed to load test keys");
        let codec = TokenCodec::new(Arc::new(keys));
        TokenIssuer::new(codec, TokenLifetimes { access, refresh })
    }

    #[test]
    fn test_issue_pair() {
        let issuer = issuer(Duration::minutes(15), Duration::minutes(60));

        let pair = issuer.issue_pair("user123").expect("Failed to issue pair");

        assert_ne!(pair.access_token, pair.refresh_token);
        assert_eq!(issuer.validate(&pair.access_token).unwrap(), "user123");
        assert_eq!(issuer.validate(&pair.refresh_token).unwrap(), "user123");
    }

    #[test]
    fn test_lifetimes_applied_independently() {
        let issuer = issuer(Duration::zero(), Duration::minutes(60));

        let pair = issuer.issue_pair("user123").unwrap();

        assert_eq!(
            issuer.validate(&pair.access_token),
            Err(JwtError::TokenExpired)
        );
        assert!(issuer.validate(&pair.refresh_token).is_ok());
    }

    #[test]
    fn test_lifetimes_reports_configuration() {
        let issuer = issuer(Duration::minutes(15), Duration::minutes(60));

        let lifetimes = issuer.lifetimes();
        assert_eq!(lifetimes.access.num_seconds(), 900);
        assert_eq!(lifetimes.refresh.num_seconds(), 3600);
    }

    #[test]
    fn test_issue_access() {
        let issuer = issuer(Duration::minutes(15), Duration::minutes(60));

        let token = issuer.issue_access("user123").unwrap();
        assert_eq!(issuer.validate(&token).unwrap(), "user123");
    }

    #[test]
    fn test_validate_invalid_token() {
        let issuer = issuer(Duration::minutes(15), Duration::minutes(60));

        let result = issuer.validate("invalid.token.here");
        assert!(matches!(result, Err(JwtError::Malformed(_))));
    }
}
