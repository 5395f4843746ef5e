use std::sync::Arc;

use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;
use super::keys::KeyMaterial;
use super::keys::ALGORITHM;

/// Signs and verifies identity tokens.
///
/// Holds the key pair behind an `Arc`, so clones are cheap and every clone
/// shares the same immutable keys.
#[derive(Clone)]
pub struct TokenCodec {
    keys: Arc<KeyMaterial>,
    validation: Validation,
}

impl TokenCodec {
    /// Create a codec over already-loaded key material.
    pub fn new(keys: Arc<KeyMaterial>) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        // Expiry is checked in `validate` so that the expiry second itself is rejected.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self { keys, validation }
    }

    /// Mint a signed token for `subject` valid for `lifetime`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn issue(&self, subject: &str, lifetime: Duration) -> Result<String, JwtError> {
        self.encode(&Claims::for_subject(subject, lifetime))
    }

    /// Sign an arbitrary claim set.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(ALGORITHM), claims, self.keys.encoding_key())
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify a token and return its subject.
    ///
    /// # Errors
    /// * `InvalidSignature` - Signature does not match the public key
    /// * `TokenExpired` - Current time is at or past the `exp` claim
    /// * `Malformed` - Anything else: bad encoding, wrong algorithm, missing claims
    pub fn validate(&self, token: &str) -> Result<String, JwtError> {
        self.decode(token).map(|claims| claims.sub)
    }

    /// Verify a token and return its full claim set.
    ///
    /// # Errors
    /// See [`TokenCodec::validate`].
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let token_data = decode::<Claims>(token, self.keys.decoding_key(), &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::Malformed(e.to_string()),
            })?;

        if token_data.claims.is_expired(Utc::now().timestamp()) {
            return Err(JwtError::TokenExpired);
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSA_PRIVATE: &str = include_str!("../../tests/fixtures/rsa_private.pem");
    const RSA_PUBLIC: &str = include_str!("../../tests/fixtures/rsa_public.pem");
    const OTHER_RSA_PRIVATE: &str = include_str!("../../tests/fixtures/other_rsa_private.pem");
    const OTHER_RSA_PUBLIC: &str = include_str!("../../tests/fixtures/other_rsa_public.pem");

    fn codec() -> TokenCodec {
        let keys = KeyMaterial::from_pem(RSA_PRIVATE.as_bytes(), RSA_PUBLIC.as_bytes())
            .expect("Failed to load test keys");
        TokenCodec::new(Arc::new(keys))
    }

    fn other_codec() -> TokenCodec {
        let keys =
            KeyMaterial::from_pem(OTHER_RSA_PRIVATE.as_bytes(), OTHER_RSA_PUBLIC.as_bytes())
                .expect("Failed to load test keys");
        TokenCodec::new(Arc::new(keys))
    }

    /// Replace one character in the middle of the signature segment.
    fn tamper_signature(token: &str) -> String {
        let signature_start = token.rfind('.').unwrap() + 1;
        let index = signature_start + 10;
        let original = token.as_bytes()[index];
        let replacement = if original == b'A' { 'B' } else { 'A' };

        let mut tampered = token.to_string();
        tampered.replace_range(index..index + 1, &replacement.to_string());
        tampered
    }

    #[test]
    fn test_issue_and_validate() {
        let codec = codec();

        let token = codec
            .issue("user123", Duration::minutes(15))
            .expect("Failed to issue token");
        assert_eq!(token.split('.').count(), 3);

        let subject = codec.validate(&token).expect("Failed to validate token");
        assert_eq!(subject, "user123");
    }

    #[test]
    fn test_decode_returns_lifetime() {
        let codec = codec();
        let token = codec.issue("user123", Duration::minutes(60)).unwrap();

        let claims = codec.decode(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 60 * 60);
    }

    #[test]
    fn test_expired_token() {
        let codec = codec();
        let token = codec.issue("user123", Duration::minutes(-5)).unwrap();

        assert_eq!(codec.validate(&token), Err(JwtError::TokenExpired));
    }

    #[test]
    fn test_token_rejected_at_expiry_instant() {
        let codec = codec();
        let token = codec.issue("user123", Duration::zero()).unwrap();

        assert_eq!(codec.validate(&token), Err(JwtError::TokenExpired));
    }

    #[test]
    fn test_tampered_signature() {
        let codec = codec();
        let token = codec.issue("user123", Duration::minutes(15)).unwrap();

        let result = codec.validate(&tamper_signature(&token));
        assert_eq!(result, Err(JwtError::InvalidSignature));
    }

    #[test]
    fn test_token_from_other_key_pair() {
        let token = other_codec()
            .issue("user123", Duration::minutes(15))
            .unwrap();

        assert_eq!(codec().validate(&token), Err(JwtError::InvalidSignature));
    }

    #[test]
    fn test_malformed_token() {
        let result = codec().validate("invalid.token.here");
        assert!(matches!(result, Err(JwtError::Malformed(_))));
    }

    #[test]
    fn test_empty_token() {
        let result = codec().validate("");
        assert!(matches!(result, Err(JwtError::Malformed(_))));
    }

    #[test]
    fn test_clones_share_keys() {
        let codec = codec();
        let clone = codec.clone();

        let token = codec.issue("user123", Duration::minutes(1)).unwrap();
        assert_eq!(clone.validate(&token).unwrap(), "user123");
    }
}
