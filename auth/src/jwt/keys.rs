use std::fs;
use std::path::Path;

use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::errors::KeyMaterialError;

/// Signing algorithm used for every token.
pub const ALGORITHM: Algorithm = Algorithm::RS256;

const PROBE_SUBJECT: &str = "key-material-probe";

/// RSA key pair used to sign and verify tokens.
///
/// Loaded once at startup and never mutated afterwards. The private half is
/// only used by `encoding_key`, the public half only by `decoding_key`.
#[derive(Clone)]
pub struct KeyMaterial {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl KeyMaterial {
    /// Parse a PEM encoded RSA key pair.
    ///
    /// Accepts `RSA PRIVATE KEY` (PKCS#1) or `PRIVATE KEY` (PKCS#8) for the
    /// private key, `PUBLIC KEY` (SPKI) or `RSA PUBLIC KEY` for the public
    /// key. The pair is then exercised by signing and verifying a probe token.
    ///
    /// # Errors
    /// * `InvalidPrivateKey` - Not PEM, or not an RSA private key
    /// * `InvalidPublicKey` - Not PEM, or not an RSA public key
    /// * `MismatchedPair` - Keys parse but cannot sign/verify each other's tokens
    pub fn from_pem(private_pem: &[u8], public_pem: &[u8]) -> Result<Self, KeyMaterialError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_pem)
            .map_err(|e| KeyMaterialError::InvalidPrivateKey(e.to_string()))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_pem)
            .map_err(|e| KeyMaterialError::InvalidPublicKey(e.to_string()))?;

        let keys = Self {
            encoding_key,
            decoding_key,
        };
        keys.probe()?;

        Ok(keys)
    }

    /// Read and parse the key pair from two PEM files.
    ///
    /// # Errors
    /// * `Unreadable` - Either file could not be read
    /// * see [`KeyMaterial::from_pem`]
    pub fn from_pem_files(
        private_key_path: impl AsRef<Path>,
        public_key_path: impl AsRef<Path>,
    ) -> Result<Self, KeyMaterialError> {
        let private_pem = read_key_file(private_key_path.as_ref())?;
        let public_pem = read_key_file(public_key_path.as_ref())?;

        Self::from_pem(&private_pem, &public_pem)
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    fn probe(&self) -> Result<(), KeyMaterialError> {
        let claims = serde_json::json!({ "sub": PROBE_SUBJECT });

        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| KeyMaterialError::InvalidPrivateKey(e.to_string()))?;

        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<serde_json::Value>(&token, &self.decoding_key, &validation)
            .map(|_| ())
            .map_err(|e| KeyMaterialError::MismatchedPair(e.to_string()))
    }
}

fn read_key_file(path: &Path) -> Result<Vec<u8>, KeyMaterialError> {
    fs::read(path).map_err(|source| KeyMaterialError::Unreadable {
        path: path.to_path_buf(),
        source,
    })
}
