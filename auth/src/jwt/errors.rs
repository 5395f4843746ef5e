use std::path::PathBuf;

use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    TokenExpired,
}

/// Error raised while loading the signing and verification keys.
///
/// Only ever produced at startup; a process holding one of these must not
/// serve requests.
#[derive(Debug, Error)]
pub enum KeyMaterialError {
    #[error("Failed to read key file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Private key is not a PEM encoded RSA private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Public key is not a PEM encoded RSA public key: {0}")]
    InvalidPublicKey(String),

    #[error("Private and public keys do not form a usable pair: {0}")]
    MismatchedPair(String),
}
