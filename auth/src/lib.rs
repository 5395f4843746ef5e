//! Authentication utilities library
//!
//! Provides the credential and token primitives used by the identity service:
//! - Password hashing (Argon2id, tunable work factor)
//! - RS256 JWT issuance and validation over an RSA key pair
//! - Access/refresh token pair issuance
//!
//! The library knows nothing about users or storage. Services define their own
//! ports and adapt these implementations.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## JWT Tokens
//! ```
//! use std::sync::Arc;
//!
//! use auth::{KeyMaterial, TokenCodec};
//! use chrono::Duration;
//!
//! let keys = KeyMaterial::from_pem_files(
//!     concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/rsa_private.pem"),
//!     concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/rsa_public.pem"),
//! )
//! .unwrap();
//!
//! let codec = TokenCodec::new(Arc::new(keys));
//! let token = codec.issue("user123", Duration::minutes(15)).unwrap();
//! assert_eq!(codec.validate(&token).unwrap(), "user123");
//! ```
//!
//! ## Token Pairs
//! ```
//! use std::sync::Arc;
//!
//! use auth::{KeyMaterial, TokenCodec, TokenIssuer, TokenLifetimes};
//! use chrono::Duration;
//!
//! let keys = KeyMaterial::from_pem_files(
//!     concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/rsa_private.pem"),
//!     concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/rsa_public.pem"),
//! )
//! .unwrap();
//!
//! let issuer = TokenIssuer::new(
//!     TokenCodec::new(Arc::new(keys)),
//!     TokenLifetimes {
//!         access: Duration::minutes(15),
//!         refresh: Duration::minutes(60),
//!     },
//! );
//!
//! let pair = issuer.issue_pair("user123").unwrap();
//! assert_eq!(issuer.validate(&pair.refresh_token).unwrap(), "user123");
//! ```

pub mod jwt;
pub mod password;
pub mod tokens;

// Re-export commonly used items
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::KeyMaterial;
pub use jwt::KeyMaterialError;
pub use jwt::TokenCodec;
pub use password::HashingParams;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use tokens::TokenIssuer;
pub use tokens::TokenLifetimes;
pub use tokens::TokenPair;
