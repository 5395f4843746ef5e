pub mod claims;
pub mod codec;
pub mod errors;
pub mod keys;

pub use claims::Claims;
pub use codec::TokenCodec;
pub use errors::JwtError;
pub use errors::KeyMaterialError;
pub use keys::KeyMaterial;
