pub mod errors;
pub mod hasher;

pub use errors::PasswordError;
pub use hasher::Argon2PasswordHasher;
pub use hasher::CredentialVerifier;
pub use hasher::DECOY_HASH;
