//! Password hashing and verification.
//!
//! Hashes are Argon2id in PHC string format, stored as opaque bytes. The
//! encoded hash carries its own parameters, so hashes produced under an older
//! work factor still verify after the configuration changes.
//!
//! Hashing is deliberately slow. Callers on an async runtime should run
//! `hash` and `verify` on the blocking pool.

use std::sync::Arc;

use argon2::password_hash::{self, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHash, Version};
use argon2::{PasswordHasher as _, PasswordVerifier as _};
use rand::RngCore;

/// Number of random salt bytes per hash.
const SALT_LEN: usize = 16;

/// Plaintext hashed once at construction to produce the timing decoy.
const DUMMY_PASSWORD: &str = "timing-decoy-password";

/// Errors from hashing or verifying passwords.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// The configured work factor was rejected.
    #[error("invalid hash parameters: {0}")]
    InvalidParams(String),
    /// Hashing failed (salt generation or hash computation).
    #[error("password hashing failed: {0}")]
    Hashing(String),
    /// The stored hash could not be parsed.
    #[error("malformed password hash")]
    MalformedHash,
}

/// Argon2 work factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// One-way password hasher with a fixed work factor.
///
/// Cheap to clone; clones share the timing decoy.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    dummy_hash: Arc<[u8]>,
}

impl PasswordHasher {
    /// Build a hasher for the given work factor.
    ///
    /// Runs one hash up front to produce the decoy used by `verify_dummy`.
    ///
    /// # Errors
    /// Returns `PasswordError::InvalidParams` if Argon2 rejects the parameters,
    /// or `PasswordError::Hashing` if the decoy hash fails.
    pub fn new(params: HashParams) -> Result<Self, PasswordError> {
        let params = Params::new(
            params.memory_kib,
            params.iterations,
            params.parallelism,
            None,
        )
        .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let dummy_hash = hash_with(&argon2, DUMMY_PASSWORD)?;

        Ok(Self {
            argon2,
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Hash a password with a fresh random salt.
    ///
    /// # Errors
    /// Returns `PasswordError::Hashing` on salt or hash failure. There is no
    /// fallback scheme.
    pub fn hash(&self, password: &str) -> Result<Vec<u8>, PasswordError> {
        hash_with(&self.argon2, password)
    }

    /// Check a password against a stored hash in constant time.
    ///
    /// Returns `Ok(false)` on mismatch.
    ///
    /// # Errors
    /// Returns `PasswordError::MalformedHash` if `hash` is not a valid encoded
    /// hash.
    pub fn verify(&self, hash: &[u8], password: &str) -> Result<bool, PasswordError> {
        let encoded = std::str::from_utf8(hash).map_err(|_| PasswordError::MalformedHash)?;
        let parsed = PasswordHash::new(encoded).map_err(|_| PasswordError::MalformedHash)?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(_) => Err(PasswordError::MalformedHash),
        }
    }

    /// Spend the same work as a real verification and discard the result.
    ///
    /// Used when the account does not exist so the response time does not
    /// reveal that.
    pub fn verify_dummy(&self, password: &str) {
        let _ = self.verify(&self.dummy_hash, password);
    }
}

fn hash_with(argon2: &Argon2<'_>, password: &str) -> Result<Vec<u8>, PasswordError> {
    let mut salt_bytes = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt_bytes);
    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|e| PasswordError::Hashing(e.to_string()))?;

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hashing(e.to_string()))?;

    Ok(hash.to_string().into_bytes())
}
