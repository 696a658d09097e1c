//! Key derivation using Argon2id.
//!
//! Every paste gets its own random salt; the paste key is derived from the
//! user's password (or, for unprotected pastes, the paste id) and that salt.
//! There is no stored verifier: a wrong password simply yields a key that
//! fails authenticated decryption.

use argon2::Argon2;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::ZeroizeOnDrop;

use crate::error::{KlistraError, Result};

/// Argon2id parameters.
///
/// - Memory: 64 MiB (64 * 1024 KiB)
/// - Iterations: 3
/// - Parallelism: 4
const ARGON2_MEMORY_KB: u32 = 64 * 1024;
const ARGON2_ITERATIONS: u32 = 3;
const ARGON2_PARALLELISM: u32 = 4;

/// Length of derived key in bytes.
pub const KEY_LENGTH: usize = 32;

/// Length of a paste salt in bytes.
pub const SALT_LENGTH: usize = 16;

/// A per-paste random salt.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Salt([u8; SALT_LENGTH]);

impl Salt {
    /// Draw a fresh salt from the OS CSPRNG.
    pub fn random() -> Result<Self> {
        let mut bytes = [0u8; SALT_LENGTH];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| KlistraError::Crypto(format!("Failed to generate salt: {}", e)))?;
        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: [u8; SALT_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Decode a salt stored as base64.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let decoded = STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| KlistraError::Storage(format!("Invalid salt encoding: {}", e)))?;
        let bytes: [u8; SALT_LENGTH] = decoded.try_into().map_err(|v: Vec<u8>| {
            KlistraError::Storage(format!(
                "Salt must be {} bytes (got {})",
                SALT_LENGTH,
                v.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_LENGTH] {
        &self.0
    }
}

impl std::fmt::Debug for Salt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Salt").field(&self.to_base64()).finish()
    }
}

/// A cryptographic key derived from a password.
///
/// Key material is zeroized from memory when dropped.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    /// Create a new DerivedKey from raw bytes.
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive a paste key from a password and salt using Argon2id.
///
/// Same password + salt always produces the same key. Expect tens to
/// hundreds of milliseconds and ~64 MiB of memory per call.
///
/// # Examples
///
/// ```
/// use klistra_core::crypto::{derive_key, Salt};
///
/// let salt = Salt::from_bytes(*b"unique-salt-16by");
/// let key = derive_key(b"my-password", &salt).unwrap();
/// assert_eq!(key.as_bytes().len(), 32);
/// ```
pub fn derive_key(password: &[u8], salt: &Salt) -> Result<DerivedKey> {
    if password.is_empty() {
        return Err(KlistraError::InvalidInput(
            "Password cannot be empty".to_string(),
        ));
    }

    let params = argon2::Params::new(
        ARGON2_MEMORY_KB,
        ARGON2_ITERATIONS,
        ARGON2_PARALLELISM,
        Some(KEY_LENGTH),
    )
    .map_err(|e| KlistraError::Crypto(format!("Failed to create Argon2 params: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let mut key_bytes = [0u8; KEY_LENGTH];
    argon2
        .hash_password_into(password, salt.as_bytes(), &mut key_bytes)
        .map_err(|e| KlistraError::Crypto(format!("Key derivation failed: {}", e)))?;

    Ok(DerivedKey::from_bytes(key_bytes))
}
