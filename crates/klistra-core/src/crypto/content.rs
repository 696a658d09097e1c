//! Authenticated encryption of paste content.
//!
//! XChaCha20-Poly1305 with a fresh 24-byte nonce from the OS CSPRNG on every
//! call. The extended nonce keeps random nonces collision-safe without any
//! counter state shared between calls.
//!
//! Wire format: `base64(nonce ‖ ciphertext ‖ tag)`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use rand::rngs::OsRng;
use rand::RngCore;

use super::key::DerivedKey;
use crate::error::{KlistraError, Result};

/// XChaCha20 nonce length in bytes.
pub const NONCE_LENGTH: usize = 24;

/// Poly1305 tag length in bytes.
pub const TAG_LENGTH: usize = 16;

fn cipher_for(key: &DerivedKey) -> Result<XChaCha20Poly1305> {
    XChaCha20Poly1305::new_from_slice(key.as_bytes())
        .map_err(|e| KlistraError::Crypto(format!("Failed to create cipher: {}", e)))
}

/// Encrypt `plaintext` under `key`.
///
/// # Examples
///
/// ```
/// use klistra_core::crypto::{content, derive_key, Salt};
///
/// let key = derive_key(b"secret1", &Salt::random().unwrap()).unwrap();
/// let sealed = content::encrypt(b"hello", &key).unwrap();
/// assert_eq!(content::decrypt(&sealed, &key).unwrap(), b"hello");
/// ```
pub fn encrypt(plaintext: &[u8], key: &DerivedKey) -> Result<String> {
    let cipher = cipher_for(key)?;

    let mut nonce = [0u8; NONCE_LENGTH];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| KlistraError::Crypto(format!("Failed to generate nonce: {}", e)))?;

    let ciphertext = cipher
        .encrypt(XNonce::from_slice(&nonce), plaintext)
        .map_err(|_| KlistraError::Crypto("Encryption failed".to_string()))?;

    let mut sealed = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
    sealed.extend_from_slice(&nonce);
    sealed.extend_from_slice(&ciphertext);
    Ok(STANDARD.encode(sealed))
}

/// Decrypt a value produced by [`encrypt`].
///
/// # Errors
///
/// Returns `KlistraError::Authentication` if:
/// - The input is not valid base64
/// - The decoded input is shorter than the nonce
/// - The tag does not verify (wrong key or tampered data)
pub fn decrypt(encoded: &str, key: &DerivedKey) -> Result<Vec<u8>> {
    let decoded = STANDARD
        .decode(encoded.as_bytes())
        .map_err(|_| KlistraError::Authentication("Malformed ciphertext encoding".to_string()))?;

    if decoded.len() < NONCE_LENGTH {
        return Err(KlistraError::Authentication(
            "Ciphertext too short".to_string(),
        ));
    }

    let (nonce, ciphertext) = decoded.split_at(NONCE_LENGTH);
    let cipher = cipher_for(key)?;

    cipher
        .decrypt(XNonce::from_slice(nonce), ciphertext)
        .map_err(|_| KlistraError::Authentication("Incorrect password".to_string()))
}
