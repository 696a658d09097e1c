//! Session-scoped transport obfuscation for request and response bodies.
//!
//! AES-256-CBC with PKCS7 padding and a random 16-byte IV per call, keyed by
//! a 32-byte key held in the caller's session. The envelope is
//! `base64(iv ‖ ciphertext)` around the JSON form of the payload.
//!
//! This layer carries no integrity tag. It hides bodies from intermediaries
//! that only see the session cookie and sits underneath TLS, not in place of
//! it. Flipping bits in the IV changes the first plaintext block in a
//! controlled way; flipping ciphertext bits garbles a whole block, which the
//! padding check or the JSON parse rejects.

use aes::Aes256;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use cbc::cipher::block_padding::{NoPadding, Pkcs7};
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use zeroize::ZeroizeOnDrop;

use crate::error::{KlistraError, Result};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// AES block size, also the IV length.
pub const BLOCK_SIZE: usize = 16;

/// Transport key length in bytes.
pub const TRANSPORT_KEY_LENGTH: usize = 32;

/// Raw key material bound to one session.
#[derive(Clone, ZeroizeOnDrop)]
pub struct TransportKey {
    key: [u8; TRANSPORT_KEY_LENGTH],
}

impl TransportKey {
    /// Generate a fresh key from the OS CSPRNG.
    pub fn generate() -> Result<Self> {
        let mut key = [0u8; TRANSPORT_KEY_LENGTH];
        OsRng
            .try_fill_bytes(&mut key)
            .map_err(|e| KlistraError::Crypto(format!("Failed to generate transport key: {}", e)))?;
        Ok(Self { key })
    }

    pub fn from_bytes(key: [u8; TRANSPORT_KEY_LENGTH]) -> Self {
        Self { key }
    }

    /// Parse the hex form kept in the session.
    pub fn from_hex(encoded: &str) -> Result<Self> {
        let bytes = hex::decode(encoded.trim())
            .map_err(|e| KlistraError::InvalidInput(format!("Invalid transport key: {}", e)))?;
        let key: [u8; TRANSPORT_KEY_LENGTH] = bytes.try_into().map_err(|v: Vec<u8>| {
            KlistraError::InvalidInput(format!(
                "Transport key must be {} bytes (got {})",
                TRANSPORT_KEY_LENGTH,
                v.len()
            ))
        })?;
        Ok(Self { key })
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.key)
    }

    pub fn as_bytes(&self) -> &[u8; TRANSPORT_KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for TransportKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Serialize `value` to JSON and encrypt it into a transport envelope.
pub fn encrypt_json<T: Serialize + ?Sized>(value: &T, key: &TransportKey) -> Result<String> {
    let json = serde_json::to_vec(value)?;

    let mut iv = [0u8; BLOCK_SIZE];
    OsRng
        .try_fill_bytes(&mut iv)
        .map_err(|e| KlistraError::Crypto(format!("Failed to generate IV: {}", e)))?;

    let encryptor = Aes256CbcEnc::new_from_slices(key.as_bytes(), &iv)
        .map_err(|e| KlistraError::Crypto(format!("Failed to create cipher: {}", e)))?;

    // PKCS7 always adds 1..=16 bytes.
    let msg_len = json.len();
    let mut buffer = vec![0u8; msg_len + BLOCK_SIZE - msg_len % BLOCK_SIZE];
    buffer[..msg_len].copy_from_slice(&json);
    let ciphertext = encryptor
        .encrypt_padded_mut::<Pkcs7>(&mut buffer, msg_len)
        .map_err(|_| KlistraError::Crypto("Padding failed".to_string()))?;

    let mut envelope = Vec::with_capacity(BLOCK_SIZE + ciphertext.len());
    envelope.extend_from_slice(&iv);
    envelope.extend_from_slice(ciphertext);
    Ok(STANDARD.encode(envelope))
}

/// Decrypt a transport envelope and parse the payload.
///
/// # Errors
///
/// Returns `KlistraError::Authentication` if the envelope is malformed, the
/// padding is invalid or the plaintext is not the expected JSON.
pub fn decrypt_json<T: DeserializeOwned>(encoded: &str, key: &TransportKey) -> Result<T> {
    let plaintext = decrypt_bytes(encoded, key)?;
    serde_json::from_slice(&plaintext)
        .map_err(|_| KlistraError::Authentication("Transport payload is not valid JSON".to_string()))
}

fn decrypt_bytes(encoded: &str, key: &TransportKey) -> Result<Vec<u8>> {
    let data = STANDARD
        .decode(encoded.trim().as_bytes())
        .map_err(|_| KlistraError::Authentication("Malformed transport envelope".to_string()))?;

    if data.len() < BLOCK_SIZE {
        return Err(KlistraError::Authentication(
            "Transport envelope too short".to_string(),
        ));
    }

    let (iv, ciphertext) = data.split_at(BLOCK_SIZE);
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(KlistraError::Authentication(
            "Ciphertext is not a multiple of the block size".to_string(),
        ));
    }

    let decryptor = Aes256CbcDec::new_from_slices(key.as_bytes(), iv)
        .map_err(|e| KlistraError::Crypto(format!("Failed to create cipher: {}", e)))?;

    let mut buffer = ciphertext.to_vec();
    let padded = decryptor
        .decrypt_padded_mut::<NoPadding>(&mut buffer)
        .map_err(|_| KlistraError::Authentication("Invalid padding".to_string()))?;

    let unpadded_len = strip_padding(padded)?;
    Ok(padded[..unpadded_len].to_vec())
}

/// Validate a PKCS7 run and return the unpadded length.
///
/// Every padding byte is checked, not just the last one.
fn strip_padding(padded: &[u8]) -> Result<usize> {
    let invalid = || KlistraError::Authentication("Invalid padding".to_string());

    let &last = padded.last().ok_or_else(invalid)?;
    let padding = usize::from(last);
    if padding == 0 || padding > BLOCK_SIZE || padding > padded.len() {
        return Err(invalid());
    }

    let mismatch = padded[padded.len() - padding..]
        .iter()
        .fold(0u8, |acc, &byte| acc | (byte ^ last));
    if mismatch != 0 {
        return Err(invalid());
    }

    Ok(padded.len() - padding)
}
