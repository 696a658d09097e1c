//! Cryptographic operations for Klistra.
//!
//! Two independent layers:
//! - **Content**: Argon2id-derived per-paste keys with XChaCha20-Poly1305,
//!   protecting paste bodies at rest.
//! - **Transport**: a session-bound AES-256-CBC key obscuring request and
//!   response bodies. Confidentiality only; no integrity tag.
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the paste database
//! - Offline brute-force of paste passwords (memory-hard KDF)
//! - Intermediaries that see the session cookie but not message passwords
//!
//! We do NOT defend against:
//! - Anyone who knows the id of an unprotected paste
//! - Active tampering with transport envelopes (no MAC on that layer)

pub mod content;
pub mod key;
pub mod password;
pub mod transport;

pub use key::{derive_key, DerivedKey, Salt, KEY_LENGTH, SALT_LENGTH};
pub use password::{validate_password, MAX_PASSWORD_LENGTH};
pub use transport::TransportKey;
