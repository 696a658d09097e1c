//! At-rest paste record.

use serde::{Deserialize, Serialize};

use crate::error::{KlistraError, Result};

/// An encrypted paste as persisted in the store.
///
/// Serialized as `{id, text?, files?, protected, timeoutUnix, salt}`.
/// Records are written once at creation and never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paste {
    /// Paste identifier
    pub id: String,

    /// Encrypted body, base64 (nonce ‖ ciphertext ‖ tag)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Encrypted JSON list of auxiliary file references
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<String>,

    /// Whether a user-chosen password was required
    pub protected: bool,

    /// Absolute expiry, unix seconds
    pub timeout_unix: i64,

    /// Per-paste salt, base64
    pub salt: String,
}

impl Paste {
    /// Serialize for storage.
    pub fn to_record(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| KlistraError::Storage(format!("Failed to serialize paste: {}", e)))
    }

    /// Parse a stored record.
    pub fn from_record(record: &str) -> Result<Self> {
        serde_json::from_str(record)
            .map_err(|e| KlistraError::Storage(format!("Corrupt paste record: {}", e)))
    }
}
