//! Request and response payloads exchanged with the routing layer.

use serde::{Deserialize, Serialize};

use crate::crypto::validate_password;
use crate::error::{KlistraError, Result};

/// Shortest allowed paste lifetime (one minute).
pub const MIN_EXPIRY_SECONDS: u64 = 60;

/// Longest allowed paste lifetime (one week).
pub const MAX_EXPIRY_SECONDS: u64 = 604_800;

/// Create request: `{pasteText, pass, passProtect, expiry, files?}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePasteRequest {
    #[serde(default)]
    pub paste_text: String,

    #[serde(default)]
    pub pass: String,

    #[serde(default)]
    pub pass_protect: bool,

    /// Lifetime in seconds
    pub expiry: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
}

impl CreatePasteRequest {
    pub fn new(paste_text: impl Into<String>, expiry: u64) -> Self {
        Self {
            paste_text: paste_text.into(),
            expiry,
            ..Self::default()
        }
    }

    /// Require `pass` to open the paste.
    pub fn protected_by(mut self, pass: impl Into<String>) -> Self {
        self.pass = pass.into();
        self.pass_protect = true;
        self
    }

    pub fn with_files(mut self, files: Vec<String>) -> Self {
        self.files = Some(files);
        self
    }

    fn has_files(&self) -> bool {
        self.files.as_ref().is_some_and(|files| !files.is_empty())
    }

    /// Check bounds before anything is generated or stored.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_EXPIRY_SECONDS..=MAX_EXPIRY_SECONDS).contains(&self.expiry) {
            return Err(KlistraError::InvalidInput(format!(
                "Expiry must be between {} and {} seconds (got {})",
                MIN_EXPIRY_SECONDS, MAX_EXPIRY_SECONDS, self.expiry
            )));
        }

        validate_password(&self.pass, self.pass_protect)?;

        if self.paste_text.is_empty() && !self.has_files() {
            return Err(KlistraError::InvalidInput(
                "Paste text cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Read request: `{id, pass}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadPasteRequest {
    pub id: String,

    #[serde(default)]
    pub pass: String,
}

impl ReadPasteRequest {
    pub fn new(id: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pass: pass.into(),
        }
    }
}

/// A decrypted paste.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasteView {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    pub protected: bool,
    pub timeout_unix: i64,
}

/// Whether a paste exists and needs a password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasteStatus {
    pub id: String,
    pub protected: bool,
}

/// Read result, transport-encrypted when the session holds a transport key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteResponse {
    Plain(PasteView),
    Sealed(String),
}

impl PasteResponse {
    /// Response body as sent to the client.
    pub fn body(&self) -> Result<String> {
        match self {
            PasteResponse::Plain(view) => Ok(serde_json::to_string(view)?),
            PasteResponse::Sealed(envelope) => Ok(envelope.clone()),
        }
    }

    pub fn is_sealed(&self) -> bool {
        matches!(self, PasteResponse::Sealed(_))
    }
}
