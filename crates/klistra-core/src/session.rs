//! Session-value collaborator.
//!
//! The core never manages session identity, signing or cookies. It only
//! reads and writes opaque string values under a handle supplied by the
//! routing layer. Two keys are used: the hex transport key and the id of the
//! most recently created paste.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::error::{KlistraError, Result};

/// Session key holding the hex-encoded transport key.
pub const TRANSPORT_KEY: &str = "transport_key";

/// Session key holding the id of the last paste created in the session.
pub const CREATED_PASTE: &str = "createdPaste";

/// Opaque handle naming one client session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionHandle(String);

impl SessionHandle {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// A fresh random handle.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// Get/set access to per-session string values.
pub trait SessionValues: Send + Sync {
    fn get(&self, session: &SessionHandle, key: &str) -> Result<Option<String>>;

    fn set(&self, session: &SessionHandle, key: &str, value: &str) -> Result<()>;
}

/// Process-local session values, for tests and single-process front ends.
#[derive(Debug, Default)]
pub struct MemorySessions {
    values: RwLock<HashMap<SessionHandle, HashMap<String, String>>>,
}

impl MemorySessions {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionValues for MemorySessions {
    fn get(&self, session: &SessionHandle, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|_| KlistraError::Session("Session map poisoned".to_string()))?;
        Ok(values
            .get(session)
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    fn set(&self, session: &SessionHandle, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| KlistraError::Session("Session map poisoned".to_string()))?;
        values
            .entry(session.clone())
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
