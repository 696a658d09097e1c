//! Paste orchestration.
//!
//! `PasteService` composes identifier generation, key derivation, content
//! encryption and the store into create/read/status operations. The store
//! and the session collaborator are injected at construction; nothing is
//! looked up through global state.
//!
//! Every operation is synchronous. Create and read each run one Argon2id
//! derivation per attempt, so expect tens to hundreds of milliseconds.

mod requests;

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::crypto::{content, derive_key, transport, DerivedKey, Salt, TransportKey};
use crate::error::{KlistraError, Result};
use crate::id::IdGenerator;
use crate::session::{SessionHandle, SessionValues, CREATED_PASTE, TRANSPORT_KEY};
use crate::storage::{Paste, PasteStore};

pub use requests::{
    CreatePasteRequest, PasteResponse, PasteStatus, PasteView, ReadPasteRequest, MAX_EXPIRY_SECONDS,
    MIN_EXPIRY_SECONDS,
};

/// Commit attempts before a create gives up on finding a free identifier.
const MAX_COMMIT_ATTEMPTS: usize = 5;

/// Create/read/status over an injected store and session collaborator.
pub struct PasteService {
    store: Arc<dyn PasteStore>,
    sessions: Arc<dyn SessionValues>,
    ids: IdGenerator,
}

impl PasteService {
    pub fn new(store: Arc<dyn PasteStore>, sessions: Arc<dyn SessionValues>) -> Self {
        Self {
            store,
            sessions,
            ids: IdGenerator::new(),
        }
    }

    pub fn with_id_generator(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }

    /// Return the session's transport key as hex, creating it on first request.
    ///
    /// An existing key is never rotated.
    pub fn transport_key(&self, session: &SessionHandle) -> Result<String> {
        if let Some(existing) = self.session_transport_key(session)? {
            return Ok(existing.to_hex());
        }

        let key = TransportKey::generate()?;
        let encoded = key.to_hex();
        self.sessions.set(session, TRANSPORT_KEY, &encoded)?;
        Ok(encoded)
    }

    fn session_transport_key(&self, session: &SessionHandle) -> Result<Option<TransportKey>> {
        self.sessions
            .get(session, TRANSPORT_KEY)?
            .map(|encoded| {
                TransportKey::from_hex(&encoded).map_err(|e| {
                    KlistraError::Session(format!("Stored transport key is unusable: {}", e))
                })
            })
            .transpose()
    }

    /// Decode an inbound request body.
    ///
    /// With a transport key in the session the body must be a transport
    /// envelope (optionally as a JSON string literal); anything that fails to
    /// decrypt is rejected rather than read as plain JSON. Without a key the
    /// body is parsed as plain JSON.
    pub fn decode_request<T: DeserializeOwned>(
        &self,
        session: &SessionHandle,
        body: &str,
    ) -> Result<T> {
        let Some(key) = self.session_transport_key(session)? else {
            return Ok(serde_json::from_str(body)?);
        };

        let trimmed = body.trim();
        let envelope = if trimmed.starts_with('"') {
            serde_json::from_str::<String>(trimmed).map_err(|_| {
                KlistraError::Authentication("Malformed transport envelope".to_string())
            })?
        } else {
            trimmed.to_string()
        };

        let value: serde_json::Value = transport::decrypt_json(&envelope, &key)?;
        serde_json::from_value(value).map_err(|e| KlistraError::InvalidInput(e.to_string()))
    }

    /// Encrypt and store a new paste, returning its identifier.
    ///
    /// The identifier is committed with a conditional insert; if another
    /// create claimed it after the existence check, a new one is generated.
    /// `timeoutUnix` is the expiry the store itself enforces.
    pub fn create(&self, session: &SessionHandle, request: &CreatePasteRequest) -> Result<String> {
        request.validate()?;
        let ttl = Duration::from_secs(request.expiry);

        for attempt in 1..=MAX_COMMIT_ATTEMPTS {
            let id = self.ids.generate(self.store.as_ref())?;
            let expires_at = self.store.expires_at(ttl)?;
            let paste = self.seal(&id, request, expires_at)?;

            match self.store.insert_new(&id, &paste.to_record()?, expires_at) {
                Ok(()) => {
                    self.sessions.set(session, CREATED_PASTE, &id)?;
                    info!(
                        protected = paste.protected,
                        expiry = request.expiry,
                        "created paste"
                    );
                    return Ok(id);
                }
                Err(KlistraError::Conflict(_)) => {
                    warn!(attempt, "identifier taken at commit, regenerating");
                }
                Err(err) => return Err(err),
            }
        }

        Err(KlistraError::Storage(format!(
            "No free identifier after {} commit attempts",
            MAX_COMMIT_ATTEMPTS
        )))
    }

    fn seal(&self, id: &str, request: &CreatePasteRequest, timeout_unix: i64) -> Result<Paste> {
        let salt = Salt::random()?;
        let password = if request.pass_protect {
            request.pass.as_str()
        } else {
            id
        };
        let key = derive_key(password.as_bytes(), &salt)?;

        let text = if request.paste_text.is_empty() {
            None
        } else {
            Some(content::encrypt(request.paste_text.as_bytes(), &key)?)
        };

        let files = match &request.files {
            Some(files) if !files.is_empty() => {
                Some(content::encrypt(&serde_json::to_vec(files)?, &key)?)
            }
            _ => None,
        };

        Ok(Paste {
            id: id.to_string(),
            text,
            files,
            protected: request.pass_protect,
            timeout_unix,
            salt: salt.to_base64(),
        })
    }

    /// Decrypt a paste, sealing the response if the session has a transport key.
    ///
    /// # Errors
    ///
    /// - `KlistraError::NotFound` if the paste is absent or expired
    /// - `KlistraError::Authentication` if the password is missing or wrong
    pub fn read(&self, session: &SessionHandle, request: &ReadPasteRequest) -> Result<PasteResponse> {
        if request.id.trim().is_empty() {
            return Err(KlistraError::InvalidInput("Paste id is required".to_string()));
        }

        let paste = Paste::from_record(&self.store.get(&request.id)?)?;

        if paste.protected && request.pass.is_empty() {
            return Err(KlistraError::Authentication("Password required".to_string()));
        }
        let password = if paste.protected {
            request.pass.as_str()
        } else {
            paste.id.as_str()
        };

        let salt = Salt::from_base64(&paste.salt)?;
        let key = derive_key(password.as_bytes(), &salt)?;
        let view = Self::open(&paste, &key)?;

        match self.session_transport_key(session)? {
            Some(transport_key) => Ok(PasteResponse::Sealed(transport::encrypt_json(
                &view,
                &transport_key,
            )?)),
            None => Ok(PasteResponse::Plain(view)),
        }
    }

    fn open(paste: &Paste, key: &DerivedKey) -> Result<PasteView> {
        let text = match &paste.text {
            Some(sealed) => String::from_utf8(content::decrypt(sealed, key)?)
                .map_err(|_| KlistraError::Storage("Paste text is not valid UTF-8".to_string()))?,
            None => String::new(),
        };

        let files = paste
            .files
            .as_deref()
            .map(|sealed| -> Result<Vec<String>> {
                let raw = content::decrypt(sealed, key)?;
                serde_json::from_slice(&raw).map_err(|e| {
                    KlistraError::Storage(format!("Corrupt file list: {}", e))
                })
            })
            .transpose()?;

        Ok(PasteView {
            id: paste.id.clone(),
            text,
            files,
            protected: paste.protected,
            timeout_unix: paste.timeout_unix,
        })
    }

    /// Whether `id` is live and whether it needs a password.
    pub fn status(&self, id: &str) -> Result<PasteStatus> {
        let paste = Paste::from_record(&self.store.get(id)?)?;
        Ok(PasteStatus {
            id: paste.id,
            protected: paste.protected,
        })
    }

    /// The id of the last paste created in this session, if any.
    pub fn last_created(&self, session: &SessionHandle) -> Result<Option<String>> {
        self.sessions.get(session, CREATED_PASTE)
    }
}
