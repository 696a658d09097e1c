//! # Klistra Core
//!
//! Core library for Klistra - ephemeral, encrypted, self-destructing pastes.
//!
//! Paste bodies are encrypted at rest with a key derived from either the
//! user's password or, for unprotected pastes, the paste identifier itself.
//! Records expire after a bounded lifetime and are removed lazily on read and
//! periodically by the sweeper.
//!
//! ## Architecture
//!
//! - **crypto**: key derivation, content cipher, transport cipher
//! - **id**: word-plus-digits identifier generation
//! - **storage**: `PasteStore` trait and the SQLite implementation
//! - **session**: per-session value collaborator
//! - **service**: create/read/status orchestration
//! - **sweeper**: periodic expiry task

pub mod clock;
pub mod crypto;
pub mod error;
pub mod id;
pub mod service;
pub mod session;
pub mod storage;
pub mod sweeper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{KlistraError, Result};
pub use id::IdGenerator;
pub use service::{
    CreatePasteRequest, PasteResponse, PasteService, PasteStatus, PasteView, ReadPasteRequest,
};
pub use session::{MemorySessions, SessionHandle, SessionValues};
pub use storage::{PasteStore, SqlitePasteStore};
pub use sweeper::{Sweeper, SweeperHandle, DEFAULT_SWEEP_INTERVAL};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
