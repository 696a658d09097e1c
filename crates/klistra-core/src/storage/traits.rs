//! Paste store trait definition.
//!
//! `PasteStore` is the seam between the service and the storage engine.
//! Records are opaque strings (serialized [`Paste`](super::Paste) values)
//! keyed by paste id, each with an absolute expiry.

use std::time::Duration;

use crate::error::Result;

/// Time-bounded key-value store for encrypted paste records.
///
/// All implementations must ensure:
/// - Callers never observe a record whose expiry has passed
/// - Each operation is atomic on its own; nothing spans operations
/// - Untrusted input is bound as parameters, never spliced into queries
pub trait PasteStore: Send + Sync {
    /// Insert or replace the record for `id`, expiring at `now + ttl`.
    ///
    /// An existing row for `id`, live or not, is silently overwritten.
    ///
    /// # Errors
    ///
    /// Returns `KlistraError::InvalidInput` if `ttl` is under one second.
    fn put(&self, id: &str, record: &str, ttl: Duration) -> Result<()>;

    /// Absolute expiry (unix seconds) this store assigns to a `ttl` issued now.
    ///
    /// Read from the store's own clock, so the value matches what `get` and
    /// `sweep` enforce.
    ///
    /// # Errors
    ///
    /// Returns `KlistraError::InvalidInput` if `ttl` is under one second.
    fn expires_at(&self, ttl: Duration) -> Result<i64>;

    /// Insert the record with an absolute `expires_at` only if no row holds `id`.
    ///
    /// Expired rows that have not been swept yet still count as taken.
    ///
    /// # Errors
    ///
    /// Returns `KlistraError::Conflict` if `id` is already present.
    fn insert_new(&self, id: &str, record: &str, expires_at: i64) -> Result<()>;

    /// Fetch the record for `id`.
    ///
    /// An expired row is deleted on the spot and reported as missing.
    ///
    /// # Errors
    ///
    /// Returns `KlistraError::NotFound` if absent or expired.
    fn get(&self, id: &str) -> Result<String>;

    /// Raw row existence, regardless of expiry.
    fn exists(&self, id: &str) -> Result<bool>;

    /// Remove `id`. Succeeds if nothing was there.
    fn delete(&self, id: &str) -> Result<()>;

    /// Delete every row whose expiry is in the past.
    ///
    /// # Returns
    ///
    /// Returns the number of rows removed.
    fn sweep(&self) -> Result<usize>;
}
