//! Storage layer for encrypted paste records.
//!
//! - **traits**: the `PasteStore` interface
//! - **types**: the at-rest `Paste` record
//! - **sqlite**: SQLite implementation with lazy and swept expiry

pub mod sqlite;
pub mod traits;
pub mod types;

pub use sqlite::SqlitePasteStore;
pub use traits::PasteStore;
pub use types::Paste;
