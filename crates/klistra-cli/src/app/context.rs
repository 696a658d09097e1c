//! Application context for the Klistra CLI.
//!
//! Bundles CLI arguments with the loaded config so handlers do not thread
//! paths and defaults through every call.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use klistra_core::{MemorySessions, PasteService, SqlitePasteStore};
use tracing::debug;

use crate::cli::Cli;
use crate::config::{read_config, KlistraConfig};
use crate::errors::CliError;

use super::resolver::{missing_db_message, resolve_config_path, resolve_db_path};

pub struct AppContext<'a> {
    cli: &'a Cli,
    config: KlistraConfig,
}

impl<'a> AppContext<'a> {
    /// Load the config file if present; a missing file means defaults.
    pub fn new(cli: &'a Cli) -> anyhow::Result<Self> {
        let config_path = resolve_config_path()?;
        let config = if config_path.exists() {
            debug!(path = %config_path.display(), "loading config");
            read_config(&config_path)?
        } else {
            KlistraConfig::default()
        };
        Ok(Self { cli, config })
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    pub fn db_path(&self) -> anyhow::Result<PathBuf> {
        resolve_db_path(self.cli.db.as_deref(), &self.config)
    }

    pub fn default_expiry(&self) -> Duration {
        Duration::from_secs(self.config.paste.default_expiry_seconds)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.config.sweeper.interval_seconds.max(1))
    }

    /// Open the store, creating the database file if needed.
    pub fn open_store(&self) -> anyhow::Result<Arc<SqlitePasteStore>> {
        let path = self.db_path()?;
        Ok(Arc::new(SqlitePasteStore::open(&path)?))
    }

    /// Open an existing store; used by commands that only read or delete.
    pub fn open_existing_store(&self) -> anyhow::Result<Arc<SqlitePasteStore>> {
        let path = self.db_path()?;
        if !path.exists() {
            return Err(CliError::not_found(
                missing_db_message(&path),
                "Hint: Run `klistra init` or create a paste first.",
            )
            .into());
        }
        Ok(Arc::new(SqlitePasteStore::open(&path)?))
    }

    /// Service over `store` with a process-local session.
    pub fn service(&self, store: Arc<SqlitePasteStore>) -> PasteService {
        PasteService::new(store, Arc::new(MemorySessions::new()))
    }
}
