use std::path::PathBuf;

use klistra_core::service::{MAX_EXPIRY_SECONDS, MIN_EXPIRY_SECONDS};
use klistra_core::{PasteStore, SqlitePasteStore};

use crate::app::{resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{write_config, KlistraConfig};
use crate::errors::CliError;
use crate::helpers::parse_duration;

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let config_path = resolve_config_path()?;
    if config_path.exists() && !args.force {
        return Err(CliError::invalid_input(format!(
            "Config already exists at {}. Use --force to overwrite.",
            config_path.display()
        ))
        .into());
    }

    let db_path = match args.db_path.as_deref() {
        Some(path) => PathBuf::from(path),
        None => ctx.db_path()?,
    };

    let expiry = match args.expiry.as_deref() {
        Some(value) => parse_duration(value)?.as_secs(),
        None => ctx.default_expiry().as_secs(),
    };
    if !(MIN_EXPIRY_SECONDS..=MAX_EXPIRY_SECONDS).contains(&expiry) {
        return Err(CliError::invalid_input(format!(
            "Default expiry must be between {} and {} seconds (got {})",
            MIN_EXPIRY_SECONDS, MAX_EXPIRY_SECONDS, expiry
        ))
        .into());
    }

    let interval = match args.sweep_interval.as_deref() {
        Some(value) => parse_duration(value)?.as_secs(),
        None => ctx.sweep_interval().as_secs(),
    };

    // Creates the file and schema; an existing database is kept as is.
    let store = SqlitePasteStore::open(&db_path)?;
    let swept = store.sweep()?;

    write_config(
        &config_path,
        &KlistraConfig::new(db_path.clone(), expiry, interval),
    )?;

    if !ctx.quiet() {
        println!("Config written to {}", config_path.display());
        println!("Database at {}", db_path.display());
        if swept > 0 {
            println!("Removed {} expired pastes", swept);
        }
    }
    Ok(())
}
