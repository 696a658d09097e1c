use klistra_core::{PasteStore, Sweeper};
use tracing::info;

use crate::app::AppContext;
use crate::cli::DaemonArgs;
use crate::helpers::parse_duration;

pub fn handle_sweep(ctx: &AppContext) -> anyhow::Result<()> {
    let store = ctx.open_existing_store()?;
    let removed = store.sweep()?;
    println!("{}", removed);
    Ok(())
}

pub fn handle_daemon(ctx: &AppContext, args: &DaemonArgs) -> anyhow::Result<()> {
    let interval = match args.interval.as_deref() {
        Some(value) => parse_duration(value)?,
        None => ctx.sweep_interval(),
    };
    let store = ctx.open_store()?;

    let removed = store.sweep()?;
    info!(removed, "initial sweep");

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| anyhow::anyhow!("Failed to start async runtime: {}", e))?;
    runtime.block_on(async {
        let handle = Sweeper::spawn(store, interval);
        if !ctx.quiet() {
            eprintln!(
                "Sweeping every {}s; press Ctrl-C to stop.",
                interval.as_secs()
            );
        }
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to listen for Ctrl-C: {}", e))?;
        handle.stop().await?;
        Ok::<(), anyhow::Error>(())
    })
}
