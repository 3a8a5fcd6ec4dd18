// Mock draft tracker entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Parse arguments and load config
// 3. Open the draft store
// 4. Build the Sleeper importer
// 5. Run the subcommand against stdout

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use mockadp_cli::cli::Cli;
use mockadp_cli::commands::{self, Tracker};
use mockadp_cli::config;
use mockadp_sleeper::{Importer, SleeperClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let cli = Cli::parse();
    info!("mockadp starting: {:?}", cli.command);

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: store={}, identity={:?}, seasons={:?}",
        config.store_path.display(),
        config.adp.identity,
        config.sleeper.seasons
    );

    let mut tracker = Tracker::open(config, cli.store);
    if let Some(notice) = tracker.store_notice() {
        eprintln!("{notice}");
    }

    let client = SleeperClient::new(
        tracker.config.sleeper.base_url.clone(),
        Duration::from_secs(tracker.config.sleeper.timeout_secs),
    )
    .context("failed to build Sleeper client")?;
    let mut importer = Importer::new(client);

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = commands::execute(cli.command, &mut tracker, &mut importer, &mut stdout).await {
        error!("Command failed: {e:#}");
        return Err(e);
    }

    info!("mockadp finished");
    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("mockadp.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mockadp=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
