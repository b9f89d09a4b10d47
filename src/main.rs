//! ML-TN Sync - adjusts Tienda Nube prices from Mercado Libre prices
//!
//! Runs a single sync pass and exits. The exit code is non-zero when the
//! configuration, authentication, or a catalog fetch fails.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use ml_tn_sync::config::{self, Config, DEFAULT_CONFIG_PATH};
use ml_tn_sync::pacing::Pacer;
use ml_tn_sync::{MatchStrategy, MercadoLibreApi, SyncOrchestrator, TiendaNubeApi};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MatchBy {
    Sku,
    Name,
}

impl From<MatchBy> for MatchStrategy {
    fn from(value: MatchBy) -> Self {
        match value {
            MatchBy::Sku => MatchStrategy::BySku,
            MatchBy::Name => MatchStrategy::ByName,
        }
    }
}

/// Price sync between Mercado Libre and Tienda Nube
#[derive(Parser, Debug)]
#[command(name = "ml_tn_sync")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the credentials/settings file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Simulate the sync without changing any price
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Override the Mercado Libre commission percentage from the config
    #[arg(long)]
    commission: Option<f64>,

    /// Override how products are matched
    #[arg(long, value_enum)]
    match_by: Option<MatchBy>,

    /// Directory for daily log files
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Log to the console only
    #[arg(long, default_value_t = false)]
    no_log_file: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let log_dir = (!args.no_log_file).then_some(args.log_dir.as_path());
    if let Err(e) = ml_tn_sync::logging::init(args.debug, log_dir) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    log::info!("{}", "=".repeat(80));
    log::info!(
        "Starting ML-TN sync: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    let code = match run(&args).await {
        Ok(()) => {
            log::info!("Sync completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            if args.debug {
                log::error!("Sync failed: {e:?}");
            } else {
                log::error!("Sync failed: {e:#}");
            }
            ExitCode::FAILURE
        }
    };
    log::info!("{}", "=".repeat(80));
    code
}

async fn run(args: &Args) -> Result<()> {
    let config = Config::load(&args.config).context("Failed to load configuration")?;

    let mut settings = config.sync_settings(args.dry_run);
    if let Some(commission) = args.commission {
        config::validate_commission(commission).context("Invalid --commission")?;
        settings.commission_rate_percent = commission;
    }
    if let Some(match_by) = args.match_by {
        settings.match_strategy = match_by.into();
    }

    let ml_api = MercadoLibreApi::new(config.mercadolibre.user_id.clone())
        .with_pacer(Pacer::from_secs_f64(config.settings.ml_api_rate_limit));
    let tokens = ml_api
        .refresh_access_token(&config.mercadolibre)
        .await
        .context("Failed to authenticate with Mercado Libre")?;

    // The refresh token was consumed; losing the new one means re-authorizing by hand.
    if let Err(e) = config::persist_refresh_token(&args.config, &tokens.refresh_token) {
        log::error!(
            "Could not store the new refresh token in {}: {}",
            args.config.display(),
            e
        );
    }
    let ml_api = ml_api.with_access_token(tokens.access_token);

    let tn_api = TiendaNubeApi::new(config.tiendanube.api_key.clone(), &config.tiendanube.user_id)
        .with_pacer(Pacer::from_secs_f64(config.settings.tn_api_rate_limit));

    let orchestrator = SyncOrchestrator::new(ml_api, tn_api, settings);
    let outcome = orchestrator.run().await.context("Sync aborted")?;

    println!(
        "{} listings processed{}: {} updated, {} unchanged, {} unmatched",
        outcome.total(),
        if orchestrator.settings().dry_run { " (dry run)" } else { "" },
        outcome.updated,
        outcome.unchanged,
        outcome.unmatched
    );
    Ok(())
}
