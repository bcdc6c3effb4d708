//! CERIA SKM - survey satisfaction dashboard
//!
//! Reads community satisfaction survey responses from a Google Sheets
//! worksheet, scores the Likert answers and reports per-question,
//! overall and per-Puskesmas averages, either live over HTTP or as a
//! static snapshot directory.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad arguments, config, credentials, fetch, write)

mod cli;
mod config;
mod models;
mod report;
mod sheets;
mod snapshot;
mod survey;
mod web;

use anyhow::{Context, Result};
use cli::{Args, Command};
use config::{Config, DEFAULT_CONFIG_FILE};
use report::SystemClock;
use sheets::GoogleSheetsClient;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use web::AppContext;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("CERIA SKM v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", redacted(&args));

    if let Err(e) = run(args).await {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .ceria-skm.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to set the spreadsheet, threshold, exclusions and theme.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Arguments with the inline credentials blanked for logging.
fn redacted(args: &Args) -> Args {
    let mut args = args.clone();
    if args.credentials_json.is_some() {
        args.credentials_json = Some("<redacted>".to_string());
    }
    args
}

async fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate().context("Invalid configuration")?;

    match args.command {
        Some(Command::Serve { .. }) => run_server(config, &args).await,
        Some(Command::Snapshot { .. }) => run_snapshot(config, &args).await,
        None => anyhow::bail!("A subcommand is required: serve or snapshot"),
    }
}

/// Start the live web application.
async fn run_server(config: Config, args: &Args) -> Result<()> {
    let connection = GoogleSheetsClient::connect(&config.sheet, args.credentials_json.as_deref());

    println!("🌐 CERIA SKM dashboard");
    println!("   Spreadsheet: {}", config.sheet.spreadsheet_id);
    println!("   Worksheet: {}", config.sheet.worksheet);
    println!("   Threshold: {:.2}", config.survey.threshold);
    println!("   Listening on: http://{}", config.server.bind);

    let bind = config.server.bind.clone();
    let ctx = Arc::new(AppContext::new(&config, connection, Arc::new(SystemClock)));
    web::serve(ctx, &bind).await
}

/// Fetch once and write the static snapshot.
async fn run_snapshot(config: Config, args: &Args) -> Result<()> {
    let start_time = Instant::now();

    let connection = GoogleSheetsClient::connect(&config.sheet, args.credentials_json.as_deref());
    let client = connection
        .source()
        .context("Cannot build a snapshot without spreadsheet access")?;

    println!(
        "📥 Fetching worksheet '{}' from {}",
        config.sheet.worksheet, config.sheet.spreadsheet_id
    );
    let summary = snapshot::generate(client, &config).await?;

    println!("\n📊 Snapshot Summary:");
    println!("   Questions: {}", summary.data.labels.len());
    println!(
        "   Overall average: {:.2} ({})",
        summary.data.overall, summary.data.overall_remark
    );
    println!("   Puskesmas groups: {}", summary.data.grouped.len());
    println!("   Files written: {}", summary.files.len());
    println!("   Duration: {:.1}s", start_time.elapsed().as_secs_f64());
    println!(
        "\n✅ Snapshot complete! Written to: {}",
        summary.output_dir.display()
    );

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
