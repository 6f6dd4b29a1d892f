//! car-rental: CLI server
//!
//! ```sh
//! # Run with default config (~/.config/car-rental/config.toml)
//! car-rental
//!
//! # Custom config path
//! car-rental --config /etc/car-rental/config.toml
//!
//! # Try the API without a database
//! car-rental --memory --api-port 8080
//!
//! # Validate config without starting
//! car-rental --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use car_rental::config::{default_config_path, AppConfig};
use car_rental::server::{init_tracing, ServerHandle, ServerOptions};

/// Car rental booking service.
#[derive(Parser, Debug)]
#[command(
    name = "car-rental",
    version,
    about = "REST API for booking rental cars",
    long_about = "car-rental: REST API over cars, users, cities and reservations.\n\n\
                  Default config: ~/.config/car-rental/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "CAR_RENTAL_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Override the minimum reservation length in hours.
    #[arg(long)]
    min_hours: Option<u32>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Keep all data in memory instead of the configured database.
    #[arg(long)]
    memory: bool,

    /// Write the effective configuration to the config path and exit.
    #[arg(long)]
    write_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);

    let loaded = if config_path.exists() {
        Some(AppConfig::load(&config_path))
    } else {
        None
    };
    let mut config = match &loaded {
        Some(Ok(cfg)) => cfg.clone(),
        _ => AppConfig::default(),
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.api_port {
        config.server.api_port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(hours) = cli.min_hours {
        config.booking.minimum_reservation_hours = hours;
    }

    // Init tracing first so subsequent logs are formatted properly
    init_tracing(&config);
    match loaded {
        Some(Ok(_)) => info!("Configuration loaded from {}", config_path.display()),
        Some(Err(e)) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            if cli.check {
                return Err(e.into());
            }
            error!("Using default configuration.");
        }
        None => info!("No config at {}; using defaults", config_path.display()),
    }

    if cli.write_config {
        config.save(&config_path)?;
        println!("Configuration written to {}", config_path.display());
        return Ok(());
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("Configuration is valid");
        println!("   Config file   : {}", config_path.display());
        println!("   API address   : {}", config.server.address());
        println!("   Database      : {}", config.database.connection_url());
        println!("   Log level     : {}", config.logging.level);
        println!("   Min. hours    : {}", config.booking.minimum_reservation_hours);
        println!("   Conflict rule : {:?}", config.booking.conflict_rule);
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        in_memory: cli.memory,
    })
    .await?;

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
