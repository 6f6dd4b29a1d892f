//! Reusable car-rental server runtime.
//!
//! [`ServerHandle`] owns the full lifecycle: storage init, migrations,
//! metrics recorder, REST API and graceful shutdown. The binary is a thin
//! CLI wrapper around it.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::{
    init_database, run_migrations, DatabaseConfig, InMemoryStorage, SeaOrmRepositoryProvider,
};
use crate::interfaces::http::modules::metrics;
use crate::interfaces::{create_api_router, AppState};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};
use crate::shared::{SharedClock, SystemClock};

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the server.
pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Keep everything in process memory instead of a database.
    pub in_memory: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            in_memory: false,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running server.
///
/// ```rust,no_run
/// use car_rental::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// Repository provider the services run on.
    pub repos: Arc<dyn RepositoryProvider>,
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Port the API is bound to; differs from the config when it asked for 0.
    pub api_port: u16,

    db: Option<DatabaseConnection>,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Start the server with the given options.
    ///
    /// 1. Install the Prometheus recorder
    /// 2. Connect to the database and migrate (unless in-memory)
    /// 3. Wire services and start the REST API
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;

        info!("Starting car-rental service...");

        let prometheus_handle = prometheus_handle();

        // ── Storage ────────────────────────────────────────────
        let (repos, db): (Arc<dyn RepositoryProvider>, Option<DatabaseConnection>) = if opts.in_memory {
            info!("Using in-memory storage; data is lost on exit");
            (Arc::new(InMemoryStorage::new()), None)
        } else {
            let db = init_database(&DatabaseConfig::from(&app_cfg.database)).await?;
            if opts.auto_migrate {
                run_migrations(&db).await?;
            }
            (Arc::new(SeaOrmRepositoryProvider::new(db.clone())), Some(db))
        };

        info!(
            minimum_reservation_hours = app_cfg.booking.minimum_reservation_hours,
            conflict_rule = ?app_cfg.booking.conflict_rule,
            "Booking rules loaded"
        );

        // ── REST API ───────────────────────────────────────────
        let clock: SharedClock = Arc::new(SystemClock);
        let state = AppState::new(repos.clone(), &app_cfg, clock, db.clone(), prometheus_handle);
        let api_router = create_api_router(state);

        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        let listener = tokio::net::TcpListener::bind(app_cfg.server.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
            shutdown_signal.wait().await;
            info!("REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            repos,
            config: app_cfg,
            api_port: local_addr.port(),
            db,
            shutdown,
            api_task,
        })
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the server to stop after shutdown has been triggered.
    ///
    /// In-flight requests get `shutdown_timeout` seconds to finish.
    pub async fn wait(self) {
        info!("Waiting for server tasks to complete...");

        let timeout = Duration::from_secs(self.shutdown.timeout_secs());
        match tokio::time::timeout(timeout, self.api_task).await {
            Ok(Ok(())) => info!("REST API server stopped"),
            Ok(Err(e)) => error!("REST API server task panicked: {}", e),
            Err(_) => warn!("REST API server did not stop within {}s", timeout.as_secs()),
        }

        if let Some(db) = self.db {
            if let Err(e) = db.close().await {
                warn!("Error closing database connection: {}", e);
            } else {
                info!("Database connection closed");
            }
        }

        info!("car-rental shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("Shutting down car-rental service...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// The global recorder can only be installed once per process; a restart
/// within the same process reuses it.
fn prometheus_handle() -> PrometheusHandle {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    if let Some(handle) = PROM_HANDLE.get() {
        return handle.clone();
    }
    let handle = match metrics::install_recorder() {
        Ok(handle) => handle,
        Err(e) => {
            // another component installed a recorder first
            warn!("Prometheus recorder not installed: {}", e);
            metrics::detached_handle()
        }
    };
    info!("Prometheus metrics recorder ready");
    PROM_HANDLE.get_or_init(|| handle).clone()
}

/// Initialize tracing (logging) from the application config.
///
/// `RUST_LOG` wins over `logging.level`. Call once at process startup.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_server_starts_and_stops() {
        let mut config = AppConfig::default();
        config.server.api_host = "127.0.0.1".to_string();
        config.server.api_port = 0;
        config.server.shutdown_timeout = 5;

        let handle = ServerHandle::start(ServerOptions {
            config,
            auto_migrate: false,
            in_memory: true,
        })
        .await
        .unwrap();

        assert_ne!(handle.api_port, 0);
        assert!(handle.is_running());

        let stream = tokio::net::TcpStream::connect(("127.0.0.1", handle.api_port)).await;
        assert!(stream.is_ok());

        handle.shutdown().await;
    }
}
