// Framework bootstrap for the coaching backend.

use crate::frameworks::config::{Config, StorageBackend};
use crate::frameworks::db;
use crate::interface_adapters::clients::identity::IdentityClient;
use crate::interface_adapters::postgres::{
    PostgresAppointmentStore, PostgresCatalogStore, PostgresExercisePlanStore,
    PostgresGuestStore, PostgresLedgerStore,
};
use crate::interface_adapters::routes::app;
use crate::interface_adapters::state::AppState;

use std::{io::Result, sync::Arc};

const DEFAULT_LOG_FILTER: &str = "coach_server=info,sqlx=warn,warn";

// `.env` is optional; values already in the environment take precedence.
fn init_runtime() {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            eprintln!("ignoring unreadable .env file: {err}");
        }
    }
    init_tracing(std::env::var("LOG_FORMAT").as_deref() == Ok("json"));
    install_panic_hook();
}

// RUST_LOG overrides the default filter.
fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if json {
        builder.json().with_current_span(true).init();
    } else {
        builder.compact().init();
    }
}

// Panics inside request handlers end up in the structured log.
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|location| format!("{}:{}", location.file(), location.line()));
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?location, %backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener, config: Config) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state(&config).await?;
    let app = app(state);

    tracing::info!(%address, storage = ?config.storage.backend, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let config = Config::load().map_err(|e| {
        tracing::error!(error = %e, "invalid configuration");
        std::io::Error::other(e)
    })?;
    let address = config.http.bind_addr;

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener, config).await
}

async fn build_state(config: &Config) -> Result<Arc<AppState>> {
    let identity = IdentityClient::new(config.identity.base_url.clone(), config.identity_timeout())
        .map_err(|e| std::io::Error::other(format!("failed to initialize identity client: {e}")))?;
    tracing::debug!(
        identity_base_url = %config.identity.base_url,
        identity_verify_timeout_ms = config.identity.verify_timeout_ms,
        "identity client configured"
    );
    let identity = Arc::new(identity);

    let state = match config.storage.backend {
        StorageBackend::Memory => AppState::in_memory(identity),
        StorageBackend::Postgres => {
            let database_url = config
                .storage
                .database_url
                .as_deref()
                .ok_or_else(|| std::io::Error::other("postgres storage requires a database url"))?;
            let pool = db::connect_pool(database_url, &config.storage).await.map_err(|e| {
                tracing::error!(error = %e, "failed to connect to database");
                std::io::Error::other(e)
            })?;
            db::run_migrations(&pool).await.map_err(|e| {
                tracing::error!(error = %e, "failed to run migrations");
                std::io::Error::other(e)
            })?;

            AppState {
                catalog: Arc::new(PostgresCatalogStore { db: pool.clone() }),
                ledgers: Arc::new(PostgresLedgerStore { db: pool.clone() }),
                appointments: Arc::new(PostgresAppointmentStore { db: pool.clone() }),
                guests: Arc::new(PostgresGuestStore { db: pool.clone() }),
                plans: Arc::new(PostgresExercisePlanStore { db: pool }),
                identity,
            }
        }
    };

    Ok(Arc::new(state))
}
