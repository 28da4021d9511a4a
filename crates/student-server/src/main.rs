//! Student Registry Server
//!
//! REST API over a single student table. Requests go through the record
//! service, which enforces unique emails, down to SQLite or an in-memory store.

mod config;
mod handlers;
mod storage;

#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::sync::Arc;
use student_core::{RecordService, StudentService, StudentStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use config::{Backend, Config};
use storage::{Database, MemoryStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn RecordService>,
}

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!(
        "Starting Student Registry Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    info!("Loading configuration...");
    let config = Config::load().context("Failed to load configuration")?;
    info!(
        "Config loaded: bind={}, backend={}, db={}",
        config.bind_address, config.backend, config.database_path
    );

    let store: Arc<dyn StudentStore> = match config.backend {
        Backend::Sqlite => Arc::new(
            Database::new(&config.database_path)
                .await
                .context("Failed to initialize database")?,
        ),
        Backend::Memory => {
            info!("Using in-memory store, records will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState {
        service: Arc::new(StudentService::new(store)),
    };

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app(state))
        .await
        .context("Server error")?;

    Ok(())
}

/// Build the HTTP router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/students",
            get(handlers::students::list).post(handlers::students::create),
        )
        .route("/students/search", get(handlers::students::search))
        .route(
            "/students/:id",
            get(handlers::students::get)
                .put(handlers::students::update)
                .delete(handlers::students::delete),
        )
}
