//! Live web application.
//!
//! Every data-backed request fetches the whole worksheet and recomputes
//! the aggregates; only the QR image is cached.

pub mod error;
pub mod handlers;
pub mod pages;

pub use error::WebError;

use crate::config::{Config, SheetConfig, ThemeConfig};
use crate::report::{Clock, TtlCache};
use crate::sheets::{Connection, DataSource};
use crate::survey::SurveyRules;
use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared state handed to every handler.
pub struct AppContext<S> {
    pub connection: Connection<S>,
    pub rules: SurveyRules,
    pub sheet: SheetConfig,
    pub theme: ThemeConfig,
    pub qr_cache: TtlCache<Vec<u8>>,
    /// Lifetime of the QR image, in the cache and in `Cache-Control`.
    pub qr_ttl_seconds: u64,
}

impl<S> AppContext<S> {
    pub fn new(config: &Config, connection: Connection<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            connection,
            rules: SurveyRules::from(&config.survey),
            sheet: config.sheet.clone(),
            theme: config.theme.clone(),
            qr_cache: TtlCache::new(
                chrono::Duration::seconds(config.server.qr_ttl_seconds as i64),
                clock,
            ),
            qr_ttl_seconds: config.server.qr_ttl_seconds,
        }
    }
}

/// Build the application router.
pub fn router<S: DataSource>(ctx: Arc<AppContext<S>>) -> Router {
    Router::new()
        .route("/", get(handlers::index::<S>))
        .route("/dashboard", get(handlers::dashboard))
        .route("/api/dashboard-data", get(handlers::dashboard_data::<S>))
        .route("/manage", get(handlers::manage::<S>))
        .route(
            "/edit/:rownum",
            get(handlers::edit_form::<S>).post(handlers::edit_submit::<S>),
        )
        .route("/delete/:rownum", post(handlers::delete_row::<S>))
        .route("/export/summary.csv", get(handlers::export_summary::<S>))
        .route("/export/full.csv", get(handlers::export_full::<S>))
        .route("/qr", get(handlers::qr_code::<S>))
        .route("/static/style.css", get(handlers::stylesheet::<S>))
        .with_state(ctx)
}

/// Bind and serve until Ctrl-C.
pub async fn serve<S: DataSource>(ctx: Arc<AppContext<S>>, bind: &str) -> Result<()> {
    if !ctx.connection.is_ready() {
        if let Err(e) = ctx.connection.source() {
            warn!("Starting without spreadsheet access: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
    }
}
