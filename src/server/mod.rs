pub mod page;

use crate::config::Config;
use crate::draw::{Drawer, Spin};
use crate::error::{Result, SpinError};
use crate::metrics::{SpinMetrics, SpinSummary};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Shared, read-mostly state behind every handler.
///
/// The drawer (ranks plus cached weight table) is never mutated after
/// construction; only the metrics counters change.
pub struct AppState {
    drawer: Drawer,
    metrics: SpinMetrics,
    started: Instant,
}

impl AppState {
    pub fn new(drawer: Drawer, metrics: SpinMetrics) -> Self {
        Self {
            drawer,
            metrics,
            started: Instant::now(),
        }
    }

    /// Build state from a config, computing the weight table once
    pub fn from_config(config: &Config) -> Result<Self> {
        let drawer = Drawer::new(config.ranks.clone())?;
        let metrics = SpinMetrics::new(
            drawer.ranks().len(),
            config.histogram_max_nanos,
            config.histogram_sigfigs,
        )?;
        Ok(Self::new(drawer, metrics))
    }

    pub fn drawer(&self) -> &Drawer {
        &self.drawer
    }

    pub fn metrics(&self) -> &SpinMetrics {
        &self.metrics
    }

    /// Draw once with the thread-local RNG and record the outcome
    pub fn spin(&self) -> std::result::Result<Spin, SpinError> {
        let start = Instant::now();
        let result = self.drawer.spin(&mut rand::thread_rng());
        let elapsed = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);

        match &result {
            Ok(spin) => {
                self.metrics.record_hit(spin.index, elapsed);
                debug!(key = %spin.key, percent = spin.percent, "spin");
            }
            Err(e) => {
                self.metrics.record_failure();
                warn!(error = %e, "spin failed");
            }
        }
        result
    }

    pub fn summary(&self) -> SpinSummary {
        self.metrics.summary(
            self.drawer.ranks(),
            self.drawer.weights(),
            self.started.elapsed().as_secs_f64(),
        )
    }
}

impl IntoResponse for SpinError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

/// Build the HTTP router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/spin", post(spin))
        .route("/stats", get(stats))
        .with_state(state)
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(page::render_index(state.drawer()))
}

async fn spin(State(state): State<Arc<AppState>>) -> std::result::Result<Json<Spin>, SpinError> {
    state.spin().map(Json)
}

async fn stats(State(state): State<Arc<AppState>>) -> Json<SpinSummary> {
    Json(state.summary())
}

/// Serve until ctrl-c
pub async fn serve(config: &Config, state: Arc<AppState>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
