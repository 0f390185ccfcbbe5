//! Status API server.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, routing::get, Json, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::schema::ApiConfig;
use crate::health::evaluator::{ClusterStatus, MemberSummary};
use crate::metrics::report::render;
use crate::metrics::snapshot::Metrics;
use crate::monitor::Monitor;

/// Shared state injected into handlers.
#[derive(Clone)]
struct ApiState {
    monitor: Arc<Monitor>,
}

/// HTTP server exposing the monitor's snapshots.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    pub fn new(monitor: Arc<Monitor>, config: &ApiConfig) -> Self {
        let router = Router::new()
            .route("/status", get(get_status))
            .route("/metrics", get(get_metrics))
            .route("/members", get(get_members))
            .route("/report", get(get_report))
            .route("/healthz", get(healthz))
            .with_state(ApiState { monitor })
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(TraceLayer::new_for_http());

        Self { router }
    }

    /// Serve until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Status API listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await
    }
}

async fn get_status(State(state): State<ApiState>) -> Json<ClusterStatus> {
    Json(state.monitor.status())
}

async fn get_metrics(State(state): State<ApiState>) -> Json<Metrics> {
    Json(state.monitor.metrics())
}

async fn get_members(State(state): State<ApiState>) -> Json<Vec<MemberSummary>> {
    Json(state.monitor.member_summaries())
}

async fn get_report(State(state): State<ApiState>) -> String {
    render(&state.monitor.status(), &state.monitor.metrics())
}

async fn healthz() -> &'static str {
    "ok"
}
