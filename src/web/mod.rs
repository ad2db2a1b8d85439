//! JSON/CSV HTTP API consumed by the dashboard.

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::{
    analysis::{Analysis, AnalysisRequest},
    config::{AnalysisDefaults, Config},
    estimator::EnvironmentalEstimator,
    export::{export_file_name, to_csv_bytes, ExportFilter},
    geo::Coordinate,
};

#[derive(Clone)]
pub struct AppState {
    estimator: EnvironmentalEstimator,
    defaults: AnalysisDefaults,
}

impl AppState {
    pub fn new(estimator: EnvironmentalEstimator, defaults: AnalysisDefaults) -> Self {
        Self {
            estimator,
            defaults,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.estimator(), config.defaults.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisParams {
    pub lat: f64,
    pub lon: f64,
    pub radius_km: Option<f64>,
    pub count: Option<usize>,
    pub month: Option<u32>,
    #[serde(default)]
    pub all: bool,
}

impl AnalysisParams {
    fn into_request(self, defaults: &AnalysisDefaults) -> AnalysisRequest {
        let mut request = AnalysisRequest::new(Coordinate::new(self.lat, self.lon))
            .with_radius_km(self.radius_km.unwrap_or(defaults.radius_km))
            .with_neighbor_count(self.count.unwrap_or(defaults.neighbor_count));
        if let Some(month) = self.month {
            request = request.with_month(month);
        }
        request
    }
}

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/analysis", get(analysis))
        .route("/api/neighbors.csv", get(neighbors_csv))
        .with_state(Arc::new(state))
}

pub async fn run(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid listen address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    let app = router(AppState::from_config(&config));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "solarscope API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down");
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn analysis(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalysisParams>,
) -> Json<Analysis> {
    let request = params.into_request(&state.defaults);
    Json(Analysis::run(&state.estimator, request))
}

pub async fn neighbors_csv(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalysisParams>,
) -> Response {
    let filter = if params.all {
        ExportFilter::All
    } else {
        ExportFilter::FeasibleOnly
    };
    let request = params.into_request(&state.defaults);
    let points = state.estimator.neighbors(
        &request.coordinate,
        request.radius_km,
        request.neighbor_count,
        request.month,
    );

    match to_csv_bytes(&points, filter) {
        Ok(csv) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!(
                        "attachment; filename=\"{}\"",
                        export_file_name(&request.coordinate)
                    ),
                ),
            ],
            Body::from(Bytes::from(csv)),
        )
            .into_response(),
        Err(err) => {
            error!(%err, "CSV export failed");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}
