use crate::error::Result;
use crate::models::{ChartForm, Figure};
use crate::server::AppState;
use crate::services::{SharedDataStore, StoreStats};
use axum::extract::{Json, Query, State};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Health response: load statistics plus uptime
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub stats: StoreStats,
    pub uptime_secs: u64,
}

/// GET /api/chart - Chart description as JSON
///
/// Examples:
/// - /api/chart?symbol=ABB&ma1=5&ma2=10
/// - /api/chart?dropdown=ABB&moving_average_1=5&moving_average_2=10
#[instrument(skip(app_state))]
pub async fn chart_handler(
    State(app_state): State<AppState>,
    Query(params): Query<ChartForm>,
) -> Result<Json<Figure>> {
    let figure = app_state.build_chart(&params)?;
    info!(symbol = %params.dropdown, series = figure.data.len(), "Returning chart");
    Ok(Json(figure))
}

/// GET /api/tickers - Distinct ticker symbols found in the data directory
#[instrument(skip_all)]
pub async fn tickers_handler(State(data): State<SharedDataStore>) -> Json<Vec<String>> {
    let tickers = data.ticker_symbols().to_vec();
    debug!(count = tickers.len(), "Returning ticker symbols");
    Json(tickers)
}

/// GET /health - Store statistics
#[instrument(skip_all)]
pub async fn health_handler(State(app_state): State<AppState>) -> Json<HealthResponse> {
    debug!("Received request for health stats");

    Json(HealthResponse {
        status: "ok",
        stats: app_state.data.stats(),
        uptime_secs: app_state.started_at.elapsed().as_secs(),
    })
}
