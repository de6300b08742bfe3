pub mod api;
pub mod pages;

use crate::error::Result;
use crate::models::{ChartForm, Figure, PageOptions};
use crate::services::{build_price_chart, ChartSettings, SharedDataStore};
use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub data: SharedDataStore,
    pub options: Arc<PageOptions>,
    pub settings: ChartSettings,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(data: SharedDataStore, options: PageOptions) -> Self {
        Self {
            data,
            options: Arc::new(options),
            settings: ChartSettings::default(),
            started_at: Instant::now(),
        }
    }

    /// Validate the form and build the chart from an owned copy of the ticker's rows
    pub fn build_chart(&self, form: &ChartForm) -> Result<Figure> {
        let request = form.validate()?;
        let records = self.data.records_for(&request.symbol);
        tracing::info!(
            symbol = %request.symbol,
            moving_average_1 = request.moving_average_1,
            moving_average_2 = request.moving_average_2,
            rows = records.len(),
            "Building chart"
        );
        build_price_chart(records, &request, self.settings)
    }
}

// FromRef implementations to extract specific state components
impl FromRef<AppState> for SharedDataStore {
    fn from_ref(app_state: &AppState) -> SharedDataStore {
        app_state.data.clone()
    }
}

/// Build the router with all routes
pub fn create_app(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index_handler))
        .route("/submit", post(pages::submit_handler))
        .route("/api/chart", get(api::chart_handler))
        .route("/api/tickers", get(api::tickers_handler))
        .route("/health", get(api::health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Start the axum server
pub async fn serve(app_state: AppState, addr: SocketAddr) -> Result<()> {
    tracing::info!("Registering routes:");
    tracing::info!("  GET  /");
    tracing::info!("  POST /submit");
    tracing::info!("  GET  /api/chart?symbol=ABB&ma1=5&ma2=10");
    tracing::info!("  GET  /api/tickers");
    tracing::info!("  GET  /health");

    let app = create_app(app_state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
