pub mod chart;
pub mod data_store;
pub mod spline;

pub use chart::{build_price_chart, ChartSettings};
pub use data_store::{DataStore, SharedDataStore, StoreStats, TickerSummary};
pub use spline::{SmoothingSpline, SplineError};
