mod chart_request;
mod options;
mod price_record;
pub mod chart;
pub mod indicators;

pub use chart::{Figure, Trace, TraceMode};
pub use chart_request::{ChartForm, ChartRequest};
pub use options::{PageOptions, SelectOption, TickerOptionSource};
pub use price_record::{to_sorted_points, PricePoint, PriceRecord};

/// Closing-price series for a single ticker
pub type TimeSeries = Vec<PricePoint>;
