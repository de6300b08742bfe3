//! Input format and chart constants
//!
//! ## CSV Format
//!
//! Input files are daily bhavcopy exports with an uppercase `.CSV` extension.
//! Only three columns are read; every other column is ignored:
//! - `TckrSymb`: ticker symbol
//! - `TradDt`: trade date
//! - `ClsPric`: closing price

/// Default data directory, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = "data";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "STOCKCHART_DATA_DIR";

/// File extension matched by the loader (case-sensitive)
pub const CSV_EXTENSION: &str = "CSV";

/// Column names in the bhavcopy header row
pub mod csv_column {
    pub const TICKER: &str = "TckrSymb";
    pub const TRADE_DATE: &str = "TradDt";
    pub const CLOSE_PRICE: &str = "ClsPric";
}

/// Default HTTP bind address and port
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

/// Curated ticker list shown in the dropdown (static option source)
pub const DROPDOWN_TICKERS: [&str; 11] = [
    "ABB",
    "AEGISLOG",
    "ARE&M",
    "AMBALALSA",
    "ANDHRAPET",
    "ANSALAPI",
    "UTIQUE",
    "ARUNAHTEL",
    "BOMDYEING",
    "ASIANHOTNR",
    "ATUL",
];

/// Moving-average window sizes offered in the form
pub const MOVING_AVERAGE_WINDOWS: [usize; 8] = [5, 10, 15, 20, 25, 30, 35, 40];

/// Smoothing factor for the closing-price spline (upper bound on the residual sum of squares)
pub const SPLINE_SMOOTHING: f64 = 0.2;

/// Number of evenly spaced points the smoothed curve is resampled to
pub const SMOOTH_CURVE_POINTS: usize = 500;

/// Chart labels
pub const CHART_TITLE: &str = "Ticker variation for last 3 months";
pub const X_AXIS_TITLE: &str = "Date";
pub const Y_AXIS_TITLE: &str = "Closing Price";

/// Moving-average line colors
pub const MOVING_AVERAGE_1_COLOR: &str = "orange";
pub const MOVING_AVERAGE_2_COLOR: &str = "green";

/// Number of rows printed when previewing the combined table
pub const TABLE_PREVIEW_ROWS: usize = 5;
