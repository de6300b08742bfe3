use clap::ValueEnum;
use serde::Serialize;

use crate::constants::{DROPDOWN_TICKERS, MOVING_AVERAGE_WINDOWS};

/// One `<option>` in a form dropdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    /// Option whose label is its value
    pub fn same(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// Where the ticker dropdown gets its entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum TickerOptionSource {
    /// Curated list compiled into the binary
    #[default]
    Static,
    /// Distinct symbols found in the loaded data, sorted
    Data,
}

/// Option lists rendered into every page
#[derive(Debug, Clone)]
pub struct PageOptions {
    pub tickers: Vec<SelectOption>,
    pub moving_averages: Vec<SelectOption>,
}

impl PageOptions {
    /// Build option lists for the given source.
    ///
    /// `loaded_symbols` is only consulted for [`TickerOptionSource::Data`].
    pub fn new(source: TickerOptionSource, loaded_symbols: &[String]) -> Self {
        let tickers = match source {
            TickerOptionSource::Static => DROPDOWN_TICKERS.iter().map(|t| SelectOption::same(*t)).collect(),
            TickerOptionSource::Data => loaded_symbols.iter().map(SelectOption::same).collect(),
        };

        Self {
            tickers,
            moving_averages: MOVING_AVERAGE_WINDOWS
                .iter()
                .map(|w| SelectOption::same(w.to_string()))
                .collect(),
        }
    }
}

impl Default for PageOptions {
    fn default() -> Self {
        Self::new(TickerOptionSource::Static, &[])
    }
}
