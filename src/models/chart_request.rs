use serde::Deserialize;

use crate::error::{Error, Result};

/// Raw chart form as submitted by the page (or passed as query parameters)
///
/// Field names match the HTML form. The API accepts the shorter aliases
/// `symbol`, `ma1` and `ma2`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartForm {
    #[serde(alias = "symbol")]
    pub dropdown: String,

    #[serde(alias = "ma1")]
    pub moving_average_1: String,

    #[serde(alias = "ma2")]
    pub moving_average_2: String,
}

/// Validated chart request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    pub symbol: String,
    pub moving_average_1: usize,
    pub moving_average_2: usize,
}

impl ChartForm {
    /// Coerce both windows to positive integers
    pub fn validate(&self) -> Result<ChartRequest> {
        Ok(ChartRequest {
            symbol: self.dropdown.clone(),
            moving_average_1: parse_window("moving_average_1", &self.moving_average_1)?,
            moving_average_2: parse_window("moving_average_2", &self.moving_average_2)?,
        })
    }
}

fn parse_window(field: &str, value: &str) -> Result<usize> {
    let window: usize = value.trim().parse().map_err(|_| {
        Error::InvalidInput(format!("{} must be a positive integer, got '{}'", field, value))
    })?;

    if window == 0 {
        return Err(Error::InvalidInput(format!("{} must be at least 1", field)));
    }

    Ok(window)
}
