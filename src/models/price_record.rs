use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::utils::parse_trade_date;

/// One bhavcopy row as loaded from disk
///
/// The trade date is kept as the raw CSV string. It is parsed per request on an
/// owned copy (see [`PriceRecord::to_point`]), so a malformed date only affects
/// charts for its own ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Ticker symbol
    #[serde(rename = "TckrSymb")]
    pub ticker: String,

    /// Trade date exactly as written in the file
    #[serde(rename = "TradDt")]
    pub trade_date: String,

    /// Closing price
    #[serde(rename = "ClsPric")]
    pub close: f64,
}

impl PriceRecord {
    pub fn new(ticker: impl Into<String>, trade_date: impl Into<String>, close: f64) -> Self {
        Self {
            ticker: ticker.into(),
            trade_date: trade_date.into(),
            close,
        }
    }

    /// Parse the trade date into a chartable point
    pub fn to_point(&self) -> Result<PricePoint> {
        Ok(PricePoint {
            time: parse_trade_date(&self.trade_date)?,
            close: self.close,
        })
    }
}

/// A closing price at a parsed trade date
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub time: NaiveDateTime,
    pub close: f64,
}

/// Parse every record and stable-sort the result by trade date.
///
/// Rows sharing a date keep their original relative order.
pub fn to_sorted_points(records: &[PriceRecord]) -> Result<Vec<PricePoint>> {
    let mut points = records
        .iter()
        .map(PriceRecord::to_point)
        .collect::<Result<Vec<_>>>()?;
    points.sort_by_key(|point| point.time);
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_to_point() {
        let record = PriceRecord::new("ABB", "2024-07-01", 8123.45);
        let point = record.to_point().unwrap();
        assert_eq!(point.close, 8123.45);
        assert_eq!(point.time.format("%Y-%m-%d").to_string(), "2024-07-01");
    }

    #[test]
    fn test_sorted_points_are_stable() {
        let records = vec![
            PriceRecord::new("ABB", "2024-07-03", 3.0),
            PriceRecord::new("ABB", "2024-07-01", 1.0),
            PriceRecord::new("ABB", "2024-07-02", 20.0),
            PriceRecord::new("ABB", "2024-07-02", 21.0),
        ];

        let closes: Vec<f64> = to_sorted_points(&records).unwrap().iter().map(|p| p.close).collect();
        assert_eq!(closes, vec![1.0, 20.0, 21.0, 3.0]);
    }

    #[test]
    fn test_sorted_points_rejects_bad_date() {
        let records = vec![
            PriceRecord::new("ABB", "2024-07-01", 1.0),
            PriceRecord::new("ABB", "not a date", 2.0),
        ];
        assert!(matches!(to_sorted_points(&records), Err(Error::Parse(_))));
    }
}
