//! Price chart assembly
//!
//! Takes an owned copy of one ticker's rows and produces the four-series figure:
//! smoothed curve, raw points, and two trailing moving averages.

use chrono::Duration;
use tracing::{debug, instrument};

use crate::constants::{
    CHART_TITLE, MOVING_AVERAGE_1_COLOR, MOVING_AVERAGE_2_COLOR, SMOOTH_CURVE_POINTS, SPLINE_SMOOTHING,
    X_AXIS_TITLE, Y_AXIS_TITLE,
};
use crate::error::Result;
use crate::models::chart::{Axis, Layout, LineStyle, Margin, MarkerStyle, Theme, Title};
use crate::models::indicators::calculate_sma;
use crate::models::{to_sorted_points, ChartRequest, Figure, PriceRecord, TimeSeries, Trace, TraceMode};
use crate::services::spline::{SmoothingSpline, SplineError, MIN_SPLINE_POINTS};
use crate::utils::format_timestamp;

/// Tunables for the smoothed curve
#[derive(Debug, Clone, Copy)]
pub struct ChartSettings {
    pub smoothing: f64,
    pub smooth_points: usize,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            smoothing: SPLINE_SMOOTHING,
            smooth_points: SMOOTH_CURVE_POINTS,
        }
    }
}

/// Build the price chart for `request` from the rows of its ticker.
///
/// `records` must already be filtered to the requested symbol. Fails when the
/// series is too short for a spline (including an unknown ticker) or when a
/// trade date cannot be parsed.
#[instrument(skip(records), fields(rows = records.len()))]
pub fn build_price_chart(records: Vec<PriceRecord>, request: &ChartRequest, settings: ChartSettings) -> Result<Figure> {
    let series: TimeSeries = to_sorted_points(&records)?;

    let closes: Vec<f64> = series.iter().map(|p| p.close).collect();
    let ma_1 = calculate_sma(&closes, request.moving_average_1);
    let ma_2 = calculate_sma(&closes, request.moving_average_2);

    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) => (first.time, last.time),
        _ => {
            return Err(SplineError::InsufficientData {
                points: 0,
                required: MIN_SPLINE_POINTS,
            }
            .into())
        }
    };
    let elapsed: Vec<f64> = series.iter().map(|p| (p.time - first).num_seconds() as f64).collect();

    let spline = SmoothingSpline::fit(&elapsed, &closes, settings.smoothing)?;

    let span_secs = (last - first).num_seconds();
    let steps = settings.smooth_points.saturating_sub(1).max(1) as i64;

    let offsets: Vec<i64> = (0..settings.smooth_points as i64).map(|k| span_secs * k / steps).collect();
    let smooth_x: Vec<String> = offsets
        .iter()
        .map(|offset| format_timestamp(&(first + Duration::seconds(*offset))))
        .collect();
    let sample_at: Vec<f64> = offsets.iter().map(|offset| *offset as f64).collect();
    let smooth_y: Vec<Option<f64>> = spline.evaluate_many(&sample_at).into_iter().map(Some).collect();

    debug!(
        symbol = %request.symbol,
        points = series.len(),
        smooth_points = smooth_x.len(),
        residual = spline.residual_sum_of_squares(),
        "Built price chart"
    );

    let dates: Vec<String> = series.iter().map(|p| format_timestamp(&p.time)).collect();

    let data = vec![
        Trace::scatter("Smooth Line", TraceMode::Lines, smooth_x, smooth_y).with_line(LineStyle {
            shape: Some("spline".to_string()),
            smoothing: Some(1.3),
            width: 2.0,
            ..LineStyle::default()
        }),
        Trace::scatter(
            "Data Points",
            TraceMode::Markers,
            dates.clone(),
            closes.iter().copied().map(Some).collect(),
        )
        .with_marker(MarkerStyle { size: 6.0 }),
        moving_average_trace(request.moving_average_1, dates.clone(), ma_1, MOVING_AVERAGE_1_COLOR),
        moving_average_trace(request.moving_average_2, dates, ma_2, MOVING_AVERAGE_2_COLOR),
    ];

    Ok(Figure {
        data,
        layout: price_layout(),
    })
}

fn moving_average_trace(window: usize, dates: Vec<String>, values: Vec<Option<f64>>, color: &str) -> Trace {
    Trace::scatter(format!("{}-Point Moving Avg", window), TraceMode::Lines, dates, values).with_line(LineStyle {
        color: Some(color.to_string()),
        width: 2.0,
        ..LineStyle::default()
    })
}

fn price_layout() -> Layout {
    Layout {
        title: Title::new(CHART_TITLE),
        xaxis: Axis {
            title: Title::new(X_AXIS_TITLE),
        },
        yaxis: Axis {
            title: Title::new(Y_AXIS_TITLE),
        },
        template: Theme::light(),
        hovermode: "x unified".to_string(),
        margin: Margin { l: 40, r: 40, t: 40, b: 50 },
    }
}
