//! Serializable chart description
//!
//! The JSON shape follows the Plotly figure schema (`data` + `layout`) so the
//! page can hand it straight to `Plotly.newPlot`. Nothing here depends on a
//! rendering engine.

use serde::Serialize;

/// A complete figure: data series plus layout
#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

/// How a series is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceMode {
    Lines,
    Markers,
}

/// One scatter series
///
/// `y` entries are `None` where the value is undefined (e.g. moving-average
/// warm-up); they serialize as `null` and render as gaps.
#[derive(Debug, Clone, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub x: Vec<String>,
    pub y: Vec<Option<f64>>,
    pub mode: TraceMode,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<MarkerStyle>,
}

impl Trace {
    pub fn scatter(name: impl Into<String>, mode: TraceMode, x: Vec<String>, y: Vec<Option<f64>>) -> Self {
        Self {
            kind: "scatter",
            x,
            y,
            mode,
            name: name.into(),
            line: None,
            marker: None,
        }
    }

    pub fn with_line(mut self, line: LineStyle) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_marker(mut self, marker: MarkerStyle) -> Self {
        self.marker = Some(marker);
        self
    }

    /// Number of points in the series
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LineStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoothing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub width: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkerStyle {
    pub size: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Axis {
    pub title: Title,
}

#[derive(Debug, Clone, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

/// Figure-wide layout
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub template: Theme,
    pub hovermode: String,
    pub margin: Margin,
}

/// Layout defaults applied as a Plotly template
#[derive(Debug, Clone, Serialize)]
pub struct Theme {
    pub layout: ThemeLayout,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThemeLayout {
    pub paper_bgcolor: String,
    pub plot_bgcolor: String,
    pub font: ThemeFont,
    pub xaxis: ThemeAxis,
    pub yaxis: ThemeAxis,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThemeFont {
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThemeAxis {
    pub gridcolor: String,
    pub linecolor: String,
    pub zerolinecolor: String,
}

impl Theme {
    /// White background with pale grid lines
    pub fn light() -> Self {
        let axis = ThemeAxis {
            gridcolor: "#EBF0F8".to_string(),
            linecolor: "#EBF0F8".to_string(),
            zerolinecolor: "#EBF0F8".to_string(),
        };

        Self {
            layout: ThemeLayout {
                paper_bgcolor: "white".to_string(),
                plot_bgcolor: "white".to_string(),
                font: ThemeFont {
                    color: "#2a3f5f".to_string(),
                },
                xaxis: axis.clone(),
                yaxis: axis,
            },
        }
    }
}
