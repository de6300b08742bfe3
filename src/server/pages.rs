//! HTML form page
//!
//! `GET /` renders the empty form; `POST /submit` renders the same page with
//! the chart JSON embedded and the submitted values preselected.

use askama::Template;
use axum::{
    extract::{Form, State},
    response::Html,
};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::models::{ChartForm, PageOptions, SelectOption};
use crate::server::AppState;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub dropdown_options: Vec<SelectOption>,
    pub moving_average_options: Vec<SelectOption>,
    pub fig_json: Option<String>,
    pub selected_option: String,
    pub selected_moving_average_1: String,
    pub selected_moving_average_2: String,
}

impl IndexPage {
    /// Form with no chart and nothing selected
    pub fn empty(options: &PageOptions) -> Self {
        Self {
            dropdown_options: options.tickers.clone(),
            moving_average_options: options.moving_averages.clone(),
            fig_json: None,
            selected_option: String::new(),
            selected_moving_average_1: String::new(),
            selected_moving_average_2: String::new(),
        }
    }

    /// Form echoing the submitted values, with the chart
    pub fn with_chart(options: &PageOptions, form: ChartForm, fig_json: String) -> Self {
        Self {
            fig_json: Some(fig_json),
            selected_option: form.dropdown,
            selected_moving_average_1: form.moving_average_1,
            selected_moving_average_2: form.moving_average_2,
            ..Self::empty(options)
        }
    }
}

/// GET / - Form page without a chart
#[instrument(skip_all)]
pub async fn index_handler(State(app_state): State<AppState>) -> Result<Html<String>> {
    let page = IndexPage::empty(&app_state.options);
    Ok(Html(page.render()?))
}

/// POST /submit - Build the chart and re-render the form around it
#[instrument(skip_all, fields(symbol = %form.dropdown))]
pub async fn submit_handler(
    State(app_state): State<AppState>,
    Form(form): Form<ChartForm>,
) -> Result<Html<String>> {
    let figure = app_state.build_chart(&form)?;
    let fig_json = serde_json::to_string(&figure)?;
    debug!(bytes = fig_json.len(), "Serialized chart");

    let page = IndexPage::with_chart(&app_state.options, form, fig_json);
    Ok(Html(page.render()?))
}
