//! End-to-end tests for the HTTP surface
//!
//! Each test writes a small data directory, loads it through the real loader
//! and drives the router in-process.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, NaiveDate};
use serde_json::Value;
use std::fs;
use std::sync::Arc;
use stockchart::models::PageOptions;
use stockchart::server::{create_app, AppState};
use stockchart::services::DataStore;
use tempfile::TempDir;
use tower::ServiceExt;

const HEADER: &str = "TradDt,BizDt,Sgmt,Src,FinInstrmTp,TckrSymb,SctySrs,OpnPric,HghPric,LwPric,ClsPric\n";

/// 50 ABB trading days split across two files, plus 3 ATUL rows
fn create_data_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    let start = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();

    let row = |ticker: &str, day: i64, close: f64| {
        let date = (start + Duration::days(day)).format("%Y-%m-%d");
        format!("{date},{date},CM,NSE,STK,{ticker},EQ,1,1,1,{close}\n")
    };

    let mut first = String::from(HEADER);
    let mut second = String::from(HEADER);
    for day in 0..50 {
        let close = 7500.0 + day as f64 * 3.0 + (day as f64 * 0.7).cos() * 25.0;
        // Later days go in the earlier file so sorting matters
        if day >= 25 {
            first.push_str(&row("ABB", day, close));
        } else {
            second.push_str(&row("ABB", day, close));
        }
    }
    for day in 0..3 {
        second.push_str(&row("ATUL", day, 6800.0 + day as f64));
    }

    fs::write(temp.path().join("BhavCopy_1.CSV"), first).unwrap();
    fs::write(temp.path().join("BhavCopy_2.CSV"), second).unwrap();
    fs::write(temp.path().join("ignored.csv"), format!("{}{}", HEADER, row("SKIP", 0, 1.0))).unwrap();
    temp
}

fn create_test_app(dir: &TempDir) -> Router {
    let store = DataStore::load(dir.path()).unwrap();
    create_app(AppState::new(Arc::new(store), PageOptions::default()))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn submit(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/submit")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_index_renders_form_without_chart() {
    let dir = create_data_dir();
    let (status, html) = send(create_test_app(&dir), get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"<option value="ABB">ABB</option>"#));
    assert!(html.contains(r#"<option value="ASIANHOTNR">ASIANHOTNR</option>"#));
    assert!(html.contains(r#"<option value="35">35</option>"#));
    assert!(!html.contains("Plotly.newPlot"));
}

#[tokio::test]
async fn test_submit_renders_chart_and_selection() {
    let dir = create_data_dir();
    let (status, html) = send(
        create_test_app(&dir),
        submit("dropdown=ABB&moving_average_1=5&moving_average_2=10"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Plotly.newPlot"));
    assert!(html.contains(r#"<option value="ABB" selected>ABB</option>"#));
    assert!(html.contains(r#"<option value="5" selected>5</option>"#));
    assert!(html.contains(r#"<option value="10" selected>10</option>"#));
    assert!(html.contains("5-Point Moving Avg"));
    assert!(html.contains("10-Point Moving Avg"));
    assert!(html.contains("Ticker variation for last 3 months"));
}

#[tokio::test]
async fn test_submit_non_numeric_window_is_rejected() {
    let dir = create_data_dir();
    let (status, body) = send(
        create_test_app(&dir),
        submit("dropdown=ABB&moving_average_1=abc&moving_average_2=10"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!body.contains("Plotly.newPlot"));
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn test_submit_missing_field_is_client_error() {
    let dir = create_data_dir();
    let (status, _) = send(create_test_app(&dir), submit("dropdown=ABB&moving_average_1=5")).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_submit_unknown_ticker_is_server_error() {
    let dir = create_data_dir();
    let (status, body) = send(
        create_test_app(&dir),
        submit("dropdown=NOPE&moving_average_1=5&moving_average_2=10"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("Numerical error"));
}

#[tokio::test]
async fn test_api_chart_shapes() {
    let dir = create_data_dir();
    let (status, body) = send(create_test_app(&dir), get("/api/chart?symbol=ABB&ma1=5&ma2=10")).await;
    assert_eq!(status, StatusCode::OK);

    let figure: Value = serde_json::from_str(&body).unwrap();
    let data = figure["data"].as_array().unwrap();
    assert_eq!(data.len(), 4);

    let smooth_x = data[0]["x"].as_array().unwrap();
    assert_eq!(smooth_x.len(), 500);
    assert_eq!(data[0]["y"].as_array().unwrap().len(), 500);
    assert_eq!(smooth_x[0], "2024-07-01T00:00:00");
    assert_eq!(smooth_x[499], "2024-08-19T00:00:00");

    let points = data[1]["x"].as_array().unwrap();
    assert_eq!(points.len(), 50);
    assert_eq!(points[0], "2024-07-01T00:00:00");
    assert_eq!(points[49], "2024-08-19T00:00:00");

    let ma5 = data[2]["y"].as_array().unwrap();
    assert!(ma5[3].is_null());
    assert!(ma5[4].is_f64());

    let ma10 = data[3]["y"].as_array().unwrap();
    assert!(ma10[8].is_null());
    assert!(ma10[9].is_f64());

    // Trailing mean over date-sorted closes
    let closes: Vec<f64> = data[1]["y"].as_array().unwrap().iter().map(|v| v.as_f64().unwrap()).collect();
    let expected = closes[5..10].iter().sum::<f64>() / 5.0;
    assert!((ma5[9].as_f64().unwrap() - expected).abs() < 1e-9);
}

#[tokio::test]
async fn test_api_chart_long_window_is_all_null() {
    let dir = create_data_dir();
    let (status, body) = send(create_test_app(&dir), get("/api/chart?symbol=ATUL&ma1=1&ma2=40")).await;
    assert_eq!(status, StatusCode::OK);

    let figure: Value = serde_json::from_str(&body).unwrap();
    let ma40 = figure["data"][3]["y"].as_array().unwrap();
    assert_eq!(ma40.len(), 3);
    assert!(ma40.iter().all(Value::is_null));
    assert_eq!(figure["data"][0]["x"].as_array().unwrap().len(), 500);
}

#[tokio::test]
async fn test_tickers_and_health() {
    let dir = create_data_dir();
    let app = create_test_app(&dir);

    let (status, body) = send(app.clone(), get("/api/tickers")).await;
    assert_eq!(status, StatusCode::OK);
    let tickers: Vec<String> = serde_json::from_str(&body).unwrap();
    assert_eq!(tickers, vec!["ABB".to_string(), "ATUL".to_string()]);

    let (status, body) = send(app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    let health: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["file_count"], 2);
    assert_eq!(health["record_count"], 53);
    assert_eq!(health["ticker_count"], 2);
}
