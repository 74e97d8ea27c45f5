//! Tests for the HTTP sheet source

use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn source(server: &MockServer, format: SheetFormat) -> SheetSource {
    SheetSource::new(
        format!("{}/inventory", server.uri()),
        format,
        Duration::from_secs(5),
    )
    .unwrap()
}

// ── CSV ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn fetches_csv_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/inventory"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/csv")
                .set_body_string("Brand,Size,Year,Price\nMichelin,265/60R18,2023,5200\n"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let rows = source(&server, SheetFormat::Csv).fetch_rows().await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["Brand"], "Michelin");
    assert_eq!(rows[0]["Year"], "2023");
}

#[tokio::test]
async fn non_success_status_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = source(&server, SheetFormat::Csv).fetch_rows().await;
    match result {
        Err(Error::HttpStatus(status)) => assert_eq!(status.as_u16(), 500),
        other => panic!("expected HttpStatus error, got {:?}", other),
    }
}

#[tokio::test]
async fn html_sign_in_page_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(
                "<!DOCTYPE html><html>Sign in</html>",
                "text/html; charset=utf-8",
            ),
        )
        .mount(&server)
        .await;

    let result = source(&server, SheetFormat::Csv).fetch_rows().await;
    assert!(matches!(result, Err(Error::UpstreamUnavailable(_))));
}

#[tokio::test]
async fn slow_sheet_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("Brand\nMichelin\n")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let slow = SheetSource::new(
        format!("{}/inventory", server.uri()),
        SheetFormat::Csv,
        Duration::from_millis(100),
    )
    .unwrap();

    assert!(matches!(slow.fetch_rows().await, Err(Error::Network(_))));
}

// ── JSON ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn fetches_json_row_objects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/inventory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "brand": "Toyo", "size_key": "2254517", "year": 2022, "price": 3100.5, "stock": null },
            { "brand": "Yokohama", "size_key": "2254517", "year": "2023", "price": "call" }
        ])))
        .mount(&server)
        .await;

    let rows = source(&server, SheetFormat::Json).fetch_rows().await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["year"], "2022");
    assert_eq!(rows[0]["price"], "3100.5");
    assert_eq!(rows[0]["stock"], "");
    assert_eq!(rows[1]["price"], "call");
}

#[tokio::test]
async fn fetches_json_values_grid() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "range": "Stock!A1:D3",
            "majorDimension": "ROWS",
            "values": [
                ["Brand", "Size", "Year", "Price"],
                ["Michelin", "265/60R18", "2023", "5200"],
                ["Dunlop", "265/60R18"]
            ]
        })))
        .mount(&server)
        .await;

    let rows = source(&server, SheetFormat::Json).fetch_rows().await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["Price"], "5200");
    assert_eq!(rows[1]["Brand"], "Dunlop");
    assert!(rows[1].get("Year").is_none());
}

#[test]
fn json_values_grid_without_header_is_empty() {
    let rows = parse_json_rows(serde_json::json!({ "values": [] })).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn unexpected_json_shape_is_error() {
    assert!(parse_json_rows(serde_json::json!("nope")).is_err());
    assert!(parse_json_rows(serde_json::json!({ "rows": [] })).is_err());
    assert!(parse_json_rows(serde_json::json!([1, 2, 3])).is_err());
}

#[tokio::test]
async fn malformed_json_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let result = source(&server, SheetFormat::Json).fetch_rows().await;
    assert!(matches!(result, Err(Error::Json(_))));
}

// ── URL building ─────────────────────────────────────────────────────

#[test]
fn google_csv_url_encodes_sheet_name() {
    let sheet =
        SheetSource::google_csv("abc123", "สต็อก ยาง", Duration::from_secs(10)).unwrap();

    assert!(sheet
        .url()
        .starts_with("https://docs.google.com/spreadsheets/d/abc123/gviz/tq?tqx=out:csv&sheet="));
    assert!(!sheet.url().contains(' '));
    assert_eq!(sheet.format(), SheetFormat::Csv);
}
