mod common;

use axum::http::{Method, StatusCode};
use common::{money, read_json, TestApp};
use serde_json::json;

async fn seed(app: &TestApp, tarih: &str, bos_tasima: &str, sistem: &str) {
    let response = app
        .request(
            Method::POST,
            "/api/nakliye",
            Some(json!({
                "tarih": tarih,
                "sira_no": "1",
                "musteri": "Arkas",
                "irsaliye_no": "IRS-1",
                "bos_tasima": bos_tasima,
                "sistem": sistem
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn summary_over_all_records() {
    let app = TestApp::new().await;
    seed(&app, "2025-02-10T08:00:00Z", "100", "120").await;
    seed(&app, "2025-03-10T08:00:00Z", "50.25", "40").await;

    let body = read_json(
        app.request(Method::GET, "/api/reports/summary", None, None)
            .await,
    )
    .await;
    let data = &body["data"];
    assert_eq!(data["kayit_sayisi"], 2);
    assert_eq!(money(&data["toplam"]), 150.25);
    assert_eq!(money(&data["sistem"]), 160.0);
    assert_eq!(money(&data["fark"]), 9.75);
}

#[tokio::test]
async fn summary_can_be_narrowed_to_a_month() {
    let app = TestApp::new().await;
    seed(&app, "2025-02-10T08:00:00Z", "100", "120").await;
    seed(&app, "2025-03-10T08:00:00Z", "50", "40").await;

    let body = read_json(
        app.request(
            Method::GET,
            "/api/reports/summary?year=2025&month=2",
            None,
            None,
        )
        .await,
    )
    .await;
    assert_eq!(body["data"]["kayit_sayisi"], 1);
    assert_eq!(money(&body["data"]["toplam"]), 100.0);

    let response = app
        .request(Method::GET, "/api/reports/summary?year=2025", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn summary_of_empty_database_is_zero() {
    let app = TestApp::new().await;

    let body = read_json(
        app.request(Method::GET, "/api/reports/summary", None, None)
            .await,
    )
    .await;
    assert_eq!(body["data"]["kayit_sayisi"], 0);
    assert_eq!(money(&body["data"]["toplam"]), 0.0);
    assert_eq!(money(&body["data"]["fark"]), 0.0);
}
