mod common;

use axum::http::{Method, StatusCode};
use common::{read_json, TestApp};
use serde_json::json;

fn nakliye(sira_no: &str, musteri: &str) -> serde_json::Value {
    json!({
        "tarih": "2025-03-10T08:00:00Z",
        "sira_no": sira_no,
        "musteri": musteri,
        "irsaliye_no": format!("IRS-{}", sira_no),
        "bos_tasima": "100",
        "sistem": "100"
    })
}

#[tokio::test]
async fn export_snapshots_all_records() {
    let app = TestApp::new().await;

    app.request(Method::POST, "/api/nakliye", Some(nakliye("1", "Arkas")), None)
        .await;
    app.request(
        Method::POST,
        "/api/yatan-tutar",
        Some(json!({
            "tutar": "500",
            "yatis_tarihi": "2025-03-16T09:00:00Z",
            "donem_baslangic": "2025-03-01T00:00:00Z",
            "donem_bitis": "2025-03-15T00:00:00Z"
        })),
        None,
    )
    .await;

    let response = app
        .request(Method::GET, "/api/backup/export", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    let doc = &body["data"];
    assert_eq!(doc["version"], "1.0");
    assert!(doc["timestamp"].is_string());
    assert_eq!(doc["nakliye_kayitlari"].as_array().unwrap().len(), 1);
    assert_eq!(doc["yatan_tutarlar"].as_array().unwrap().len(), 1);
    // Anonymous export carries no account info
    assert!(doc.get("user").is_none() || doc["user"].is_null());
}

#[tokio::test]
async fn reimporting_an_export_is_a_no_op() {
    let app = TestApp::new().await;

    app.request(Method::POST, "/api/nakliye", Some(nakliye("1", "Arkas")), None)
        .await;
    app.request(Method::POST, "/api/nakliye", Some(nakliye("2", "Baska")), None)
        .await;

    let export = read_json(
        app.request(Method::GET, "/api/backup/export", None, None)
            .await,
    )
    .await;

    let response = app
        .request(
            Method::POST,
            "/api/backup/import",
            Some(export["data"].clone()),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["data"]["nakliye_imported"], 0);
    assert_eq!(body["data"]["nakliye_skipped"], 2);

    let listed = read_json(app.request(Method::GET, "/api/nakliye", None, None).await).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn import_inserts_new_rows_and_skips_known_ones() {
    let app = TestApp::new().await;

    app.request(Method::POST, "/api/nakliye", Some(nakliye("1", "Arkas")), None)
        .await;

    let document = json!({
        "timestamp": "2025-01-15T10:00:00Z",
        "version": "1.0",
        "nakliye_kayitlari": [
            {
                "id": "019502aa-0000-7000-8000-000000000001",
                "tarih": "2025-03-10T08:00:00Z",
                "sira_no": " 1 ",
                "kod": null,
                "musteri": "Arkas",
                "irsaliye_no": "IRS-1",
                "ithalat": false,
                "ihracat": false,
                "bos": false,
                "bos_tasima": "100",
                "reefer": "0",
                "bekleme": "0",
                "geceleme": "0",
                "pazar": "0",
                "harcirah": "0",
                "toplam": "100",
                "sistem": "100",
                "created_at": "2025-03-10T08:00:00Z"
            },
            {
                "id": "019502aa-0000-7000-8000-000000000002",
                "tarih": "2025-04-01T08:00:00Z",
                "sira_no": "9",
                "kod": "K-9",
                "musteri": "Yeni Musteri",
                "irsaliye_no": "IRS-9",
                "ithalat": true,
                "ihracat": false,
                "bos": false,
                "bos_tasima": "0",
                "reefer": "40",
                "bekleme": "0",
                "geceleme": "0",
                "pazar": "0",
                "harcirah": "0",
                "toplam": "40",
                "sistem": "40",
                "created_at": "2025-04-01T08:00:00Z"
            }
        ],
        "yatan_tutarlar": [
            {
                "id": "019502aa-0000-7000-8000-000000000003",
                "tutar": "500",
                "yatis_tarihi": "2025-03-16T09:00:00Z",
                "donem_baslangic": "2025-03-01T00:00:00Z",
                "donem_bitis": "2025-03-15T00:00:00Z",
                "aciklama": null,
                "created_at": "2025-03-16T09:00:00Z"
            }
        ]
    });

    let response = app
        .request(Method::POST, "/api/backup/import", Some(document), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    // Whitespace around the duplicate key fields does not defeat suppression
    assert_eq!(body["data"]["nakliye_imported"], 1);
    assert_eq!(body["data"]["nakliye_skipped"], 1);
    assert_eq!(body["data"]["yatan_imported"], 1);
    assert_eq!(body["data"]["yatan_skipped"], 0);

    // Imported rows get fresh IDs
    let listed = read_json(app.request(Method::GET, "/api/nakliye", None, None).await).await;
    for item in listed["data"].as_array().unwrap() {
        assert_ne!(item["id"], "019502aa-0000-7000-8000-000000000002");
    }
}

#[tokio::test]
async fn import_tolerates_missing_sections() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/backup/import",
            Some(json!({ "timestamp": "2025-01-15T10:00:00Z", "version": "1.0" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["data"]["nakliye_imported"], 0);
    assert_eq!(body["data"]["yatan_imported"], 0);
}
