//! HTTP-level tests of the lookup endpoints.
//!
//! The router is driven in-process with `oneshot`; the dataset is an
//! in-memory grid so no spreadsheet credentials are needed.

use announce_service::routes::{AppState, NOT_FOUND_MESSAGE};
use announce_service::startup::build_router;
use announce_sheets::{DatasetSource, Grid, SheetsError};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::Value;
use tower::ServiceExt;

// ── Test datasets ──────────────────────────────────────────────

struct FixedGrid(Grid);

#[async_trait]
impl DatasetSource for FixedGrid {
    async fn fetch_grid(&self) -> Result<Grid, SheetsError> {
        Ok(self.0.clone())
    }
}

enum Failure {
    Unconfigured,
    Upstream,
}

struct FailingSource(Failure);

#[async_trait]
impl DatasetSource for FailingSource {
    async fn fetch_grid(&self) -> Result<Grid, SheetsError> {
        Err(match self.0 {
            Failure::Unconfigured => SheetsError::MissingConfig,
            Failure::Upstream => SheetsError::Request("503 Service Unavailable".to_string()),
        })
    }

    fn is_configured(&self) -> bool {
        !matches!(self.0, Failure::Unconfigured)
    }
}

fn dataset() -> Grid {
    Grid::from_rows(vec![
        vec![
            "Catatan",
            "NIM",
            "Nama",
            "Fakultas",
            "Biro/Departemen",
            "Status",
            "Narahubung_Nama",
            "Narahubung_WA",
            "Narahubung_Line",
        ],
        vec![
            "Bawa KTM",
            "2201",
            "Ani",
            "Teknik",
            "Humas",
            "Lulus",
            "Budi",
            "+62 812-3456-7890",
            "budi.line",
        ],
        vec!["", "2202", "Citra", "Ekonomi", "Riset", "Tidak Lulus"],
        vec!["", "2203", "Dodi", "Hukum", "Acara", "diproses"],
    ])
}

// ── Helpers ────────────────────────────────────────────────────

async fn get(source: impl DatasetSource + 'static, uri: &str) -> (StatusCode, Value) {
    let app = build_router(AppState::new(source), None, None);
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ── /api/check ─────────────────────────────────────────────────

#[tokio::test]
async fn check_returns_full_record() {
    let (status, body) = get(FixedGrid(dataset()), "/api/check?nim=2201").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(
        body["data"],
        serde_json::json!({
            "nim": "2201",
            "nama": "Ani",
            "fakultas": "Teknik",
            "biro": "Humas",
            "status": "Lulus",
            "narahubungNama": "Budi",
            "narahubungWA": "+62 812-3456-7890",
            "narahubungLine": "budi.line",
            "catatan": "Bawa KTM",
        })
    );
}

#[tokio::test]
async fn check_trims_identifier() {
    let (status, body) = get(FixedGrid(dataset()), "/api/check?nim=%20%202202%20").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["nama"], "Citra");
    assert_eq!(body["data"]["catatan"], "");
}

#[tokio::test]
async fn unknown_identifier_is_ok_status_with_message() {
    let (status, body) = get(FixedGrid(dataset()), "/api/check?nim=9999").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], false);
    assert_eq!(body["message"], NOT_FOUND_MESSAGE);
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn missing_identifier_is_bad_request() {
    for uri in ["/api/check", "/api/check?nim=", "/api/check?nim=%20%20"] {
        let (status, body) = get(FixedGrid(dataset()), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {uri}");
        assert_eq!(body["ok"], false);
        assert_eq!(body["message"], "NIM wajib diisi.");
    }
}

#[tokio::test]
async fn missing_nim_column_is_server_error() {
    let grid = Grid::from_rows(vec![vec!["Nama", "Status"], vec!["Ani", "Lulus"]]);
    let (status, body) = get(FixedGrid(grid), "/api/check?nim=2201").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Kolom NIM tidak ditemukan di header.");
}

#[tokio::test]
async fn header_only_dataset_is_unavailable() {
    let grid = Grid::from_rows(vec![vec!["NIM", "Nama"]]);
    let (status, body) = get(FixedGrid(grid), "/api/check?nim=2201").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Data belum tersedia.");
}

#[tokio::test]
async fn missing_configuration_is_server_error() {
    let (status, body) = get(FailingSource(Failure::Unconfigured), "/api/check?nim=2201").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["ok"], false);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("Error server: ENV belum lengkap.")
    );
}

#[tokio::test]
async fn upstream_failure_is_server_error() {
    let (status, body) = get(FailingSource(Failure::Upstream), "/api/check?nim=2201").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn repeated_identifier_uses_first_value() {
    let (status, body) = get(FixedGrid(dataset()), "/api/check?nim=2201&nim=x").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["data"]["nim"], "2201");

    let (status, body) = get(FixedGrid(dataset()), "/api/check?nim=&nim=2201").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "NIM wajib diisi.");
}

#[tokio::test]
async fn unrelated_parameters_are_ignored() {
    let (status, body) =
        get(FixedGrid(dataset()), "/api/announcement?ref=wa&nim=2202&x=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["verdict"], "failed");
}

#[tokio::test]
async fn validation_precedes_fetch() {
    let (status, _) = get(FailingSource(Failure::Upstream), "/api/check").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── /api/announcement ──────────────────────────────────────────

#[tokio::test]
async fn passed_announcement_carries_contact_and_confetti() {
    let (status, body) = get(FixedGrid(dataset()), "/api/announcement?nim=2201").await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["verdict"], "passed");
    assert_eq!(data["celebrate"], true);
    assert_eq!(data["record"]["nim"], "2201");
    assert_eq!(data["contact"]["name"], "Budi");
    assert_eq!(data["contact"]["whatsapp"], "https://wa.me/6281234567890");
    assert_eq!(data["contact"]["line"], "budi.line");
    assert_eq!(data["contact"]["note"], "Bawa KTM");
    assert!(data.get("info").is_none());
}

#[tokio::test]
async fn failed_and_pending_announcements_do_not_celebrate() {
    for (nim, verdict) in [("2202", "failed"), ("2203", "pending")] {
        let (_, body) = get(FixedGrid(dataset()), &format!("/api/announcement?nim={nim}")).await;
        let data = &body["data"];
        assert_eq!(data["verdict"], verdict);
        assert_eq!(data["celebrate"], false);
        assert!(data.get("contact").is_none());
        assert!(data["info"].is_string());
    }
}

#[tokio::test]
async fn announcement_not_found_matches_check() {
    let (status, body) = get(FixedGrid(dataset()), "/api/announcement?nim=0000").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], NOT_FOUND_MESSAGE);
}

// ── Health and middleware ──────────────────────────────────────

#[tokio::test]
async fn readiness_reports_dataset_configuration() {
    let (_, body) = get(FixedGrid(dataset()), "/health/ready").await;
    assert_eq!(body["status"], "healthy");

    let (_, body) = get(FailingSource(Failure::Unconfigured), "/health/ready").await;
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["dataset"]["status"], "unhealthy");
}

#[tokio::test]
async fn request_id_is_echoed_or_generated() {
    let app = build_router(AppState::new(FixedGrid(dataset())), None, None);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "abc-123");

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn metrics_endpoint_runs_through_middleware() {
    let handle = PrometheusBuilder::new().build_recorder().handle();
    let app = build_router(AppState::new(FixedGrid(dataset())), Some(handle), None);

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn metrics_endpoint_absent_without_handle() {
    let app = build_router(AppState::new(FixedGrid(dataset())), None, None);
    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
