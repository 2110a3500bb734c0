use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use configs::{AppConfig, StorageBackend};
use serde_json::{json, Value};
use tower::ServiceExt;

fn file_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.storage.backend = StorageBackend::File;
    cfg.storage.file_path = None;
    cfg
}

fn sqlite_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.storage.backend = StorageBackend::Database;
    cfg.database.url = "sqlite::memory:".into();
    cfg
}

async fn apps() -> anyhow::Result<Vec<Router>> {
    Ok(vec![
        server::startup::build_app(&file_config()).await?,
        server::startup::build_app(&sqlite_config()).await?,
    ])
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&v)?)
        }
        None => Body::empty(),
    };
    let resp = app.clone().oneshot(req.body(body)?).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    // 非 JSON 响应体按字符串返回，由断言决定是否可接受
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    Ok((status, value))
}

fn marker(kind: &str, lat: f64, lon: f64) -> Value {
    json!({"type": kind, "geometry": {"latitude": lat, "longitude": lon}})
}

#[tokio::test]
async fn list_on_empty_store_is_empty() -> anyhow::Result<()> {
    for app in apps().await? {
        let (status, body) = send(&app, "GET", "/api/markers", None).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }
    Ok(())
}

#[tokio::test]
async fn add_get_delete_roundtrip() -> anyhow::Result<()> {
    for app in apps().await? {
        let (status, created) = send(&app, "POST", "/api/markers", Some(marker("plothole", 1.0, 2.0))).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created, json!({"id": 1, "type": "plothole", "geometry": {"latitude": 1.0, "longitude": 2.0}}));

        let (status, fetched) = send(&app, "GET", "/api/markers/1", None).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, body) = send(&app, "DELETE", "/api/markers/1", None).await?;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, body) = send(&app, "GET", "/api/markers/1", None).await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NOT_FOUND");
    }
    Ok(())
}

#[tokio::test]
async fn update_replaces_marker() -> anyhow::Result<()> {
    for app in apps().await? {
        let (_, created) = send(&app, "POST", "/api/markers", Some(marker("plothole", 1.0, 2.0))).await?;
        let mut changed = marker("dense_traffic", 3.0, 4.0);
        changed["id"] = created["id"].clone();

        let (status, updated) = send(&app, "PUT", "/api/markers", Some(changed.clone())).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated, changed);

        let (_, all) = send(&app, "GET", "/api/markers", None).await?;
        assert_eq!(all, json!([changed]));

        let mut unknown = marker("plothole", 5.0, 5.0);
        unknown["id"] = json!(999);
        let (status, _) = send(&app, "PUT", "/api/markers", Some(unknown)).await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
    Ok(())
}

#[tokio::test]
async fn constraint_violations_map_to_client_errors() -> anyhow::Result<()> {
    for app in apps().await? {
        send(&app, "POST", "/api/markers", Some(marker("plothole", 10.0, 10.0))).await?;

        let (status, body) = send(&app, "POST", "/api/markers", Some(marker("dense_traffic", 10.0, 10.0))).await?;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "CONFLICT");

        let (status, body) = send(&app, "POST", "/api/markers", Some(marker("plothole", 95.0, 10.0))).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");

        let (status, body) = send(&app, "POST", "/api/markers", Some(marker("pothole", 0.0, 0.0))).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }
    Ok(())
}

#[tokio::test]
async fn malformed_requests_get_json_errors() -> anyhow::Result<()> {
    for app in apps().await? {
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/markers")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))?,
            )
            .await?;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
        let body: Value = serde_json::from_slice(&bytes)?;
        assert_eq!(body["error"], "VALIDATION_ERROR");

        for method in ["GET", "DELETE"] {
            let (status, body) = send(&app, method, "/api/markers/abc", None).await?;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "VALIDATION_ERROR");
        }
    }
    Ok(())
}

#[tokio::test]
async fn delete_unknown_id_is_no_content() -> anyhow::Result<()> {
    for app in apps().await? {
        let (status, _) = send(&app, "DELETE", "/api/markers/4242", None).await?;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
    Ok(())
}

#[tokio::test]
async fn ambient_endpoints_respond() -> anyhow::Result<()> {
    let app = server::startup::build_app(&file_config()).await?;

    let (status, body) = send(&app, "GET", "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, doc) = send(&app, "GET", "/api-docs/openapi.json", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/markers"].is_object());
    assert!(doc["paths"]["/api/markers/{id}"].is_object());

    send(&app, "GET", "/api/markers", None).await?;
    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty())?)
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let text = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    assert!(String::from_utf8_lossy(&text).contains("scootio_marker_operations_total"));
    Ok(())
}

#[tokio::test]
async fn custom_api_prefix_is_honoured() -> anyhow::Result<()> {
    let mut cfg = file_config();
    cfg.server.api_prefix = "/v2".into();
    let app = server::startup::build_app(&cfg).await?;

    let (status, _) = send(&app, "GET", "/v2/markers", None).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", "/api/markers", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, doc) = send(&app, "GET", "/api-docs/openapi.json", None).await?;
    assert!(doc["paths"]["/v2/markers"].is_object());
    assert!(doc["paths"]["/v2/markers/{id}"].is_object());
    assert!(doc["paths"]["/api/markers"].is_null());
    Ok(())
}
