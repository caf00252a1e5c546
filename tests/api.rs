use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use plan_my_dietary::api::create_api;
use plan_my_dietary::database::Database;
use plan_my_dietary::llm::ChatManager;
use plan_my_dietary::state::AppState;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn app() -> Router {
    let db = Database::in_memory().await.unwrap();
    let state = AppState::load(db).await.unwrap();
    create_api(state, ChatManager::new(None))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["status"].as_str().unwrap().contains("healthy"));
}

#[tokio::test]
async fn test_analyze_report_and_clear() {
    let app = app().await;

    let (status, _) = send(&app, "GET", "/genetics/report", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let upload = json!({
        "file_name": "dna.csv",
        "content": "rsid,chromosome,position,genotype\nrs4988235,2,136608646,AA\n"
    });
    let (status, body) = send(&app, "POST", "/genetics/analyze", Some(upload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["traits"][0]["interpretation"], "Lactose intolerant");

    let (status, report) = send(&app, "GET", "/genetics/report", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["upload_hash"], body["upload_hash"]);

    let (_, profile) = send(&app, "GET", "/profile", None).await;
    assert_eq!(profile["genetics"]["traits"][0]["trait_name"], "Lactose Tolerance");

    let (status, _) = send(&app, "DELETE", "/genetics/report", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", "/genetics/report", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_analyze_rejects_bad_uploads() {
    let app = app().await;

    let wrong_type = json!({"file_name": "dna.txt", "content": "rsid,chromosome,position,genotype\nrs1,1,1,AA\n"});
    let (status, _) = send(&app, "POST", "/genetics/analyze", Some(wrong_type)).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let header_only = json!({"file_name": "dna.csv", "content": "rsid,chromosome,position,genotype"});
    let (status, body) = send(&app, "POST", "/genetics/analyze", Some(header_only)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["status"].as_str().unwrap().contains("at least one data row"));
}

#[tokio::test]
async fn test_chat_and_progress() {
    let app = app().await;

    let (status, _) = send(&app, "POST", "/chat", Some(json!({"message": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "POST", "/chat", Some(json!({"message": "iron rich foods?"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"]["role"], "assistant");
    assert_eq!(body["health_points"], 10);

    let (_, progress) = send(&app, "GET", "/progress", None).await;
    assert_eq!(progress["level"], 1);
    assert_eq!(progress["points_to_next_level"], 90);
    assert_eq!(progress["achievements"][0]["unlocked"], true);
}

#[tokio::test]
async fn test_profile_update_is_validated() {
    let app = app().await;
    let (_, mut profile) = send(&app, "GET", "/profile", None).await;

    profile["age"] = json!(0);
    let (status, _) = send(&app, "PUT", "/profile", Some(profile.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    profile["age"] = json!(35);
    profile["diet"] = json!("Jain");
    let (status, updated) = send(&app, "PUT", "/profile", Some(profile)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["age"], 35);
    assert_eq!(updated["diet"], "Jain");
}
