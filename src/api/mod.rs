use axum::{
    routing::{get, post},
    Router,
    Json,
    extract::{DefaultBodyLimit, State},
    response::{IntoResponse, Response},
    http::StatusCode,
};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use validator::Validate;

use crate::gamification::AchievementStatus;
use crate::genetics::{AnalysisError, AnalysisResult, UploadedFile, MAX_UPLOAD_BYTES};
use crate::llm::{ChatManager, ChatMessage};
use crate::profile::UserProfile;
use crate::state::AppState;

const MAX_CONCURRENT_REQUESTS: usize = 64;

#[derive(Clone)]
pub struct ApiState {
    app: Arc<Mutex<AppState>>,
    chat: Arc<ChatManager>,
}

#[derive(Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 4000))]
    message: String,
}

#[derive(Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[validate(length(min = 1, max = 255))]
    file_name: String,
    content: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    reply: ChatMessage,
    health_points: u32,
    level: u32,
}

#[derive(Serialize)]
pub struct ProgressResponse {
    health_points: u32,
    level: u32,
    streak: u32,
    points_to_next_level: u32,
    achievements: Vec<AchievementStatus>,
}

#[derive(Serialize)]
struct ApiResponse {
    status: String,
}

fn error_response(code: StatusCode, status: impl Into<String>) -> Response {
    (code, Json(ApiResponse { status: status.into() })).into_response()
}

fn analysis_error_response(e: AnalysisError) -> Response {
    let code = match e {
        AnalysisError::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        AnalysisError::UnsupportedFile(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        AnalysisError::NotEnoughRows | AnalysisError::MissingHeaders(_) | AnalysisError::Read(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AnalysisError::Storage(_) | AnalysisError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(code, e.to_string())
}

/// Create and configure the API router
pub fn create_api(state: AppState, chat: ChatManager) -> Router {
    let state = ApiState {
        app: Arc::new(Mutex::new(state)),
        chat: Arc::new(chat),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health_check))
        .route("/genetics/analyze", post(analyze_handler))
        .route("/genetics/report", get(report_handler).delete(clear_report_handler))
        .route("/chat", post(chat_handler))
        .route("/profile", get(profile_handler).put(update_profile_handler))
        .route("/progress", get(progress_handler))
        // JSON-encoded uploads need headroom over the raw size limit
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES * 2))
        .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> Response {
    Json(ApiResponse {
        status: "Server is running and healthy".to_string(),
    })
    .into_response()
}

async fn analyze_handler(
    State(state): State<ApiState>,
    Json(request): Json<AnalyzeRequest>,
) -> Response {
    if let Err(e) = request.validate() {
        return error_response(StatusCode::BAD_REQUEST, e.to_string());
    }

    let file = UploadedFile::new(request.file_name, request.content);
    if let Err(e) = file.check_upload() {
        return analysis_error_response(e);
    }

    let mut app = state.app.lock().await;
    match app.analyze(&file).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => analysis_error_response(e),
    }
}

async fn report_handler(State(state): State<ApiState>) -> Response {
    let app = state.app.lock().await;
    match app.analyzer.current().await {
        Some(result) => Json::<AnalysisResult>(result).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "No genetic analysis available"),
    }
}

async fn clear_report_handler(State(state): State<ApiState>) -> Response {
    let mut app = state.app.lock().await;
    match app.clear_genetics().await {
        Ok(()) => Json(ApiResponse {
            status: "Genetic analysis cleared".to_string(),
        })
        .into_response(),
        Err(e) => analysis_error_response(e),
    }
}

async fn chat_handler(
    State(state): State<ApiState>,
    Json(request): Json<ChatRequest>,
) -> Response {
    if let Err(e) = request.validate() {
        return error_response(StatusCode::BAD_REQUEST, e.to_string());
    }

    let mut app = state.app.lock().await;
    match app.send_message(&state.chat, &request.message).await {
        Ok(reply) => Json(ChatResponse {
            reply,
            health_points: app.tracker.health_points,
            level: app.tracker.level,
        })
        .into_response(),
        Err(e) => {
            error!("Failed to record chat turn: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to save conversation: {}", e))
        }
    }
}

async fn profile_handler(State(state): State<ApiState>) -> Response {
    let app = state.app.lock().await;
    Json(app.profile.clone()).into_response()
}

async fn update_profile_handler(
    State(state): State<ApiState>,
    Json(mut profile): Json<UserProfile>,
) -> Response {
    if let Err(e) = profile.validate() {
        return error_response(StatusCode::BAD_REQUEST, e.to_string());
    }

    let mut app = state.app.lock().await;
    // Genetics only change through an analysis
    profile.genetics = app.profile.genetics.take();
    app.profile = profile;

    if let Err(e) = app.save().await {
        error!("Failed to save profile: {}", e);
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to save profile: {}", e));
    }
    info!("Profile updated");
    Json(app.profile.clone()).into_response()
}

async fn progress_handler(State(state): State<ApiState>) -> Response {
    let app = state.app.lock().await;
    let tracker = app.tracker;
    Json(ProgressResponse {
        health_points: tracker.health_points,
        level: tracker.level,
        streak: tracker.streak,
        points_to_next_level: tracker.points_to_next_level(),
        achievements: tracker.achievements(),
    })
    .into_response()
}
