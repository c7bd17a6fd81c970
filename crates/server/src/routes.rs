use attendance_core::attendance::csv_export::{export_csv, export_filename};
use attendance_core::registration::register_face_use_case::{
    RegisterFaceRequest, RegistrationError,
};
use attendance_core::shared::constants::MULTIPART_CONTENT_TYPE;
use axum::body::{Body, Bytes};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::state::AppState;
use crate::stream::spawn_stream;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/video_feed", get(video_feed))
        .route("/get_attendance", get(get_attendance))
        .route("/register_face", post(register_face))
        .route("/export_attendance", get(export_attendance))
        .route("/registered_faces", get(registered_faces))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"status": "error", "message": message}))).into_response()
}

async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "status": "success",
        "message": "Face Recognition API is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn video_feed(State(state): State<AppState>) -> Response {
    let Some(lease) = state.lease.try_acquire() else {
        return error_response(StatusCode::CONFLICT, "Camera is already streaming");
    };

    let body = match state.pipelines.create() {
        Ok(pipeline) => spawn_stream(pipeline, lease, state.cancelled.clone()),
        Err(e) => {
            log::error!("Could not start video feed: {e}");
            Body::empty()
        }
    };

    (
        [
            (header::CONTENT_TYPE, MULTIPART_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
        .into_response()
}

async fn get_attendance(State(state): State<AppState>) -> Response {
    Json(state.ledger.records()).into_response()
}

async fn registered_faces(State(state): State<AppState>) -> Response {
    Json(state.registry.entries()).into_response()
}

async fn register_face(State(state): State<AppState>, body: Bytes) -> Response {
    let request: RegisterFaceRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => return registration_failure(RegistrationError::MalformedBody(e.to_string())),
    };

    // image decoding and file writes stay off the async workers
    let use_case = state.register.clone();
    match tokio::task::spawn_blocking(move || use_case.execute(request)).await {
        Ok(Ok(face)) => Json(json!({
            "status": "success",
            "message": format!("Face registered for {}", face.name()),
        }))
        .into_response(),
        Ok(Err(e)) => registration_failure(e),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

fn registration_failure(error: RegistrationError) -> Response {
    let status = match error {
        RegistrationError::MissingFields | RegistrationError::InvalidStudentId(_) => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    log::warn!("Face registration failed: {error}");
    error_response(status, &error.to_string())
}

#[derive(Debug, Deserialize)]
struct ExportQuery {
    date: Option<String>,
}

/// The whole ledger is exported whatever `date` says; it only names the
/// attachment.
async fn export_attendance(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Response {
    let date = match query.date {
        Some(raw) => match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    &format!("Invalid date {raw:?}, expected YYYY-MM-DD"),
                )
            }
        },
        None => state.clock.now().date_naive(),
    };

    let csv = export_csv(&state.ledger.records());
    (
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", export_filename(date)),
            ),
        ],
        csv,
    )
        .into_response()
}
