use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::profile::ResumeProfile;
use crate::errors::AppError;
use crate::models::analysis::{AnalysisRecord, AnalysisResult};
use crate::state::AppState;

const UPLOAD_FIELD: &str = "resume";
const ALLOWED_EXTENSIONS: &[&str] = &[".pdf", ".doc", ".docx"];
const DEFAULT_HISTORY_LIMIT: usize = 20;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
    pub id: Uuid,
    pub file_name: String,
    pub size_bytes: usize,
    #[serde(flatten)]
    pub analysis: AnalysisResult,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: ResumeProfile,
    pub confidence: f64,
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

struct ResumeUpload {
    file_name: String,
    content_type: Option<String>,
    bytes: Bytes,
}

/// POST /api/v1/resume/predict
pub async fn handle_predict(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<PredictResponse>), AppError> {
    let upload = read_upload(&mut multipart, state.config.max_upload_bytes).await?;
    info!(
        file_name = %upload.file_name,
        size_bytes = upload.bytes.len(),
        "Analyzing uploaded resume"
    );

    let outcome = state
        .engine
        .analyze(
            &upload.bytes,
            &upload.file_name,
            upload.content_type.as_deref(),
        )
        .await;

    Ok((
        StatusCode::CREATED,
        Json(PredictResponse {
            id: outcome.id,
            file_name: upload.file_name,
            size_bytes: upload.bytes.len(),
            analysis: outcome.analysis,
            created_at: outcome.created_at,
        }),
    ))
}

/// POST /api/v1/resume/profile
pub async fn handle_profile(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ProfileResponse>), AppError> {
    let upload = read_upload(&mut multipart, state.config.max_upload_bytes).await?;
    let outcome = state.engine.extract_profile(
        &upload.bytes,
        &upload.file_name,
        upload.content_type.as_deref(),
    );

    Ok((
        StatusCode::CREATED,
        Json(ProfileResponse {
            profile: outcome.profile,
            confidence: outcome.confidence,
        }),
    ))
}

/// GET /api/v1/resume/history
pub async fn handle_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<AnalysisRecord>>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let store = Arc::clone(&state.store);
    let records = tokio::task::spawn_blocking(move || store.recent(limit))
        .await
        .context("History read task failed")?;
    Ok(Json(records))
}

/// GET /api/v1/resume/result/:id
pub async fn handle_result(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisRecord>, AppError> {
    let store = Arc::clone(&state.store);
    let record = tokio::task::spawn_blocking(move || store.find(id))
        .await
        .context("History lookup task failed")?
        .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found")))?;
    Ok(Json(record))
}

/// Pulls the `resume` file out of the multipart body and validates it.
async fn read_upload(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> Result<ResumeUpload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_read_error(e, max_bytes))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = sanitize_file_name(field.file_name());
        if !has_allowed_extension(&file_name) {
            return Err(AppError::Validation(
                "Invalid file type. Only PDF and Word documents are accepted.".to_string(),
            ));
        }

        let content_type = field.content_type().map(|ct| ct.to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_read_error(e, max_bytes))?;

        if bytes.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }
        if bytes.len() > max_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "Uploaded file is {} bytes, limit is {max_bytes}",
                bytes.len()
            )));
        }

        return Ok(ResumeUpload {
            file_name,
            content_type,
            bytes,
        });
    }

    Err(AppError::Validation(
        "Missing `resume` file field".to_string(),
    ))
}

/// Maps a multipart read failure. The router's body-limit layer aborts
/// oversize reads mid-stream, and that abort keeps its 413 status instead
/// of collapsing into a generic validation error.
fn multipart_read_error(e: MultipartError, max_bytes: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Upload exceeds the {max_bytes}-byte limit"))
    } else {
        AppError::Validation(format!("Malformed multipart body: {e}"))
    }
}

/// Strips any client-supplied directory components, keeping the base name.
fn sanitize_file_name(raw: Option<&str>) -> String {
    let base = raw
        .unwrap_or("")
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim();
    if base.is_empty() {
        "resume".to_string()
    } else {
        base.to_string()
    }
}

fn has_allowed_extension(file_name: &str) -> bool {
    let lowered = file_name.to_lowercase();
    ALLOWED_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext))
}
