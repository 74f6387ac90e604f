use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::{ingest_document, CvDocument};
use crate::ranking::engine::{rank_cvs, RankingOutcome};
use crate::ranking::export;
use crate::ranking::weights::WeightConfig;
use crate::sessions::SessionStatus;
use crate::state::AppState;

#[derive(Serialize)]
pub struct SessionCreatedResponse {
    pub session_id: Uuid,
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Json<SessionCreatedResponse> {
    let session_id = state.sessions.create().await;
    Json(SessionCreatedResponse { session_id })
}

/// GET /api/v1/sessions/:id
pub async fn handle_session_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionStatus>, AppError> {
    let status = state
        .sessions
        .status(id)
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(status))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(id))
    }
}

#[derive(Serialize)]
pub struct JobDescriptionResponse {
    pub chars: usize,
}

/// POST /api/v1/sessions/:id/job
/// Multipart with either a `text` field or an uploaded `file`. A file goes
/// through the same extraction path as CVs.
pub async fn handle_set_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<JobDescriptionResponse>, AppError> {
    let mut job_text: Option<String> = None;

    while let Some(field) = next_field(&mut multipart).await? {
        let name = field.name().map(String::from);
        match name.as_deref() {
            Some("text") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("invalid text field: {e}")))?;
                job_text = Some(text);
            }
            Some("file") => {
                let filename = field
                    .file_name()
                    .unwrap_or("job_description.txt")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
                let doc = ingest_document(&filename, &bytes, state.config.max_file_size_mb)
                    .map_err(|e| AppError::Validation(format!("{filename}: {e}")))?;
                job_text = Some(doc.text);
            }
            _ => {}
        }
    }

    let job_text = job_text
        .ok_or_else(|| AppError::Validation("expected a 'text' or 'file' field".to_string()))?;
    let chars = job_text.chars().count();

    if !state.sessions.set_job_description(id, job_text).await {
        return Err(session_not_found(id));
    }

    Ok(Json(JobDescriptionResponse { chars }))
}

#[derive(Serialize)]
pub struct AcceptedCv {
    pub id: Uuid,
    pub filename: String,
    pub chars: usize,
}

#[derive(Serialize)]
pub struct RejectedCv {
    pub filename: String,
    pub reason: String,
}

/// Per-file result of a CV batch upload. A rejected file never aborts the
/// rest of the batch.
#[derive(Serialize)]
pub struct UploadReport {
    pub accepted: Vec<AcceptedCv>,
    pub rejected: Vec<RejectedCv>,
}

/// POST /api/v1/sessions/:id/cvs
pub async fn handle_upload_cvs(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UploadReport>, AppError> {
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();
    let mut docs: Vec<CvDocument> = Vec::new();

    while let Some(field) = next_field(&mut multipart).await? {
        let Some(filename) = field.file_name().map(String::from) else {
            continue; // not a file part
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;

        match ingest_document(&filename, &bytes, state.config.max_file_size_mb) {
            Ok(doc) => {
                accepted.push(AcceptedCv {
                    id: doc.id,
                    filename: doc.filename.clone(),
                    chars: doc.text.chars().count(),
                });
                docs.push(doc);
            }
            Err(e) => rejected.push(RejectedCv {
                filename,
                reason: e.to_string(),
            }),
        }
    }

    if !state.sessions.add_cvs(id, docs).await {
        return Err(session_not_found(id));
    }

    Ok(Json(UploadReport { accepted, rejected }))
}

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    /// Omitted weights mean "rank by the model-provided overall score".
    pub weights: Option<WeightConfig>,
}

/// POST /api/v1/sessions/:id/rank
pub async fn handle_rank(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RankRequest>,
) -> Result<Json<RankingOutcome>, AppError> {
    if let Some(weights) = &request.weights {
        weights.validate().map_err(AppError::Validation)?;
    }

    let (job_description, cvs) = state
        .sessions
        .snapshot(id)
        .await
        .ok_or_else(|| session_not_found(id))?;
    let job_description = job_description.unwrap_or_default();

    let outcome = rank_cvs(
        state.evaluator.clone(),
        &job_description,
        &cvs,
        request.weights,
        state.config.max_concurrency,
    )
    .await;

    state.sessions.set_outcome(id, outcome.clone()).await;

    Ok(Json(outcome))
}

/// GET /api/v1/sessions/:id/ranking
pub async fn handle_get_ranking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RankingOutcome>, AppError> {
    Ok(Json(ranked_outcome(&state, id).await?))
}

/// GET /api/v1/sessions/:id/export/csv
pub async fn handle_export_csv(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = ranked_outcome(&state, id).await?;
    let body = export::to_csv(&outcome).map_err(AppError::Internal)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"cv_rankings.csv\"",
            ),
        ],
        body,
    ))
}

/// GET /api/v1/sessions/:id/export/json
pub async fn handle_export_json(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = ranked_outcome(&state, id).await?;
    let body = export::to_json(&outcome).map_err(AppError::Internal)?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"cv_rankings_detailed.json\"",
            ),
        ],
        body,
    ))
}

async fn ranked_outcome(state: &AppState, id: Uuid) -> Result<RankingOutcome, AppError> {
    match state.sessions.outcome(id).await {
        None => Err(session_not_found(id)),
        Some(None) => Err(AppError::NotFound(
            "No ranking has been computed for this session".to_string(),
        )),
        Some(Some(outcome)) => Ok(outcome),
    }
}

async fn next_field(
    multipart: &mut Multipart,
) -> Result<Option<axum::extract::multipart::Field<'_>>, AppError> {
    multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}
