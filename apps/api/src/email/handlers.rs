//! Axum route handlers for the Email API.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::email::generator::{generate_email, GenerateEmailResponse};
use crate::errors::AppError;
use crate::models::email::GeneratedEmailRow;
use crate::state::AppState;

/// POST /api/v1/projects/:id/emails
///
/// Full pipeline: score → analyze → match achievement → assemble → persist.
/// Regeneration appends a new email row; history is never overwritten.
pub async fn handle_generate_email(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<GenerateEmailResponse>, AppError> {
    let response = generate_email(&state.db, state.assembler.as_ref(), project_id).await?;
    Ok(Json(response))
}

/// GET /api/v1/projects/:id/emails
///
/// All emails generated for a lead, newest first.
pub async fn handle_list_project_emails(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<GeneratedEmailRow>>, AppError> {
    let rows = sqlx::query_as::<_, GeneratedEmailRow>(
        "SELECT * FROM generated_emails WHERE project_id = $1 ORDER BY created_at DESC",
    )
    .bind(project_id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(rows))
}

/// GET /api/v1/emails/:id
pub async fn handle_get_email(
    State(state): State<AppState>,
    Path(email_id): Path<Uuid>,
) -> Result<Json<GeneratedEmailRow>, AppError> {
    let row = sqlx::query_as::<_, GeneratedEmailRow>(
        "SELECT * FROM generated_emails WHERE id = $1",
    )
    .bind(email_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Email {email_id} not found")))?;
    Ok(Json(row))
}
