//! Axum route handlers for the Profile API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{ProfileRow, UserProfile};
use crate::profile::{get_profile_row, upsert_profile, validate_profile};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct UpsertProfileRequest {
    pub user_id: Uuid,
    pub profile: UserProfile,
}

/// PUT /api/v1/profile
///
/// Validates and stores the profile document. Replaces any prior version.
pub async fn handle_upsert_profile(
    State(state): State<AppState>,
    Json(request): Json<UpsertProfileRequest>,
) -> Result<Json<ProfileRow>, AppError> {
    validate_profile(&request.profile).map_err(AppError::Validation)?;
    let row = upsert_profile(&state.db, request.user_id, &request.profile).await?;
    Ok(Json(row))
}

/// GET /api/v1/profile?user_id=
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ProfileRow>, AppError> {
    let row = get_profile_row(&state.db, params.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No profile found for user {}", params.user_id)))?;
    Ok(Json(row))
}
