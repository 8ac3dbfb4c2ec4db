//! Axum route handlers for the lead store and the scoring/analysis surface.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::achievements::{match_achievement, AchievementMatch};
use crate::matching::analyzer::{analyze, RequirementAnalysis};
use crate::matching::scorer::{compute_match, MatchReport};
use crate::matching::store::{load_project, persist_match_report};
use crate::models::profile::UserProfile;
use crate::models::project::{CreateProjectRequest, ProjectRow};
use crate::profile::require_profile;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct ScoreAllRequest {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct ScoreResponse {
    pub project_id: Uuid,
    pub match_report: MatchReport,
}

#[derive(Serialize)]
pub struct ScoreAllResponse {
    pub scored: usize,
    pub results: Vec<ScoreResponse>,
}

/// Analysis + achievement match for one (project, profile) pair — the
/// preview surface that feeds email assembly.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: RequirementAnalysis,
    pub achievement_match: AchievementMatch,
}

pub fn analyze_and_match(project: &ProjectRow, profile: &UserProfile) -> AnalyzeResponse {
    AnalyzeResponse {
        analysis: analyze(project, profile),
        achievement_match: match_achievement(&profile.highlight_projects, project),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lead store
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/projects
///
/// Creates a lead row. Ingestion itself (platform search, scraping) lives
/// outside this service — this is the drop-off point for its output.
pub async fn handle_create_project(
    State(state): State<AppState>,
    Json(request): Json<CreateProjectRequest>,
) -> Result<Json<ProjectRow>, AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    if request.platform.trim().is_empty() {
        return Err(AppError::Validation("platform cannot be empty".to_string()));
    }

    let row = sqlx::query_as::<_, ProjectRow>(
        r#"
        INSERT INTO projects
            (id, user_id, title, description, budget, currency, client_name, client_type,
             industry, contact_email, contact_email_valid, contact_url, platform_link,
             work_type, platform, has_email, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                false, now(), now())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(request.user_id)
    .bind(&request.title)
    .bind(&request.description)
    .bind(request.budget)
    .bind(&request.currency)
    .bind(&request.client_name)
    .bind(&request.client_type)
    .bind(&request.industry)
    .bind(&request.contact_email)
    .bind(request.contact_email_valid)
    .bind(&request.contact_url)
    .bind(&request.platform_link)
    .bind(&request.work_type)
    .bind(&request.platform)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(row))
}

/// GET /api/v1/projects?user_id=
///
/// Lists a user's leads, highest priority first, unscored last.
pub async fn handle_list_projects(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ProjectRow>>, AppError> {
    let rows = sqlx::query_as::<_, ProjectRow>(
        "SELECT * FROM projects WHERE user_id = $1 \
         ORDER BY match_score DESC NULLS LAST, created_at DESC",
    )
    .bind(params.user_id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(rows))
}

/// GET /api/v1/projects/:id
pub async fn handle_get_project(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ProjectRow>, AppError> {
    Ok(Json(load_project(&state.db, project_id).await?))
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring & analysis
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/projects/:id/score
///
/// Computes the match report against the owner's profile and persists the
/// derived fields onto the lead.
pub async fn handle_score_project(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ScoreResponse>, AppError> {
    let project = load_project(&state.db, project_id).await?;
    let profile = require_profile(&state.db, project.user_id).await?;

    let report = compute_match(&project, &profile);
    persist_match_report(&state.db, project.id, &report, false).await?;

    Ok(Json(ScoreResponse {
        project_id: project.id,
        match_report: report,
    }))
}

/// POST /api/v1/projects/score-all
///
/// Re-scores every lead the user owns — the path taken after a profile
/// edit. Leads are independent of each other, so order is irrelevant;
/// results come back sorted by score for convenience.
pub async fn handle_score_all(
    State(state): State<AppState>,
    Json(request): Json<ScoreAllRequest>,
) -> Result<Json<ScoreAllResponse>, AppError> {
    let profile = require_profile(&state.db, request.user_id).await?;

    let projects = sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects WHERE user_id = $1")
        .bind(request.user_id)
        .fetch_all(&state.db)
        .await?;

    let mut results = Vec::with_capacity(projects.len());
    for project in &projects {
        let report = compute_match(project, &profile);
        persist_match_report(&state.db, project.id, &report, false).await?;
        results.push(ScoreResponse {
            project_id: project.id,
            match_report: report,
        });
    }
    results.sort_by(|a, b| b.match_report.score.cmp(&a.match_report.score));

    info!(
        "Re-scored {} projects for user {}",
        results.len(),
        request.user_id
    );

    Ok(Json(ScoreAllResponse {
        scored: results.len(),
        results,
    }))
}

/// POST /api/v1/projects/:id/analyze
///
/// Requirement analysis + achievement match for one lead, without
/// generating an email. Useful for previewing the pitch angle.
pub async fn handle_analyze_project(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let project = load_project(&state.db, project_id).await?;
    let profile = require_profile(&state.db, project.user_id).await?;
    Ok(Json(analyze_and_match(&project, &profile)))
}
