//! Lead-store access shared by the scoring and email pipelines.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::scorer::MatchReport;
use crate::models::project::ProjectRow;

/// Fetches one lead or surfaces NotFound.
pub async fn load_project(pool: &PgPool, project_id: Uuid) -> Result<ProjectRow, AppError> {
    sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects WHERE id = $1")
        .bind(project_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {project_id} not found")))
}

/// Writes the derived match fields back onto the lead. `set_has_email`
/// additionally flips the generated-email flag (never clears it).
pub async fn persist_match_report(
    pool: &PgPool,
    project_id: Uuid,
    report: &MatchReport,
    set_has_email: bool,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE projects
        SET match_score = $2,
            match_reasons = $3,
            priority_score = $2,
            priority_label = $4,
            has_email = has_email OR $5,
            updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(project_id)
    .bind(report.score as i32)
    .bind(&report.reasons)
    .bind(report.priority_label.as_str())
    .bind(set_has_email)
    .execute(pool)
    .await?;
    Ok(())
}
