//! Email Generation — orchestrates the full pipeline for one lead.
//!
//! Flow: load project → load profile → compute match → analyze requirements
//!       + match achievement → assemble → persist.
//!
//! Persistence is append-only for emails: every generation INSERTs a new
//! generated_emails row, and the owning project gets its derived match
//! fields refreshed and `has_email` set.

use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::email::assembler::EmailAssembler;
use crate::errors::AppError;
use crate::matching::achievements::match_achievement;
use crate::matching::analyzer::analyze;
use crate::matching::scorer::{compute_match, MatchReport};
use crate::matching::store::{load_project, persist_match_report};
use crate::models::email::GeneratedEmailRow;
use crate::profile::require_profile;

/// Response from the generation pipeline: the persisted email plus the
/// match report computed on the way.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateEmailResponse {
    pub email: GeneratedEmailRow,
    pub match_report: MatchReport,
}

/// Runs the full pipeline for one lead and persists the results.
pub async fn generate_email(
    pool: &PgPool,
    assembler: &dyn EmailAssembler,
    project_id: Uuid,
) -> Result<GenerateEmailResponse, AppError> {
    let project = load_project(pool, project_id).await?;
    let profile = require_profile(pool, project.user_id).await?;

    // Step 1: match score (also refreshed on the project row below)
    let report = compute_match(&project, &profile);
    info!(
        "Match score {}/100 ({}) for project {}",
        report.score,
        report.priority_label.as_str(),
        project.id
    );

    // Step 2: requirement analysis + achievement match — independent of
    // each other, both feed the assembler
    let analysis = analyze(&project, &profile);
    let matched = match_achievement(&profile.highlight_projects, &project);
    info!(
        "Pitch angle {:?}, matched achievement {:?} for project {}",
        analysis.pitch_angle,
        matched.achievement.as_ref().map(|a| a.name.as_str()),
        project.id
    );

    // Step 3: assemble (LLM-backed assemblers degrade internally on failure)
    let draft = assembler
        .assemble(&project, &profile, &analysis, &matched)
        .await?;

    // Step 4: persist — append-only email row, derived fields on the lead
    let email = GeneratedEmailRow {
        id: Uuid::new_v4(),
        project_id: project.id,
        user_id: project.user_id,
        pitch_angle: draft.pitch_angle.clone(),
        matched_achievement: draft.matched_achievement.clone(),
        relevance_score: draft.relevance_score as i32,
        subject_lines: draft.subject_lines.clone(),
        opening: draft.opening.clone(),
        value_proposition: draft.value_proposition.clone(),
        social_proof: draft.social_proof.clone(),
        call_to_action: draft.call_to_action.clone(),
        signature: draft.signature.clone(),
        full_text: draft.full_text.clone(),
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO generated_emails
            (id, project_id, user_id, pitch_angle, matched_achievement, relevance_score,
             subject_lines, opening, value_proposition, social_proof, call_to_action,
             signature, full_text, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        "#,
    )
    .bind(email.id)
    .bind(email.project_id)
    .bind(email.user_id)
    .bind(&email.pitch_angle)
    .bind(&email.matched_achievement)
    .bind(email.relevance_score)
    .bind(&email.subject_lines)
    .bind(&email.opening)
    .bind(&email.value_proposition)
    .bind(&email.social_proof)
    .bind(&email.call_to_action)
    .bind(&email.signature)
    .bind(&email.full_text)
    .bind(email.created_at)
    .execute(pool)
    .await?;

    persist_match_report(pool, project.id, &report, true).await?;

    info!("Generated email {} for project {}", email.id, project.id);

    Ok(GenerateEmailResponse {
        email,
        match_report: report,
    })
}
