//! Profile store — fetch and upsert of the per-user profile document.
//! One row per user; the pipeline reads it, only the upsert endpoint
//! writes it.

pub mod handlers;

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{ProfileRow, UserProfile};

/// Fetches the raw profile row for a user, if one exists.
pub async fn get_profile_row(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<ProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Loads and parses the profile, surfacing the missing-profile case as a
/// NotFound — fatal to the calling operation, never defaulted.
pub async fn require_profile(pool: &PgPool, user_id: Uuid) -> Result<UserProfile, AppError> {
    let row = get_profile_row(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No profile found for user {user_id}")))?;
    row.profile()
}

/// Validates a profile document before it is stored.
/// Matching invariant: every keyword in every tier is a non-empty string.
pub fn validate_profile(profile: &UserProfile) -> Result<(), String> {
    if profile.name.trim().is_empty() {
        return Err("name must not be empty".to_string());
    }
    if profile.role.trim().is_empty() {
        return Err("role must not be empty".to_string());
    }

    let tiers = [
        ("expertise_keywords", &profile.expertise_keywords),
        ("preferred_industries", &profile.preferred_industries),
        ("preferred_client_types", &profile.preferred_client_types),
    ];
    for (field, tier) in tiers {
        if tier.high.iter().chain(tier.medium.iter()).any(|k| k.trim().is_empty()) {
            return Err(format!("{field} must not contain empty entries"));
        }
    }

    for achievement in &profile.highlight_projects {
        if achievement.name.trim().is_empty() || achievement.result.trim().is_empty() {
            return Err("highlight projects need a name and a result".to_string());
        }
        if achievement.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err("achievement keywords must not contain empty entries".to_string());
        }
    }

    Ok(())
}

/// Inserts or replaces the profile document for a user.
pub async fn upsert_profile(
    pool: &PgPool,
    user_id: Uuid,
    profile: &UserProfile,
) -> Result<ProfileRow, AppError> {
    let data = serde_json::to_value(profile)
        .map_err(|e| AppError::Validation(format!("Profile not serializable: {e}")))?;

    let row = sqlx::query_as::<_, ProfileRow>(
        r#"
        INSERT INTO profiles (id, user_id, data, created_at, updated_at)
        VALUES ($1, $2, $3, now(), now())
        ON CONFLICT (user_id)
        DO UPDATE SET data = EXCLUDED.data, updated_at = now()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&data)
    .fetch_one(pool)
    .await?;

    Ok(row)
}
