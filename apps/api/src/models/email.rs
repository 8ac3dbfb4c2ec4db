//! Generated-email records. Append-only: regenerating an email for a lead
//! inserts a new row rather than mutating the prior one, so the outreach
//! history for a lead is always complete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GeneratedEmailRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub pitch_angle: String,
    pub matched_achievement: Option<String>,
    pub relevance_score: i32,
    pub subject_lines: Vec<String>,
    pub opening: String,
    pub value_proposition: String,
    pub social_proof: String,
    pub call_to_action: String,
    pub signature: String,
    pub full_text: String,
    pub created_at: DateTime<Utc>,
}
