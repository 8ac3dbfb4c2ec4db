//! Lead (project) records.
//!
//! Rows are created by whatever ingestion feeds the store; the pipeline only
//! attaches derived fields (match score, reasons, priority, has_email).
//! Every optional field defaults to empty/zero when scored — a sparse lead
//! is scored low, never rejected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub budget: Option<f64>,
    pub currency: Option<String>,
    pub client_name: Option<String>,
    pub client_type: Option<String>,
    pub industry: Option<String>,
    pub contact_email: Option<String>,
    /// Annotation from the external contact-validation service, if it ran.
    /// The pipeline never requires it.
    pub contact_email_valid: Option<bool>,
    pub contact_url: Option<String>,
    pub platform_link: Option<String>,
    pub work_type: Option<String>,
    /// Source tag ("Upwork", "Dribbble", ...).
    pub platform: String,
    pub match_score: Option<i32>,
    pub match_reasons: Option<Vec<String>>,
    pub priority_score: Option<i32>,
    pub priority_label: Option<String>,
    pub has_email: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectRow {
    /// Lowercased title + description, the text every matching stage scans.
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }

    /// Industry field with the missing-field default applied.
    pub fn industry_text(&self) -> &str {
        self.industry.as_deref().unwrap_or("")
    }

    /// Client type with the missing-field default applied.
    pub fn client_type_text(&self) -> &str {
        self.client_type.as_deref().unwrap_or("")
    }

    /// Budget with the missing-field default applied.
    pub fn budget_value(&self) -> f64 {
        self.budget.unwrap_or(0.0)
    }
}

/// Request body for creating a lead. Everything beyond title/description/
/// platform is optional and defaults to absent.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectRequest {
    pub user_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub platform: String,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub client_type: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_email_valid: Option<bool>,
    #[serde(default)]
    pub contact_url: Option<String>,
    #[serde(default)]
    pub platform_link: Option<String>,
    #[serde(default)]
    pub work_type: Option<String>,
}


#[cfg(test)]
mod tests {
    use super::test_support::make_project;

    #[test]
    fn test_combined_text_is_lowercased() {
        let project = make_project("SaaS Dashboard", "Redesign for Enterprise");
        assert_eq!(project.combined_text(), "saas dashboard redesign for enterprise");
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let project = make_project("T", "D");
        assert_eq!(project.industry_text(), "");
        assert_eq!(project.client_type_text(), "");
        assert_eq!(project.budget_value(), 0.0);
    }
}
