//! User profile — the static reference every pipeline stage scores against.
//!
//! Stored as a single JSONB document per user (`profiles.data`) and parsed
//! into the typed `UserProfile` before any scoring runs. The pipeline never
//! mutates a profile; edits arrive through the profile upsert endpoint.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRow {
    /// Parses the JSONB document into the typed profile.
    pub fn profile(&self) -> Result<UserProfile, AppError> {
        serde_json::from_value(self.data.clone())
            .map_err(|e| AppError::Validation(format!("Stored profile is malformed: {e}")))
    }
}

/// Two-tier keyword/preference bucket. Matching is case-insensitive;
/// tier membership decides the scoring weight, not the match itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchTiers {
    #[serde(default)]
    pub high: Vec<String>,
    #[serde(default)]
    pub medium: Vec<String>,
}

/// A reusable proof point: a named past project, its quantified result,
/// and the keywords that make it relevant to a lead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub name: String,
    pub result: String,
    /// Well-known product this work is comparable to ("Google Analytics").
    /// Only achievements with a benchmark produce a social-proof section.
    #[serde(default)]
    pub benchmark: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// The full profile document.
///
/// `email_templates` holds optional named fragments keyed by pitch angle or
/// work preference: `"<angle>_opener"` entries may carry the documented
/// `{project_title}` placeholder; `"remote_cta"` / `"full_time_cta"` select
/// the call to action. Every lookup has a deterministic fallback, so a
/// profile with no templates at all still assembles a complete email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub years_experience: u32,
    /// Short domain phrase used by the generic opener ("enterprise UX design").
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub expertise_keywords: MatchTiers,
    #[serde(default)]
    pub preferred_industries: MatchTiers,
    #[serde(default)]
    pub preferred_client_types: MatchTiers,
    /// Ordered by the user; order is the tie-break in achievement matching.
    #[serde(default)]
    pub highlight_projects: Vec<Achievement>,
    /// Top entries feed the generic value proposition when no achievement hits.
    #[serde(default)]
    pub core_expertise: Vec<String>,
    #[serde(default)]
    pub email_templates: HashMap<String, String>,
    #[serde(default)]
    pub signature: Option<String>,
}

impl UserProfile {
    /// Signature block: the configured one, or a deterministic default
    /// built from identity fields.
    pub fn signature_block(&self) -> String {
        if let Some(sig) = &self.signature {
            return sig.clone();
        }
        let mut lines = vec!["Best regards,".to_string(), self.name.clone(), self.role.clone()];
        if let Some(website) = &self.website {
            lines.push(format!("Portfolio: {website}"));
        }
        if let Some(email) = &self.email {
            lines.push(format!("Email: {email}"));
        }
        lines.join("\n")
    }

    /// Contact footer appended after the signature in the full render.
    /// Empty when the profile carries no contact fields.
    pub fn contact_footer(&self) -> String {
        let mut parts = Vec::new();
        if let Some(email) = &self.email {
            parts.push(email.clone());
        }
        if let Some(website) = &self.website {
            parts.push(website.clone());
        }
        parts.join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_deserializes_from_minimal_document() {
        let doc = json!({
            "name": "Rong Huang",
            "role": "Senior UX Designer"
        });
        let profile: UserProfile = serde_json::from_value(doc).unwrap();
        assert_eq!(profile.name, "Rong Huang");
        assert!(profile.expertise_keywords.high.is_empty());
        assert!(profile.highlight_projects.is_empty());
        assert!(profile.email_templates.is_empty());
    }

    #[test]
    fn test_achievement_benchmark_is_optional() {
        let doc = json!({
            "name": "Matchbox App",
            "result": "Top 7 on the App Store",
            "keywords": ["mobile", "consumer"]
        });
        let achievement: Achievement = serde_json::from_value(doc).unwrap();
        assert!(achievement.benchmark.is_none());
        assert_eq!(achievement.keywords.len(), 2);
    }

    #[test]
    fn test_default_signature_includes_contact_fields() {
        let profile = UserProfile {
            name: "Rong Huang".to_string(),
            role: "Senior UX Designer".to_string(),
            email: Some("rong@example.com".to_string()),
            website: Some("https://example.com".to_string()),
            years_experience: 10,
            domain: String::new(),
            expertise_keywords: MatchTiers::default(),
            preferred_industries: MatchTiers::default(),
            preferred_client_types: MatchTiers::default(),
            highlight_projects: vec![],
            core_expertise: vec![],
            email_templates: HashMap::new(),
            signature: None,
        };
        let sig = profile.signature_block();
        assert!(sig.contains("Rong Huang"));
        assert!(sig.contains("https://example.com"));
        assert_eq!(profile.contact_footer(), "rong@example.com | https://example.com");
    }

    #[test]
    fn test_configured_signature_wins_over_default() {
        let profile = UserProfile {
            name: "X".to_string(),
            role: "Y".to_string(),
            email: None,
            website: None,
            years_experience: 0,
            domain: String::new(),
            expertise_keywords: MatchTiers::default(),
            preferred_industries: MatchTiers::default(),
            preferred_client_types: MatchTiers::default(),
            highlight_projects: vec![],
            core_expertise: vec![],
            email_templates: HashMap::new(),
            signature: Some("Cheers,\nX".to_string()),
        };
        assert_eq!(profile.signature_block(), "Cheers,\nX");
    }
}
