//! LLM-backed Email Assembler — same trait, same EmailDraft shape.
//!
//! The LLM writes the section texts; subject/signature/full-text invariants
//! are enforced locally. Any transport error, parse error, or shape
//! violation degrades to the deterministic TemplateAssembler — an AI
//! failure never fails the generation request.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::email::assembler::{
    build_template_draft, render_full_text, EmailAssembler, EmailDraft,
};
use crate::email::prompts::{EMAIL_PROMPT_TEMPLATE, EMAIL_SYSTEM_ROLE};
use crate::email::tone::{tone_for_client_type, EmailTone};
use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::LlmClient;
use crate::matching::achievements::AchievementMatch;
use crate::matching::analyzer::RequirementAnalysis;
use crate::models::profile::UserProfile;
use crate::models::project::ProjectRow;

/// Section set the LLM must return. Subject lines are validated to exactly 3.
#[derive(Debug, Deserialize)]
struct LlmEmailSections {
    subject_lines: Vec<String>,
    opening: String,
    value_proposition: String,
    #[serde(default)]
    social_proof: String,
    call_to_action: String,
}

pub struct LlmAssembler {
    llm: LlmClient,
}

impl LlmAssembler {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    async fn try_assemble(
        &self,
        project: &ProjectRow,
        profile: &UserProfile,
        analysis: &RequirementAnalysis,
        matched: &AchievementMatch,
    ) -> Result<EmailDraft, String> {
        let prompt = build_email_prompt(project, profile, analysis, matched)
            .map_err(|e| format!("prompt build failed: {e}"))?;

        let system = format!("{EMAIL_SYSTEM_ROLE} {JSON_ONLY_SYSTEM}");
        let sections: LlmEmailSections = self
            .llm
            .call_json(&prompt, &system)
            .await
            .map_err(|e| format!("LLM call failed: {e}"))?;

        validate_sections(&sections)?;

        let signature = profile.signature_block();
        let full_text = render_full_text(
            &sections.subject_lines,
            &sections.opening,
            &sections.value_proposition,
            &sections.social_proof,
            &project.description,
            &sections.call_to_action,
            &signature,
            &profile.contact_footer(),
        );

        Ok(EmailDraft {
            subject_lines: sections.subject_lines,
            opening: sections.opening,
            value_proposition: sections.value_proposition,
            social_proof: sections.social_proof,
            call_to_action: sections.call_to_action,
            signature,
            full_text,
            pitch_angle: analysis.pitch_angle.as_str().to_string(),
            matched_achievement: matched.achievement.as_ref().map(|a| a.name.clone()),
            relevance_score: matched.score,
        })
    }
}

#[async_trait]
impl EmailAssembler for LlmAssembler {
    async fn assemble(
        &self,
        project: &ProjectRow,
        profile: &UserProfile,
        analysis: &RequirementAnalysis,
        matched: &AchievementMatch,
    ) -> Result<EmailDraft, AppError> {
        match self.try_assemble(project, profile, analysis, matched).await {
            Ok(draft) => Ok(draft),
            Err(reason) => {
                warn!(
                    "LLM email generation failed for project {} ({reason}) — \
                    falling back to template assembler",
                    project.id
                );
                Ok(build_template_draft(project, profile, analysis, matched))
            }
        }
    }
}

fn build_email_prompt(
    project: &ProjectRow,
    profile: &UserProfile,
    analysis: &RequirementAnalysis,
    matched: &AchievementMatch,
) -> Result<String, serde_json::Error> {
    let sender_json = serde_json::to_string_pretty(&json!({
        "name": profile.name,
        "role": profile.role,
        "years_experience": profile.years_experience,
        "domain": profile.domain,
        "core_expertise": profile.core_expertise,
    }))?;

    let project_json = serde_json::to_string_pretty(&json!({
        "title": project.title,
        "description": project.description,
        "platform": project.platform,
        "client_name": project.client_name,
        "client_type": project.client_type,
        "industry": project.industry,
        "work_type": project.work_type,
    }))?;

    let analysis_json = serde_json::to_string_pretty(&json!({
        "pitch_angle": analysis.pitch_angle.as_str(),
        "needs": analysis.needs,
        "pain_points": analysis.pain_points,
    }))?;

    let achievement_json = serde_json::to_string_pretty(&matched.achievement)?;

    let tone = match tone_for_client_type(project.client_type_text()) {
        EmailTone::Professional => "professional and formal",
        EmailTone::Friendly => "friendly and warm",
        EmailTone::Adaptive => "professional and warm",
    };

    Ok(EMAIL_PROMPT_TEMPLATE
        .replace("{sender_json}", &sender_json)
        .replace("{project_json}", &project_json)
        .replace("{analysis_json}", &analysis_json)
        .replace("{achievement_json}", &achievement_json)
        .replace("{tone}", tone))
}

/// Shape checks mirrored from the template assembler's invariants.
fn validate_sections(sections: &LlmEmailSections) -> Result<(), String> {
    if sections.subject_lines.len() != 3 {
        return Err(format!(
            "expected exactly 3 subject lines, got {}",
            sections.subject_lines.len()
        ));
    }
    for field in [
        &sections.opening,
        &sections.value_proposition,
        &sections.call_to_action,
    ] {
        if field.trim().is_empty() {
            return Err("required section is empty".to_string());
        }
    }
    let all_text = format!(
        "{} {} {} {} {}",
        sections.subject_lines.join(" "),
        sections.opening,
        sections.value_proposition,
        sections.social_proof,
        sections.call_to_action
    );
    if all_text.contains('{') || all_text.contains('}') {
        return Err("output contains unresolved placeholder braces".to_string());
    }
    if all_text.contains("undefined") || all_text.split_whitespace().any(|w| w == "null") {
        return Err("output contains null/undefined artifacts".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections(subjects: usize) -> LlmEmailSections {
        LlmEmailSections {
            subject_lines: (0..subjects).map(|i| format!("Subject {i}")).collect(),
            opening: "Hi there, I saw your posting.".to_string(),
            value_proposition: "I have shipped similar work.".to_string(),
            social_proof: String::new(),
            call_to_action: "Let's talk.".to_string(),
        }
    }

    #[test]
    fn test_valid_sections_pass() {
        assert!(validate_sections(&sections(3)).is_ok());
    }

    #[test]
    fn test_wrong_subject_count_rejected() {
        assert!(validate_sections(&sections(2)).is_err());
        assert!(validate_sections(&sections(4)).is_err());
    }

    #[test]
    fn test_empty_required_section_rejected() {
        let mut s = sections(3);
        s.opening = "  ".to_string();
        assert!(validate_sections(&s).is_err());
    }

    #[test]
    fn test_placeholder_braces_rejected() {
        let mut s = sections(3);
        s.value_proposition = "Your {project_title} needs me.".to_string();
        assert!(validate_sections(&s).is_err());
    }

    #[test]
    fn test_null_artifact_rejected() {
        let mut s = sections(3);
        s.opening = "I noticed null in your posting.".to_string();
        assert!(validate_sections(&s).is_err());
    }

    #[test]
    fn test_social_proof_may_be_empty() {
        let s = sections(3);
        assert_eq!(s.social_proof, "");
        assert!(validate_sections(&s).is_ok());
    }

    #[test]
    fn test_sections_deserialize_without_social_proof() {
        let raw = r#"{
            "subject_lines": ["a", "b", "c"],
            "opening": "o",
            "value_proposition": "v",
            "call_to_action": "c"
        }"#;
        let s: LlmEmailSections = serde_json::from_str(raw).unwrap();
        assert_eq!(s.social_proof, "");
        assert!(validate_sections(&s).is_ok());
    }
}
