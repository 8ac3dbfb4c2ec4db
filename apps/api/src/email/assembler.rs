//! Email Assembler — pluggable, trait-based assembly of outreach emails.
//!
//! Default: `TemplateAssembler` (pure-Rust, deterministic, fully testable).
//! Alternate: `LlmAssembler` (see llm_assembler.rs), swapped at startup via
//! config and carried in `AppState` as `Arc<dyn EmailAssembler>`.
//!
//! Invariants every implementation must hold:
//! - exactly 3 subject lines, never an unresolved placeholder token
//! - absent optional data renders as an omitted section, never "null"
//! - the full text joins non-empty sections with single blank lines

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::email::tone::{tone_for_client_type, EmailTone};
use crate::errors::AppError;
use crate::matching::achievements::AchievementMatch;
use crate::matching::analyzer::{PitchAngle, RequirementAnalysis};
use crate::models::profile::UserProfile;
use crate::models::project::ProjectRow;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// A fully assembled outreach email plus the metadata that gets persisted
/// alongside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailDraft {
    /// Always exactly 3 deterministic candidates.
    pub subject_lines: Vec<String>,
    pub opening: String,
    pub value_proposition: String,
    /// Empty string when the matched achievement has no benchmark.
    pub social_proof: String,
    pub call_to_action: String,
    pub signature: String,
    pub full_text: String,
    pub pitch_angle: String,
    pub matched_achievement: Option<String>,
    pub relevance_score: u32,
}

/// The assembler trait. Implement this to swap generation backends without
/// touching the pipeline, handlers, or persistence.
#[async_trait]
pub trait EmailAssembler: Send + Sync {
    async fn assemble(
        &self,
        project: &ProjectRow,
        profile: &UserProfile,
        analysis: &RequirementAnalysis,
        matched: &AchievementMatch,
    ) -> Result<EmailDraft, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// TemplateAssembler — the mandatory deterministic implementation
// ────────────────────────────────────────────────────────────────────────────

pub struct TemplateAssembler;

#[async_trait]
impl EmailAssembler for TemplateAssembler {
    async fn assemble(
        &self,
        project: &ProjectRow,
        profile: &UserProfile,
        analysis: &RequirementAnalysis,
        matched: &AchievementMatch,
    ) -> Result<EmailDraft, AppError> {
        Ok(build_template_draft(project, profile, analysis, matched))
    }
}

/// Placeholder token openers may carry; substituted with the lead title.
const TITLE_PLACEHOLDER: &str = "{project_title}";

const DEFAULT_CTA: &str = "I'd welcome the chance to discuss how my experience could \
contribute to your project. Happy to share portfolio pieces or schedule a brief call \
at your convenience.";

const EXCERPT_MAX_CHARS: usize = 160;
const SUBJECT_TITLE_MAX_CHARS: usize = 48;

/// Pure assembly of the full draft. Shared with the LLM path, which reuses
/// the signature and full-text rendering for its own section content.
pub fn build_template_draft(
    project: &ProjectRow,
    profile: &UserProfile,
    analysis: &RequirementAnalysis,
    matched: &AchievementMatch,
) -> EmailDraft {
    let subject_lines = render_subject_lines(project, profile, analysis);
    let opening = render_opening(project, profile, analysis);
    let value_proposition = render_value_proposition(profile, analysis, matched);
    let social_proof = render_social_proof(matched);
    let call_to_action = render_cta(project, profile);
    let signature = profile.signature_block();

    let full_text = render_full_text(
        &subject_lines,
        &opening,
        &value_proposition,
        &social_proof,
        &project.description,
        &call_to_action,
        &signature,
        &profile.contact_footer(),
    );

    EmailDraft {
        subject_lines,
        opening,
        value_proposition,
        social_proof,
        call_to_action,
        signature,
        full_text,
        pitch_angle: analysis.pitch_angle.as_str().to_string(),
        matched_achievement: matched.achievement.as_ref().map(|a| a.name.clone()),
        relevance_score: matched.score,
    }
}

/// Exactly 3 deterministic subject variants from role, title, and top need.
pub fn render_subject_lines(
    project: &ProjectRow,
    profile: &UserProfile,
    analysis: &RequirementAnalysis,
) -> Vec<String> {
    let title = truncate_chars(&project.title, SUBJECT_TITLE_MAX_CHARS);

    let second = match analysis.needs.first() {
        Some(need) => format!("{need} support for {title}"),
        None => format!("A flexible approach to {title}"),
    };

    vec![
        format!("{} for your {title}", profile.role),
        second,
        format!("Re: {title}"),
    ]
}

/// Opening selection: pitch-angle opener template when configured, generic
/// tone-calibrated opener otherwise. A template that leaves any brace behind
/// after substitution (an unknown token) is discarded in favor of the
/// generic opener, so unresolved placeholders can never reach the output.
fn render_opening(
    project: &ProjectRow,
    profile: &UserProfile,
    analysis: &RequirementAnalysis,
) -> String {
    if analysis.pitch_angle != PitchAngle::Default {
        let key = format!("{}_opener", analysis.pitch_angle.as_str());
        if let Some(template) = profile.email_templates.get(&key) {
            let rendered = template.replace(TITLE_PLACEHOLDER, &project.title);
            if !rendered.contains('{') && !rendered.contains('}') {
                return rendered;
            }
        }
    }
    generic_opening(project, profile)
}

fn generic_opening(project: &ProjectRow, profile: &UserProfile) -> String {
    let client = project.client_name.as_deref().unwrap_or("there");
    let title = &project.title;
    let platform = &project.platform;
    let years = profile.years_experience;
    let domain = if profile.domain.is_empty() {
        &profile.role
    } else {
        &profile.domain
    };

    match tone_for_client_type(project.client_type_text()) {
        EmailTone::Professional => format!(
            "Hi {client},\n\nI came across your {title} posting on {platform}. \
            With {years}+ years in {domain}, this is exactly the kind of work I focus on."
        ),
        EmailTone::Friendly => format!(
            "Hi {client},\n\nI saw your {title} posting on {platform} and loved what \
            you're building. I've spent {years}+ years in {domain} doing this kind of work."
        ),
        EmailTone::Adaptive => format!(
            "Hi {client},\n\nI noticed your {title} posting on {platform} and it lines \
            up closely with my background: {years}+ years in {domain}."
        ),
    }
}

/// Achievement-backed value proposition when the matcher hit, generic
/// top-expertise statement otherwise.
fn render_value_proposition(
    profile: &UserProfile,
    analysis: &RequirementAnalysis,
    matched: &AchievementMatch,
) -> String {
    if let (Some(achievement), true) = (&matched.achievement, matched.score > 0) {
        let base = format!("{}: {}.", achievement.name, achievement.result.trim_end_matches('.'));
        return match analysis.needs.first() {
            Some(need) => format!(
                "{base} That experience relates directly to your need for {}.",
                need.to_lowercase()
            ),
            None => base,
        };
    }

    let top: Vec<&str> = profile.core_expertise.iter().take(3).map(|s| s.as_str()).collect();
    if top.is_empty() {
        let domain = if profile.domain.is_empty() {
            &profile.role
        } else {
            &profile.domain
        };
        format!(
            "With {}+ years of hands-on {domain} experience, I can take this from \
            first concepts to a shipped product.",
            profile.years_experience
        )
    } else {
        format!(
            "My experience spans {}, exactly the foundation this project needs.",
            top.join(", ")
        )
    }
}

/// Populated only when the matched achievement carries a benchmark;
/// otherwise the empty string, which the full-text join simply omits.
fn render_social_proof(matched: &AchievementMatch) -> String {
    match &matched.achievement {
        Some(achievement) => match &achievement.benchmark {
            Some(benchmark) => format!(
                "{} was built as our answer to {benchmark}: {}.",
                achievement.name,
                achievement.result.trim_end_matches('.')
            ),
            None => String::new(),
        },
        None => String::new(),
    }
}

/// Work-preference keyed CTA: remote/project signals select the remote
/// template, everything else the full-time one; missing templates fall back
/// to the fixed generic CTA.
fn render_cta(project: &ProjectRow, profile: &UserProfile) -> String {
    const REMOTE_SIGNALS: &[&str] = &[
        "remote", "freelance", "part-time", "part time", "contract", "project",
    ];
    let work_type = project.work_type.as_deref().unwrap_or("").to_lowercase();
    let key = if REMOTE_SIGNALS.iter().any(|s| work_type.contains(s)) {
        "remote_cta"
    } else {
        "full_time_cta"
    };

    profile
        .email_templates
        .get(key)
        .cloned()
        .unwrap_or_else(|| DEFAULT_CTA.to_string())
}

/// Fixed section order, blank-line separators, empty sections skipped.
#[allow(clippy::too_many_arguments)]
pub fn render_full_text(
    subject_lines: &[String],
    opening: &str,
    value_proposition: &str,
    social_proof: &str,
    description: &str,
    call_to_action: &str,
    signature: &str,
    contact_footer: &str,
) -> String {
    let subject = subject_lines
        .first()
        .map(|s| format!("Subject: {s}"))
        .unwrap_or_default();

    let excerpt = if description.trim().is_empty() {
        String::new()
    } else {
        format!(
            "From your brief: \"{}\"",
            truncate_chars(description.trim(), EXCERPT_MAX_CHARS)
        )
    };

    [
        subject.as_str(),
        opening,
        value_proposition,
        social_proof,
        excerpt.as_str(),
        call_to_action,
        signature,
        contact_footer,
    ]
    .iter()
    .map(|s| s.trim())
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join("\n\n")
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max).collect();
        format!("{}...", head.trim_end())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::achievements::match_achievement;
    use crate::matching::analyzer::analyze;
    use crate::models::profile::{Achievement, MatchTiers};
    use crate::models::project::test_support::make_project;
    use std::collections::HashMap;

    fn make_profile() -> UserProfile {
        UserProfile {
            name: "Rong Huang".to_string(),
            role: "Senior UX Designer".to_string(),
            email: Some("rong@example.com".to_string()),
            website: Some("https://example.com".to_string()),
            years_experience: 10,
            domain: "enterprise UX design".to_string(),
            expertise_keywords: MatchTiers::default(),
            preferred_industries: MatchTiers::default(),
            preferred_client_types: MatchTiers::default(),
            highlight_projects: vec![
                Achievement {
                    name: "HUAWEI Analytics".to_string(),
                    result: "21,000+ apps integrated globally".to_string(),
                    benchmark: Some("Google Analytics".to_string()),
                    keywords: vec!["analytics".to_string(), "dashboard".to_string()],
                },
                Achievement {
                    name: "Matchbox App".to_string(),
                    result: "Top 7 on the App Store".to_string(),
                    benchmark: None,
                    keywords: vec!["mobile".to_string(), "consumer".to_string()],
                },
            ],
            core_expertise: vec![
                "B2B SaaS products".to_string(),
                "design systems".to_string(),
                "complex enterprise workflows".to_string(),
                "mobile apps".to_string(),
            ],
            email_templates: HashMap::new(),
            signature: None,
        }
    }

    fn draft_for(project: &ProjectRow, profile: &UserProfile) -> EmailDraft {
        let analysis = analyze(project, profile);
        let matched = match_achievement(&profile.highlight_projects, project);
        build_template_draft(project, profile, &analysis, &matched)
    }

    #[test]
    fn test_always_exactly_three_subject_lines() {
        let sparse = make_project("X", "");
        let rich = make_project("Analytics dashboard for b2b saas", "metrics reporting");
        assert_eq!(draft_for(&sparse, &make_profile()).subject_lines.len(), 3);
        assert_eq!(draft_for(&rich, &make_profile()).subject_lines.len(), 3);
    }

    #[test]
    fn test_opener_template_placeholder_is_substituted() {
        let mut profile = make_profile();
        profile.email_templates.insert(
            "analytics_opener".to_string(),
            "Hi there,\n\nYour {project_title} project is squarely in my wheelhouse."
                .to_string(),
        );
        let project = make_project("Acme Redesign", "analytics dashboard work");
        let draft = draft_for(&project, &profile);
        assert!(draft.opening.contains("Acme Redesign"));
        assert!(
            !draft.opening.contains('{') && !draft.opening.contains('}'),
            "Rendered opening must not contain brace characters: {}",
            draft.opening
        );
    }

    #[test]
    fn test_opener_template_with_unknown_token_falls_back() {
        let mut profile = make_profile();
        profile.email_templates.insert(
            "analytics_opener".to_string(),
            "Hi {client_name}, about {project_title}...".to_string(),
        );
        let project = make_project("Acme Redesign", "analytics dashboard work");
        let draft = draft_for(&project, &profile);
        // {client_name} is not a documented token — the generic opener wins.
        assert!(!draft.opening.contains('{') && !draft.opening.contains('}'));
        assert!(draft.opening.contains("Acme Redesign"));
    }

    #[test]
    fn test_default_angle_always_uses_generic_opener() {
        let mut profile = make_profile();
        profile
            .email_templates
            .insert("default_opener".to_string(), "Configured default".to_string());
        let project = make_project("Logo refresh", "print only");
        let draft = draft_for(&project, &profile);
        assert_eq!(draft.pitch_angle, "default");
        assert!(!draft.opening.contains("Configured default"));
        assert!(draft.opening.contains("Logo refresh"));
    }

    #[test]
    fn test_value_proposition_uses_matched_achievement() {
        let project = make_project("Analytics dashboard redesign", "complex metrics");
        let draft = draft_for(&project, &make_profile());
        assert_eq!(draft.matched_achievement.as_deref(), Some("HUAWEI Analytics"));
        assert!(draft.value_proposition.contains("HUAWEI Analytics"));
        assert!(draft.value_proposition.contains("21,000+ apps"));
        assert!(draft.relevance_score > 0);
    }

    #[test]
    fn test_value_proposition_generic_path_uses_top_three_expertise() {
        let project = make_project("Logo refresh", "print only");
        let draft = draft_for(&project, &make_profile());
        assert!(draft.matched_achievement.is_none());
        assert!(draft.value_proposition.contains("B2B SaaS products"));
        assert!(draft.value_proposition.contains("design systems"));
        // Only the top 3 feed the statement.
        assert!(!draft.value_proposition.contains("mobile apps"));
    }

    #[test]
    fn test_social_proof_requires_benchmark() {
        let with_benchmark = make_project("Analytics dashboard", "metrics");
        let draft = draft_for(&with_benchmark, &make_profile());
        assert!(draft.social_proof.contains("Google Analytics"));

        // Matchbox matches but carries no benchmark — section stays empty.
        let without = make_project("Mobile consumer app", "");
        let draft = draft_for(&without, &make_profile());
        assert_eq!(draft.matched_achievement.as_deref(), Some("Matchbox App"));
        assert_eq!(draft.social_proof, "");
        assert!(!draft.full_text.contains("null"));
    }

    #[test]
    fn test_cta_prefers_remote_template_for_contract_work() {
        let mut profile = make_profile();
        profile
            .email_templates
            .insert("remote_cta".to_string(), "Async email works best for me.".to_string());
        profile
            .email_templates
            .insert("full_time_cta".to_string(), "Happy to join your team.".to_string());

        let mut remote = make_project("X", "");
        remote.work_type = Some("Remote / Contract".to_string());
        assert_eq!(
            draft_for(&remote, &profile).call_to_action,
            "Async email works best for me."
        );

        let mut onsite = make_project("X", "");
        onsite.work_type = Some("Full-time on-site".to_string());
        assert_eq!(draft_for(&onsite, &profile).call_to_action, "Happy to join your team.");
    }

    #[test]
    fn test_cta_falls_back_to_generic_constant() {
        let project = make_project("X", "");
        let draft = draft_for(&project, &make_profile());
        assert_eq!(draft.call_to_action, DEFAULT_CTA);
    }

    #[test]
    fn test_full_text_has_no_stray_blank_lines_or_null_artifacts() {
        // Sparse lead: no description, no achievement benchmark, no templates.
        let project = make_project("Logo refresh", "");
        let draft = draft_for(&project, &make_profile());
        assert!(!draft.full_text.contains("\n\n\n"));
        assert!(!draft.full_text.contains("null"));
        assert!(!draft.full_text.contains("undefined"));
        assert!(!draft.full_text.contains('{') && !draft.full_text.contains('}'));
    }

    #[test]
    fn test_full_text_section_order() {
        let mut project = make_project("Analytics dashboard redesign", "complex metrics everywhere");
        project.client_name = Some("DataViz Solutions".to_string());
        let draft = draft_for(&project, &make_profile());

        let subject_pos = draft.full_text.find("Subject:").unwrap();
        let opening_pos = draft.full_text.find("DataViz Solutions").unwrap();
        let proof_pos = draft.full_text.find("Google Analytics").unwrap();
        let excerpt_pos = draft.full_text.find("From your brief").unwrap();
        let signature_pos = draft.full_text.find("Best regards").unwrap();

        assert!(subject_pos < opening_pos);
        assert!(opening_pos < proof_pos);
        assert!(proof_pos < excerpt_pos);
        assert!(excerpt_pos < signature_pos);
    }

    #[test]
    fn test_long_description_is_truncated_in_excerpt() {
        let long = "x".repeat(500);
        let project = make_project("Title", &long);
        let draft = draft_for(&project, &make_profile());
        assert!(draft.full_text.contains("..."));
        assert!(draft.full_text.len() < 2000);
    }

    #[test]
    fn test_subject_lines_never_carry_placeholders() {
        let project = make_project("Analytics dashboard", "b2b saas");
        let draft = draft_for(&project, &make_profile());
        for subject in &draft.subject_lines {
            assert!(!subject.contains('{') && !subject.contains('}'), "{subject}");
            assert!(!subject.is_empty());
        }
    }
}
