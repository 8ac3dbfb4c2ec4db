//! Requirement Analyzer — scans lead text for need/pain-point signals and
//! derives the pitch angle that frames the outreach email.
//!
//! The rule table is evaluated in a FIXED order and every matching rule
//! overwrites the pitch angle, so the LAST matching rule in table order
//! decides the final angle. That last-match-wins overwrite is a locked
//! contract (see the dashboard+b2b test below) — do not replace it with
//! first-match or highest-score selection.

use serde::{Deserialize, Serialize};

use crate::models::profile::UserProfile;
use crate::models::project::ProjectRow;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Narrative frame for an outreach email.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchAngle {
    Analytics,
    B2bSaas,
    Merchant,
    Mobile,
    DesignSystem,
    #[default]
    Default,
}

impl PitchAngle {
    /// Stable key used for template lookups and persisted records.
    pub fn as_str(&self) -> &'static str {
        match self {
            PitchAngle::Analytics => "analytics",
            PitchAngle::B2bSaas => "b2b_saas",
            PitchAngle::Merchant => "merchant",
            PitchAngle::Mobile => "mobile",
            PitchAngle::DesignSystem => "design_system",
            PitchAngle::Default => "default",
        }
    }
}

/// Output of the analyzer. An all-empty result with angle `default` and
/// score 0 is the normal no-signal path, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementAnalysis {
    pub pitch_angle: PitchAngle,
    pub score: u32,
    pub needs: Vec<String>,
    pub pain_points: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Rule table — order is load-bearing
// ────────────────────────────────────────────────────────────────────────────

struct AngleRule {
    triggers: &'static [&'static str],
    needs: &'static [&'static str],
    pain_points: &'static [&'static str],
    angle: PitchAngle,
    increment: u32,
}

const ANGLE_RULES: &[AngleRule] = &[
    AngleRule {
        triggers: &["analytics", "dashboard", "data visualization", "metrics", "reporting"],
        needs: &["Data visualization", "Dashboard design"],
        pain_points: &["Making complex data understandable"],
        angle: PitchAngle::Analytics,
        increment: 20,
    },
    AngleRule {
        triggers: &["b2b", "saas", "enterprise"],
        needs: &["Enterprise workflows", "B2B product design"],
        pain_points: &["Complex workflow simplification", "Scaling design across teams"],
        angle: PitchAngle::B2bSaas,
        increment: 15,
    },
    AngleRule {
        triggers: &["merchant", "commerce", "e-commerce", "ecommerce", "store", "checkout"],
        needs: &["Merchant-facing flows", "Conversion-focused design"],
        pain_points: &["Checkout drop-off", "Conversion optimization"],
        angle: PitchAngle::Merchant,
        increment: 15,
    },
    AngleRule {
        triggers: &["mobile", "ios", "android", "app design"],
        needs: &["Mobile interface design"],
        pain_points: &["Small-screen information density"],
        angle: PitchAngle::Mobile,
        increment: 10,
    },
    AngleRule {
        triggers: &["design system", "component library", "ui kit", "style guide"],
        needs: &["Design system development"],
        pain_points: &["Maintaining design consistency"],
        angle: PitchAngle::DesignSystem,
        increment: 10,
    },
];

/// Flat bonus when the lead's industry is one the profile prioritizes.
const INDUSTRY_BONUS: u32 = 10;

// ────────────────────────────────────────────────────────────────────────────
// Analysis
// ────────────────────────────────────────────────────────────────────────────

/// Scans the lead's combined text against the rule table in order.
/// Each matching rule appends its needs/pain points (deduplicated), adds its
/// increment, and overwrites the pitch angle. The industry bonus is applied
/// after the rule pass, independent of rule hits.
pub fn analyze(project: &ProjectRow, profile: &UserProfile) -> RequirementAnalysis {
    let text = project.combined_text();

    let mut analysis = RequirementAnalysis {
        pitch_angle: PitchAngle::Default,
        score: 0,
        needs: Vec::new(),
        pain_points: Vec::new(),
    };

    for rule in ANGLE_RULES {
        if !rule.triggers.iter().any(|t| text.contains(t)) {
            continue;
        }
        for need in rule.needs {
            push_unique(&mut analysis.needs, need);
        }
        for pain in rule.pain_points {
            push_unique(&mut analysis.pain_points, pain);
        }
        analysis.score += rule.increment;
        analysis.pitch_angle = rule.angle; // last matching rule wins
    }

    let industry = project.industry_text().to_lowercase();
    if !industry.is_empty()
        && profile
            .preferred_industries
            .high
            .iter()
            .any(|i| !i.trim().is_empty() && industry.contains(&i.trim().to_lowercase()))
    {
        analysis.score += INDUSTRY_BONUS;
    }

    analysis
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::MatchTiers;
    use crate::models::project::test_support::make_project;

    fn make_profile() -> UserProfile {
        UserProfile {
            name: "Rong Huang".to_string(),
            role: "Senior UX Designer".to_string(),
            email: None,
            website: None,
            years_experience: 10,
            domain: "enterprise UX design".to_string(),
            expertise_keywords: MatchTiers::default(),
            preferred_industries: MatchTiers {
                high: vec!["SaaS".to_string()],
                medium: vec![],
            },
            preferred_client_types: MatchTiers::default(),
            highlight_projects: vec![],
            core_expertise: vec![],
            email_templates: Default::default(),
            signature: None,
        }
    }

    #[test]
    fn test_no_signal_yields_default_path() {
        let project = make_project("Logo refresh", "print only");
        let analysis = analyze(&project, &make_profile());
        assert_eq!(analysis.pitch_angle, PitchAngle::Default);
        assert_eq!(analysis.score, 0);
        assert!(analysis.needs.is_empty());
        assert!(analysis.pain_points.is_empty());
    }

    #[test]
    fn test_analytics_rule_matches_dashboard_text() {
        let project = make_project("Dashboard redesign", "complex metrics views");
        let analysis = analyze(&project, &make_profile());
        assert_eq!(analysis.pitch_angle, PitchAngle::Analytics);
        assert_eq!(analysis.score, 20);
        assert!(analysis.needs.contains(&"Dashboard design".to_string()));
        assert!(analysis
            .pain_points
            .contains(&"Making complex data understandable".to_string()));
    }

    /// Locks the last-match-wins overwrite: text hitting both the analytics
    /// rule and the b2b rule must resolve to b2b_saas, because that rule
    /// comes later in the fixed evaluation order.
    #[test]
    fn test_pitch_angle_last_matching_rule_wins() {
        let project = make_project("Dashboard for b2b platform", "");
        let analysis = analyze(&project, &make_profile());
        assert_eq!(
            analysis.pitch_angle,
            PitchAngle::B2bSaas,
            "b2b rule is evaluated after analytics and must overwrite the angle"
        );
        // Both rules still contribute needs and score.
        assert_eq!(analysis.score, 20 + 15);
        assert!(analysis.needs.contains(&"Dashboard design".to_string()));
        assert!(analysis.needs.contains(&"B2B product design".to_string()));
    }

    #[test]
    fn test_design_system_overwrites_everything_before_it() {
        let project = make_project(
            "Analytics dashboard for b2b merchant mobile app",
            "needs a design system",
        );
        let analysis = analyze(&project, &make_profile());
        assert_eq!(analysis.pitch_angle, PitchAngle::DesignSystem);
        assert_eq!(analysis.score, 20 + 15 + 15 + 10 + 10);
    }

    #[test]
    fn test_industry_bonus_applies_on_preferred_industry() {
        let mut project = make_project("Dashboard redesign", "");
        project.industry = Some("SaaS".to_string());
        let analysis = analyze(&project, &make_profile());
        assert_eq!(analysis.score, 20 + 10);
    }

    #[test]
    fn test_needs_are_deduplicated_across_rules() {
        let project = make_project("dashboard dashboard analytics", "metrics reporting");
        let analysis = analyze(&project, &make_profile());
        let dashboard_entries = analysis
            .needs
            .iter()
            .filter(|n| *n == "Dashboard design")
            .count();
        assert_eq!(dashboard_entries, 1);
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let project = make_project("b2b saas dashboard", "mobile checkout");
        let profile = make_profile();
        let a = analyze(&project, &profile);
        let b = analyze(&project, &profile);
        assert_eq!(a.pitch_angle, b.pitch_angle);
        assert_eq!(a.score, b.score);
        assert_eq!(a.needs, b.needs);
    }

    #[test]
    fn test_pitch_angle_keys_are_stable() {
        assert_eq!(PitchAngle::Analytics.as_str(), "analytics");
        assert_eq!(PitchAngle::B2bSaas.as_str(), "b2b_saas");
        assert_eq!(PitchAngle::Default.as_str(), "default");
    }
}
