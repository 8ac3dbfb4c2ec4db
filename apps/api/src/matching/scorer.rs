//! Match Scorer — weighted additive 0–100 score of a lead against the profile.
//!
//! Fast, deterministic, no I/O. Missing optional fields contribute zero and
//! never error. The raw match score doubles as the priority score; banding is
//! A ≥ 70, B ≥ 50, C ≥ 30, D otherwise — one scale used everywhere.

use serde::{Deserialize, Serialize};

use crate::models::profile::UserProfile;
use crate::models::project::ProjectRow;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Ordinal attractiveness tier derived from the match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityLabel {
    A,
    B,
    C,
    D,
}

impl PriorityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityLabel::A => "A",
            PriorityLabel::B => "B",
            PriorityLabel::C => "C",
            PriorityLabel::D => "D",
        }
    }
}

/// Full scoring result returned to callers and persisted onto the lead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub score: u32, // 0 – 100
    /// Ordered, human-readable rule hits ("Expertise keyword: dashboard").
    pub reasons: Vec<String>,
    pub priority_label: PriorityLabel,
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring weights
// ────────────────────────────────────────────────────────────────────────────

const HIGH_KEYWORD_POINTS: u32 = 10;
const MEDIUM_KEYWORD_POINTS: u32 = 5;
const HIGH_INDUSTRY_POINTS: u32 = 30;
const MEDIUM_INDUSTRY_POINTS: u32 = 15;
const HIGH_CLIENT_POINTS: u32 = 20;
const MEDIUM_CLIENT_POINTS: u32 = 10;
const BUDGET_UPPER_POINTS: u32 = 10;
const BUDGET_LOWER_POINTS: u32 = 5;
const BUDGET_UPPER_THRESHOLD: f64 = 2000.0;
const BUDGET_LOWER_THRESHOLD: f64 = 1000.0;
const MAX_SCORE: u32 = 100;

// ────────────────────────────────────────────────────────────────────────────
// Core scoring algorithm
// ────────────────────────────────────────────────────────────────────────────

/// Computes the match score, reasons, and priority label for one lead.
///
/// Signals:
/// 1. Expertise keywords — +10 per high-tier hit, +5 per medium-tier hit
///    (a keyword already counted in the high tier is skipped in the medium)
/// 2. Industry — first high-priority substring match +30, else medium +15
/// 3. Client type — exact membership: high +20, medium +10
/// 4. Budget — ≥ 2000 adds +10, ≥ 1000 adds +5
///
/// Accumulation is unbounded, then clamped to 100.
pub fn compute_match(project: &ProjectRow, profile: &UserProfile) -> MatchReport {
    let text = project.combined_text();
    let mut score: u32 = 0;
    let mut reasons: Vec<String> = Vec::new();
    let mut matched_keywords: Vec<String> = Vec::new();

    // 1. Expertise keywords
    for keyword in &profile.expertise_keywords.high {
        let kw = keyword.trim().to_lowercase();
        if !kw.is_empty() && text.contains(&kw) {
            score += HIGH_KEYWORD_POINTS;
            reasons.push(format!("Expertise keyword: {keyword}"));
            matched_keywords.push(kw);
        }
    }
    for keyword in &profile.expertise_keywords.medium {
        let kw = keyword.trim().to_lowercase();
        if kw.is_empty() || matched_keywords.contains(&kw) {
            continue; // first match wins per keyword
        }
        if text.contains(&kw) {
            score += MEDIUM_KEYWORD_POINTS;
            reasons.push(format!("Related keyword: {keyword}"));
            matched_keywords.push(kw);
        }
    }

    // 2. Industry — one block at most
    let industry = project.industry_text().to_lowercase();
    if !industry.is_empty() {
        if let Some(hit) = first_substring_match(&profile.preferred_industries.high, &industry) {
            score += HIGH_INDUSTRY_POINTS;
            reasons.push(format!("Preferred industry: {hit}"));
        } else if let Some(hit) =
            first_substring_match(&profile.preferred_industries.medium, &industry)
        {
            score += MEDIUM_INDUSTRY_POINTS;
            reasons.push(format!("Related industry: {hit}"));
        }
    }

    // 3. Client type — exact case-insensitive membership
    let client_type = project.client_type_text();
    if !client_type.is_empty() {
        if contains_ignore_case(&profile.preferred_client_types.high, client_type) {
            score += HIGH_CLIENT_POINTS;
            reasons.push(format!("Preferred client type: {client_type}"));
        } else if contains_ignore_case(&profile.preferred_client_types.medium, client_type) {
            score += MEDIUM_CLIENT_POINTS;
            reasons.push(format!("Acceptable client type: {client_type}"));
        }
    }

    // 4. Budget thresholds
    let budget = project.budget_value();
    if budget >= BUDGET_UPPER_THRESHOLD {
        score += BUDGET_UPPER_POINTS;
        reasons.push(format!("Budget fit: {budget:.0}"));
    } else if budget >= BUDGET_LOWER_THRESHOLD {
        score += BUDGET_LOWER_POINTS;
        reasons.push(format!("Workable budget: {budget:.0}"));
    }

    let score = score.min(MAX_SCORE);

    MatchReport {
        score,
        reasons,
        priority_label: priority_label_for(score),
    }
}

/// Bands the 0–100 score into the four priority tiers.
pub fn priority_label_for(score: u32) -> PriorityLabel {
    if score >= 70 {
        PriorityLabel::A
    } else if score >= 50 {
        PriorityLabel::B
    } else if score >= 30 {
        PriorityLabel::C
    } else {
        PriorityLabel::D
    }
}

fn first_substring_match<'a>(candidates: &'a [String], haystack: &str) -> Option<&'a str> {
    candidates
        .iter()
        .find(|c| !c.trim().is_empty() && haystack.contains(&c.trim().to_lowercase()))
        .map(|c| c.as_str())
}

fn contains_ignore_case(candidates: &[String], value: &str) -> bool {
    candidates.iter().any(|c| c.eq_ignore_ascii_case(value))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
