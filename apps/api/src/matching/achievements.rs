//! Achievement Matcher — picks the single profile highlight whose keyword
//! set best overlaps the lead text.
//!
//! Stable on ties: the achievement listed earlier in the profile wins.
//! No keyword hits at all returns `None` with score 0 — the email assembler
//! handles that through its generic value-proposition path.

use serde::{Deserialize, Serialize};

use crate::models::profile::Achievement;
use crate::models::project::ProjectRow;

/// Points per keyword found in the lead text.
const POINTS_PER_KEYWORD: u32 = 10;

/// Result of matching the profile's achievements against one lead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementMatch {
    pub achievement: Option<Achievement>,
    pub score: u32,
}

impl AchievementMatch {
    pub fn none() -> Self {
        Self {
            achievement: None,
            score: 0,
        }
    }
}

/// Scores each achievement as 10 × its keyword hits (case-insensitive
/// substring of title+description) and returns the strictly best one.
pub fn match_achievement(achievements: &[Achievement], project: &ProjectRow) -> AchievementMatch {
    let text = project.combined_text();

    let mut best: Option<&Achievement> = None;
    let mut best_score: u32 = 0;

    for achievement in achievements {
        let hits = achievement
            .keywords
            .iter()
            .filter(|kw| {
                let kw = kw.trim().to_lowercase();
                !kw.is_empty() && text.contains(&kw)
            })
            .count() as u32;
        let score = hits * POINTS_PER_KEYWORD;

        // Strictly greater — equal scores keep the first-seen achievement.
        if score > best_score {
            best_score = score;
            best = Some(achievement);
        }
    }

    match best {
        Some(achievement) if best_score > 0 => AchievementMatch {
            achievement: Some(achievement.clone()),
            score: best_score,
        },
        _ => AchievementMatch::none(),
    }
}
