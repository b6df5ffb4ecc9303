//! Staleness scoring for a single repository.
//!
//! Indicators add up to a score; the score maps onto a category:
//!
//! | indicator                   | points |
//! |-----------------------------|--------|
//! | archived                    | 50     |
//! | fork                        | 10     |
//! | no push for over 3 years    | 40     |
//! | no push for over 2 years    | 30     |
//! | no push for over 1 year     | 20     |
//! | no push for over 180 days   | 10     |
//! | fewer than 10 stars         | 5      |

use crate::types::GitHubRepo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const VERY_STALE_THRESHOLD: u32 = 70;
pub const STALE_THRESHOLD: u32 = 50;
pub const POSSIBLY_STALE_THRESHOLD: u32 = 30;
pub const ERROR_SCORE: u32 = 100;
const LOW_ADOPTION_STARS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalenessCategory {
    VeryStale,
    Stale,
    PossiblyStale,
    Active,
    Error,
}

impl StalenessCategory {
    pub fn from_score(score: u32) -> Self {
        if score >= VERY_STALE_THRESHOLD {
            StalenessCategory::VeryStale
        } else if score >= STALE_THRESHOLD {
            StalenessCategory::Stale
        } else if score >= POSSIBLY_STALE_THRESHOLD {
            StalenessCategory::PossiblyStale
        } else {
            StalenessCategory::Active
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StalenessAssessment {
    pub score: u32,
    pub reasons: Vec<String>,
    pub category: StalenessCategory,
    pub is_stale: bool,
    pub last_push: Option<DateTime<Utc>>,
    pub stars: u32,
    pub archived: bool,
    pub fork: bool,
}

/// Scores `repo` as of `now`.
pub fn assess(repo: &GitHubRepo, now: DateTime<Utc>) -> StalenessAssessment {
    let mut score = 0;
    let mut reasons = Vec::new();

    if repo.archived {
        score += 50;
        reasons.push("Repository is archived".to_string());
    }

    if repo.fork {
        score += 10;
        reasons.push("Repository is a fork".to_string());
    }

    if let Some(pushed_at) = repo.pushed_at {
        let days = (now - pushed_at).num_days();
        if days > 365 * 3 {
            score += 40;
            reasons.push(format!("No commits in {} years", days / 365));
        } else if days > 365 * 2 {
            score += 30;
            reasons.push(format!("No commits in {} years", days / 365));
        } else if days > 365 {
            score += 20;
            reasons.push(format!("No commits in {} days", days));
        } else if days > 180 {
            score += 10;
            reasons.push(format!("No commits in {} days", days));
        }
    }

    if repo.stargazers_count < LOW_ADOPTION_STARS {
        score += 5;
        reasons.push(format!("Low adoption ({} stars)", repo.stargazers_count));
    }

    StalenessAssessment {
        score,
        reasons,
        category: StalenessCategory::from_score(score),
        is_stale: score >= STALE_THRESHOLD,
        last_push: repo.pushed_at,
        stars: repo.stargazers_count,
        archived: repo.archived,
        fork: repo.fork,
    }
}

/// Assessment for a repository whose metadata could not be fetched.
pub fn assess_failure(reason: impl Into<String>) -> StalenessAssessment {
    StalenessAssessment {
        score: ERROR_SCORE,
        reasons: vec![reason.into()],
        category: StalenessCategory::Error,
        is_stale: true,
        last_push: None,
        stars: 0,
        archived: false,
        fork: false,
    }
}
