use crate::error::Result;
use crate::types::GitHubStarredRepo;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Section label for repositories without a detected primary language.
pub const OTHERS_LANGUAGE: &str = "Others";

/// One starred repository as it appears in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarredRepoEntry {
    /// `owner/name`
    pub name: String,
    pub url: String,
    /// Free text, possibly empty. Never contains line breaks.
    pub description: String,
}

impl StarredRepoEntry {
    pub fn new(name: impl Into<String>, url: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            description: normalize_description(&description.into()),
        }
    }

    pub fn from_starred(repo: &GitHubStarredRepo) -> Self {
        Self::new(
            repo.full_name.clone(),
            repo.html_url.clone(),
            repo.description.clone().unwrap_or_default(),
        )
    }
}

/// Folds line breaks into single spaces so an entry always renders as one bullet.
pub fn normalize_description(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Entries sharing a primary language, in snapshot order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSection {
    pub language: String,
    pub entries: Vec<StarredRepoEntry>,
}

impl LanguageSection {
    pub fn new(language: impl Into<String>) -> Self {
        Self { language: language.into(), entries: Vec::new() }
    }

    pub fn is_others(&self) -> bool {
        self.language == OTHERS_LANGUAGE
    }
}

/// Maps a repository's detected language onto its section label.
pub fn section_label(language: Option<&str>) -> String {
    match language.map(str::trim) {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => OTHERS_LANGUAGE.to_string(),
    }
}

/// Point-in-time copy of a user's starred repositories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarSnapshot {
    pub username: String,
    pub repositories: Vec<GitHubStarredRepo>,
}

impl StarSnapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json + "\n")?;
        Ok(())
    }
}

/// Rate limit state reported by the GitHub API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitState {
    pub remaining: u32,
    pub limit: u32,
    pub reset_time: chrono::DateTime<chrono::Utc>,
    pub is_limited: bool,
}

impl Default for RateLimitState {
    fn default() -> Self {
        Self {
            remaining: 60,
            limit: 60,
            reset_time: chrono::Utc::now() + chrono::Duration::hours(1),
            is_limited: false,
        }
    }
}
