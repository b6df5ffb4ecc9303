use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// GitHub API response structures

/// `GET /repos/{owner}/{repo}`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubRepo {
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// One element of `GET /users/{user}/starred`, reduced to what the list needs.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GitHubStarredRepo {
    pub full_name: String,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}
