#![allow(dead_code)]

use awesome_stars::document::{AWESOME_BADGE_IMAGE, AWESOME_URL, CC0_BADGE_IMAGE, CC0_URL};
use awesome_stars::error::{AwesomeStarsError, Result};
use awesome_stars::github::RepoSource;
use awesome_stars::models::StarSnapshot;
use awesome_stars::types::{GitHubRepo, GitHubStarredRepo};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

pub fn starred(full_name: &str, language: Option<&str>, description: Option<&str>) -> GitHubStarredRepo {
    GitHubStarredRepo {
        full_name: full_name.to_string(),
        html_url: format!("https://github.com/{}", full_name),
        description: description.map(str::to_string),
        language: language.map(str::to_string),
    }
}

/// Five stars over four sections, including a `C`/`C++` anchor collision.
pub fn sample_snapshot() -> StarSnapshot {
    StarSnapshot {
        username: "octocat".to_string(),
        repositories: vec![
            starred(
                "rust-lang/rust",
                Some("Rust"),
                Some("Empowering everyone to build reliable and efficient software."),
            ),
            starred("torvalds/linux", Some("C"), Some("Linux kernel source tree")),
            starred(
                "sindresorhus/awesome",
                None,
                Some("😎 Awesome lists about all kinds of interesting topics"),
            ),
            starred("nlohmann/json", Some("C++"), Some("JSON for Modern C++")),
            starred("BurntSushi/ripgrep", Some("Rust"), None),
        ],
    }
}

/// The document `sample_snapshot` renders to with default options.
pub fn sample_document() -> String {
    [
        format!("# Awesome Stars [![Awesome]({})]({})", AWESOME_BADGE_IMAGE, AWESOME_URL),
        String::new(),
        "> A curated list of my GitHub stars!".to_string(),
        String::new(),
        "## Contents".to_string(),
        String::new(),
        "- [Rust](#rust)".to_string(),
        "- [C](#c)".to_string(),
        "- [C++](#c-1)".to_string(),
        "- [Others](#others)".to_string(),
        String::new(),
        "## Rust".to_string(),
        String::new(),
        "- [rust-lang/rust](https://github.com/rust-lang/rust) - Empowering everyone to build reliable and efficient software.".to_string(),
        "- [BurntSushi/ripgrep](https://github.com/BurntSushi/ripgrep)".to_string(),
        String::new(),
        "## C".to_string(),
        String::new(),
        "- [torvalds/linux](https://github.com/torvalds/linux) - Linux kernel source tree".to_string(),
        String::new(),
        "## C++".to_string(),
        String::new(),
        "- [nlohmann/json](https://github.com/nlohmann/json) - JSON for Modern C++".to_string(),
        String::new(),
        "## Others".to_string(),
        String::new(),
        "- [sindresorhus/awesome](https://github.com/sindresorhus/awesome) - 😎 Awesome lists about all kinds of interesting topics".to_string(),
        String::new(),
        "## License".to_string(),
        String::new(),
        format!("[![CC0]({})]({})", CC0_BADGE_IMAGE, CC0_URL),
        String::new(),
        "To the extent possible under law, [octocat](https://github.com/octocat) has waived all copyright and related or neighboring rights to this work.".to_string(),
    ]
    .join("\n")
        + "\n"
}

/// Repository metadata pushed `days_since_push` days ago.
pub fn repo_info(full_name: &str, stars: u32, days_since_push: i64) -> GitHubRepo {
    let name = full_name.split('/').nth(1).unwrap_or(full_name);
    GitHubRepo {
        name: name.to_string(),
        full_name: full_name.to_string(),
        html_url: format!("https://github.com/{}", full_name),
        description: Some(format!("{} description", name)),
        language: Some("Rust".to_string()),
        stargazers_count: stars,
        archived: false,
        fork: false,
        pushed_at: Some(Utc::now() - Duration::days(days_since_push)),
        created_at: Some(Utc::now() - Duration::days(3000)),
    }
}

pub fn fixed_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

/// In-memory stand-in for the GitHub API.
///
/// `gone/*` is missing, `limited/*` hits the rate limit and `broken/*` fails.
#[derive(Default)]
pub struct MockSource {
    pub repos: HashMap<String, GitHubRepo>,
    pub calls: Mutex<Vec<String>>,
}

impl MockSource {
    pub fn with(repos: Vec<GitHubRepo>) -> Self {
        Self {
            repos: repos.into_iter().map(|r| (r.full_name.clone(), r)).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl RepoSource for MockSource {
    async fn repo_info(&self, full_name: &str) -> Result<GitHubRepo> {
        self.calls.lock().unwrap().push(full_name.to_string());
        if full_name.starts_with("limited/") {
            return Err(AwesomeStarsError::RateLimitExceeded("reset in 1 hour".to_string()));
        }
        if full_name.starts_with("broken/") {
            return Err(AwesomeStarsError::ApiError("Forbidden: blocked".to_string()));
        }
        self.repos
            .get(full_name)
            .cloned()
            .ok_or_else(|| AwesomeStarsError::NotFound(format!("Resource not found: {}", full_name)))
    }
}
