//! Reading an existing awesome-stars README back into its data model.

use crate::document::{AwesomeDocument, CONTENTS_HEADING, LICENSE_HEADING};
use crate::error::{AwesomeStarsError, Result};
use crate::models::{LanguageSection, StarredRepoEntry};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::debug;

fn github_repo_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"https://github\.com/([^/\s\)]+)/([^/\s\)]+)").expect("static pattern")
    })
}

fn title_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<title>.*?)\s*\[!\[[^\]]*\]\([^)]*\)\]\([^)]*\)$").expect("static pattern")
    })
}

fn entry_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[-*] \[(?P<name>[^\]]*)\]\((?P<url>[^)\s]*)\)(?: - (?P<description>.*))?$")
            .expect("static pattern")
    })
}

fn dedication_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\[(?P<owner>[^\]]+)\]\(https://github\.com/[^)/]+/?\) has waived").expect("static pattern")
    })
}

/// Trims a repository name at the first character GitHub does not allow in one.
fn clean_repo_name(raw: &str) -> &str {
    let end = raw
        .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-' || c == '.'))
        .unwrap_or(raw.len());
    &raw[..end]
}

/// `owner/repo` of a GitHub repository URL.
pub fn github_repo_from_url(url: &str) -> Option<String> {
    let captures = github_repo_pattern().captures(url)?;
    let owner = captures.get(1)?.as_str();
    let repo = clean_repo_name(captures.get(2)?.as_str());
    if repo.is_empty() {
        return None;
    }
    Some(format!("{}/{}", owner, repo))
}

/// Every GitHub repository linked anywhere in `markdown`, first occurrence wins.
pub fn extract_github_repos(markdown: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut repos = Vec::new();

    for captures in github_repo_pattern().captures_iter(markdown) {
        let owner = &captures[1];
        let repo = clean_repo_name(&captures[2]);
        if repo.is_empty() {
            continue;
        }
        let full_name = format!("{}/{}", owner, repo);
        if seen.insert(full_name.clone()) {
            repos.push(full_name);
        }
    }

    repos
}

/// GitHub repositories of the document's entries, in document order.
pub fn entry_repos(document: &AwesomeDocument) -> Vec<String> {
    let mut seen = HashSet::new();
    document
        .sections
        .iter()
        .flat_map(|section| section.entries.iter())
        .filter_map(|entry| github_repo_from_url(&entry.url))
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

enum Block {
    Preamble,
    Contents,
    Section,
    License,
}

/// Parses a document in the rendered layout.
///
/// Descriptions are kept verbatim. Anything that the renderer would not
/// produce inside a section is rejected with the offending line number.
pub fn parse_document(markdown: &str) -> Result<AwesomeDocument> {
    let mut title: Option<String> = None;
    let mut tagline: Vec<String> = Vec::new();
    let mut owner = String::new();
    let mut sections: Vec<LanguageSection> = Vec::new();
    let mut block = Block::Preamble;

    for (index, line) in markdown.lines().enumerate() {
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        if title.is_none() {
            let heading = line.strip_prefix("# ").ok_or_else(|| {
                AwesomeStarsError::malformed(line_no, "expected the title heading")
            })?;
            let text = title_pattern()
                .captures(heading)
                .and_then(|c| c.name("title"))
                .map(|m| m.as_str())
                .unwrap_or(heading);
            title = Some(text.trim().to_string());
            continue;
        }

        if let Some(heading) = line.strip_prefix("## ") {
            let heading = heading.trim();
            block = match heading {
                CONTENTS_HEADING => Block::Contents,
                LICENSE_HEADING => Block::License,
                language => {
                    sections.push(LanguageSection::new(language));
                    Block::Section
                }
            };
            continue;
        }

        if line.starts_with('#') {
            return Err(AwesomeStarsError::malformed(line_no, "unexpected heading level"));
        }

        match block {
            Block::Preamble => match line.strip_prefix('>') {
                Some(quote) => tagline.push(quote.trim().to_string()),
                None => {
                    return Err(AwesomeStarsError::malformed(
                        line_no,
                        "unexpected text before the table of contents",
                    ))
                }
            },
            // Anchors are regenerated from the headings; lint checks them.
            Block::Contents => {}
            Block::Section => {
                let captures = entry_pattern().captures(line).ok_or_else(|| {
                    AwesomeStarsError::malformed(line_no, "expected `- [owner/repo](url) - description`")
                })?;
                let entry = StarredRepoEntry {
                    name: captures["name"].to_string(),
                    url: captures["url"].to_string(),
                    description: captures
                        .name("description")
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_default(),
                };
                if let Some(section) = sections.last_mut() {
                    section.entries.push(entry);
                }
            }
            Block::License => {
                if let Some(captures) = dedication_pattern().captures(line) {
                    owner = captures["owner"].to_string();
                }
            }
        }
    }

    let title = title.ok_or_else(|| AwesomeStarsError::malformed(1, "document is empty"))?;
    let document = AwesomeDocument {
        title,
        tagline: tagline.join(" "),
        owner,
        sections,
    };
    debug!(
        sections = document.sections.len(),
        entries = document.entry_count(),
        "Parsed awesome-stars document"
    );
    Ok(document)
}
