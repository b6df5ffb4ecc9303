//! The awesome-stars markdown document: grouping and rendering.

use crate::models::{
    normalize_description, section_label, LanguageSection, StarSnapshot, StarredRepoEntry,
    OTHERS_LANGUAGE,
};
use crate::slug::SlugRegistry;
use crate::types::GitHubStarredRepo;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

pub const DEFAULT_TITLE: &str = "Awesome Stars";
pub const DEFAULT_TAGLINE: &str = "A curated list of my GitHub stars!";
pub const CONTENTS_HEADING: &str = "Contents";
pub const LICENSE_HEADING: &str = "License";

pub const AWESOME_BADGE_IMAGE: &str =
    "https://cdn.rawgit.com/sindresorhus/awesome/d7305f38d29fed78fa85652e3a63e154dd8e8829/media/badge.svg";
pub const AWESOME_URL: &str = "https://github.com/sindresorhus/awesome";
pub const CC0_BADGE_IMAGE: &str = "http://mirrors.creativecommons.org/presskit/buttons/88x31/svg/cc-zero.svg";
pub const CC0_URL: &str = "https://creativecommons.org/publicdomain/zero/1.0/";

const GITHUB_PROFILE_BASE: &str = "https://github.com";

/// Header text of a rendered document.
#[derive(Debug, Clone)]
pub struct DocumentOptions {
    pub title: String,
    pub tagline: String,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            tagline: DEFAULT_TAGLINE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwesomeDocument {
    pub title: String,
    pub tagline: String,
    /// GitHub login named in the public-domain dedication.
    pub owner: String,
    pub sections: Vec<LanguageSection>,
}

/// Groups starred repositories by primary language.
///
/// Sections follow the first appearance of their language in `repos`, with
/// the `Others` bucket always last. Entries keep their snapshot order.
pub fn group(repos: &[GitHubStarredRepo]) -> Vec<LanguageSection> {
    let mut sections: Vec<LanguageSection> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut others = LanguageSection::new(OTHERS_LANGUAGE);

    for repo in repos {
        let entry = StarredRepoEntry::from_starred(repo);
        let label = section_label(repo.language.as_deref());
        if label == OTHERS_LANGUAGE {
            others.entries.push(entry);
            continue;
        }
        let position = *index.entry(label.clone()).or_insert_with(|| {
            sections.push(LanguageSection::new(label.clone()));
            sections.len() - 1
        });
        sections[position].entries.push(entry);
    }

    if !others.entries.is_empty() {
        sections.push(others);
    }
    sections
}

/// Text content GitHub sees for the title heading; the badge image adds none.
pub fn title_heading_text(title: &str) -> String {
    format!("{} ", title)
}

impl AwesomeDocument {
    /// Title and tagline are folded onto one trimmed line each, like descriptions.
    pub fn from_snapshot(snapshot: &StarSnapshot, options: &DocumentOptions) -> Self {
        let sections = group(&snapshot.repositories);
        debug!(
            repositories = snapshot.repositories.len(),
            sections = sections.len(),
            "Grouped starred repositories"
        );
        Self {
            title: normalize_description(&options.title),
            tagline: normalize_description(&options.tagline),
            owner: snapshot.username.clone(),
            sections,
        }
    }

    pub fn entry_count(&self) -> usize {
        self.sections.iter().map(|s| s.entries.len()).sum()
    }

    /// Anchor of every section, aligned with `self.sections`.
    pub fn anchors(&self) -> Vec<String> {
        let mut registry = SlugRegistry::new();
        registry.register(&title_heading_text(&self.title));
        registry.register(CONTENTS_HEADING);
        self.sections
            .iter()
            .map(|section| registry.register(&section.language))
            .collect()
    }

    /// Renders the document. Identical documents render to identical bytes.
    pub fn render(&self) -> String {
        let mut blocks: Vec<String> = Vec::new();

        blocks.push(format!(
            "# {} [![Awesome]({})]({})",
            self.title, AWESOME_BADGE_IMAGE, AWESOME_URL
        ));
        if !self.tagline.is_empty() {
            blocks.push(format!("> {}", self.tagline));
        }

        blocks.push(format!("## {}", CONTENTS_HEADING));
        let anchors = self.anchors();
        if !self.sections.is_empty() {
            let toc = self
                .sections
                .iter()
                .zip(&anchors)
                .map(|(section, anchor)| format!("- [{}](#{})", section.language, anchor))
                .collect::<Vec<_>>()
                .join("\n");
            blocks.push(toc);
        }

        for section in &self.sections {
            blocks.push(format!("## {}", section.language));
            if !section.entries.is_empty() {
                let bullets = section
                    .entries
                    .iter()
                    .map(render_entry)
                    .collect::<Vec<_>>()
                    .join("\n");
                blocks.push(bullets);
            }
        }

        blocks.push(format!("## {}", LICENSE_HEADING));
        blocks.push(format!("[![CC0]({})]({})", CC0_BADGE_IMAGE, CC0_URL));
        blocks.push(format!(
            "To the extent possible under law, [{owner}]({base}/{owner}) has waived all copyright and related or neighboring rights to this work.",
            owner = self.owner,
            base = GITHUB_PROFILE_BASE
        ));

        let mut out = blocks.join("\n\n");
        out.push('\n');
        out
    }

    /// Flattens the document back into a snapshot that groups to the same sections.
    pub fn to_snapshot(&self) -> StarSnapshot {
        let repositories = self
            .sections
            .iter()
            .flat_map(|section| {
                let language = if section.is_others() {
                    None
                } else {
                    Some(section.language.clone())
                };
                section.entries.iter().map(move |entry| GitHubStarredRepo {
                    full_name: entry.name.clone(),
                    html_url: entry.url.clone(),
                    description: if entry.description.is_empty() {
                        None
                    } else {
                        Some(entry.description.clone())
                    },
                    language: language.clone(),
                })
            })
            .collect();

        StarSnapshot {
            username: self.owner.clone(),
            repositories,
        }
    }
}

fn render_entry(entry: &StarredRepoEntry) -> String {
    if entry.description.is_empty() {
        format!("- [{}]({})", entry.name, entry.url)
    } else {
        format!("- [{}]({}) - {}", entry.name, entry.url, entry.description)
    }
}
