//! Structural checks for an awesome-stars document.
//!
//! The document is read with a CommonMark parser so headings and links are
//! seen the way a markdown renderer sees them, not the way the line parser
//! in [`crate::readme`] does.

use crate::document::{CONTENTS_HEADING, LICENSE_HEADING};
use crate::error::AwesomeStarsError;
use crate::readme::parse_document;
use crate::slug::SlugRegistry;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LintIssue {
    UnresolvedAnchor { line: usize, anchor: String },
    DuplicateHeading { line: usize, heading: String },
    MissingFromContents { line: usize, heading: String },
    InvalidLink { line: usize, reason: String },
    DuplicateUrl { line: usize, section: String, url: String },
    MissingLicense,
    NotCanonical { line: usize, reason: String },
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintIssue::UnresolvedAnchor { line, anchor } => {
                write!(f, "line {}: anchor #{} does not match any heading", line, anchor)
            }
            LintIssue::DuplicateHeading { line, heading } => {
                write!(f, "line {}: heading `{}` appears more than once", line, heading)
            }
            LintIssue::MissingFromContents { line, heading } => {
                write!(f, "line {}: section `{}` is not listed in the contents", line, heading)
            }
            LintIssue::InvalidLink { line, reason } => write!(f, "line {}: {}", line, reason),
            LintIssue::DuplicateUrl { line, section, url } => {
                write!(f, "line {}: {} is listed twice under `{}`", line, url, section)
            }
            LintIssue::MissingLicense => write!(f, "the `{}` section is missing", LICENSE_HEADING),
            LintIssue::NotCanonical { line, reason } => write!(f, "line {}: {}", line, reason),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LintReport {
    pub sections: usize,
    pub entries: usize,
    pub issues: Vec<LintIssue>,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

struct Heading {
    level: HeadingLevel,
    text: String,
    line: usize,
}

struct ItemLink {
    /// Index into the heading list of the enclosing level-2 heading.
    section: Option<usize>,
    dest: String,
    label: String,
    line: usize,
}

#[derive(Default)]
struct Outline {
    headings: Vec<Heading>,
    links: Vec<ItemLink>,
}

struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }
}

/// Collects headings and the first link of every list item.
fn outline(markdown: &str) -> Outline {
    let lines = LineIndex::new(markdown);
    let mut outline = Outline::default();

    let mut heading: Option<Heading> = None;
    let mut link: Option<ItemLink> = None;
    let mut current_section: Option<usize> = None;
    let mut image_depth = 0usize;
    let mut item_depth = 0usize;
    let mut item_link_seen = false;

    for (event, range) in Parser::new(markdown).into_offset_iter() {
        match event {
            Event::Start(Tag::Heading(level, _, _)) => {
                heading = Some(Heading {
                    level,
                    text: String::new(),
                    line: lines.line_of(range.start),
                });
            }
            Event::End(Tag::Heading(..)) => {
                if let Some(done) = heading.take() {
                    if done.level == HeadingLevel::H2 {
                        current_section = Some(outline.headings.len());
                    }
                    outline.headings.push(done);
                }
            }
            Event::Start(Tag::Image(..)) => image_depth += 1,
            Event::End(Tag::Image(..)) => image_depth = image_depth.saturating_sub(1),
            Event::Start(Tag::Item) => {
                item_depth += 1;
                item_link_seen = false;
            }
            Event::End(Tag::Item) => item_depth = item_depth.saturating_sub(1),
            Event::Start(Tag::Link(_, dest, _)) => {
                if heading.is_none() && item_depth > 0 && !item_link_seen {
                    link = Some(ItemLink {
                        section: current_section,
                        dest: dest.to_string(),
                        label: String::new(),
                        line: lines.line_of(range.start),
                    });
                }
            }
            Event::End(Tag::Link(..)) => {
                if let Some(done) = link.take() {
                    item_link_seen = true;
                    outline.links.push(done);
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if image_depth > 0 {
                    continue;
                }
                if let Some(h) = heading.as_mut() {
                    h.text.push_str(&text);
                }
                if let Some(l) = link.as_mut() {
                    l.label.push_str(&text);
                }
            }
            _ => {}
        }
    }

    outline
}

fn is_language_heading(heading: &Heading) -> bool {
    heading.level == HeadingLevel::H2
        && heading.text.trim() != CONTENTS_HEADING
        && heading.text.trim() != LICENSE_HEADING
}

/// Runs every structural check against `markdown`.
pub fn lint_document(markdown: &str) -> LintReport {
    let outline = outline(markdown);
    let mut report = LintReport::default();

    let mut registry = SlugRegistry::new();
    let slugs: Vec<String> = outline.headings.iter().map(|h| registry.register(&h.text)).collect();
    let known_slugs: HashSet<&str> = slugs.iter().map(String::as_str).collect();

    let section_name = |index: Option<usize>| index.map(|i| outline.headings[i].text.trim());

    // Table of contents
    let mut referenced: HashSet<&str> = HashSet::new();
    for link in &outline.links {
        if section_name(link.section) != Some(CONTENTS_HEADING) {
            continue;
        }
        if let Some(anchor) = link.dest.strip_prefix('#') {
            referenced.insert(anchor);
            if !known_slugs.contains(anchor) {
                report.issues.push(LintIssue::UnresolvedAnchor {
                    line: link.line,
                    anchor: anchor.to_string(),
                });
            }
        }
    }

    // Language headings
    let mut seen_headings: HashSet<&str> = HashSet::new();
    for (heading, slug) in outline.headings.iter().zip(&slugs) {
        if !is_language_heading(heading) {
            continue;
        }
        report.sections += 1;
        let text = heading.text.trim();
        if !seen_headings.insert(text) {
            report.issues.push(LintIssue::DuplicateHeading {
                line: heading.line,
                heading: text.to_string(),
            });
        }
        if !referenced.contains(slug.as_str()) {
            report.issues.push(LintIssue::MissingFromContents {
                line: heading.line,
                heading: text.to_string(),
            });
        }
    }

    // Entries
    let mut urls_by_section: HashMap<usize, HashSet<&str>> = HashMap::new();
    for link in &outline.links {
        let Some(section) = link.section else { continue };
        if !is_language_heading(&outline.headings[section]) {
            continue;
        }
        report.entries += 1;

        if link.label.trim().is_empty() {
            report.issues.push(LintIssue::InvalidLink {
                line: link.line,
                reason: "entry link has an empty label".to_string(),
            });
        }
        if link.dest.trim().is_empty() {
            report.issues.push(LintIssue::InvalidLink {
                line: link.line,
                reason: "entry link has an empty URL".to_string(),
            });
            continue;
        }
        if let Err(e) = url::Url::parse(&link.dest) {
            report.issues.push(LintIssue::InvalidLink {
                line: link.line,
                reason: format!("entry URL `{}` is not valid: {}", link.dest, e),
            });
        }
        if !urls_by_section.entry(section).or_default().insert(link.dest.as_str()) {
            report.issues.push(LintIssue::DuplicateUrl {
                line: link.line,
                section: outline.headings[section].text.trim().to_string(),
                url: link.dest.clone(),
            });
        }
    }

    let has_license = outline
        .headings
        .iter()
        .any(|h| h.level == HeadingLevel::H2 && h.text.trim() == LICENSE_HEADING);
    if !has_license {
        report.issues.push(LintIssue::MissingLicense);
    }

    if let Some(issue) = canonical_check(markdown) {
        report.issues.push(issue);
    }

    debug!(
        sections = report.sections,
        entries = report.entries,
        issues = report.issues.len(),
        "Linted document"
    );
    report
}

/// Re-renders the parsed document and reports the first line that differs.
fn canonical_check(markdown: &str) -> Option<LintIssue> {
    let document = match parse_document(markdown) {
        Ok(document) => document,
        Err(AwesomeStarsError::MalformedDocument { line, reason }) => {
            return Some(LintIssue::NotCanonical { line, reason });
        }
        Err(e) => {
            return Some(LintIssue::NotCanonical { line: 0, reason: e.to_string() });
        }
    };

    let rendered = document.render();
    if rendered == markdown {
        return None;
    }

    let mut original = markdown.lines();
    let mut regenerated = rendered.lines();
    let mut line = 1;
    loop {
        match (original.next(), regenerated.next()) {
            (Some(a), Some(b)) if a == b => line += 1,
            (None, None) => {
                return Some(LintIssue::NotCanonical {
                    line,
                    reason: "line endings differ from the rendered document".to_string(),
                });
            }
            (a, b) => {
                return Some(LintIssue::NotCanonical {
                    line,
                    reason: format!(
                        "re-rendering gives `{}` instead of `{}`",
                        b.unwrap_or(""),
                        a.unwrap_or("")
                    ),
                });
            }
        }
    }
}
