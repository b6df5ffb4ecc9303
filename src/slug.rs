use std::collections::HashMap;

/// Anchor GitHub derives from a heading's text, before de-duplication.
pub fn slugify(heading: &str) -> String {
    let mut slug = String::with_capacity(heading.len());
    for ch in heading.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() || ch == '-' || ch == '_' {
            slug.push(ch);
        } else if ch == ' ' {
            slug.push('-');
        }
    }
    slug
}

/// Hands out unique heading anchors in document order.
///
/// A heading whose slug is already taken gets `-1`, `-2`, ... appended, so
/// `C`, `C++` and `C#` resolve to `c`, `c-1` and `c-2`.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    occurrences: HashMap<String, usize>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, heading: &str) -> String {
        let base = slugify(heading);
        let mut slug = base.clone();
        while self.occurrences.contains_key(&slug) {
            let count = self.occurrences.entry(base.clone()).or_insert(0);
            *count += 1;
            slug = format!("{}-{}", base, count);
        }
        self.occurrences.insert(slug.clone(), 0);
        slug
    }
}
