// SPDX-License-Identifier: MIT
// Autocomplete over shortcut candidates, plus Tab cycling through the
// flattened link list.

use crate::page::PageConfig;

/// A (label, url) pair used for autocomplete and navigation matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub label: String,
    pub url: String,
    normalized: String,
}

/// Derived index over the page config. Rebuild after every mutation — the
/// build is a linear scan, cheap enough to run per command.
#[derive(Debug, Clone, Default)]
pub struct ShortcutIndex {
    candidates: Vec<Candidate>,
    /// Flattened link URLs in document order, for Tab cycling.
    urls: Vec<String>,
}

impl ShortcutIndex {
    pub fn new(config: &PageConfig) -> Self {
        let mut candidates = Vec::new();
        let mut urls = Vec::new();

        for link in config.flat_links() {
            if let Some(name) = link.name.as_deref() {
                let trimmed = name.trim();
                if !trimmed.is_empty() {
                    candidates.push(Candidate {
                        label: trimmed.to_string(),
                        url: link.url.clone(),
                        normalized: trimmed.to_lowercase(),
                    });
                }
            }
            candidates.push(Candidate {
                label: link.url.clone(),
                url: link.url.clone(),
                normalized: link.url.to_lowercase(),
            });
            urls.push(link.url.clone());
        }

        Self { candidates, urls }
    }

    /// Ghost suggestion for the current input: the first candidate whose
    /// normalized label starts with the lowercased trimmed input and is
    /// strictly longer than it. Suppressed entirely while the raw input
    /// contains whitespace.
    pub fn suggest(&self, raw_input: &str) -> Option<&str> {
        let trimmed = raw_input.trim();
        if trimmed.is_empty() || raw_input.chars().any(char::is_whitespace) {
            return None;
        }

        let needle = trimmed.to_lowercase();
        self.candidates
            .iter()
            .find(|c| c.normalized.starts_with(&needle) && c.label.len() > trimmed.len())
            .map(|c| c.label.as_str())
    }

    /// Exact shortcut lookup (case-insensitive label or URL match).
    pub fn shortcut_url(&self, value: &str) -> Option<&str> {
        let needle = value.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.candidates
            .iter()
            .find(|c| c.normalized == needle)
            .map(|c| c.url.as_str())
    }

    /// Step through the flattened link list, wrapping. Seeded from the
    /// index whose URL exactly matches the current input; a non-match
    /// starts at the first link (or the last when cycling backwards).
    pub fn cycle(&self, current: &str, backwards: bool) -> Option<&str> {
        if self.urls.is_empty() {
            return None;
        }
        let len = self.urls.len() as isize;
        let current = current.trim();

        let next = match self.urls.iter().position(|url| url == current) {
            None => {
                if backwards {
                    len - 1
                } else {
                    0
                }
            }
            Some(i) => {
                let step = if backwards { -1 } else { 1 };
                (i as isize + step).rem_euclid(len)
            }
        };
        Some(self.urls[next as usize].as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
