//! Page configuration tree — tabs, categories, and links.
//!
//! Loaded once at startup from the page-config JSON file, mutated in place
//! by console commands, and persisted only on explicit request.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ─── PageConfig ───────────────────────────────────────────────────────────────

/// The whole start-page configuration. Unknown fields from older config
/// files are ignored on load; every field has a default so a partial file
/// still parses.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PageConfig {
    /// Prompt username, e.g. `guest` in `guest@launchpad:~$`.
    pub username: String,
    /// Weather location and display scale.
    pub temperature: TemperatureConfig,
    /// Search engines keyed by a one-letter shortcut, plus the default key.
    pub search: SearchConfig,
    /// Quick-jump URL bound to the fast-link shortcut.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fastlink: Option<String>,
    /// Ordered bookmark tabs.
    pub tabs: Vec<Tab>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            username: "guest".to_string(),
            temperature: TemperatureConfig::default(),
            search: SearchConfig::default(),
            fastlink: None,
            tabs: Vec::new(),
        }
    }
}

impl PageConfig {
    /// All links across every tab and category, in document order,
    /// skipping entries without a URL.
    pub fn flat_links(&self) -> impl Iterator<Item = &Link> {
        self.tabs
            .iter()
            .flat_map(|tab| tab.categories.iter())
            .flat_map(|category| category.links.iter())
            .filter(|link| !link.url.is_empty())
    }
}

// ─── TemperatureConfig ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TemperatureConfig {
    /// Weather location, e.g. "Manchester". None disables the weather line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Display scale. Temperatures are always fetched metric and converted.
    pub scale: Scale,
}

/// Temperature display scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum Scale {
    #[default]
    C,
    F,
}

impl std::fmt::Display for Scale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scale::C => write!(f, "C"),
            Scale::F => write!(f, "F"),
        }
    }
}

// ─── SearchConfig ─────────────────────────────────────────────────────────────

/// Search engine table (`"search"` in the page config).
///
/// Each engine is a `(query_prefix, label)` pair; the query is appended to
/// the prefix percent-encoded. `default` names the engine used for free-text
/// input that is not a command, shortcut, or URL.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    pub engines: BTreeMap<String, (String, String)>,
    pub default: String,
}

impl SearchConfig {
    /// The configured default engine, falling back to the first entry when
    /// the default key is missing or dangling.
    pub fn default_engine(&self) -> Option<&(String, String)> {
        self.engines
            .get(&self.default)
            .or_else(|| self.engines.values().next())
    }
}

// ─── Tabs, categories, links ──────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Tab {
    /// Display and grouping key.
    pub name: String,
    /// Banner image URL; empty means no banner.
    pub background_url: String,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Category {
    /// May be empty — rendered without a header.
    pub name: String,
    pub links: Vec<Link>,
}

/// One bookmark entry. Within a category every `url` is unique — the store
/// mutations enforce this.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Link {
    /// Display name; falls back to the URL when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Absolute URL with scheme.
    pub url: String,
    /// Icon display hints; carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_color: Option<String>,
}

impl Link {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            url: url.into(),
            icon: None,
            icon_color: None,
        }
    }

    /// Display label: the trimmed name when present and nonempty, else the URL.
    pub fn label(&self) -> &str {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => &self.url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_parses_with_defaults() {
        let config: PageConfig = serde_json::from_str(r#"{"username":"pix"}"#).unwrap();
        assert_eq!(config.username, "pix");
        assert!(config.tabs.is_empty());
        assert_eq!(config.temperature.scale, Scale::C);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let raw = r#"{"username":"pix","overrideStorage":true,"localIcons":true}"#;
        let config: PageConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.username, "pix");
    }

    #[test]
    fn search_engines_parse_as_pairs() {
        let raw = r#"{"search":{"engines":{"d":["https://duckduckgo.com/?q=","DuckDuckGo"]},"default":"d"}}"#;
        let config: PageConfig = serde_json::from_str(raw).unwrap();
        let (prefix, label) = config.search.default_engine().unwrap();
        assert_eq!(prefix, "https://duckduckgo.com/?q=");
        assert_eq!(label, "DuckDuckGo");
    }

    #[test]
    fn label_falls_back_to_url() {
        let link = Link {
            name: None,
            url: "https://example.com".into(),
            icon: None,
            icon_color: None,
        };
        assert_eq!(link.label(), "https://example.com");

        let named = Link::new("  ", "https://example.com");
        assert_eq!(named.label(), "https://example.com");
    }

    #[test]
    fn flat_links_skips_empty_urls() {
        let config = PageConfig {
            tabs: vec![Tab {
                name: "dev".into(),
                background_url: String::new(),
                categories: vec![Category {
                    name: "tools".into(),
                    links: vec![
                        Link::new("a", "https://a.example"),
                        Link {
                            name: Some("ghost".into()),
                            url: String::new(),
                            icon: None,
                            icon_color: None,
                        },
                    ],
                }],
            }],
            ..PageConfig::default()
        };
        assert_eq!(config.flat_links().count(), 1);
    }
}
