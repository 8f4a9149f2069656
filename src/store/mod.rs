//! Value-semantic mutations over the page configuration.
//!
//! Every mutation builds a structural copy of the `tabs` sequence, applies
//! the change to the copy, and commits it only on success — a failed
//! validation is never observable in the tree. Receipts carry the names the
//! console needs for its result line.

use thiserror::Error;

use crate::page::{Category, Link, PageConfig};
use crate::urls;

// ─── Errors ───────────────────────────────────────────────────────────────────

/// Mutation failures. The display strings are the user-visible console
/// messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("No tabs configured yet. Add a tab in your config first.")]
    NoTabs,
    #[error("That URL already exists in the selected group.")]
    DuplicateUrl,
    #[error("URL not found in that group.")]
    UrlNotInGroup,
    #[error("Group not found.")]
    GroupNotFound,
    #[error("URL not found.")]
    UrlNotFound,
}

// ─── Receipts ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddReceipt {
    pub tab: String,
    pub category: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveReceipt {
    pub name: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditReceipt {
    pub category: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReceipt {
    pub name: String,
    pub from: String,
    pub to: String,
}

// ─── Store ────────────────────────────────────────────────────────────────────

/// Owns the live page configuration and is the only writer to it.
#[derive(Debug, Clone)]
pub struct Store {
    config: PageConfig,
}

impl Store {
    pub fn new(config: PageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Replace the whole tree, e.g. after the page file changed on disk.
    pub fn replace(&mut self, config: PageConfig) {
        self.config = config;
    }

    pub fn set_username(&mut self, name: &str) {
        self.config.username = name.to_string();
    }

    /// Add `url` to the category named `group` (case-insensitive), scanning
    /// tabs in order. When no category matches anywhere, a new one named
    /// `group` is appended to the first tab.
    pub fn add_link(&mut self, url: &str, group: &str) -> Result<AddReceipt, StoreError> {
        if self.config.tabs.is_empty() {
            return Err(StoreError::NoTabs);
        }

        let mut tabs = self.config.tabs.clone();
        let needle = group.to_lowercase();

        let found = tabs.iter().enumerate().find_map(|(ti, tab)| {
            tab.categories
                .iter()
                .position(|c| c.name.to_lowercase() == needle)
                .map(|ci| (ti, ci))
        });

        let (ti, ci) = match found {
            Some(slot) => slot,
            None => {
                tabs[0].categories.push(Category {
                    name: group.to_string(),
                    links: Vec::new(),
                });
                (0, tabs[0].categories.len() - 1)
            }
        };

        let category = &mut tabs[ti].categories[ci];
        if category.links.iter().any(|link| link.url == url) {
            return Err(StoreError::DuplicateUrl);
        }

        let name = urls::infer_label(url);
        category.links.push(Link::new(name.clone(), url));

        let receipt = AddReceipt {
            tab: or_fallback(&tabs[ti].name, "links"),
            category: or_fallback(&tabs[ti].categories[ci].name, group),
            name,
        };
        self.config.tabs = tabs;
        Ok(receipt)
    }

    /// Remove `url` from the category named `group`. The first tab holding
    /// a matching category decides: if the URL is not in that category the
    /// removal fails without looking further.
    pub fn remove_link(&mut self, url: &str, group: &str) -> Result<RemoveReceipt, StoreError> {
        let mut tabs = self.config.tabs.clone();
        let needle = group.to_lowercase();

        let found = tabs.iter().enumerate().find_map(|(ti, tab)| {
            tab.categories
                .iter()
                .position(|c| c.name.to_lowercase() == needle)
                .map(|ci| (ti, ci))
        });
        let Some((ti, ci)) = found else {
            return Err(StoreError::GroupNotFound);
        };

        let category = &mut tabs[ti].categories[ci];
        let Some(index) = category.links.iter().position(|link| link.url == url) else {
            return Err(StoreError::UrlNotInGroup);
        };

        let removed = category.links.remove(index);
        let receipt = RemoveReceipt {
            name: or_fallback(removed.label(), url),
            category: or_fallback(&category.name, group),
        };
        self.config.tabs = tabs;
        Ok(receipt)
    }

    /// Replace the URL of the link currently at `target`, re-deriving its
    /// display name from the new host. `next_url` must already be
    /// normalized. Fails if the category already holds `next_url`.
    pub fn edit_url(&mut self, target: &str, next_url: &str) -> Result<EditReceipt, StoreError> {
        let mut tabs = self.config.tabs.clone();
        let Some((ti, ci, li)) = locate(&tabs, target) else {
            return Err(StoreError::UrlNotFound);
        };

        let category = &mut tabs[ti].categories[ci];
        let duplicate = category
            .links
            .iter()
            .enumerate()
            .any(|(i, link)| i != li && link.url == next_url);
        if duplicate {
            return Err(StoreError::DuplicateUrl);
        }

        let name = urls::infer_label(next_url);
        let link = &mut category.links[li];
        link.url = next_url.to_string();
        link.name = Some(name.clone());

        let receipt = EditReceipt {
            category: or_fallback(&category.name, "links"),
            name,
        };
        self.config.tabs = tabs;
        Ok(receipt)
    }

    /// Rename the link at `target`; the URL is unchanged.
    pub fn retitle(&mut self, target: &str, title: &str) -> Result<EditReceipt, StoreError> {
        let mut tabs = self.config.tabs.clone();
        let Some((ti, ci, li)) = locate(&tabs, target) else {
            return Err(StoreError::UrlNotFound);
        };

        let category = &mut tabs[ti].categories[ci];
        category.links[li].name = Some(title.to_string());

        let receipt = EditReceipt {
            category: or_fallback(&category.name, "links"),
            name: title.to_string(),
        };
        self.config.tabs = tabs;
        Ok(receipt)
    }

    /// Move the link at `target` to the category named `group` in the same
    /// tab, creating the category if absent. Moving within the same
    /// category reorders the link to the end.
    pub fn regroup(&mut self, target: &str, group: &str) -> Result<MoveReceipt, StoreError> {
        let mut tabs = self.config.tabs.clone();
        let Some((ti, ci, li)) = locate(&tabs, target) else {
            return Err(StoreError::UrlNotFound);
        };

        let tab = &mut tabs[ti];
        let needle = group.to_lowercase();
        let di = match tab
            .categories
            .iter()
            .position(|c| c.name.to_lowercase() == needle)
        {
            Some(di) => di,
            None => {
                tab.categories.push(Category {
                    name: group.to_string(),
                    links: Vec::new(),
                });
                tab.categories.len() - 1
            }
        };

        if di != ci && tab.categories[di].links.iter().any(|link| link.url == target) {
            return Err(StoreError::DuplicateUrl);
        }

        let from = or_fallback(&tab.categories[ci].name, "links");
        let moved = tab.categories[ci].links.remove(li);
        let receipt = MoveReceipt {
            name: or_fallback(moved.label(), target),
            from,
            to: or_fallback(&tab.categories[di].name, group),
        };
        tab.categories[di].links.push(moved);

        self.config.tabs = tabs;
        Ok(receipt)
    }
}

/// Locate a link by exact URL: (tab, category, link) indices.
fn locate(tabs: &[crate::page::Tab], url: &str) -> Option<(usize, usize, usize)> {
    tabs.iter().enumerate().find_map(|(ti, tab)| {
        tab.categories.iter().enumerate().find_map(|(ci, category)| {
            category
                .links
                .iter()
                .position(|link| link.url == url)
                .map(|li| (ti, ci, li))
        })
    })
}

fn or_fallback(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
