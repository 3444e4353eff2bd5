//! Selector options and deterministic option ids.
//!
//! Option ids are derived from titles (`"Next week!"` → `next_week`) so that
//! editing a title never requires the user to manage ids. An explicit id
//! override always wins; derived ids never collide with overrides or with each
//! other (`_2`, `_3`, ... suffixes).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::wire::NodeReader;

/// Fallback id stem for titles without any alphanumeric character.
const FALLBACK_STEM: &str = "option";

/// One choice of a selector element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectOption {
    /// Display title.
    pub title: String,
    /// Optional secondary line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Explicit id, overriding the title-derived one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_override: Option<String>,
}

impl SelectOption {
    /// Create an option with a derived id.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Pin the option id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id_override = Some(id.into());
        self
    }
}

/// Anything with a title and an optional explicit id.
pub trait Identified {
    /// Title the id is derived from.
    fn title(&self) -> &str;
    /// Explicit id, if any.
    fn id_override(&self) -> Option<&str>;
}

impl Identified for SelectOption {
    fn title(&self) -> &str {
        &self.title
    }

    fn id_override(&self) -> Option<&str> {
        self.id_override.as_deref()
    }
}

/// Slug a title into an id stem.
#[must_use]
pub fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut pending_sep = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    if out.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        out
    }
}

/// Resolve the effective id of every item, in order.
///
/// Overrides are reserved first; each derived id takes the first free
/// `stem`, `stem_2`, `stem_3`, ... Duplicate overrides are returned as-is and
/// reported by validation.
#[must_use]
pub fn resolve_ids<T: Identified>(items: &[T]) -> Vec<String> {
    let mut taken: HashSet<String> = items
        .iter()
        .filter_map(|i| i.id_override().map(str::to_string))
        .collect();

    items
        .iter()
        .map(|item| {
            if let Some(id) = item.id_override() {
                return id.to_string();
            }
            let stem = slug(item.title());
            let mut candidate = stem.clone();
            let mut n = 2;
            while taken.contains(&candidate) {
                candidate = format!("{stem}_{n}");
                n += 1;
            }
            taken.insert(candidate.clone());
            candidate
        })
        .collect()
}

/// Explicit ids that occur more than once.
#[must_use]
pub fn duplicate_overrides<T: Identified>(items: &[T]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut dups = Vec::new();
    for id in items.iter().filter_map(Identified::id_override) {
        if !seen.insert(id) && !dups.iter().any(|d| d == id) {
            dups.push(id.to_string());
        }
    }
    dups
}

/// Default options for a freshly added selector.
#[must_use]
pub fn default_options(count: usize) -> Vec<SelectOption> {
    (1..=count)
        .map(|n| SelectOption::new(format!("Option {n}")))
        .collect()
}

/// Serialize options as a `data-source` array.
#[must_use]
pub fn write_options(options: &[SelectOption]) -> Vec<Value> {
    resolve_ids(options)
        .into_iter()
        .zip(options)
        .map(|(id, option)| {
            let mut node = serde_json::Map::new();
            node.insert("id".to_string(), Value::String(id));
            node.insert("title".to_string(), Value::String(option.title.clone()));
            if let Some(desc) = option.description.as_deref().filter(|d| !d.trim().is_empty()) {
                node.insert("description".to_string(), Value::String(desc.to_string()));
            }
            Value::Object(node)
        })
        .collect()
}

/// Read options back, keeping an explicit id only where derivation would
/// produce something different.
#[must_use]
pub fn read_options(values: &[Value]) -> Vec<SelectOption> {
    let mut options: Vec<SelectOption> = values
        .iter()
        .filter_map(|v| NodeReader::new(v).ok())
        .map(|node| SelectOption {
            title: node.text("title"),
            description: node.opt_text("description"),
            id_override: node.opt_text("id"),
        })
        .collect();
    drop_redundant_overrides(&mut options, |o| &mut o.id_override);
    options
}

/// Clear overrides that equal the id derivation would assign anyway.
///
/// Works greedily in order: an override is dropped only if the ids resolved
/// after dropping it are unchanged.
pub fn drop_redundant_overrides<T: Identified>(
    items: &mut [T],
    slot: impl Fn(&mut T) -> &mut Option<String>,
) {
    let wanted = resolve_ids(items);
    for i in 0..items.len() {
        let Some(saved) = slot(&mut items[i]).take() else {
            continue;
        };
        if resolve_ids(items) != wanted {
            *slot(&mut items[i]) = Some(saved);
        }
    }
}
