//! Option selection parsed from the product page URL.

use serde::{Deserialize, Serialize};

use super::{SelectedOption, VariantGraph};

/// A partial mapping from option name to chosen value.
///
/// Keeps insertion order so that re-serialising a parsed query string is
/// stable. Names are unique; setting a name again replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    entries: Vec<SelectedOption>,
}

impl Selection {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parse every non-empty query parameter as a candidate option.
    ///
    /// Unrelated parameters (tracking tags, cursors) are kept; resolution
    /// ignores names the product doesn't declare. Use
    /// [`Selection::restricted_to`] to drop them.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        url::form_urlencoded::parse(query.as_bytes())
            .filter(|(_, value)| !value.is_empty())
            .fold(Self::new(), |selection, (name, value)| {
                selection.with(name.into_owned(), value.into_owned())
            })
    }

    /// Build a selection from a variant's (or cart line's) options.
    #[must_use]
    pub fn from_options(options: &[SelectedOption]) -> Self {
        options.iter().fold(Self::new(), |selection, o| {
            selection.with(o.name.clone(), o.value.clone())
        })
    }

    /// Return a copy with `name` set to `value`.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Set `name` to `value`, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.value = value,
            None => self.entries.push(SelectedOption { name, value }),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.value.as_str())
    }

    /// Keep only names the product declares as options.
    #[must_use]
    pub fn restricted_to(&self, graph: &VariantGraph) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|e| graph.option(&e.name).is_some())
                .cloned()
                .collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectedOption> {
        self.entries.iter()
    }
}

impl FromIterator<SelectedOption> for Selection {
    fn from_iter<I: IntoIterator<Item = SelectedOption>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |selection, o| selection.with(o.name, o.value))
    }
}
