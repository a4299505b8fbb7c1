//! Template variables — plain string substitutions for `NAME.REPLACE`.
//!
//! Variables come from a single `name=value;name=value;` string. Names match
//! case-insensitively; values are inserted verbatim.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::RenderError;

/// A case-insensitive name → string map.
///
/// The `NAME.REPLACE` matcher is compiled on first use and reused by every
/// render that shares this map; any insert discards it.
#[derive(Debug, Clone, Default)]
pub struct Variables {
    /// Keyed by lowercased name; the value keeps the name as written.
    entries: BTreeMap<String, (String, String)>,
    matcher: OnceLock<Result<Regex, String>>,
}

impl Variables {
    /// An empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `a=b;c=d;`.
    ///
    /// Entries are split at their first `=`. Entries with no `=` or a blank
    /// name are ignored. Names are trimmed, values are not. A later entry
    /// replaces an earlier one with the same name.
    #[must_use]
    pub fn parse(spec: &str) -> Self {
        let mut vars = Self::new();
        for entry in spec.split(';') {
            if let Some((name, value)) = entry.split_once('=') {
                vars.insert(name, value);
            }
        }
        vars
    }

    /// Add or replace one variable. Blank names are ignored.
    pub fn insert(&mut self, name: &str, value: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        self.entries
            .insert(name.to_lowercase(), (name.to_string(), value.to_string()));
        self.matcher = OnceLock::new();
    }

    /// Look up a value, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_lowercase())
            .map(|(_, value)| value.as_str())
    }

    /// Iterate `(name, value)` pairs, names as first written.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .values()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One case-insensitive alternation over every name, longest first,
    /// followed by `.REPLACE`. Capture 1 is the name as it appears in the
    /// template.
    pub(crate) fn matcher(&self) -> Result<&Regex, RenderError> {
        self.matcher
            .get_or_init(|| {
                let mut names: Vec<&str> = self.iter().map(|(name, _)| name).collect();
                names.sort_by_key(|name| std::cmp::Reverse(name.len()));
                let alternation = names
                    .iter()
                    .map(|name| regex::escape(name))
                    .collect::<Vec<_>>()
                    .join("|");
                Regex::new(&format!(r"(?i:({alternation}))\.REPLACE")).map_err(|e| e.to_string())
            })
            .as_ref()
            .map_err(|e| RenderError::Variables(e.clone()))
    }
}

impl PartialEq for Variables {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for Variables {}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = Self::new();
        for (name, value) in iter {
            vars.insert(name.as_ref(), value.as_ref());
        }
        vars
    }
}
