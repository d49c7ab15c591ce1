// src/exec/replacer.rs

//! Placeholder expansion for command arguments.
//!
//! Placeholders look like `{key}`. The key may contain anything except
//! braces and whitespace, so dotted names such as `{event.data.domain}` work.
//! Unknown keys expand to the supplied `empty` value.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([^{}\s]+)\}").expect("placeholder regex is valid")
});

/// Substitution function supplied by the event context.
pub trait Replacer: Send + Sync + Debug {
    /// Look up a single placeholder key.
    fn get(&self, key: &str) -> Option<String>;

    /// Expand every placeholder in `input`, using `empty` for unknown keys.
    fn replace_all(&self, input: &str, empty: &str) -> String {
        if !input.contains('{') {
            return input.to_string();
        }
        PLACEHOLDER
            .replace_all(input, |caps: &Captures<'_>| {
                self.get(&caps[1]).unwrap_or_else(|| empty.to_string())
            })
            .into_owned()
    }
}

/// Map-backed [`Replacer`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapReplacer {
    values: BTreeMap<String, String>,
}

impl MapReplacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn into_entries(self) -> impl Iterator<Item = (String, String)> {
        self.values.into_iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Replacer for MapReplacer {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapReplacer {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut repl = MapReplacer::new();
        for (k, v) in iter {
            repl.set(k, v);
        }
        repl
    }
}
