//! Make variables and `$(name)` / `${name}` references.

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

// Parentheses and braces must be balanced, so `$(a)-$(b)` is two references.
static RE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(?:\(([^:#=\s()]+)\)|\{([^:#=\s{}]+)\})").unwrap());

/// Variable name to its ordered list of values.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Variables(HashMap<String, Vec<String>>);

impl Variables {
    /// Set `name`, replacing any earlier definition.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<String>) {
        self.0.insert(name.into(), values);
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    fn values(&self, name: &str) -> &[String] {
        self.get(name).unwrap_or_default()
    }

    /// Expand every reference in `template` into the cross product of the
    /// referenced variables' values.
    ///
    /// `$(a)-$(b)` with `a = [foo, bar]` and `b = [baz, qux]` gives
    /// `foo-baz`, `foo-qux`, `bar-baz`, `bar-qux`. References to undefined or
    /// empty variables stay in every expansion literally. Duplicates are kept.
    pub fn expand(&self, template: &str) -> Vec<String> {
        let mut expanded = vec![String::new()];
        let mut last = 0;

        for caps in RE_REFERENCE.captures_iter(template) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let literal = &template[last..whole.start()];
            let values = self.values(reference_name(&caps));

            expanded = if values.is_empty() {
                expanded
                    .into_iter()
                    .map(|e| e + literal + whole.as_str())
                    .collect()
            } else {
                expanded
                    .iter()
                    .flat_map(|e| values.iter().map(move |v| format!("{e}{literal}{v}")))
                    .collect()
            };
            last = whole.end();
        }

        let tail = &template[last..];
        for e in &mut expanded {
            e.push_str(tail);
        }
        expanded
    }

    /// Replace each reference in `text` with the first value of its variable.
    /// Undefined or empty variables are left as written.
    pub fn replace(&self, text: &str) -> String {
        RE_REFERENCE
            .replace_all(text, |caps: &Captures| {
                match self.values(reference_name(caps)).first() {
                    Some(value) => value.clone(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<String>)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, Vec<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

fn reference_name<'t>(caps: &Captures<'t>) -> &'t str {
    caps.get(1)
        .or_else(|| caps.get(2))
        .map_or("", |m| m.as_str())
}

/// Split a variable value into words, shell style: quotes group words.
///
/// Unbalanced quotes fall back to plain whitespace splitting.
pub fn split_value(value: &str) -> Vec<String> {
    match shell_words::split(value) {
        Ok(words) => words,
        Err(err) => {
            debug!(value, error = %err, "value is not shell-splittable, splitting on whitespace");
            value.split_whitespace().map(str::to_string).collect()
        }
    }
}
