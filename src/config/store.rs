//! The flat selector-to-value map shared by every view of one configuration.

use std::collections::BTreeMap;

use super::grammar::{join_valid, render, validate_selector_parts, Selector};
use super::matcher::{MatchPolicy, Matcher};
use super::{ConfigError, Specificity, Value};

/// Final path elements that are computed by views and can never be stored.
pub const RESERVED_KEYS: [&str; 2] = ["name", "location"];

#[derive(Debug, Clone)]
pub(crate) struct StoredEntry {
    selector: Selector,
    value: Value,
}

/// Selector strings mapped to values.
///
/// Keys are normalized selector strings, so setting `a//b` twice (or via
/// `["a", "//b"]`) overwrites one entry. Distinct selectors that match
/// overlapping paths coexist and are ranked at lookup time.
#[derive(Debug, Default)]
pub struct ConfigStore {
    entries: BTreeMap<String, StoredEntry>,
    matcher: Matcher,
}

impl ConfigStore {
    pub fn new(policy: MatchPolicy) -> Self {
        Self {
            entries: BTreeMap::new(),
            matcher: Matcher::new(policy),
        }
    }

    pub fn policy(&self) -> MatchPolicy {
        self.matcher.policy()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validates selector fragments and stores `value` under them.
    ///
    /// Fails without modifying the store if the selector is malformed, ends
    /// with a wildcard or names a reserved key.
    pub fn set<S: AsRef<str>>(&mut self, parts: &[S], value: Value) -> Result<(), ConfigError> {
        let selector = Selector::parse(parts)?;
        if selector.segments().is_empty() {
            return Err(ConfigError::selector("", "selectors can not be empty"));
        }
        if selector.ends_with_wildcard() {
            return Err(ConfigError::TrailingWildcard(selector.to_string()));
        }
        if selector.leaf().is_some_and(|leaf| RESERVED_KEYS.contains(&leaf)) {
            return Err(ConfigError::ReservedKey(selector.to_string()));
        }

        let key = selector.to_string();
        let replaced = self
            .entries
            .insert(key.clone(), StoredEntry { selector, value })
            .is_some();
        tracing::debug!(selector = %key, replaced, "stored configuration entry");
        Ok(())
    }

    /// Stores already flattened entries under a selector prefix.
    ///
    /// The prefix is validated even when there is nothing to splice. Entries
    /// are applied in order; an invalid entry stops the splice and leaves the
    /// earlier ones in place.
    pub fn splice<S: AsRef<str>>(
        &mut self,
        prefix: &[S],
        entries: Vec<(String, Value)>,
    ) -> Result<(), ConfigError> {
        validate_selector_parts(prefix)?;
        tracing::debug!(
            prefix = %join_valid(prefix),
            count = entries.len(),
            "splicing configuration"
        );
        for (selector, value) in entries {
            let mut parts: Vec<&str> = prefix.iter().map(AsRef::as_ref).collect();
            parts.push(&selector);
            self.set(&parts, value)?;
        }
        Ok(())
    }

    /// Resolves a concrete path to the value of its most specific selector.
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Result<Value, ConfigError> {
        let mut matches: Vec<(Specificity, &str, &Value)> = self
            .entries
            .iter()
            .filter_map(|(key, entry)| {
                self.matcher
                    .matches(entry.selector.segments(), path, Specificity::ZERO)
                    .map(|specificity| (specificity, key.as_str(), &entry.value))
            })
            .collect();

        let display_path = || join_valid(path);

        // Most specific first; the sort is stable so ties keep selector order.
        matches.sort_by(|a, b| b.0.cmp(&a.0));
        match matches.as_slice() {
            [] => Err(ConfigError::KeyNotFound(display_path())),
            [(specificity, selector, value)] => {
                tracing::trace!(
                    path = %display_path(),
                    selector = %selector,
                    %specificity,
                    "resolved configuration key"
                );
                Ok((*value).clone())
            }
            [(top, selector, value), (second, ..), ..] if top > second => {
                tracing::trace!(
                    path = %display_path(),
                    selector = %selector,
                    specificity = %top,
                    "resolved configuration key"
                );
                Ok((*value).clone())
            }
            [(top, ..), ..] => Err(ConfigError::AmbiguousSpecificity {
                path: display_path(),
                selectors: matches
                    .iter()
                    .take_while(|(specificity, ..)| specificity == top)
                    .map(|(_, selector, _)| selector.to_string())
                    .collect(),
                specificity: *top,
            }),
        }
    }

    /// Entries still reachable below `location`, keyed by the selector
    /// segments left after consuming it.
    ///
    /// An entry whose selector is consumed entirely by the location is keyed
    /// by the empty string.
    pub fn entries_below<S: AsRef<str>>(&self, location: &[S]) -> Vec<(String, Value)> {
        self.entries
            .values()
            .filter_map(|entry| {
                self.matcher
                    .match_prefix(entry.selector.segments(), location, Specificity::ZERO)
                    .map(|m| (render(m.remaining), entry.value.clone()))
            })
            .collect()
    }

    /// All entries with their full selectors.
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store(entries: &[(&str, Value)]) -> ConfigStore {
        let mut store = ConfigStore::default();
        for (selector, value) in entries {
            store.set(&[*selector], value.clone()).unwrap();
        }
        store
    }

    #[test]
    fn exact_beats_wildcard() {
        let store = store(&[
            ("aa/lrate", Value::from(0.1)),
            ("//lrate", Value::from(0.5)),
        ]);
        assert_eq!(store.get(&["aa", "lrate"]).unwrap(), Value::from(0.1));
        assert_eq!(store.get(&["bb", "lrate"]).unwrap(), Value::from(0.5));
        assert_eq!(store.get(&["lrate"]).unwrap(), Value::from(0.5));
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let forward = store(&[("//lrate", Value::from(1)), ("aa/lrate", Value::from(2))]);
        let backward = store(&[("aa/lrate", Value::from(2)), ("//lrate", Value::from(1))]);
        assert_eq!(forward.get(&["aa", "lrate"]).unwrap(), Value::from(2));
        assert_eq!(backward.get(&["aa", "lrate"]).unwrap(), Value::from(2));
    }

    #[test]
    fn equal_specificity_is_ambiguous() {
        let store = store(&[
            ("a.*/lrate", Value::from(1)),
            ("(a|b)./lrate", Value::from(2)),
        ]);
        let err = store.get(&["aa", "lrate"]).unwrap_err();
        match err {
            ConfigError::AmbiguousSpecificity {
                path,
                selectors,
                specificity,
            } => {
                assert_eq!(path, "aa/lrate");
                assert_eq!(selectors, vec!["(a|b)./lrate", "a.*/lrate"]);
                assert_eq!(specificity, Specificity::new(1, 1));
            }
            other => panic!("unexpected error: {other}"),
        }
        // Only one of them matches here, so there is nothing to resolve.
        assert_eq!(store.get(&["abc", "lrate"]).unwrap(), Value::from(1));
    }

    #[test]
    fn missing_key() {
        let store = store(&[("block1/seed", Value::from(1))]);
        assert!(matches!(
            store.get(&["block1", "var"]),
            Err(ConfigError::KeyNotFound(path)) if path == "block1/var"
        ));
    }

    #[test]
    fn same_selector_overwrites() {
        let mut store = store(&[("a//b", Value::from(1))]);
        store.set(&["a", "//b"], Value::from(2)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&["a", "x", "b"]).unwrap(), Value::from(2));
    }

    #[test]
    fn rejects_reserved_and_trailing_wildcard() {
        let mut store = ConfigStore::default();
        assert!(matches!(
            store.set(&["name"], Value::from("x")),
            Err(ConfigError::ReservedKey(s)) if s == "name"
        ));
        assert!(matches!(
            store.set(&["block1/sb2/location"], Value::from("x")),
            Err(ConfigError::ReservedKey(_))
        ));
        assert!(matches!(
            store.set(&["a//"], Value::from(1)),
            Err(ConfigError::TrailingWildcard(s)) if s == "a//"
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn rejects_empty_selector() {
        let mut store = ConfigStore::default();
        assert!(matches!(
            store.set::<&str>(&[], Value::from(1)),
            Err(ConfigError::InvalidSelector { ref fragment, .. }) if fragment.is_empty()
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn splice_validates_prefix_without_entries() {
        let mut store = ConfigStore::default();
        assert!(matches!(
            store.splice(&["a///b"], vec![]),
            Err(ConfigError::InvalidSelector { ref fragment, .. }) if fragment == "a///b"
        ));
        store.splice(&["a//b"], vec![]).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn splice_prefixes_selectors() {
        let mut store = ConfigStore::default();
        store
            .splice(
                &["//"],
                vec![
                    ("seed".to_string(), Value::from(1)),
                    ("meta/reload".to_string(), Value::from(true)),
                ],
            )
            .unwrap();
        let keys: Vec<String> = store.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["//meta/reload", "//seed"]);
    }

    #[test]
    fn entries_below_location() {
        let store = store(&[
            ("block1/seed", Value::from(1)),
            ("block2/seed", Value::from(2)),
            ("//lrate", Value::from(3)),
        ]);
        assert_eq!(
            store.entries_below(&["block1"]),
            vec![
                ("//lrate".to_string(), Value::from(3)),
                ("seed".to_string(), Value::from(1)),
            ]
        );
    }
}
