//! Location-scoped handles onto a shared configuration store.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::{DeserializeOwned, Error as _};

use super::builder::ConfBuilder;
use super::grammar::{join_valid, parse_path, Key};
use super::matcher::MatchPolicy;
use super::store::ConfigStore;
use super::value::Setting;
use super::{ConfigError, Value};

/// A hierarchical configuration, viewed from a location.
///
/// Entries are registered under selectors and looked up by concrete paths
/// relative to the view's location. Every view derived from one root shares
/// the same store, so a [`set`](Self::set) through any of them is visible
/// to all of them.
///
/// ## Example
///
/// ```
/// use hierarchiconf::{Conf, Setting};
///
/// let root = Conf::new([
///     ("//", Setting::from(Conf::new([("seed", Setting::from(1))])?)),
///     ("block1/seed", Setting::from(2)),
/// ])?;
///
/// assert_eq!(root.get("block3/seed")?.as_integer(), Some(1));
/// assert_eq!(root.subconf("block1")?.get("seed")?.as_integer(), Some(2));
/// assert_eq!(root.subconf(["block1", "sb2"])?.get("location")?.as_str(), Some("block1/sb2"));
/// # Ok::<(), hierarchiconf::ConfigError>(())
/// ```
#[derive(Clone)]
pub struct Conf {
    store: Arc<RwLock<ConfigStore>>,
    location: Vec<String>,
}

impl Default for Conf {
    fn default() -> Self {
        Self::empty(MatchPolicy::default())
    }
}

impl Conf {
    /// Creates an empty root configuration.
    pub fn empty(policy: MatchPolicy) -> Self {
        Self {
            store: Arc::new(RwLock::new(ConfigStore::new(policy))),
            location: Vec::new(),
        }
    }

    /// Creates a root configuration from selector/setting pairs.
    ///
    /// Nested configurations are spliced in: their entries are stored under
    /// the pair's selector as a prefix, so `("//", nested)` turns a nested
    /// `seed` into `//seed`.
    pub fn new<I, K>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, Setting)>,
        K: Into<Key>,
    {
        Self::with_policy(MatchPolicy::default(), entries)
    }

    /// Like [`new`](Self::new), with an explicit wildcard policy.
    pub fn with_policy<I, K>(policy: MatchPolicy, entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, Setting)>,
        K: Into<Key>,
    {
        let conf = Self::empty(policy);
        for (key, setting) in entries {
            match setting {
                Setting::Value(value) => conf.set(key, value)?,
                Setting::Nested(nested) => conf.splice(key, &nested)?,
            }
        }
        Ok(conf)
    }

    /// Creates a builder layering configuration sources.
    pub fn builder() -> ConfBuilder {
        ConfBuilder::default()
    }

    pub fn policy(&self) -> MatchPolicy {
        self.store.read().policy()
    }

    /// The view's location in display form, empty at the root.
    pub fn location(&self) -> String {
        self.location.join("/")
    }

    /// The last element of the location, `None` at the root.
    pub fn name(&self) -> Option<&str> {
        self.location.last().map(String::as_str)
    }

    pub fn is_root(&self) -> bool {
        self.location.is_empty()
    }

    /// Looks up `path` relative to this view.
    ///
    /// A final `name` or `location` element is answered from the path itself
    /// rather than the store.
    pub fn get(&self, path: impl Into<Key>) -> Result<Value, ConfigError> {
        let path: Key = path.into();
        let path = parse_path(&path.prefixed(&self.location))?;
        if path.is_empty() {
            return Err(ConfigError::path("", "lookups need at least one path element"));
        }

        if let Some((last, parent)) = path.split_last() {
            match last.as_str() {
                "name" => {
                    return parent
                        .last()
                        .map(|name| Value::Text(name.clone()))
                        .ok_or_else(|| ConfigError::KeyNotFound(join_valid(&path)));
                }
                "location" => return Ok(Value::Text(parent.join("/"))),
                _ => {}
            }
        }

        self.store.read().get(&path)
    }

    /// Looks up `path`, falling back to `default` only when no selector
    /// matches. Grammar and ambiguity errors are still returned.
    pub fn get_or(
        &self,
        path: impl Into<Key>,
        default: impl Into<Value>,
    ) -> Result<Value, ConfigError> {
        match self.get(path) {
            Err(ConfigError::KeyNotFound(_)) => Ok(default.into()),
            other => other,
        }
    }

    /// Looks up `path` and deserializes the value into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, path: impl Into<Key>) -> Result<T, ConfigError> {
        let key: Key = path.into();
        let display = join_valid(&key.prefixed(&self.location));
        let value = self.get(key)?;
        let deserialize_error = |source| ConfigError::Deserialize {
            path: display.clone(),
            source,
        };
        let toml_value = value.to_toml().ok_or_else(|| {
            deserialize_error(toml::de::Error::custom(format!(
                "{} values cannot be deserialized",
                value.kind()
            )))
        })?;
        toml_value.try_into().map_err(deserialize_error)
    }

    /// Stores `value` under `selector`, relative to this view.
    pub fn set(
        &self,
        selector: impl Into<Key>,
        value: impl Into<Value>,
    ) -> Result<(), ConfigError> {
        let selector: Key = selector.into();
        let parts = selector.prefixed(&self.location);
        self.store.write().set(&parts, value.into())
    }

    /// Splices the entries of a root configuration under `selector`.
    pub fn splice(&self, selector: impl Into<Key>, nested: &Conf) -> Result<(), ConfigError> {
        let selector: Key = selector.into();
        let parts = selector.prefixed(&self.location);
        // Collected before taking the write lock: `nested` may share our store.
        let entries = nested.root_entries(&parts)?;
        self.store.write().splice(&parts, entries)
    }

    /// Sets every pair in order.
    ///
    /// Not atomic: if a pair fails, the pairs before it stay applied.
    pub fn update<I, K, V>(&self, entries: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        for (selector, value) in entries {
            self.set(selector, value)?;
        }
        Ok(())
    }

    /// Returns a view one or more levels below this one.
    ///
    /// `name` must be a path: wildcards and patterns are rejected.
    pub fn subconf(&self, name: impl Into<Key>) -> Result<Conf, ConfigError> {
        let name: Key = name.into();
        let location = parse_path(&name.prefixed(&self.location))?;
        Ok(Conf {
            store: Arc::clone(&self.store),
            location,
        })
    }

    /// Entries still reachable below this view, keyed by the part of their
    /// selector that remains after consuming the location.
    ///
    /// A selector that names the location itself is keyed by `""`; `Display`
    /// prints it as `.`.
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.store.read().entries_below(&self.location)
    }

    /// Flattened entries of a root configuration, for splicing under
    /// `target`.
    pub(crate) fn root_entries<S: AsRef<str>>(
        &self,
        target: &[S],
    ) -> Result<Vec<(String, Value)>, ConfigError> {
        if !self.is_root() {
            return Err(ConfigError::LocatedSplice {
                selector: join_valid(target),
                location: self.location(),
            });
        }
        Ok(self.store.read().entries())
    }
}

impl fmt::Display for Conf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (selector, value) in self.entries() {
            let selector = if selector.is_empty() { "." } else { selector.as_str() };
            writeln!(f, "{selector} = {value}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Conf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conf")
            .field("location", &self.location())
            .field("entries", &self.entries())
            .finish()
    }
}
