use std::path::Path;

use super::env::EnvSource;
use super::file::FileSource;
use super::matcher::MatchPolicy;
use super::source::ConfigSource;
use super::{Conf, ConfigError};

/// Builder for layering configuration sources into one root [`Conf`].
///
/// Sources are applied in registration order. A later source overwrites an
/// entry only when it uses the identical (normalized) selector; distinct
/// selectors coexist and compete by specificity at lookup time.
///
/// ## Base configuration
///
/// Defaults are passed explicitly as the first layer rather than living in
/// any global:
///
/// ```no_run
/// use hierarchiconf::{Conf, Setting};
///
/// let defaults = Conf::new([("//", Setting::from(
///     Conf::new([("seed", Setting::from(1234)), ("use_bias", Setting::from(true))])?,
/// ))])?;
///
/// let conf = Conf::builder()
///     .with_conf(defaults)
///     .with_file("config/run.toml", true)
///     .with_env("MYAPP", "__")
///     .build()?;
/// # Ok::<(), hierarchiconf::ConfigError>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct ConfBuilder {
    sources: Vec<Box<dyn ConfigSource>>,
    policy: MatchPolicy,
}

impl ConfBuilder {
    /// Adds the entries of a root configuration.
    pub fn with_conf(self, conf: Conf) -> Self {
        self.with_source(conf)
    }

    /// Adds a TOML file to be loaded.
    ///
    /// If `required` is `true`, the build will fail if the file doesn't exist.
    /// Optional files that are missing are silently skipped.
    pub fn with_file(self, path: impl AsRef<Path>, required: bool) -> Self {
        self.with_source(FileSource::new(path, required))
    }

    /// Loads entries from environment variables with the given prefix.
    ///
    /// See [`EnvSource`] for how variable names map to selectors.
    pub fn with_env(self, prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        self.with_source(EnvSource::new(prefix, separator))
    }

    /// Adds any other source.
    pub fn with_source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Sets how wildcards choose between competing spans.
    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Loads every source in order into a new root configuration.
    pub fn build(self) -> Result<Conf, ConfigError> {
        let conf = Conf::empty(self.policy);

        for source in &self.sources {
            let entries = source.entries()?;
            tracing::debug!(?source, count = entries.len(), "applying configuration source");
            for entry in entries {
                conf.set(entry.selector, entry.value)?;
            }
        }

        Ok(conf)
    }
}
