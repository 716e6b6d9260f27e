//! Application context holding the resolved configuration of one run.

use crate::config::{Conf, ConfigError, Key};
use crate::Error;

/// Central application context holding the root configuration.
///
/// Defaults are passed in explicitly as a base layer; there is no
/// process-wide default configuration. Components receive their own
/// sub-configuration via [`component()`](Self::component) and read their
/// parameters without knowing about their siblings.
///
/// ## Example
///
/// ```
/// use hierarchiconf::{AppContext, Conf, Setting, Value};
///
/// let defaults = Conf::new([("//seed", Setting::from(1234))])?;
/// let layers = Value::from(vec![25, 25]);
/// let run = Conf::new([("model/layers", Setting::from(layers))])?;
///
/// let ctx = AppContext::builder()
///     .with_base(defaults)
///     .with_config(run)
///     .build()?;
///
/// let model = ctx.component("model")?;
/// assert_eq!(model.get("seed")?.as_integer(), Some(1234));
/// assert_eq!(model.get("name")?.as_str(), Some("model"));
/// # Ok::<(), hierarchiconf::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct AppContext {
    root: Conf,
}

impl AppContext {
    /// Creates a new builder for constructing an `AppContext`.
    pub fn builder() -> AppContextBuilder {
        AppContextBuilder::default()
    }

    /// Returns the root configuration view.
    pub fn root(&self) -> &Conf {
        &self.root
    }

    /// Returns the sub-configuration of a named component.
    pub fn component(&self, name: impl Into<Key>) -> Result<Conf, ConfigError> {
        self.root.subconf(name)
    }
}

/// Builder for constructing an [`AppContext`].
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct AppContextBuilder {
    base: Option<Conf>,
    config: Option<Conf>,
}

impl AppContextBuilder {
    /// Sets the defaults that the run configuration is layered over.
    pub fn with_base(mut self, base: Conf) -> Self {
        self.base = Some(base);
        self
    }

    /// Attaches the run configuration.
    pub fn with_config(mut self, config: Conf) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the `AppContext`.
    ///
    /// Returns an error if no run configuration was provided, or if either
    /// layer is a located view rather than a root configuration.
    pub fn build(self) -> Result<AppContext, Error> {
        let config = self.config.ok_or(Error::MissingConfig)?;

        let mut layers = Conf::builder().with_policy(config.policy());
        if let Some(base) = self.base {
            layers = layers.with_conf(base);
        }
        let root = layers.with_conf(config).build()?;

        Ok(AppContext { root })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Setting, Value};

    #[test]
    fn missing_config_is_an_error() {
        let result = AppContext::builder().with_base(Conf::default()).build();
        assert!(matches!(result, Err(Error::MissingConfig)));
    }

    #[test]
    fn run_config_is_layered_over_base() {
        let base = Conf::new([
            ("//seed", Setting::from(1)),
            ("//use_bias", Setting::from(true)),
        ])
        .unwrap();
        let run = Conf::new([
            ("//seed", Setting::from(2)),
            ("trainer/num_epochs", Setting::from(10)),
        ])
        .unwrap();

        let ctx = AppContext::builder()
            .with_base(base)
            .with_config(run)
            .build()
            .unwrap();

        let trainer = ctx.component("trainer").unwrap();
        assert_eq!(trainer.get("seed").unwrap(), Value::from(2));
        assert_eq!(trainer.get("use_bias").unwrap(), Value::from(true));
        assert_eq!(trainer.get("num_epochs").unwrap(), Value::from(10));
        assert_eq!(ctx.root().get("trainer/location").unwrap(), Value::from("trainer"));
    }

    #[test]
    fn located_layers_are_rejected() {
        let run = Conf::new([("model/seed", Setting::from(1))]).unwrap();
        let located = run.subconf("model").unwrap();
        let result = AppContext::builder().with_config(located).build();
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::LocatedSplice { .. }))
        ));
    }

    #[test]
    fn context_copies_layers() {
        let run = Conf::new([("seed", Setting::from(1))]).unwrap();
        let ctx = AppContext::builder().with_config(run.clone()).build().unwrap();
        ctx.root().set("seed", 5).unwrap();
        assert_eq!(run.get("seed").unwrap(), Value::from(1));
        assert_eq!(ctx.root().get("seed").unwrap(), Value::from(5));
    }
}
