//! Hierarchical configuration: selectors, matching and location-scoped views.

mod builder;
mod env;
mod error;
mod file;
pub mod grammar;
pub mod matcher;
mod source;
mod specificity;
mod store;
mod value;
mod view;

pub use builder::ConfBuilder;
pub use env::EnvSource;
pub use error::ConfigError;
pub use file::FileSource;
pub use grammar::Key;
pub use matcher::MatchPolicy;
pub use source::{ConfigEntry, ConfigSource};
pub use specificity::Specificity;
pub use store::{ConfigStore, RESERVED_KEYS};
pub use value::{Handle, Setting, Value};
pub use view::Conf;
