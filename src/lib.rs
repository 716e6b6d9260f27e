pub mod config;
pub mod context;
mod error;

pub use config::{Conf, ConfigError, Handle, Key, MatchPolicy, Setting, Specificity, Value};
pub use context::AppContext;
pub use error::Error;
