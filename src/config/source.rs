use super::grammar::{join_valid, validate_selector_parts};
use super::{Conf, ConfigError, Value};

/// One flattened entry produced by a source: selector fragments and a value.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigEntry {
    pub selector: Vec<String>,
    pub value: Value,
}

impl ConfigEntry {
    pub fn new(selector: Vec<String>, value: Value) -> Self {
        Self { selector, value }
    }

    /// The selector in joined display form.
    pub fn selector_string(&self) -> String {
        join_valid(&self.selector)
    }
}

/// A layer of configuration entries.
pub trait ConfigSource: Send + Sync + std::fmt::Debug {
    fn entries(&self) -> Result<Vec<ConfigEntry>, ConfigError>;
}

/// A root configuration contributes its flattened entries unchanged.
impl ConfigSource for Conf {
    fn entries(&self) -> Result<Vec<ConfigEntry>, ConfigError> {
        Ok(self
            .root_entries::<&str>(&[])?
            .into_iter()
            .map(|(selector, value)| ConfigEntry::new(vec![selector], value))
            .collect())
    }
}

/// Flattens a TOML table into entries.
///
/// Keys are selector fragments; a nested table contributes its entries
/// under its key as a prefix, the same way a nested configuration is
/// spliced.
pub fn flatten_table(
    table: toml::Table,
    prefix: &[String],
) -> Result<Vec<ConfigEntry>, ConfigError> {
    let mut entries = Vec::new();
    for (key, value) in table {
        let mut selector = prefix.to_vec();
        selector.push(key);
        match value {
            toml::Value::Table(nested) => {
                validate_selector_parts(&selector)?;
                entries.extend(flatten_table(nested, &selector)?);
            }
            value => {
                let value = from_toml(value, &selector)?;
                entries.push(ConfigEntry::new(selector, value));
            }
        }
    }
    Ok(entries)
}

fn from_toml(value: toml::Value, selector: &[String]) -> Result<Value, ConfigError> {
    Ok(match value {
        toml::Value::String(s) => Value::Text(s),
        toml::Value::Integer(i) => Value::Integer(i),
        toml::Value::Float(f) => Value::Float(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::Text(dt.to_string()),
        toml::Value::Array(items) => Value::List(
            items
                .into_iter()
                .map(|item| match item {
                    toml::Value::Table(_) => Err(ConfigError::UnsupportedValue {
                        selector: join_valid(selector),
                        kind: "table inside array",
                    }),
                    item => from_toml(item, selector),
                })
                .collect::<Result<Vec<_>, _>>()?,
        ),
        toml::Value::Table(_) => {
            return Err(ConfigError::UnsupportedValue {
                selector: join_valid(selector),
                kind: "table",
            })
        }
    })
}
