//! Values stored in a configuration.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::view::Conf;

/// A configuration value.
///
/// Scalars, text and lists cover what configuration files can express.
/// [`Handle`] carries application objects such as parameter initializers,
/// which consumers recover with [`Value::downcast_ref`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
    Handle(Handle),
}

impl Value {
    /// Wraps an application object.
    pub fn handle<T: Any + Send + Sync>(object: T) -> Self {
        Value::Handle(Handle::new(object))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float, widening integers.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Handle(handle) => handle.downcast_ref(),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Handle(_) => "handle",
        }
    }

    /// Converts into a TOML value. Handles have no TOML form.
    pub(crate) fn to_toml(&self) -> Option<toml::Value> {
        Some(match self {
            Value::Bool(b) => toml::Value::Boolean(*b),
            Value::Integer(i) => toml::Value::Integer(*i),
            Value::Float(f) => toml::Value::Float(*f),
            Value::Text(s) => toml::Value::String(s.clone()),
            Value::List(items) => toml::Value::Array(
                items
                    .iter()
                    .map(Value::to_toml)
                    .collect::<Option<Vec<_>>>()?,
            ),
            Value::Handle(_) => return None,
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Text(s) => write!(f, "{s:?}"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Handle(handle) => write!(f, "<{}>", handle.type_name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<Handle> for Value {
    fn from(handle: Handle) -> Self {
        Value::Handle(handle)
    }
}

/// A shared, type-erased application object.
///
/// Two handles are equal only when they point at the same object.
#[derive(Clone)]
pub struct Handle {
    type_name: &'static str,
    object: Arc<dyn Any + Send + Sync>,
}

impl Handle {
    pub fn new<T: Any + Send + Sync>(object: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            object: Arc::new(object),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.object.downcast_ref()
    }
}

impl PartialEq for Handle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.object, &other.object)
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.type_name).finish()
    }
}

/// A construction-time value: either a plain value or a root configuration
/// whose entries are spliced in under the key's selector.
#[derive(Debug, Clone)]
pub enum Setting {
    Value(Value),
    Nested(Conf),
}

impl Setting {
    pub fn value(value: impl Into<Value>) -> Self {
        Setting::Value(value.into())
    }
}

impl From<Value> for Setting {
    fn from(value: Value) -> Self {
        Setting::Value(value)
    }
}

impl From<Conf> for Setting {
    fn from(conf: Conf) -> Self {
        Setting::Nested(conf)
    }
}

impl From<bool> for Setting {
    fn from(b: bool) -> Self {
        Setting::Value(b.into())
    }
}

impl From<i64> for Setting {
    fn from(i: i64) -> Self {
        Setting::Value(i.into())
    }
}

impl From<i32> for Setting {
    fn from(i: i32) -> Self {
        Setting::Value(i.into())
    }
}

impl From<f64> for Setting {
    fn from(f: f64) -> Self {
        Setting::Value(f.into())
    }
}

impl From<&str> for Setting {
    fn from(s: &str) -> Self {
        Setting::Value(s.into())
    }
}

impl From<String> for Setting {
    fn from(s: String) -> Self {
        Setting::Value(s.into())
    }
}
