//! Dynamically typed values stored in a configuration registry

use serde::ser::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// An enum-like value: a named variant backed by an integer discriminant.
///
/// Rendered as `Type.Variant`, saved as the bare discriminant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    pub type_name: String,
    pub variant: String,
    pub value: i64,
}

impl EnumValue {
    pub fn new(type_name: impl Into<String>, variant: impl Into<String>, value: i64) -> Self {
        Self {
            type_name: type_name.into(),
            variant: variant.into(),
            value,
        }
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_name, self.variant)
    }
}

/// Current value of a configuration key
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Enum(EnumValue),
    /// Arrays and objects kept as raw JSON
    Json(Value),
}

impl ConfigValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(i) => Some(*i),
            ConfigValue::Enum(e) => Some(e.value),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ConfigValue::Int(i) => u64::try_from(*i).ok(),
            ConfigValue::Json(Value::Number(n)) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(f) => Some(*f),
            ConfigValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            ConfigValue::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// JSON form used when no save hook is defined for the key.
    ///
    /// JSON has no NaN or infinity; such floats map to `null`.
    /// [`ConfigRegistry::save_dict`](crate::ConfigRegistry::save_dict)
    /// rejects them instead of writing the `null`.
    pub fn to_json(&self) -> Value {
        match self {
            ConfigValue::Null => Value::Null,
            ConfigValue::Bool(b) => Value::Bool(*b),
            ConfigValue::Int(i) => Value::from(*i),
            ConfigValue::Float(f) => Value::from(*f),
            ConfigValue::Str(s) => Value::String(s.clone()),
            ConfigValue::Enum(e) => Value::from(e.value),
            ConfigValue::Json(v) => v.clone(),
        }
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Null => f.write_str("null"),
            ConfigValue::Bool(b) => write!(f, "{}", b),
            ConfigValue::Int(i) => write!(f, "{}", i),
            // Debug keeps the trailing ".0" on whole floats
            ConfigValue::Float(x) => write!(f, "{:?}", x),
            ConfigValue::Str(s) => f.write_str(s),
            ConfigValue::Enum(e) => write!(f, "{}", e),
            ConfigValue::Json(v) => write!(f, "{}", v),
        }
    }
}

impl From<Value> for ConfigValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ConfigValue::Null,
            Value::Bool(b) => ConfigValue::Bool(b),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => ConfigValue::Int(i),
                (None, Some(f)) if n.is_f64() => ConfigValue::Float(f),
                // Integers beyond i64 stay exact
                _ => ConfigValue::Json(Value::Number(n)),
            },
            Value::String(s) => ConfigValue::Str(s),
            other => ConfigValue::Json(other),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        ConfigValue::Int(value.into())
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Int(value)
    }
}

impl From<u32> for ConfigValue {
    fn from(value: u32) -> Self {
        ConfigValue::Int(value.into())
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Float(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Str(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Str(value)
    }
}

impl From<EnumValue> for ConfigValue {
    fn from(value: EnumValue) -> Self {
        ConfigValue::Enum(value)
    }
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ConfigValue::Null, Into::into)
    }
}
