//! Flat, typed option sets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// One option value as delivered by an input front end.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl OptionValue {
    /// Name of the variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            OptionValue::Bool(_) => "bool",
            OptionValue::Int(_) => "integer",
            OptionValue::Float(_) => "float",
            OptionValue::Str(_) => "string",
        }
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Int(v)
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        OptionValue::Float(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Str(v.to_string())
    }
}

/// Option name to value.
pub type OptionMap = BTreeMap<String, OptionValue>;

/// Typed lookups over an [`OptionMap`]. `Ok(None)` means the key is absent.
pub(crate) struct OptionReader<'a> {
    map: &'a OptionMap,
}

impl<'a> OptionReader<'a> {
    pub(crate) fn new(map: &'a OptionMap) -> Self {
        Self { map }
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    fn mismatch<T>(key: &str, expected: &'static str) -> Result<T, ConfigError> {
        Err(ConfigError::TypeMismatch {
            key: key.to_string(),
            expected,
        })
    }

    /// Floats accept integer values.
    pub(crate) fn f64(&self, key: &str) -> Result<Option<f64>, ConfigError> {
        match self.map.get(key) {
            None => Ok(None),
            Some(OptionValue::Float(v)) => Ok(Some(*v)),
            Some(OptionValue::Int(v)) => Ok(Some(*v as f64)),
            Some(_) => Self::mismatch(key, "a number"),
        }
    }

    pub(crate) fn i64(&self, key: &str) -> Result<Option<i64>, ConfigError> {
        match self.map.get(key) {
            None => Ok(None),
            Some(OptionValue::Int(v)) => Ok(Some(*v)),
            Some(_) => Self::mismatch(key, "an integer"),
        }
    }

    /// Non-negative integers.
    pub(crate) fn usize(&self, key: &str) -> Result<Option<usize>, ConfigError> {
        match self.i64(key)? {
            None => Ok(None),
            Some(v) => usize::try_from(v).map(Some).map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                reason: format!("{} is negative", v),
            }),
        }
    }

    /// Booleans accept the integers 0 and 1.
    pub(crate) fn bool(&self, key: &str) -> Result<Option<bool>, ConfigError> {
        match self.map.get(key) {
            None => Ok(None),
            Some(OptionValue::Bool(v)) => Ok(Some(*v)),
            Some(OptionValue::Int(0)) => Ok(Some(false)),
            Some(OptionValue::Int(1)) => Ok(Some(true)),
            Some(_) => Self::mismatch(key, "a boolean"),
        }
    }

    pub(crate) fn str(&self, key: &str) -> Result<Option<&'a str>, ConfigError> {
        match self.map.get(key) {
            None => Ok(None),
            Some(OptionValue::Str(v)) => Ok(Some(v.as_str())),
            Some(_) => Self::mismatch(key, "a string"),
        }
    }

    /// Keys not in `known`.
    pub(crate) fn unknown_keys<'k>(&self, known: &'k [&'k str]) -> Vec<&'a str> {
        self.map
            .keys()
            .map(String::as_str)
            .filter(|k| !known.contains(k))
            .collect()
    }
}
