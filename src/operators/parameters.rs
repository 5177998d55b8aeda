//! String-keyed parameter bags.
//!
//! Algorithms and operators are configured from a [`Parameters`] map so a
//! host can assemble a run from names alone. Typed getters turn a missing
//! or mistyped entry into a [`MoeaError`] at construction time.

use crate::error::{MoeaError, Result};
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A loosely typed parameter value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParamValue {
    /// Integer value.
    Int(i64),
    /// Real value.
    Real(f64),
    /// Boolean flag.
    Bool(bool),
    /// Text, typically an operator name.
    Text(String),
}

impl ParamValue {
    fn kind(&self) -> &'static str {
        match self {
            ParamValue::Int(_) => "integer",
            ParamValue::Real(_) => "real",
            ParamValue::Bool(_) => "boolean",
            ParamValue::Text(_) => "text",
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<usize> for ParamValue {
    fn from(v: usize) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Real(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

/// An ordered map from parameter name to value.
///
/// Nested operator settings use dotted keys (`"mutation.probability"`)
/// and are handed to factories with [`scoped`](Self::scoped).
///
/// # Examples
///
/// ```
/// use u_moea::operators::Parameters;
///
/// let params = Parameters::new()
///     .with("swarmSize", 50)
///     .with("mutation", "PolynomialMutation")
///     .with("mutation.distributionIndex", 20.0);
///
/// assert_eq!(params.usize_or("swarmSize", 100).unwrap(), 50);
/// let mutation = params.scoped("mutation");
/// assert_eq!(mutation.f64_or("distributionIndex", 0.0).unwrap(), 20.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Parameters {
    values: BTreeMap<String, ParamValue>,
}

impl Parameters {
    /// An empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with<K: Into<String>, V: Into<ParamValue>>(mut self, key: K, value: V) -> Self {
        self.set(key, value);
        self
    }

    /// Builder-style insert that keeps an existing entry.
    pub fn with_default<K: Into<String>, V: Into<ParamValue>>(mut self, key: K, value: V) -> Self {
        self.values.entry(key.into()).or_insert_with(|| value.into());
        self
    }

    /// Inserts or replaces an entry.
    pub fn set<K: Into<String>, V: Into<ParamValue>>(&mut self, key: K, value: V) {
        self.values.insert(key.into(), value.into());
    }

    /// The raw value under `key`.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries under `prefix.` with the prefix stripped.
    pub fn scoped(&self, prefix: &str) -> Parameters {
        let dotted = format!("{prefix}.");
        Parameters {
            values: self
                .values
                .iter()
                .filter_map(|(k, v)| {
                    k.strip_prefix(&dotted)
                        .map(|rest| (rest.to_string(), v.clone()))
                })
                .collect(),
        }
    }

    /// A required non-negative integer.
    pub fn get_usize(&self, key: &str) -> Result<usize> {
        match self.require(key)? {
            ParamValue::Int(v) if *v >= 0 => Ok(*v as usize),
            ParamValue::Int(v) => Err(invalid(key, format!("expected a non-negative integer, got {v}"))),
            other => Err(invalid(key, format!("expected an integer, got {}", other.kind()))),
        }
    }

    /// A required unsigned 64-bit integer.
    pub fn get_u64(&self, key: &str) -> Result<u64> {
        self.get_usize(key).map(|v| v as u64)
    }

    /// A required real. Integers are widened.
    pub fn get_f64(&self, key: &str) -> Result<f64> {
        match self.require(key)? {
            ParamValue::Real(v) => Ok(*v),
            ParamValue::Int(v) => Ok(*v as f64),
            other => Err(invalid(key, format!("expected a number, got {}", other.kind()))),
        }
    }

    /// A required flag.
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        match self.require(key)? {
            ParamValue::Bool(v) => Ok(*v),
            other => Err(invalid(key, format!("expected a boolean, got {}", other.kind()))),
        }
    }

    /// A required text value.
    pub fn get_str(&self, key: &str) -> Result<&str> {
        match self.require(key)? {
            ParamValue::Text(v) => Ok(v),
            other => Err(invalid(key, format!("expected text, got {}", other.kind()))),
        }
    }

    /// An optional non-negative integer with a default.
    pub fn usize_or(&self, key: &str, default: usize) -> Result<usize> {
        self.optional(key, default, Self::get_usize)
    }

    /// An optional real with a default.
    pub fn f64_or(&self, key: &str, default: f64) -> Result<f64> {
        self.optional(key, default, Self::get_f64)
    }

    /// An optional flag with a default.
    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool> {
        self.optional(key, default, Self::get_bool)
    }

    /// An optional text value with a default.
    pub fn str_or<'a>(&'a self, key: &str, default: &'a str) -> Result<&'a str> {
        if self.contains(key) {
            self.get_str(key)
        } else {
            Ok(default)
        }
    }

    /// An optional seed.
    pub fn seed(&self, key: &str) -> Result<Option<u64>> {
        if self.contains(key) {
            self.get_u64(key).map(Some)
        } else {
            Ok(None)
        }
    }

    fn require(&self, key: &str) -> Result<&ParamValue> {
        self.values
            .get(key)
            .ok_or_else(|| MoeaError::MissingParameter(key.to_string()))
    }

    fn optional<T>(&self, key: &str, default: T, get: fn(&Self, &str) -> Result<T>) -> Result<T> {
        if self.contains(key) {
            get(self, key)
        } else {
            Ok(default)
        }
    }
}

fn invalid(key: &str, reason: String) -> MoeaError {
    MoeaError::InvalidParameter {
        key: key.to_string(),
        reason,
    }
}
