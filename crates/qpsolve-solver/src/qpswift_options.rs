use qpsolve_types::{QpError, Result};
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Option keys understood by qpSWIFT
pub mod keys {
    /// Maximum number of iterations
    pub const MAXITER: &str = "MAXITER";
    /// Absolute tolerance
    pub const ABSTOL: &str = "ABSTOL";
    /// Relative tolerance
    pub const RELTOL: &str = "RELTOL";
    /// Maximum centering allowed
    pub const SIGMA: &str = "SIGMA";
    /// Output shape; 1 includes the solution and basic info. Set by the adapter.
    pub const OUTPUT: &str = "OUTPUT";
    /// Verbosity, 0 or 1. Set by the adapter.
    pub const VERBOSE: &str = "VERBOSE";
}

/// Numeric value of a qpSWIFT option
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Int(i64),
    Float(f64),
}

impl OptionValue {
    pub fn as_f64(&self) -> f64 {
        match *self {
            OptionValue::Int(v) => v as f64,
            OptionValue::Float(v) => v,
        }
    }

    /// Integer view; floats are accepted only when they hold a whole number
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            OptionValue::Int(v) => Some(v),
            OptionValue::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(v as i64),
            OptionValue::Float(_) => None,
        }
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Int(v)
    }
}

impl From<i32> for OptionValue {
    fn from(v: i32) -> Self {
        OptionValue::Int(v.into())
    }
}

impl From<u32> for OptionValue {
    fn from(v: u32) -> Self {
        OptionValue::Int(v.into())
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        OptionValue::Float(v)
    }
}

/// Option dictionary passed to qpSWIFT
///
/// Keys are passed through untouched except for [`keys::OUTPUT`] and
/// [`keys::VERBOSE`], which the adapter overwrites on its own copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QpSwiftOptions(BTreeMap<String, OptionValue>);

impl QpSwiftOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON object such as `{"MAXITER": 50, "RELTOL": 1e-8}`
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| QpError::ConfigError(format!("invalid qpSWIFT options: {}", e)))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| QpError::ConfigError(format!("cannot serialize qpSWIFT options: {}", e)))
    }

    /// Set `key`, replacing any previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Option<OptionValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<OptionValue> {
        self.0.get(key).copied()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, OptionValue> {
        self.0.iter()
    }

    pub fn with_max_iter(mut self, max_iter: u32) -> Self {
        self.insert(keys::MAXITER, max_iter);
        self
    }

    pub fn with_abs_tol(mut self, tol: f64) -> Self {
        self.insert(keys::ABSTOL, tol);
        self
    }

    pub fn with_rel_tol(mut self, tol: f64) -> Self {
        self.insert(keys::RELTOL, tol);
        self
    }

    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.insert(keys::SIGMA, sigma);
        self
    }

    /// `MAXITER`, if present and a non-negative whole number
    pub fn max_iter(&self) -> Option<u32> {
        self.get(keys::MAXITER)
            .and_then(|v| v.as_i64())
            .and_then(|v| u32::try_from(v).ok())
    }

    pub fn abs_tol(&self) -> Option<f64> {
        self.get(keys::ABSTOL).map(|v| v.as_f64())
    }

    pub fn rel_tol(&self) -> Option<f64> {
        self.get(keys::RELTOL).map(|v| v.as_f64())
    }

    pub fn sigma(&self) -> Option<f64> {
        self.get(keys::SIGMA).map(|v| v.as_f64())
    }

    pub fn verbose(&self) -> bool {
        self.get(keys::VERBOSE).and_then(|v| v.as_i64()).unwrap_or(0) != 0
    }
}

impl<K: Into<String>, V: Into<OptionValue>> FromIterator<(K, V)> for QpSwiftOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        QpSwiftOptions(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<'a> IntoIterator for &'a QpSwiftOptions {
    type Item = (&'a String, &'a OptionValue);
    type IntoIter = btree_map::Iter<'a, String, OptionValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
