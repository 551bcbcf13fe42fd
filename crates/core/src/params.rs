//! Parameter records and their canonical renderings.
//!
//! A [`ParamRecord`] is an insertion-ordered `key -> JSON value` map. Two
//! renderings are derived from it and must not be conflated:
//!
//! - [`ParamRecord::render_human`] -- public keys in insertion order, used in
//!   reports and diagnostics (`x:1;s:"a"`).
//! - [`ParamRecord::render_unique`] -- public keys sorted, values
//!   canonicalized, used for duplicate detection. Records with equal unique
//!   renderings are duplicates even if their human renderings differ.
//!
//! Keys starting with `_` are private: they reach the test body but are not
//! part of a case's identity.

mod finite;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::error::DeclarationError;

/// Prefix marking a parameter key as private.
pub const PRIVATE_KEY_PREFIX: char = '_';
/// Separator between `key:value` pairs in rendered records.
pub const PARAM_SEPARATOR: char = ';';
/// Separator between a key and its JSON value in rendered records.
pub const PARAM_KV_SEPARATOR: char = ':';

/// Returns whether `key` participates in a case's public identity.
pub fn param_key_is_public(key: &str) -> bool {
    !key.starts_with(PRIVATE_KEY_PREFIX)
}

/// An insertion-ordered record of named parameter values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParamRecord(Map<String, Value>);

impl ParamRecord {
    pub fn new() -> Self {
        ParamRecord(Map::new())
    }

    /// Insert or overwrite a value. Keeps the original position on overwrite.
    ///
    /// # Panics
    ///
    /// If `value` cannot be represented as JSON, including non-finite
    /// floats. Use [`ParamRecord::try_insert`] to get the error instead.
    #[track_caller]
    pub fn insert(&mut self, key: impl Into<String>, value: impl Serialize) {
        if let Err(e) = self.try_insert(key, value) {
            panic!("{}", e);
        }
    }

    pub fn try_insert(
        &mut self,
        key: impl Into<String>,
        value: impl Serialize,
    ) -> Result<(), DeclarationError> {
        let key = key.into();
        match to_param_value(&value) {
            Ok(value) => {
                self.0.insert(key, value);
                Ok(())
            }
            Err(reason) => Err(DeclarationError::InvalidParam { key, reason }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Deserialize a single value into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.0
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns `self` with every entry of `other` layered on top.
    pub fn merge(&self, other: &ParamRecord) -> ParamRecord {
        let mut merged = self.0.clone();
        for (k, v) in &other.0 {
            merged.insert(k.clone(), v.clone());
        }
        ParamRecord(merged)
    }

    /// Strips private keys, leaving only the identity-bearing parameters.
    pub fn public_view(&self) -> ParamRecord {
        ParamRecord(
            self.0
                .iter()
                .filter(|(k, _)| param_key_is_public(k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Human-readable rendering of the public parameters, in insertion order.
    pub fn render_human(&self) -> String {
        self.0
            .iter()
            .filter(|(k, _)| param_key_is_public(k))
            .map(|(k, v)| format!("{}{}{}", k, PARAM_KV_SEPARATOR, v))
            .collect::<Vec<_>>()
            .join(&PARAM_SEPARATOR.to_string())
    }

    /// Order-insensitive, canonicalized rendering of the public parameters.
    pub fn render_unique(&self) -> String {
        let mut keys: Vec<&String> = self.0.keys().filter(|k| param_key_is_public(k)).collect();
        keys.sort();
        keys.into_iter()
            .map(|k| {
                // Quoted so separators inside a key cannot forge another record.
                let mut out = Value::String(k.clone()).to_string();
                out.push(PARAM_KV_SEPARATOR);
                write_canonical(&self.0[k.as_str()], &mut out);
                out
            })
            .collect::<Vec<_>>()
            .join(&PARAM_SEPARATOR.to_string())
    }
}

impl fmt::Display for ParamRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_human())
    }
}

impl From<Map<String, Value>> for ParamRecord {
    fn from(map: Map<String, Value>) -> Self {
        ParamRecord(map)
    }
}

impl TryFrom<Value> for ParamRecord {
    type Error = Value;

    /// Only JSON objects convert; anything else is handed back unchanged.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(ParamRecord(map)),
            other => Err(other),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for ParamRecord {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        ParamRecord(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Build a [`ParamRecord`] from `key => value` pairs.
///
/// ```
/// use casework_core::params;
///
/// let p = params! { "x" => 1, "format" => "rgba8unorm" };
/// assert_eq!(p.render_human(), r#"x:1;format:"rgba8unorm""#);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::ParamRecord::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut record = $crate::ParamRecord::new();
        $( record.insert($key, $value); )+
        record
    }};
}

/// Convert `value` to JSON, refusing anything `serde_json` would lose.
pub(crate) fn to_param_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, String> {
    finite::check(value).map_err(|e| e.to_string())?;
    serde_json::to_value(value).map_err(|e| e.to_string())
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Number(n) => out.push_str(&canonical_number(n)),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, k) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(k.clone()).to_string());
                out.push(':');
                write_canonical(&map[k.as_str()], out);
            }
            out.push('}');
        }
        other => out.push_str(&other.to_string()),
    }
}

// Integral floats collapse onto their integer spelling; -0 stays distinct.
fn canonical_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f == 0.0 && f.is_sign_negative() => "-0".to_string(),
        Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}
