// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The archive value tree.
//!
//! Every value carries its type tag in the encoded form
//! (`{"type": "float", "value": 1.5}`), so a decoded archive never has to
//! guess whether `1` was an integer or a float.

use crate::ArchiveError;
use std::collections::BTreeMap;

/// A single typed property value.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ArchiveValue {
    /// Boolean flag.
    Bool(bool),
    /// Signed integer (all signed widths are stored as 64-bit).
    Int(i64),
    /// Unsigned integer (sizes, counts, identifiers).
    #[serde(rename = "uint")]
    UInt(u64),
    /// Floating point (`f32` values are widened losslessly).
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Ordered list of values.
    Array(Vec<ArchiveValue>),
    /// Nested named properties.
    Object(Archive),
}

impl ArchiveValue {
    /// Returns the type tag used in error messages and in the encoded form.
    pub fn kind(&self) -> &'static str {
        match self {
            ArchiveValue::Bool(_) => "bool",
            ArchiveValue::Int(_) => "int",
            ArchiveValue::UInt(_) => "uint",
            ArchiveValue::Float(_) => "float",
            ArchiveValue::String(_) => "string",
            ArchiveValue::Array(_) => "array",
            ArchiveValue::Object(_) => "object",
        }
    }

    fn wrong_type(&self, expected: &'static str) -> ArchiveError {
        ArchiveError::WrongType {
            expected,
            found: self.kind(),
        }
    }
}

/// A set of named properties, the unit an [`crate::Archivable`] writes into.
///
/// Properties are kept sorted by name so the encoded form is deterministic.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Archive {
    properties: BTreeMap<String, ArchiveValue>,
}

impl Archive {
    /// Creates an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a property.
    pub fn insert(&mut self, name: impl Into<String>, value: ArchiveValue) {
        self.properties.insert(name.into(), value);
    }

    /// Returns a property by name.
    pub fn get(&self, name: &str) -> Option<&ArchiveValue> {
        self.properties.get(name)
    }

    /// Returns `true` if the property exists.
    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` if no properties are present.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArchiveValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// ── Writing: Rust values → ArchiveValue ────────────────────────────

impl From<bool> for ArchiveValue {
    fn from(v: bool) -> Self {
        ArchiveValue::Bool(v)
    }
}

impl From<i32> for ArchiveValue {
    fn from(v: i32) -> Self {
        ArchiveValue::Int(i64::from(v))
    }
}

impl From<i64> for ArchiveValue {
    fn from(v: i64) -> Self {
        ArchiveValue::Int(v)
    }
}

impl From<u32> for ArchiveValue {
    fn from(v: u32) -> Self {
        ArchiveValue::UInt(u64::from(v))
    }
}

impl From<u64> for ArchiveValue {
    fn from(v: u64) -> Self {
        ArchiveValue::UInt(v)
    }
}

impl From<usize> for ArchiveValue {
    fn from(v: usize) -> Self {
        ArchiveValue::UInt(v as u64)
    }
}

impl From<f32> for ArchiveValue {
    fn from(v: f32) -> Self {
        ArchiveValue::Float(f64::from(v))
    }
}

impl From<f64> for ArchiveValue {
    fn from(v: f64) -> Self {
        ArchiveValue::Float(v)
    }
}

impl From<String> for ArchiveValue {
    fn from(v: String) -> Self {
        ArchiveValue::String(v)
    }
}

impl From<&str> for ArchiveValue {
    fn from(v: &str) -> Self {
        ArchiveValue::String(v.to_string())
    }
}

impl From<Archive> for ArchiveValue {
    fn from(v: Archive) -> Self {
        ArchiveValue::Object(v)
    }
}

impl<T: Into<ArchiveValue>> From<Vec<T>> for ArchiveValue {
    fn from(v: Vec<T>) -> Self {
        ArchiveValue::Array(v.into_iter().map(Into::into).collect())
    }
}

// ── Reading: ArchiveValue → Rust values ────────────────────────────

/// Typed conversion out of an [`ArchiveValue`].
///
/// Conversions are strict about the value kind: an integer property is never
/// silently read as a float or vice versa. Integer widths and `f32` are
/// range-checked; infinities and NaN pass through unchanged.
pub trait FromArchiveValue: Sized {
    /// Converts the value, failing with [`ArchiveError::WrongType`] or
    /// [`ArchiveError::OutOfRange`].
    fn from_archive_value(value: &ArchiveValue) -> Result<Self, ArchiveError>;
}

impl FromArchiveValue for bool {
    fn from_archive_value(value: &ArchiveValue) -> Result<Self, ArchiveError> {
        match value {
            ArchiveValue::Bool(b) => Ok(*b),
            other => Err(other.wrong_type("bool")),
        }
    }
}

impl FromArchiveValue for i64 {
    fn from_archive_value(value: &ArchiveValue) -> Result<Self, ArchiveError> {
        match value {
            ArchiveValue::Int(v) => Ok(*v),
            ArchiveValue::UInt(v) => i64::try_from(*v).map_err(|_| ArchiveError::OutOfRange {
                target: "i64",
                value: v.to_string(),
            }),
            other => Err(other.wrong_type("int")),
        }
    }
}

impl FromArchiveValue for i32 {
    fn from_archive_value(value: &ArchiveValue) -> Result<Self, ArchiveError> {
        let wide = i64::from_archive_value(value)?;
        i32::try_from(wide).map_err(|_| ArchiveError::OutOfRange {
            target: "i32",
            value: wide.to_string(),
        })
    }
}

impl FromArchiveValue for u64 {
    fn from_archive_value(value: &ArchiveValue) -> Result<Self, ArchiveError> {
        match value {
            ArchiveValue::UInt(v) => Ok(*v),
            ArchiveValue::Int(v) => u64::try_from(*v).map_err(|_| ArchiveError::OutOfRange {
                target: "u64",
                value: v.to_string(),
            }),
            other => Err(other.wrong_type("uint")),
        }
    }
}

impl FromArchiveValue for u32 {
    fn from_archive_value(value: &ArchiveValue) -> Result<Self, ArchiveError> {
        let wide = u64::from_archive_value(value)?;
        u32::try_from(wide).map_err(|_| ArchiveError::OutOfRange {
            target: "u32",
            value: wide.to_string(),
        })
    }
}

impl FromArchiveValue for usize {
    fn from_archive_value(value: &ArchiveValue) -> Result<Self, ArchiveError> {
        let wide = u64::from_archive_value(value)?;
        usize::try_from(wide).map_err(|_| ArchiveError::OutOfRange {
            target: "usize",
            value: wide.to_string(),
        })
    }
}

impl FromArchiveValue for f64 {
    fn from_archive_value(value: &ArchiveValue) -> Result<Self, ArchiveError> {
        match value {
            ArchiveValue::Float(v) => Ok(*v),
            other => Err(other.wrong_type("float")),
        }
    }
}

impl FromArchiveValue for f32 {
    fn from_archive_value(value: &ArchiveValue) -> Result<Self, ArchiveError> {
        // Values written from f32 were widened exactly, so narrowing restores them.
        let wide = f64::from_archive_value(value)?;
        if wide.is_finite() && wide.abs() > f64::from(f32::MAX) {
            return Err(ArchiveError::OutOfRange {
                target: "f32",
                value: wide.to_string(),
            });
        }
        Ok(wide as f32)
    }
}

impl FromArchiveValue for String {
    fn from_archive_value(value: &ArchiveValue) -> Result<Self, ArchiveError> {
        match value {
            ArchiveValue::String(s) => Ok(s.clone()),
            other => Err(other.wrong_type("string")),
        }
    }
}

impl FromArchiveValue for Archive {
    fn from_archive_value(value: &ArchiveValue) -> Result<Self, ArchiveError> {
        match value {
            ArchiveValue::Object(a) => Ok(a.clone()),
            other => Err(other.wrong_type("object")),
        }
    }
}

impl<T: FromArchiveValue> FromArchiveValue for Vec<T> {
    fn from_archive_value(value: &ArchiveValue) -> Result<Self, ArchiveError> {
        match value {
            ArchiveValue::Array(items) => items.iter().map(T::from_archive_value).collect(),
            other => Err(other.wrong_type("array")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(ArchiveValue::from(true).kind(), "bool");
        assert_eq!(ArchiveValue::from(-3i32).kind(), "int");
        assert_eq!(ArchiveValue::from(3usize).kind(), "uint");
        assert_eq!(ArchiveValue::from(1.5f32).kind(), "float");
        assert_eq!(ArchiveValue::from("x").kind(), "string");
        assert_eq!(ArchiveValue::from(vec![1i64, 2]).kind(), "array");
        assert_eq!(ArchiveValue::from(Archive::new()).kind(), "object");
    }

    #[test]
    fn test_f32_widening_is_exact() {
        let original = 0.1f32;
        let value = ArchiveValue::from(original);
        assert_eq!(f32::from_archive_value(&value).unwrap(), original);
    }

    #[test]
    fn test_f32_range_check() {
        let big = ArchiveValue::Float(f64::from(f32::MAX) * 2.0);
        assert!(matches!(
            f32::from_archive_value(&big),
            Err(ArchiveError::OutOfRange { target: "f32", .. })
        ));
        let min = ArchiveValue::from(f32::MIN);
        assert_eq!(f32::from_archive_value(&min).unwrap(), f32::MIN);
        let inf = ArchiveValue::Float(f64::NEG_INFINITY);
        assert_eq!(f32::from_archive_value(&inf).unwrap(), f32::NEG_INFINITY);
    }

    #[test]
    fn test_strict_kinds() {
        let int = ArchiveValue::Int(1);
        assert!(matches!(
            f64::from_archive_value(&int),
            Err(ArchiveError::WrongType { expected: "float", found: "int" })
        ));
        assert!(bool::from_archive_value(&int).is_err());
    }

    #[test]
    fn test_integer_range_checks() {
        let big = ArchiveValue::Int(i64::from(i32::MAX) + 1);
        assert!(matches!(
            i32::from_archive_value(&big),
            Err(ArchiveError::OutOfRange { target: "i32", .. })
        ));

        let negative = ArchiveValue::Int(-1);
        assert!(u64::from_archive_value(&negative).is_err());

        // Non-negative signed values are accepted where unsigned is expected.
        assert_eq!(usize::from_archive_value(&ArchiveValue::Int(7)).unwrap(), 7);
    }

    #[test]
    fn test_vec_conversion() {
        let value = ArchiveValue::from(vec![1.0f64, 2.0, 3.0]);
        let back: Vec<f64> = Vec::from_archive_value(&value).unwrap();
        assert_eq!(back, vec![1.0, 2.0, 3.0]);

        let mixed = ArchiveValue::Array(vec![ArchiveValue::Float(1.0), ArchiveValue::Bool(true)]);
        assert!(Vec::<f64>::from_archive_value(&mixed).is_err());
    }

    #[test]
    fn test_archive_is_sorted() {
        let mut archive = Archive::new();
        archive.insert("zeta", ArchiveValue::Bool(true));
        archive.insert("alpha", ArchiveValue::Bool(false));
        let names: Vec<_> = archive.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        assert_eq!(archive.len(), 2);
        assert!(archive.contains("alpha"));
    }

    #[test]
    fn test_tagged_encoding() {
        let json = serde_json::to_string(&ArchiveValue::Float(1.5)).unwrap();
        assert_eq!(json, r#"{"type":"float","value":1.5}"#);

        let back: ArchiveValue = serde_json::from_str(r#"{"type":"uint","value":4}"#).unwrap();
        assert_eq!(back, ArchiveValue::UInt(4));
        assert_eq!(back.kind(), "uint");
    }
}
