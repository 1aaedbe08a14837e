// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Runtime element-type tags for ports.

/// Enumerates the element types a port can hold.
///
/// Two ports can only be connected when their `PortType`s are equal. The
/// string form returned by [`as_str`](PortType::as_str) is part of every
/// runtime type name (`InputNode<double>`) and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortType {
    /// `bool`.
    Boolean,
    /// 32-bit signed integer (`i32`).
    Integer,
    /// 64-bit signed integer (`i64`).
    BigInt,
    /// 32-bit IEEE 754 floating point (`f32`).
    SmallReal,
    /// 64-bit IEEE 754 floating point (`f64`).
    Real,
}

impl PortType {
    /// All port types, in declaration order.
    pub const ALL: [PortType; 5] = [
        PortType::Boolean,
        PortType::Integer,
        PortType::BigInt,
        PortType::SmallReal,
        PortType::Real,
    ];

    /// Returns the size of a single element in bytes.
    pub fn size_bytes(self) -> usize {
        match self {
            PortType::Boolean => 1,
            PortType::Integer => 4,
            PortType::BigInt => 8,
            PortType::SmallReal => 4,
            PortType::Real => 8,
        }
    }

    /// Returns the stable type name.
    pub fn as_str(self) -> &'static str {
        match self {
            PortType::Boolean => "bool",
            PortType::Integer => "int",
            PortType::BigInt => "int64",
            PortType::SmallReal => "float",
            PortType::Real => "double",
        }
    }

    /// Returns `true` for types that support arithmetic.
    pub fn is_numeric(self) -> bool {
        !matches!(self, PortType::Boolean)
    }

    /// Parses a type name.
    ///
    /// Accepts the stable names (`"double"`) and Rust spellings (`"f64"`).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bool" | "boolean" => Some(PortType::Boolean),
            "int" | "i32" | "int32" => Some(PortType::Integer),
            "int64" | "i64" | "bigint" => Some(PortType::BigInt),
            "float" | "f32" | "float32" => Some(PortType::SmallReal),
            "double" | "f64" | "float64" | "real" => Some(PortType::Real),
            _ => None,
        }
    }
}

impl std::fmt::Display for PortType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
