// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`Element`] and [`Numeric`] traits.

use crate::{ElementError, PortType};
use ir_archive::{ArchiveValue, FromArchiveValue};
use std::fmt;
use std::str::FromStr;

/// A fixed-size, copyable value type that ports can carry.
///
/// The trait ties a Rust type to its [`PortType`] tag, its archive
/// representation and its text form. Implemented for `bool`, `i32`, `i64`,
/// `f32` and `f64`.
pub trait Element:
    Copy
    + Default
    + PartialEq
    + fmt::Debug
    + fmt::Display
    + FromStr
    + Into<ArchiveValue>
    + FromArchiveValue
    + 'static
{
    /// The runtime tag of this element type.
    const PORT_TYPE: PortType;

    /// The stable type name (`"double"`, `"int"`, ...).
    fn type_name() -> &'static str {
        Self::PORT_TYPE.as_str()
    }

    /// Parses a single value from text, ignoring surrounding whitespace.
    fn parse_value(text: &str) -> Result<Self, ElementError> {
        text.trim().parse().map_err(|_| ElementError::Parse {
            text: text.to_string(),
            port_type: Self::PORT_TYPE,
        })
    }
}

impl Element for bool {
    const PORT_TYPE: PortType = PortType::Boolean;

    fn parse_value(text: &str) -> Result<Self, ElementError> {
        match text.trim().to_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(ElementError::Parse {
                text: text.to_string(),
                port_type: PortType::Boolean,
            }),
        }
    }
}

impl Element for i32 {
    const PORT_TYPE: PortType = PortType::Integer;
}

impl Element for i64 {
    const PORT_TYPE: PortType = PortType::BigInt;
}

impl Element for f32 {
    const PORT_TYPE: PortType = PortType::SmallReal;
}

impl Element for f64 {
    const PORT_TYPE: PortType = PortType::Real;
}

/// Element types that support element-wise arithmetic.
///
/// Integer arithmetic wraps on overflow, so results never depend on the
/// build profile. Division returns `None` where the result is undefined
/// (integer division by zero or `MIN / -1`); float division follows IEEE 754.
pub trait Numeric: Element {
    /// `self + rhs`.
    fn sum(self, rhs: Self) -> Self;
    /// `self - rhs`.
    fn difference(self, rhs: Self) -> Self;
    /// `self * rhs`.
    fn product(self, rhs: Self) -> Self;
    /// `self / rhs`, or `None` if undefined for this type.
    fn quotient(self, rhs: Self) -> Option<Self>;
}

impl Numeric for i32 {
    fn sum(self, rhs: Self) -> Self {
        self.wrapping_add(rhs)
    }
    fn difference(self, rhs: Self) -> Self {
        self.wrapping_sub(rhs)
    }
    fn product(self, rhs: Self) -> Self {
        self.wrapping_mul(rhs)
    }
    fn quotient(self, rhs: Self) -> Option<Self> {
        self.checked_div(rhs)
    }
}

impl Numeric for i64 {
    fn sum(self, rhs: Self) -> Self {
        self.wrapping_add(rhs)
    }
    fn difference(self, rhs: Self) -> Self {
        self.wrapping_sub(rhs)
    }
    fn product(self, rhs: Self) -> Self {
        self.wrapping_mul(rhs)
    }
    fn quotient(self, rhs: Self) -> Option<Self> {
        self.checked_div(rhs)
    }
}

impl Numeric for f32 {
    fn sum(self, rhs: Self) -> Self {
        self + rhs
    }
    fn difference(self, rhs: Self) -> Self {
        self - rhs
    }
    fn product(self, rhs: Self) -> Self {
        self * rhs
    }
    fn quotient(self, rhs: Self) -> Option<Self> {
        Some(self / rhs)
    }
}

impl Numeric for f64 {
    fn sum(self, rhs: Self) -> Self {
        self + rhs
    }
    fn difference(self, rhs: Self) -> Self {
        self - rhs
    }
    fn product(self, rhs: Self) -> Self {
        self * rhs
    }
    fn quotient(self, rhs: Self) -> Option<Self> {
        Some(self / rhs)
    }
}

/// Builds a runtime type name qualified by an element type:
/// `composite_type_name::<f32>("ConstantNode")` is `"ConstantNode<float>"`.
pub fn composite_type_name<T: Element>(base: &str) -> String {
    format!("{base}<{}>", T::type_name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_types() {
        assert_eq!(bool::PORT_TYPE, PortType::Boolean);
        assert_eq!(i32::PORT_TYPE, PortType::Integer);
        assert_eq!(i64::PORT_TYPE, PortType::BigInt);
        assert_eq!(f32::PORT_TYPE, PortType::SmallReal);
        assert_eq!(f64::PORT_TYPE, PortType::Real);
    }

    #[test]
    fn test_composite_names() {
        assert_eq!(composite_type_name::<f64>("InputNode"), "InputNode<double>");
        assert_eq!(composite_type_name::<i64>("OutputNode"), "OutputNode<int64>");
        assert_eq!(composite_type_name::<bool>("ConstantNode"), "ConstantNode<bool>");
    }

    #[test]
    fn test_parse_values() {
        assert_eq!(f64::parse_value("2.5").unwrap(), 2.5);
        assert_eq!(i64::parse_value(" -7\n").unwrap(), -7);
        assert!(bool::parse_value("TRUE").unwrap());
        assert!(!bool::parse_value("0").unwrap());

        let err = i32::parse_value("1.5").unwrap_err();
        assert_eq!(err.to_string(), "cannot parse '1.5' as int");
    }

    #[test]
    fn test_integer_arithmetic_wraps() {
        assert_eq!(i32::MAX.sum(1), i32::MIN);
        assert_eq!(7i64.quotient(2), Some(3));
        assert_eq!(7i32.quotient(0), None);
        assert_eq!(i64::MIN.quotient(-1), None);
    }

    #[test]
    fn test_float_division() {
        assert_eq!(1.0f64.quotient(0.0), Some(f64::INFINITY));
        assert_eq!(3.0f32.product(2.0), 6.0);
        assert_eq!(1.5f64.difference(0.5), 1.0);
    }
}
