// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # port-types
//!
//! Element types that can flow through model ports.
//!
//! This crate provides:
//! - [`PortType`]: the runtime tag of a port's element type.
//! - [`Element`]: the compile-time side: every Rust type a port can carry
//!   (`bool`, `i32`, `i64`, `f32`, `f64`) maps to exactly one `PortType` and
//!   to a stable type name used in runtime type names and archives.
//! - [`Numeric`]: the arithmetic subset used by computational nodes.
//! - [`composite_type_name`]: builds names such as `InputNode<double>`.
//!
//! # Example
//! ```
//! use port_types::{composite_type_name, Element, PortType};
//!
//! assert_eq!(f64::PORT_TYPE, PortType::Real);
//! assert_eq!(composite_type_name::<f64>("InputNode"), "InputNode<double>");
//! assert_eq!(i32::parse_value(" 42 ").unwrap(), 42);
//! ```

mod element;
mod error;
mod port_type;

pub use element::{composite_type_name, Element, Numeric};
pub use error::ElementError;
pub use port_type::PortType;
