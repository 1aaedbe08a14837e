// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for element values.

use crate::PortType;

/// Errors that can occur when producing element values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ElementError {
    /// A textual value could not be parsed as the requested element type.
    #[error("cannot parse '{text}' as {port_type}")]
    Parse { text: String, port_type: PortType },
}
