// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for model construction, transformation and archival.

use crate::{NodeId, PortDirection, PortRef};
use ir_archive::ArchiveError;
use port_types::{ElementError, PortType};

/// Errors that can occur when building, computing, transforming or
/// loading a [`crate::Model`].
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A value sequence does not match a node's fixed dimension.
    #[error("{node}: expected {expected} values, got {actual}")]
    InvalidDimension {
        node: NodeId,
        expected: usize,
        actual: usize,
    },

    /// A port lookup by name failed.
    #[error("{node} has no {direction} port named '{port}'")]
    UnknownPort {
        node: NodeId,
        direction: PortDirection,
        port: String,
    },

    /// The node id is not part of the model.
    #[error("{0} is not part of the model")]
    UnknownNode(NodeId),

    /// The node exists but is not of the kind the operation needs.
    #[error("{node} is not {expected}")]
    WrongNodeKind {
        node: NodeId,
        expected: &'static str,
    },

    /// Connected ports disagree on their element type.
    #[error("type mismatch on {port}: expected {expected}, found {actual}")]
    TypeMismatch {
        port: String,
        expected: PortType,
        actual: PortType,
    },

    /// Connected ports or element sequences disagree on their size.
    #[error("size mismatch on {port}: expected {expected} elements, found {actual}")]
    SizeMismatch {
        port: String,
        expected: usize,
        actual: usize,
    },

    /// A port range reaches past the end of its upstream port.
    #[error("elements {start}..{end} of {target} are out of bounds (port size {size})")]
    RangeOutOfBounds {
        target: PortRef,
        start: usize,
        end: usize,
        size: usize,
    },

    /// Two nodes share the same id.
    #[error("duplicate node id {0}")]
    DuplicateNode(NodeId),

    /// A textual input value could not be parsed.
    #[error("invalid value for {node}: {source}")]
    InvalidValue {
        node: NodeId,
        #[source]
        source: ElementError,
    },

    /// Element-wise arithmetic produced an undefined result.
    #[error("arithmetic error in {node}: {detail}")]
    Arithmetic { node: NodeId, detail: String },

    /// The transformer was asked about a source node it has not visited.
    #[error("{node} has not been visited by the transformer yet")]
    NotYetVisited { node: NodeId },

    /// A transformer-only operation was called outside of a transform.
    #[error("model transformer is idle")]
    TransformerIdle,

    /// `transform_model` was called while a transform is in progress.
    #[error("model transformer is already transforming a model")]
    TransformerBusy,

    /// The port references form a cycle.
    #[error("model contains a dependency cycle ({} nodes unresolved)", .nodes.len())]
    CycleDetected { nodes: Vec<NodeId> },

    /// No factory is registered for an archived type name.
    #[error("unknown node type '{0}'")]
    UnknownNodeType(String),

    /// A port reference does not resolve to an existing output port.
    #[error("dangling reference to {target}: {detail}")]
    DanglingReference { target: PortRef, detail: String },

    /// Encoding, decoding or reading archived properties failed.
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),
}

/// Coarse classification of a [`ModelError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The caller broke a precondition of the API.
    ContractViolation,
    /// An operation was called in the wrong phase or order.
    OrderingViolation,
    /// An archive named a node type nobody registered.
    UnknownNodeType,
    /// A reference points at something that does not exist.
    DanglingReference,
    /// The persisted form itself is broken.
    Archive,
}

impl ModelError {
    /// Returns the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ModelError::InvalidDimension { .. }
            | ModelError::UnknownPort { .. }
            | ModelError::UnknownNode(_)
            | ModelError::WrongNodeKind { .. }
            | ModelError::TypeMismatch { .. }
            | ModelError::SizeMismatch { .. }
            | ModelError::RangeOutOfBounds { .. }
            | ModelError::DuplicateNode(_)
            | ModelError::InvalidValue { .. }
            | ModelError::Arithmetic { .. } => ErrorCategory::ContractViolation,
            ModelError::NotYetVisited { .. }
            | ModelError::TransformerIdle
            | ModelError::TransformerBusy
            | ModelError::CycleDetected { .. } => ErrorCategory::OrderingViolation,
            ModelError::UnknownNodeType(_) => ErrorCategory::UnknownNodeType,
            ModelError::DanglingReference { .. } => ErrorCategory::DanglingReference,
            ModelError::Archive(_) => ErrorCategory::Archive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let node = NodeId::from_raw(4);
        assert_eq!(
            ModelError::InvalidDimension { node, expected: 3, actual: 2 }.category(),
            ErrorCategory::ContractViolation
        );
        assert_eq!(
            ModelError::NotYetVisited { node }.category(),
            ErrorCategory::OrderingViolation
        );
        assert_eq!(
            ModelError::CycleDetected { nodes: vec![node] }.category(),
            ErrorCategory::OrderingViolation
        );
        assert_eq!(
            ModelError::UnknownNodeType("Foo<double>".into()).category(),
            ErrorCategory::UnknownNodeType
        );
        assert_eq!(
            ModelError::from(ArchiveError::UnknownFormat("yaml".into())).category(),
            ErrorCategory::Archive
        );
    }

    #[test]
    fn test_messages() {
        let node = NodeId::from_raw(7);
        let err = ModelError::InvalidDimension { node, expected: 3, actual: 2 };
        assert_eq!(err.to_string(), "node#7: expected 3 values, got 2");

        let err = ModelError::DanglingReference {
            target: PortRef::new(node, "output"),
            detail: "no such node".into(),
        };
        assert_eq!(
            err.to_string(),
            "dangling reference to node#7.output: no such node"
        );
    }
}
