// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`Node`] trait and the type-erased node-kind views.

use crate::{
    InputPortBase, Model, ModelError, ModelTransformer, NodeId, OutputPortBase, PortDirection,
};
use ir_archive::Archivable;
use port_types::PortType;
use std::any::Any;

/// A vertex of a [`Model`]: typed input and output ports plus a compute
/// contract.
///
/// Ports are declared at construction and never change afterwards. Inputs
/// refer to upstream output ports by id and name only, so a node can be
/// archived and rebuilt without any pointer fix-ups.
///
/// Dispatch is via vtable; concrete types are reached with
/// [`as_any`](Node::as_any) downcasts.
pub trait Node: Archivable + Any {
    fn id(&self) -> NodeId;

    /// Element-type-qualified name, e.g. `InputNode<double>`. Also the
    /// discriminator written to archives.
    fn runtime_type_name(&self) -> String;

    /// Input ports in declaration order.
    fn input_ports(&self) -> Vec<&dyn InputPortBase>;

    fn input_ports_mut(&mut self) -> Vec<&mut dyn InputPortBase>;

    /// Output ports in declaration order.
    fn output_ports(&self) -> Vec<&dyn OutputPortBase>;

    /// Reads the inputs through `model` and fills every output.
    fn compute(&self, model: &Model) -> Result<(), ModelError>;

    /// Builds the equivalent node in the transformer's destination model
    /// and maps this node's outputs onto it.
    fn copy(&self, transformer: &mut ModelTransformer) -> Result<(), ModelError>;

    /// Downcast support.
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Type-erased access for nodes that accept external input.
    fn as_input_node(&self) -> Option<&dyn InputNodeBase> {
        None
    }

    fn as_input_node_mut(&mut self) -> Option<&mut dyn InputNodeBase> {
        None
    }

    /// Type-erased access for nodes that mark a model result.
    fn as_output_node(&self) -> Option<&dyn OutputNodeBase> {
        None
    }

    /// Looks up an input port by name.
    fn input_port(&self, name: &str) -> Result<&dyn InputPortBase, ModelError> {
        self.input_ports()
            .into_iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| ModelError::UnknownPort {
                node: self.id(),
                direction: PortDirection::Input,
                port: name.to_string(),
            })
    }

    /// Looks up an output port by name.
    fn output_port(&self, name: &str) -> Result<&dyn OutputPortBase, ModelError> {
        self.output_ports()
            .into_iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| ModelError::UnknownPort {
                node: self.id(),
                direction: PortDirection::Output,
                port: name.to_string(),
            })
    }

    /// Ids of the nodes this node reads from, without duplicates.
    fn dependencies(&self) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        for port in self.input_ports() {
            for id in port.elements().referenced_nodes() {
                if !nodes.contains(&id) {
                    nodes.push(id);
                }
            }
        }
        nodes
    }

    /// One-line description: id, type and port shapes.
    fn summary(&self) -> String {
        let inputs: Vec<String> = self
            .input_ports()
            .iter()
            .map(|p| format!("{}:{}[{}]", p.name(), p.port_type(), p.size()))
            .collect();
        let outputs: Vec<String> = self
            .output_ports()
            .iter()
            .map(|p| format!("{}:{}[{}]", p.name(), p.port_type(), p.size()))
            .collect();
        format!(
            "{} {} in({}) out({})",
            self.id(),
            self.runtime_type_name(),
            inputs.join(", "),
            outputs.join(", "),
        )
    }
}

/// The statically known runtime type name of a node type, used to register
/// it with a [`crate::NodeRegistry`].
pub trait NodeTypeName {
    fn type_name() -> String;
}

/// Type-erased view of an input node, for feeding values without knowing
/// the element type.
pub trait InputNodeBase {
    /// Number of values the node expects.
    fn dimension(&self) -> usize;

    fn port_type(&self) -> PortType;

    fn output(&self) -> &dyn OutputPortBase;

    /// Parses `values` with the element type's parser and sets them as the
    /// input buffer.
    fn set_input_text(&mut self, values: &[&str]) -> Result<(), ModelError>;
}

/// Type-erased view of an output node.
pub trait OutputNodeBase {
    fn input(&self) -> &dyn InputPortBase;

    fn output(&self) -> &dyn OutputPortBase;
}
