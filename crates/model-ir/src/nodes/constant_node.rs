// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! [`ConstantNode`]: fixed values baked into the model.

use crate::{
    InputPortBase, Model, ModelError, ModelTransformer, Node, NodeId, NodeTypeName, OutputPort,
    OutputPortBase, PortElements,
};
use ir_archive::{Archivable, ArchiveError, Archiver, Unarchiver};
use port_types::{composite_type_name, Element};
use std::any::Any;

/// A node with no inputs whose output always holds the same values.
///
/// Unlike an [`crate::InputNode`] buffer, the values are part of the model:
/// they are archived and carried over by `copy`.
#[derive(Debug)]
pub struct ConstantNode<T: Element> {
    id: NodeId,
    values: Vec<T>,
    output: OutputPort<T>,
}

impl<T: Element> ConstantNode<T> {
    pub const OUTPUT_PORT_NAME: &'static str = "output";

    pub fn new(values: Vec<T>) -> Self {
        let id = NodeId::fresh();
        let output = OutputPort::new(id, Self::OUTPUT_PORT_NAME, values.len());
        Self { id, values, output }
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn output(&self) -> &OutputPort<T> {
        &self.output
    }
}

impl<T: Element> Default for ConstantNode<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: Element> NodeTypeName for ConstantNode<T> {
    fn type_name() -> String {
        composite_type_name::<T>("ConstantNode")
    }
}

impl<T: Element> Archivable for ConstantNode<T> {
    fn write_to_archive(&self, archiver: &mut Archiver) {
        archiver.write("values", self.values.clone());
        archiver.write_object("output", &self.output);
    }

    fn read_from_archive(&mut self, unarchiver: &Unarchiver<'_>) -> Result<(), ArchiveError> {
        self.values = unarchiver.read("values")?;
        unarchiver.read_object("output", &mut self.output)?;
        if self.output.size() != self.values.len() {
            return Err(ArchiveError::InvalidValue {
                detail: format!(
                    "{} values for an output of size {}",
                    self.values.len(),
                    self.output.size()
                ),
            });
        }
        Ok(())
    }
}

impl<T: Element> Node for ConstantNode<T> {
    fn id(&self) -> NodeId {
        self.id
    }

    fn runtime_type_name(&self) -> String {
        Self::type_name()
    }

    fn input_ports(&self) -> Vec<&dyn InputPortBase> {
        Vec::new()
    }

    fn input_ports_mut(&mut self) -> Vec<&mut dyn InputPortBase> {
        Vec::new()
    }

    fn output_ports(&self) -> Vec<&dyn OutputPortBase> {
        vec![&self.output as &dyn OutputPortBase]
    }

    fn compute(&self, _model: &Model) -> Result<(), ModelError> {
        self.output.set_output(self.values.clone())
    }

    fn copy(&self, transformer: &mut ModelTransformer) -> Result<(), ModelError> {
        let node = ConstantNode::new(self.values.clone());
        let new_output = PortElements::from_port(node.output());
        transformer.add_node(node)?;
        transformer.map_output_port(&self.output, new_output)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
