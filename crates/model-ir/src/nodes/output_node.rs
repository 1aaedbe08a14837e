// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! [`OutputNode`]: marks a model result.

use crate::{
    InputPort, InputPortBase, Model, ModelError, ModelTransformer, Node, NodeId, NodeTypeName,
    OutputNodeBase, OutputPort, OutputPortBase, PortElements,
};
use ir_archive::{Archivable, ArchiveError, Archiver, Unarchiver};
use port_types::{composite_type_name, Element};
use std::any::Any;

/// Copies its input to its output. Tools treat the outputs of these nodes
/// as the results of a model, and passes keep everything they depend on.
#[derive(Debug)]
pub struct OutputNode<T: Element> {
    id: NodeId,
    input: InputPort<T>,
    output: OutputPort<T>,
}

impl<T: Element> OutputNode<T> {
    pub const INPUT_PORT_NAME: &'static str = "input";
    pub const OUTPUT_PORT_NAME: &'static str = "output";

    /// Creates an output node reading `input`.
    pub fn new(input: PortElements) -> Self {
        let id = NodeId::fresh();
        let size = input.size();
        Self {
            id,
            input: InputPort::new(id, Self::INPUT_PORT_NAME, input),
            output: OutputPort::new(id, Self::OUTPUT_PORT_NAME, size),
        }
    }

    pub fn input(&self) -> &InputPort<T> {
        &self.input
    }

    pub fn output(&self) -> &OutputPort<T> {
        &self.output
    }
}

impl<T: Element> Default for OutputNode<T> {
    fn default() -> Self {
        Self::new(PortElements::new())
    }
}

impl<T: Element> NodeTypeName for OutputNode<T> {
    fn type_name() -> String {
        composite_type_name::<T>("OutputNode")
    }
}

impl<T: Element> Archivable for OutputNode<T> {
    fn write_to_archive(&self, archiver: &mut Archiver) {
        archiver.write_object("input", &self.input);
        archiver.write_object("output", &self.output);
    }

    fn read_from_archive(&mut self, unarchiver: &Unarchiver<'_>) -> Result<(), ArchiveError> {
        unarchiver.read_object("input", &mut self.input)?;
        unarchiver.read_object("output", &mut self.output)?;
        if self.input.size() != self.output.size() {
            return Err(ArchiveError::InvalidValue {
                detail: format!(
                    "input has {} elements but output has {}",
                    self.input.size(),
                    self.output.size()
                ),
            });
        }
        Ok(())
    }
}

impl<T: Element> Node for OutputNode<T> {
    fn id(&self) -> NodeId {
        self.id
    }

    fn runtime_type_name(&self) -> String {
        Self::type_name()
    }

    fn input_ports(&self) -> Vec<&dyn InputPortBase> {
        vec![&self.input as &dyn InputPortBase]
    }

    fn input_ports_mut(&mut self) -> Vec<&mut dyn InputPortBase> {
        vec![&mut self.input as &mut dyn InputPortBase]
    }

    fn output_ports(&self) -> Vec<&dyn OutputPortBase> {
        vec![&self.output as &dyn OutputPortBase]
    }

    fn compute(&self, model: &Model) -> Result<(), ModelError> {
        self.output.set_output(self.input.values(model)?)
    }

    fn copy(&self, transformer: &mut ModelTransformer) -> Result<(), ModelError> {
        let input = transformer.transform_port_elements(self.input.elements())?;
        let node = OutputNode::<T>::new(input);
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

    fn as_output_node(&self) -> Option<&dyn OutputNodeBase> {
        Some(self)
    }
}

impl<T: Element> OutputNodeBase for OutputNode<T> {
    fn input(&self) -> &dyn InputPortBase {
        &self.input
    }

    fn output(&self) -> &dyn OutputPortBase {
        &self.output
    }
}
