// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! [`InputNode`]: the entry point for external values.

use crate::{
    InputNodeBase, InputPortBase, Model, ModelError, ModelTransformer, Node, NodeId, NodeTypeName,
    OutputPort, OutputPortBase, PortElements,
};
use crate::output_port::default_buffer;
use ir_archive::{Archivable, ArchiveError, Archiver, Unarchiver};
use port_types::{composite_type_name, Element, PortType};
use std::any::Any;

/// A node with no inputs and one output of fixed dimension.
///
/// Values are supplied with [`set_input`](InputNode::set_input) and copied
/// verbatim to the output on every compute. A buffer that was never set
/// produces `T::default()` values.
///
/// # Example
/// ```
/// use model_ir::{InputNode, Model};
///
/// let mut model = Model::new();
/// let mut input = InputNode::<f64>::new(3);
/// input.set_input(vec![1.0, 2.0, 3.0]).unwrap();
/// let output = model_ir::PortElements::from_port(input.output());
/// model.add_node(input).unwrap();
///
/// assert_eq!(model.compute_output::<f64>(&output).unwrap(), vec![1.0, 2.0, 3.0]);
/// ```
#[derive(Debug)]
pub struct InputNode<T: Element> {
    id: NodeId,
    input_values: Vec<T>,
    output: OutputPort<T>,
}

impl<T: Element> InputNode<T> {
    /// Name of the single output port.
    pub const OUTPUT_PORT_NAME: &'static str = "output";

    /// Creates an input node producing `dimension` values.
    pub fn new(dimension: usize) -> Self {
        let id = NodeId::fresh();
        Self {
            id,
            input_values: vec![T::default(); dimension],
            output: OutputPort::new(id, Self::OUTPUT_PORT_NAME, dimension),
        }
    }

    /// Number of values the node produces.
    pub fn dimension(&self) -> usize {
        self.output.size()
    }

    pub fn output(&self) -> &OutputPort<T> {
        &self.output
    }

    /// The buffered values that the next compute will publish.
    pub fn input_values(&self) -> &[T] {
        &self.input_values
    }

    /// Sets the buffer of a dimension-1 node.
    pub fn set_scalar_input(&mut self, value: T) -> Result<(), ModelError> {
        self.set_input(vec![value])
    }

    /// Replaces the buffer. On a length mismatch the buffer is left as it was.
    pub fn set_input(&mut self, values: Vec<T>) -> Result<(), ModelError> {
        if values.len() != self.dimension() {
            return Err(ModelError::InvalidDimension {
                node: self.id,
                expected: self.dimension(),
                actual: values.len(),
            });
        }
        self.input_values = values;
        Ok(())
    }
}

impl<T: Element> Default for InputNode<T> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<T: Element> NodeTypeName for InputNode<T> {
    fn type_name() -> String {
        composite_type_name::<T>("InputNode")
    }
}

impl<T: Element> Archivable for InputNode<T> {
    fn write_to_archive(&self, archiver: &mut Archiver) {
        archiver.write_object("output", &self.output);
    }

    fn read_from_archive(&mut self, unarchiver: &Unarchiver<'_>) -> Result<(), ArchiveError> {
        unarchiver.read_object("output", &mut self.output)?;
        self.input_values = default_buffer(self.output.size())?;
        Ok(())
    }
}

impl<T: Element> Node for InputNode<T> {
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
        self.output.set_output(self.input_values.clone())
    }

    fn copy(&self, transformer: &mut ModelTransformer) -> Result<(), ModelError> {
        // The buffer is runtime state; the copy starts from defaults.
        let node = InputNode::<T>::new(self.dimension());
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

    fn as_input_node(&self) -> Option<&dyn InputNodeBase> {
        Some(self)
    }

    fn as_input_node_mut(&mut self) -> Option<&mut dyn InputNodeBase> {
        Some(self)
    }
}

impl<T: Element> InputNodeBase for InputNode<T> {
    fn dimension(&self) -> usize {
        self.output.size()
    }

    fn port_type(&self) -> PortType {
        T::PORT_TYPE
    }

    fn output(&self) -> &dyn OutputPortBase {
        &self.output
    }

    fn set_input_text(&mut self, values: &[&str]) -> Result<(), ModelError> {
        let parsed = values
            .iter()
            .map(|v| T::parse_value(v))
            .collect::<Result<Vec<T>, _>>()
            .map_err(|source| ModelError::InvalidValue {
                node: self.id,
                source,
            })?;
        self.set_input(parsed)
    }
}
