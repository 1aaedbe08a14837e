// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! [`BinaryOperationNode`]: element-wise arithmetic on two inputs.

use crate::{
    InputPort, InputPortBase, Model, ModelError, ModelTransformer, Node, NodeId, NodeTypeName,
    OutputPort, OutputPortBase, PortElements,
};
use ir_archive::{Archivable, ArchiveError, Archiver, Unarchiver};
use port_types::{composite_type_name, Numeric};
use std::any::Any;
use std::fmt;

/// The arithmetic a [`BinaryOperationNode`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BinaryOperationType {
    #[default]
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperationType {
    pub const ALL: [BinaryOperationType; 4] = [
        BinaryOperationType::Add,
        BinaryOperationType::Subtract,
        BinaryOperationType::Multiply,
        BinaryOperationType::Divide,
    ];

    /// Returns the archived name.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOperationType::Add => "add",
            BinaryOperationType::Subtract => "subtract",
            BinaryOperationType::Multiply => "multiply",
            BinaryOperationType::Divide => "divide",
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "add" | "+" => Some(Self::Add),
            "subtract" | "sub" | "-" => Some(Self::Subtract),
            "multiply" | "mul" | "*" => Some(Self::Multiply),
            "divide" | "div" | "/" => Some(Self::Divide),
            _ => None,
        }
    }

    /// Applies the operation, or returns `None` where the result is undefined.
    pub fn apply<T: Numeric>(self, a: T, b: T) -> Option<T> {
        match self {
            BinaryOperationType::Add => Some(a.sum(b)),
            BinaryOperationType::Subtract => Some(a.difference(b)),
            BinaryOperationType::Multiply => Some(a.product(b)),
            BinaryOperationType::Divide => a.quotient(b),
        }
    }
}

impl fmt::Display for BinaryOperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computes `input1[i] <op> input2[i]` for every element.
#[derive(Debug)]
pub struct BinaryOperationNode<T: Numeric> {
    id: NodeId,
    operation: BinaryOperationType,
    input1: InputPort<T>,
    input2: InputPort<T>,
    output: OutputPort<T>,
}

impl<T: Numeric> BinaryOperationNode<T> {
    pub const INPUT1_PORT_NAME: &'static str = "input1";
    pub const INPUT2_PORT_NAME: &'static str = "input2";
    pub const OUTPUT_PORT_NAME: &'static str = "output";

    /// Creates the node. Both inputs must have the same size.
    pub fn new(
        input1: PortElements,
        input2: PortElements,
        operation: BinaryOperationType,
    ) -> Result<Self, ModelError> {
        let id = NodeId::fresh();
        if input1.size() != input2.size() {
            return Err(ModelError::SizeMismatch {
                port: format!("{id}.{}", Self::INPUT2_PORT_NAME),
                expected: input1.size(),
                actual: input2.size(),
            });
        }
        let size = input1.size();
        Ok(Self {
            id,
            operation,
            input1: InputPort::new(id, Self::INPUT1_PORT_NAME, input1),
            input2: InputPort::new(id, Self::INPUT2_PORT_NAME, input2),
            output: OutputPort::new(id, Self::OUTPUT_PORT_NAME, size),
        })
    }

    pub fn operation(&self) -> BinaryOperationType {
        self.operation
    }

    pub fn input1(&self) -> &InputPort<T> {
        &self.input1
    }

    pub fn input2(&self) -> &InputPort<T> {
        &self.input2
    }

    pub fn output(&self) -> &OutputPort<T> {
        &self.output
    }
}

impl<T: Numeric> Default for BinaryOperationNode<T> {
    fn default() -> Self {
        let id = NodeId::fresh();
        Self {
            id,
            operation: BinaryOperationType::default(),
            input1: InputPort::new(id, Self::INPUT1_PORT_NAME, PortElements::new()),
            input2: InputPort::new(id, Self::INPUT2_PORT_NAME, PortElements::new()),
            output: OutputPort::new(id, Self::OUTPUT_PORT_NAME, 0),
        }
    }
}

impl<T: Numeric> NodeTypeName for BinaryOperationNode<T> {
    fn type_name() -> String {
        composite_type_name::<T>("BinaryOperationNode")
    }
}

impl<T: Numeric> Archivable for BinaryOperationNode<T> {
    fn write_to_archive(&self, archiver: &mut Archiver) {
        archiver.write("operation", self.operation.as_str());
        archiver.write_object("input1", &self.input1);
        archiver.write_object("input2", &self.input2);
        archiver.write_object("output", &self.output);
    }

    fn read_from_archive(&mut self, unarchiver: &Unarchiver<'_>) -> Result<(), ArchiveError> {
        let operation: String = unarchiver.read("operation")?;
        self.operation = BinaryOperationType::from_str_loose(&operation).ok_or_else(|| {
            ArchiveError::InvalidValue {
                detail: format!("unknown binary operation '{operation}'"),
            }
            .in_property("operation")
        })?;
        unarchiver.read_object("input1", &mut self.input1)?;
        unarchiver.read_object("input2", &mut self.input2)?;
        unarchiver.read_object("output", &mut self.output)?;

        let (a, b, out) = (self.input1.size(), self.input2.size(), self.output.size());
        if a != b || a != out {
            return Err(ArchiveError::InvalidValue {
                detail: format!("port sizes disagree: input1 {a}, input2 {b}, output {out}"),
            });
        }
        Ok(())
    }
}

impl<T: Numeric> Node for BinaryOperationNode<T> {
    fn id(&self) -> NodeId {
        self.id
    }

    fn runtime_type_name(&self) -> String {
        Self::type_name()
    }

    fn input_ports(&self) -> Vec<&dyn InputPortBase> {
        vec![&self.input1 as &dyn InputPortBase, &self.input2]
    }

    fn input_ports_mut(&mut self) -> Vec<&mut dyn InputPortBase> {
        vec![&mut self.input1 as &mut dyn InputPortBase, &mut self.input2]
    }

    fn output_ports(&self) -> Vec<&dyn OutputPortBase> {
        vec![&self.output as &dyn OutputPortBase]
    }

    fn compute(&self, model: &Model) -> Result<(), ModelError> {
        let a = self.input1.values(model)?;
        let b = self.input2.values(model)?;
        let mut result = Vec::with_capacity(a.len());
        for (i, (&x, &y)) in a.iter().zip(&b).enumerate() {
            let value = self
                .operation
                .apply(x, y)
                .ok_or_else(|| ModelError::Arithmetic {
                    node: self.id,
                    detail: format!("{x} {} {y} is undefined at element {i}", self.operation),
                })?;
            result.push(value);
        }
        self.output.set_output(result)
    }

    fn copy(&self, transformer: &mut ModelTransformer) -> Result<(), ModelError> {
        let input1 = transformer.transform_port_elements(self.input1.elements())?;
        let input2 = transformer.transform_port_elements(self.input2.elements())?;
        let node = BinaryOperationNode::<T>::new(input1, input2, self.operation)?;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConstantNode, ErrorCategory};

    fn model_with(
        a: Vec<i32>,
        b: Vec<i32>,
        operation: BinaryOperationType,
    ) -> (Model, NodeId) {
        let mut model = Model::new();
        let lhs = ConstantNode::new(a);
        let rhs = ConstantNode::new(b);
        let (lhs_out, rhs_out) = (
            PortElements::from_port(lhs.output()),
            PortElements::from_port(rhs.output()),
        );
        model.add_node(lhs).unwrap();
        model.add_node(rhs).unwrap();
        let op = BinaryOperationNode::<i32>::new(lhs_out, rhs_out, operation).unwrap();
        let id = model.add_node(op).unwrap();
        (model, id)
    }

    fn computed(model: &Model, id: NodeId) -> Vec<i32> {
        model.compute().unwrap();
        model
            .node_as::<BinaryOperationNode<i32>>(id)
            .unwrap()
            .output()
            .values()
    }

    #[test]
    fn test_operations() {
        let (model, id) = model_with(vec![6, 8], vec![3, 2], BinaryOperationType::Add);
        assert_eq!(computed(&model, id), vec![9, 10]);
        let (model, id) = model_with(vec![6, 8], vec![3, 2], BinaryOperationType::Subtract);
        assert_eq!(computed(&model, id), vec![3, 6]);
        let (model, id) = model_with(vec![6, 8], vec![3, 2], BinaryOperationType::Multiply);
        assert_eq!(computed(&model, id), vec![18, 16]);
        let (model, id) = model_with(vec![6, 8], vec![3, 2], BinaryOperationType::Divide);
        assert_eq!(computed(&model, id), vec![2, 4]);
    }

    #[test]
    fn test_integer_overflow_wraps() {
        let (model, id) = model_with(vec![i32::MAX], vec![1], BinaryOperationType::Add);
        assert_eq!(computed(&model, id), vec![i32::MIN]);
    }

    #[test]
    fn test_integer_division_by_zero_fails() {
        let (model, _) = model_with(vec![1, 2], vec![1, 0], BinaryOperationType::Divide);
        let err = model.compute().unwrap_err();
        assert!(matches!(err, ModelError::Arithmetic { .. }));
        assert_eq!(err.category(), ErrorCategory::ContractViolation);
    }

    #[test]
    fn test_float_division_by_zero_is_infinite() {
        let mut model = Model::new();
        let lhs = ConstantNode::new(vec![1.0f64]);
        let rhs = ConstantNode::new(vec![0.0f64]);
        let op = BinaryOperationNode::<f64>::new(
            PortElements::from_port(lhs.output()),
            PortElements::from_port(rhs.output()),
            BinaryOperationType::Divide,
        )
        .unwrap();
        let result = PortElements::from_port(op.output());
        model.add_node(lhs).unwrap();
        model.add_node(rhs).unwrap();
        model.add_node(op).unwrap();
        assert_eq!(model.compute_output::<f64>(&result).unwrap(), vec![f64::INFINITY]);
    }

    #[test]
    fn test_mismatched_inputs_rejected() {
        let lhs = ConstantNode::new(vec![1i64, 2]);
        let rhs = ConstantNode::new(vec![1i64]);
        let err = BinaryOperationNode::<i64>::new(
            PortElements::from_port(lhs.output()),
            PortElements::from_port(rhs.output()),
            BinaryOperationType::Add,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::SizeMismatch { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn test_operation_names() {
        for op in BinaryOperationType::ALL {
            assert_eq!(BinaryOperationType::from_str_loose(op.as_str()), Some(op));
        }
        assert_eq!(BinaryOperationType::from_str_loose("*"), Some(BinaryOperationType::Multiply));
        assert_eq!(BinaryOperationType::from_str_loose("pow"), None);
        assert_eq!(
            BinaryOperationNode::<f32>::default().runtime_type_name(),
            "BinaryOperationNode<float>"
        );
    }
}
