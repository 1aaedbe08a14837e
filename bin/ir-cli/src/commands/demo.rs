// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `ir-tool demo` command: write a small sample model.
//!
//! The sample computes `(x + (c1 + c2)) * x` over a 3-element input, with
//! one constant nothing reads, so every pass has something to do.

use crate::config::ToolConfig;
use model_ir::{
    BinaryOperationNode, BinaryOperationType, ConstantNode, InputNode, Model, ModelError,
    OutputNode, PortElements,
};
use std::path::PathBuf;

pub fn execute(output: PathBuf, config: &ToolConfig) -> anyhow::Result<()> {
    let model = sample_model()?;
    super::save_model(&model, &output, config)?;
    println!("  Wrote sample model to {}", output.display());
    println!("  {}", model.summary());
    Ok(())
}

/// Builds the sample model.
pub fn sample_model() -> Result<Model, ModelError> {
    let mut model = Model::new();

    let x = InputNode::<f64>::new(3);
    let c1 = ConstantNode::new(vec![1.0, 2.0, 3.0]);
    let c2 = ConstantNode::new(vec![0.5, 0.5, 0.5]);
    let unused = ConstantNode::new(vec![42i32]);
    let bias = BinaryOperationNode::<f64>::new(
        PortElements::from_port(c1.output()),
        PortElements::from_port(c2.output()),
        BinaryOperationType::Add,
    )?;
    let shifted = BinaryOperationNode::<f64>::new(
        PortElements::from_port(x.output()),
        PortElements::from_port(bias.output()),
        BinaryOperationType::Add,
    )?;
    let product = BinaryOperationNode::<f64>::new(
        PortElements::from_port(shifted.output()),
        PortElements::from_port(x.output()),
        BinaryOperationType::Multiply,
    )?;
    let result = OutputNode::<f64>::new(PortElements::from_port(product.output()));

    model.add_node(x)?;
    model.add_node(c1)?;
    model.add_node(c2)?;
    model.add_node(unused)?;
    model.add_node(bias)?;
    model.add_node(shifted)?;
    model.add_node(product)?;
    model.add_node(result)?;
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_model_evaluates() {
        let mut model = sample_model().unwrap();
        let input = model.input_nodes().unwrap()[0];
        model
            .node_as_mut::<InputNode<f64>>(input)
            .unwrap()
            .set_input(vec![1.0, 2.0, 3.0])
            .unwrap();
        model.compute().unwrap();
        let output = model.output_nodes().unwrap()[0];
        let values = model.node_as::<OutputNode<f64>>(output).unwrap().output().values();
        // (1 + 1.5) * 1, (2 + 2.5) * 2, (3 + 3.5) * 3
        assert_eq!(values, vec![2.5, 9.0, 19.5]);
    }

    #[test]
    fn test_execute_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.json");
        execute(path.clone(), &ToolConfig::default()).unwrap();
        assert!(path.exists());
    }
}
