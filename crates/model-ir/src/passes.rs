// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Model refinement passes built on [`ModelTransformer`].
//!
//! - [`prune_unused`] elides every node no output node depends on.
//! - [`fold_constants`] replaces arithmetic on constants with its result.
//!
//! Each pass returns a new model; the source is left untouched.

use crate::nodes::{BinaryOperationNode, ConstantNode};
use crate::{InputPortBase, Model, ModelError, ModelTransformer, Node, PortElements};
use port_types::Numeric;

/// Keeps only the output nodes and their ancestors.
///
/// A model without output nodes prunes to an empty model.
pub fn prune_unused(model: &Model) -> Result<Model, ModelError> {
    let live = model.ancestors(&model.output_nodes()?)?;
    let pruned = ModelTransformer::new().transform_model(model, |node, transformer| {
        if live.contains(&node.id()) {
            node.copy(transformer)
        } else {
            tracing::debug!("pruning unused {} ({})", node.id(), node.runtime_type_name());
            Ok(())
        }
    })?;
    tracing::info!("prune_unused: {} -> {} nodes", model.len(), pruned.len());
    Ok(pruned)
}

/// Replaces every binary operation whose inputs all come from constants
/// with a single constant holding the result.
///
/// Folding runs in dependency order on the destination, so chains of
/// constant arithmetic collapse completely. The constants that fed a folded
/// node stay in the model; run [`prune_unused`] afterwards to drop them.
/// Operations whose result is undefined (integer division by zero) are left
/// as they are.
pub fn fold_constants(model: &Model) -> Result<Model, ModelError> {
    let mut folded = 0usize;
    let result = ModelTransformer::new().transform_model(model, |node, transformer| {
        let replaced = try_fold::<f64>(node, transformer)?
            || try_fold::<f32>(node, transformer)?
            || try_fold::<i64>(node, transformer)?
            || try_fold::<i32>(node, transformer)?;
        if replaced {
            folded += 1;
            Ok(())
        } else {
            node.copy(transformer)
        }
    })?;
    tracing::info!("fold_constants: folded {} operations", folded);
    Ok(result)
}

/// Folds `node` if it is a `BinaryOperationNode<T>` over constants.
fn try_fold<T: Numeric>(node: &dyn Node, transformer: &mut ModelTransformer) -> Result<bool, ModelError> {
    let Some(operation) = node.as_any().downcast_ref::<BinaryOperationNode<T>>() else {
        return Ok(false);
    };

    let lhs = transformer.transform_port_elements(operation.input1().elements())?;
    let rhs = transformer.transform_port_elements(operation.input2().elements())?;
    let destination = transformer.destination()?;
    let (Some(a), Some(b)) = (
        constant_values::<T>(destination, &lhs),
        constant_values::<T>(destination, &rhs),
    ) else {
        return Ok(false);
    };

    let op = operation.operation();
    let Some(values) = a
        .iter()
        .zip(&b)
        .map(|(&x, &y)| op.apply(x, y))
        .collect::<Option<Vec<T>>>()
    else {
        tracing::debug!("not folding {}: result is undefined", node.id());
        return Ok(false);
    };

    tracing::debug!("folding {} ({}) into a constant", node.id(), node.runtime_type_name());
    let constant = ConstantNode::new(values);
    let new_output = PortElements::from_port(constant.output());
    transformer.add_node(constant)?;
    transformer.map_output_port(operation.output(), new_output)?;
    Ok(true)
}

/// The values behind `elements` if every range reads a `ConstantNode<T>`.
fn constant_values<T: Numeric>(model: &Model, elements: &PortElements) -> Option<Vec<T>> {
    let mut values = Vec::with_capacity(elements.size());
    for range in elements.ranges() {
        let constant = model.node_as::<ConstantNode<T>>(range.port().node())?;
        values.extend_from_slice(constant.values().get(range.start()..range.end())?);
    }
    Some(values)
}
