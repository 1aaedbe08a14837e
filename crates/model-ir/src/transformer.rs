// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`ModelTransformer`]: rebuilds a model node by node.
//!
//! # States
//!
//! ```text
//!   Idle ──transform_model──► Transforming ──(all nodes visited / error)──► Idle
//! ```
//!
//! While transforming, the transformer owns the destination model and a
//! correspondence table from source output ports to destination elements.
//! Source nodes are visited in dependency order, so by the time a node is
//! visited every port it reads from has already been mapped (or elided).
//!
//! The visitor decides what each source node becomes:
//! - **copy**: `node.copy(transformer)`, the identity transform;
//! - **substitute**: add different nodes and map the old outputs onto them;
//! - **elide**: add nothing and leave the outputs unmapped.

use crate::{Model, ModelError, Node, NodeId, OutputPortBase, PortElements, PortRef};
use std::collections::{HashMap, HashSet};

/// State held only while a transform is running.
#[derive(Default)]
struct TransformContext {
    destination: Model,
    correspondences: HashMap<PortRef, PortElements>,
    visited: HashSet<NodeId>,
}

/// Builds a new model from an existing one through a visitor.
///
/// # Example
/// ```
/// use model_ir::{InputNode, Model, ModelTransformer, Node};
///
/// let mut model = Model::new();
/// model.add_node(InputNode::<f64>::new(3)).unwrap();
///
/// let copy = ModelTransformer::new().copy_model(&model).unwrap();
/// assert_eq!(copy.len(), 1);
/// assert_eq!(copy.iter().next().unwrap().runtime_type_name(), "InputNode<double>");
/// ```
#[derive(Default)]
pub struct ModelTransformer {
    context: Option<TransformContext>,
}

impl ModelTransformer {
    /// Creates an idle transformer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while a transform is running.
    pub fn is_transforming(&self) -> bool {
        self.context.is_some()
    }

    /// Copies every node of `source` unchanged.
    pub fn copy_model(&mut self, source: &Model) -> Result<Model, ModelError> {
        self.transform_model(source, |node, transformer| node.copy(transformer))
    }

    /// Visits every node of `source` in dependency order and returns the
    /// model the visitor built.
    ///
    /// The transformer is idle again when this returns, whether it
    /// succeeded or not. The destination is validated before it is handed
    /// out.
    pub fn transform_model<F>(&mut self, source: &Model, mut visitor: F) -> Result<Model, ModelError>
    where
        F: FnMut(&dyn Node, &mut ModelTransformer) -> Result<(), ModelError>,
    {
        if self.context.is_some() {
            return Err(ModelError::TransformerBusy);
        }
        let order = source.topological_order()?;

        self.context = Some(TransformContext::default());
        let visited = self.visit_nodes(source, &order, &mut visitor);
        let context = self.context.take();
        visited?;

        let context = context.ok_or(ModelError::TransformerIdle)?;
        context.destination.validate()?;
        tracing::info!(
            "transformed model: {} source nodes -> {} destination nodes",
            source.len(),
            context.destination.len()
        );
        Ok(context.destination)
    }

    fn visit_nodes<F>(&mut self, source: &Model, order: &[NodeId], visitor: &mut F) -> Result<(), ModelError>
    where
        F: FnMut(&dyn Node, &mut ModelTransformer) -> Result<(), ModelError>,
    {
        for &id in order {
            let node = source.node(id)?;
            tracing::debug!("visiting {} ({})", id, node.runtime_type_name());
            visitor(node, self)?;

            let context = self.context_mut()?;
            context.visited.insert(id);
            for port in node.output_ports() {
                if !context.correspondences.contains_key(port.port_ref()) {
                    tracing::warn!("output {} was elided without replacement", port.port_ref());
                }
            }
        }
        Ok(())
    }

    fn context(&self) -> Result<&TransformContext, ModelError> {
        self.context.as_ref().ok_or(ModelError::TransformerIdle)
    }

    fn context_mut(&mut self) -> Result<&mut TransformContext, ModelError> {
        self.context.as_mut().ok_or(ModelError::TransformerIdle)
    }

    /// The model built so far.
    pub fn destination(&self) -> Result<&Model, ModelError> {
        Ok(&self.context()?.destination)
    }

    /// Adds a node to the destination model.
    pub fn add_node<N: Node>(&mut self, node: N) -> Result<NodeId, ModelError> {
        self.context_mut()?.destination.add_node(node)
    }

    /// Records that the source port `old` now lives at `new_elements` in the
    /// destination. Sizes and element types must match.
    pub fn map_output_port(
        &mut self,
        old: &dyn OutputPortBase,
        new_elements: PortElements,
    ) -> Result<(), ModelError> {
        if old.size() != new_elements.size() {
            return Err(ModelError::SizeMismatch {
                port: old.port_ref().to_string(),
                expected: old.size(),
                actual: new_elements.size(),
            });
        }
        let context = self.context_mut()?;
        for range in new_elements.ranges() {
            let port = context.destination.output_port_base(range.port())?;
            if port.port_type() != old.port_type() {
                return Err(ModelError::TypeMismatch {
                    port: old.port_ref().to_string(),
                    expected: old.port_type(),
                    actual: port.port_type(),
                });
            }
        }
        context
            .correspondences
            .insert(old.port_ref().clone(), new_elements);
        Ok(())
    }

    /// The destination elements of a source output port.
    pub fn corresponding_outputs(&self, port: &PortRef) -> Result<PortElements, ModelError> {
        let context = self.context()?;
        if !context.visited.contains(&port.node()) {
            return Err(ModelError::NotYetVisited { node: port.node() });
        }
        context
            .correspondences
            .get(port)
            .cloned()
            .ok_or_else(|| ModelError::DanglingReference {
                target: port.clone(),
                detail: "the output was elided by the transform".into(),
            })
    }

    /// Maps every range of source `elements` to the destination.
    pub fn transform_port_elements(&self, elements: &PortElements) -> Result<PortElements, ModelError> {
        let mut result = PortElements::new();
        for range in elements.ranges() {
            let mapped = self.corresponding_outputs(range.port())?;
            let sliced = mapped
                .slice(range.start(), range.count())
                .ok_or_else(|| ModelError::RangeOutOfBounds {
                    target: range.port().clone(),
                    start: range.start(),
                    end: range.end(),
                    size: mapped.size(),
                })?;
            result.append(sliced);
        }
        Ok(result)
    }
}
