// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`Model`]: an owning container of nodes forming a DAG.
//!
//! There is no separate edge list. Edges are recovered from the input port
//! references, so the graph can never disagree with the ports:
//!
//! ```text
//!   InputNode ──output──► input1 ┐
//!                                 BinaryOperationNode ──output──► OutputNode
//!   ConstantNode ─output─► input2 ┘
//! ```
//!
//! Every node added through [`Model::add_node`] may only reference nodes that
//! are already in the model, which keeps insertion order topological and
//! makes cycles impossible to build through the API. Loaded archives are
//! checked for cycles explicitly.

use crate::{
    InputNodeBase, ModelError, Node, NodeId, OutputPort, OutputPortBase, PortElements, PortRef,
};
use port_types::Element;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt;

/// A graph of nodes connected through port references.
#[derive(Default)]
pub struct Model {
    nodes: Vec<Box<dyn Node>>,
    index: HashMap<NodeId, usize>,
}

impl Model {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its id.
    ///
    /// Every input reference must resolve to an output port already in the
    /// model, with the same element type and in range.
    pub fn add_node<N: Node>(&mut self, node: N) -> Result<NodeId, ModelError> {
        self.add_boxed_node(Box::new(node))
    }

    /// Adds a type-erased node. See [`add_node`](Model::add_node).
    pub fn add_boxed_node(&mut self, node: Box<dyn Node>) -> Result<NodeId, ModelError> {
        if self.index.contains_key(&node.id()) {
            return Err(ModelError::DuplicateNode(node.id()));
        }
        self.check_references(node.as_ref())?;
        Ok(self.insert(node))
    }

    /// Adds a node without checking its references. Used by the loader,
    /// which validates the whole model once every node is present.
    pub(crate) fn insert_unchecked(&mut self, node: Box<dyn Node>) -> Result<NodeId, ModelError> {
        if self.index.contains_key(&node.id()) {
            return Err(ModelError::DuplicateNode(node.id()));
        }
        Ok(self.insert(node))
    }

    fn insert(&mut self, node: Box<dyn Node>) -> NodeId {
        let id = node.id();
        tracing::trace!("adding {}", node.summary());
        self.index.insert(id, self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Returns a node by id.
    pub fn node(&self, id: NodeId) -> Result<&dyn Node, ModelError> {
        self.index
            .get(&id)
            .map(|&i| self.nodes[i].as_ref())
            .ok_or(ModelError::UnknownNode(id))
    }

    /// Returns a node downcast to its concrete type.
    pub fn node_as<N: Node>(&self, id: NodeId) -> Option<&N> {
        self.node(id).ok()?.as_any().downcast_ref::<N>()
    }

    /// Returns a node downcast to its concrete type, mutably.
    pub fn node_as_mut<N: Node>(&mut self, id: NodeId) -> Option<&mut N> {
        let i = *self.index.get(&id)?;
        self.nodes[i].as_any_mut().downcast_mut::<N>()
    }

    /// Iterates over the nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Node> + '_ {
        self.nodes.iter().map(|n| n.as_ref())
    }

    /// Ids in insertion order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id()).collect()
    }

    /// Resolves a port reference to the type-erased output port.
    pub fn output_port_base(&self, port: &PortRef) -> Result<&dyn OutputPortBase, ModelError> {
        let node = self
            .node(port.node())
            .map_err(|_| ModelError::DanglingReference {
                target: port.clone(),
                detail: "no such node in the model".into(),
            })?;
        node.output_port(port.name())
            .map_err(|_| ModelError::DanglingReference {
                target: port.clone(),
                detail: format!("{} has no output port '{}'", port.node(), port.name()),
            })
    }

    /// Resolves a port reference to a typed output port.
    pub fn output_port<T: Element>(&self, port: &PortRef) -> Result<&OutputPort<T>, ModelError> {
        let base = self.output_port_base(port)?;
        base.as_any()
            .downcast_ref::<OutputPort<T>>()
            .ok_or_else(|| ModelError::TypeMismatch {
                port: port.to_string(),
                expected: T::PORT_TYPE,
                actual: base.port_type(),
            })
    }

    /// Reads the current values of `elements`, in order.
    pub fn read_values<T: Element>(&self, elements: &PortElements) -> Result<Vec<T>, ModelError> {
        let mut values = Vec::with_capacity(elements.size());
        for range in elements.ranges() {
            let port = self.output_port::<T>(range.port())?;
            let slice = port
                .values_in(range.start()..range.end())
                .ok_or_else(|| ModelError::RangeOutOfBounds {
                    target: range.port().clone(),
                    start: range.start(),
                    end: range.end(),
                    size: port.size(),
                })?;
            values.extend(slice);
        }
        Ok(values)
    }

    /// Checks that every input reference of `node` resolves within this
    /// model with a matching type and an in-bounds range.
    fn check_references(&self, node: &dyn Node) -> Result<(), ModelError> {
        for port in node.input_ports() {
            for range in port.elements().ranges() {
                let upstream = self.output_port_base(range.port()).map_err(|_| {
                    ModelError::DanglingReference {
                        target: range.port().clone(),
                        detail: format!("referenced by input '{}' of {}", port.name(), node.id()),
                    }
                })?;
                if upstream.port_type() != port.port_type() {
                    return Err(ModelError::TypeMismatch {
                        port: format!("{}.{}", node.id(), port.name()),
                        expected: port.port_type(),
                        actual: upstream.port_type(),
                    });
                }
                if range.end() > upstream.size() {
                    return Err(ModelError::RangeOutOfBounds {
                        target: range.port().clone(),
                        start: range.start(),
                        end: range.end(),
                        size: upstream.size(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Checks every reference and that the graph is acyclic.
    pub fn validate(&self) -> Result<(), ModelError> {
        for node in &self.nodes {
            self.check_references(node.as_ref())?;
        }
        self.topological_order().map(|_| ())
    }

    /// Returns the node ids in dependency order (Kahn's algorithm).
    ///
    /// Among the nodes that are ready at any step, the one inserted first
    /// comes first. A model whose insertion order is already topological
    /// (any model built with [`add_node`](Model::add_node)) therefore comes
    /// back in insertion order.
    pub fn topological_order(&self) -> Result<Vec<NodeId>, ModelError> {
        let n = self.nodes.len();
        let mut in_degree = vec![0usize; n];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];

        for (i, node) in self.nodes.iter().enumerate() {
            for dep in node.dependencies() {
                let j = *self.index.get(&dep).ok_or(ModelError::UnknownNode(dep))?;
                in_degree[i] += 1;
                dependents[j].push(i);
            }
        }

        let mut ready: BinaryHeap<Reverse<usize>> = (0..n)
            .filter(|&i| in_degree[i] == 0)
            .map(Reverse)
            .collect();
        let mut order = Vec::with_capacity(n);

        while let Some(Reverse(i)) = ready.pop() {
            order.push(self.nodes[i].id());
            for &k in &dependents[i] {
                in_degree[k] -= 1;
                if in_degree[k] == 0 {
                    ready.push(Reverse(k));
                }
            }
        }

        if order.len() < n {
            let nodes = (0..n)
                .filter(|&i| in_degree[i] > 0)
                .map(|i| self.nodes[i].id())
                .collect();
            return Err(ModelError::CycleDetected { nodes });
        }
        Ok(order)
    }

    /// The given nodes plus everything they transitively depend on.
    pub fn ancestors(&self, roots: &[NodeId]) -> Result<HashSet<NodeId>, ModelError> {
        let mut seen = HashSet::new();
        let mut stack = roots.to_vec();
        while let Some(id) = stack.pop() {
            if seen.insert(id) {
                stack.extend(self.node(id)?.dependencies());
            }
        }
        Ok(seen)
    }

    /// Computes every node in dependency order.
    pub fn compute(&self) -> Result<(), ModelError> {
        for id in self.topological_order()? {
            self.compute_node(id)?;
        }
        Ok(())
    }

    /// Computes only what `elements` depends on and returns their values.
    pub fn compute_output<T: Element>(&self, elements: &PortElements) -> Result<Vec<T>, ModelError> {
        for range in elements.ranges() {
            self.output_port_base(range.port())?;
        }
        let needed = self.ancestors(&elements.referenced_nodes())?;
        for id in self.topological_order()? {
            if needed.contains(&id) {
                self.compute_node(id)?;
            }
        }
        self.read_values(elements)
    }

    fn compute_node(&self, id: NodeId) -> Result<(), ModelError> {
        let node = self.node(id)?;
        tracing::trace!("computing {} ({})", id, node.runtime_type_name());
        node.compute(self)
    }

    /// Ids of the nodes that accept external input, in dependency order.
    pub fn input_nodes(&self) -> Result<Vec<NodeId>, ModelError> {
        let order = self.topological_order()?;
        Ok(order
            .into_iter()
            .filter(|&id| self.node(id).map_or(false, |n| n.as_input_node().is_some()))
            .collect())
    }

    /// Ids of the nodes that mark results, in dependency order.
    pub fn output_nodes(&self) -> Result<Vec<NodeId>, ModelError> {
        let order = self.topological_order()?;
        Ok(order
            .into_iter()
            .filter(|&id| self.node(id).map_or(false, |n| n.as_output_node().is_some()))
            .collect())
    }

    /// Type-erased mutable access to an input node.
    pub fn input_node_mut(&mut self, id: NodeId) -> Result<&mut dyn InputNodeBase, ModelError> {
        let i = *self.index.get(&id).ok_or(ModelError::UnknownNode(id))?;
        self.nodes[i]
            .as_input_node_mut()
            .ok_or(ModelError::WrongNodeKind {
                node: id,
                expected: "an input node",
            })
    }

    /// Returns a one-line summary of the model.
    pub fn summary(&self) -> String {
        let inputs = self.iter().filter(|n| n.as_input_node().is_some()).count();
        let outputs = self.iter().filter(|n| n.as_output_node().is_some()).count();
        format!(
            "Model: {} nodes, {} inputs, {} outputs",
            self.len(),
            inputs,
            outputs
        )
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary())?;
        let order = self
            .topological_order()
            .unwrap_or_else(|_| self.node_ids());
        for id in order {
            if let Ok(node) = self.node(id) {
                writeln!(f, "  {}", node.summary())?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nodes: Vec<String> = self.iter().map(|n| n.summary()).collect();
        f.debug_struct("Model").field("nodes", &nodes).finish()
    }
}
