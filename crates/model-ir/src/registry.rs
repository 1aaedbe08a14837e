// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Node factories keyed by runtime type name.

use crate::nodes::{BinaryOperationNode, ConstantNode, InputNode, OutputNode};
use crate::{ModelError, Node, NodeTypeName};
use port_types::{Element, Numeric};
use std::collections::HashMap;

/// Creates a default-constructed node whose state is then read from an
/// archive.
pub type NodeFactory = fn() -> Box<dyn Node>;

fn create_node<N: Node + Default>() -> Box<dyn Node> {
    Box::new(N::default())
}

/// Maps runtime type names (`InputNode<double>`) to node factories.
///
/// The set is open: crates defining their own nodes register them next to
/// the built-in ones before loading archives that use them.
#[derive(Debug, Clone)]
pub struct NodeRegistry {
    factories: HashMap<String, NodeFactory>,
}

impl NodeRegistry {
    /// Creates a registry with no node types.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Creates a registry with every built-in node for every element type.
    pub fn with_builtin_nodes() -> Self {
        let mut registry = Self::new();
        register_element_nodes::<bool>(&mut registry);
        register_element_nodes::<i32>(&mut registry);
        register_element_nodes::<i64>(&mut registry);
        register_element_nodes::<f32>(&mut registry);
        register_element_nodes::<f64>(&mut registry);
        register_numeric_nodes::<i32>(&mut registry);
        register_numeric_nodes::<i64>(&mut registry);
        register_numeric_nodes::<f32>(&mut registry);
        register_numeric_nodes::<f64>(&mut registry);
        registry
    }

    /// Registers `N` under its runtime type name, replacing any previous
    /// registration of that name.
    pub fn register<N: Node + NodeTypeName + Default>(&mut self) -> &mut Self {
        self.register_factory(N::type_name(), create_node::<N>)
    }

    /// Registers a factory under an explicit name.
    pub fn register_factory(&mut self, type_name: impl Into<String>, factory: NodeFactory) -> &mut Self {
        let type_name = type_name.into();
        if self.factories.insert(type_name.clone(), factory).is_some() {
            tracing::debug!("replaced node factory for '{type_name}'");
        }
        self
    }

    /// Creates a default node of the named type.
    pub fn create(&self, type_name: &str) -> Result<Box<dyn Node>, ModelError> {
        self.factories
            .get(type_name)
            .map(|factory| factory())
            .ok_or_else(|| ModelError::UnknownNodeType(type_name.to_string()))
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// Registered names, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::with_builtin_nodes()
    }
}

fn register_element_nodes<T: Element>(registry: &mut NodeRegistry) {
    registry
        .register::<InputNode<T>>()
        .register::<OutputNode<T>>()
        .register::<ConstantNode<T>>();
}

fn register_numeric_nodes<T: Numeric>(registry: &mut NodeRegistry) {
    registry.register::<BinaryOperationNode<T>>();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorCategory, InputNodeBase};

    #[test]
    fn test_builtin_names() {
        let registry = NodeRegistry::default();
        // 3 element nodes x 5 types + 1 numeric node x 4 types.
        assert_eq!(registry.len(), 19);
        assert!(registry.contains("InputNode<double>"));
        assert!(registry.contains("OutputNode<bool>"));
        assert!(registry.contains("BinaryOperationNode<int64>"));
        assert!(!registry.contains("BinaryOperationNode<bool>"));
    }

    #[test]
    fn test_create_builds_default_node() {
        let registry = NodeRegistry::with_builtin_nodes();
        let node = registry.create("InputNode<float>").unwrap();
        assert_eq!(node.runtime_type_name(), "InputNode<float>");
        assert_eq!(node.as_input_node().unwrap().dimension(), 0);
    }

    #[test]
    fn test_unknown_type() {
        let err = NodeRegistry::new().create("InputNode<double>").err().unwrap();
        assert!(matches!(err, ModelError::UnknownNodeType(ref name) if name == "InputNode<double>"));
        assert_eq!(err.category(), ErrorCategory::UnknownNodeType);
    }

    #[test]
    fn test_custom_registration() {
        let mut registry = NodeRegistry::new();
        registry.register::<ConstantNode<f64>>();
        assert_eq!(registry.type_names(), vec!["ConstantNode<double>"]);
    }
}
