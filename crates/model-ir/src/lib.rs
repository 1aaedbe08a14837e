// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # model-ir
//!
//! A graph intermediate representation of computation models.
//!
//! A [`Model`] owns a set of [`Node`]s. Each node has typed, named, fixed-size
//! ports; input ports refer to upstream output ports by [`NodeId`] and port
//! name, so the model stores no separate edge list and nothing in it holds a
//! pointer to anything it does not own.
//!
//! - [`Node`]: the vertex contract (ports, compute, copy, archival).
//! - [`InputPort`] / [`OutputPort`] and [`PortElements`]: typed wiring.
//! - [`nodes`]: the built-in nodes: [`InputNode`], [`OutputNode`],
//!   [`ConstantNode`] and [`BinaryOperationNode`].
//! - [`ModelTransformer`]: rebuilds a model node by node through a visitor
//!   (copy, substitute or elide).
//! - [`ModelLoader`] and [`NodeRegistry`]: two-pass archival to JSON or
//!   MessagePack.
//! - [`passes`]: refinement passes built on the transformer.
//!
//! # Example
//! ```
//! use model_ir::{InputNode, Model, ModelTransformer, PortElements};
//!
//! let mut model = Model::new();
//! let mut input = InputNode::<f64>::new(3);
//! input.set_input(vec![1.0, 2.0, 3.0]).unwrap();
//! model.add_node(input).unwrap();
//!
//! let mut copy = ModelTransformer::new().copy_model(&model).unwrap();
//! let id = copy.input_nodes().unwrap()[0];
//! let node = copy.node_as_mut::<InputNode<f64>>(id).unwrap();
//! assert_eq!(node.dimension(), 3);
//! node.set_input(vec![1.0, 2.0, 3.0]).unwrap();
//!
//! let output = PortElements::from_port(node.output());
//! assert_eq!(copy.compute_output::<f64>(&output).unwrap(), vec![1.0, 2.0, 3.0]);
//! ```

mod error;
mod id;
mod input_port;
mod loader;
mod model;
mod node;
pub mod nodes;
mod output_port;
pub mod passes;
mod port;
mod registry;
mod transformer;

pub use error::{ErrorCategory, ModelError};
pub use id::NodeId;
pub use input_port::{InputPort, InputPortBase};
pub use loader::{ModelLoader, ARCHIVE_FORMAT_VERSION};
pub use model::Model;
pub use node::{InputNodeBase, Node, NodeTypeName, OutputNodeBase};
pub use nodes::{BinaryOperationNode, BinaryOperationType, ConstantNode, InputNode, OutputNode};
pub use output_port::{OutputPort, OutputPortBase, MAX_ARCHIVED_PORT_SIZE};
pub use port::{PortDirection, PortElements, PortRange, PortRef};
pub use registry::{NodeFactory, NodeRegistry};
pub use transformer::ModelTransformer;

pub use port_types::{Element, Numeric, PortType};
