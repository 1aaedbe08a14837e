// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Built-in node types.
//!
//! | Node                     | Inputs               | Outputs            | Element types |
//! |--------------------------|----------------------|--------------------|---------------|
//! | [`InputNode<T>`]         | none                 | `output`           | all           |
//! | [`OutputNode<T>`]        | `input`              | `output`           | all           |
//! | [`ConstantNode<T>`]      | none                 | `output`           | all           |
//! | [`BinaryOperationNode<T>`] | `input1`, `input2` | `output`           | numeric       |

mod binary_operation_node;
mod constant_node;
mod input_node;
mod output_node;

pub use binary_operation_node::{BinaryOperationNode, BinaryOperationType};
pub use constant_node::ConstantNode;
pub use input_node::InputNode;
pub use output_node::OutputNode;
