// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `ir-tool inspect` command: display model structure.
//!
//! Prints one row per node in compute order with its runtime type, port
//! shapes and the nodes it reads from.

use crate::config::ToolConfig;
use model_ir::{Model, Node};
use std::path::PathBuf;

pub fn execute(model: PathBuf, config: &ToolConfig) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║               ir-tool · Model Inspector              ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let graph = super::load_model(&model, config)?;

    // ── Summary ────────────────────────────────────────────────
    println!("  File: {}", model.display());
    println!("  {}", graph.summary());
    println!();

    // ── Per-Node Detail ────────────────────────────────────────
    for line in node_table(&graph)? {
        println!("  {line}");
    }
    println!();
    Ok(())
}

/// Header, rule and one row per node in topological order.
fn node_table(graph: &Model) -> anyhow::Result<Vec<String>> {
    let mut lines = vec![
        format!(
            "{:<4} {:<10} {:<32} {:<24} {:<24} {}",
            "Idx", "Id", "Type", "Inputs", "Outputs", "Reads"
        ),
        "-".repeat(110),
    ];
    for (index, id) in graph.topological_order()?.into_iter().enumerate() {
        let node = graph.node(id)?;
        let reads: Vec<String> = node.dependencies().iter().map(|d| d.to_string()).collect();
        lines.push(format!(
            "{:<4} {:<10} {:<32} {:<24} {:<24} {}",
            index,
            id.to_string(),
            truncate(&node.runtime_type_name(), 32),
            input_shapes(node),
            output_shapes(node),
            reads.join(", "),
        ));
    }
    Ok(lines)
}

fn input_shapes(node: &dyn Node) -> String {
    node.input_ports()
        .iter()
        .map(|p| format!("{}[{}]", p.name(), p.size()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn output_shapes(node: &dyn Node) -> String {
    node.output_ports()
        .iter()
        .map(|p| format!("{}[{}]", p.name(), p.size()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Truncates a string to `max_len` with ellipsis if needed.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_table_rows() {
        let graph = super::super::demo::sample_model().unwrap();
        let lines = node_table(&graph).unwrap();
        assert_eq!(lines.len(), graph.len() + 2);
        assert!(lines[2].contains("InputNode<double>"));
        assert!(lines[2].contains("output[3]"));
        assert!(lines.last().unwrap().contains("OutputNode<double>"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("BinaryOperationNode<double>", 10), "BinaryO...");
    }
}
