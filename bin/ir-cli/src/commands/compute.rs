// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `ir-tool compute` command: evaluate a model once.
//!
//! Inputs are addressed by the input node's position in compute order and
//! parsed with the node's element type. Inputs that are not assigned keep
//! their zero-initialised buffers.

use crate::config::ToolConfig;
use anyhow::{anyhow, bail, Context};
use model_ir::Model;
use std::path::PathBuf;

pub fn execute(model: PathBuf, inputs: Vec<String>, config: &ToolConfig) -> anyhow::Result<()> {
    let mut graph = super::load_model(&model, config)?;
    let assignments = inputs
        .iter()
        .map(|a| parse_assignment(a))
        .collect::<anyhow::Result<Vec<_>>>()?;

    for (name, values) in evaluate(&mut graph, &assignments)? {
        println!("  {name} = [{}]", values.join(", "));
    }
    Ok(())
}

/// Parses `<index>=<v1,v2,...>`. An empty value list assigns a
/// zero-length input.
fn parse_assignment(text: &str) -> anyhow::Result<(usize, Vec<String>)> {
    let (index, values) = text
        .split_once('=')
        .ok_or_else(|| anyhow!("input '{text}' is not of the form <index>=<v1,v2,...>"))?;
    let index: usize = index
        .trim()
        .parse()
        .with_context(|| format!("input '{text}': bad index '{index}'"))?;
    let values = if values.trim().is_empty() {
        Vec::new()
    } else {
        values.split(',').map(|v| v.trim().to_string()).collect()
    };
    Ok((index, values))
}

/// Applies the assignments, computes, and returns each output node's
/// values in compute order.
fn evaluate(
    graph: &mut Model,
    assignments: &[(usize, Vec<String>)],
) -> anyhow::Result<Vec<(String, Vec<String>)>> {
    let input_ids = graph.input_nodes()?;
    for (index, values) in assignments {
        let Some(&id) = input_ids.get(*index) else {
            bail!(
                "input index {index} out of range; the model has {} input nodes",
                input_ids.len()
            );
        };
        let texts: Vec<&str> = values.iter().map(String::as_str).collect();
        graph
            .input_node_mut(id)?
            .set_input_text(&texts)
            .with_context(|| format!("cannot set input {index}"))?;
    }

    graph.compute()?;

    let mut results = Vec::new();
    for id in graph.output_nodes()? {
        let Some(output) = graph.node(id)?.as_output_node() else {
            continue;
        };
        results.push((id.to_string(), output.output().value_strings()));
    }
    Ok(results)
}
