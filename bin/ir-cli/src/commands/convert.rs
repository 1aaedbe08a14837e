// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `ir-tool convert` command: re-encode a model archive.

use crate::config::ToolConfig;
use std::path::PathBuf;

pub fn execute(model: PathBuf, output: PathBuf, config: &ToolConfig) -> anyhow::Result<()> {
    let graph = super::load_model(&model, config)?;
    super::save_model(&graph, &output, config)?;
    println!(
        "  {} ({}) -> {} ({}), {} nodes",
        model.display(),
        config.format_for(&model),
        output.display(),
        config.format_for(&output),
        graph.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_to_msgpack() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("demo.json");
        let msgpack = dir.path().join("demo.msgpack");
        let config = ToolConfig {
            verify_round_trip: true,
            ..Default::default()
        };
        super::super::demo::execute(json.clone(), &config).unwrap();
        execute(json.clone(), msgpack.clone(), &config).unwrap();

        let a = super::super::load_model(&json, &config).unwrap();
        let b = super::super::load_model(&msgpack, &config).unwrap();
        assert_eq!(a.len(), b.len());
        assert!(std::fs::metadata(&msgpack).unwrap().len() < std::fs::metadata(&json).unwrap().len());
    }
}
