// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `ir-tool transform` command: run refinement passes and save the result.

use crate::config::ToolConfig;
use anyhow::Context;
use std::path::PathBuf;

pub fn execute(
    model: PathBuf,
    output: PathBuf,
    passes: Vec<String>,
    config: &ToolConfig,
) -> anyhow::Result<()> {
    let passes = config.create_passes(&passes)?;
    let mut current = super::load_model(&model, config)?;

    println!("  {:<16} {:>6}", "Pass", "Nodes");
    println!("  {}", "-".repeat(23));
    println!("  {:<16} {:>6}", "(source)", current.len());
    for pass in passes {
        current = pass
            .run(&current)
            .with_context(|| format!("pass '{}' failed", pass.name()))?;
        println!("  {:<16} {:>6}", pass.name(), current.len());
    }

    super::save_model(&current, &output, config)?;
    println!();
    println!("  Wrote {}", output.display());
    Ok(())
}
