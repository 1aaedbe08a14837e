// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations and the helpers they share.

pub mod compute;
pub mod convert;
pub mod demo;
pub mod inspect;
pub mod transform;

use crate::config::ToolConfig;
use anyhow::{bail, Context};
use model_ir::{Model, ModelLoader, NodeRegistry};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` overrides the `-v` level.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads a model, using `default_format` for unrecognised extensions.
pub fn load_model(path: &Path, config: &ToolConfig) -> anyhow::Result<Model> {
    let format = config.format_for(path);
    ModelLoader::load_with_format(path, format, &NodeRegistry::default())
        .with_context(|| format!("failed to load model from '{}'", path.display()))
}

/// Saves a model and, if configured, loads it back to check it.
pub fn save_model(model: &Model, path: &Path, config: &ToolConfig) -> anyhow::Result<()> {
    let format = config.format_for(path);
    ModelLoader::save(model, path, format)
        .with_context(|| format!("failed to save model to '{}'", path.display()))?;

    if config.verify_round_trip {
        let restored = load_model(path, config)?;
        if type_names(&restored) != type_names(model) {
            bail!(
                "round trip of '{}' changed the model: {} nodes written, {} read back",
                path.display(),
                model.len(),
                restored.len()
            );
        }
        tracing::info!("verified round trip of '{}'", path.display());
    }
    Ok(())
}

fn type_names(model: &Model) -> Vec<String> {
    model.iter().map(|n| n.runtime_type_name()).collect()
}
