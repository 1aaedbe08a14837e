// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tool configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! default_format = "msgpack"
//! passes = ["fold-constants", "prune"]
//! verify_round_trip = true
//! ```

use anyhow::{bail, Context};
use ir_archive::ArchiveFormat;
use model_ir::passes::{fold_constants, prune_unused};
use model_ir::{Model, ModelError, ModelTransformer};
use std::path::Path;

/// Configuration for `ir-tool`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Format used when a path's extension is not a known archive format.
    pub default_format: ArchiveFormat,
    /// Passes `transform` runs when none are given on the command line.
    pub passes: Vec<String>,
    /// Re-load every saved model and compare it with what was written.
    pub verify_round_trip: bool,
}

impl ToolConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config '{}'", path.display()))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str(toml_str).context("TOML parse error")
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("TOML serialise error")
    }

    /// The archive format for `path`: its extension, else `default_format`.
    pub fn format_for(&self, path: &Path) -> ArchiveFormat {
        ArchiveFormat::from_path(path).unwrap_or(self.default_format)
    }

    /// Resolves pass names, falling back to the configured list and then
    /// to a single identity copy.
    pub fn create_passes(&self, names: &[String]) -> anyhow::Result<Vec<Pass>> {
        let names = if names.is_empty() { self.passes.as_slice() } else { names };
        if names.is_empty() {
            return Ok(vec![Pass::Identity]);
        }
        names.iter().map(|n| Pass::parse(n)).collect()
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            default_format: ArchiveFormat::Json,
            passes: Vec::new(),
            verify_round_trip: false,
        }
    }
}

/// A model-to-model rewrite selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Identity,
    Prune,
    FoldConstants,
}

impl Pass {
    pub fn parse(name: &str) -> anyhow::Result<Self> {
        match name.to_lowercase().as_str() {
            "identity" | "copy" => Ok(Self::Identity),
            "prune" | "prune-unused" => Ok(Self::Prune),
            "fold-constants" | "fold" => Ok(Self::FoldConstants),
            other => bail!(
                "unknown pass '{other}'; expected 'identity', 'prune', or 'fold-constants'"
            ),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Prune => "prune",
            Self::FoldConstants => "fold-constants",
        }
    }

    pub fn run(self, model: &Model) -> Result<Model, ModelError> {
        match self {
            Self::Identity => ModelTransformer::new().copy_model(model),
            Self::Prune => prune_unused(model),
            Self::FoldConstants => fold_constants(model),
        }
    }
}
