// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # ir-tool
//!
//! Command-line interface for model IR archives.
//!
//! ## Usage
//! ```bash
//! # Write a sample model
//! ir-tool demo --output sample.json
//!
//! # Print its node table
//! ir-tool inspect --model sample.json
//!
//! # Fold constants, drop dead nodes, save as MessagePack
//! ir-tool transform --model sample.json --output folded.msgpack --pass fold-constants --pass prune
//!
//! # Evaluate it
//! ir-tool compute --model folded.msgpack --input 0=1,2,3
//! ```

mod commands;
mod config;

use clap::{Parser, Subcommand};
use config::ToolConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ir-tool",
    about = "Inspect, transform and evaluate model IR archives",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the node table of a model in compute order.
    Inspect {
        /// Path to the model archive (.json, .msgpack).
        #[arg(short, long)]
        model: PathBuf,
    },

    /// Run refinement passes over a model and save the result.
    Transform {
        /// Path to the source model archive.
        #[arg(short, long)]
        model: PathBuf,

        /// Where to write the transformed model.
        #[arg(short, long)]
        output: PathBuf,

        /// Pass to run: identity, prune, fold-constants. Repeatable; runs in order.
        #[arg(short, long = "pass")]
        passes: Vec<String>,
    },

    /// Re-encode a model archive in the format implied by the output path.
    Convert {
        /// Path to the source model archive.
        #[arg(short, long)]
        model: PathBuf,

        /// Where to write the converted model.
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Set input nodes, compute the model and print output node values.
    Compute {
        /// Path to the model archive.
        #[arg(short, long)]
        model: PathBuf,

        /// Input assignment `<index>=<v1,v2,...>`; index is the input node's
        /// position in compute order. Repeatable.
        #[arg(short, long = "input")]
        inputs: Vec<String>,
    },

    /// Write a small sample model.
    Demo {
        /// Where to write the sample model.
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    commands::init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => ToolConfig::from_file(path)?,
        None => ToolConfig::default(),
    };

    match cli.command {
        Commands::Inspect { model } => commands::inspect::execute(model, &config),
        Commands::Transform {
            model,
            output,
            passes,
        } => commands::transform::execute(model, output, passes, &config),
        Commands::Convert { model, output } => commands::convert::execute(model, output, &config),
        Commands::Compute { model, inputs } => commands::compute::execute(model, inputs, &config),
        Commands::Demo { output } => commands::demo::execute(output, &config),
    }
}
