// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Model archival: [`Model`] ⇄ [`Archive`] ⇄ file.
//!
//! The archived layout is
//!
//! ```text
//! { format_version: 1,
//!   nodes: [ { type: "InputNode<double>", id: 17, state: { ... } }, ... ] }
//! ```
//!
//! Nodes are written in insertion order. Input ports archive their
//! references as `(node id, port name, start, count)` descriptors using the
//! ids of the saving process.
//!
//! Loading runs in two passes:
//! 1. Every entry is turned into a node through the [`NodeRegistry`] and its
//!    state is read. The node gets a fresh id; the archived id is recorded.
//! 2. Every reference descriptor is remapped from archived ids to the new
//!    ids. A descriptor naming an id that is not in the archive is a
//!    dangling reference.
//!
//! The finished model is then validated as a whole (types, ranges,
//! acyclicity). Any failure discards everything built so far.

use crate::{Model, ModelError, NodeId, NodeRegistry};
use ir_archive::{Archive, ArchiveError, ArchiveFormat, ArchiveValue, Archiver, Unarchiver};
use std::collections::HashMap;
use std::path::Path;

/// Version of the archived model layout.
pub const ARCHIVE_FORMAT_VERSION: u64 = 1;

/// Converts models to archives and files, and back.
///
/// # Example
/// ```
/// use model_ir::{InputNode, Model, ModelLoader, NodeRegistry};
///
/// let mut model = Model::new();
/// model.add_node(InputNode::<f64>::new(3)).unwrap();
///
/// let archive = ModelLoader::to_archive(&model);
/// let restored = ModelLoader::from_archive(&archive, &NodeRegistry::default()).unwrap();
/// assert_eq!(restored.len(), 1);
/// ```
pub struct ModelLoader;

impl ModelLoader {
    /// Archives every node of `model` in insertion order.
    pub fn to_archive(model: &Model) -> Archive {
        let mut archiver = Archiver::new();
        archiver.write("format_version", ARCHIVE_FORMAT_VERSION);

        let nodes: Vec<ArchiveValue> = model
            .iter()
            .map(|node| {
                let mut entry = Archiver::new();
                entry.write("type", node.runtime_type_name());
                entry.write("id", node.id().value());
                entry.write_object("state", node);
                ArchiveValue::Object(entry.into_archive())
            })
            .collect();
        archiver.write("nodes", ArchiveValue::Array(nodes));
        archiver.into_archive()
    }

    /// Rebuilds a model from an archive. Node types are resolved through
    /// `registry`; nodes get fresh ids.
    pub fn from_archive(archive: &Archive, registry: &NodeRegistry) -> Result<Model, ModelError> {
        let unarchiver = Unarchiver::new(archive);
        let version: u64 = unarchiver.read("format_version")?;
        if version != ARCHIVE_FORMAT_VERSION {
            return Err(ArchiveError::UnsupportedVersion {
                found: version,
                supported: ARCHIVE_FORMAT_VERSION,
            }
            .into());
        }

        // Pass 1: construct nodes, remember archived id -> new id.
        let entries = unarchiver.objects("nodes")?;
        let mut id_map: HashMap<u64, NodeId> = HashMap::with_capacity(entries.len());
        let mut nodes = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            let in_entry = |e: ArchiveError| e.in_property(&format!("nodes[{i}]"));
            let type_name: String = entry.read("type").map_err(in_entry)?;
            let archived_id: u64 = entry.read("id").map_err(in_entry)?;

            let mut node = registry.create(&type_name)?;
            entry
                .read_object("state", node.as_mut())
                .map_err(in_entry)?;

            if id_map.insert(archived_id, node.id()).is_some() {
                return Err(ModelError::DuplicateNode(NodeId::from_raw(archived_id)));
            }
            nodes.push(node);
        }

        // Pass 2: remap reference descriptors onto the new ids.
        for node in &mut nodes {
            let owner = node.id();
            for port in node.input_ports_mut() {
                let port_name = port.name().to_string();
                port.elements_mut()
                    .remap_nodes(|archived| id_map.get(&archived.value()).copied())
                    .map_err(|target| ModelError::DanglingReference {
                        target,
                        detail: format!(
                            "referenced by input '{port_name}' of {owner}, no node with that id in the archive"
                        ),
                    })?;
            }
        }

        let mut model = Model::new();
        for node in nodes {
            model.insert_unchecked(node)?;
        }
        model.validate()?;
        Ok(model)
    }

    /// Writes `model` to `path` in the given format.
    pub fn save(model: &Model, path: &Path, format: ArchiveFormat) -> Result<(), ModelError> {
        format.write_file(&Self::to_archive(model), path)?;
        tracing::info!(
            "saved model ({} nodes) to '{}' as {}",
            model.len(),
            path.display(),
            format
        );
        Ok(())
    }

    /// Loads a model, picking the format from the file extension.
    pub fn load(path: &Path, registry: &NodeRegistry) -> Result<Model, ModelError> {
        let format = ArchiveFormat::from_path(path).ok_or_else(|| {
            ArchiveError::UnknownFormat(
                path.extension()
                    .map(|e| e.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            )
        })?;
        Self::load_with_format(path, format, registry)
    }

    /// Loads a model stored in a known format.
    pub fn load_with_format(
        path: &Path,
        format: ArchiveFormat,
        registry: &NodeRegistry,
    ) -> Result<Model, ModelError> {
        let archive = format.read_file(path)?;
        let model = Self::from_archive(&archive, registry)?;
        tracing::info!(
            "loaded model ({} nodes) from '{}'",
            model.len(),
            path.display()
        );
        Ok(model)
    }
}
