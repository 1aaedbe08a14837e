// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Port addressing: [`PortRef`], [`PortRange`] and [`PortElements`].
//!
//! An input port does not own values. It stores a [`PortElements`], an
//! ordered list of ranges over upstream output ports:
//!
//! ```text
//!   node#3.output  [0, 1, 2, 3]      node#5.output  [0, 1]
//!                      └──┬─┘                        └┬┘
//!   PortElements = [ node#3.output 1..3 , node#5.output 0..1 ]  (size 3)
//! ```
//!
//! Every reference is an id plus a port name, resolved through the owning
//! [`crate::Model`] when values are read.

use crate::output_port::OutputPortBase;
use crate::NodeId;
use ir_archive::{Archivable, ArchiveError, Archiver, Unarchiver};
use std::fmt;

/// Whether a port consumes or produces values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
    Input,
    Output,
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortDirection::Input => f.write_str("input"),
            PortDirection::Output => f.write_str("output"),
        }
    }
}

/// Names an output port: the owning node's id plus the port name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PortRef {
    node: NodeId,
    name: String,
}

impl PortRef {
    pub fn new(node: NodeId, name: impl Into<String>) -> Self {
        Self {
            node,
            name: name.into(),
        }
    }

    /// Id of the node that owns the port.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Name of the port within its node.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.node, self.name)
    }
}

/// A contiguous run of elements of one output port.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PortRange {
    port: PortRef,
    start: usize,
    count: usize,
}

impl PortRange {
    pub fn new(port: PortRef, start: usize, count: usize) -> Self {
        Self { port, start, count }
    }

    /// The referenced output port.
    pub fn port(&self) -> &PortRef {
        &self.port
    }

    /// Index of the first element.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Number of elements.
    pub fn count(&self) -> usize {
        self.count
    }

    /// One past the last element. Saturates, so a range that cannot exist
    /// still compares past the end of any port.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.count)
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}..{}]", self.port, self.start, self.end())
    }
}

impl Archivable for PortRange {
    fn write_to_archive(&self, archiver: &mut Archiver) {
        archiver.write("node", self.port.node.value());
        archiver.write("port", self.port.name.as_str());
        archiver.write("start", self.start);
        archiver.write("count", self.count);
    }

    fn read_from_archive(&mut self, unarchiver: &Unarchiver<'_>) -> Result<(), ArchiveError> {
        let node: u64 = unarchiver.read("node")?;
        let name: String = unarchiver.read("port")?;
        self.port = PortRef::new(NodeId::from_raw(node), name);
        let start: usize = unarchiver.read("start")?;
        let count: usize = unarchiver.read("count")?;
        if start.checked_add(count).is_none() {
            return Err(ArchiveError::OutOfRange {
                target: "element range",
                value: format!("{start} + {count}"),
            });
        }
        self.start = start;
        self.count = count;
        Ok(())
    }
}

/// An ordered sequence of element ranges feeding one input port.
///
/// The size of the sequence is the sum of the range counts; it is the size
/// of the input port that holds it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PortElements {
    ranges: Vec<PortRange>,
}

impl PortElements {
    /// Creates an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// All elements of an output port.
    pub fn from_port(port: &dyn OutputPortBase) -> Self {
        Self::from_range(PortRange::new(port.port_ref().clone(), 0, port.size()))
    }

    /// A single range.
    pub fn from_range(range: PortRange) -> Self {
        Self {
            ranges: vec![range],
        }
    }

    /// Builds a sequence from ranges, merging adjacent runs of the same port.
    pub fn from_ranges(ranges: impl IntoIterator<Item = PortRange>) -> Self {
        let mut elements = Self::new();
        for range in ranges {
            elements.push(range);
        }
        elements
    }

    /// Total number of elements.
    pub fn size(&self) -> usize {
        self.ranges
            .iter()
            .fold(0, |total, range| total.saturating_add(range.count))
    }

    /// Returns `true` if there are no ranges at all.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The ranges in order.
    pub fn ranges(&self) -> &[PortRange] {
        &self.ranges
    }

    /// Appends a range. A range that continues the last one is merged into it.
    pub fn push(&mut self, range: PortRange) {
        if let Some(last) = self.ranges.last_mut() {
            if last.port == range.port && last.end() == range.start {
                if let Some(count) = last.count.checked_add(range.count) {
                    last.count = count;
                    return;
                }
            }
        }
        self.ranges.push(range);
    }

    /// Appends all ranges of `other`.
    pub fn append(&mut self, other: PortElements) {
        for range in other.ranges {
            self.push(range);
        }
    }

    /// Returns elements `start..start + count` of this sequence, or `None`
    /// if that reaches past the end.
    pub fn slice(&self, start: usize, count: usize) -> Option<PortElements> {
        if start.checked_add(count)? > self.size() {
            return None;
        }

        let mut result = PortElements::new();
        let mut skip = start;
        let mut remaining = count;
        for range in &self.ranges {
            if remaining == 0 {
                break;
            }
            if skip >= range.count {
                skip -= range.count;
                continue;
            }
            let take = (range.count - skip).min(remaining);
            result.push(PortRange::new(range.port.clone(), range.start + skip, take));
            remaining -= take;
            skip = 0;
        }
        Some(result)
    }

    /// Ids of the referenced nodes, without duplicates, in first-seen order.
    pub fn referenced_nodes(&self) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        for range in &self.ranges {
            if !nodes.contains(&range.port.node) {
                nodes.push(range.port.node);
            }
        }
        nodes
    }

    /// Rewrites every node id through `map`.
    ///
    /// Stops at the first id `map` cannot resolve and returns the offending
    /// reference; ranges before it have already been rewritten.
    pub fn remap_nodes<F>(&mut self, mut map: F) -> Result<(), PortRef>
    where
        F: FnMut(NodeId) -> Option<NodeId>,
    {
        for range in &mut self.ranges {
            match map(range.port.node) {
                Some(node) => range.port.node = node,
                None => return Err(range.port.clone()),
            }
        }
        Ok(())
    }
}

impl fmt::Display for PortElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.ranges.iter().map(ToString::to_string).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

impl Archivable for PortElements {
    fn write_to_archive(&self, archiver: &mut Archiver) {
        archiver.write_objects("ranges", &self.ranges);
    }

    fn read_from_archive(&mut self, unarchiver: &Unarchiver<'_>) -> Result<(), ArchiveError> {
        let mut ranges = Vec::new();
        let mut total = 0usize;
        for (i, item) in unarchiver.objects("ranges")?.iter().enumerate() {
            let mut range = PortRange::default();
            range
                .read_from_archive(item)
                .map_err(|e| e.in_property(&format!("ranges[{i}]")))?;
            total = total
                .checked_add(range.count)
                .ok_or_else(|| ArchiveError::OutOfRange {
                    target: "element count",
                    value: format!("{total} + {}", range.count),
                })?;
            ranges.push(range);
        }
        // Kept as archived; merging happens only when building sequences.
        self.ranges = ranges;
        Ok(())
    }
}
