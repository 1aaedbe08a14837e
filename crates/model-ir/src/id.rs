// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Node identity.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Next id handed out by [`NodeId::fresh`]. `0` is never issued.
static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a node.
///
/// Ids are assigned once at node construction and never reused within a
/// process. They are the only way ports refer to other nodes, so a node
/// never holds a pointer into the model that owns it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocates a new, never before issued id.
    pub fn fresh() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Wraps a raw value, e.g. an id read back from an archive.
    ///
    /// This does not reserve the value; use it only for lookups and for
    /// descriptors that are remapped before use.
    pub fn from_raw(raw: u64) -> Self {
        NodeId(raw)
    }

    /// Returns the raw value.
    #[inline]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_ids_are_unique() {
        let a = NodeId::fresh();
        let b = NodeId::fresh();
        assert_ne!(a, b);
        assert!(b > a);
        assert_ne!(a.value(), 0);
    }

    #[test]
    fn test_formatting() {
        let id = NodeId::from_raw(12);
        assert_eq!(format!("{id}"), "node#12");
        assert_eq!(format!("{id:?}"), "NodeId(12)");
    }
}
