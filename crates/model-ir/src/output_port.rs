// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Output ports: the only place values live.

use crate::{ModelError, NodeId, PortRef};
use ir_archive::{Archivable, ArchiveError, Archiver, Unarchiver};
use port_types::{Element, PortType};
use std::any::Any;
use std::cell::RefCell;
use std::ops::Range;

/// Largest port size accepted from an archive, in elements.
pub const MAX_ARCHIVED_PORT_SIZE: usize = 1 << 26;

/// Type-erased view of an [`OutputPort`].
pub trait OutputPortBase {
    /// The port's address.
    fn port_ref(&self) -> &PortRef;

    /// Name of the port within its node.
    fn name(&self) -> &str {
        self.port_ref().name()
    }

    /// Id of the owning node.
    fn node(&self) -> NodeId {
        self.port_ref().node()
    }

    fn port_type(&self) -> PortType;

    /// Number of elements produced per compute.
    fn size(&self) -> usize;

    /// The current values rendered as text.
    fn value_strings(&self) -> Vec<String>;

    fn as_any(&self) -> &dyn Any;
}

/// A fixed-size sequence of `T` values produced by its node's `compute`.
///
/// The buffer sits behind a [`RefCell`] so a node can fill it from
/// `compute(&self, ..)` while the model is shared.
#[derive(Debug)]
pub struct OutputPort<T: Element> {
    port_ref: PortRef,
    size: usize,
    values: RefCell<Vec<T>>,
}

impl<T: Element> OutputPort<T> {
    /// Creates a port of `size` elements, initialised to `T::default()`.
    pub fn new(node: NodeId, name: &str, size: usize) -> Self {
        Self {
            port_ref: PortRef::new(node, name),
            size,
            values: RefCell::new(vec![T::default(); size]),
        }
    }

    /// A copy of the current values.
    pub fn values(&self) -> Vec<T> {
        self.values.borrow().clone()
    }

    /// A single value.
    pub fn value(&self, index: usize) -> Option<T> {
        self.values.borrow().get(index).copied()
    }

    /// A copy of the values in `range`, or `None` if it is out of bounds.
    pub fn values_in(&self, range: Range<usize>) -> Option<Vec<T>> {
        self.values.borrow().get(range).map(<[T]>::to_vec)
    }

    /// Replaces the values. The length must equal the port size.
    pub fn set_output(&self, values: Vec<T>) -> Result<(), ModelError> {
        if values.len() != self.size {
            return Err(ModelError::SizeMismatch {
                port: self.port_ref.to_string(),
                expected: self.size,
                actual: values.len(),
            });
        }
        *self.values.borrow_mut() = values;
        Ok(())
    }

    fn resize(&mut self, size: usize) -> Result<(), ArchiveError> {
        *self.values.get_mut() = default_buffer(size)?;
        self.size = size;
        Ok(())
    }
}

impl<T: Element> OutputPortBase for OutputPort<T> {
    fn port_ref(&self) -> &PortRef {
        &self.port_ref
    }

    fn port_type(&self) -> PortType {
        T::PORT_TYPE
    }

    fn size(&self) -> usize {
        self.size
    }

    fn value_strings(&self) -> Vec<String> {
        self.values.borrow().iter().map(ToString::to_string).collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A zeroed buffer for an archived size, or `OutOfRange` if the size is
/// above [`MAX_ARCHIVED_PORT_SIZE`] or cannot be allocated.
pub(crate) fn default_buffer<T: Element>(size: usize) -> Result<Vec<T>, ArchiveError> {
    let out_of_range = || ArchiveError::OutOfRange {
        target: "port size",
        value: size.to_string(),
    };
    if size > MAX_ARCHIVED_PORT_SIZE {
        return Err(out_of_range());
    }
    let mut values = Vec::new();
    values.try_reserve_exact(size).map_err(|_| out_of_range())?;
    values.resize(size, T::default());
    Ok(values)
}

/// Checks an archived `type` property against the element type `T`.
pub(crate) fn read_port_type<T: Element>(unarchiver: &Unarchiver<'_>) -> Result<(), ArchiveError> {
    let found: String = unarchiver.read("type")?;
    if found != T::type_name() {
        return Err(ArchiveError::InvalidValue {
            detail: format!("port holds '{found}' elements, expected '{}'", T::type_name()),
        });
    }
    Ok(())
}

/// Persists the element type and size. Values are runtime state and are
/// not archived; the port name and owner are fixed by the node.
impl<T: Element> Archivable for OutputPort<T> {
    fn write_to_archive(&self, archiver: &mut Archiver) {
        archiver.write("name", self.port_ref.name());
        archiver.write("type", T::type_name());
        archiver.write("size", self.size);
    }

    fn read_from_archive(&mut self, unarchiver: &Unarchiver<'_>) -> Result<(), ArchiveError> {
        read_port_type::<T>(unarchiver)?;
        let size = unarchiver.read("size")?;
        self.resize(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ir_archive::{to_archive, ArchiveValue};

    #[test]
    fn test_new_port_is_zeroed() {
        let port = OutputPort::<f64>::new(NodeId::from_raw(1), "output", 3);
        assert_eq!(port.values(), vec![0.0; 3]);
        assert_eq!(port.port_type(), PortType::Real);
        assert_eq!(port.name(), "output");
    }

    #[test]
    fn test_set_output_checks_size() {
        let port = OutputPort::<i32>::new(NodeId::from_raw(1), "output", 2);
        port.set_output(vec![4, 5]).unwrap();
        assert_eq!(port.values_in(1..2), Some(vec![5]));
        assert_eq!(port.value_strings(), vec!["4", "5"]);

        let err = port.set_output(vec![1]).unwrap_err();
        assert!(matches!(err, ModelError::SizeMismatch { expected: 2, actual: 1, .. }));
        assert_eq!(port.values(), vec![4, 5]);
        assert_eq!(port.values_in(1..3), None);
    }

    #[test]
    fn test_archive_restores_size() {
        let source = OutputPort::<f32>::new(NodeId::from_raw(1), "output", 5);
        let archive = to_archive(&source);

        let mut target = OutputPort::<f32>::new(NodeId::from_raw(2), "output", 0);
        target.read_from_archive(&Unarchiver::new(&archive)).unwrap();
        assert_eq!(target.size(), 5);
        assert_eq!(target.values().len(), 5);
    }

    #[test]
    fn test_archive_rejects_other_element_type() {
        let source = OutputPort::<f32>::new(NodeId::from_raw(1), "output", 5);
        let archive = to_archive(&source);

        let mut target = OutputPort::<i64>::new(NodeId::from_raw(2), "output", 0);
        let err = target
            .read_from_archive(&Unarchiver::new(&archive))
            .unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidValue { .. }));
    }

    #[test]
    fn test_archive_rejects_oversized_port() {
        let mut archive = to_archive(&OutputPort::<f64>::new(NodeId::from_raw(1), "output", 1));
        let mut target = OutputPort::<f64>::new(NodeId::from_raw(2), "output", 1);
        for size in [u64::MAX, MAX_ARCHIVED_PORT_SIZE as u64 + 1] {
            archive.insert("size", ArchiveValue::UInt(size));
            let err = target
                .read_from_archive(&Unarchiver::new(&archive))
                .unwrap_err();
            assert!(matches!(err, ArchiveError::OutOfRange { target: "port size", .. }));
            // The port keeps its previous shape.
            assert_eq!(target.size(), 1);
            assert_eq!(target.values().len(), 1);
        }
    }
}
