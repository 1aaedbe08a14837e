// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Input ports: typed views onto upstream output ports.

use crate::output_port::read_port_type;
use crate::{Model, ModelError, NodeId, PortElements};
use ir_archive::{Archivable, ArchiveError, Archiver, Unarchiver};
use port_types::{Element, PortType};
use std::any::Any;
use std::marker::PhantomData;

/// Type-erased view of an [`InputPort`].
pub trait InputPortBase {
    /// Name of the port within its node.
    fn name(&self) -> &str;

    /// Id of the owning node.
    fn node(&self) -> NodeId;

    fn port_type(&self) -> PortType;

    /// The referenced upstream elements.
    fn elements(&self) -> &PortElements;

    /// Mutable access to the references, used when remapping node ids.
    fn elements_mut(&mut self) -> &mut PortElements;

    /// Number of elements read per compute.
    fn size(&self) -> usize {
        self.elements().size()
    }

    fn as_any(&self) -> &dyn Any;
}

/// An input of element type `T`.
///
/// Holds no values: [`values`](InputPort::values) reads through the
/// references each time.
#[derive(Debug, Clone)]
pub struct InputPort<T: Element> {
    node: NodeId,
    name: String,
    elements: PortElements,
    _element: PhantomData<T>,
}

impl<T: Element> InputPort<T> {
    pub fn new(node: NodeId, name: &str, elements: PortElements) -> Self {
        Self {
            node,
            name: name.to_string(),
            elements,
            _element: PhantomData,
        }
    }

    /// Reads the current upstream values from `model`.
    pub fn values(&self, model: &Model) -> Result<Vec<T>, ModelError> {
        model.read_values(&self.elements)
    }
}

impl<T: Element> InputPortBase for InputPort<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn node(&self) -> NodeId {
        self.node
    }

    fn port_type(&self) -> PortType {
        T::PORT_TYPE
    }

    fn elements(&self) -> &PortElements {
        &self.elements
    }

    fn elements_mut(&mut self) -> &mut PortElements {
        &mut self.elements
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Persists the element type and the reference descriptors. Node ids in
/// the descriptors are the archived ids and must be remapped after load.
impl<T: Element> Archivable for InputPort<T> {
    fn write_to_archive(&self, archiver: &mut Archiver) {
        archiver.write("name", self.name.as_str());
        archiver.write("type", T::type_name());
        archiver.write_object("elements", &self.elements);
    }

    fn read_from_archive(&mut self, unarchiver: &Unarchiver<'_>) -> Result<(), ArchiveError> {
        read_port_type::<T>(unarchiver)?;
        unarchiver.read_object("elements", &mut self.elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PortRange, PortRef};
    use ir_archive::to_archive;

    fn elements() -> PortElements {
        PortElements::from_range(PortRange::new(
            PortRef::new(NodeId::from_raw(3), "output"),
            1,
            2,
        ))
    }

    #[test]
    fn test_base_view() {
        let port = InputPort::<bool>::new(NodeId::from_raw(9), "input", elements());
        let base: &dyn InputPortBase = &port;
        assert_eq!(base.name(), "input");
        assert_eq!(base.node(), NodeId::from_raw(9));
        assert_eq!(base.port_type(), PortType::Boolean);
        assert_eq!(base.size(), 2);
    }

    #[test]
    fn test_archive_round_trip() {
        let port = InputPort::<i64>::new(NodeId::from_raw(9), "input1", elements());
        let archive = to_archive(&port);

        let mut back = InputPort::<i64>::new(NodeId::from_raw(10), "input1", PortElements::new());
        back.read_from_archive(&Unarchiver::new(&archive)).unwrap();
        assert_eq!(back.elements(), &elements());

        let mut wrong = InputPort::<f64>::new(NodeId::from_raw(10), "input1", PortElements::new());
        assert!(wrong.read_from_archive(&Unarchiver::new(&archive)).is_err());
    }
}
