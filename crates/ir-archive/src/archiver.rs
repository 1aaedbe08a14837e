// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`Archivable`] contract and the [`Archiver`] / [`Unarchiver`] pair.

use crate::{Archive, ArchiveError, ArchiveValue, FromArchiveValue};

/// An object that can persist its state as named properties and restore it.
///
/// `read_from_archive` must accept everything `write_to_archive` produces.
/// Objects are read *into* an existing (usually default-constructed) value,
/// which is how factories rebuild objects whose concrete type is only known
/// from an archived type tag.
pub trait Archivable {
    /// Writes this object's properties.
    fn write_to_archive(&self, archiver: &mut Archiver);

    /// Restores this object's state from previously written properties.
    fn read_from_archive(&mut self, unarchiver: &Unarchiver<'_>) -> Result<(), ArchiveError>;
}

/// Archives a single object into a fresh [`Archive`].
pub fn to_archive<A: Archivable + ?Sized>(object: &A) -> Archive {
    let mut archiver = Archiver::new();
    object.write_to_archive(&mut archiver);
    archiver.into_archive()
}

/// Collects the properties written by an [`Archivable`].
#[derive(Debug, Default)]
pub struct Archiver {
    archive: Archive,
}

impl Archiver {
    /// Creates an archiver with no properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a named property. Writing the same name twice keeps the last value.
    pub fn write(&mut self, name: &str, value: impl Into<ArchiveValue>) {
        self.archive.insert(name, value.into());
    }

    /// Writes a nested object under `name`.
    pub fn write_object<A: Archivable + ?Sized>(&mut self, name: &str, object: &A) {
        self.write(name, to_archive(object));
    }

    /// Writes a list of nested objects under `name`.
    pub fn write_objects<'a, A, I>(&mut self, name: &str, objects: I)
    where
        A: Archivable + ?Sized + 'a,
        I: IntoIterator<Item = &'a A>,
    {
        let items: Vec<ArchiveValue> = objects
            .into_iter()
            .map(|o| ArchiveValue::Object(to_archive(o)))
            .collect();
        self.write(name, ArchiveValue::Array(items));
    }

    /// Finishes writing and returns the collected properties.
    pub fn into_archive(self) -> Archive {
        self.archive
    }
}

/// Reads typed properties out of an [`Archive`].
#[derive(Debug, Clone, Copy)]
pub struct Unarchiver<'a> {
    archive: &'a Archive,
}

impl<'a> Unarchiver<'a> {
    /// Creates an unarchiver over the given properties.
    pub fn new(archive: &'a Archive) -> Self {
        Self { archive }
    }

    /// The underlying properties.
    pub fn archive(&self) -> &'a Archive {
        self.archive
    }

    /// Returns `true` if the property exists.
    pub fn has(&self, name: &str) -> bool {
        self.archive.contains(name)
    }

    /// Returns the raw value of a property.
    pub fn value(&self, name: &str) -> Result<&'a ArchiveValue, ArchiveError> {
        self.archive
            .get(name)
            .ok_or_else(|| ArchiveError::MissingProperty {
                name: name.to_string(),
            })
    }

    /// Reads a typed property.
    pub fn read<T: FromArchiveValue>(&self, name: &str) -> Result<T, ArchiveError> {
        let value = self.value(name)?;
        T::from_archive_value(value).map_err(|e| e.in_property(name))
    }

    /// Reads a typed property, falling back to `default` when it is absent.
    ///
    /// A property that exists but has the wrong type is still an error.
    pub fn read_or<T: FromArchiveValue>(&self, name: &str, default: T) -> Result<T, ArchiveError> {
        if self.has(name) {
            self.read(name)
        } else {
            Ok(default)
        }
    }

    /// Returns an unarchiver over a nested object property.
    pub fn object(&self, name: &str) -> Result<Unarchiver<'a>, ArchiveError> {
        match self.value(name)? {
            ArchiveValue::Object(inner) => Ok(Unarchiver::new(inner)),
            other => Err(ArchiveError::WrongType {
                expected: "object",
                found: other.kind(),
            }
            .in_property(name)),
        }
    }

    /// Reads a nested object property into `target`.
    pub fn read_object<A: Archivable + ?Sized>(
        &self,
        name: &str,
        target: &mut A,
    ) -> Result<(), ArchiveError> {
        let inner = self.object(name)?;
        target
            .read_from_archive(&inner)
            .map_err(|e| e.in_property(name))
    }

    /// Returns unarchivers over every element of an array-of-objects property.
    pub fn objects(&self, name: &str) -> Result<Vec<Unarchiver<'a>>, ArchiveError> {
        let items = match self.value(name)? {
            ArchiveValue::Array(items) => items,
            other => {
                return Err(ArchiveError::WrongType {
                    expected: "array",
                    found: other.kind(),
                }
                .in_property(name))
            }
        };

        items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                ArchiveValue::Object(inner) => Ok(Unarchiver::new(inner)),
                other => Err(ArchiveError::WrongType {
                    expected: "object",
                    found: other.kind(),
                }
                .in_property(&format!("{name}[{i}]"))),
            })
            .collect()
    }
}
