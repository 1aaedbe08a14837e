// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # ir-archive
//!
//! The structured archive protocol used to persist model graphs.
//!
//! Archivable objects never talk to a file format directly. They write a set
//! of named, typed properties into an [`Archiver`] and read them back through
//! an [`Unarchiver`]. The resulting [`Archive`] is a plain value tree that any
//! [`ArchiveFormat`] can encode:
//!
//! ```text
//! Archivable ──write_to_archive──► Archiver ──► Archive ──encode──► bytes
//! Archivable ◄─read_from_archive── Unarchiver ◄── Archive ◄──decode── bytes
//! ```
//!
//! - [`ArchiveValue`]: a typed property value (`bool`, `int`, `uint`,
//!   `float`, `string`, `array`, `object`).
//! - [`Archive`]: a named property map, the unit every object archives into.
//! - [`Archivable`]: the write/read contract.
//! - [`ArchiveFormat`]: JSON and MessagePack encodings. Every format is
//!   symmetric: what it writes it reads back unchanged.
//!
//! # Example
//! ```
//! use ir_archive::{Archivable, ArchiveError, ArchiveFormat, Archiver, Unarchiver};
//!
//! #[derive(Default)]
//! struct Gain {
//!     factor: f64,
//! }
//!
//! impl Archivable for Gain {
//!     fn write_to_archive(&self, archiver: &mut Archiver) {
//!         archiver.write("factor", self.factor);
//!     }
//!
//!     fn read_from_archive(&mut self, unarchiver: &Unarchiver<'_>) -> Result<(), ArchiveError> {
//!         self.factor = unarchiver.read("factor")?;
//!         Ok(())
//!     }
//! }
//!
//! let archive = ir_archive::to_archive(&Gain { factor: 2.5 });
//! let bytes = ArchiveFormat::Json.encode(&archive).unwrap();
//! let decoded = ArchiveFormat::Json.decode(&bytes).unwrap();
//!
//! let mut restored = Gain::default();
//! restored.read_from_archive(&Unarchiver::new(&decoded)).unwrap();
//! assert_eq!(restored.factor, 2.5);
//! ```

mod archiver;
mod error;
mod format;
mod value;

pub use archiver::{to_archive, Archivable, Archiver, Unarchiver};
pub use error::ArchiveError;
pub use format::ArchiveFormat;
pub use value::{Archive, ArchiveValue, FromArchiveValue};
