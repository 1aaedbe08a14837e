// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for archiving and unarchiving.

/// Errors that can occur while writing, encoding, decoding or reading an archive.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// A required property is not present in the archive.
    #[error("missing property '{name}'")]
    MissingProperty { name: String },

    /// A property holds a value of a different type than requested.
    #[error("expected {expected}, found {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },

    /// A numeric property does not fit the requested type.
    #[error("value {value} out of range for {target}")]
    OutOfRange { target: &'static str, value: String },

    /// An error raised while reading a named property (wraps the cause).
    #[error("property '{name}': {source}")]
    Property {
        name: String,
        #[source]
        source: Box<ArchiveError>,
    },

    /// A property was read successfully but its content is not acceptable
    /// (e.g. an unknown enum spelling or inconsistent sizes).
    #[error("invalid value: {detail}")]
    InvalidValue { detail: String },

    /// The archive was written by an incompatible version of the layout.
    #[error("unsupported archive version {found} (supported: {supported})")]
    UnsupportedVersion { found: u64, supported: u64 },

    /// The requested archive format is not known.
    #[error("unknown archive format '{0}'")]
    UnknownFormat(String),

    /// The archive file could not be read or written.
    #[error("archive I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed.
    #[error("JSON archive error: {0}")]
    Json(#[from] serde_json::Error),

    /// MessagePack encoding failed.
    #[error("MessagePack encode error: {0}")]
    MsgPackEncode(#[from] rmp_serde::encode::Error),

    /// MessagePack decoding failed.
    #[error("MessagePack decode error: {0}")]
    MsgPackDecode(#[from] rmp_serde::decode::Error),
}

impl ArchiveError {
    /// Wraps this error with the name of the property being read, so nested
    /// failures report the full path to the offending property.
    pub fn in_property(self, name: &str) -> Self {
        ArchiveError::Property {
            name: name.to_string(),
            source: Box::new(self),
        }
    }
}
