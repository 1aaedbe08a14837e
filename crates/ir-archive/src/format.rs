// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! On-disk encodings of an [`Archive`].
//!
//! | Format        | Extension             | Notes                                  |
//! |---------------|-----------------------|----------------------------------------|
//! | `json`        | `.json`               | Pretty printed; non-finite floats fail |
//! | `msgpack`     | `.msgpack`, `.mpk`    | Compact binary; preserves NaN / ±inf   |

use crate::{Archive, ArchiveError};
use std::path::Path;

/// A symmetric archive encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveFormat {
    /// Human-readable JSON.
    Json,
    /// Binary MessagePack.
    #[serde(rename = "msgpack", alias = "message_pack")]
    MessagePack,
}

impl ArchiveFormat {
    /// Parses a format name (`"json"`, `"msgpack"`, `"mpk"`, ...).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "msgpack" | "messagepack" | "message_pack" | "mpk" => Some(Self::MessagePack),
            _ => None,
        }
    }

    /// Picks the format from a file extension, or `None` if it is not recognised.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_str_loose)
    }

    /// Returns the canonical name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::MessagePack => "msgpack",
        }
    }

    /// Returns the canonical file extension (without the dot).
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::MessagePack => "msgpack",
        }
    }

    /// Encodes an archive to bytes.
    pub fn encode(self, archive: &Archive) -> Result<Vec<u8>, ArchiveError> {
        match self {
            Self::Json => Ok(serde_json::to_vec_pretty(archive)?),
            // Named encoding writes structs as maps, which the tagged value
            // representation needs to decode.
            Self::MessagePack => Ok(rmp_serde::to_vec_named(archive)?),
        }
    }

    /// Decodes an archive from bytes.
    pub fn decode(self, bytes: &[u8]) -> Result<Archive, ArchiveError> {
        match self {
            Self::Json => Ok(serde_json::from_slice(bytes)?),
            Self::MessagePack => Ok(rmp_serde::from_slice(bytes)?),
        }
    }

    /// Encodes and writes an archive to a file.
    pub fn write_file(self, archive: &Archive, path: &Path) -> Result<(), ArchiveError> {
        let bytes = self.encode(archive)?;
        std::fs::write(path, &bytes)?;
        tracing::debug!(
            "wrote {} archive '{}' ({} bytes)",
            self,
            path.display(),
            bytes.len()
        );
        Ok(())
    }

    /// Reads and decodes an archive from a file.
    pub fn read_file(self, path: &Path) -> Result<Archive, ArchiveError> {
        let bytes = std::fs::read(path)?;
        tracing::debug!(
            "read {} archive '{}' ({} bytes)",
            self,
            path.display(),
            bytes.len()
        );
        self.decode(&bytes)
    }
}

impl std::fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ArchiveFormat {
    type Err = ArchiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_loose(s).ok_or_else(|| ArchiveError::UnknownFormat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArchiveValue;

    fn sample_archive() -> Archive {
        let mut nested = Archive::new();
        nested.insert("count", ArchiveValue::UInt(3));
        nested.insert("offset", ArchiveValue::Int(-2));

        let mut archive = Archive::new();
        archive.insert("name", ArchiveValue::from("graph"));
        archive.insert("scale", ArchiveValue::Float(0.1));
        archive.insert("enabled", ArchiveValue::Bool(true));
        archive.insert("values", ArchiveValue::from(vec![1.5f64, -2.25]));
        archive.insert("range", ArchiveValue::Object(nested));
        archive
    }

    #[test]
    fn test_json_symmetric() {
        let archive = sample_archive();
        let bytes = ArchiveFormat::Json.encode(&archive).unwrap();
        assert_eq!(ArchiveFormat::Json.decode(&bytes).unwrap(), archive);
    }

    #[test]
    fn test_msgpack_symmetric() {
        let archive = sample_archive();
        let bytes = ArchiveFormat::MessagePack.encode(&archive).unwrap();
        assert_eq!(ArchiveFormat::MessagePack.decode(&bytes).unwrap(), archive);
    }

    #[test]
    fn test_msgpack_keeps_infinity() {
        let mut archive = Archive::new();
        archive.insert("limit", ArchiveValue::Float(f64::INFINITY));
        let bytes = ArchiveFormat::MessagePack.encode(&archive).unwrap();
        let back = ArchiveFormat::MessagePack.decode(&bytes).unwrap();
        assert_eq!(back.get("limit"), Some(&ArchiveValue::Float(f64::INFINITY)));
    }

    #[test]
    fn test_json_rejects_garbage() {
        assert!(matches!(
            ArchiveFormat::Json.decode(b"{ not json"),
            Err(ArchiveError::Json(_))
        ));
    }

    #[test]
    fn test_format_names() {
        assert_eq!(ArchiveFormat::from_str_loose("JSON"), Some(ArchiveFormat::Json));
        assert_eq!(ArchiveFormat::from_str_loose("mpk"), Some(ArchiveFormat::MessagePack));
        assert_eq!(ArchiveFormat::from_str_loose("yaml"), None);
        assert!("yaml".parse::<ArchiveFormat>().is_err());
        assert_eq!(format!("{}", ArchiveFormat::MessagePack), "msgpack");
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            ArchiveFormat::from_path(Path::new("model.json")),
            Some(ArchiveFormat::Json)
        );
        assert_eq!(
            ArchiveFormat::from_path(Path::new("dir/model.msgpack")),
            Some(ArchiveFormat::MessagePack)
        );
        assert_eq!(ArchiveFormat::from_path(Path::new("model")), None);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        for format in [ArchiveFormat::Json, ArchiveFormat::MessagePack] {
            let path = dir.path().join(format!("model.{}", format.extension()));
            format.write_file(&sample_archive(), &path).unwrap();
            assert_eq!(format.read_file(&path).unwrap(), sample_archive());
        }
    }
}
