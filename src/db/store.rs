// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable JSON document store.
//!
//! Each [`Collection`] is one pretty-printed JSON document mapping a string
//! key to a record. Documents are always replaced whole: the new contents are
//! written to a temporary file in the same directory and renamed over the
//! target, so readers see either the previous or the next version, never a
//! partial one.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Version written into every document envelope.
pub const SCHEMA_VERSION: u32 = 1;

/// Independently persisted documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Teams,
    Requests,
    Invites,
    /// Internal counters (team number high-water mark)
    Sequences,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Teams => "teams",
            Self::Requests => "requests",
            Self::Invites => "invites",
            Self::Sequences => "sequences",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.name())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Storage failures. These are system errors, not entity errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to create data directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error on {collection} document {}: {source}", .path.display())]
    Io {
        collection: Collection,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to encode {collection} document: {source}")]
    Serialize {
        collection: Collection,
        #[source]
        source: serde_json::Error,
    },

    #[error("Corrupt {collection} document {}: {reason}", .path.display())]
    Corrupt {
        collection: Collection,
        path: PathBuf,
        reason: String,
    },
}

#[derive(Serialize)]
struct DocumentRef<'a, T> {
    schema_version: u32,
    records: &'a BTreeMap<String, T>,
}

#[derive(Deserialize)]
struct VersionedDocument<T> {
    schema_version: u32,
    records: BTreeMap<String, T>,
}

/// Directory-backed store holding one document per collection.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Open (creating if needed) the data directory.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| StoreError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        tracing::debug!(dir = %dir.display(), "JSON store opened");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, collection: Collection) -> PathBuf {
        self.dir.join(collection.file_name())
    }

    /// Read the full contents of a collection.
    ///
    /// A missing document is initialized to an empty one and an empty
    /// mapping is returned.
    pub fn read<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<BTreeMap<String, T>, StoreError> {
        let path = self.path(collection);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(collection = %collection, "Initializing empty document");
                self.write::<serde_json::Value>(collection, &BTreeMap::new())?;
                return Ok(BTreeMap::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    collection,
                    path,
                    source,
                })
            }
        };

        decode(collection, &path, &raw)
    }

    /// Atomically replace the full contents of a collection.
    pub fn write<T: Serialize>(
        &self,
        collection: Collection,
        records: &BTreeMap<String, T>,
    ) -> Result<(), StoreError> {
        let path = self.path(collection);
        let io_err = |source: io::Error| StoreError::Io {
            collection,
            path: path.clone(),
            source,
        };

        let document = DocumentRef {
            schema_version: SCHEMA_VERSION,
            records,
        };
        let mut bytes = serde_json::to_vec_pretty(&document)
            .map_err(|source| StoreError::Serialize { collection, source })?;
        bytes.push(b'\n');

        // Dropping the temp file on any early return removes it.
        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{}.", collection.name()))
            .suffix(".tmp")
            .tempfile_in(&self.dir)
            .map_err(io_err)?;
        tmp.write_all(&bytes).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&path).map_err(|e| io_err(e.error))?;

        tracing::debug!(
            collection = %collection,
            records = records.len(),
            "Document replaced"
        );
        Ok(())
    }
}

/// Parse a document: the versioned envelope, or a bare legacy mapping.
fn decode<T: DeserializeOwned>(
    collection: Collection,
    path: &Path,
    raw: &str,
) -> Result<BTreeMap<String, T>, StoreError> {
    let corrupt = |reason: String| StoreError::Corrupt {
        collection,
        path: path.to_path_buf(),
        reason,
    };

    let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| corrupt(e.to_string()))?;
    let is_versioned = value
        .as_object()
        .is_some_and(|obj| obj.contains_key("schema_version"));

    if is_versioned {
        let document: VersionedDocument<T> =
            serde_json::from_value(value).map_err(|e| corrupt(e.to_string()))?;
        if document.schema_version > SCHEMA_VERSION {
            return Err(corrupt(format!(
                "unsupported schema_version {} (max {})",
                document.schema_version, SCHEMA_VERSION
            )));
        }
        Ok(document.records)
    } else {
        tracing::info!(collection = %collection, "Reading legacy unversioned document");
        serde_json::from_value(value).map_err(|e| corrupt(e.to_string()))
    }
}
