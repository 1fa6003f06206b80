//! Decode boundary for the external document decoder.
//!
//! The decoder itself is an external collaborator; this module only reads
//! its JSON output tree. Exactly one input mode is used per run: an
//! in-memory buffer, a reader, or a file path. Any failure surfaces as
//! [`Error::Decode`] and aborts the whole pipeline — there are no retries.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::RawDocument;

/// Read a decoded document tree from an in-memory buffer.
pub fn tree_from_bytes(data: &[u8]) -> Result<RawDocument> {
    serde_json::from_slice(data).map_err(|e| Error::Decode(e.to_string()))
}

/// Read a decoded document tree from any reader.
pub fn tree_from_reader<R: Read>(reader: R) -> Result<RawDocument> {
    serde_json::from_reader(reader).map_err(|e| Error::Decode(e.to_string()))
}

/// Read a decoded document tree from a file on disk.
pub fn tree_from_path<P: AsRef<Path>>(path: P) -> Result<RawDocument> {
    let file = File::open(path)?;
    tree_from_reader(BufReader::new(file))
}

/// Read a decoded document tree from a file without blocking the runtime.
#[cfg(feature = "async")]
pub async fn tree_from_path_async<P: AsRef<Path>>(path: P) -> Result<RawDocument> {
    let data = tokio::fs::read(path).await?;
    tree_from_bytes(&data)
}
