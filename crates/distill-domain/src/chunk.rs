//! Chunk module - identified fragments of a source document

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a chunk, unique within one document
///
/// Chunk ids are produced by the chunk source and treated as opaque by the
/// pipeline. They are ordered lexically only for map keys; document order is
/// carried by [`Chunk::position`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkId(String);

impl ChunkId {
    /// Create a chunk id from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create the conventional id for the chunk at a 1-based ordinal
    ///
    /// # Examples
    ///
    /// ```
    /// use distill_domain::ChunkId;
    ///
    /// assert_eq!(ChunkId::ordinal(3).as_str(), "chunk_3");
    /// ```
    pub fn ordinal(n: usize) -> Self {
        Self(format!("chunk_{}", n))
    }

    /// Borrow the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChunkId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A contiguous, identified fragment of the source document
///
/// Chunks are immutable once produced by the chunk source. The pipeline never
/// rewrites `text`; every quote it emits is a slice of some chunk's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Stable identifier, unique within the document
    pub chunk_id: ChunkId,

    /// Verbatim text of the fragment
    pub text: String,

    /// 0-based ordinal defining document order
    pub position: usize,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(chunk_id: impl Into<ChunkId>, text: impl Into<String>, position: usize) -> Self {
        Self {
            chunk_id: chunk_id.into(),
            text: text.into(),
            position,
        }
    }

    /// Whether the chunk carries no visible text
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl From<String> for ChunkId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_id_display() {
        let id = ChunkId::ordinal(12);
        assert_eq!(id.to_string(), "chunk_12");
        assert_eq!(id, ChunkId::from("chunk_12"));
    }

    #[test]
    fn test_blank_chunk() {
        assert!(Chunk::new("chunk_1", "  \n\t ", 0).is_blank());
        assert!(!Chunk::new("chunk_1", "Text.", 0).is_blank());
    }

    #[test]
    fn test_chunk_id_serializes_as_string() {
        let json = serde_json::to_string(&ChunkId::ordinal(1)).unwrap();
        assert_eq!(json, "\"chunk_1\"");
    }
}
