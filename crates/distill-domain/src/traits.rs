//! Trait definitions for external collaborators
//!
//! These traits define the boundary between the extraction core and the
//! glue around it. Implementations live in other crates.

use crate::Chunk;

/// Trait for splitting raw text into chunks
///
/// Implementations must cover the whole document without gaps, emit chunk
/// ids unique within the document, and assign positions in document order.
///
/// Implemented by `distill-extractor` (`TextChunker`)
pub trait ChunkSource {
    /// Strategy name reported in result metadata
    fn strategy_name(&self) -> &str;

    /// Split a document into chunks
    fn chunk(&self, text: &str) -> Vec<Chunk>;
}
