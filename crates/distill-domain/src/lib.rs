//! Distill Domain Layer
//!
//! This crate contains the data model shared by every other Distill crate.
//! It defines the value objects produced by the extraction pipeline and the
//! trait interface of the chunk source collaborator. It holds no decision
//! logic: classification, deduplication and conflict heuristics live in
//! `distill-extractor`.
//!
//! ## Key Concepts
//!
//! - **Chunk**: A contiguous, identified fragment of the source document
//! - **ContentType**: The closed set of decision-critical categories
//! - **ExtractedItem**: A classified statement with its verbatim quote
//! - **Traceability**: Statement ids mapped to the chunks they came from
//! - **Contradiction**: An unordered pair of statements flagged for review
//! - **CompressedResult**: The assembled, serializable output record

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chunk;
pub mod content_type;
pub mod contradiction;
pub mod item;
pub mod result;
pub mod traceability;
pub mod traits;

// Re-exports for convenience
pub use chunk::{Chunk, ChunkId};
pub use content_type::ContentType;
pub use contradiction::{ConflictBasis, Contradiction, ContradictionType};
pub use item::{CompressedStatement, ExtractedItem};
pub use result::{CompressedResult, ResultMetadata};
pub use traceability::{ExplainabilityEntry, StmtId, TraceabilityMap, TraceabilityRecord};
pub use traits::ChunkSource;
