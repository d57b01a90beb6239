//! Distill Extractor
//!
//! Turns legal, contractual and compliance documents into decision-critical
//! statements, each traceable to the exact chunk it came from.
//!
//! # Overview
//!
//! The extractor is a forward-only pipeline of pure stages. Every stage
//! consumes immutable inputs and returns new collections, so a single
//! document is processed synchronously with no locking, and batches are an
//! embarrassingly parallel map over documents.
//!
//! # Architecture
//!
//! ```text
//! Text → Chunker → Classifier → Compressor → Traceability Mapper
//!                                          → Contradiction Detector → Assembler
//! ```
//!
//! # Key Features
//!
//! - **Table-driven classification**: ordered cue tables per content type
//! - **Verbatim quotes**: every quote is a slice of its source chunk
//! - **Surface dedup**: restated clauses collapse into one statement
//! - **Traceability**: `stmt_N` ids indexed both ways against chunk ids
//! - **Contradiction flags**: heuristic, over-inclusive conflict pairs
//! - **Batch processing**: bounded tokio worker pool, per-document outcomes
//! - **Comparison**: executive statements unique to or shared by two documents
//!
//! # Example Usage
//!
//! ```no_run
//! use distill_extractor::{Engine, EngineConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = Engine::new(EngineConfig::default())?;
//!
//! let result = engine.process(
//!     "The Company shall pay Employee a base salary of $150,000 per year.",
//! )?;
//!
//! for statement in &result.numbers_and_limits {
//!     println!("{} {}", statement.stmt_id, statement.quote);
//! }
//! println!("Contradictions: {}", result.contradictions.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod assembler;
mod batch;
mod chunking;
mod classifier;
mod compare;
mod compressor;
mod config;
mod contradiction;
mod engine;
mod error;
mod loader;
mod rules;
mod traceability;

pub mod text;


pub use assembler::assemble;
pub use batch::{BatchDocument, BatchRunner, BatchSummary, DocumentOutcome};
pub use chunking::TextChunker;
pub use classifier::Classifier;
pub use compare::{DocumentComparison, DocumentStats};
pub use compressor::{Compression, Compressor};
pub use config::{ChunkStrategy, ContradictionConfig, EngineConfig};
pub use contradiction::ContradictionDetector;
pub use engine::Engine;
pub use error::{DistillError, Result};
pub use loader::{load_document, SUPPORTED_EXTENSIONS};
pub use rules::{Cue, CueWeight, MatchScope, RuleRegistry, RuleSet};
pub use traceability::{Mapping, TraceabilityMapper};
