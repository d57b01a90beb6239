//! Engine - runs the full pipeline for one document

use crate::assembler::assemble;
use crate::chunking::TextChunker;
use crate::classifier::Classifier;
use crate::compare::DocumentComparison;
use crate::compressor::Compressor;
use crate::config::EngineConfig;
use crate::contradiction::ContradictionDetector;
use crate::error::{DistillError, Result};
use crate::loader::load_document;
use crate::rules::RuleRegistry;
use crate::traceability::TraceabilityMapper;
use distill_domain::{
    Chunk, ChunkSource, CompressedResult, CompressedStatement, Contradiction, ResultMetadata,
    TraceabilityMap,
};
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// The extraction pipeline with its configuration and compiled rules
///
/// An engine holds no per-document state. One instance can process any
/// number of documents, from any number of threads.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    registry: RuleRegistry,
}

impl Engine {
    /// Create an engine with the standard rule tables
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_registry(config, RuleRegistry::standard()?)
    }

    /// Create an engine with a custom rule registry
    pub fn with_registry(config: EngineConfig, registry: RuleRegistry) -> Result<Self> {
        config.validate().map_err(DistillError::Config)?;
        Ok(Self { config, registry })
    }

    /// The engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The compiled rule registry
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// A chunker for the configured strategy
    pub fn chunker(&self) -> TextChunker {
        TextChunker::new(self.config.chunk_strategy, self.config.max_chunk_size)
    }

    /// Run the pipeline over chunks from an external chunk source
    ///
    /// Zero chunks is not an error: the result is empty with a zero
    /// compression ratio. A repeated chunk id fails fast with
    /// [`DistillError::DuplicateChunkId`].
    pub fn process_chunks(&self, chunks: &[Chunk], chunk_strategy: &str) -> Result<CompressedResult> {
        let compressor = Compressor::new(
            self.config.executive_top_k,
            self.config.executive_category_cap(),
        );
        self.run(chunks, chunk_strategy, &compressor)
    }

    fn run(
        &self,
        chunks: &[Chunk],
        chunk_strategy: &str,
        compressor: &Compressor,
    ) -> Result<CompressedResult> {
        if chunks.is_empty() {
            debug!("No chunks to process");
            return Ok(CompressedResult::empty(chunk_strategy));
        }

        let mut seen = HashSet::with_capacity(chunks.len());
        for chunk in chunks {
            if !seen.insert(&chunk.chunk_id) {
                return Err(DistillError::DuplicateChunkId(chunk.chunk_id.to_string()));
            }
        }

        let started = Instant::now();

        let candidates = Classifier::new(&self.registry).classify_all(chunks);
        debug!("Classifier emitted {} candidate items", candidates.len());

        let compression = compressor.compress(candidates)?;

        let mapping = TraceabilityMapper::new(&self.registry, self.config.explain_excluded)
            .map(compression.items(), chunks);

        let contradictions =
            ContradictionDetector::new(&self.config.contradiction).detect(compression.items())?;

        let result = assemble(
            &compression,
            mapping,
            contradictions,
            chunks.len(),
            chunk_strategy,
        );

        info!(
            "Processed {} chunks: {} statements, {} contradictions in {:?}",
            result.metadata.total_chunks,
            result.metadata.total_extracted_items,
            result.contradictions.len(),
            started.elapsed()
        );

        Ok(result)
    }

    /// Chunk text with the configured strategy and process it
    pub fn process(&self, text: &str) -> Result<CompressedResult> {
        self.process_with(&self.chunker(), text)
    }

    /// Chunk text with a caller-supplied chunk source and process it
    pub fn process_with<S: ChunkSource + ?Sized>(
        &self,
        source: &S,
        text: &str,
    ) -> Result<CompressedResult> {
        let chunks = source.chunk(text);
        debug!(
            "Split text into {} chunks ({})",
            chunks.len(),
            source.strategy_name()
        );
        self.process_chunks(&chunks, source.strategy_name())
    }

    /// Load a document from disk and process it
    pub fn process_file(&self, path: &Path) -> Result<CompressedResult> {
        let text = load_document(path)?;
        info!("Loaded {} ({} bytes)", path.display(), text.len());
        self.process(&text)
    }

    /// Executive summary selected for `max_items` entries
    ///
    /// The per-category cap is `ceil(max_items / 2)`, independent of the
    /// configured `executive_top_k`.
    pub fn executive_summary(&self, text: &str, max_items: usize) -> Result<Vec<CompressedStatement>> {
        if max_items == 0 {
            return Ok(Vec::new());
        }
        let chunker = self.chunker();
        let chunks = chunker.chunk(text);
        let compressor = Compressor::new(max_items, max_items.div_ceil(2));
        Ok(self
            .run(&chunks, chunker.strategy_name(), &compressor)?
            .executive_compressed_summary)
    }

    /// Numbers and limits
    pub fn critical_numbers(&self, text: &str) -> Result<Vec<CompressedStatement>> {
        Ok(self.process(text)?.numbers_and_limits)
    }

    /// Exceptions and conditions
    pub fn exceptions(&self, text: &str) -> Result<Vec<CompressedStatement>> {
        Ok(self.process(text)?.exceptions_and_conditions)
    }

    /// Risks, penalties and compliance requirements
    pub fn risks_and_compliance(&self, text: &str) -> Result<Vec<CompressedStatement>> {
        Ok(self.process(text)?.risks_and_constraints)
    }

    /// Potential conflicts
    pub fn contradictions(&self, text: &str) -> Result<Vec<Contradiction>> {
        Ok(self.process(text)?.contradictions)
    }

    /// Statement to chunk traceability
    pub fn traceability(&self, text: &str) -> Result<TraceabilityMap> {
        Ok(self.process(text)?.traceability_map)
    }

    /// Summary counts
    pub fn metadata(&self, text: &str) -> Result<ResultMetadata> {
        Ok(self.process(text)?.metadata)
    }

    /// Process two documents independently and compare their executive summaries
    pub fn compare(&self, first: &str, second: &str) -> Result<DocumentComparison> {
        let first = self.process(first)?;
        let second = self.process(second)?;
        Ok(DocumentComparison::between(&first, &second))
    }
}
