//! Result assembler - composes stage outputs into the public result record

use crate::compressor::{rank_key, Compression};
use crate::traceability::Mapping;
use distill_domain::{
    CompressedResult, CompressedStatement, ContentType, Contradiction, ResultMetadata, StmtId,
};

/// Build the result record; performs no decision logic of its own
pub fn assemble(
    compression: &Compression,
    mapping: Mapping,
    contradictions: Vec<Contradiction>,
    total_chunks: usize,
    chunk_strategy: &str,
) -> CompressedResult {
    let items = compression.items();
    let view = |idx: usize| CompressedStatement::from_item(StmtId::from_index(idx), &items[idx]);
    let bucket = |content_type: ContentType| -> Vec<CompressedStatement> {
        compression
            .bucket_indices(content_type)
            .iter()
            .map(|&idx| view(idx))
            .collect()
    };

    let mut constraints: Vec<usize> = compression
        .bucket_indices(ContentType::RiskPenalty)
        .iter()
        .chain(compression.bucket_indices(ContentType::ComplianceRequirement))
        .copied()
        .collect();
    constraints.sort_by_key(|&idx| rank_key(&items[idx]));

    CompressedResult {
        executive_compressed_summary: compression
            .executive_indices()
            .iter()
            .map(|&idx| view(idx))
            .collect(),
        key_facts: bucket(ContentType::ObjectiveFact),
        numbers_and_limits: bucket(ContentType::NumberLimit),
        dates_and_timelines: bucket(ContentType::DateTimeline),
        exceptions_and_conditions: bucket(ContentType::ExceptionCondition),
        risks_and_constraints: constraints.into_iter().map(&view).collect(),
        mandatory_requirements: bucket(ContentType::MandatoryRequirement),
        contradictions,
        traceability_map: mapping.map,
        explainability: mapping.explainability,
        metadata: ResultMetadata::new(
            total_chunks,
            items.len(),
            compression.candidate_count(),
            chunk_strategy,
        ),
    }
}
