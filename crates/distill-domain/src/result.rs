//! Result module - the assembled, serializable output record
//!
//! Field names and nesting are a public contract consumed by downstream
//! tooling (dashboards, persistence) and must remain stable.

use crate::{
    CompressedStatement, ContentType, Contradiction, ExplainabilityEntry, StmtId,
    TraceabilityMap,
};
use serde::{Deserialize, Serialize};

/// Summary counts for one processed document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
    /// Number of chunks supplied by the chunk source
    pub total_chunks: usize,

    /// Surviving items after dedup
    pub total_extracted_items: usize,

    /// Classifier output before dedup
    pub total_candidate_items: usize,

    /// `total_extracted_items / total_chunks`, three decimals, 0 when empty
    pub compression_ratio: f64,

    /// Chunking strategy name passed through from the chunk source
    pub chunk_strategy: String,
}

impl ResultMetadata {
    /// Build metadata, computing the compression ratio
    ///
    /// # Examples
    ///
    /// ```
    /// use distill_domain::ResultMetadata;
    ///
    /// let meta = ResultMetadata::new(3, 7, 9, "paragraph");
    /// assert_eq!(meta.compression_ratio, 2.333);
    ///
    /// let empty = ResultMetadata::new(0, 0, 0, "paragraph");
    /// assert_eq!(empty.compression_ratio, 0.0);
    /// ```
    pub fn new(
        total_chunks: usize,
        total_extracted_items: usize,
        total_candidate_items: usize,
        chunk_strategy: impl Into<String>,
    ) -> Self {
        let compression_ratio = if total_chunks == 0 {
            0.0
        } else {
            let raw = total_extracted_items as f64 / total_chunks as f64;
            (raw * 1000.0).round() / 1000.0
        };

        Self {
            total_chunks,
            total_extracted_items,
            total_candidate_items,
            compression_ratio,
            chunk_strategy: chunk_strategy.into(),
        }
    }
}

/// The complete structured result for one document
///
/// Built once per document and returned; nothing is persisted across calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressedResult {
    /// Top-priority cross-category subset
    pub executive_compressed_summary: Vec<CompressedStatement>,

    /// `objective_fact` items
    pub key_facts: Vec<CompressedStatement>,

    /// `number_limit` items
    pub numbers_and_limits: Vec<CompressedStatement>,

    /// `date_timeline` items
    pub dates_and_timelines: Vec<CompressedStatement>,

    /// `exception_condition` items
    pub exceptions_and_conditions: Vec<CompressedStatement>,

    /// `risk_penalty` and `compliance_requirement` items
    pub risks_and_constraints: Vec<CompressedStatement>,

    /// `mandatory_requirement` items
    pub mandatory_requirements: Vec<CompressedStatement>,

    /// Flagged statement pairs
    pub contradictions: Vec<Contradiction>,

    /// Statement id to source chunk map
    pub traceability_map: TraceabilityMap,

    /// Inclusion and exclusion explanations
    pub explainability: Vec<ExplainabilityEntry>,

    /// Summary counts
    pub metadata: ResultMetadata,
}

impl CompressedResult {
    /// The result for a document with no chunks
    pub fn empty(chunk_strategy: impl Into<String>) -> Self {
        Self {
            executive_compressed_summary: Vec::new(),
            key_facts: Vec::new(),
            numbers_and_limits: Vec::new(),
            dates_and_timelines: Vec::new(),
            exceptions_and_conditions: Vec::new(),
            risks_and_constraints: Vec::new(),
            mandatory_requirements: Vec::new(),
            contradictions: Vec::new(),
            traceability_map: TraceabilityMap::default(),
            explainability: Vec::new(),
            metadata: ResultMetadata::new(0, 0, 0, chunk_strategy),
        }
    }

    /// Every surviving statement exactly once, bucket by bucket
    pub fn statements(&self) -> impl Iterator<Item = &CompressedStatement> {
        self.key_facts
            .iter()
            .chain(&self.numbers_and_limits)
            .chain(&self.dates_and_timelines)
            .chain(&self.exceptions_and_conditions)
            .chain(&self.risks_and_constraints)
            .chain(&self.mandatory_requirements)
    }

    /// Statements of a single content type, in bucket order
    pub fn statements_of(&self, content_type: ContentType) -> Vec<&CompressedStatement> {
        let bucket = match content_type {
            ContentType::ObjectiveFact => &self.key_facts,
            ContentType::NumberLimit => &self.numbers_and_limits,
            ContentType::DateTimeline => &self.dates_and_timelines,
            ContentType::ExceptionCondition => &self.exceptions_and_conditions,
            ContentType::RiskPenalty | ContentType::ComplianceRequirement => {
                &self.risks_and_constraints
            }
            ContentType::MandatoryRequirement => &self.mandatory_requirements,
        };
        bucket
            .iter()
            .filter(|s| s.content_type == content_type)
            .collect()
    }

    /// Look up a surviving statement by id
    pub fn statement(&self, stmt_id: StmtId) -> Option<&CompressedStatement> {
        self.statements().find(|s| s.stmt_id == stmt_id)
    }

    /// Whether the result holds no statements
    pub fn is_empty(&self) -> bool {
        self.statements().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result_contract() {
        let result = CompressedResult::empty("paragraph");
        assert!(result.is_empty());
        assert_eq!(result.metadata.total_chunks, 0);
        assert_eq!(result.metadata.compression_ratio, 0.0);

        let json = serde_json::to_value(&result).unwrap();
        for field in [
            "executive_compressed_summary",
            "key_facts",
            "numbers_and_limits",
            "dates_and_timelines",
            "exceptions_and_conditions",
            "risks_and_constraints",
            "mandatory_requirements",
            "contradictions",
            "traceability_map",
            "explainability",
            "metadata",
        ] {
            assert!(json.get(field).is_some(), "missing field {}", field);
        }
        assert_eq!(json["metadata"]["chunk_strategy"], "paragraph");
    }

    #[test]
    fn test_ratio_rounding() {
        let meta = ResultMetadata::new(10, 14, 30, "sentence");
        assert_eq!(meta.compression_ratio, 1.4);
    }
}
