//! Side-by-side comparison of two processed documents

use crate::text::normalize_statement;
use distill_domain::CompressedResult;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Headline counts for one document in a comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Surviving statements after dedup
    pub total_items: usize,

    /// Statements in `risks_and_constraints`
    pub risks: usize,

    /// Statements in `numbers_and_limits`
    pub numbers: usize,

    /// Flagged contradiction pairs
    pub contradictions: usize,
}

impl DocumentStats {
    /// Counts for a processed document
    pub fn of(result: &CompressedResult) -> Self {
        Self {
            total_items: result.metadata.total_extracted_items,
            risks: result.risks_and_constraints.len(),
            numbers: result.numbers_and_limits.len(),
            contradictions: result.contradictions.len(),
        }
    }
}

/// Executive summaries of two documents set against each other
///
/// Statements match when their normalized text is equal. Each list keeps
/// the executive order of the document it is drawn from, and common
/// statements are quoted from the first document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentComparison {
    /// Counts for the first document
    pub document_1: DocumentStats,

    /// Counts for the second document
    pub document_2: DocumentStats,

    /// Executive statements only the first document has
    pub unique_to_doc1: Vec<String>,

    /// Executive statements only the second document has
    pub unique_to_doc2: Vec<String>,

    /// Executive statements both documents have
    pub common_items: Vec<String>,
}

impl DocumentComparison {
    /// Compare two independently processed documents
    pub fn between(first: &CompressedResult, second: &CompressedResult) -> Self {
        let keys_1 = executive_keys(first);
        let keys_2 = executive_keys(second);

        Self {
            document_1: DocumentStats::of(first),
            document_2: DocumentStats::of(second),
            unique_to_doc1: executive_where(first, |key| !keys_2.contains(key)),
            unique_to_doc2: executive_where(second, |key| !keys_1.contains(key)),
            common_items: executive_where(first, |key| keys_2.contains(key)),
        }
    }
}

fn executive_keys(result: &CompressedResult) -> HashSet<String> {
    result
        .executive_compressed_summary
        .iter()
        .map(|s| normalize_statement(&s.statement))
        .collect()
}

/// Distinct executive statements whose normalized key passes `keep`
fn executive_where(result: &CompressedResult, keep: impl Fn(&str) -> bool) -> Vec<String> {
    let mut seen = HashSet::new();
    result
        .executive_compressed_summary
        .iter()
        .filter_map(|s| {
            let key = normalize_statement(&s.statement);
            (keep(&key) && seen.insert(key)).then(|| s.statement.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Engine, EngineConfig};

    fn process(text: &str) -> CompressedResult {
        Engine::new(EngineConfig::default()).unwrap().process(text).unwrap()
    }

    #[test]
    fn test_unique_and_common_statements() {
        let first = process("Rent is $900 per month.\n\nTenant must keep pets leashed.");
        let second = process("rent is  $900 per month\n\nA late penalty of $50 applies.");

        let comparison = DocumentComparison::between(&first, &second);
        assert_eq!(comparison.common_items, vec!["Rent is $900 per month.".to_string()]);
        assert_eq!(
            comparison.unique_to_doc1,
            vec!["Tenant must keep pets leashed.".to_string()]
        );
        assert_eq!(
            comparison.unique_to_doc2,
            vec!["A late penalty of $50 applies.".to_string()]
        );
        assert_eq!(comparison.document_2.risks, 1);
        assert_eq!(comparison.document_1.numbers, 1);
    }

    #[test]
    fn test_statement_with_several_types_is_listed_once() {
        let text = "Any breach will result in a penalty of $10,000.";
        let result = process(text);
        assert!(result.executive_compressed_summary.len() > 1);

        let comparison = DocumentComparison::between(&result, &result);
        assert_eq!(comparison.common_items, vec![text.to_string()]);
        assert!(comparison.unique_to_doc1.is_empty());
        assert!(comparison.unique_to_doc2.is_empty());
        assert_eq!(comparison.document_1, comparison.document_2);
    }

    #[test]
    fn test_empty_documents() {
        let comparison = DocumentComparison::between(&process(""), &process("Fees are $5."));
        assert_eq!(comparison.document_1.total_items, 0);
        assert!(comparison.common_items.is_empty());
        assert_eq!(comparison.unique_to_doc2, vec!["Fees are $5.".to_string()]);
    }
}
