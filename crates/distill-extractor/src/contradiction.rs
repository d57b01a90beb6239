//! Contradiction detector - flags statement pairs that may conflict
//!
//! Detection is heuristic and over-inclusive. Every flagged pair is a
//! potential conflict for a reviewer to resolve.
//!
//! A pair is a candidate when the two statements share a significant token
//! (a non-stopword term or a numeric value from a quote) and look like the
//! same subject: they share a chunk, or at least `min_shared_terms` terms.
//! Candidates are flagged when
//!
//! - both quotes carry numeric values and the value sets differ, or
//! - one is an obligation (mandatory or compliance) and the other an
//!   exception that carries no cross-reference marker.

use crate::config::ContradictionConfig;
use crate::error::{DistillError, Result};
use crate::text;
use distill_domain::{
    ChunkId, ConflictBasis, ContentType, Contradiction, ContradictionType, ExtractedItem, StmtId,
};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::debug;

/// Per-item features used for pair comparison
struct Profile<'a> {
    terms: BTreeSet<String>,
    values: BTreeSet<String>,
    normalized: String,
    chunks: HashSet<&'a ChunkId>,
    cross_referenced: bool,
}

/// Compares retained items pairwise
pub struct ContradictionDetector {
    min_shared_terms: usize,
    stopwords: HashSet<String>,
    markers: Vec<String>,
}

impl ContradictionDetector {
    /// Create a detector from its tunables
    pub fn new(config: &ContradictionConfig) -> Self {
        Self {
            min_shared_terms: config.min_shared_terms,
            stopwords: config.stopwords.iter().map(|s| s.to_lowercase()).collect(),
            markers: config
                .cross_reference_markers
                .iter()
                .map(|s| s.to_lowercase())
                .collect(),
        }
    }

    /// Detect conflicts among retained items
    ///
    /// Item `i` is statement `stmt_{i+1}`. Each unordered pair is reported
    /// at most once, earlier statement first.
    pub fn detect(&self, items: &[ExtractedItem]) -> Result<Vec<Contradiction>> {
        for item in items {
            item.validate().map_err(DistillError::DataIntegrity)?;
        }

        let profiles: Vec<Profile<'_>> = items.iter().map(|i| self.profile(i)).collect();

        // Inverted index over significant tokens yields the candidate pairs
        let mut index: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (idx, profile) in profiles.iter().enumerate() {
            for token in profile.terms.iter().chain(&profile.values) {
                index.entry(token.as_str()).or_default().push(idx);
            }
        }
        let mut candidates: BTreeSet<(usize, usize)> = BTreeSet::new();
        for postings in index.values() {
            for (n, &i) in postings.iter().enumerate() {
                for &j in &postings[n + 1..] {
                    if i != j {
                        candidates.insert((i.min(j), i.max(j)));
                    }
                }
            }
        }

        let mut found = Vec::new();
        for (i, j) in candidates {
            let (a, b) = (&profiles[i], &profiles[j]);
            if a.normalized == b.normalized {
                continue;
            }

            let shared: Vec<String> = a.terms.intersection(&b.terms).cloned().collect();
            let same_chunk = a.chunks.iter().any(|c| b.chunks.contains(c));
            if shared.len() < self.min_shared_terms && !same_chunk {
                continue;
            }

            if let Some(basis) = conflict_basis(&items[i], a, &items[j], b) {
                found.push(contradiction(i, &items[i], j, &items[j], basis, shared));
            }
        }

        debug!("{} candidate statements, {} conflicts", items.len(), found.len());
        Ok(found)
    }

    fn profile<'a>(&self, item: &'a ExtractedItem) -> Profile<'a> {
        let lower = item.statement.to_lowercase();
        Profile {
            terms: text::significant_terms(&item.statement, &self.stopwords),
            values: text::numeric_values(&item.quote),
            normalized: text::normalize_statement(&item.statement),
            chunks: item.source_chunks.iter().collect(),
            cross_referenced: self
                .markers
                .iter()
                .any(|m| text::contains_phrase(&lower, m)),
        }
    }
}

fn conflict_basis(
    a: &ExtractedItem,
    pa: &Profile<'_>,
    b: &ExtractedItem,
    pb: &Profile<'_>,
) -> Option<ConflictBasis> {
    if !pa.values.is_empty() && !pb.values.is_empty() && pa.values != pb.values {
        return Some(ConflictBasis::ValueMismatch);
    }

    let unreferenced_exception = |rule: &ExtractedItem, exception: &ExtractedItem, pe: &Profile<'_>| {
        is_obligation(rule.content_type)
            && exception.content_type == ContentType::ExceptionCondition
            && !pe.cross_referenced
    };
    if unreferenced_exception(a, b, pb) || unreferenced_exception(b, a, pa) {
        return Some(ConflictBasis::UnreferencedException);
    }

    None
}

fn is_obligation(content_type: ContentType) -> bool {
    matches!(
        content_type,
        ContentType::MandatoryRequirement | ContentType::ComplianceRequirement
    )
}

fn contradiction(
    i: usize,
    a: &ExtractedItem,
    j: usize,
    b: &ExtractedItem,
    basis: ConflictBasis,
    shared_terms: Vec<String>,
) -> Contradiction {
    Contradiction {
        stmt_id_1: StmtId::from_index(i),
        statement_1: a.statement.clone(),
        source_chunk_1: a.source_chunks[0].clone(),
        stmt_id_2: StmtId::from_index(j),
        statement_2: b.statement.clone(),
        source_chunk_2: b.source_chunks[0].clone(),
        contradiction_type: ContradictionType::PotentialConflict,
        basis,
        shared_terms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use distill_domain::Chunk;

    fn item(chunk: &str, position: usize, statement: &str, quote: &str, t: ContentType) -> ExtractedItem {
        let chunk = Chunk::new(chunk, statement, position);
        ExtractedItem::new(&chunk, statement, quote, t, 1.0, "test", 0)
    }

    fn detector() -> ContradictionDetector {
        ContradictionDetector::new(&ContradictionConfig::default())
    }

    #[test]
    fn test_vesting_values_conflict() {
        let items = vec![
            item("chunk_1", 0, "Options vest over 4 years.", "4 years", ContentType::NumberLimit),
            item("chunk_2", 1, "25% vest after the first year.", "25%", ContentType::NumberLimit),
        ];
        let found = detector().detect(&items).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].basis, ConflictBasis::ValueMismatch);
        assert_eq!(found[0].stmt_id_1, StmtId::from_index(0));
        assert_eq!(found[0].stmt_id_2, StmtId::from_index(1));
        assert!(found[0].shared_terms.contains(&"vest".to_string()));
    }

    #[test]
    fn test_same_value_is_not_a_conflict() {
        let items = vec![
            item("chunk_1", 0, "The deposit is $500.", "$500", ContentType::NumberLimit),
            item("chunk_2", 1, "A deposit of $500 is refundable.", "$500", ContentType::NumberLimit),
        ];
        assert!(detector().detect(&items).unwrap().is_empty());
    }

    #[test]
    fn test_unrelated_subjects_are_not_compared() {
        let items = vec![
            item("chunk_1", 0, "Rent is $900.", "$900", ContentType::NumberLimit),
            item("chunk_2", 1, "Parking costs $40.", "$40", ContentType::NumberLimit),
        ];
        assert!(detector().detect(&items).unwrap().is_empty());
    }

    #[test]
    fn test_unreferenced_exception() {
        let items = vec![
            item("chunk_1", 0, "Employees must submit timesheets weekly.", "must", ContentType::MandatoryRequirement),
            item("chunk_2", 1, "Contractors submit timesheets only when asked.", "only when", ContentType::ExceptionCondition),
        ];
        let found = detector().detect(&items).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].basis, ConflictBasis::UnreferencedException);
        assert_eq!(found[0].contradiction_type, ContradictionType::PotentialConflict);
    }

    #[test]
    fn test_cross_referenced_exception_is_not_flagged() {
        let items = vec![
            item("chunk_1", 0, "Employees must submit timesheets weekly.", "must", ContentType::MandatoryRequirement),
            item("chunk_2", 1, "Except as provided in Section 4, timesheets may be monthly.", "Except as", ContentType::ExceptionCondition),
        ];
        assert!(detector().detect(&items).unwrap().is_empty());
    }

    #[test]
    fn test_marker_inside_a_word_is_not_a_cross_reference() {
        let items = vec![
            item("chunk_1", 0, "Drivers must stop at every intersection.", "must", ContentType::MandatoryRequirement),
            item("chunk_2", 1, "Drivers stop at the intersection only when signalled.", "only when", ContentType::ExceptionCondition),
        ];
        let found = detector().detect(&items).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].basis, ConflictBasis::UnreferencedException);
    }

    #[test]
    fn test_same_statement_pairs_are_skipped() {
        let s = "Payment of $100 is due within 30 days.";
        let items = vec![
            item("chunk_1", 0, s, "$100", ContentType::NumberLimit),
            item("chunk_1", 0, s, "within 30 days", ContentType::DateTimeline),
        ];
        assert!(detector().detect(&items).unwrap().is_empty());
    }

    #[test]
    fn test_threshold_is_tunable() {
        let items = vec![
            item("chunk_1", 0, "Options vest over 4 years.", "4 years", ContentType::NumberLimit),
            item("chunk_2", 1, "25% vest after the first year.", "25%", ContentType::NumberLimit),
        ];
        let config = ContradictionConfig {
            min_shared_terms: 3,
            ..ContradictionConfig::default()
        };
        assert!(ContradictionDetector::new(&config).detect(&items).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_item_fails_fast() {
        let mut bad = item("chunk_1", 0, "Rent is $900.", "$900", ContentType::NumberLimit);
        bad.source_chunks.clear();
        assert!(matches!(
            detector().detect(&[bad]),
            Err(DistillError::DataIntegrity(_))
        ));
    }
}
