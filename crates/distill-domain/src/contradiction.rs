//! Contradiction module - statement pairs flagged for human review

use crate::{ChunkId, StmtId};
use serde::{Deserialize, Serialize};

/// Kind of contradiction reported
///
/// Detection is heuristic, so every pair is reported as a potential conflict
/// for a reviewer to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContradictionType {
    /// The pair may assert conflicting claims about the same subject
    PotentialConflict,
}

/// Heuristic that flagged a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictBasis {
    /// The quotes encode different numeric or date values
    ValueMismatch,

    /// An obligation and an exception to it with no cross-reference
    UnreferencedException,
}

/// An unordered pair of statements judged to conflict
///
/// The pair is stored once: `(a, b)` is never also reported as `(b, a)`.
/// `statement_1` is always the earlier statement by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contradiction {
    /// Earlier statement id
    pub stmt_id_1: StmtId,

    /// Earlier statement text
    pub statement_1: String,

    /// First source chunk of the earlier statement
    pub source_chunk_1: ChunkId,

    /// Later statement id
    pub stmt_id_2: StmtId,

    /// Later statement text
    pub statement_2: String,

    /// First source chunk of the later statement
    pub source_chunk_2: ChunkId,

    /// Always [`ContradictionType::PotentialConflict`]
    pub contradiction_type: ContradictionType,

    /// Heuristic that flagged the pair
    pub basis: ConflictBasis,

    /// Significant terms both statements share
    pub shared_terms: Vec<String>,
}

impl Contradiction {
    /// The pair as an ordered key, independent of reporting order
    pub fn pair_key(&self) -> (StmtId, StmtId) {
        if self.stmt_id_1 <= self.stmt_id_2 {
            (self.stmt_id_1, self.stmt_id_2)
        } else {
            (self.stmt_id_2, self.stmt_id_1)
        }
    }

    /// Whether the pair involves a statement
    pub fn involves(&self, stmt_id: StmtId) -> bool {
        self.stmt_id_1 == stmt_id || self.stmt_id_2 == stmt_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contradiction(a: usize, b: usize) -> Contradiction {
        Contradiction {
            stmt_id_1: StmtId::from_index(a - 1),
            statement_1: "Options vest over 4 years.".to_string(),
            source_chunk_1: ChunkId::from("chunk_1"),
            stmt_id_2: StmtId::from_index(b - 1),
            statement_2: "25% vest after the first year.".to_string(),
            source_chunk_2: ChunkId::from("chunk_2"),
            contradiction_type: ContradictionType::PotentialConflict,
            basis: ConflictBasis::ValueMismatch,
            shared_terms: vec!["vest".to_string()],
        }
    }

    #[test]
    fn test_pair_key_is_order_independent() {
        assert_eq!(contradiction(1, 2).pair_key(), contradiction(2, 1).pair_key());
    }

    #[test]
    fn test_involves() {
        let c = contradiction(3, 5);
        assert!(c.involves(StmtId::from_index(2)));
        assert!(c.involves(StmtId::from_index(4)));
        assert!(!c.involves(StmtId::from_index(3)));
    }

    #[test]
    fn test_serialized_names() {
        let json = serde_json::to_value(contradiction(1, 2)).unwrap();
        assert_eq!(json["contradiction_type"], "potential_conflict");
        assert_eq!(json["basis"], "value_mismatch");
        assert_eq!(json["stmt_id_1"], "stmt_1");
    }
}
