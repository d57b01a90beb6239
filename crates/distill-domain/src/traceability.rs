//! Traceability module - statement ids, source maps and explanations

use crate::{ChunkId, ContentType};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Identifier of a surviving statement, scoped to one processing run
///
/// Ids are 1-based ordinals rendered as `stmt_<n>`. They order numerically,
/// so `stmt_10` sorts after `stmt_2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StmtId(usize);

impl StmtId {
    /// Id of the statement at a 0-based retention index (`0` is `stmt_1`)
    pub fn from_index(index: usize) -> Self {
        Self(index + 1)
    }

    /// Get the raw ordinal
    pub fn value(&self) -> usize {
        self.0
    }

    /// Parse an id from its `stmt_<n>` form
    ///
    /// # Examples
    ///
    /// ```
    /// use distill_domain::StmtId;
    ///
    /// let id = StmtId::from_string("stmt_7").unwrap();
    /// assert_eq!(id.value(), 7);
    /// assert!(StmtId::from_string("stmt_0").is_err());
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        let n: usize = s
            .strip_prefix("stmt_")
            .ok_or_else(|| format!("Invalid statement id '{}': missing 'stmt_' prefix", s))?
            .parse()
            .map_err(|e| format!("Invalid statement id '{}': {}", s, e))?;
        if n == 0 {
            return Err(format!("Invalid statement id '{}': ordinals start at 1", s));
        }
        Ok(Self(n))
    }
}

impl fmt::Display for StmtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stmt_{}", self.0)
    }
}

impl Serialize for StmtId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StmtId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        StmtId::from_string(&s).map_err(serde::de::Error::custom)
    }
}

/// Forward traceability entry for one statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceabilityRecord {
    /// Statement identifier
    pub stmt_id: StmtId,

    /// Source chunks in document order
    pub source_chunks: Vec<ChunkId>,
}

/// Bidirectional index between statement ids and chunk ids
///
/// The forward records are the source of truth. The reverse index is derived
/// once at construction and never mutated independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceabilityMap {
    records: Vec<TraceabilityRecord>,
    reverse: BTreeMap<ChunkId, BTreeSet<StmtId>>,
}

impl TraceabilityMap {
    /// Build the map from forward records, deriving the reverse index
    pub fn from_records(mut records: Vec<TraceabilityRecord>) -> Self {
        records.sort_by_key(|r| r.stmt_id);

        let mut reverse: BTreeMap<ChunkId, BTreeSet<StmtId>> = BTreeMap::new();
        for record in &records {
            for chunk_id in &record.source_chunks {
                reverse
                    .entry(chunk_id.clone())
                    .or_default()
                    .insert(record.stmt_id);
            }
        }

        Self { records, reverse }
    }

    /// Forward records in statement id order
    pub fn records(&self) -> &[TraceabilityRecord] {
        &self.records
    }

    /// Source chunks for a statement
    pub fn source_chunks(&self, stmt_id: StmtId) -> Option<&[ChunkId]> {
        self.records
            .binary_search_by_key(&stmt_id, |r| r.stmt_id)
            .ok()
            .map(|idx| self.records[idx].source_chunks.as_slice())
    }

    /// Statements derived from a chunk (reverse lookup)
    pub fn statements_for_chunk(&self, chunk_id: &ChunkId) -> Vec<StmtId> {
        self.reverse
            .get(chunk_id)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Chunks referenced by at least one statement
    pub fn referenced_chunks(&self) -> impl Iterator<Item = &ChunkId> {
        self.reverse.keys()
    }

    /// Number of statements in the map
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the map holds no statements
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Serialize for TraceabilityMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.records
                .iter()
                .map(|r| (r.stmt_id, &r.source_chunks)),
        )
    }
}

impl<'de> Deserialize<'de> for TraceabilityMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let forward = BTreeMap::<StmtId, Vec<ChunkId>>::deserialize(deserializer)?;
        let records = forward
            .into_iter()
            .map(|(stmt_id, source_chunks)| TraceabilityRecord {
                stmt_id,
                source_chunks,
            })
            .collect();
        Ok(Self::from_records(records))
    }
}

/// Why a statement was included in, or content excluded from, the result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainabilityEntry {
    /// Statement (or excluded sentence), verbatim
    pub statement: String,

    /// Justification naming the matched rule and cue; `None` when excluded
    pub included_because: Option<String>,

    /// Chunk the statement was first found in
    pub source_chunk: ChunkId,

    /// Category; `None` when excluded
    pub content_type: Option<ContentType>,

    /// Why the content was left out; `None` when included
    pub removed_content_reason: Option<String>,
}

impl ExplainabilityEntry {
    /// Entry for a surviving statement
    pub fn included(
        statement: impl Into<String>,
        reason: impl Into<String>,
        source_chunk: ChunkId,
        content_type: ContentType,
    ) -> Self {
        Self {
            statement: statement.into(),
            included_because: Some(reason.into()),
            source_chunk,
            content_type: Some(content_type),
            removed_content_reason: None,
        }
    }

    /// Entry for content that produced no statement
    pub fn excluded(
        statement: impl Into<String>,
        source_chunk: ChunkId,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            statement: statement.into(),
            included_because: None,
            source_chunk,
            content_type: None,
            removed_content_reason: Some(reason.into()),
        }
    }

    /// Whether this entry documents excluded content
    pub fn is_excluded(&self) -> bool {
        self.removed_content_reason.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: usize, chunks: &[&str]) -> TraceabilityRecord {
        TraceabilityRecord {
            stmt_id: StmtId::from_index(n - 1),
            source_chunks: chunks.iter().map(|c| ChunkId::from(*c)).collect(),
        }
    }

    #[test]
    fn test_stmt_id_numeric_order() {
        assert!(StmtId::from_index(1) < StmtId::from_index(9));
        assert_eq!(StmtId::from_index(9).to_string(), "stmt_10");
    }

    #[test]
    fn test_stmt_id_from_index_is_one_based() {
        let first = StmtId::from_index(0);
        assert_eq!(first.value(), 1);
        assert_eq!(first.to_string(), "stmt_1");
        assert_eq!(StmtId::from_string("stmt_1").unwrap(), first);
    }

    #[test]
    fn test_stmt_id_invalid_strings() {
        assert!(StmtId::from_string("stmt_").is_err());
        assert!(StmtId::from_string("chunk_1").is_err());
        assert!(StmtId::from_string("stmt_x").is_err());
    }

    #[test]
    fn test_reverse_lookup() {
        let map = TraceabilityMap::from_records(vec![
            record(1, &["chunk_1"]),
            record(2, &["chunk_1", "chunk_3"]),
            record(3, &["chunk_2"]),
        ]);

        assert_eq!(
            map.statements_for_chunk(&ChunkId::from("chunk_1")),
            vec![StmtId::from_index(0), StmtId::from_index(1)]
        );
        assert_eq!(
            map.statements_for_chunk(&ChunkId::from("chunk_3")),
            vec![StmtId::from_index(1)]
        );
        assert!(map.statements_for_chunk(&ChunkId::from("chunk_9")).is_empty());
        assert_eq!(map.referenced_chunks().count(), 3);
    }

    #[test]
    fn test_forward_lookup() {
        let map = TraceabilityMap::from_records(vec![record(2, &["chunk_5"]), record(1, &["chunk_4"])]);
        assert_eq!(map.records()[0].stmt_id, StmtId::from_index(0));
        assert_eq!(
            map.source_chunks(StmtId::from_index(1)),
            Some(&[ChunkId::from("chunk_5")][..])
        );
        assert_eq!(map.source_chunks(StmtId::from_index(2)), None);
    }

    #[test]
    fn test_serializes_in_stmt_order() {
        let records: Vec<_> = (1..=11).map(|n| record(n, &["chunk_1"])).collect();
        let map = TraceabilityMap::from_records(records);
        let json = serde_json::to_string(&map).unwrap();

        let pos_2 = json.find("\"stmt_2\"").unwrap();
        let pos_10 = json.find("\"stmt_10\"").unwrap();
        assert!(pos_2 < pos_10);

        let parsed: TraceabilityMap = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, map);
    }

    #[test]
    fn test_explainability_constructors() {
        let included = ExplainabilityEntry::included(
            "Fees are $10.",
            "Contains a currency amount",
            ChunkId::from("chunk_1"),
            ContentType::NumberLimit,
        );
        assert!(!included.is_excluded());

        let excluded = ExplainabilityEntry::excluded(
            "Welcome to the handbook.",
            ChunkId::from("chunk_2"),
            "No decision-critical cues found",
        );
        assert!(excluded.is_excluded());
        assert!(excluded.content_type.is_none());
    }
}
