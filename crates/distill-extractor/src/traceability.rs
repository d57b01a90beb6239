//! Traceability mapper - statement ids, the chunk index and explanations

use crate::rules::RuleRegistry;
use crate::text;
use distill_domain::{
    Chunk, ExplainabilityEntry, ExtractedItem, StmtId, TraceabilityMap, TraceabilityRecord,
};

const NARRATIVE_REASON: &str =
    "Generic narrative or background content without decision-critical information";
const NO_CUE_REASON: &str = "No decision-critical cues found";

/// Traceability for one document
#[derive(Debug, Clone, PartialEq)]
pub struct Mapping {
    /// Statement id to source chunk index
    pub map: TraceabilityMap,

    /// One entry per statement, then one per chunk that produced none
    pub explainability: Vec<ExplainabilityEntry>,
}

/// Assigns statement ids and builds the explainability list
pub struct TraceabilityMapper<'a> {
    registry: &'a RuleRegistry,
    explain_excluded: bool,
}

impl<'a> TraceabilityMapper<'a> {
    /// Create a mapper; `explain_excluded` adds entries for chunks that
    /// yielded no statement
    pub fn new(registry: &'a RuleRegistry, explain_excluded: bool) -> Self {
        Self {
            registry,
            explain_excluded,
        }
    }

    /// Map retained items, in retention order, to `stmt_1, stmt_2, ...`
    pub fn map(&self, items: &[ExtractedItem], chunks: &[Chunk]) -> Mapping {
        let records = items
            .iter()
            .enumerate()
            .map(|(idx, item)| TraceabilityRecord {
                stmt_id: StmtId::from_index(idx),
                source_chunks: item.source_chunks.clone(),
            })
            .collect();
        let map = TraceabilityMap::from_records(records);

        let mut explainability: Vec<ExplainabilityEntry> = items
            .iter()
            .filter_map(|item| {
                let chunk = item.primary_chunk()?.clone();
                let reason = self
                    .registry
                    .explain(item.content_type, &item.rule, &item.quote);
                Some(ExplainabilityEntry::included(
                    item.statement.clone(),
                    reason,
                    chunk,
                    item.content_type,
                ))
            })
            .collect();

        if self.explain_excluded {
            let mut silent: Vec<&Chunk> = chunks
                .iter()
                .filter(|c| !c.is_blank())
                .filter(|c| map.statements_for_chunk(&c.chunk_id).is_empty())
                .collect();
            silent.sort_by_key(|c| c.position);
            explainability.extend(silent.into_iter().map(|c| self.excluded(c)));
        }

        Mapping {
            map,
            explainability,
        }
    }

    fn excluded(&self, chunk: &Chunk) -> ExplainabilityEntry {
        let lead = text::sentence_spans(&chunk.text)
            .into_iter()
            .next()
            .unwrap_or_else(|| text::trimmed_range(&chunk.text));
        let reason = if self.registry.is_narrative(&chunk.text) {
            NARRATIVE_REASON
        } else {
            NO_CUE_REASON
        };
        ExplainabilityEntry::excluded(&chunk.text[lead], chunk.chunk_id.clone(), reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use distill_domain::{ChunkId, ContentType};

    fn fixture() -> (Vec<Chunk>, Vec<ExtractedItem>) {
        let chunks = vec![
            Chunk::new("chunk_1", "Fees are capped at 5%.", 0),
            Chunk::new("chunk_2", "This document describes the background. It is long.", 1),
            Chunk::new("chunk_3", "Fees are capped at 5%.", 2),
            Chunk::new("chunk_4", "Nothing here matters", 3),
        ];
        let mut item = ExtractedItem::new(
            &chunks[0],
            "Fees are capped at 5%.",
            "5%",
            ContentType::NumberLimit,
            1.0,
            "percentage",
            19,
        );
        item.source_chunks.push(ChunkId::from("chunk_3"));
        (chunks, vec![item])
    }

    #[test]
    fn test_ids_and_reverse_index() {
        let registry = RuleRegistry::standard().unwrap();
        let (chunks, items) = fixture();
        let mapping = TraceabilityMapper::new(&registry, true).map(&items, &chunks);

        let id = StmtId::from_index(0);
        assert_eq!(mapping.map.len(), 1);
        assert_eq!(mapping.map.source_chunks(id).unwrap().len(), 2);
        assert_eq!(mapping.map.statements_for_chunk(&ChunkId::from("chunk_3")), vec![id]);
        assert!(mapping.map.statements_for_chunk(&ChunkId::from("chunk_2")).is_empty());
    }

    #[test]
    fn test_included_reason_names_cue() {
        let registry = RuleRegistry::standard().unwrap();
        let (chunks, items) = fixture();
        let mapping = TraceabilityMapper::new(&registry, false).map(&items, &chunks);

        assert_eq!(mapping.explainability.len(), 1);
        let entry = &mapping.explainability[0];
        assert_eq!(entry.content_type, Some(ContentType::NumberLimit));
        let reason = entry.included_because.as_deref().unwrap();
        assert!(reason.contains("percentage"));
        assert!(reason.contains("`5%`"));
    }

    #[test]
    fn test_excluded_entries() {
        let registry = RuleRegistry::standard().unwrap();
        let (chunks, items) = fixture();
        let mapping = TraceabilityMapper::new(&registry, true).map(&items, &chunks);

        let excluded: Vec<&ExplainabilityEntry> =
            mapping.explainability.iter().filter(|e| e.is_excluded()).collect();
        assert_eq!(excluded.len(), 2);
        assert_eq!(excluded[0].source_chunk.as_str(), "chunk_2");
        assert_eq!(excluded[0].statement, "This document describes the background.");
        assert_eq!(excluded[0].removed_content_reason.as_deref(), Some(NARRATIVE_REASON));
        assert_eq!(excluded[1].removed_content_reason.as_deref(), Some(NO_CUE_REASON));
    }
}
