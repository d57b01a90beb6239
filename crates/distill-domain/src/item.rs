//! Extracted item module - classified statements with verbatim quotes

use crate::{Chunk, ChunkId, ContentType, StmtId};
use serde::{Deserialize, Serialize};

/// A decision-critical statement extracted from one or more chunks
///
/// `quote` is the exact substring that triggered classification and
/// `statement` is the verbatim sentence containing it. Neither is ever
/// rewritten; dedup only merges `source_chunks` and confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedItem {
    /// Sentence or clause containing the cue, verbatim from the chunk
    pub statement: String,

    /// Exact triggering substring
    pub quote: String,

    /// Category assigned by the matching rule
    pub content_type: ContentType,

    /// Chunks the statement was found in, in document order, no repeats
    pub source_chunks: Vec<ChunkId>,

    /// `rank * 10 + floor(confidence * 9)`; higher is more important
    pub priority: u32,

    /// Heuristic confidence in (0, 1]
    pub confidence: f64,

    /// Name of the cue that matched
    pub rule: String,

    /// Position of the earliest source chunk
    #[serde(skip)]
    pub position: usize,

    /// Byte offset of the quote within the earliest source chunk
    #[serde(skip)]
    pub offset: usize,
}

impl ExtractedItem {
    /// Create an item found in `chunk` at byte `offset`
    pub fn new(
        chunk: &Chunk,
        statement: impl Into<String>,
        quote: impl Into<String>,
        content_type: ContentType,
        confidence: f64,
        rule: impl Into<String>,
        offset: usize,
    ) -> Self {
        Self {
            statement: statement.into(),
            quote: quote.into(),
            content_type,
            source_chunks: vec![chunk.chunk_id.clone()],
            priority: Self::priority_for(content_type, confidence),
            confidence,
            rule: rule.into(),
            position: chunk.position,
            offset,
        }
    }

    /// Priority score for a content type at a given confidence
    ///
    /// # Examples
    ///
    /// ```
    /// use distill_domain::{ContentType, ExtractedItem};
    ///
    /// // risk_penalty has rank 7; a fully confident cue adds 9
    /// assert_eq!(ExtractedItem::priority_for(ContentType::RiskPenalty, 1.0), 79);
    /// assert_eq!(ExtractedItem::priority_for(ContentType::ObjectiveFact, 0.6), 15);
    /// ```
    pub fn priority_for(content_type: ContentType, confidence: f64) -> u32 {
        let bonus = (confidence.clamp(0.0, 1.0) * 9.0).floor() as u32;
        content_type.rank() * 10 + bonus
    }

    /// The first chunk the statement was seen in
    pub fn primary_chunk(&self) -> Option<&ChunkId> {
        self.source_chunks.first()
    }

    /// Validate that the item has all required fields
    ///
    /// A failure indicates an upstream classifier bug, not document variation.
    pub fn validate(&self) -> Result<(), String> {
        if self.source_chunks.is_empty() {
            return Err(format!("item '{}' has no source chunks", self.quote));
        }
        if self.statement.trim().is_empty() {
            return Err("statement is empty".to_string());
        }
        if self.quote.is_empty() {
            return Err("quote is empty".to_string());
        }
        if !(self.confidence > 0.0 && self.confidence <= 1.0) {
            return Err(format!(
                "confidence {} out of range (0.0, 1.0]",
                self.confidence
            ));
        }
        Ok(())
    }
}

/// Outward-facing shape of a surviving item, tagged with its statement id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressedStatement {
    /// Identifier assigned by the traceability mapper
    pub stmt_id: StmtId,

    /// Verbatim statement
    pub statement: String,

    /// Verbatim quote
    pub quote: String,

    /// Category
    pub content_type: ContentType,

    /// Source chunks in document order
    pub source_chunks: Vec<ChunkId>,

    /// Priority score
    pub priority: u32,

    /// Confidence in (0, 1]
    pub confidence: f64,
}

impl CompressedStatement {
    /// Build the outward view of `item` under `stmt_id`
    pub fn from_item(stmt_id: StmtId, item: &ExtractedItem) -> Self {
        Self {
            stmt_id,
            statement: item.statement.clone(),
            quote: item.quote.clone(),
            content_type: item.content_type,
            source_chunks: item.source_chunks.clone(),
            priority: item.priority,
            confidence: item.confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_chunk() -> Chunk {
        Chunk::new("chunk_4", "Late payments incur a 5% fee.", 3)
    }

    #[test]
    fn test_new_item_carries_chunk_position() {
        let chunk = test_chunk();
        let item = ExtractedItem::new(
            &chunk,
            "Late payments incur a 5% fee.",
            "5%",
            ContentType::NumberLimit,
            1.0,
            "percentage",
            22,
        );
        assert_eq!(item.position, 3);
        assert_eq!(item.primary_chunk(), Some(&ChunkId::from("chunk_4")));
        assert_eq!(item.priority, 39);
        assert!(item.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_sources() {
        let chunk = test_chunk();
        let mut item = ExtractedItem::new(
            &chunk,
            "Late payments incur a 5% fee.",
            "5%",
            ContentType::NumberLimit,
            1.0,
            "percentage",
            22,
        );
        item.source_chunks.clear();
        assert!(item.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_confidence() {
        let chunk = test_chunk();
        let item = ExtractedItem::new(
            &chunk,
            "Late payments incur a 5% fee.",
            "5%",
            ContentType::NumberLimit,
            0.0,
            "percentage",
            22,
        );
        assert!(item.validate().is_err());
    }

    #[test]
    fn test_position_is_not_serialized() {
        let chunk = test_chunk();
        let item = ExtractedItem::new(
            &chunk,
            "Late payments incur a 5% fee.",
            "fee",
            ContentType::RiskPenalty,
            0.8,
            "fee",
            25,
        );
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("position").is_none());
        assert!(json.get("offset").is_none());
        assert_eq!(json["content_type"], "risk_penalty");
        assert_eq!(json["source_chunks"][0], "chunk_4");
    }
}
