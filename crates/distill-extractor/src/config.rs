//! Configuration for the extraction engine

use crate::error::DistillError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Text chunking strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkStrategy {
    /// Split by paragraphs (blank lines)
    #[default]
    Paragraph,
    /// Split by sections (headers, numbered titles, SECTION/ARTICLE lines)
    Section,
    /// Split by sentences
    Sentence,
    /// Split into windows of at most `max_chunk_size` bytes
    FixedSize,
}

impl ChunkStrategy {
    /// Strategy name as reported in result metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkStrategy::Paragraph => "paragraph",
            ChunkStrategy::Section => "section",
            ChunkStrategy::Sentence => "sentence",
            ChunkStrategy::FixedSize => "fixed_size",
        }
    }
}

impl fmt::Display for ChunkStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChunkStrategy {
    type Err = DistillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "paragraph" => Ok(ChunkStrategy::Paragraph),
            "section" => Ok(ChunkStrategy::Section),
            "sentence" => Ok(ChunkStrategy::Sentence),
            "fixed_size" | "fixed" => Ok(ChunkStrategy::FixedSize),
            other => Err(DistillError::Config(format!(
                "unknown chunk strategy '{}' (expected paragraph, section, sentence or fixed_size)",
                other
            ))),
        }
    }
}

/// Tunables for the contradiction detector
///
/// Two statements become a candidate pair when they share at least
/// `min_shared_terms` significant tokens. A token is significant when it is
/// at least three characters long and not in `stopwords`, or when it is a
/// numeric value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContradictionConfig {
    /// Minimum number of shared significant tokens for a candidate pair
    pub min_shared_terms: usize,

    /// Words that never count as subject overlap
    pub stopwords: Vec<String>,

    /// Phrases by which an exception explicitly references the rule it qualifies
    pub cross_reference_markers: Vec<String>,
}

const DEFAULT_STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "from", "this", "that", "these", "those", "such", "any",
    "all", "each", "other", "than", "then", "into", "upon", "onto", "over", "under",
    "within", "after", "before", "during", "between", "about", "above", "below", "per",
    "its", "their", "his", "her", "our", "your", "they", "them", "who", "whom", "whose",
    "which", "what", "where", "when", "there", "here", "are", "was", "were", "been", "being",
    "has", "have", "had", "does", "did", "not", "nor", "but", "also", "only", "unless",
    "except", "shall", "must", "will", "would", "may", "might", "can", "could", "should",
    "first", "same", "herein", "hereof", "hereunder", "thereof", "therein", "party",
    "parties", "agreement",
];

const DEFAULT_CROSS_REFERENCE_MARKERS: &[&str] = &[
    "section",
    "article",
    "clause",
    "paragraph",
    "notwithstanding",
    "as set forth",
    "as provided",
    "as described",
    "pursuant to",
];

impl Default for ContradictionConfig {
    fn default() -> Self {
        Self {
            min_shared_terms: 1,
            stopwords: DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect(),
            cross_reference_markers: DEFAULT_CROSS_REFERENCE_MARKERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Configuration for the extraction engine
///
/// Passed explicitly into every pipeline invocation; there is no
/// process-wide default engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Chunking strategy for raw text input
    pub chunk_strategy: ChunkStrategy,

    /// Maximum chunk size in bytes for the fixed_size strategy
    pub max_chunk_size: usize,

    /// Number of items in the executive summary
    pub executive_top_k: usize,

    /// Record explainability entries for chunks that produced no statement
    pub explain_excluded: bool,

    /// Concurrent documents in batch mode
    pub batch_workers: usize,

    /// Contradiction detector tunables
    pub contradiction: ContradictionConfig,
}

impl EngineConfig {
    /// Per-category cap in the executive summary: `ceil(top_k / 2)`
    pub fn executive_category_cap(&self) -> usize {
        self.executive_top_k.div_ceil(2)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_chunk_size == 0 {
            return Err("max_chunk_size must be greater than 0".to_string());
        }
        if self.executive_top_k == 0 {
            return Err("executive_top_k must be greater than 0".to_string());
        }
        if self.batch_workers == 0 {
            return Err("batch_workers must be greater than 0".to_string());
        }
        if self.contradiction.min_shared_terms == 0 {
            return Err("contradiction.min_shared_terms must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            chunk_strategy: ChunkStrategy::Paragraph,
            max_chunk_size: 1000,
            executive_top_k: 10,
            explain_excluded: true,
            batch_workers: 4,
            contradiction: ContradictionConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Strict preset: sentence-level chunks and a short executive summary
    pub fn strict() -> Self {
        Self {
            chunk_strategy: ChunkStrategy::Sentence,
            executive_top_k: 5,
            ..Self::default()
        }
    }

    /// Lenient preset: section-level chunks and a longer executive summary
    pub fn lenient() -> Self {
        Self {
            chunk_strategy: ChunkStrategy::Section,
            max_chunk_size: 4000,
            executive_top_k: 20,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, DistillError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| DistillError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate().map_err(DistillError::Config)?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, DistillError> {
        toml::to_string_pretty(self)
            .map_err(|e| DistillError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(EngineConfig::strict().validate().is_ok());
        assert!(EngineConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_invalid_top_k() {
        let config = EngineConfig {
            executive_top_k: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_min_shared_terms() {
        let mut config = EngineConfig::default();
        config.contradiction.min_shared_terms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_executive_cap_rounds_up() {
        let mut config = EngineConfig::default();
        assert_eq!(config.executive_category_cap(), 5);
        config.executive_top_k = 7;
        assert_eq!(config.executive_category_cap(), 4);
        config.executive_top_k = 1;
        assert_eq!(config.executive_category_cap(), 1);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = EngineConfig::lenient();
        let toml_str = config.to_toml().unwrap();
        let parsed = EngineConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = EngineConfig::from_toml("executive_top_k = 3\nchunk_strategy = \"sentence\"\n")
            .unwrap();
        assert_eq!(parsed.executive_top_k, 3);
        assert_eq!(parsed.chunk_strategy, ChunkStrategy::Sentence);
        assert_eq!(parsed.max_chunk_size, 1000);
        assert!(!parsed.contradiction.stopwords.is_empty());
    }

    #[test]
    fn test_toml_rejects_invalid_values() {
        assert!(EngineConfig::from_toml("batch_workers = 0").is_err());
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("Fixed-Size".parse::<ChunkStrategy>().unwrap(), ChunkStrategy::FixedSize);
        assert_eq!("section".parse::<ChunkStrategy>().unwrap(), ChunkStrategy::Section);
        assert!("chapter".parse::<ChunkStrategy>().is_err());
    }
}
