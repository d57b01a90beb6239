//! Classifier - turns chunks into candidate items by scanning for cues

use crate::rules::{MatchScope, RuleRegistry, RuleSet};
use crate::text;
use distill_domain::{Chunk, ExtractedItem};
use std::cmp::Reverse;
use std::ops::Range;
use tracing::debug;

/// Scans chunks against every registered rule set
///
/// Each chunk is classified independently. A chunk may yield items in
/// several categories, and cues nested inside another item's statement are
/// still captured.
pub struct Classifier<'a> {
    registry: &'a RuleRegistry,
}

impl<'a> Classifier<'a> {
    /// Create a classifier over a rule registry
    pub fn new(registry: &'a RuleRegistry) -> Self {
        Self { registry }
    }

    /// Classify one chunk
    ///
    /// Items come back ordered by quote offset, then category rank, then
    /// longest quote first.
    pub fn classify(&self, chunk: &Chunk) -> Vec<ExtractedItem> {
        if chunk.is_blank() {
            return Vec::new();
        }

        let spans = text::sentence_spans(&chunk.text);
        let mut items = Vec::new();

        for set in self.registry.rule_sets() {
            match set.scope {
                MatchScope::EveryMatch => scan_every_match(set, chunk, &spans, &mut items),
                MatchScope::FirstPerSentence { min_words } => {
                    scan_per_sentence(set, chunk, &spans, min_words, &mut items)
                }
            }
        }

        items.sort_by_key(|item| {
            (
                item.offset,
                Reverse(item.content_type.rank()),
                Reverse(item.quote.len()),
            )
        });
        items.dedup_by(|a, b| {
            a.offset == b.offset && a.content_type == b.content_type && a.quote == b.quote
        });

        debug!("{} produced {} candidate items", chunk.chunk_id, items.len());
        items
    }

    /// Classify chunks in document order
    pub fn classify_all(&self, chunks: &[Chunk]) -> Vec<ExtractedItem> {
        let mut ordered: Vec<&Chunk> = chunks.iter().collect();
        ordered.sort_by_key(|c| c.position);
        ordered.into_iter().flat_map(|c| self.classify(c)).collect()
    }
}

fn scan_every_match(
    set: &RuleSet,
    chunk: &Chunk,
    spans: &[Range<usize>],
    items: &mut Vec<ExtractedItem>,
) {
    for cue in &set.cues {
        for m in cue.pattern.find_iter(&chunk.text) {
            if m.is_empty() {
                continue;
            }
            let statement = statement_range(&chunk.text, spans, m.range());
            let statement = &chunk.text[statement];
            items.push(ExtractedItem::new(
                chunk,
                statement,
                m.as_str(),
                set.content_type,
                cue.weight.score(statement),
                cue.name.clone(),
                m.start(),
            ));
        }
    }
}

fn scan_per_sentence(
    set: &RuleSet,
    chunk: &Chunk,
    spans: &[Range<usize>],
    min_words: usize,
    items: &mut Vec<ExtractedItem>,
) {
    for span in spans {
        let sentence = &chunk.text[span.clone()];
        if text::word_count(sentence) < min_words {
            continue;
        }

        // Earliest match across cues; longer match wins a tie
        let best = set
            .cues
            .iter()
            .filter_map(|cue| {
                cue.pattern
                    .find(sentence)
                    .filter(|m| !m.is_empty())
                    .map(|m| (cue, m))
            })
            .min_by_key(|(_, m)| (m.start(), Reverse(m.len())));

        if let Some((cue, m)) = best {
            items.push(ExtractedItem::new(
                chunk,
                sentence,
                m.as_str(),
                set.content_type,
                cue.weight.score(sentence),
                cue.name.clone(),
                span.start + m.start(),
            ));
        }
    }
}

/// The sentence holding a match, widened if the match crosses its end
fn statement_range(text: &str, spans: &[Range<usize>], found: Range<usize>) -> Range<usize> {
    let span = text::span_containing(spans, found.start).unwrap_or_else(|| text::trimmed_range(text));
    span.start.min(found.start)..span.end.max(found.end)
}
