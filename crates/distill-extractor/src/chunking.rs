//! Text chunking strategies for whole documents

use crate::config::ChunkStrategy;
use crate::text;
use distill_domain::{Chunk, ChunkId, ChunkSource};
use std::ops::Range;

/// Chunks text according to the specified strategy
///
/// Every chunk is a trimmed verbatim slice of the input. Empty pieces are
/// dropped, ids run `chunk_1, chunk_2, ...` without gaps and positions are
/// 0-based.
#[derive(Debug, Clone, Copy)]
pub struct TextChunker {
    strategy: ChunkStrategy,
    max_chunk_size: usize,
}

impl TextChunker {
    /// Create a new text chunker
    pub fn new(strategy: ChunkStrategy, max_chunk_size: usize) -> Self {
        Self {
            strategy,
            max_chunk_size: max_chunk_size.max(1),
        }
    }

    /// The configured strategy
    pub fn strategy(&self) -> ChunkStrategy {
        self.strategy
    }

    fn ranges(&self, text: &str) -> Vec<Range<usize>> {
        match self.strategy {
            ChunkStrategy::Paragraph => split_at(text, paragraph_breaks(text)),
            ChunkStrategy::Section => split_at(text, section_breaks(text)),
            ChunkStrategy::Sentence => text::sentence_spans(text),
            ChunkStrategy::FixedSize => self.windows(text),
        }
    }

    /// Windows of at most `max_chunk_size` bytes, preferring to end on a
    /// period that lies past the middle of the window
    fn windows(&self, text: &str) -> Vec<Range<usize>> {
        let mut ranges = Vec::new();
        let mut pos = 0;

        while pos < text.len() {
            let mut end = (pos + self.max_chunk_size).min(text.len());
            while !text.is_char_boundary(end) {
                end -= 1;
            }
            if end == pos {
                // A single character wider than the window
                end = pos + text[pos..].chars().next().map_or(1, char::len_utf8);
            }

            if end < text.len() {
                let window = &text[pos..end];
                if let Some(dot) = window.rfind('.') {
                    if dot + 1 > window.len() / 2 {
                        end = pos + dot + 1;
                    }
                }
            }

            ranges.push(pos..end);
            pos = end;
        }

        ranges
    }
}

impl ChunkSource for TextChunker {
    fn strategy_name(&self) -> &str {
        self.strategy.as_str()
    }

    fn chunk(&self, text: &str) -> Vec<Chunk> {
        self.ranges(text)
            .into_iter()
            .map(|r| {
                let inner = text::trimmed_range(&text[r.clone()]);
                r.start + inner.start..r.start + inner.end
            })
            .filter(|r| !r.is_empty())
            .enumerate()
            .map(|(n, r)| Chunk::new(ChunkId::ordinal(n + 1), &text[r], n))
            .collect()
    }
}

/// Lines of `text` with their starting byte offsets
fn lines_with_offsets(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split_inclusive('\n').scan(0, |offset, line| {
        let start = *offset;
        *offset += line.len();
        Some((start, line))
    })
}

fn split_at(text: &str, breaks: Vec<usize>) -> Vec<Range<usize>> {
    let mut ranges = Vec::with_capacity(breaks.len() + 1);
    let mut start = 0;
    for at in breaks {
        if at > start {
            ranges.push(start..at);
            start = at;
        }
    }
    ranges.push(start..text.len());
    ranges
}

/// Offsets of blank lines
fn paragraph_breaks(text: &str) -> Vec<usize> {
    lines_with_offsets(text)
        .filter(|(_, line)| line.trim().is_empty())
        .map(|(start, _)| start)
        .collect()
}

/// Offsets of heading lines
fn section_breaks(text: &str) -> Vec<usize> {
    lines_with_offsets(text)
        .filter(|(_, line)| is_heading(line.trim()))
        .map(|(start, _)| start)
        .collect()
}

fn is_heading(line: &str) -> bool {
    if line.is_empty() {
        return false;
    }
    if line.starts_with('#') {
        return true;
    }

    let upper = line.to_uppercase();
    if ["SECTION ", "ARTICLE "].iter().any(|p| upper.starts_with(p)) {
        return true;
    }

    // "3. Termination"
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(title) = rest.strip_prefix(". ") {
            let starts_upper = title.chars().next().is_some_and(char::is_uppercase);
            if starts_upper && text::word_count(title) <= 8 && !title.ends_with('.') {
                return true;
            }
        }
    }

    // "DEFINITIONS"
    let letters = line.chars().filter(|c| c.is_alphabetic()).count();
    letters >= 3 && line.len() <= 80 && !line.chars().any(char::is_lowercase)
}
