//! Deduplicator / compressor - merges equivalent items, ranks and buckets them

use crate::error::{DistillError, Result};
use crate::text::normalize_statement;
use distill_domain::{ContentType, ExtractedItem};
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Output of the compressor
///
/// `items` are the surviving items in first-seen order. Buckets and the
/// executive summary hold indices into `items`, so every view of an item
/// agrees on its identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Compression {
    items: Vec<ExtractedItem>,
    buckets: BTreeMap<ContentType, Vec<usize>>,
    executive: Vec<usize>,
    candidates: usize,
}

impl Compression {
    /// Surviving items in first-seen order
    pub fn items(&self) -> &[ExtractedItem] {
        &self.items
    }

    /// Number of classifier items fed in before dedup
    pub fn candidate_count(&self) -> usize {
        self.candidates
    }

    /// Indices of one category's items, by descending priority then position
    pub fn bucket_indices(&self, content_type: ContentType) -> &[usize] {
        self.buckets
            .get(&content_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// One category's items in bucket order
    pub fn bucket(&self, content_type: ContentType) -> impl Iterator<Item = &ExtractedItem> {
        self.bucket_indices(content_type)
            .iter()
            .map(move |&idx| &self.items[idx])
    }

    /// Indices of the executive summary, in summary order
    pub fn executive_indices(&self) -> &[usize] {
        &self.executive
    }

    /// Executive summary items in summary order
    pub fn executive(&self) -> impl Iterator<Item = &ExtractedItem> {
        self.executive.iter().map(move |&idx| &self.items[idx])
    }
}

/// Merges surface-equivalent items and selects the executive summary
#[derive(Debug, Clone, Copy)]
pub struct Compressor {
    top_k: usize,
    category_cap: usize,
}

impl Compressor {
    /// Create a compressor with an executive summary of `top_k` items, at
    /// most `category_cap` from any one category
    pub fn new(top_k: usize, category_cap: usize) -> Self {
        Self {
            top_k,
            category_cap,
        }
    }

    /// Deduplicate, bucket and rank items
    ///
    /// Two items merge when they share a content type and their normalized
    /// statements are identical. The merged item keeps the first quote by
    /// document position, the union of source chunks and the higher
    /// confidence.
    pub fn compress(&self, mut items: Vec<ExtractedItem>) -> Result<Compression> {
        for item in &items {
            item.validate().map_err(DistillError::DataIntegrity)?;
        }

        let candidates = items.len();
        items.sort_by_key(|i| (i.position, i.offset, Reverse(i.quote.len())));

        let mut retained: Vec<ExtractedItem> = Vec::new();
        let mut seen: HashMap<(ContentType, String), usize> = HashMap::new();

        for item in items {
            let key = (item.content_type, normalize_statement(&item.statement));
            match seen.get(&key) {
                Some(&idx) => merge_into(&mut retained[idx], item),
                None => {
                    seen.insert(key, retained.len());
                    retained.push(item);
                }
            }
        }

        let mut buckets: BTreeMap<ContentType, Vec<usize>> = BTreeMap::new();
        for (idx, item) in retained.iter().enumerate() {
            buckets.entry(item.content_type).or_default().push(idx);
        }
        for indices in buckets.values_mut() {
            indices.sort_by_key(|&idx| rank_key(&retained[idx]));
        }

        let executive = self.select_executive(&retained);

        debug!(
            "Compressed {} candidates into {} items ({} in executive summary)",
            candidates,
            retained.len(),
            executive.len()
        );

        Ok(Compression {
            items: retained,
            buckets,
            executive,
            candidates,
        })
    }

    /// Greedy top-K by priority with a per-category cap
    fn select_executive(&self, items: &[ExtractedItem]) -> Vec<usize> {
        let mut ranked: Vec<usize> = (0..items.len()).collect();
        ranked.sort_by_key(|&idx| rank_key(&items[idx]));

        let mut taken: HashMap<ContentType, usize> = HashMap::new();
        let mut executive = Vec::with_capacity(self.top_k);

        for idx in ranked {
            if executive.len() == self.top_k {
                break;
            }
            let count = taken.entry(items[idx].content_type).or_insert(0);
            if *count < self.category_cap {
                *count += 1;
                executive.push(idx);
            }
        }

        executive
    }
}

/// Bucket ordering: descending priority, then document order, then longer quote
pub(crate) fn rank_key(item: &ExtractedItem) -> (Reverse<u32>, usize, usize, Reverse<usize>) {
    (
        Reverse(item.priority),
        item.position,
        item.offset,
        Reverse(item.quote.len()),
    )
}

fn merge_into(kept: &mut ExtractedItem, other: ExtractedItem) {
    for chunk_id in other.source_chunks {
        if !kept.source_chunks.contains(&chunk_id) {
            kept.source_chunks.push(chunk_id);
        }
    }
    if other.confidence > kept.confidence {
        kept.confidence = other.confidence;
        kept.priority = ExtractedItem::priority_for(kept.content_type, kept.confidence);
    }
}
