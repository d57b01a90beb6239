//! Batch runner - processes many documents on a bounded worker pool
//!
//! Documents are independent: each runs the single-document pipeline on a
//! blocking task, statement ids are scoped per document, and one document's
//! failure never aborts its siblings.

use crate::engine::Engine;
use crate::error::{DistillError, Result};
use distill_domain::CompressedResult;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// One document submitted to a batch
#[derive(Debug, Clone)]
pub struct BatchDocument {
    /// Caller-chosen identifier, echoed back in the outcome
    pub document_id: String,

    /// Document text
    pub text: String,
}

impl BatchDocument {
    /// Create a batch document
    pub fn new(document_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            text: text.into(),
        }
    }
}

/// Result of one document in a batch
#[derive(Debug)]
pub struct DocumentOutcome {
    /// Identifier from the submitted document
    pub document_id: String,

    /// Index of the document in the submitted batch
    pub index: usize,

    /// Pipeline result or the error that stopped this document
    pub outcome: Result<CompressedResult>,
}

impl DocumentOutcome {
    /// Whether the document processed successfully
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Aggregate counts for a finished batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    /// Documents submitted
    pub documents: usize,

    /// Documents that produced a result
    pub succeeded: usize,

    /// Documents that failed
    pub failed: usize,

    /// Chunks across successful documents
    pub total_chunks: usize,

    /// Surviving statements across successful documents
    pub total_items: usize,

    /// Contradictions across successful documents
    pub total_contradictions: usize,

    /// Wall-clock time for the batch
    #[serde(with = "millis")]
    pub elapsed: Duration,
}

impl BatchSummary {
    /// Summarize outcomes
    pub fn from_outcomes(outcomes: &[DocumentOutcome], elapsed: Duration) -> Self {
        let mut summary = Self {
            documents: outcomes.len(),
            succeeded: 0,
            failed: 0,
            total_chunks: 0,
            total_items: 0,
            total_contradictions: 0,
            elapsed,
        };
        for outcome in outcomes {
            match &outcome.outcome {
                Ok(result) => {
                    summary.succeeded += 1;
                    summary.total_chunks += result.metadata.total_chunks;
                    summary.total_items += result.metadata.total_extracted_items;
                    summary.total_contradictions += result.contradictions.len();
                }
                Err(_) => summary.failed += 1,
            }
        }
        summary
    }
}

mod millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u128(d.as_millis())
    }
}

/// Runs the pipeline over many documents concurrently
pub struct BatchRunner {
    engine: Arc<Engine>,
    workers: usize,
}

impl BatchRunner {
    /// Create a runner with at most `workers` documents in flight
    pub fn new(engine: Arc<Engine>, workers: usize) -> Self {
        Self {
            engine,
            workers: workers.max(1),
        }
    }

    /// Create a runner sized by the engine's `batch_workers`
    pub fn from_engine(engine: Arc<Engine>) -> Self {
        let workers = engine.config().batch_workers;
        Self::new(engine, workers)
    }

    /// Process every document; outcomes come back in submission order
    pub async fn run(&self, documents: Vec<BatchDocument>) -> Vec<DocumentOutcome> {
        self.run_with(documents, |engine, text| engine.process(text)).await
    }

    /// Run `process` for every document on the blocking pool
    ///
    /// A document whose task errors or panics gets its own failed outcome.
    async fn run_with<F>(&self, documents: Vec<BatchDocument>, process: F) -> Vec<DocumentOutcome>
    where
        F: Fn(&Engine, &str) -> Result<CompressedResult> + Send + Sync + 'static,
    {
        let total = documents.len();
        info!("Starting batch of {} documents ({} workers)", total, self.workers);

        let permits = Arc::new(Semaphore::new(self.workers));
        let process = Arc::new(process);
        let mut tasks = JoinSet::new();
        let mut ids = Vec::with_capacity(total);

        for (index, doc) in documents.into_iter().enumerate() {
            ids.push(doc.document_id.clone());
            let engine = Arc::clone(&self.engine);
            let permits = Arc::clone(&permits);
            let process = Arc::clone(&process);

            tasks.spawn(async move {
                let outcome = match permits.acquire_owned().await {
                    Ok(_permit) => tokio::task::spawn_blocking(move || (*process)(&*engine, &doc.text))
                        .await
                        .map_err(|e| DistillError::Worker(format!("Task join error: {}", e)))
                        .and_then(|r| r),
                    Err(e) => Err(DistillError::Worker(e.to_string())),
                };
                (index, outcome)
            });
        }

        let mut slots: Vec<Option<Result<CompressedResult>>> = (0..total).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => {
                    if let Err(e) = &outcome {
                        warn!("Document {} failed: {}", ids[index], e);
                    } else {
                        debug!("Document {} done", ids[index]);
                    }
                    slots[index] = Some(outcome);
                }
                Err(e) => warn!("Batch task failed: {}", e),
            }
        }

        ids.into_iter()
            .zip(slots)
            .enumerate()
            .map(|(index, (document_id, slot))| DocumentOutcome {
                document_id,
                index,
                outcome: slot.unwrap_or_else(|| {
                    Err(DistillError::Worker("document task did not complete".to_string()))
                }),
            })
            .collect()
    }

    /// Process every document and summarize the batch
    pub async fn run_with_summary(
        &self,
        documents: Vec<BatchDocument>,
    ) -> (Vec<DocumentOutcome>, BatchSummary) {
        let started = Instant::now();
        let outcomes = self.run(documents).await;
        let summary = BatchSummary::from_outcomes(&outcomes, started.elapsed());
        info!(
            "Batch finished: {}/{} succeeded in {:?}",
            summary.succeeded, summary.documents, summary.elapsed
        );
        (outcomes, summary)
    }
}
