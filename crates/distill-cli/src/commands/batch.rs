//! Batch command implementation.

use crate::cli::BatchArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use distill_extractor::{
    load_document, BatchDocument, BatchRunner, BatchSummary, DocumentOutcome, EngineConfig,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

/// Execute the batch command.
///
/// Every file is reported; the command fails afterwards if any did.
pub async fn execute_batch(args: BatchArgs, config: &EngineConfig, formatter: &Formatter) -> Result<()> {
    let (outcomes, summary) = run_batch(&args, config).await?;

    if let Some(dir) = &args.output_dir {
        write_results(dir, &outcomes)?;
    }

    println!("{}", formatter.format_batch(&outcomes, &summary)?);

    if summary.failed > 0 {
        return Err(CliError::BatchFailed {
            failed: summary.failed,
            total: summary.documents,
        });
    }
    Ok(())
}

async fn run_batch(
    args: &BatchArgs,
    config: &EngineConfig,
) -> Result<(Vec<DocumentOutcome>, BatchSummary)> {
    let started = Instant::now();
    let mut engine_config = config.clone();
    if let Some(workers) = args.workers {
        engine_config.batch_workers = workers;
    }
    let engine = Arc::new(super::build_engine(&engine_config, &args.engine)?);
    let runner = BatchRunner::from_engine(engine);

    // Unreadable files become failed outcomes without reaching the pool
    let mut documents = Vec::new();
    let mut load_failures = Vec::new();
    for (index, path) in args.files.iter().enumerate() {
        let document_id = path.display().to_string();
        match load_document(path) {
            Ok(text) => documents.push((index, BatchDocument::new(document_id, text))),
            Err(e) => {
                warn!("Skipping {}: {}", document_id, e);
                load_failures.push((index, document_id, e));
            }
        }
    }

    let (indices, batch): (Vec<usize>, Vec<BatchDocument>) = documents.into_iter().unzip();
    let mut outcomes: Vec<DocumentOutcome> = runner
        .run(batch)
        .await
        .into_iter()
        .map(|mut o| {
            o.index = indices[o.index];
            o
        })
        .collect();
    outcomes.extend(
        load_failures
            .into_iter()
            .map(|(index, document_id, e)| DocumentOutcome {
                document_id,
                index,
                outcome: Err(e),
            }),
    );
    outcomes.sort_by_key(|o| o.index);

    let summary = BatchSummary::from_outcomes(&outcomes, started.elapsed());
    Ok((outcomes, summary))
}

fn write_results(dir: &Path, outcomes: &[DocumentOutcome]) -> Result<()> {
    fs::create_dir_all(dir)?;
    for outcome in outcomes {
        if let Ok(result) = &outcome.outcome {
            let path = result_path(dir, &outcome.document_id, outcome.index);
            fs::write(path, serde_json::to_string_pretty(result)?)?;
        }
    }
    Ok(())
}

/// `<dir>/<index>_<file stem>.json`; the index keeps same-named inputs apart
fn result_path(dir: &Path, document_id: &str, index: usize) -> PathBuf {
    let stem = Path::new(document_id)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    dir.join(format!("{:03}_{}.json", index + 1, stem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::EngineArgs;
    use distill_extractor::DistillError;
    use tempfile::TempDir;

    /// Whether an outcome failed because its file could not be loaded
    fn is_load_failure(outcome: &DocumentOutcome) -> bool {
        matches!(
            outcome.outcome,
            Err(DistillError::Io(_))
                | Err(DistillError::InvalidEncoding(_))
                | Err(DistillError::UnsupportedFormat(_))
        )
    }

    fn write(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn args(files: Vec<PathBuf>, output_dir: Option<PathBuf>) -> BatchArgs {
        BatchArgs {
            files,
            workers: Some(2),
            output_dir,
            engine: EngineArgs::default(),
        }
    }

    #[tokio::test]
    async fn test_failures_do_not_abort_siblings() {
        let dir = TempDir::new().unwrap();
        let files = vec![
            write(&dir, "a.txt", b"The fee is $100."),
            write(&dir, "b.pdf", b"%PDF"),
            write(&dir, "c.txt", &[0xff, 0xfe]),
            write(&dir, "d.md", b"Options vest over 4 years."),
        ];

        let (outcomes, summary) = run_batch(&args(files, None), &EngineConfig::default())
            .await
            .unwrap();

        assert_eq!(summary.documents, 4);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 2);
        let indices: Vec<usize> = outcomes.iter().map(|o| o.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert!(outcomes[0].is_ok());
        assert!(is_load_failure(&outcomes[1]));
        assert!(is_load_failure(&outcomes[2]));
        assert!(outcomes[3].is_ok());
    }

    #[tokio::test]
    async fn test_writes_one_file_per_success() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("results");
        let files = vec![
            write(&dir, "a.txt", b"The fee is $100."),
            write(&dir, "b.txt", b"Rent is $900 per month."),
        ];
        let formatter = Formatter::new(crate::config::OutputFormat::Quiet, false);

        execute_batch(args(files, Some(out.clone())), &EngineConfig::default(), &formatter)
            .await
            .unwrap();

        assert!(out.join("001_a.json").exists());
        assert!(out.join("002_b.json").exists());
    }

    #[tokio::test]
    async fn test_command_fails_when_a_document_fails() {
        let dir = TempDir::new().unwrap();
        let files = vec![write(&dir, "a.docx", b"PK")];
        let formatter = Formatter::new(crate::config::OutputFormat::Quiet, false);

        let err = execute_batch(args(files, None), &EngineConfig::default(), &formatter)
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::BatchFailed { failed: 1, total: 1 }));
    }
}
