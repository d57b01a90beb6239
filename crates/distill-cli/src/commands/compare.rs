//! Compare command implementation.

use crate::cli::CompareArgs;
use crate::error::Result;
use crate::output::Formatter;
use distill_extractor::{load_document, DocumentComparison, EngineConfig};

/// Execute the compare command.
pub fn execute_compare(args: CompareArgs, config: &EngineConfig, formatter: &Formatter) -> Result<()> {
    let comparison = compare(&args, config)?;
    println!(
        "{}",
        formatter.format_comparison(
            &args.first.display().to_string(),
            &args.second.display().to_string(),
            &comparison
        )?
    );
    Ok(())
}

fn compare(args: &CompareArgs, config: &EngineConfig) -> Result<DocumentComparison> {
    let engine = super::build_engine(config, &args.engine)?;
    let first = load_document(&args.first)?;
    let second = load_document(&args.second)?;
    Ok(engine.compare(&first, &second)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::EngineArgs;
    use crate::error::CliError;
    use std::fs;
    use tempfile::TempDir;

    fn args(dir: &TempDir, first: &[u8], second_name: &str, second: &[u8]) -> CompareArgs {
        let a = dir.path().join("old.md");
        let b = dir.path().join(second_name);
        fs::write(&a, first).unwrap();
        fs::write(&b, second).unwrap();
        CompareArgs {
            first: a,
            second: b,
            engine: EngineArgs::default(),
        }
    }

    #[test]
    fn test_compare_revisions() {
        let dir = TempDir::new().unwrap();
        let args = args(
            &dir,
            b"Rent is $900 per month.\n\nTenant must keep pets leashed.",
            "new.md",
            b"Rent is $900 per month.\n\nRent increases by 3% each year.",
        );
        let comparison = compare(&args, &EngineConfig::default()).unwrap();

        assert_eq!(comparison.common_items, vec!["Rent is $900 per month.".to_string()]);
        assert_eq!(comparison.unique_to_doc1, vec!["Tenant must keep pets leashed.".to_string()]);
        assert_eq!(comparison.unique_to_doc2, vec!["Rent increases by 3% each year.".to_string()]);
    }

    #[test]
    fn test_unreadable_second_document() {
        let dir = TempDir::new().unwrap();
        let args = args(&dir, b"Fees are $5.", "new.pdf", b"%PDF");
        assert!(matches!(
            compare(&args, &EngineConfig::default()),
            Err(CliError::Distill(_))
        ));
    }
}
