//! Compress command implementation.

use crate::cli::CompressArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use distill_domain::CompressedResult;
use distill_extractor::EngineConfig;
use std::fs;

/// Execute the compress command.
pub fn execute_compress(args: CompressArgs, config: &EngineConfig, formatter: &Formatter) -> Result<()> {
    let result = compress(&args, config)?;

    if let Some(path) = &args.output {
        fs::write(path, serde_json::to_string_pretty(&result)?)?;
        println!(
            "{}",
            formatter.success(&format!(
                "Wrote {} statements to {}",
                result.metadata.total_extracted_items,
                path.display()
            ))
        );
        return Ok(());
    }

    println!("{}", formatter.format_result(&result)?);
    Ok(())
}

fn compress(args: &CompressArgs, config: &EngineConfig) -> Result<CompressedResult> {
    let mut config = config.clone();
    if let Some(top_k) = args.top_k {
        if top_k == 0 {
            return Err(CliError::InvalidInput("--top-k must be at least 1".to_string()));
        }
        config.executive_top_k = top_k;
    }

    let engine = super::build_engine(&config, &args.engine)?;
    Ok(engine.process_file(&args.file)?)
}
