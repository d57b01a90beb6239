//! Contradictions command implementation.

use crate::cli::DocumentArgs;
use crate::error::Result;
use crate::output::Formatter;
use distill_extractor::{load_document, EngineConfig};

/// Execute the contradictions command.
pub fn execute_contradictions(
    args: DocumentArgs,
    config: &EngineConfig,
    formatter: &Formatter,
) -> Result<()> {
    let engine = super::build_engine(config, &args.engine)?;
    let text = load_document(&args.file)?;
    let contradictions = engine.contradictions(&text)?;
    println!("{}", formatter.format_contradictions(&contradictions)?);
    Ok(())
}
