//! Summary command implementation.

use crate::cli::SummaryArgs;
use crate::error::Result;
use crate::output::Formatter;
use distill_extractor::{load_document, EngineConfig};

/// Execute the summary command.
pub fn execute_summary(args: SummaryArgs, config: &EngineConfig, formatter: &Formatter) -> Result<()> {
    let engine = super::build_engine(config, &args.engine)?;
    let text = load_document(&args.file)?;
    let summary = engine.executive_summary(&text, args.max_items)?;
    println!("{}", formatter.format_statements(&summary)?);
    Ok(())
}
