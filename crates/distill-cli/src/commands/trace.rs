//! Trace command implementation.

use crate::cli::TraceArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use distill_domain::{ChunkId, CompressedResult, CompressedStatement, Contradiction, StmtId};
use distill_extractor::EngineConfig;

/// What the trace command looks up
#[derive(Debug, Clone, PartialEq)]
enum Lookup {
    /// Chunk to statements (reverse lookup)
    Chunk(ChunkId),
    /// Statement to chunks (forward lookup)
    Statement(StmtId),
}

/// Execute the trace command.
pub fn execute_trace(args: TraceArgs, config: &EngineConfig, formatter: &Formatter) -> Result<()> {
    let lookup = lookup(&args)?;
    let engine = super::build_engine(config, &args.engine)?;
    let result = engine.process_file(&args.file)?;

    let output = match lookup {
        Lookup::Chunk(chunk_id) => {
            formatter.format_chunk_trace(&chunk_id, &statements_for_chunk(&result, &chunk_id))?
        }
        Lookup::Statement(stmt_id) => {
            let (statement, contradictions) = trace_statement(&result, stmt_id)?;
            formatter.format_statement_trace(&statement, &contradictions)?
        }
    };
    println!("{}", output);
    Ok(())
}

/// Validate the requested id before any processing
fn lookup(args: &TraceArgs) -> Result<Lookup> {
    if let Some(stmt) = &args.stmt {
        return StmtId::from_string(stmt.trim())
            .map(Lookup::Statement)
            .map_err(CliError::InvalidInput);
    }
    let chunk_id = args.chunk_id.as_deref().unwrap_or_default().trim();
    if chunk_id.is_empty() {
        return Err(CliError::InvalidInput("chunk id must not be empty".to_string()));
    }
    Ok(Lookup::Chunk(ChunkId::new(chunk_id)))
}

/// Statements derived from a chunk, in id order
fn statements_for_chunk(result: &CompressedResult, chunk_id: &ChunkId) -> Vec<CompressedStatement> {
    result
        .traceability_map
        .statements_for_chunk(chunk_id)
        .into_iter()
        .filter_map(|id| result.statement(id).cloned())
        .collect()
}

/// A statement, with its sources taken from the traceability map, and the
/// contradictions it takes part in
fn trace_statement(
    result: &CompressedResult,
    stmt_id: StmtId,
) -> Result<(CompressedStatement, Vec<Contradiction>)> {
    let missing = || {
        CliError::InvalidInput(format!(
            "{} not found ({} statements)",
            stmt_id, result.metadata.total_extracted_items
        ))
    };
    let sources = result.traceability_map.source_chunks(stmt_id).ok_or_else(missing)?;
    let mut statement = result.statement(stmt_id).cloned().ok_or_else(missing)?;
    statement.source_chunks = sources.to_vec();

    let contradictions = result
        .contradictions
        .iter()
        .filter(|c| c.involves(stmt_id))
        .cloned()
        .collect();
    Ok((statement, contradictions))
}
