//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use distill_domain::{
    ChunkId, CompressedResult, CompressedStatement, ContentType, Contradiction,
};
use distill_extractor::{BatchSummary, DocumentComparison, DocumentOutcome};
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Longest statement text shown in a table cell
const CELL_WIDTH: usize = 72;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a full document result.
    pub fn format_result(&self, result: &CompressedResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(result),
            OutputFormat::Quiet => Ok(stmt_ids(result.statements())),
            OutputFormat::Table => {
                let meta = &result.metadata;
                let mut out = vec![self.info(&format!(
                    "{} chunks ({}, {} referenced) → {} statements, ratio {:.3}, {} contradiction(s)",
                    meta.total_chunks,
                    meta.chunk_strategy,
                    result.traceability_map.referenced_chunks().count(),
                    meta.total_extracted_items,
                    meta.compression_ratio,
                    result.contradictions.len()
                ))];

                let mut counts = Builder::default();
                counts.push_record(["Bucket", "Statements"]);
                for (name, count) in bucket_counts(result) {
                    counts.push_record([name.to_string(), count.to_string()]);
                }
                out.push(styled(counts));

                out.push(self.colorize("Executive summary", "cyan"));
                out.push(self.statements_table(&result.executive_compressed_summary));
                Ok(out.join("\n"))
            }
        }
    }

    /// Format a list of statements.
    pub fn format_statements(&self, statements: &[CompressedStatement]) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(statements),
            OutputFormat::Quiet => Ok(stmt_ids(statements.iter())),
            OutputFormat::Table => Ok(self.statements_table(statements)),
        }
    }

    /// Format contradictions.
    pub fn format_contradictions(&self, contradictions: &[Contradiction]) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(contradictions),
            OutputFormat::Quiet => Ok(contradictions
                .iter()
                .map(|c| format!("{} {}", c.stmt_id_1, c.stmt_id_2))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if contradictions.is_empty() {
                    return Ok(self.colorize("No contradictions found.", "green"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Pair", "Basis", "First", "Second", "Shared terms"]);
                for c in contradictions {
                    let basis = serde_json::to_value(c.basis)?;
                    builder.push_record([
                        format!("{} / {}", c.stmt_id_1, c.stmt_id_2),
                        basis.as_str().unwrap_or_default().to_string(),
                        format!("[{}] {}", c.source_chunk_1, truncate(&c.statement_1, 40)),
                        format!("[{}] {}", c.source_chunk_2, truncate(&c.statement_2, 40)),
                        c.shared_terms.join(", "),
                    ]);
                }
                Ok(format!(
                    "{}\n{}",
                    self.warning(&format!("{} potential conflict(s)", contradictions.len())),
                    styled(builder)
                ))
            }
        }
    }

    /// Format the statements derived from one chunk.
    pub fn format_chunk_trace(
        &self,
        chunk_id: &ChunkId,
        statements: &[CompressedStatement],
    ) -> Result<String> {
        if self.format != OutputFormat::Table {
            return self.format_statements(statements);
        }
        let dominant = ContentType::dominant(statements.iter().map(|s| s.content_type));
        let Some(dominant) = dominant else {
            return Ok(self.info(&format!("No statements derived from {}", chunk_id)));
        };
        Ok(format!(
            "{}\n{}",
            self.info(&format!(
                "{}: {} statement(s), mostly {}",
                chunk_id,
                statements.len(),
                dominant.label()
            )),
            self.statements_table(statements)
        ))
    }

    /// Format one statement with its source chunks and the conflicts it is part of.
    pub fn format_statement_trace(
        &self,
        statement: &CompressedStatement,
        contradictions: &[Contradiction],
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(&serde_json::json!({
                "statement": statement,
                "contradictions": contradictions,
            })),
            OutputFormat::Quiet => Ok(statement
                .source_chunks
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut out = vec![
                    self.info(&format!(
                        "{} ← {}",
                        statement.stmt_id,
                        statement
                            .source_chunks
                            .iter()
                            .map(|c| c.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    )),
                    self.statements_table(std::slice::from_ref(statement)),
                ];
                if !contradictions.is_empty() {
                    out.push(self.format_contradictions(contradictions)?);
                }
                Ok(out.join("\n"))
            }
        }
    }

    /// Format a comparison of two documents.
    pub fn format_comparison(
        &self,
        first: &str,
        second: &str,
        comparison: &DocumentComparison,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(comparison),
            OutputFormat::Quiet => Ok(format!(
                "{} {} {}",
                comparison.unique_to_doc1.len(),
                comparison.unique_to_doc2.len(),
                comparison.common_items.len()
            )),
            OutputFormat::Table => {
                let mut stats = Builder::default();
                stats.push_record(["Document", "Statements", "Risks", "Numbers", "Conflicts"]);
                for (name, s) in [(first, &comparison.document_1), (second, &comparison.document_2)] {
                    stats.push_record([
                        name.to_string(),
                        s.total_items.to_string(),
                        s.risks.to_string(),
                        s.numbers.to_string(),
                        s.contradictions.to_string(),
                    ]);
                }
                let mut out = vec![styled(stats)];

                for (title, statements) in [
                    (format!("Only in {}", first), &comparison.unique_to_doc1),
                    (format!("Only in {}", second), &comparison.unique_to_doc2),
                    ("In both".to_string(), &comparison.common_items),
                ] {
                    out.push(self.colorize(&format!("{} ({})", title, statements.len()), "cyan"));
                    for statement in statements {
                        out.push(format!("  • {}", truncate(statement, CELL_WIDTH)));
                    }
                }
                Ok(out.join("\n"))
            }
        }
    }

    /// Format batch outcomes with their summary.
    pub fn format_batch(&self, outcomes: &[DocumentOutcome], summary: &BatchSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let documents: Vec<serde_json::Value> = outcomes
                    .iter()
                    .map(|o| match &o.outcome {
                        Ok(result) => serde_json::json!({
                            "document_id": o.document_id,
                            "status": "ok",
                            "metadata": result.metadata,
                            "contradictions": result.contradictions.len(),
                        }),
                        Err(e) => serde_json::json!({
                            "document_id": o.document_id,
                            "status": "error",
                            "error": e.to_string(),
                        }),
                    })
                    .collect();
                to_json(&serde_json::json!({ "documents": documents, "summary": summary }))
            }
            OutputFormat::Quiet => Ok(outcomes
                .iter()
                .filter(|o| o.is_ok())
                .map(|o| o.document_id.clone())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Document", "Status", "Chunks", "Statements", "Conflicts"]);
                for o in outcomes {
                    match &o.outcome {
                        Ok(r) => builder.push_record([
                            o.document_id.clone(),
                            self.colorize("ok", "green"),
                            r.metadata.total_chunks.to_string(),
                            r.metadata.total_extracted_items.to_string(),
                            r.contradictions.len().to_string(),
                        ]),
                        Err(e) => builder.push_record([
                            o.document_id.clone(),
                            self.colorize(&format!("error: {}", e), "red"),
                            "-".to_string(),
                            "-".to_string(),
                            "-".to_string(),
                        ]),
                    }
                }
                let line = format!(
                    "{}/{} succeeded in {} ms",
                    summary.succeeded,
                    summary.documents,
                    summary.elapsed.as_millis()
                );
                let line = if summary.failed == 0 {
                    self.success(&line)
                } else {
                    self.warning(&line)
                };
                Ok(format!("{}\n{}", styled(builder), line))
            }
        }
    }

    fn statements_table(&self, statements: &[CompressedStatement]) -> String {
        if statements.is_empty() {
            return self.colorize("No statements found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Type", "Quote", "Statement", "Chunks", "Priority"]);
        for s in statements {
            builder.push_record([
                s.stmt_id.to_string(),
                s.content_type.label().to_string(),
                s.quote.clone(),
                truncate(&s.statement, CELL_WIDTH),
                s.source_chunks
                    .iter()
                    .map(|c| c.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                s.priority.to_string(),
            ]);
        }
        styled(builder)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Statement counts per output bucket, in first-appearance order
fn bucket_counts(result: &CompressedResult) -> Vec<(&'static str, usize)> {
    let mut counts: Vec<(&'static str, usize)> = Vec::new();
    for content_type in ContentType::ALL {
        let count = result.statements_of(content_type).len();
        match counts.iter_mut().find(|(name, _)| *name == content_type.bucket_name()) {
            Some((_, total)) => *total += count,
            None => counts.push((content_type.bucket_name(), count)),
        }
    }
    counts
}

fn stmt_ids<'a>(statements: impl Iterator<Item = &'a CompressedStatement>) -> String {
    statements
        .map(|s| s.stmt_id.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

/// Shorten text to at most `max` characters, marking the cut with "…"
fn truncate(text: &str, max: usize) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= max {
        return single_line;
    }
    let cut: String = single_line.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use distill_domain::StmtId;
    use distill_extractor::{Engine, EngineConfig};

    fn result() -> CompressedResult {
        Engine::new(EngineConfig::default())
            .unwrap()
            .process("Options vest over 4 years.\n\n25% vest after the first year.")
            .unwrap()
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_result(&result()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["metadata"]["total_chunks"], 2);
    }

    #[test]
    fn test_quiet_format_lists_ids() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_result(&result()).unwrap();
        assert!(output.lines().all(|l| l.starts_with("stmt_")));
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_result(&result()).unwrap();
        assert!(output.contains("numbers_and_limits"));
        assert!(output.contains("Executive summary"));
        assert!(output.contains("25%"));
    }

    #[test]
    fn test_table_uses_bucket_names_and_labels() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_result(&result()).unwrap();
        assert!(output.contains("risks_and_constraints"));
        assert!(output.contains("key_facts"));
        assert!(output.contains("Number / limit"));
        assert!(output.contains("2 referenced"));

        let counts = bucket_counts(&result());
        assert_eq!(counts.len(), 6);
        assert!(counts.contains(&("numbers_and_limits", 2)));
    }

    #[test]
    fn test_chunk_trace() {
        let result = result();
        let formatter = Formatter::new(OutputFormat::Table, false);
        let chunk = ChunkId::from("chunk_1");
        let statements: Vec<CompressedStatement> =
            result.numbers_and_limits.iter().take(1).cloned().collect();

        let output = formatter.format_chunk_trace(&chunk, &statements).unwrap();
        assert!(output.starts_with("ℹ chunk_1: 1 statement(s), mostly Number / limit"));

        let none = formatter.format_chunk_trace(&chunk, &[]).unwrap();
        assert_eq!(none, "ℹ No statements derived from chunk_1");
    }

    #[test]
    fn test_statement_trace_lists_conflicts() {
        let result = result();
        let statement = result.statement(StmtId::from_index(0)).unwrap();
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter
            .format_statement_trace(statement, &result.contradictions)
            .unwrap();
        assert!(output.contains("stmt_1 ← chunk_1"));
        assert!(output.contains("value_mismatch"));

        let quiet = Formatter::new(OutputFormat::Quiet, false);
        assert_eq!(quiet.format_statement_trace(statement, &[]).unwrap(), "chunk_1");
    }

    #[test]
    fn test_comparison_formats() {
        let engine = Engine::new(EngineConfig::default()).unwrap();
        let comparison = engine
            .compare("Rent is $900.\n\nPets must be leashed.", "Rent is $900.")
            .unwrap();

        let table = Formatter::new(OutputFormat::Table, false)
            .format_comparison("old.md", "new.md", &comparison)
            .unwrap();
        assert!(table.contains("Only in old.md (1)"));
        assert!(table.contains("Only in new.md (0)"));
        assert!(table.contains("In both (1)"));

        let quiet = Formatter::new(OutputFormat::Quiet, false)
            .format_comparison("old.md", "new.md", &comparison)
            .unwrap();
        assert_eq!(quiet, "1 0 1");
    }

    #[test]
    fn test_contradiction_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_contradictions(&result().contradictions).unwrap();
        assert!(output.contains("value_mismatch"));
        assert!(output.contains("vest"));

        let none = formatter.format_contradictions(&[]).unwrap();
        assert_eq!(none, "No contradictions found.");
    }

    #[test]
    fn test_empty_statements() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.format_statements(&[]).unwrap(), "No statements found.");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a  b\nc", 10), "a b c");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn test_no_color() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("done"), "✓ done");
    }
}
