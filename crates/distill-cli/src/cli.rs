//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use distill_extractor::ChunkStrategy;
use std::path::PathBuf;

/// Distill - Extract decision-critical statements from legal and contractual documents.
#[derive(Debug, Parser)]
#[command(name = "distill")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "DISTILL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (statement ids only)
    Quiet,
}

/// Chunking strategy options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum StrategyArg {
    /// Split on blank lines
    Paragraph,
    /// Split at headings
    Section,
    /// One sentence per chunk
    Sentence,
    /// Fixed-size windows
    FixedSize,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Process a document and print the full result
    Compress(CompressArgs),

    /// Print the executive summary of a document
    Summary(SummaryArgs),

    /// Print potential conflicts found in a document
    Contradictions(DocumentArgs),

    /// Trace a chunk to its statements, or a statement to its chunks
    Trace(TraceArgs),

    /// Compare the executive summaries of two documents
    Compare(CompareArgs),

    /// Process many documents in parallel
    Batch(BatchArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),
}

/// Pipeline options shared by document commands.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct EngineArgs {
    /// Chunking strategy
    #[arg(short, long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Maximum chunk size in bytes (fixed-size strategy)
    #[arg(long)]
    pub max_chunk_size: Option<usize>,
}

/// Arguments for commands that take one document.
#[derive(Debug, Parser)]
pub struct DocumentArgs {
    /// Document to process (.txt, .md, .text)
    pub file: PathBuf,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Arguments for the compress command.
#[derive(Debug, Parser)]
pub struct CompressArgs {
    /// Document to process (.txt, .md, .text)
    pub file: PathBuf,

    /// Write the JSON result to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Executive summary size
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Arguments for the summary command.
#[derive(Debug, Parser)]
pub struct SummaryArgs {
    /// Document to process (.txt, .md, .text)
    pub file: PathBuf,

    /// Maximum number of statements
    #[arg(short = 'n', long, default_value = "10")]
    pub max_items: usize,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Arguments for the trace command.
#[derive(Debug, Parser)]
pub struct TraceArgs {
    /// Document to process (.txt, .md, .text)
    pub file: PathBuf,

    /// Chunk id to look up (e.g. chunk_3)
    #[arg(required_unless_present = "stmt", conflicts_with = "stmt")]
    pub chunk_id: Option<String>,

    /// Statement id to look up instead (e.g. stmt_2)
    #[arg(long, value_name = "STMT_ID")]
    pub stmt: Option<String>,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Arguments for the compare command.
#[derive(Debug, Parser)]
pub struct CompareArgs {
    /// First document
    pub first: PathBuf,

    /// Second document
    pub second: PathBuf,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Arguments for the batch command.
#[derive(Debug, Parser)]
pub struct BatchArgs {
    /// Documents to process
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Concurrent documents
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Write one JSON result per document into this directory
    #[arg(short = 'd', long)]
    pub output_dir: Option<PathBuf>,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Arguments for the config command.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    /// Config action
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<StrategyArg> for ChunkStrategy {
    fn from(strategy: StrategyArg) -> Self {
        match strategy {
            StrategyArg::Paragraph => ChunkStrategy::Paragraph,
            StrategyArg::Section => ChunkStrategy::Section,
            StrategyArg::Sentence => ChunkStrategy::Sentence,
            StrategyArg::FixedSize => ChunkStrategy::FixedSize,
        }
    }
}
