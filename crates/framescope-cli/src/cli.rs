//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Framescope - discover, relate, and rank framings in a document corpus.
#[derive(Debug, Parser)]
#[command(name = "framescope")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Pipeline stages, each reading and writing line-delimited JSON artifacts.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract frames from source documents
    Articulate(ArticulateArgs),

    /// Cluster unique frames and classify relations between them
    Relate(RelateArgs),

    /// Reduce the relation graph: collapse paraphrases, fold low-support frames
    Reduce(ReduceArgs),

    /// Print the frame hierarchy in weight-first order
    Order(OrderArgs),
}

/// Chat provider settings shared by the model-backed commands.
///
/// Flags override the optional TOML config file, which overrides defaults.
#[derive(Debug, Args)]
pub struct ModelArgs {
    /// TOML file with provider settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// API key for the OpenAI-compatible endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Endpoint base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Chat model name
    #[arg(short, long)]
    pub model: Option<String>,

    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Maximum completion tokens
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Seconds to sleep after each successful request
    #[arg(long)]
    pub delay: Option<u64>,

    /// Maximum retry attempts per request
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Response cache directory (defaults to <output-dir>/openai-cache)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,
}

/// Arguments for the articulate command.
#[derive(Debug, Args)]
pub struct ArticulateArgs {
    /// Source documents, one JSON object with a "text" field per line
    #[arg(short, long)]
    pub input: PathBuf,

    /// Few-shot prompt preamble, one chat message per line
    #[arg(short, long)]
    pub prompt: PathBuf,

    /// Directory for output artifacts
    #[arg(short, long)]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub model: ModelArgs,
}

/// Embedding backend choice for the relate command.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum EmbedderArg {
    /// Deterministic hash-based embeddings, no network
    Hash,
    /// OpenAI-compatible embeddings endpoint
    Openai,
}

/// Arguments for the relate command.
#[derive(Debug, Args)]
pub struct RelateArgs {
    /// Unique frames from the articulate stage
    #[arg(short, long)]
    pub frames: PathBuf,

    /// Few-shot prompt preamble, one chat message per line
    #[arg(short, long)]
    pub prompt: PathBuf,

    /// Directory for output artifacts
    #[arg(short, long)]
    pub output_dir: PathBuf,

    /// Candidate shortlist size per pending frame
    #[arg(long, default_value = "10")]
    pub top_k: usize,

    /// Embedding backend
    #[arg(long, value_enum, default_value = "hash")]
    pub embedder: EmbedderArg,

    /// Embedding model name (openai backend only)
    #[arg(long, default_value = "text-embedding-3-small")]
    pub embed_model: String,

    /// Embedding vector dimension
    #[arg(long, default_value = "384")]
    pub embed_dim: usize,

    #[command(flatten)]
    pub model: ModelArgs,
}

/// Arguments for the reduce command.
#[derive(Debug, Args)]
pub struct ReduceArgs {
    /// Unique frames from the articulate stage
    #[arg(short, long)]
    pub frames: PathBuf,

    /// Relations from the relate stage
    #[arg(short, long)]
    pub relations: PathBuf,

    /// Directory for output artifacts
    #[arg(short, long)]
    pub output_dir: PathBuf,
}

/// Arguments for the order command.
#[derive(Debug, Args)]
pub struct OrderArgs {
    /// Reduced frames from the reduce stage
    #[arg(short, long)]
    pub frames: PathBuf,

    /// Reduced relations from the reduce stage
    #[arg(short, long)]
    pub relations: PathBuf,

    /// Maximum tree depth to print (roots are depth 0)
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Also write a frame annotation spreadsheet (CSV) to this path
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Also write a relation annotation spreadsheet (CSV) to this path
    #[arg(long)]
    pub relations_csv: Option<PathBuf>,
}
