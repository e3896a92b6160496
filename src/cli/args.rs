use crate::core::{OutputFormat, Preset, ResizeStrategy};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quick-resizer")]
#[command(about = "Batch resize and convert images into a single zip archive")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resize and convert images, writing the results into a zip archive
    Process(ProcessArgs),

    /// List the available size presets
    Presets,

    /// Show dimensions, format, color type and DPI of image files
    Info {
        /// Image files to inspect
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ProcessArgs {
    /// Image files or directories (directories are scanned recursively)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output archive path
    #[arg(short, long, default_value = crate::archive::DEFAULT_ARCHIVE_NAME)]
    pub output: PathBuf,

    /// JSON job file supplying processing settings (flags override it)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Size preset
    #[arg(short, long, value_enum)]
    pub preset: Option<Preset>,

    /// Width in pixels (implies the custom preset)
    #[arg(long)]
    pub width: Option<u32>,

    /// Height in pixels (implies the custom preset)
    #[arg(long)]
    pub height: Option<u32>,

    /// Resize strategy
    #[arg(short, long, value_enum)]
    pub strategy: Option<ResizeStrategy>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// JPEG/WEBP quality (1-100)
    #[arg(short, long)]
    pub quality: Option<u8>,

    /// Prefix added to every output file name
    #[arg(long)]
    pub prefix: Option<String>,

    /// Suffix added to every output file name
    #[arg(long)]
    pub suffix: Option<String>,

    /// Replace base names with a zero-padded sequence number
    #[arg(long)]
    pub sequence: bool,

    /// First sequence number
    #[arg(long)]
    pub sequence_start: Option<u32>,

    /// Zero padding width of the sequence number
    #[arg(long)]
    pub sequence_padding: Option<usize>,

    /// Worker profile (default, high_performance, testing)
    #[arg(long)]
    pub profile: Option<String>,

    /// Number of concurrent workers
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Write a per-item JSON report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Overwrite an existing output archive
    #[arg(long)]
    pub force: bool,

    /// Suppress progress output
    #[arg(long)]
    pub quiet: bool,
}
