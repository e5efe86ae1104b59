use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// Extract ownership records and positioned text from property-registry PDFs.
#[derive(Debug, Parser)]
#[command(name = "touki", about, version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the linearized text of a PDF
    Text {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = TextFormat::Text)]
        format: TextFormat,

        /// Apply Unicode normalization to fragment text
        #[arg(long, value_enum)]
        unicode_norm: Option<UnicodeNormArg>,
    },

    /// List positioned text fragments per page
    Fragments {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Apply Unicode normalization to fragment text
        #[arg(long, value_enum)]
        unicode_norm: Option<UnicodeNormArg>,
    },

    /// Extract ownership records from one or more PDFs
    Records {
        /// Paths to the PDF files
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = RecordsFormat::Text)]
        format: RecordsFormat,

        /// Number of files processed at once. Default: available parallelism
        #[arg(long, short = 'j')]
        jobs: Option<usize>,

        /// Reject files larger than this many bytes
        #[arg(long, value_name = "BYTES")]
        max_file_size: Option<usize>,
    },
}

/// Output format for the text subcommand.
#[derive(Debug, Clone, ValueEnum)]
pub enum TextFormat {
    /// Plain text
    Text,
    /// JSON output
    Json,
}

/// Output format for the fragments subcommand.
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Plain text (tab-separated)
    Text,
    /// JSON output
    Json,
    /// CSV output
    Csv,
}

/// Output format for the records subcommand.
#[derive(Debug, Clone, ValueEnum)]
pub enum RecordsFormat {
    /// Plain text (tab-separated)
    Text,
    /// One JSON document for all files
    Json,
    /// Batch events, one JSON object per line
    Ndjson,
    /// CSV output
    Csv,
}

/// Unicode normalization form for CLI arguments.
#[derive(Debug, Clone, ValueEnum)]
pub enum UnicodeNormArg {
    /// Canonical Decomposition, followed by Canonical Composition
    Nfc,
    /// Canonical Decomposition
    Nfd,
    /// Compatibility Decomposition, followed by Canonical Composition
    Nfkc,
    /// Compatibility Decomposition
    Nfkd,
}

impl UnicodeNormArg {
    /// Convert to the core library's `UnicodeNorm` enum.
    pub fn to_unicode_norm(&self) -> touki::UnicodeNorm {
        match self {
            UnicodeNormArg::Nfc => touki::UnicodeNorm::Nfc,
            UnicodeNormArg::Nfd => touki::UnicodeNorm::Nfd,
            UnicodeNormArg::Nfkc => touki::UnicodeNorm::Nfkc,
            UnicodeNormArg::Nfkd => touki::UnicodeNorm::Nfkd,
        }
    }
}
