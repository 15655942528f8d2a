use clap::{Parser, Subcommand, ValueEnum};
use noteport_config::ImportFormat;
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Header syntax selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Detect per document
    Auto,
    /// YAML-lite frontmatter
    Markdown,
    /// `key:: value` outline properties
    Outline,
}

impl From<FormatArg> for ImportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Auto => ImportFormat::Auto,
            FormatArg::Markdown => ImportFormat::Markdown,
            FormatArg::Outline => ImportFormat::Outline,
        }
    }
}

#[derive(Parser)]
#[command(name = "noteport")]
#[command(about = "noteport - analyze a Markdown vault and import it as structured records")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    /// If not specified, uses NOTEPORT_LOG, then the config file, then 'warn'
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/noteport/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Header syntax (overrides [import] format)
    #[arg(short = 'f', long, global = true, value_enum)]
    pub format: Option<FormatArg>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a vault and generate a collection schema
    Scan {
        /// Vault root directory
        dir: PathBuf,

        /// Collection name used for the schema and view ids
        #[arg(short, long)]
        name: String,

        /// Write the Markdown report here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Also write the schema JSON to this file
        #[arg(long)]
        schema_out: Option<PathBuf>,
    },

    /// Import a vault into records using a schema
    Import {
        /// Vault root directory
        dir: PathBuf,

        /// Schema JSON produced by `scan` (or written by hand)
        #[arg(short, long)]
        schema: PathBuf,

        /// Write the imported records as JSON
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Skip the reference resolution phase
        #[arg(long)]
        no_resolve: bool,
    },

    /// Show how one file is parsed
    Parse {
        /// Note file
        file: PathBuf,
    },
}

impl Cli {
    /// Level requested on the command line, if any
    pub fn requested_level(&self) -> Option<LevelFilter> {
        if let Some(level) = self.log_level {
            return Some(level.into());
        }
        self.verbose.then_some(LevelFilter::DEBUG)
    }
}
