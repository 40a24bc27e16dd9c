//! CLI argument definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::output::ColorChoice;
use crate::profile::DEFAULT_PROFILE;
use crate::s3::S3ClientConfig;

const EXAMPLES: &str = "\
Examples:
  List everything under a prefix:
    bucket-explorer list my-bucket --prefix logs/2022-01-01

  Print two fields of every JSON record:
    bucket-explorer dump s3://my-bucket/events/ --no-text --keys id --keys ts

  Merge all payloads into one local file:
    bucket-explorer download my-bucket --prefix events/ --target out --new-dir --raw --merge";

/// List, inspect and download objects from S3 buckets.
#[derive(Parser, Debug)]
#[command(name = "bucket-explorer")]
#[command(version, about, long_about = None, after_help = EXAMPLES)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Custom S3 endpoint URL (for MinIO or LocalStack)
    #[arg(long, global = true, env = "BUCKET_EXPLORER_ENDPOINT")]
    pub endpoint_url: Option<String>,

    /// AWS region, overriding the profile's
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Use path-style bucket addressing
    #[arg(long, global = true)]
    pub force_path_style: bool,

    /// When to highlight titles and items
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub color: ColorArg,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, global = true, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}

impl Cli {
    /// Connection settings shared by every command, without a profile
    pub fn connection(&self) -> S3ClientConfig {
        S3ClientConfig {
            endpoint_url: self.endpoint_url.clone(),
            region: self.region.clone(),
            force_path_style: self.force_path_style,
            ..Default::default()
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all the objects under a prefix
    List {
        #[command(flatten)]
        location: LocationArgs,

        /// Also print size and last-modified time
        #[arg(short, long)]
        long: bool,
    },

    /// Print the content of objects, optionally as filtered JSON records
    Dump {
        #[command(flatten)]
        location: LocationArgs,

        /// JSON key to keep in each record (repeatable)
        #[arg(short, long = "keys")]
        keys: Vec<String>,

        /// Print payloads as is (default)
        #[arg(long, overrides_with = "no_text")]
        text: bool,

        /// Parse payloads as JSON arrays of records, enabling --keys
        #[arg(long, overrides_with = "text")]
        no_text: bool,
    },

    /// Download objects to a local directory
    Download {
        #[command(flatten)]
        location: LocationArgs,

        /// Local directory to download files to
        #[arg(short, long = "target", default_value = ".")]
        target_dir: PathBuf,

        /// Create the target directory if it does not exist
        #[arg(long)]
        new_dir: bool,

        /// Fetch the raw bytes and write them to new files instead of
        /// streaming each object
        #[arg(long)]
        raw: bool,

        /// With --raw, merge all payloads into one file
        #[arg(long)]
        merge: bool,
    },
}

/// Arguments every command takes
#[derive(Args, Debug, Clone)]
pub struct LocationArgs {
    /// Bucket name, or an s3:// URL whose key is used as the prefix
    pub bucket: String,

    /// Key prefix, e.g. `logs/2022-01-01` (everything in `logs` starting
    /// with `2022-01-01`)
    #[arg(short, long, default_value = "")]
    pub prefix: String,

    /// AWS profile to connect with
    #[arg(long, default_value = DEFAULT_PROFILE)]
    pub profile: String,
}

impl Command {
    pub fn location(&self) -> &LocationArgs {
        match self {
            Command::List { location, .. }
            | Command::Dump { location, .. }
            | Command::Download { location, .. } => location,
        }
    }
}

/// Color argument
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorArg {
    /// Only when stdout is a terminal
    Auto,
    /// Always
    Always,
    /// Never
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => ColorChoice::Auto,
            ColorArg::Always => ColorChoice::Always,
            ColorArg::Never => ColorChoice::Never,
        }
    }
}

/// Log level argument
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    /// Trace level (most verbose)
    Trace,
    /// Debug level
    Debug,
    /// Info level
    Info,
    /// Warning level (default)
    Warn,
    /// Error level (least verbose)
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}
