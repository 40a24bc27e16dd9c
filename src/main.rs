//! Bucket Explorer
//!
//! List, dump and download objects from S3 buckets.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bucket_explorer::cli::{Cli, Command, LogLevel};
use bucket_explorer::commands::{self, DownloadOptions, DumpOptions, ListOptions, Location};
use bucket_explorer::output::Console;
use bucket_explorer::profile;
use bucket_explorer::s3::S3Client;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_level);
    tracing::debug!("Starting bucket-explorer v{}", env!("CARGO_PKG_VERSION"));

    let args = cli.command.location();
    let location = Location::resolve(&args.bucket, &args.prefix)?;
    let config = profile::activate(&args.profile, cli.connection());
    let store = S3Client::with_config(config).await?;
    let mut console = Console::stdout(cli.color.into());

    match &cli.command {
        Command::List { long, .. } => {
            let options = ListOptions { long: *long };
            commands::list(&store, &mut console, &location, options).await?;
        }
        Command::Dump { keys, no_text, .. } => {
            let options = DumpOptions {
                keys: keys.clone(),
                text: !no_text,
            };
            commands::dump(&store, &mut console, &location, &options).await?;
        }
        Command::Download {
            target_dir,
            new_dir,
            raw,
            merge,
            ..
        } => {
            let options = DownloadOptions {
                target: target_dir.clone(),
                new_dir: *new_dir,
                raw: *raw,
                merge: *merge,
            };
            commands::download(&store, &mut console, &location, &options).await?;
        }
    }

    console.flush()?;
    Ok(())
}

/// Log to stderr so stdout only carries command output
fn init_logging(level: LogLevel) {
    let level: tracing::Level = level.into();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
