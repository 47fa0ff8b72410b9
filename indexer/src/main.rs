use anyhow::Result;
use clap::{Parser, Subcommand};
use talkindex_core::index::Index;
use talkindex_core::loader::load_dir;
use talkindex_core::persist::{save_dir, SnapshotPaths};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and persist the talk index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from a directory of *.json talk documents
    Build {
        /// Input documents directory
        #[arg(long)]
        input: String,
        /// Output snapshot directory
        #[arg(long)]
        output: String,
        /// Recency reference as Unix seconds; defaults to now. Pin it to make
        /// snapshots reproducible.
        #[arg(long)]
        today: Option<i64>,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input,
            output,
            today,
        } => build(&input, &output, today),
    }
}

fn build(input: &str, output: &str, today: Option<i64>) -> Result<()> {
    let docs = load_dir(input)?;
    let today = today.unwrap_or_else(|| time::OffsetDateTime::now_utc().unix_timestamp());
    let index = Index::build(&docs, today);
    save_dir(&SnapshotPaths::new(output), &index)?;

    tracing::info!(
        num_docs = index.len(),
        num_tags = index.list_tags().len(),
        num_speakers = index.list_speakers().len(),
        num_channels = index.list_channels().len(),
        output,
        "index build complete"
    );
    Ok(())
}
