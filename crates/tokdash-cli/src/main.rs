mod fetch;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "tokdash")]
#[command(about = "Fetch tracked TikTok profiles and build the dashboard snapshot")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one fetch-and-aggregate pass and write the snapshot (the default)
    Fetch {
        /// List the profiles that would be fetched without contacting Apify
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() {
    match run().await {
        Ok(()) => println!("Success!"),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = tokdash_core::load_app_config()?;
    let filter = tracing_subscriber::EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.env.ansi_logs())
        .init();
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Some(Commands::Fetch { dry_run }) => fetch::run_fetch(&config, dry_run).await,
        None => fetch::run_fetch(&config, false).await,
    }
}
