use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dealscrape::commands::{files, scrape, serve};

#[derive(Parser)]
#[command(
    name = "dealscrape",
    version,
    about = "Slickdeals thread scraper with comment extraction, caching and LLM chat",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Bind host (overrides DEALSCRAPE_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides DEALSCRAPE_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Scrape a single thread
    Scrape {
        /// Thread URL
        url: String,

        /// Maximum number of pages to fetch
        #[arg(short, long, default_value = "10")]
        max_pages: u32,

        /// Ignore the cache and scrape fresh
        #[arg(short, long, default_value = "false")]
        force_refresh: bool,
    },

    /// List or clear cached thread records
    Files {
        /// Delete all cache entries
        #[arg(long, default_value = "false")]
        clear: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(&cli.log_format, cli.verbose)?;

    match cli.command {
        Commands::Serve { host, port } => {
            tracing::info!(host = ?host, port = ?port, "Starting serve command");
            serve(host, port).await?;
        }

        Commands::Scrape {
            url,
            max_pages,
            force_refresh,
        } => {
            tracing::info!(
                url = %url,
                max_pages = %max_pages,
                force_refresh = %force_refresh,
                "Starting scrape command"
            );
            scrape(url, max_pages, force_refresh).await?;
        }

        Commands::Files { clear } => {
            files(clear).await?;
        }
    }

    Ok(())
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("dealscrape=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new("dealscrape=info,warn")
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
