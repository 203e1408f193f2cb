//! CLI entry point for folio

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Typed content collections for a markdown blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every collection and resolve references
    #[command(alias = "c")]
    Check {
        /// Re-check when content or config changes
        #[arg(short, long)]
        watch: bool,
    },

    /// List the entries of a collection
    List {
        /// Collection name (blog, characters, conversations)
        #[arg(default_value = "blog")]
        collection: String,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one entry's validated data
    Show {
        collection: String,
        id: String,
    },

    /// Create a new entry
    New {
        /// Collection to add the entry to
        #[arg(short, long, default_value = "blog")]
        collection: String,

        /// Title (or name) of the new entry
        title: String,
    },

    /// Print the comment widget embed for a page
    Embed {
        /// Page pathname, e.g. /blog/first-post
        pathname: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Check { watch } => {
            let site = folio::Site::new(&base_dir)?;
            tracing::info!("Checking content in {:?}", base_dir);

            let result = folio::commands::check::run(&site);
            if watch {
                if let Err(e) = result {
                    tracing::error!("{}", e);
                }
                folio::commands::check::watch(&site).await?;
            } else {
                result?;
                println!("Content is valid.");
            }
        }

        Commands::List { collection, json } => {
            let site = folio::Site::new(&base_dir)?;
            folio::commands::list::run(&site, &collection, json)?;
        }

        Commands::Show { collection, id } => {
            let site = folio::Site::new(&base_dir)?;
            folio::commands::show::run(&site, &collection, &id)?;
        }

        Commands::New { collection, title } => {
            let site = folio::Site::new(&base_dir)?;
            tracing::info!("Creating new {} entry: {}", collection, title);
            folio::commands::new::run(&site, &collection, &title)?;
        }

        Commands::Embed { pathname } => {
            let site = folio::Site::new(&base_dir)?;
            folio::commands::embed::run(&site, &pathname)?;
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
