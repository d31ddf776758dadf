//! CLI entry point for folio

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Markdown content loader for a portfolio blog", long_about = None)]
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
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// File name (without extension); derived from the title if omitted
        #[arg(short, long)]
        slug: Option<String>,

        /// Comma-separated tags
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// List posts or tags
    List {
        /// Type of content to list (post, tag)
        #[arg(default_value = "post")]
        r#type: String,

        /// Only posts with this tag
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Print the rendered HTML of a post
    Show {
        /// Post id (file name without extension)
        id: String,
    },

    /// Start the JSON API server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio_rs=debug,info"
    } else {
        "folio_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            folio_rs::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New { title, slug, tags } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            let path = folio_rs::commands::new::create_post(&folio, &title, slug.as_deref(), &tags)?;
            println!("Created: {:?}", path);
        }

        Commands::List { r#type, tag } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            folio_rs::commands::list::run(&folio, &r#type, tag.as_deref())?;
        }

        Commands::Show { id } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            folio_rs::commands::show::run(&folio, &id)?;
        }

        Commands::Serve { port, ip } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| folio.config.server.ip.clone());
            let port = port.unwrap_or(folio.config.server.port);

            tracing::info!("Starting server at http://{}:{}", ip, port);
            folio_rs::server::start(&folio, &ip, port).await?;
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
