//! CLI entry point for mdblog

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mdblog::commands::new::NewPostOptions;

#[derive(Parser)]
#[command(name = "mdblog")]
#[command(author = "Yukang Chen")]
#[command(version = "0.1.0")]
#[command(about = "A small markdown blog with a JSON post store", long_about = None)]
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
    /// Start the blog server
    #[command(alias = "s")]
    Server {
        /// Port to listen on (defaults to the config's server.port)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to the config's server.ip)
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Markdown content
        #[arg(long)]
        content: Option<String>,

        /// Comma separated tags
        #[arg(short, long)]
        tags: Option<String>,

        /// Category name
        #[arg(long)]
        category: Option<String>,

        /// Publish immediately instead of saving a draft
        #[arg(long)]
        publish: bool,
    },

    /// List blog content
    List {
        /// Type of content to list (post, draft, tag, category)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Add sample posts to an empty blog
    Seed,

    /// Render a markdown file to HTML
    Render {
        /// Markdown file to render
        file: PathBuf,
    },

    /// Toggle a post between draft and published
    Publish {
        /// Post id
        id: u64,
    },

    /// Delete a post
    Delete {
        /// Post id
        id: u64,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "mdblog=debug,info"
    } else {
        "mdblog=info"
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
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    match cli.command {
        Commands::Server { port, ip } => {
            let blog = mdblog::Blog::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| blog.config.server.ip.clone());
            let port = port.unwrap_or(blog.config.server.port);

            tracing::info!("Starting server at http://{}:{}", ip, port);
            mdblog::server::start(&blog, &ip, port).await?;
        }

        Commands::New {
            title,
            content,
            tags,
            category,
            publish,
        } => {
            let blog = mdblog::Blog::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            mdblog::commands::new::create_post(
                &blog,
                &title,
                NewPostOptions {
                    content,
                    tags,
                    category,
                    publish,
                },
            )?;
        }

        Commands::List { r#type } => {
            let blog = mdblog::Blog::new(&base_dir)?;
            mdblog::commands::list::run(&blog, &r#type)?;
        }

        Commands::Seed => {
            let blog = mdblog::Blog::new(&base_dir)?;
            mdblog::commands::seed::run(&blog)?;
        }

        Commands::Render { file } => {
            let blog = mdblog::Blog::new(&base_dir)?;
            let file = if file.is_absolute() {
                file
            } else {
                base_dir.join(file)
            };
            mdblog::commands::render::run(&blog, &file)?;
        }

        Commands::Publish { id } => {
            let blog = mdblog::Blog::new(&base_dir)?;
            mdblog::commands::manage::toggle_publish(&blog, id)?;
        }

        Commands::Delete { id } => {
            let blog = mdblog::Blog::new(&base_dir)?;
            mdblog::commands::manage::delete(&blog, id)?;
        }

        Commands::Version => {
            println!("mdblog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
