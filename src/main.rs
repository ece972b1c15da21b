use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tracker::{api, config::ServerConfig, mcp, models::Catalog};
use tracker_core::{group_tasks, Database, ListParams};

#[derive(Parser)]
#[command(name = "tracker")]
#[command(about = "Daily progress tracking for categorised tasks")]
struct Cli {
    /// Path to the SQLite database (defaults to the platform data directory)
    #[arg(long, global = true, env = "TRACKER_DB")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Tracker server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1", env = "TRACKER_HOST")]
        host: String,

        /// Port for the HTTP server
        #[arg(short, long, default_value = "3000", env = "TRACKER_PORT")]
        port: u16,

        /// Window for coalescing repeated progress submissions, in milliseconds
        #[arg(long, default_value = "300", env = "TRACKER_DEBOUNCE_MS")]
        debounce_ms: u64,
    },
    /// Start MCP server via stdio
    Mcp,
    /// Load categories, sub-categories and tasks from a JSON file
    Import {
        /// Catalog JSON file
        file: PathBuf,
    },
    /// Print one page of tasks grouped by sub-category
    List {
        /// Case-insensitive substring of the task name
        #[arg(short, long, default_value = "")]
        search: String,

        /// Zero-based page number
        #[arg(short, long, default_value = "0")]
        page: u32,
    },
    /// Check whether a server is running
    Status {
        /// Base URL of the server
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        url: String,
    },
}

fn open_db(path: Option<&PathBuf>) -> anyhow::Result<Database> {
    let db = match path {
        Some(path) => Database::open(path)?,
        None => Database::open_default()?,
    };
    db.migrate()?;
    Ok(db)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "tracker=debug,tracker_core=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve {
            host,
            port,
            debounce_ms,
        }) => {
            let config = ServerConfig {
                host,
                port,
                debounce_ms,
            };
            tracing::info!("Starting Tracker server on {}", config.addr());

            let db = open_db(cli.db.as_ref())?;
            api::serve(db, &config).await?;
        }
        Some(Commands::Mcp) => {
            let db = open_db(cli.db.as_ref())?;
            mcp::run_stdio_server(db).await?;
        }
        Some(Commands::Import { file }) => {
            let raw = std::fs::read_to_string(&file)?;
            let catalog: Catalog = serde_json::from_str(&raw)?;

            let db = open_db(cli.db.as_ref())?;
            let summary = db.import_catalog(&catalog)?;
            println!(
                "Imported {} categories, {} sub-categories, {} tasks ({} with progress)",
                summary.categories, summary.sub_categories, summary.tasks, summary.progress
            );
        }
        Some(Commands::List { search, page }) => {
            let db = open_db(cli.db.as_ref())?;
            let result = db.list_tasks(&ListParams::new(search, page))?;

            println!(
                "Page {} ({} matching tasks){}",
                result.page,
                result.total_count,
                if result.has_next_page { ", more available" } else { "" }
            );
            for group in group_tasks(result.tasks) {
                println!("\n{}", group.title());
                for row in &group.tasks {
                    println!("  [{:>4}] {:>5}%  {}", row.task.id, row.progress_value(), row.task.name);
                }
            }
        }
        Some(Commands::Status { url }) => {
            let endpoint = format!("{}/health", url.trim_end_matches('/'));
            match reqwest::get(&endpoint).await {
                Ok(resp) if resp.status().is_success() => {
                    let health: api::HealthResponse = resp.json().await?;
                    println!("Tracker server at {} is {}", url, health.status);
                }
                Ok(resp) => {
                    println!("Tracker server at {} answered {}", url, resp.status());
                }
                Err(e) => {
                    println!("Tracker server at {} is not reachable: {}", url, e);
                }
            }
        }
        None => {
            // Default: start server
            let config = ServerConfig::default();
            tracing::info!("Starting Tracker server on {}", config.addr());

            let db = open_db(cli.db.as_ref())?;
            api::serve(db, &config).await?;
        }
    }

    Ok(())
}
