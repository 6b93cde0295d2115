//! vitrine-search: command-line access to the catalog search engine.
//!
//! Every command prints its result as JSON on stdout. Logs go to stderr.
//!
//! Environment variables:
//!   DATABASE_URL - PostgreSQL connection string
//!   LOG_FORMAT   - "json" or "text" (default: "text")
//!   RUST_LOG     - standard env filter (default: "vitrine_search=info,vitrine_db=info")
//!   VITRINE_*    - pool and engine settings, see `PoolConfig` and `SearchConfig`

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use vitrine_search::{
    Catalog, CatalogSearch, CatalogSearchEngine, PoolConfig, ProductSearchFilter, SearchConfig,
};

#[derive(Parser)]
#[command(name = "vitrine-search")]
#[command(author, version, about = "Search the vitrine product catalog")]
#[command(propagate_version = true)]
struct Cli {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a product search from a JSON filter
    Search {
        /// Filter as inline JSON (reads stdin when neither this nor --filter-file is given)
        #[arg(short, long, conflicts_with = "filter_file")]
        filter: Option<String>,

        /// Read the filter JSON from a file
        #[arg(long)]
        filter_file: Option<PathBuf>,
    },

    /// Autocomplete product names
    Suggest {
        /// Name prefix
        prefix: String,

        /// Maximum number of suggestions
        #[arg(short, long)]
        limit: Option<i64>,
    },

    /// Products sharing attribute values with a product
    Similar {
        product_id: Uuid,

        #[arg(short, long)]
        limit: Option<i64>,
    },

    /// Products sharing categories with a product
    Related {
        product_id: Uuid,

        #[arg(short, long)]
        limit: Option<i64>,
    },

    /// Products whose attribute equals a value
    ByAttribute {
        /// Attribute code (e.g. "color")
        code: String,

        /// Exact stored value
        value: String,
    },

    /// Apply pending catalog schema migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let pool_config = PoolConfig::from_env().context("invalid pool configuration")?;
    let catalog = Catalog::connect_with_config(&cli.database_url, pool_config)
        .await
        .context("failed to connect to the catalog database")?;

    if let Commands::Migrate = cli.command {
        catalog.migrate().await.context("migration failed")?;
        info!("Migrations applied");
        return Ok(());
    }

    let config = SearchConfig::from_env().context("invalid search configuration")?;
    let engine = CatalogSearchEngine::with_config(catalog, config);

    match cli.command {
        Commands::Search {
            filter,
            filter_file,
        } => {
            let filter = read_filter(filter, filter_file)?;
            let response = engine.search(filter).await?;
            print_json(&response, cli.pretty)?;
        }
        Commands::Suggest { prefix, limit } => {
            let names = engine.get_suggestions(&prefix, limit).await?;
            print_json(&names, cli.pretty)?;
        }
        Commands::Similar { product_id, limit } => {
            let products = engine.find_similar(product_id, limit).await?;
            print_json(&products, cli.pretty)?;
        }
        Commands::Related { product_id, limit } => {
            let products = engine.find_related_by_category(product_id, limit).await?;
            print_json(&products, cli.pretty)?;
        }
        Commands::ByAttribute { code, value } => {
            let products = engine.find_by_attribute(&code, &value).await?;
            print_json(&products, cli.pretty)?;
        }
        Commands::Migrate => {}
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vitrine_search=info,vitrine_db=info".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|f| f == "json") {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn read_filter(
    inline: Option<String>,
    file: Option<PathBuf>,
) -> anyhow::Result<ProductSearchFilter> {
    let raw = match (inline, file) {
        (Some(json), _) => json,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read filter from stdin")?;
            buf
        }
    };

    if raw.trim().is_empty() {
        return Ok(ProductSearchFilter::default());
    }
    serde_json::from_str(&raw).context("filter is not valid JSON")
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}
