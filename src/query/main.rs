//! Command-line geocoding search over a place dump.
//!
//! Loads a JSON array of place records into memory and resolves one query,
//! or a batch of requests, printing the results as JSON.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{Map, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cypress_search::{MemoryPlaceStore, PlaceRecord, SearchConfig, SearchRequest, Searcher};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "query")]
#[command(about = "Geocoding search over a place dump")]
struct Args {
    /// Place dump (JSON array of place records)
    #[arg(short, long)]
    places: PathBuf,

    /// Search configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Free-text or coordinate query
    query: Option<String>,

    /// Extra request parameter, e.g. `--param featureType=country`
    #[arg(long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// JSON array of request objects to resolve concurrently
    #[arg(long, conflicts_with = "query")]
    batch: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SearchConfig::load_from_file(path)?,
        None => SearchConfig::default(),
    };

    let dump = fs::read_to_string(&args.places)
        .with_context(|| format!("Failed to read {}", args.places.display()))?;
    let records: Vec<PlaceRecord> =
        serde_json::from_str(&dump).context("Failed to parse place dump")?;
    let store = MemoryPlaceStore::from_records(records)?;
    info!("Loaded {} places from {}", store.len(), args.places.display());

    let searcher = Searcher::new(store, config);

    let output = match &args.batch {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let requests: Vec<SearchRequest> =
                serde_json::from_str(&content).context("Failed to parse batch file")?;
            info!("Resolving {} requests", requests.len());

            let answers = searcher
                .search_many(&requests)
                .await
                .into_iter()
                .map(|answer| match answer {
                    Ok(results) => serde_json::to_value(results),
                    Err(e) => Ok(serde_json::json!({
                        "error": e.to_string(),
                        "client_error": e.is_client_error(),
                    })),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Value::Array(answers)
        }
        None => {
            let request = build_request(args.query.as_deref(), &args.params)?;
            let results = searcher.search(&request).await?;
            info!("Found {} results", results.len());
            serde_json::to_value(results)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Merge the positional query and `KEY=VALUE` parameters into a request.
fn build_request(query: Option<&str>, params: &[String]) -> Result<SearchRequest> {
    let mut fields = Map::new();
    if let Some(q) = query {
        fields.insert("q".to_string(), Value::String(q.to_string()));
    }
    for param in params {
        let (key, value) = param
            .split_once('=')
            .with_context(|| format!("Parameter {:?} is not KEY=VALUE", param))?;
        fields.insert(key.trim().to_string(), Value::String(value.to_string()));
    }
    serde_json::from_value(Value::Object(fields)).context("Invalid request parameters")
}
