//! Command-line driver for the celestial catalog search engine.
//!
//! ```bash
//! celestial init --db catalog.db
//! celestial import --db catalog.db --json catalog.json
//! celestial search --db catalog.db "M31"
//! celestial nearby --db catalog.db --ra 10.68 --dec 41.27 --radius 5
//! ```

use clap::{Parser, Subcommand};
use celestial_core::{ImportExportOptions, Repository, SearchEngine, SearchOptions, ServiceConfig};
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(name = "celestial", about = "Celestial object catalog and search engine", version)]
struct Cli {
    /// Path to the SQLite catalog file.
    #[arg(long, global = true, default_value = "catalog.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the catalog schema if it doesn't already exist.
    Init,

    /// Import catalog rows from a JSON or CSV file.
    Import {
        #[arg(long, conflicts_with = "csv")]
        json: Option<PathBuf>,
        #[arg(long, conflicts_with = "json")]
        csv: Option<PathBuf>,
    },

    /// Export the catalog to JSON or CSV.
    Export {
        #[arg(long, conflicts_with = "csv")]
        json: Option<PathBuf>,
        #[arg(long, conflicts_with = "json")]
        csv: Option<PathBuf>,
    },

    /// Search by identifier, falling back to fuzzy matching.
    Search {
        query: String,
        #[arg(long, default_value_t = 10)]
        limit: i64,
    },

    /// Autocomplete a name prefix.
    Autocomplete {
        prefix: String,
        #[arg(long, default_value_t = 10)]
        limit: i64,
    },

    /// Find objects within a radius of a coordinate.
    Nearby {
        #[arg(long)]
        ra: f64,
        #[arg(long)]
        dec: f64,
        #[arg(long, default_value_t = 1.0)]
        radius: f64,
        #[arg(long, default_value_t = 10)]
        limit: i64,
    },

    /// Print catalog-wide statistics as JSON.
    Stats,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!(error = %e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> celestial_core::Result<()> {
    let config = ServiceConfig::new(&cli.db);
    let repository = Repository::open(&config.database_path)?;

    match cli.command {
        Commands::Init => {
            repository.initialize_schema()?;
            println!("initialized schema at {}", config.database_path.display());
        }
        Commands::Import { json, csv } => {
            let result = if let Some(path) = json {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    celestial_core::Error::Repository(celestial_core::RepositoryError::Io(e))
                })?;
                repository.import_json(&text)?
            } else if let Some(path) = csv {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    celestial_core::Error::Repository(celestial_core::RepositoryError::Io(e))
                })?;
                repository.import_csv(&text, &ImportExportOptions::default())?
            } else {
                eprintln!("specify --json or --csv");
                std::process::exit(2);
            };
            println!(
                "total={} success={} duplicate={} error={}",
                result.total, result.success, result.duplicate, result.error
            );
            for msg in &result.errors {
                eprintln!("  {msg}");
            }
        }
        Commands::Export { json, csv } => {
            if let Some(path) = json {
                let text = repository.export_json(&ImportExportOptions::default())?;
                std::fs::write(path, text).map_err(|e| {
                    celestial_core::Error::Repository(celestial_core::RepositoryError::Io(e))
                })?;
            } else if let Some(path) = csv {
                let text = repository.export_csv(&ImportExportOptions::default())?;
                std::fs::write(path, text).map_err(|e| {
                    celestial_core::Error::Repository(celestial_core::RepositoryError::Io(e))
                })?;
            } else {
                eprintln!("specify --json or --csv");
                std::process::exit(2);
            }
        }
        Commands::Search { query, limit } => {
            let engine = SearchEngine::new(repository, config);
            engine.initialize()?;
            let options = SearchOptions { max_results: limit, ..Default::default() };
            for obj in engine.search(&query, &options) {
                println!("{}\t{}\t{:.4}\t{:.4}", obj.identifier, obj.object_type, obj.ra_deg, obj.dec_deg);
            }
        }
        Commands::Autocomplete { prefix, limit } => {
            let engine = SearchEngine::new(repository, config);
            engine.initialize()?;
            for name in engine.autocomplete(&prefix, limit) {
                println!("{name}");
            }
        }
        Commands::Nearby { ra, dec, radius, limit } => {
            let engine = SearchEngine::new(repository, config);
            engine.initialize()?;
            for obj in engine.search_by_coordinates(ra, dec, radius, limit) {
                println!("{}\t{:.4}\t{:.4}", obj.identifier, obj.ra_deg, obj.dec_deg);
            }
        }
        Commands::Stats => {
            let engine = SearchEngine::new(repository, config);
            let stats = engine.repository().get_statistics()?;
            println!("{}", serde_json::to_string_pretty(&stats).unwrap());
        }
    }

    Ok(())
}
