//! Eurobase - a client for the Eurostat bulk download web services
//!
//! This is the main entry point for the eurobase command-line interface.

use clap::{Parser, Subcommand};
use eurobase::collection::{Collection, CollectionConfig, EntityKind};
use eurobase::session::{HttpSession, HttpSessionConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "eurobase", version, about = "Query the Eurostat bulk download catalog")]
struct Cli {
    /// Language of returned metadata
    #[arg(long, global = true)]
    lang: Option<String>,

    /// Directory where downloaded files are cached
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Seconds a cached file stays valid (0 disables caching)
    #[arg(long, global = true)]
    expire: Option<u64>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List datasets, optionally restricted to those using a dimension
    Datasets {
        /// Only datasets using this dimension
        #[arg(long)]
        dimension: Option<String>,
    },
    /// List dimensions, optionally restricted to a dataset
    Dimensions {
        /// Only dimensions of this dataset
        #[arg(long)]
        dataset: Option<String>,
    },
    /// List the labels of a dimension
    Labels {
        /// Dimension to list labels of
        dimension: String,
        /// Restrict to labels used within this dataset
        #[arg(long)]
        dataset: Option<String>,
    },
    /// Show title and observation period of a dataset
    Info {
        /// Dataset code
        dataset: String,
    },
    /// Check whether an entity exists in the catalog
    Check {
        /// Dataset code to check
        #[arg(long, conflicts_with = "dimension")]
        dataset: Option<String>,
        /// Dimension code to check
        #[arg(long)]
        dimension: Option<String>,
    },
    /// Show when an entity's bulk file was last updated
    LastUpdate {
        /// Entity code
        code: String,
        /// Treat the code as a dimension instead of a dataset
        #[arg(long)]
        dimension: bool,
    },
}

fn print_list(values: &[String], json: bool) -> eurobase::Result<()> {
    if json {
        let rendered = serde_json::to_string_pretty(values)
            .map_err(|e| eurobase::Error::InvalidParameter(e.to_string()))?;
        println!("{}", rendered);
    } else {
        for value in values {
            println!("{}", value);
        }
    }
    Ok(())
}

fn run(cli: Cli) -> eurobase::Result<()> {
    let mut config = CollectionConfig::default();
    if let Some(lang) = &cli.lang {
        config.lang = lang.clone();
    }

    let session = HttpSession::new(HttpSessionConfig {
        cache_dir: cli.cache_dir.clone(),
        expire_secs: cli.expire,
        ..Default::default()
    })?;
    let mut catalog = Collection::new(config, session)?;

    match &cli.command {
        Command::Datasets { dimension } => {
            catalog.load_metabase()?;
            let datasets = match dimension {
                Some(dimension) => catalog.datasets_using(dimension)?,
                None => catalog.datasets()?,
            };
            print_list(&datasets, cli.json)?;
        }
        Command::Dimensions { dataset } => {
            catalog.load_metabase()?;
            let dimensions = match dataset {
                Some(dataset) => catalog.dimensions_of(dataset)?,
                None => catalog.dimensions()?,
            };
            print_list(&dimensions, cli.json)?;
        }
        Command::Labels { dimension, dataset } => {
            catalog.load_metabase()?;
            let labels = match dataset {
                Some(dataset) => catalog.labels_in(dimension, dataset)?,
                None => catalog.labels_of(dimension)?,
            };
            print_list(&labels, cli.json)?;
        }
        Command::Info { dataset } => {
            catalog.load_toc(None, None)?;
            let title = catalog.title(dataset)?;
            let (start, end) = catalog.period(dataset)?;
            if cli.json {
                let rendered = serde_json::json!({
                    "code": dataset,
                    "title": title,
                    "data_start": start,
                    "data_end": end,
                });
                println!("{}", rendered);
            } else {
                println!("{}: {} [{} - {}]", dataset, title, start, end);
            }
        }
        Command::Check { dataset, dimension } => {
            catalog.load_metabase()?;
            let exists = match (dataset, dimension) {
                (Some(dataset), None) => catalog.check_dataset(dataset)?,
                (None, Some(dimension)) => catalog.check_dimension(dimension)?,
                _ => {
                    return Err(eurobase::Error::InvalidParameter(
                        "one of --dataset or --dimension needs to be set".to_string(),
                    ))
                }
            };
            println!("{}", exists);
        }
        Command::LastUpdate { code, dimension } => {
            let kind = if *dimension { EntityKind::Dimension } else { EntityKind::Dataset };
            println!("{}", catalog.last_update(kind, code)?);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("eurobase: {}", e);
            ExitCode::FAILURE
        }
    }
}
