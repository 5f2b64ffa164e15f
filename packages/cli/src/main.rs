#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the fire map tool.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use fire_map_analytics::causes::{CauseTable, compute_cause_statistics};
use fire_map_analytics::compute_statistics;
use fire_map_fire_models::LatLng;
use fire_map_source::fetch::HttpFeedFetcher;
use fire_map_source::load::{load_fires, load_fires_with_causes};
use fire_map_source::registry::resolve_config;
use fire_map_source_models::FireMapConfig;
use fire_map_store::FireStore;
use fire_map_store::cluster::{MarkerLayer, StatusFilter, apply_filter};
use fire_map_store::popup::PopupFields;

#[derive(Parser)]
#[command(name = "fire_map_cli", about = "Wildfire feed loader and summary tool")]
struct Cli {
    /// TOML config file. Defaults to the built-in configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load both fire feeds and print the load summary
    Load,
    /// Load, then print aggregate statistics as JSON
    Stats,
    /// Load with the cause source, then print cause coverage as JSON
    Causes,
    /// List fires within a radius of a point, nearest first
    Nearby {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Search radius in kilometres
        #[arg(long, default_value = "50")]
        radius_km: f64,
    },
    /// Print the marker ids visible under a status filter
    Filter {
        /// Status keys to enable (e.g., "out of control"). Repeatable.
        #[arg(long = "status", required = true)]
        statuses: Vec<String>,
    },
    /// Print the popup fields for one fire
    Show {
        /// Fire id
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = read_config(cli.config.as_deref()).await?;
    let tz = config.tz()?;
    let fetcher = HttpFeedFetcher::new()?;
    let mut store = FireStore::new();

    match cli.command {
        Commands::Load => {
            let summary = load_fires(&fetcher, &config, &mut store).await?;
            println!("Active fires:  {}", summary.active);
            println!("Out fires:     {}", summary.out);
            println!("Skipped:       {}", summary.skipped);
            println!("Overwritten:   {}", summary.overwritten);
            println!("In store:      {}", store.len());
        }
        Commands::Stats => {
            load_fires(&fetcher, &config, &mut store).await?;
            let stats = compute_statistics(&store, chrono::Utc::now(), &tz);
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Commands::Causes => {
            let (_, causes) = load_fires_with_causes(&fetcher, &config, &mut store).await?;
            let key_field = config
                .causes
                .as_ref()
                .map_or("FIRE_NUMBER", |source| source.key_field.as_str());
            let table = CauseTable::new(key_field, causes);
            let stats = compute_cause_statistics(&store, &table);
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Commands::Nearby {
            lat,
            lng,
            radius_km,
        } => {
            load_fires(&fetcher, &config, &mut store).await?;
            let nearby = store.within_radius(LatLng::new(lat, lng), radius_km);
            println!("{:<16} {:>9} {:<18} NAME", "ID", "KM", "STATUS");
            println!("{}", "-".repeat(60));
            for fire in &nearby {
                println!(
                    "{:<16} {:>9.1} {:<18} {}",
                    fire.record.id,
                    fire.distance_km,
                    fire.record.status.label(),
                    fire.record.name
                );
            }
            log::info!("{} fires within {radius_km} km", nearby.len());
        }
        Commands::Filter { statuses } => {
            load_fires(&fetcher, &config, &mut store).await?;
            let mut layer = MarkerLayer::new();
            let visible = apply_filter(&store, &mut layer, &StatusFilter::from_keys(statuses.as_slice()));
            for id in layer.visible_ids() {
                println!("{id}");
            }
            log::info!(
                "{visible} of {} markers visible, cluster color {}",
                store.len(),
                layer.color().unwrap_or("none")
            );
        }
        Commands::Show { id } => {
            load_fires(&fetcher, &config, &mut store).await?;
            let Some(record) = store.get(&id) else {
                return Err(format!("No fire with id {id}").into());
            };
            let popup = PopupFields::from_record(record, &tz);
            println!("{}", serde_json::to_string_pretty(&popup)?);
        }
    }

    Ok(())
}

async fn read_config(
    path: Option<&Path>,
) -> Result<FireMapConfig, Box<dyn std::error::Error>> {
    let contents = match path {
        Some(path) => Some(tokio::fs::read_to_string(path).await?),
        None => None,
    };
    Ok(resolve_config(contents.as_deref())?)
}
