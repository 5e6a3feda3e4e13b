#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the school IPS map.
//!
//! ```text
//! ips_map "10 rue de Rivoli, Paris" --radius-km 1.5 --transit metro,rer
//! ips_map "Département du Nord" --sector public --categories college,lycee
//! ips_map 69001 --json
//! ```

use std::path::PathBuf;

use clap::Parser;
use ips_map_controller::{Config, EmptyReason, Renderer, SearchOutcome, SearchRequest, start};
use ips_map_geocoder::GeocodedLocation;
use ips_map_school_models::{Category, DepartmentRanking, EstablishmentHit, SectorFilter};
use ips_map_transit::{Station, TransitMode};

#[derive(Parser)]
#[command(
    name = "ips_map",
    about = "Find schools around a place or rank a département by social index"
)]
struct Cli {
    /// Address, commune, postal code, or département code or name
    query: String,

    /// Search radius in kilometers (nearby searches only)
    #[arg(long)]
    radius_km: Option<f64>,

    /// Sector filter: all, public or private
    #[arg(long, default_value = "all")]
    sector: SectorFilter,

    /// Comma-separated categories (ecole, college, lycee); all when omitted
    #[arg(long, value_delimiter = ',')]
    categories: Vec<Category>,

    /// Comma-separated transit modes to list (metro, rer, tram, transilien, ter, tgv)
    #[arg(long, value_delimiter = ',')]
    transit: Vec<TransitMode>,

    /// Configuration file (TOML); the embedded defaults otherwise
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the results as JSON
    #[arg(long)]
    json: bool,
}

/// Prints results as plain text.
struct TerminalRenderer;

fn print_hit(rank: Option<usize>, hit: &EstablishmentHit) {
    let establishment = &hit.establishment;
    let prefix = rank.map_or_else(|| "  ".to_string(), |r| format!("#{r:<2}"));
    let ips = hit
        .social_index
        .map_or_else(|| "n/a".to_string(), |v| format!("{v:.1}"));
    let distance = hit
        .distance_meters
        .map(|d| format!("  {d:.0} m"))
        .unwrap_or_default();
    println!(
        "{prefix} {} [{}] {} {}  IPS {ips} ({}){distance}",
        establishment.name,
        establishment.category.label(),
        establishment.sector.label(),
        establishment.commune.as_deref().unwrap_or(""),
        hit.band(),
    );
}

impl Renderer for TerminalRenderer {
    fn ranking(&self, ranking: &DepartmentRanking) {
        println!("Top {} - {}", ips_map_store::queries::RANKING_SIZE, ranking.label);
        for (category, hits) in &ranking.by_category {
            println!();
            println!("{}", category.label());
            for (i, hit) in hits.iter().enumerate() {
                print_hit(Some(i + 1), hit);
            }
        }
    }

    fn nearby(
        &self,
        center: &GeocodedLocation,
        radius_meters: f64,
        hits: &[EstablishmentHit],
        stations: &[Station],
    ) {
        println!(
            "{} establishment(s) within {:.1} km of {}",
            hits.len(),
            radius_meters / 1000.0,
            center.label
        );
        for hit in hits {
            print_hit(None, hit);
        }
        if !stations.is_empty() {
            println!();
            println!("Stations");
            for station in stations {
                println!(
                    "   {} ({} {})",
                    station.name,
                    station.mode.label(),
                    station.line.as_deref().unwrap_or("")
                );
            }
        }
    }

    fn empty(&self, reason: EmptyReason, center: Option<&GeocodedLocation>) {
        match center {
            Some(center) => println!("{} ({})", reason.message(), center.label),
            None => println!("{}", reason.message()),
        }
    }

    fn failure(&self, message: &str) {
        eprintln!("{message}");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::embedded().clone(),
    };
    let controller = start(&config).await?;

    let mut request = SearchRequest::new(cli.query)
        .with_sector(cli.sector)
        .with_categories(cli.categories)
        .with_transit_modes(cli.transit);
    if let Some(radius_km) = cli.radius_km {
        request = request.with_radius_km(radius_km);
    }

    if cli.json {
        match controller.search(&request).await {
            Ok(SearchOutcome::Completed { results, .. }) => {
                println!("{}", serde_json::to_string_pretty(&results)?);
            }
            Ok(SearchOutcome::Superseded) => {}
            Err(e) => {
                eprintln!("{}", e.user_message());
                std::process::exit(1);
            }
        }
    } else if controller.run(&request, &TerminalRenderer).await.is_none() {
        log::debug!("Search superseded");
    }

    Ok(())
}
