mod analyzer;
mod config;
mod matcher;
mod model;
mod parser;
mod pipeline;
mod reference;
mod source;
mod utils;

use analyzer::{apply_cost_model, calculate_stats, find_deals, rank_by_value, SearchStats};
use config::{load_config, AppConfig, CostAssumptions, SearchConfig};
use futures::future::join_all;
use matcher::LookupDiagnostics;
use model::{EnrichedListing, SearchRequest};
use pipeline::EnrichmentPipeline;
use reference::ReferenceDataStore;
use serde::Serialize;
use source::{JsonFileSource, ListingSource};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use utils::to_kebab_case;

/// What gets written for each search.
#[derive(Serialize)]
struct SearchReport<'a> {
    stats: SearchStats,
    assumptions: &'a CostAssumptions,
    deals: usize,
    listings: Vec<EnrichedListing>,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic occurred: {:?}", panic_info);
    }));

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.json"));
    let config = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    let store = match ReferenceDataStore::load(&config.passmark_path, &config.idle_power_path) {
        Ok(store) => store,
        Err(e) => {
            error!("Reference data load error: {}", e);
            return;
        }
    };

    let source = JsonFileSource::new(config.listings_dir.clone());
    let pipeline = EnrichmentPipeline::new(&store);

    info!("Searches to process: {}", config.searches.len());
    let tasks: Vec<_> = config
        .searches
        .iter()
        .map(|search| process_search(search, &source, &pipeline, &config))
        .collect();
    join_all(tasks).await;
    info!("All searches processed.");
}

/// Fetches, enriches, costs and ranks the listings of one search, then writes the report.
async fn process_search(
    search: &SearchConfig,
    source: &dyn ListingSource,
    pipeline: &EnrichmentPipeline<'_>,
    config: &AppConfig,
) {
    info!("Processing search: {}", search.name);

    let mut raws = Vec::new();
    for term in search.terms() {
        let request = SearchRequest { term };
        match source.fetch(&request).await {
            Ok(found) => {
                info!("[{}] '{}': {} listings", search.name, request.term, found.len());
                raws.extend(found);
            }
            Err(e) => warn!("[{}] fetch failed for '{}': {}", search.name, request.term, e),
        }
    }

    let mut diagnostics = LookupDiagnostics::new();
    let mut listings = pipeline.enrich_all(&raws, &mut diagnostics);
    diagnostics.log_summary(&search.name);

    apply_cost_model(&mut listings, &config.tco_assumptions);
    rank_by_value(&mut listings);

    let stats = calculate_stats(&search.name, &listings);
    info!(
        "[{}] {} listings, {} with TCO, {} with perf/$",
        search.name, stats.listings, stats.with_tco, stats.with_perf_per_dollar
    );

    let deals = find_deals(&listings, config.alerts.perf_per_dollar_min);
    info!(
        "[{}] Found {} deals at or above {:.1} perf/$",
        search.name,
        deals.len(),
        config.alerts.perf_per_dollar_min
    );
    for deal in &deals {
        info!(
            "[{}] {:.1} perf/$ | TCO {:.2} | {} | {} | {} | {}",
            search.name,
            deal.performance_per_dollar.unwrap_or_default(),
            deal.tco.unwrap_or_default(),
            deal.cpu_model,
            deal.ram,
            deal.storage,
            deal.item_url.as_deref().unwrap_or("-")
        );
    }

    let report = SearchReport {
        stats,
        assumptions: &config.tco_assumptions,
        deals: deals.len(),
        listings,
    };
    save_report(&config.output_dir, &search.name, &report);
    info!("Finished processing search: {}", search.name);
}

/// Writes the ranked listings of one search as pretty JSON.
fn save_report(folder: &Path, search: &str, report: &SearchReport<'_>) {
    if let Err(e) = fs::create_dir_all(folder) {
        warn!("Failed to create output folder: {}", e);
        return;
    }
    let filename = folder.join(format!("{}.json", to_kebab_case(search)));
    let json = match serde_json::to_string_pretty(report) {
        Ok(json) => json,
        Err(e) => {
            warn!("Failed to serialize report for '{}': {}", search, e);
            return;
        }
    };
    if let Err(e) = fs::write(&filename, json) {
        warn!("Failed to write report: {}", e);
    } else {
        info!("Saved report: {}", filename.display());
    }
}
