use crate::model::EnrichedListing;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

/// Summary of one search run.
#[derive(Debug, Clone, Serialize)]
pub struct SearchStats {
    pub search: String,
    pub listings: usize,
    pub with_tco: usize,
    pub with_perf_per_dollar: usize,
    pub avg_tco: Option<f64>,
    pub best_perf_per_dollar: Option<f64>,
    pub generated_at: DateTime<Utc>,
}

/// Sorts by performance per dollar, best first; listings without a value go last.
/// The sort is stable, so equal values keep their input order.
pub fn rank_by_value(listings: &mut [EnrichedListing]) {
    listings.sort_by(|a, b| match (a.performance_per_dollar, b.performance_per_dollar) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Listings whose known perf/$ reaches `min_perf_per_dollar`, in input order.
pub fn find_deals(listings: &[EnrichedListing], min_perf_per_dollar: f64) -> Vec<&EnrichedListing> {
    listings
        .iter()
        .filter(|l| l.performance_per_dollar.is_some_and(|v| v >= min_perf_per_dollar))
        .collect()
}

pub fn calculate_stats(search: &str, listings: &[EnrichedListing]) -> SearchStats {
    let tcos: Vec<f64> = listings.iter().filter_map(|l| l.tco).collect();
    let avg_tco = (!tcos.is_empty()).then(|| tcos.iter().sum::<f64>() / tcos.len() as f64);
    let values: Vec<f64> = listings.iter().filter_map(|l| l.performance_per_dollar).collect();
    let best_perf_per_dollar = values.iter().copied().reduce(f64::max);

    SearchStats {
        search: search.to_string(),
        listings: listings.len(),
        with_tco: tcos.len(),
        with_perf_per_dollar: values.len(),
        avg_tco,
        best_perf_per_dollar,
        generated_at: Utc::now(),
    }
}
