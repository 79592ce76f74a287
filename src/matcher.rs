// CPU model -> benchmark values
use crate::model::ParsedSpecification;
use crate::reference::ReferenceDataStore;
use crate::utils::precise_substring_match;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Brand-only models that are too coarse to map to one benchmark row.
const GENERIC_TERMS: [&str; 6] = ["CELERON", "PENTIUM", "ATOM", "XEON", "RYZEN", "ATHLON"];

/// CPU models that could not be resolved, one set per reference map.
///
/// Owned by the caller and created fresh for every search run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LookupDiagnostics {
    pub missing_passmark: BTreeSet<String>,
    pub missing_idle_power: BTreeSet<String>,
}

impl LookupDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_summary(&self, search: &str) {
        if !self.missing_passmark.is_empty() {
            info!(
                "[{}] CPUs not found in PassMark: {}",
                search,
                self.missing_passmark.iter().cloned().collect::<Vec<_>>().join(", ")
            );
        }
        if !self.missing_idle_power.is_empty() {
            info!(
                "[{}] CPUs not found in idle power data: {}",
                search,
                self.missing_idle_power.iter().cloned().collect::<Vec<_>>().join(", ")
            );
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct BenchmarkMatch {
    pub performance: Option<u32>,
    pub idle_watts: Option<f64>,
}

pub struct BenchmarkMatcher<'a> {
    store: &'a ReferenceDataStore,
}

impl<'a> BenchmarkMatcher<'a> {
    pub fn new(store: &'a ReferenceDataStore) -> Self {
        Self { store }
    }

    /// Looks the parsed CPU up in both maps. Misses are recorded in `diagnostics`.
    pub fn lookup(
        &self,
        spec: &ParsedSpecification,
        diagnostics: &mut LookupDiagnostics,
    ) -> BenchmarkMatch {
        if !is_lookup_eligible(spec) {
            debug!("Benchmark lookup skipped for '{}'", spec.cpu_model);
            return BenchmarkMatch::default();
        }

        let cpu = spec.cpu_model.as_str();
        let performance = find_in_map(cpu, self.store.passmark());
        if performance.is_none() {
            diagnostics.missing_passmark.insert(cpu.to_string());
        }
        let idle_watts = find_in_map(cpu, self.store.idle_power());
        if idle_watts.is_none() {
            diagnostics.missing_idle_power.insert(cpu.to_string());
        }

        BenchmarkMatch { performance, idle_watts }
    }
}

pub fn is_lookup_eligible(spec: &ParsedSpecification) -> bool {
    !spec.has_cpu_sentinel()
        && !spec.is_generic_intel_core_type
        && !GENERIC_TERMS.contains(&spec.cpu_model.as_str())
}

/// Exact key, then `INTEL <model>` for N-series, then the first key (in map
/// order) that precisely contains the model.
pub fn find_in_map<V: Copy>(cpu_model: &str, map: &BTreeMap<String, V>) -> Option<V> {
    if let Some(value) = map.get(cpu_model) {
        return Some(*value);
    }

    if cpu_model.starts_with('N') {
        if let Some(value) = map.get(&format!("INTEL {}", cpu_model)) {
            return Some(*value);
        }
    }

    map.iter()
        .find(|(key, _)| precise_substring_match(cpu_model, key))
        .map(|(key, value)| {
            debug!("Substring match: '{}' in '{}'", cpu_model, key);
            *value
        })
}
