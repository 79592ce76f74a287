// Raw listing -> EnrichedListing (cost fields are filled by a separate pass)
use crate::matcher::{BenchmarkMatcher, LookupDiagnostics};
use crate::model::{EnrichedListing, RawListing};
use crate::parser::{cpu_type, TitleParser};
use crate::reference::ReferenceDataStore;
use std::collections::HashSet;
use tracing::debug;

pub struct EnrichmentPipeline<'a> {
    parser: TitleParser,
    matcher: BenchmarkMatcher<'a>,
}

impl<'a> EnrichmentPipeline<'a> {
    pub fn new(store: &'a ReferenceDataStore) -> Self {
        Self {
            parser: TitleParser::new(),
            matcher: BenchmarkMatcher::new(store),
        }
    }

    pub fn enrich(&self, raw: &RawListing, diagnostics: &mut LookupDiagnostics) -> EnrichedListing {
        let spec = self.parser.parse(&raw.title);
        let benchmarks = self.matcher.lookup(&spec, diagnostics);

        EnrichedListing {
            title: raw.title.clone(),
            price: parse_price(raw),
            currency: raw.price.as_ref().and_then(|p| p.currency.clone()),
            cpu_type: cpu_type(&spec),
            cpu_model: spec.cpu_model,
            generic_intel_core_type: spec.generic_intel_core_type,
            is_generic_intel_core_type: spec.is_generic_intel_core_type,
            ram: spec.ram,
            storage: spec.storage,
            performance: benchmarks.performance,
            cpu_idle_power: benchmarks.idle_watts,
            free_shipping: has_free_shipping(raw),
            tco: None,
            performance_per_dollar: None,
            item_url: raw.item_web_url.clone(),
            image_url: raw.image.as_ref().and_then(|i| i.image_url.clone()),
            item_id: raw.item_id.clone(),
        }
    }

    /// Enriches a batch, keeping only the first listing seen for each item id.
    pub fn enrich_all<'r, I>(&self, raws: I, diagnostics: &mut LookupDiagnostics) -> Vec<EnrichedListing>
    where
        I: IntoIterator<Item = &'r RawListing>,
    {
        let mut seen_ids = HashSet::new();
        let mut enriched = Vec::new();
        for raw in raws {
            if let Some(id) = &raw.item_id {
                if !seen_ids.insert(id.clone()) {
                    debug!("Skipping duplicate item ID: {}", id);
                    continue;
                }
            }
            enriched.push(self.enrich(raw, diagnostics));
        }
        enriched
    }
}

fn parse_price(raw: &RawListing) -> Option<f64> {
    let value = raw.price.as_ref()?.value.as_deref()?;
    match value.trim().parse::<f64>() {
        Ok(price) if price.is_finite() => Some(price),
        _ => {
            debug!("Could not parse price '{}'", value);
            None
        }
    }
}

fn has_free_shipping(raw: &RawListing) -> bool {
    raw.shipping_options
        .iter()
        .flatten()
        .any(|opt| opt.free_shipping.as_ref().is_some_and(|f| f.is_set()))
}
