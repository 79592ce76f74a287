use crate::config::CostAssumptions;
use crate::model::EnrichedListing;
use crate::utils::capacity_to_gb;
use tracing::debug;

const HOURS_PER_YEAR: f64 = 24.0 * 365.0;

/// Per-component cost of owning one listing over its assumed lifespan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostBreakdown {
    pub price: f64,
    pub energy_cost: f64,
    pub shipping_cost: f64,
    pub ram_gap_cost: f64,
    pub storage_gap_cost: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.price + self.energy_cost + self.shipping_cost + self.ram_gap_cost + self.storage_gap_cost
    }
}

/// Trait defining the interface for a listing cost model.
pub trait CostModel {
    fn breakdown(&self, listing: &EnrichedListing) -> Option<CostBreakdown>;

    /// Returns `(tco, performance_per_dollar)`; both absent when price or idle power is unknown.
    fn evaluate(&self, listing: &EnrichedListing) -> (Option<f64>, Option<f64>) {
        let Some(breakdown) = self.breakdown(listing) else {
            return (None, None);
        };
        let tco = breakdown.total();
        (Some(tco), performance_per_dollar(listing.performance, tco))
    }
}

/// The linear TCO model: price + idle energy + shipping + flat upgrade costs.
pub struct TcoModel<'a> {
    assumptions: &'a CostAssumptions,
}

impl<'a> TcoModel<'a> {
    pub fn new(assumptions: &'a CostAssumptions) -> Self {
        Self { assumptions }
    }
}

impl CostModel for TcoModel<'_> {
    fn breakdown(&self, listing: &EnrichedListing) -> Option<CostBreakdown> {
        let price = listing.price?;
        let idle_watts = listing.cpu_idle_power?;
        let a = self.assumptions;

        let lifespan = f64::from(a.lifespan_years.max(1));
        let energy_cost = (idle_watts / 1000.0) * HOURS_PER_YEAR * lifespan * a.kwh_cost;

        let shipping_cost = if listing.free_shipping {
            0.0
        } else if listing.cpu_model.ends_with('T') {
            a.shipping_cost_t_cpu
        } else {
            a.shipping_cost_non_t_cpu
        };

        let ram_gap_cost = if capacity_to_gb(&listing.ram) < a.required_ram_gb {
            a.ram_upgrade_flat_cost
        } else {
            0.0
        };
        let storage_gap_cost = if capacity_to_gb(&listing.storage) < a.required_storage_gb {
            a.storage_upgrade_flat_cost
        } else {
            0.0
        };

        let breakdown = CostBreakdown {
            price,
            energy_cost,
            shipping_cost,
            ram_gap_cost,
            storage_gap_cost,
        };
        debug!(
            "TCO {} ({}): price {:.2} + energy {:.2} ({}W x {}y) + shipping {:.2} + ram {:.2} + storage {:.2} = {:.2}",
            listing.cpu_model,
            listing.item_id.as_deref().unwrap_or("-"),
            price,
            energy_cost,
            idle_watts,
            lifespan,
            shipping_cost,
            ram_gap_cost,
            storage_gap_cost,
            breakdown.total()
        );
        Some(breakdown)
    }
}

pub fn performance_per_dollar(performance: Option<u32>, tco: f64) -> Option<f64> {
    let performance = performance?;
    (tco > 0.0).then(|| f64::from(performance) / tco)
}

/// Second pass over already enriched listings; safe to re-run with new assumptions.
pub fn apply_cost_model(listings: &mut [EnrichedListing], assumptions: &CostAssumptions) {
    let model = TcoModel::new(assumptions);
    for listing in listings.iter_mut() {
        let (tco, perf_per_dollar) = model.evaluate(listing);
        listing.tco = tco;
        listing.performance_per_dollar = perf_per_dollar;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn listing(price: f64, idle_watts: f64) -> EnrichedListing {
        EnrichedListing {
            title: "Lenovo M720q i5-8500T 16GB RAM 256GB SSD".into(),
            price: Some(price),
            currency: Some("USD".into()),
            cpu_type: "I5".into(),
            cpu_model: "I5-8500T".into(),
            generic_intel_core_type: Some("I5".into()),
            is_generic_intel_core_type: false,
            ram: "16GB".into(),
            storage: "256GB".into(),
            performance: Some(7650),
            cpu_idle_power: Some(idle_watts),
            free_shipping: true,
            tco: None,
            performance_per_dollar: None,
            item_url: None,
            image_url: None,
            item_id: Some("1".into()),
        }
    }

    fn tco(listing: &EnrichedListing, assumptions: &CostAssumptions) -> f64 {
        TcoModel::new(assumptions).evaluate(listing).0.unwrap()
    }

    #[test]
    fn end_to_end_reference_case() {
        let item = listing(150.0, 35.0);
        let breakdown = TcoModel::new(&CostAssumptions::default()).breakdown(&item).unwrap();
        assert!((breakdown.energy_cost - 214.62).abs() < 1e-9);
        assert_eq!(breakdown.shipping_cost, 0.0);
        assert_eq!(breakdown.ram_gap_cost, 0.0);
        assert_eq!(breakdown.storage_gap_cost, 0.0);
        assert!((breakdown.total() - 364.62).abs() < 1e-9);
    }

    #[test]
    fn shipping_depends_on_t_suffix() {
        let assumptions = CostAssumptions::default();
        let mut item = listing(100.0, 0.0);
        item.free_shipping = false;
        assert_eq!(tco(&item, &assumptions), 110.0);

        item.cpu_model = "I5-8500".into();
        assert_eq!(tco(&item, &assumptions), 135.0);
    }

    #[test]
    fn capacity_gaps_add_flat_costs() {
        let assumptions = CostAssumptions::default();
        let mut item = listing(100.0, 0.0);
        item.ram = "8GB".into();
        assert_eq!(tco(&item, &assumptions), 130.0);

        item.storage = "N/A".into();
        assert_eq!(tco(&item, &assumptions), 145.0);

        item.ram = "1TB".into();
        item.storage = "1TB".into();
        assert_eq!(tco(&item, &assumptions), 100.0);
    }

    #[test]
    fn non_positive_lifespan_counts_as_one_year() {
        let item = listing(0.0, 10.0);
        let one_year = tco(&item, &CostAssumptions { lifespan_years: 1, ..Default::default() });
        let zero = tco(&item, &CostAssumptions { lifespan_years: 0, ..Default::default() });
        let negative = tco(&item, &CostAssumptions { lifespan_years: -3, ..Default::default() });
        assert_eq!(one_year, zero);
        assert_eq!(one_year, negative);
    }

    #[test]
    fn unknown_price_or_power_leaves_both_outputs_unknown() {
        let model_assumptions = CostAssumptions::default();
        let model = TcoModel::new(&model_assumptions);

        let mut no_power = listing(100.0, 10.0);
        no_power.cpu_idle_power = None;
        assert_eq!(model.evaluate(&no_power), (None, None));

        let mut no_price = listing(100.0, 10.0);
        no_price.price = None;
        assert_eq!(model.evaluate(&no_price), (None, None));
    }

    #[test]
    fn perf_per_dollar_requires_performance_and_positive_tco() {
        assert_eq!(performance_per_dollar(None, 100.0), None);
        assert_eq!(performance_per_dollar(Some(5000), 0.0), None);
        assert_eq!(performance_per_dollar(Some(5000), -1.0), None);
        assert_eq!(performance_per_dollar(Some(5000), 250.0), Some(20.0));

        let assumptions = CostAssumptions::default();
        let mut item = listing(0.0, 0.0);
        assert_eq!(TcoModel::new(&assumptions).evaluate(&item), (Some(0.0), None));

        item.price = Some(100.0);
        item.performance = None;
        assert_eq!(TcoModel::new(&assumptions).evaluate(&item), (Some(100.0), None));
    }

    #[test]
    fn tco_is_monotonic_in_price_power_and_lifespan() {
        let mut rng = StdRng::seed_from_u64(0x7c0);
        for _ in 0..500 {
            let price = rng.random_range(0.0..1000.0);
            let watts = rng.random_range(0.0..120.0);
            let years = rng.random_range(1..10);
            let assumptions = CostAssumptions {
                kwh_cost: rng.random_range(0.0..0.6),
                lifespan_years: years,
                ..Default::default()
            };
            let longer = CostAssumptions { lifespan_years: years + 1, ..assumptions.clone() };

            let base = tco(&listing(price, watts), &assumptions);
            assert!(tco(&listing(price + rng.random_range(0.0..100.0), watts), &assumptions) >= base);
            assert!(tco(&listing(price, watts + rng.random_range(0.0..50.0)), &assumptions) >= base);
            assert!(tco(&listing(price, watts), &longer) >= base);
        }
    }

    #[test]
    fn cost_pass_is_idempotent_and_recomputable() {
        let mut listings = vec![listing(150.0, 35.0), listing(80.0, 6.0)];
        listings[1].cpu_idle_power = None;

        apply_cost_model(&mut listings, &CostAssumptions::default());
        let first = listings.clone();
        apply_cost_model(&mut listings, &CostAssumptions::default());
        assert_eq!(listings, first);
        assert!(listings[1].tco.is_none());

        let cheap_power = CostAssumptions { kwh_cost: 0.0, ..Default::default() };
        apply_cost_model(&mut listings, &cheap_power);
        assert_eq!(listings[0].tco, Some(150.0));
        assert_eq!(listings[0].performance_per_dollar, Some(7650.0 / 150.0));
    }
}
