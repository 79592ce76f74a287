// Analyzer module: cost of ownership and ranking of enriched listings.

pub mod cost_model;
pub mod ranking;

pub use cost_model::apply_cost_model;
pub use ranking::{calculate_stats, find_deals, rank_by_value, SearchStats};
