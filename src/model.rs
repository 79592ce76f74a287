// Core structs: RawListing, ParsedSpecification, EnrichedListing
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel for a field the parser could not determine.
pub const NOT_DETECTED: &str = "N/A";
/// Sentinel for a listing that explicitly ships without a CPU.
pub const NO_CPU: &str = "None";

/// A listing as delivered by the marketplace search client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawListing {
    #[serde(default)]
    pub title: String,
    pub price: Option<RawPrice>,
    pub shipping_options: Option<Vec<ShippingOption>>,
    pub item_id: Option<String>,
    pub item_web_url: Option<String>,
    pub image: Option<RawImage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPrice {
    pub value: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingOption {
    pub free_shipping: Option<FlagValue>,
}

/// The marketplace sends this flag either as a JSON boolean or as a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Text(String),
}

impl FlagValue {
    pub fn is_set(&self) -> bool {
        match self {
            FlagValue::Bool(b) => *b,
            FlagValue::Text(s) => s == "true" || s == "True",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawImage {
    pub image_url: Option<String>,
}

/// Hardware attributes pulled out of a listing title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSpecification {
    /// Upper-cased model token, or one of [`NOT_DETECTED`] / [`NO_CPU`]. Never empty.
    pub cpu_model: String,
    pub generic_intel_core_type: Option<String>,
    pub is_generic_intel_core_type: bool,
    pub ram: String,
    pub storage: String,
}

impl ParsedSpecification {
    pub fn has_cpu_sentinel(&self) -> bool {
        self.cpu_model == NOT_DETECTED || self.cpu_model == NO_CPU
    }
}

/// A listing after parsing, benchmark lookup and (optionally) the cost pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedListing {
    pub title: String,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub cpu_type: String,
    pub cpu_model: String,
    pub generic_intel_core_type: Option<String>,
    pub is_generic_intel_core_type: bool,
    pub ram: String,
    pub storage: String,
    pub performance: Option<u32>,
    pub cpu_idle_power: Option<f64>,
    pub free_shipping: bool,
    pub tco: Option<f64>,
    pub performance_per_dollar: Option<f64>,
    pub item_url: Option<String>,
    pub image_url: Option<String>,
    pub item_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub term: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("listing source I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("listing source returned malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("no reference data available (passmark: {passmark}, idle power: {idle_power})")]
    NoReferenceData { passmark: String, idle_power: String },
}
