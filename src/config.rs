use crate::model::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub name: String,
    /// Comma-separated search terms; each term is fetched on its own.
    pub keywords: String,
}

impl SearchConfig {
    pub fn terms(&self) -> Vec<String> {
        self.keywords
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Inputs to the total-cost-of-ownership model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostAssumptions {
    pub kwh_cost: f64,
    pub lifespan_years: i32,
    pub shipping_cost_t_cpu: f64,
    pub shipping_cost_non_t_cpu: f64,
    pub required_ram_gb: u32,
    pub ram_upgrade_flat_cost: f64,
    pub required_storage_gb: u32,
    pub storage_upgrade_flat_cost: f64,
}

impl Default for CostAssumptions {
    fn default() -> Self {
        Self {
            kwh_cost: 0.14,
            lifespan_years: 5,
            shipping_cost_t_cpu: 10.0,
            shipping_cost_non_t_cpu: 35.0,
            required_ram_gb: 16,
            ram_upgrade_flat_cost: 30.0,
            required_storage_gb: 128,
            storage_upgrade_flat_cost: 15.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub perf_per_dollar_min: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_passmark_path")]
    pub passmark_path: PathBuf,
    #[serde(default = "default_idle_power_path")]
    pub idle_power_path: PathBuf,
    #[serde(default = "default_listings_dir")]
    pub listings_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    pub searches: Vec<SearchConfig>,
    #[serde(default)]
    pub tco_assumptions: CostAssumptions,
    #[serde(default)]
    pub alerts: AlertConfig,
}

fn default_passmark_path() -> PathBuf {
    PathBuf::from("passmark.txt")
}

fn default_idle_power_path() -> PathBuf {
    PathBuf::from("idlepower.txt")
}

fn default_listings_dir() -> PathBuf {
    PathBuf::from("listings")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.searches.is_empty() {
            return Err(ConfigError::Invalid("no searches configured".into()));
        }
        for search in &self.searches {
            if search.name.trim().is_empty() {
                return Err(ConfigError::Invalid("search with empty name".into()));
            }
            if search.terms().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "search '{}' has no keywords",
                    search.name
                )));
            }
        }

        let tco = &self.tco_assumptions;
        let costs = [
            ("kwh_cost", tco.kwh_cost),
            ("shipping_cost_t_cpu", tco.shipping_cost_t_cpu),
            ("shipping_cost_non_t_cpu", tco.shipping_cost_non_t_cpu),
            ("ram_upgrade_flat_cost", tco.ram_upgrade_flat_cost),
            ("storage_upgrade_flat_cost", tco.storage_upgrade_flat_cost),
        ];
        if let Some((name, value)) = costs.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(ConfigError::Invalid(format!(
                "tco_assumptions.{} must be a non-negative number, got {}",
                name, value
            )));
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let file = write_config(r#"{"searches": [{"name": "tiny", "keywords": "lenovo tiny"}]}"#);
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.passmark_path, PathBuf::from("passmark.txt"));
        assert_eq!(config.idle_power_path, PathBuf::from("idlepower.txt"));
        assert_eq!(config.tco_assumptions, CostAssumptions::default());
        assert_eq!(config.alerts.perf_per_dollar_min, 0.0);
    }

    #[test]
    fn partial_assumptions_keep_other_defaults() {
        let file = write_config(
            r#"{
                "searches": [{"name": "tiny", "keywords": "lenovo tiny"}],
                "tco_assumptions": {"kwh_cost": 0.30, "lifespan_years": 3},
                "alerts": {"perf_per_dollar_min": 25.5}
            }"#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.tco_assumptions.kwh_cost, 0.30);
        assert_eq!(config.tco_assumptions.lifespan_years, 3);
        assert_eq!(config.tco_assumptions.required_ram_gb, 16);
        assert_eq!(config.tco_assumptions.storage_upgrade_flat_cost, 15.0);
        assert_eq!(config.alerts.perf_per_dollar_min, 25.5);
    }

    #[test]
    fn search_terms_are_split_and_trimmed() {
        let search = SearchConfig {
            name: "micro".into(),
            keywords: " optiplex micro, ,elitedesk mini ,".into(),
        };
        assert_eq!(search.terms(), vec!["optiplex micro", "elitedesk mini"]);
    }

    #[test]
    fn rejects_empty_searches_and_negative_costs() {
        let empty = write_config(r#"{"searches": []}"#);
        assert!(matches!(load_config(empty.path()), Err(ConfigError::Invalid(_))));

        let blank = write_config(r#"{"searches": [{"name": "x", "keywords": " , "}]}"#);
        assert!(matches!(load_config(blank.path()), Err(ConfigError::Invalid(_))));

        let negative = write_config(
            r#"{"searches": [{"name": "x", "keywords": "y"}],
                "tco_assumptions": {"kwh_cost": -0.1}}"#,
        );
        assert!(matches!(load_config(negative.path()), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_file_and_bad_json_are_reported() {
        assert!(matches!(
            load_config(Path::new("/nonexistent/config.json")),
            Err(ConfigError::Io(_))
        ));
        let bad = write_config("{ not json");
        assert!(matches!(load_config(bad.path()), Err(ConfigError::Json(_))));
    }
}
