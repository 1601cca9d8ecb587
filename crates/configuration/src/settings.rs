use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use core_types::{DomainPolicy, ParameterDomain, ParameterRange};
use serde::Deserialize;

use crate::error::ConfigError;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub domain: DomainSettings,
    pub generator: GeneratorSettings,
    pub weather: WeatherSettings,
    pub output: OutputSettings,
}

impl Config {
    /// Checks cross-field consistency that serde alone cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.domain.parameters.is_empty() {
            return Err(ConfigError::ValidationError(
                "domain.parameters must declare at least one parameter".to_string(),
            ));
        }
        for (name, range) in &self.domain.parameters {
            if range.min > range.max {
                return Err(ConfigError::ValidationError(format!(
                    "domain.parameters.{name}: min {} exceeds max {}",
                    range.min, range.max
                )));
            }
        }
        if self.generator.start_date > self.generator.end_date {
            return Err(ConfigError::ValidationError(format!(
                "generator.start_date {} is after end_date {}",
                self.generator.start_date, self.generator.end_date
            )));
        }
        for (field, ratio) in [
            ("generator.bad_ratio", self.generator.bad_ratio),
            ("generator.outlier_ratio", self.generator.outlier_ratio),
        ] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(ConfigError::ValidationError(format!(
                    "{field} must lie in [0, 1], got {ratio}"
                )));
            }
        }
        if self.generator.locations.is_empty() {
            return Err(ConfigError::ValidationError(
                "generator.locations must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// The closed parameter set (and nominal ranges) for the dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct DomainSettings {
    /// Whether readings outside the declared parameter set are rejected.
    #[serde(default)]
    pub policy: DomainPolicy,
    pub parameters: BTreeMap<String, ParameterRange>,
}

impl DomainSettings {
    /// Bridges the settings into the engine-facing domain type.
    pub fn to_domain(&self) -> ParameterDomain {
        let mut domain = ParameterDomain::new();
        for (name, range) in &self.parameters {
            domain.insert(name.clone(), Some(*range));
        }
        domain
    }
}

/// Contains parameters for synthetic sensor data generation.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorSettings {
    /// Number of rows to generate when the CLI does not override it.
    pub rows: usize,
    pub locations: Vec<String>,
    /// First day of the generated date range (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the generated date range (inclusive).
    pub end_date: NaiveDate,
    /// Fraction of rows generated with Bad status.
    pub bad_ratio: f64,
    /// Fraction of Bad rows that receive an extreme outlier value.
    pub outlier_ratio: f64,
}

/// Contains parameters for the weather API polling client.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherSettings {
    pub base_url: String,
    pub cities: Vec<String>,
    /// How many times to poll the full city list.
    pub poll_rounds: u32,
    /// Pause between polling rounds, in seconds.
    pub poll_interval_secs: u64,
}

/// Output locations for raw and processed data.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    pub raw_dir: PathBuf,
    pub processed_dir: PathBuf,
}
