//! # Synthetic Sensor Data Generator
//!
//! Produces randomized sensor readings shaped like the production feed:
//! short alphanumeric sensor ids, day-granular dates inside a configured
//! range, parameter values uniform within each parameter's nominal
//! range, and a small weighted share of Bad-status rows, some of which
//! carry extreme outlier values.
//!
//! Seedable so tests (and reproducible benchmarks) get stable output.

use chrono::{Duration, NaiveDate};
use configuration::GeneratorSettings;
use core_types::{ParameterRange, Record, Status};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const ID_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const ID_LEN: usize = 7;

/// Generates synthetic `Record`s from configured parameter ranges.
#[derive(Debug)]
pub struct Generator {
    rng: StdRng,
    settings: GeneratorSettings,
    parameters: Vec<(String, ParameterRange)>,
}

impl Generator {
    /// A generator with OS-sourced randomness.
    pub fn new(settings: GeneratorSettings, parameters: Vec<(String, ParameterRange)>) -> Self {
        Self::from_rng(StdRng::from_entropy(), settings, parameters)
    }

    /// A deterministic generator for tests and reproducible runs.
    pub fn with_seed(
        seed: u64,
        settings: GeneratorSettings,
        parameters: Vec<(String, ParameterRange)>,
    ) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed), settings, parameters)
    }

    fn from_rng(
        rng: StdRng,
        settings: GeneratorSettings,
        parameters: Vec<(String, ParameterRange)>,
    ) -> Self {
        Generator {
            rng,
            settings,
            parameters,
        }
    }

    /// Generates `rows` records.
    pub fn generate(&mut self, rows: usize) -> Vec<Record> {
        let records: Vec<Record> = (0..rows).map(|_| self.generate_record()).collect();
        tracing::info!(rows = records.len(), "generated synthetic records");
        records
    }

    /// Generates a single record.
    pub fn generate_record(&mut self) -> Record {
        let status = if self.rng.gen_bool(self.settings.bad_ratio) {
            Status::Bad
        } else {
            Status::Good
        };
        let (parameter, range) = self
            .parameters
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_else(|| ("Unknown".to_string(), ParameterRange { min: 0.0, max: 1.0 }));
        let location = self
            .settings
            .locations
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_default();

        Record {
            id: self.random_id(),
            date: self.random_date(),
            location,
            value: self.random_value(range, status),
            parameter,
            status,
        }
    }

    fn random_id(&mut self) -> String {
        (0..ID_LEN)
            .map(|_| ID_CHARS[self.rng.gen_range(0..ID_CHARS.len())] as char)
            .collect()
    }

    fn random_date(&mut self) -> NaiveDate {
        let span = (self.settings.end_date - self.settings.start_date).num_days();
        self.settings.start_date + Duration::days(self.rng.gen_range(0..=span))
    }

    /// Uniform within the nominal range; Bad rows occasionally get an
    /// extreme outlier (tripled, possibly sign-flipped). Rounded to two
    /// decimals like the source feed.
    fn random_value(&mut self, range: ParameterRange, status: Status) -> f64 {
        let mut value = self.rng.gen_range(range.min..=range.max);
        if status == Status::Bad && self.rng.gen_bool(self.settings.outlier_ratio) {
            let factor = [-3.0, 3.0]
                .choose(&mut self.rng)
                .copied()
                .unwrap_or(3.0);
            value *= factor;
        }
        (value * 100.0).round() / 100.0
    }
}
