use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Nominal numeric range for one parameter.
///
/// Ranges are advisory: Bad-status readings legitimately stray outside
/// them, so ingestion warns on violations rather than rejecting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
}

impl ParameterRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// The closed set of valid `parameter` values for a dataset, supplied by
/// configuration so the engine can be reused across domains.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterDomain {
    parameters: BTreeMap<String, Option<ParameterRange>>,
}

impl ParameterDomain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, range: Option<ParameterRange>) {
        self.parameters.insert(name.into(), range);
    }

    pub fn with_parameter(mut self, name: impl Into<String>, range: Option<ParameterRange>) -> Self {
        self.insert(name, range);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    pub fn range(&self, name: &str) -> Option<ParameterRange> {
        self.parameters.get(name).copied().flatten()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parameters.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

/// How ingestion treats parameters outside the declared domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainPolicy {
    /// Reject records whose parameter is not in the domain.
    #[default]
    Strict,
    /// Accept them unchanged.
    Permissive,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_lookup() {
        let domain = ParameterDomain::new()
            .with_parameter("Temperature", Some(ParameterRange { min: -20.0, max: 120.0 }))
            .with_parameter("Noise", None);

        assert!(domain.contains("Temperature"));
        assert!(domain.contains("Noise"));
        assert!(!domain.contains("Pressure"));
        assert_eq!(
            domain.range("Temperature"),
            Some(ParameterRange { min: -20.0, max: 120.0 })
        );
        assert_eq!(domain.range("Noise"), None);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let range = ParameterRange { min: 0.0, max: 10.0 };
        assert!(range.contains(0.0));
        assert!(range.contains(10.0));
        assert!(!range.contains(10.001));
    }
}
