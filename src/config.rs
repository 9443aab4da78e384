//! Converter configuration
//!
//! The engine never reads ambient state: the unit-system override and the
//! ISO uncertainty scalar both arrive through an explicit [`ConverterConfig`]
//! built per conversion, either from CLI flags or from a host-supplied
//! plugin configuration map.

use crate::constants::{DEFAULT_ISO_UNCERTAINTY_SCALAR, ISO_UNCERTAINTY_SCALAR_KEY};
use std::collections::HashMap;
use tracing::debug;

/// Explicit unit-system preference, overriding the record's own setting
///
/// Used in the degraded legacy mode where the host selects the unit system
/// with a boolean flag instead of relying on the instrument settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitPreference {
    Metric,
    Imperial,
}

/// Per-conversion configuration for the normalization engine
#[derive(Debug, Clone)]
pub struct ConverterConfig {
    /// Scalar applied to the record's ISO overall uncertainty percentage
    pub iso_uncertainty_scalar: f64,

    /// Unit-system override; `None` resolves from the record's settings
    pub unit_preference: Option<UnitPreference>,

    /// When set, conversion fails unless the first and last stations are
    /// two different physical bank edges (LeftBank/RightBank)
    pub require_bank_edges: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            iso_uncertainty_scalar: DEFAULT_ISO_UNCERTAINTY_SCALAR,
            unit_preference: None,
            require_bank_edges: false,
        }
    }
}

impl ConverterConfig {
    /// Build a configuration from a host-supplied plugin configuration map
    ///
    /// Recognizes the `IsoUncertaintyScalar` key, a decimal string. An
    /// absent or unparseable value falls back to 1.0 rather than failing;
    /// the host map is advisory, never load-bearing.
    pub fn from_plugin_map(configurations: &HashMap<String, String>) -> Self {
        let iso_uncertainty_scalar = configurations
            .get(ISO_UNCERTAINTY_SCALAR_KEY)
            .and_then(|text| text.trim().parse::<f64>().ok())
            .unwrap_or(DEFAULT_ISO_UNCERTAINTY_SCALAR);

        if iso_uncertainty_scalar != DEFAULT_ISO_UNCERTAINTY_SCALAR {
            debug!(
                "Using configured {} = {}",
                ISO_UNCERTAINTY_SCALAR_KEY, iso_uncertainty_scalar
            );
        }

        Self {
            iso_uncertainty_scalar,
            ..Self::default()
        }
    }

    /// Set the unit-system override
    pub fn with_unit_preference(mut self, preference: Option<UnitPreference>) -> Self {
        self.unit_preference = preference;
        self
    }

    /// Set the strict bank-edge topology requirement
    pub fn with_require_bank_edges(mut self, require: bool) -> Self {
        self.require_bank_edges = require;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plugin_map(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_config() {
        let config = ConverterConfig::default();
        assert_eq!(config.iso_uncertainty_scalar, 1.0);
        assert_eq!(config.unit_preference, None);
        assert!(!config.require_bank_edges);
    }

    #[test]
    fn test_scalar_parsed_from_plugin_map() {
        let config = ConverterConfig::from_plugin_map(&plugin_map(&[(
            "IsoUncertaintyScalar",
            "2.5",
        )]));
        assert_eq!(config.iso_uncertainty_scalar, 2.5);
    }

    #[test]
    fn test_missing_scalar_falls_back_to_one() {
        let config = ConverterConfig::from_plugin_map(&plugin_map(&[]));
        assert_eq!(config.iso_uncertainty_scalar, 1.0);
    }

    #[test]
    fn test_unparseable_scalar_falls_back_to_one() {
        let config =
            ConverterConfig::from_plugin_map(&plugin_map(&[("IsoUncertaintyScalar", "wide")]));
        assert_eq!(config.iso_uncertainty_scalar, 1.0);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ConverterConfig::default()
            .with_unit_preference(Some(UnitPreference::Imperial))
            .with_require_bank_edges(true);

        assert_eq!(config.unit_preference, Some(UnitPreference::Imperial));
        assert!(config.require_bank_edges);
    }
}
