//! Unit-system resolution and conversion
//!
//! A measurement record always carries its values in the instrument's
//! native metric scale. One [`UnitConverter`] is resolved per conversion
//! from the record's settings (or an explicit host override) and applied to
//! every derived quantity, so no produced value ever mixes systems.
//!
//! All conversions are pure functions of their input: deterministic, no
//! side effects, and never failing. Metric targets are the identity.

use crate::app::models::domain::UnitSystem;
use crate::app::models::source::DataFile;
use crate::config::{ConverterConfig, UnitPreference};
use crate::constants::METERS_PER_FOOT;

/// Physical quantity groups with a resolvable unit identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitGroup {
    Distance,
    Area,
    Velocity,
    Discharge,
    Temperature,
}

/// Unit identifiers per group, keyed by (group, metric id, imperial id)
const UNIT_GROUP_IDS: &[(UnitGroup, &str, &str)] = &[
    (UnitGroup::Distance, "m", "ft"),
    (UnitGroup::Area, "m^2", "ft^2"),
    (UnitGroup::Velocity, "m/s", "ft/s"),
    (UnitGroup::Discharge, "m^3/s", "ft^3/s"),
    (UnitGroup::Temperature, "degC", "degF"),
];

/// Converter from the record's native metric scale to the target system
#[derive(Debug, Clone, Copy)]
pub struct UnitConverter {
    is_imperial: bool,
}

impl UnitConverter {
    /// Resolve the converter for a record, honoring a configured override
    ///
    /// Without an override, the record's own units preference decides;
    /// absent or unparseable preferences resolve to metric.
    pub fn resolve(data_file: &DataFile, config: &ConverterConfig) -> Self {
        match config.unit_preference {
            Some(UnitPreference::Imperial) => Self::from_imperial_flag(true),
            Some(UnitPreference::Metric) => Self::from_imperial_flag(false),
            None => Self::from_imperial_flag(!data_file.handheld_info.is_metric()),
        }
    }

    /// Degraded legacy mode: the host supplies the system as a flag
    pub fn from_imperial_flag(is_imperial: bool) -> Self {
        Self { is_imperial }
    }

    pub fn is_imperial(&self) -> bool {
        self.is_imperial
    }

    /// Unit identifier for a quantity group in the resolved system
    pub fn unit_id(&self, group: UnitGroup) -> &'static str {
        let (_, metric_id, imperial_id) = UNIT_GROUP_IDS
            .iter()
            .find(|(g, _, _)| *g == group)
            .expect("every unit group has a table entry");

        if self.is_imperial { imperial_id } else { metric_id }
    }

    /// The full unit system for this conversion
    pub fn unit_system(&self) -> UnitSystem {
        UnitSystem {
            distance_unit_id: self.unit_id(UnitGroup::Distance),
            area_unit_id: self.unit_id(UnitGroup::Area),
            velocity_unit_id: self.unit_id(UnitGroup::Velocity),
            discharge_unit_id: self.unit_id(UnitGroup::Discharge),
            temperature_unit_id: self.unit_id(UnitGroup::Temperature),
        }
    }

    /// Convert a native distance in meters
    pub fn distance(&self, meters: f64) -> f64 {
        if self.is_imperial {
            meters / METERS_PER_FOOT
        } else {
            meters
        }
    }

    /// Convert a native area in square meters
    pub fn area(&self, square_meters: f64) -> f64 {
        if self.is_imperial {
            square_meters / (METERS_PER_FOOT * METERS_PER_FOOT)
        } else {
            square_meters
        }
    }

    /// Convert a native velocity in meters per second
    pub fn velocity(&self, meters_per_second: f64) -> f64 {
        self.distance(meters_per_second)
    }

    /// Convert a native discharge in cubic meters per second
    pub fn discharge(&self, cubic_meters_per_second: f64) -> f64 {
        if self.is_imperial {
            cubic_meters_per_second / (METERS_PER_FOOT * METERS_PER_FOOT * METERS_PER_FOOT)
        } else {
            cubic_meters_per_second
        }
    }

    /// Convert a native temperature in degrees Celsius
    pub fn temperature(&self, celsius: f64) -> f64 {
        if self.is_imperial {
            celsius * 9.0 / 5.0 + 32.0
        } else {
            celsius
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_metric_conversions_are_identity() {
        let converter = UnitConverter::from_imperial_flag(false);

        assert_eq!(converter.distance(1.5), 1.5);
        assert_eq!(converter.area(2.5), 2.5);
        assert_eq!(converter.velocity(0.75), 0.75);
        assert_eq!(converter.discharge(12.0), 12.0);
        assert_eq!(converter.temperature(8.5), 8.5);
    }

    #[test]
    fn test_imperial_conversions() {
        let converter = UnitConverter::from_imperial_flag(true);

        assert_close(converter.distance(0.3048), 1.0);
        assert_close(converter.area(1.0), 10.763910416709722);
        assert_close(converter.velocity(1.0), 3.280839895013123);
        assert_close(converter.discharge(1.0), 35.31466672148859);
        assert_close(converter.temperature(100.0), 212.0);
        assert_close(converter.temperature(0.0), 32.0);
    }

    #[test]
    fn test_conversions_round_trip() {
        // Converting to imperial and back recovers the original value
        let converter = UnitConverter::from_imperial_flag(true);

        for value in [0.0, 0.001, 1.234, 987.6] {
            assert_close(converter.distance(value) * METERS_PER_FOOT, value);
            assert_close(
                converter.area(value) * METERS_PER_FOOT * METERS_PER_FOOT,
                value,
            );
            assert_close(
                converter.discharge(value) * METERS_PER_FOOT * METERS_PER_FOOT * METERS_PER_FOOT,
                value,
            );
            assert_close((converter.temperature(value) - 32.0) * 5.0 / 9.0, value);
        }
    }

    #[test]
    fn test_unit_ids_per_system() {
        let metric = UnitConverter::from_imperial_flag(false);
        let imperial = UnitConverter::from_imperial_flag(true);

        assert_eq!(metric.unit_id(UnitGroup::Distance), "m");
        assert_eq!(metric.unit_id(UnitGroup::Discharge), "m^3/s");
        assert_eq!(imperial.unit_id(UnitGroup::Distance), "ft");
        assert_eq!(imperial.unit_id(UnitGroup::Discharge), "ft^3/s");
        assert_eq!(imperial.unit_id(UnitGroup::Temperature), "degF");
    }

    #[test]
    fn test_unit_system_is_internally_consistent() {
        let system = UnitConverter::from_imperial_flag(true).unit_system();

        assert_eq!(system.distance_unit_id, "ft");
        assert_eq!(system.area_unit_id, "ft^2");
        assert_eq!(system.velocity_unit_id, "ft/s");
        assert_eq!(system.discharge_unit_id, "ft^3/s");
        assert_eq!(system.temperature_unit_id, "degF");
    }
}
