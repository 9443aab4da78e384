//! Source record model for parsed FlowTracker2 measurements
//!
//! These structures mirror the object graph produced by the external archive
//! decoder, in the instrument's native metric units. The graph is read-only
//! input for one conversion: nothing in the engine mutates it.
//!
//! Numeric fields the instrument records as "not available" arrive as absent
//! JSON members and are modeled as `Option<f64>`; consumers decide per field
//! whether absence back-fills, drops the entry, or sanitizes to zero.

use crate::constants::{METRIC_UNITS_SETTING, UNITS_SETTING_KEY, UTC_OFFSET_SETTING_KEY};
use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Record Root
// =============================================================================

/// One decoded FlowTracker2 measurement record
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataFile {
    pub properties: Properties,
    pub configuration: Configuration,
    pub handheld_info: HandheldInfo,
    pub calculations: MeasurementCalculations,
    pub stations: Vec<Station>,
    #[serde(default)]
    pub supplemental_data: Vec<SupplementalReading>,
}

/// Operator-entered visit properties
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Properties {
    /// Site identifier used to resolve the target location, may be empty
    #[serde(default)]
    pub site_number: String,

    #[serde(default)]
    pub operator: String,

    #[serde(default)]
    pub comment: String,

    /// Calculations engine name, reported as the sensor type
    #[serde(default)]
    pub calculations_engine: String,

    /// Explicit visit window; absent on older firmware, which leaves the
    /// window to be derived from station creation times
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,

    /// Single gauge-height value written by firmware predating the
    /// supplemental-data series
    #[serde(default)]
    pub gauge_height: Option<f64>,
}

/// Measurement configuration selected on the handheld
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Configuration {
    pub discharge: DischargeConfiguration,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DischargeConfiguration {
    /// Raw discharge-equation selector; only `MidSection` and `MeanSection`
    /// are convertible
    pub discharge_equation: String,
}

/// Handheld identity and operator settings
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HandheldInfo {
    #[serde(default)]
    pub serial_number: String,

    #[serde(default)]
    pub cpu_serial_number: String,

    #[serde(default)]
    pub software_version: String,

    #[serde(default)]
    pub settings: Option<Settings>,
}

impl HandheldInfo {
    /// Local-time offset from UTC configured on the handheld, default zero
    pub fn utc_offset(&self) -> FixedOffset {
        self.settings
            .as_ref()
            .and_then(|settings| settings.get_time_span(UTC_OFFSET_SETTING_KEY))
            .and_then(|offset| FixedOffset::east_opt(offset.num_seconds() as i32))
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap())
    }

    /// Whether the operator selected metric units (the default when the
    /// preference is absent or unparseable; comparison is case-insensitive)
    pub fn is_metric(&self) -> bool {
        self.settings
            .as_ref()
            .and_then(|settings| settings.get_string(UNITS_SETTING_KEY))
            .map(|units| units.eq_ignore_ascii_case(METRIC_UNITS_SETTING))
            .unwrap_or(true)
    }
}

/// String-keyed handheld settings map with typed accessors
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Settings(pub HashMap<String, String>);

impl Settings {
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Parse a `[-][d.]HH:MM[:SS]` time-span setting
    pub fn get_time_span(&self, key: &str) -> Option<Duration> {
        parse_time_span(self.get_string(key)?)
    }
}

fn parse_time_span(text: &str) -> Option<Duration> {
    let text = text.trim();
    let (negative, text) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let (days, clock) = match text.split_once('.') {
        Some((days, clock)) => (days.parse::<i64>().ok()?, clock),
        None => (0, text),
    };

    let parts: Vec<&str> = clock.split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }

    let hours = parts[0].parse::<i64>().ok()?;
    let minutes = parts[1].parse::<i64>().ok()?;
    let seconds = if parts.len() == 3 {
        parts[2].parse::<i64>().ok()?
    } else {
        0
    };

    let total = ((days * 24 + hours) * 60 + minutes) * 60 + seconds;
    Some(Duration::seconds(if negative { -total } else { total }))
}

// =============================================================================
// Measurement Totals
// =============================================================================

/// Firmware-computed totals for the whole measurement
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MeasurementCalculations {
    pub discharge: f64,
    pub area: f64,
    pub width: f64,
    pub depth: f64,
    pub velocity: Vector3,

    /// Mean water temperature over the measurement, degrees Celsius
    #[serde(default)]
    pub temperature: f64,

    pub uncertainty_iso: UncertaintyBreakdown,
    pub uncertainty_statistical: UncertaintyBreakdown,
}

/// One uncertainty estimate decomposed into its contributing components
///
/// All components are fractions (0.05 = 5%). The ISO method carries the
/// method and station-count components; the statistical method does not.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UncertaintyBreakdown {
    pub overall: f64,
    pub accuracy: f64,
    pub depth: f64,
    pub velocity: f64,
    pub width: f64,

    #[serde(default)]
    pub method: Option<f64>,

    #[serde(default)]
    pub number_of_stations: Option<f64>,
}

/// Three-component velocity vector; the streamwise X component drives every
/// derived quantity
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Vector3 {
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

// =============================================================================
// Stations
// =============================================================================

/// Raw station-role tag recorded by the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum StationType {
    LeftBank,
    RightBank,
    IslandEdge,
    OpenWater,
    Ice,
}

impl StationType {
    /// Whether this tag marks a physical bank edge
    pub fn is_bank(self) -> bool {
        matches!(self, Self::LeftBank | Self::RightBank)
    }
}

/// Raw velocity-sampling method recorded per station
///
/// Methods the decoder knows but this converter does not map arrive as
/// `Other`; they resolve to the Unknown observation category downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum VelocityMethod {
    FiveTenths,
    SixTenths,
    TwoTenthsEightTenths,
    TwoTenthsSixTenthsEightTenths,
    FivePoint,
    SixPoint,
    #[serde(other)]
    Other,
}

/// One cross-section measurement location
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Station {
    pub station_type: StationType,

    /// Tagline position, meters from the start pin
    pub location: f64,

    pub creation_time: DateTime<Utc>,

    #[serde(default)]
    pub comment: String,

    #[serde(default)]
    pub ice_thickness: Option<f64>,

    #[serde(default)]
    pub water_surface_to_bottom_of_ice: Option<f64>,

    #[serde(default)]
    pub water_surface_to_bottom_of_slush: Option<f64>,

    pub velocity_method: VelocityMethod,

    /// Depth-correction factor applied by the firmware
    #[serde(default = "default_correction_factor")]
    pub correction_factor: f64,

    /// Depth used for velocity sampling, with submerged-instrument
    /// corrections already resolved by the firmware
    pub effective_depth: f64,

    /// Sounded channel depth at this station
    pub final_depth: f64,

    pub calculations: StationCalculations,

    #[serde(default)]
    pub point_measurements: Vec<PointMeasurement>,
}

fn default_correction_factor() -> f64 {
    1.0
}

/// Firmware-computed per-station totals
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StationCalculations {
    pub mean_velocity_in_vertical: Vector3,

    #[serde(default)]
    pub mean_panel_velocity: Vector3,

    pub area: f64,
    pub width: f64,
    pub discharge: f64,

    /// Station's share of total discharge as a fraction; absent on records
    /// where the firmware left the split to the importer
    #[serde(default)]
    pub fraction_of_total_discharge: Option<f64>,

    #[serde(default)]
    pub velocity_angle: Option<f64>,

    #[serde(default)]
    pub snr: Snr,

    #[serde(default)]
    pub velocity_standard_error: Vector3,

    #[serde(default)]
    pub temperature: Option<f64>,

    #[serde(default)]
    pub samples: u32,

    #[serde(default)]
    pub spikes: u32,
}

/// Acoustic signal-to-noise ratio per beam, decibels
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Snr {
    #[serde(default)]
    pub beam_1: Option<f64>,
}

// =============================================================================
// Point Measurements
// =============================================================================

/// One timed velocity sample within a station's vertical
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PointMeasurement {
    /// Sampling position as a fraction of effective depth, 0 at the surface
    pub fractional_depth: f64,

    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,

    pub velocity: Vector3,

    #[serde(default)]
    pub probe_info: Option<ProbeInfo>,

    /// Handheld software version at sample time
    #[serde(default)]
    pub software_version: Option<String>,
}

impl PointMeasurement {
    /// Elapsed sampling interval in seconds
    pub fn observation_interval(&self) -> f64 {
        (self.end_time - self.start_time).num_milliseconds() as f64 / 1000.0
    }
}

/// Probe identity captured with each point measurement
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProbeInfo {
    #[serde(default)]
    pub serial_number: Option<String>,

    #[serde(default)]
    pub firmware_version: Option<String>,
}

// =============================================================================
// Supplemental Data
// =============================================================================

/// Independent gauge-height reading taken during the measurement
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SupplementalReading {
    pub time: DateTime<Utc>,

    /// Water-surface elevation; entries without one are excluded from use
    #[serde(default)]
    pub gauge_height: Option<f64>,

    #[serde(default)]
    pub rated_discharge: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn create_test_settings(entries: &[(&str, &str)]) -> Settings {
        Settings(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_is_metric_defaults_to_true() {
        let info = HandheldInfo::default();
        assert!(info.is_metric());

        let info = HandheldInfo {
            settings: Some(create_test_settings(&[])),
            ..HandheldInfo::default()
        };
        assert!(info.is_metric());
    }

    #[test]
    fn test_is_metric_is_case_insensitive() {
        let info = HandheldInfo {
            settings: Some(create_test_settings(&[("Units", "METRIC")])),
            ..HandheldInfo::default()
        };
        assert!(info.is_metric());

        let info = HandheldInfo {
            settings: Some(create_test_settings(&[("Units", "English")])),
            ..HandheldInfo::default()
        };
        assert!(!info.is_metric());
    }

    #[test]
    fn test_time_span_parsing() {
        let settings = create_test_settings(&[
            ("Positive", "07:30:00"),
            ("Negative", "-05:00:00"),
            ("NoSeconds", "02:15"),
            ("WithDays", "1.01:00:00"),
            ("Junk", "tomorrow"),
        ]);

        assert_eq!(
            settings.get_time_span("Positive"),
            Some(Duration::seconds(7 * 3600 + 30 * 60))
        );
        assert_eq!(
            settings.get_time_span("Negative"),
            Some(Duration::seconds(-5 * 3600))
        );
        assert_eq!(
            settings.get_time_span("NoSeconds"),
            Some(Duration::seconds(2 * 3600 + 15 * 60))
        );
        assert_eq!(
            settings.get_time_span("WithDays"),
            Some(Duration::seconds(25 * 3600))
        );
        assert_eq!(settings.get_time_span("Junk"), None);
        assert_eq!(settings.get_time_span("Missing"), None);
    }

    #[test]
    fn test_utc_offset_defaults_to_zero() {
        let info = HandheldInfo::default();
        assert_eq!(info.utc_offset().local_minus_utc(), 0);

        let info = HandheldInfo {
            settings: Some(create_test_settings(&[(
                "LocalTimeOffsetFromUtc",
                "-07:00:00",
            )])),
            ..HandheldInfo::default()
        };
        assert_eq!(info.utc_offset().local_minus_utc(), -7 * 3600);
    }

    #[test]
    fn test_station_type_bank_classification() {
        assert!(StationType::LeftBank.is_bank());
        assert!(StationType::RightBank.is_bank());
        assert!(!StationType::IslandEdge.is_bank());
        assert!(!StationType::OpenWater.is_bank());
        assert!(!StationType::Ice.is_bank());
    }

    #[test]
    fn test_unknown_velocity_method_deserializes_to_other() {
        let method: VelocityMethod = serde_json::from_str("\"FiveTenths\"").unwrap();
        assert_eq!(method, VelocityMethod::FiveTenths);

        let method: VelocityMethod = serde_json::from_str("\"FourPointLogLaw\"").unwrap();
        assert_eq!(method, VelocityMethod::Other);
    }

    #[test]
    fn test_observation_interval() {
        let point = PointMeasurement {
            fractional_depth: 0.6,
            start_time: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 40).unwrap(),
            velocity: Vector3::default(),
            probe_info: None,
            software_version: None,
        };

        assert_eq!(point.observation_interval(), 40.0);
    }

    #[test]
    fn test_data_file_json_round_trip() {
        let json = r#"{
            "Properties": {
                "SiteNumber": "06306300",
                "Operator": "jdoe",
                "Comment": "spring freshet",
                "CalculationsEngine": "FlowTracker2"
            },
            "Configuration": {
                "Discharge": { "DischargeEquation": "MidSection" }
            },
            "HandheldInfo": {
                "SerialNumber": "H1234",
                "CpuSerialNumber": "C5678",
                "SoftwareVersion": "1.6",
                "Settings": { "Units": "Metric" }
            },
            "Calculations": {
                "Discharge": 1.0,
                "Area": 2.0,
                "Width": 10.0,
                "Depth": 0.2,
                "Velocity": { "X": 0.5 },
                "Temperature": 8.5,
                "UncertaintyIso": {
                    "Overall": 0.052, "Accuracy": 0.01, "Depth": 0.02,
                    "Velocity": 0.03, "Width": 0.01,
                    "Method": 0.02, "NumberOfStations": 0.02
                },
                "UncertaintyStatistical": {
                    "Overall": 0.041, "Accuracy": 0.01, "Depth": 0.02,
                    "Velocity": 0.03, "Width": 0.01
                }
            },
            "Stations": [
                {
                    "StationType": "LeftBank",
                    "Location": 0.0,
                    "CreationTime": "2024-05-01T12:00:00Z",
                    "VelocityMethod": "SixTenths",
                    "EffectiveDepth": 0.0,
                    "FinalDepth": 0.0,
                    "Calculations": {
                        "MeanVelocityInVertical": { "X": 0.0 },
                        "Area": 0.0, "Width": 0.5, "Discharge": 0.0
                    }
                }
            ],
            "SupplementalData": [
                { "Time": "2024-05-01T12:10:00Z", "GaugeHeight": 1.23 }
            ]
        }"#;

        let data_file: DataFile = serde_json::from_str(json).unwrap();
        assert_eq!(data_file.properties.site_number, "06306300");
        assert_eq!(
            data_file.configuration.discharge.discharge_equation,
            "MidSection"
        );
        assert_eq!(data_file.stations.len(), 1);
        assert_eq!(data_file.stations[0].correction_factor, 1.0);
        assert_eq!(
            data_file.calculations.uncertainty_iso.number_of_stations,
            Some(0.02)
        );
        assert_eq!(
            data_file.calculations.uncertainty_statistical.method,
            None
        );
        assert_eq!(data_file.supplemental_data[0].gauge_height, Some(1.23));

        // Round trip through the interchange form preserves the record
        let text = serde_json::to_string(&data_file).unwrap();
        let reparsed: DataFile = serde_json::from_str(&text).unwrap();
        assert_eq!(data_file, reparsed);
    }
}
