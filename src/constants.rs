//! Application constants for the FlowTracker2 converter
//!
//! This module contains the instrument setting keys, plugin configuration
//! keys, and fixed report-format values used throughout the converter.

// =============================================================================
// Instrument Settings Keys
// =============================================================================

/// Handheld settings key holding the operator's unit-system preference
pub const UNITS_SETTING_KEY: &str = "Units";

/// Units preference value selecting the metric system (also the default)
pub const METRIC_UNITS_SETTING: &str = "Metric";

/// Handheld settings key holding the local-time offset from UTC
pub const UTC_OFFSET_SETTING_KEY: &str = "LocalTimeOffsetFromUtc";

// =============================================================================
// Plugin Configuration Keys
// =============================================================================

/// Configuration key scaling the reported ISO overall uncertainty
pub const ISO_UNCERTAINTY_SCALAR_KEY: &str = "IsoUncertaintyScalar";

/// Scalar applied to the ISO uncertainty when none is configured
pub const DEFAULT_ISO_UNCERTAINTY_SCALAR: f64 = 1.0;

// =============================================================================
// Unit Conversion
// =============================================================================

/// Exact international foot, the basis for every imperial conversion factor
pub const METERS_PER_FOOT: f64 = 0.3048;

// =============================================================================
// Meter Metadata
// =============================================================================

/// Fixed identity of the velocity meter behind every measurement
pub mod meter {
    /// Instrument manufacturer recorded on meter calibrations and readings
    pub const MANUFACTURER: &str = "SonTek";

    /// Instrument model recorded on meter calibrations and readings
    pub const MODEL: &str = "FlowTracker2";
}

/// Parameter identifier for water-temperature readings
pub const WATER_TEMPERATURE_PARAMETER_ID: &str = "TW";

// =============================================================================
// File Extensions
// =============================================================================

/// Extension of FlowTracker2 measurement archives
pub const MEASUREMENT_FILE_EXTENSION: &str = "ft";

/// Extension of the generated legacy report files
pub const REPORT_FILE_EXTENSION: &str = "dis";

// =============================================================================
// Legacy Report Layout
// =============================================================================

/// Fixed-width layout values of the `.dis` report, part of the downstream
/// importer's compatibility contract. Do not adjust without coordinating a
/// change to the importer.
pub mod report {
    /// Width of the left-justified name field on every header line
    pub const HEADER_NAME_WIDTH: usize = 34;

    /// Column widths of the supplemental gauge-height table
    pub const SUPPLEMENTAL_TABLE_WIDTHS: &[i32] = &[7, 12, 9, 14, 19, 18, 10];

    /// Column widths of the per-station table; negative widths left-justify
    pub const STATION_TABLE_WIDTHS: &[i32] = &[
        -2, 7, 8, 7, 7, 5, 7, 5, 6, 8, 6, 6, 8, 4, 8, 9, 8, 7, 9, 5,
    ];

    /// Site name rendered when the record carries no site identifier
    pub const UNKNOWN_SITE_NAME: &str = "Unknown";

    /// Placeholder cell for columns the instrument never populates
    pub const EMPTY_CELL: &str = "()";
}
