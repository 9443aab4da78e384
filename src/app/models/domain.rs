//! Canonical domain model for a normalized discharge measurement
//!
//! One conversion produces one [`DischargeActivity`]: a unit-consistent,
//! fully-derived description of a stream-discharge measurement visit. The
//! model is built once by the assembler and handed to a results sink; it is
//! never mutated afterwards.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

// =============================================================================
// Units and Measurements
// =============================================================================

/// The unit identifiers chosen for one conversion
///
/// Resolved exactly once per conversion; every derived quantity in the
/// produced model uses these identifiers. No quantity mixes systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitSystem {
    pub distance_unit_id: &'static str,
    pub area_unit_id: &'static str,
    pub velocity_unit_id: &'static str,
    pub discharge_unit_id: &'static str,
    pub temperature_unit_id: &'static str,
}

/// A numeric value paired with its unit identifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measurement {
    pub value: f64,
    pub unit_id: &'static str,
}

impl Measurement {
    pub fn new(value: f64, unit_id: &'static str) -> Self {
        Self { value, unit_id }
    }
}

/// Closed time interval between two instants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateTimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateTimeInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Instant halfway through the interval, using integer-safe arithmetic
    pub fn midpoint(&self) -> DateTime<Utc> {
        self.start + self.duration() / 2
    }
}

// =============================================================================
// Verticals
// =============================================================================

/// Position of a vertical within the measurement cross-section
///
/// Total and mutually exclusive: exactly one vertical is the start edge,
/// exactly one is the end edge, everything between is mid-channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EdgeClassification {
    StartEdge,
    EndEdge,
    MidChannel,
}

/// Water-surface condition at a vertical
///
/// A closed sum: consumers switch exhaustively on the variant. Ice geometry
/// is always fully populated; missing source values are back-filled by the
/// station classifier before this variant is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum MeasurementCondition {
    OpenWater,
    IceCovered {
        ice_thickness: f64,
        water_surface_to_bottom_of_ice: f64,
        water_surface_to_bottom_of_slush: f64,
    },
}

/// Canonical point-velocity observation category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PointVelocityMethod {
    OneAtPointFive,
    OneAtPointSix,
    OneAtPointTwoAndPointEight,
    OneAtPointTwoPointSixAndPointEight,
    FivePoint,
    SixPoint,
    Surface,
    Unknown,
}

/// How the meter was deployed at a vertical
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeploymentMethod {
    Unspecified,
}

/// Flow direction relative to the tagline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlowDirection {
    Normal,
}

/// One depth/velocity sample within a vertical's observation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VelocityDepthObservation {
    /// Sampling depth below the water surface, unit-converted
    pub depth: f64,

    pub velocity: f64,

    /// Elapsed sampling time in seconds
    pub observation_interval: f64,

    /// Rotation count; always zero for acoustic meters
    pub revolution_count: u32,
}

/// The velocity observation made at one vertical
///
/// Always carries at least one sample: stations with no point measurements
/// get a single synthetic surface sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VelocityObservation {
    pub method: PointVelocityMethod,
    pub meter_calibration: MeterCalibration,
    pub mean_velocity: f64,
    pub deployment_method: DeploymentMethod,
    pub observations: Vec<VelocityDepthObservation>,
}

/// Meter category on a calibration record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MeterType {
    Adv,
}

/// Identity and calibration metadata of the meter used at a vertical
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeterCalibration {
    pub meter_type: MeterType,
    pub manufacturer: String,
    pub model: String,

    /// Handheld serial pair, `serial/cpu_serial`
    pub configuration: String,

    pub software_version: Option<String>,
    pub firmware_version: Option<String>,
    pub serial_number: String,
    pub equations: Vec<MeterCalibrationEquation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeterCalibrationEquation {
    pub slope: f64,
    pub intercept: f64,
    pub intercept_unit_id: &'static str,
}

/// Channel width/area/discharge attributed to one vertical
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub width: f64,
    pub area: f64,
    pub discharge: f64,
    pub velocity: f64,

    /// Percentage of the measurement's total discharge; `None` until the
    /// back-fill pass derives it from segment and total discharge
    pub total_discharge_portion: Option<f64>,
}

/// Normalized, unit-converted representation of one station
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vertical {
    /// Zero-based position in station sequence order
    pub sequence_number: usize,

    pub tagline_position: f64,
    pub comments: String,
    pub measurement_time: DateTime<Utc>,
    pub effective_depth: f64,
    pub sounded_depth: f64,
    pub measurement_condition: MeasurementCondition,
    pub velocity_observation: VelocityObservation,
    pub flow_direction: FlowDirection,
    pub edge: EdgeClassification,
    pub segment: Segment,
}

// =============================================================================
// Channel Measurement and Activity
// =============================================================================

/// Which bank the measurement traverse started from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StartPoint {
    LeftEdgeOfWater,
    RightEdgeOfWater,
}

impl StartPoint {
    /// Legacy report label
    pub fn label(self) -> &'static str {
        match self {
            Self::LeftEdgeOfWater => "LEW",
            Self::RightEdgeOfWater => "REW",
        }
    }
}

/// Supported discharge computation methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DischargeMethod {
    MeanSection,
    MidSection,
}

impl DischargeMethod {
    /// Legacy report label
    pub fn label(self) -> &'static str {
        match self {
            Self::MeanSection => "Mean-Section",
            Self::MidSection => "Mid-Section",
        }
    }
}

/// Summary of the gauged channel: totals, method, and ordered verticals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelMeasurement {
    pub discharge: f64,
    pub area: f64,
    pub width: f64,
    pub velocity_average: f64,
    pub start_point: StartPoint,

    /// Dominant method across all verticals; individual verticals keep
    /// their own per-station method
    pub velocity_observation_method: PointVelocityMethod,

    pub discharge_method: DischargeMethod,
    pub party: String,

    /// Calibration of the first vertical that carries one
    pub meter_calibration: Option<MeterCalibration>,

    pub verticals: Vec<Vertical>,
}

/// Timestamped gauge-height observation, independent of station geometry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeHeightMeasurement {
    pub measurement: Measurement,
    pub time: DateTime<Utc>,
}

/// Device that produced a reading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementDevice {
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
}

/// A single parameter reading attached to the visit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub parameter_id: &'static str,
    pub measurement: Measurement,
    pub device: MeasurementDevice,
    pub time: DateTime<Utc>,
}

/// The complete normalized record of one discharge-measurement visit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DischargeActivity {
    pub measurement_period: DateTimeInterval,
    pub party: String,
    pub discharge: Measurement,

    /// ISO overall uncertainty as a percentage, after the configured scalar
    pub quantitative_uncertainty: f64,

    pub comments: String,

    /// Present only when a non-default uncertainty scalar was applied
    pub quality_assurance_comments: Option<String>,

    pub gauge_height_measurements: Vec<GaugeHeightMeasurement>,
    pub channel_measurement: ChannelMeasurement,

    /// Mean water temperature, timestamped at the visit midpoint
    pub temperature_reading: Reading,

    pub unit_system: UnitSystem,
}
