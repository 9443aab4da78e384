//! Vertical and segment construction
//!
//! Builds one normalized [`Vertical`] per station, in station sequence
//! order: unit-converted position and depths, the water-surface condition,
//! the velocity observation with its meter calibration, and the channel
//! segment attributed to the station.
//!
//! Every vertical is guaranteed at least one velocity/depth sample. A
//! station with no point measurements (an island edge, or a surface point
//! with no depth) gets its observation method forced to `Surface` and a
//! single synthetic zero sample appended.

use crate::app::models::domain::{
    DeploymentMethod, FlowDirection, MeterCalibration, MeterCalibrationEquation, MeterType,
    PointVelocityMethod, Segment, Vertical, VelocityDepthObservation, VelocityObservation,
};
use crate::app::models::source::{DataFile, Station};
use crate::app::services::station_classifier::{classify_edge, measurement_condition};
use crate::app::services::units::{UnitConverter, UnitGroup};
use crate::app::services::velocity_method::point_velocity_method;
use crate::constants::meter;

/// Build all verticals for a record and resolve their discharge portions
///
/// `total_discharge` is the measurement total in the converted system; it
/// drives the percentage back-fill for segments the firmware left without
/// an explicit discharge fraction.
pub fn build_verticals(
    data_file: &DataFile,
    converter: &UnitConverter,
    total_discharge: f64,
) -> Vec<Vertical> {
    let station_count = data_file.stations.len();

    let mut verticals: Vec<Vertical> = data_file
        .stations
        .iter()
        .enumerate()
        .map(|(index, station)| {
            build_vertical(index, station_count, station, data_file, converter)
        })
        .collect();

    backfill_discharge_portions(&mut verticals, total_discharge);

    verticals
}

fn build_vertical(
    index: usize,
    station_count: usize,
    station: &Station,
    data_file: &DataFile,
    converter: &UnitConverter,
) -> Vertical {
    let effective_depth = converter.distance(station.effective_depth);

    let mut observations: Vec<VelocityDepthObservation> = station
        .point_measurements
        .iter()
        .map(|point| VelocityDepthObservation {
            // Effective depth is already unit-converted; the fraction is not
            // a physical quantity
            depth: point.fractional_depth * effective_depth,
            velocity: converter.velocity(point.velocity.x),
            observation_interval: point.observation_interval(),
            revolution_count: 0,
        })
        .collect();

    let mut method = point_velocity_method(station.velocity_method);

    if observations.is_empty() {
        method = PointVelocityMethod::Surface;
        observations.push(VelocityDepthObservation {
            depth: 0.0,
            velocity: 0.0,
            observation_interval: 0.0,
            revolution_count: 0,
        });
    }

    let mean_velocity = converter.velocity(station.calculations.mean_velocity_in_vertical.x);

    Vertical {
        sequence_number: index,
        tagline_position: converter.distance(station.location),
        comments: station.comment.clone(),
        measurement_time: station.creation_time,
        effective_depth,
        sounded_depth: converter.distance(station.final_depth),
        measurement_condition: measurement_condition(station, converter),
        velocity_observation: VelocityObservation {
            method,
            meter_calibration: build_meter_calibration(station, data_file, converter),
            mean_velocity,
            deployment_method: DeploymentMethod::Unspecified,
            observations,
        },
        flow_direction: FlowDirection::Normal,
        edge: classify_edge(index, station_count),
        segment: Segment {
            width: converter.distance(station.calculations.width),
            area: converter.area(station.calculations.area),
            discharge: converter.discharge(station.calculations.discharge),
            velocity: mean_velocity,
            total_discharge_portion: station
                .calculations
                .fraction_of_total_discharge
                .map(|fraction| 100.0 * fraction),
        },
    }
}

/// Meter identity for one vertical's observation
///
/// Probe identifiers come from the station's first point measurement; a
/// station with no point measurements reports the handheld serial number.
fn build_meter_calibration(
    station: &Station,
    data_file: &DataFile,
    converter: &UnitConverter,
) -> MeterCalibration {
    let handheld = &data_file.handheld_info;
    let point = station.point_measurements.first();
    let probe = point.and_then(|p| p.probe_info.as_ref());

    MeterCalibration {
        meter_type: MeterType::Adv,
        manufacturer: meter::MANUFACTURER.to_string(),
        model: meter::MODEL.to_string(),
        configuration: format!("{}/{}", handheld.serial_number, handheld.cpu_serial_number),
        software_version: point.and_then(|p| p.software_version.clone()),
        firmware_version: probe.and_then(|p| p.firmware_version.clone()),
        serial_number: probe
            .and_then(|p| p.serial_number.clone())
            .unwrap_or_else(|| handheld.serial_number.clone()),
        equations: vec![MeterCalibrationEquation {
            slope: 0.0,
            intercept: 0.0,
            intercept_unit_id: converter.unit_id(UnitGroup::Velocity),
        }],
    }
}

/// Fill in discharge portions the firmware left unresolved
///
/// Only segments without an explicit upstream fraction are touched; those
/// derive `100 * segment_discharge / total_discharge`. Segments whose own
/// discharge is not a number stay unresolved.
pub fn backfill_discharge_portions(verticals: &mut [Vertical], total_discharge: f64) {
    for vertical in verticals {
        if vertical.segment.total_discharge_portion.is_some()
            || vertical.segment.discharge.is_nan()
        {
            continue;
        }

        vertical.segment.total_discharge_portion =
            Some(100.0 * vertical.segment.discharge / total_discharge);
    }
}
