//! Discharge activity assembly
//!
//! Aggregates one record's verticals into the canonical
//! [`DischargeActivity`]: the visit time window, total discharge with its
//! quantitative uncertainty, the gauge-height series, the channel
//! measurement summary, and the mean-temperature reading. The activity is
//! assembled completely before anything is handed to a sink, so a failure
//! here never leaves partial results visible.

use crate::app::models::domain::{
    ChannelMeasurement, DateTimeInterval, DischargeActivity, DischargeMethod,
    GaugeHeightMeasurement, Measurement, MeasurementDevice, Reading, StartPoint,
};
use crate::app::models::source::{DataFile, StationType};
use crate::app::services::station_classifier::validate_topology;
use crate::app::services::units::{UnitConverter, UnitGroup};
use crate::app::services::velocity_method::dominant_method;
use crate::app::services::vertical_builder::build_verticals;
use crate::config::ConverterConfig;
use crate::constants::{DEFAULT_ISO_UNCERTAINTY_SCALAR, WATER_TEMPERATURE_PARAMETER_ID, meter};
use crate::{Error, Result};
use tracing::debug;

/// Assemble the canonical discharge activity for one record
pub fn assemble(
    data_file: &DataFile,
    config: &ConverterConfig,
    converter: &UnitConverter,
) -> Result<DischargeActivity> {
    if data_file.stations.is_empty() {
        return Err(Error::data_validation(
            "measurement contains no stations".to_string(),
        ));
    }

    if config.require_bank_edges {
        validate_topology(&data_file.stations)?;
    }

    let discharge_method = resolve_discharge_method(data_file)?;
    let measurement_period = resolve_measurement_period(data_file);

    let discharge = Measurement::new(
        converter.discharge(data_file.calculations.discharge),
        converter.unit_id(UnitGroup::Discharge),
    );

    let scalar = config.iso_uncertainty_scalar;
    let quantitative_uncertainty =
        scalar * data_file.calculations.uncertainty_iso.overall * 100.0;
    let quality_assurance_comments = (scalar != DEFAULT_ISO_UNCERTAINTY_SCALAR)
        .then(|| format!("Scaled ISO uncertainty by {scalar}"));

    let verticals = build_verticals(data_file, converter, discharge.value);
    debug!(
        "Assembled {} verticals for site '{}'",
        verticals.len(),
        data_file.properties.site_number
    );

    let first_station_type = data_file.stations[0].station_type;
    let channel_measurement = ChannelMeasurement {
        discharge: discharge.value,
        area: converter.area(data_file.calculations.area),
        width: converter.distance(data_file.calculations.width),
        velocity_average: converter.velocity(data_file.calculations.velocity.x),
        start_point: if first_station_type == StationType::RightBank {
            StartPoint::RightEdgeOfWater
        } else {
            StartPoint::LeftEdgeOfWater
        },
        velocity_observation_method: dominant_method(&data_file.stations),
        discharge_method,
        party: data_file.properties.operator.clone(),
        meter_calibration: verticals
            .first()
            .map(|vertical| vertical.velocity_observation.meter_calibration.clone()),
        verticals,
    };

    Ok(DischargeActivity {
        measurement_period,
        party: data_file.properties.operator.clone(),
        discharge,
        quantitative_uncertainty,
        comments: data_file.properties.comment.clone(),
        quality_assurance_comments,
        gauge_height_measurements: build_gauge_heights(data_file, converter, &measurement_period),
        channel_measurement,
        temperature_reading: build_temperature_reading(data_file, converter, &measurement_period),
        unit_system: converter.unit_system(),
    })
}

fn resolve_discharge_method(data_file: &DataFile) -> Result<DischargeMethod> {
    let equation = &data_file.configuration.discharge.discharge_equation;

    match equation.as_str() {
        "MeanSection" => Ok(DischargeMethod::MeanSection),
        "MidSection" => Ok(DischargeMethod::MidSection),
        _ => Err(Error::unsupported_discharge_equation(equation)),
    }
}

/// Visit window from the record's own properties, falling back to the
/// min/max of station creation times on records without one
fn resolve_measurement_period(data_file: &DataFile) -> DateTimeInterval {
    if let (Some(start), Some(end)) = (
        data_file.properties.start_time,
        data_file.properties.end_time,
    ) {
        return DateTimeInterval::new(start, end);
    }

    let mut station_times: Vec<_> = data_file
        .stations
        .iter()
        .map(|station| station.creation_time)
        .collect();
    station_times.sort();

    DateTimeInterval::new(
        *station_times.first().expect("stations are never empty here"),
        *station_times.last().expect("stations are never empty here"),
    )
}

/// Gauge-height measurements taken during the visit
///
/// Supplemental entries without a gauge-height value are dropped. Records
/// written before the supplemental series existed carry at most one scalar
/// gauge height, emitted at the visit start.
fn build_gauge_heights(
    data_file: &DataFile,
    converter: &UnitConverter,
    measurement_period: &DateTimeInterval,
) -> Vec<GaugeHeightMeasurement> {
    let distance_unit_id = converter.unit_id(UnitGroup::Distance);

    let series: Vec<GaugeHeightMeasurement> = data_file
        .supplemental_data
        .iter()
        .filter_map(|reading| {
            let gauge_height = reading.gauge_height?;
            Some(GaugeHeightMeasurement {
                measurement: Measurement::new(converter.distance(gauge_height), distance_unit_id),
                time: reading.time,
            })
        })
        .collect();

    if !series.is_empty() {
        return series;
    }

    data_file
        .properties
        .gauge_height
        .map(|gauge_height| GaugeHeightMeasurement {
            measurement: Measurement::new(converter.distance(gauge_height), distance_unit_id),
            time: measurement_period.start,
        })
        .into_iter()
        .collect()
}

/// Mean water temperature, timestamped at the visit midpoint
fn build_temperature_reading(
    data_file: &DataFile,
    converter: &UnitConverter,
    measurement_period: &DateTimeInterval,
) -> Reading {
    Reading {
        parameter_id: WATER_TEMPERATURE_PARAMETER_ID,
        measurement: Measurement::new(
            converter.temperature(data_file.calculations.temperature),
            converter.unit_id(UnitGroup::Temperature),
        ),
        device: MeasurementDevice {
            manufacturer: meter::MANUFACTURER.to_string(),
            model: meter::MODEL.to_string(),
            serial_number: data_file.handheld_info.serial_number.clone(),
        },
        time: measurement_period.midpoint(),
    }
}
