//! Station classification
//!
//! Decides each station's role at the cross-section edges and its
//! water-surface condition. Edge classification is positional: the first
//! station in sequence order is the start edge, the last is the end edge,
//! everything between is mid-channel. The raw station-type tag never changes
//! a station's edge role; callers that additionally require both edges to be
//! physical bank types run [`validate_topology`] before classification.

use crate::app::models::domain::{EdgeClassification, MeasurementCondition};
use crate::app::models::source::{Station, StationType};
use crate::app::services::units::UnitConverter;
use crate::{Error, Result};

/// Edge role of the station at `index` within a `station_count` sequence
pub fn classify_edge(index: usize, station_count: usize) -> EdgeClassification {
    if index == 0 {
        EdgeClassification::StartEdge
    } else if index + 1 == station_count {
        EdgeClassification::EndEdge
    } else {
        EdgeClassification::MidChannel
    }
}

/// Require the first and last stations to be two different bank edges
///
/// Strict-mode check for deployments whose importer rejects measurements
/// that do not run bank to bank.
pub fn validate_topology(stations: &[Station]) -> Result<()> {
    let (first, last) = match (stations.first(), stations.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Err(Error::data_validation(
                "measurement contains no stations".to_string(),
            ));
        }
    };

    if !first.station_type.is_bank() {
        return Err(Error::invalid_topology(format!(
            "first station is {:?}, expected LeftBank or RightBank",
            first.station_type
        )));
    }

    if !last.station_type.is_bank() {
        return Err(Error::invalid_topology(format!(
            "last station is {:?}, expected LeftBank or RightBank",
            last.station_type
        )));
    }

    if first.station_type == last.station_type {
        return Err(Error::invalid_topology(format!(
            "first and last stations are both {:?}",
            first.station_type
        )));
    }

    Ok(())
}

/// Water-surface condition at a station, unit-converted
///
/// Ice-tagged stations yield ice geometry with missing values back-filled
/// left to right: thickness defaults to 0, surface-to-ice-bottom to the
/// thickness, surface-to-slush-bottom to surface-to-ice-bottom. Every other
/// tag is open water.
pub fn measurement_condition(station: &Station, converter: &UnitConverter) -> MeasurementCondition {
    if station.station_type != StationType::Ice {
        return MeasurementCondition::OpenWater;
    }

    let ice_thickness = station.ice_thickness.unwrap_or(0.0);
    let water_surface_to_bottom_of_ice = station
        .water_surface_to_bottom_of_ice
        .unwrap_or(ice_thickness);
    let water_surface_to_bottom_of_slush = station
        .water_surface_to_bottom_of_slush
        .unwrap_or(water_surface_to_bottom_of_ice);

    MeasurementCondition::IceCovered {
        ice_thickness: converter.distance(ice_thickness),
        water_surface_to_bottom_of_ice: converter.distance(water_surface_to_bottom_of_ice),
        water_surface_to_bottom_of_slush: converter.distance(water_surface_to_bottom_of_slush),
    }
}
