//! Velocity-method resolution
//!
//! Maps the instrument's raw velocity-sampling method onto the canonical
//! point-velocity observation category, and resolves the measurement's
//! dominant method across all stations. The mapping is a fixed table with a
//! documented fallback: raw methods this converter does not know resolve to
//! `Unknown`, never to an error.

use crate::app::models::domain::PointVelocityMethod;
use crate::app::models::source::{Station, VelocityMethod};

/// Raw-method to canonical-category mapping
const VELOCITY_METHOD_MAP: &[(VelocityMethod, PointVelocityMethod)] = &[
    (VelocityMethod::FiveTenths, PointVelocityMethod::OneAtPointFive),
    (VelocityMethod::SixTenths, PointVelocityMethod::OneAtPointSix),
    (
        VelocityMethod::TwoTenthsEightTenths,
        PointVelocityMethod::OneAtPointTwoAndPointEight,
    ),
    (
        VelocityMethod::TwoTenthsSixTenthsEightTenths,
        PointVelocityMethod::OneAtPointTwoPointSixAndPointEight,
    ),
    (VelocityMethod::FivePoint, PointVelocityMethod::FivePoint),
    (VelocityMethod::SixPoint, PointVelocityMethod::SixPoint),
];

/// Canonical observation category for a raw sampling method
pub fn point_velocity_method(method: VelocityMethod) -> PointVelocityMethod {
    VELOCITY_METHOD_MAP
        .iter()
        .find(|(raw, _)| *raw == method)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(PointVelocityMethod::Unknown)
}

/// The most common raw method across all stations, as a canonical category
///
/// Counts occurrences in station sequence order and selects the method with
/// the highest count. Ties break to the earliest-encountered maximum of a
/// single left-to-right scan, which keeps the result stable for a given
/// station ordering.
pub fn dominant_method(stations: &[Station]) -> PointVelocityMethod {
    let mut counts: Vec<(VelocityMethod, usize)> = Vec::new();

    for station in stations {
        match counts
            .iter_mut()
            .find(|(method, _)| *method == station.velocity_method)
        {
            Some((_, count)) => *count += 1,
            None => counts.push((station.velocity_method, 1)),
        }
    }

    let mut dominant: Option<(VelocityMethod, usize)> = None;
    for (method, count) in counts {
        if dominant.map(|(_, best)| count > best).unwrap_or(true) {
            dominant = Some((method, count));
        }
    }

    dominant
        .map(|(method, _)| point_velocity_method(method))
        .unwrap_or(PointVelocityMethod::Unknown)
}
