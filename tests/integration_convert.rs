//! End-to-end conversion tests
//!
//! These tests drive the public entry points the way the desktop tool and
//! the plugin host do: raw bytes in, a `.dis` report or appended structured
//! results out.

use chrono::{DateTime, TimeZone, Utc};
use ft2_converter::app::models::source::{
    Configuration, DataFile, DischargeConfiguration, HandheldInfo, MeasurementCalculations,
    PointMeasurement, Properties, Station, StationCalculations, StationType, SupplementalReading,
    UncertaintyBreakdown, Vector3, VelocityMethod,
};
use ft2_converter::app::services::archive_reader::JsonArchiveReader;
use ft2_converter::app::services::converter::{LocationInfo, ResultsAppender};
use ft2_converter::cli::args::ConvertArgs;
use ft2_converter::cli::commands::run_convert;
use ft2_converter::{
    ConverterConfig, DischargeActivity, ParseOutcome, convert_to_report, convert_to_results,
};
use std::collections::HashMap;
use std::path::PathBuf;
use tempfile::TempDir;

fn time(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, hour, minute, 0).unwrap()
}

fn station(
    station_type: StationType,
    location: f64,
    discharge: f64,
    created: DateTime<Utc>,
) -> Station {
    Station {
        station_type,
        location,
        creation_time: created,
        comment: String::new(),
        ice_thickness: None,
        water_surface_to_bottom_of_ice: None,
        water_surface_to_bottom_of_slush: None,
        velocity_method: VelocityMethod::SixTenths,
        correction_factor: 1.0,
        effective_depth: 0.5,
        final_depth: 0.6,
        calculations: StationCalculations {
            mean_velocity_in_vertical: Vector3 {
                x: 0.25,
                y: 0.0,
                z: 0.0,
            },
            mean_panel_velocity: Vector3::default(),
            area: 0.3,
            width: 1.0,
            discharge,
            fraction_of_total_discharge: None,
            velocity_angle: None,
            snr: Default::default(),
            velocity_standard_error: Vector3::default(),
            temperature: Some(8.5),
            samples: 30,
            spikes: 1,
        },
        point_measurements: vec![PointMeasurement {
            fractional_depth: 0.6,
            start_time: created,
            end_time: created + chrono::Duration::seconds(40),
            velocity: Vector3 {
                x: 0.3,
                y: 0.0,
                z: 0.0,
            },
            probe_info: None,
            software_version: None,
        }],
    }
}

/// Three-station metric mid-section measurement, the canonical scenario
fn three_station_record() -> DataFile {
    DataFile {
        properties: Properties {
            site_number: "06306300".to_string(),
            operator: "jdoe".to_string(),
            comment: "spring freshet".to_string(),
            calculations_engine: "FlowTracker2".to_string(),
            start_time: None,
            end_time: None,
            gauge_height: None,
        },
        configuration: Configuration {
            discharge: DischargeConfiguration {
                discharge_equation: "MidSection".to_string(),
            },
        },
        handheld_info: HandheldInfo {
            serial_number: "H1234".to_string(),
            cpu_serial_number: "C5678".to_string(),
            software_version: "1.6".to_string(),
            settings: None,
        },
        calculations: MeasurementCalculations {
            discharge: 1.0,
            area: 2.0,
            width: 10.0,
            depth: 0.2,
            velocity: Vector3 {
                x: 0.5,
                y: 0.0,
                z: 0.0,
            },
            temperature: 8.5,
            uncertainty_iso: UncertaintyBreakdown {
                overall: 0.052,
                accuracy: 0.01,
                depth: 0.02,
                velocity: 0.03,
                width: 0.01,
                method: Some(0.02),
                number_of_stations: Some(0.02),
            },
            uncertainty_statistical: UncertaintyBreakdown {
                overall: 0.041,
                accuracy: 0.01,
                depth: 0.02,
                velocity: 0.03,
                width: 0.01,
                method: None,
                number_of_stations: None,
            },
        },
        stations: vec![
            station(StationType::LeftBank, 0.0, 0.2, time(12, 0)),
            station(StationType::OpenWater, 5.0, 0.3, time(12, 30)),
            station(StationType::RightBank, 10.0, 0.5, time(13, 0)),
        ],
        supplemental_data: Vec::new(),
    }
}

#[derive(Default)]
struct RecordingAppender {
    locations: HashMap<String, LocationInfo>,
    activities: Vec<(LocationInfo, DischargeActivity)>,
}

impl ResultsAppender for RecordingAppender {
    fn get_location_by_identifier(&self, identifier: &str) -> ft2_converter::Result<LocationInfo> {
        self.locations.get(identifier).cloned().ok_or_else(|| {
            ft2_converter::Error::location_lookup(identifier, "no such location")
        })
    }

    fn add_discharge_activity(
        &mut self,
        location: &LocationInfo,
        activity: DischargeActivity,
    ) -> ft2_converter::Result<()> {
        self.activities.push((location.clone(), activity));
        Ok(())
    }
}

#[test]
fn test_end_to_end_report_scenario() {
    let record = three_station_record();
    let bytes = serde_json::to_vec(&record).unwrap();

    let report = convert_to_report(
        &bytes,
        "creek.ft",
        &ConverterConfig::default(),
        &JsonArchiveReader,
    )
    .unwrap();

    for expected in [
        format!("{:<34}{}", "Discharge_Equation", "Mid-Section"),
        format!("{:<34}{}", "Start_Edge", "LEW"),
        format!("{:<34}{}", "#_Stations", "3"),
    ] {
        assert!(
            report.lines().any(|line| line == expected),
            "missing line: {expected:?}"
        );
    }

    // Exactly three data rows, in original station order
    let data_rows: Vec<&str> = report
        .lines()
        .filter(|line| {
            line.starts_with("00") || line.starts_with("01") || line.starts_with("02")
        })
        .collect();
    assert_eq!(data_rows.len(), 3);
    assert!(data_rows[0].contains("0.00")); // left bank at tagline zero
    assert!(data_rows[1].contains("5.00"));
    assert!(data_rows[2].contains("10.00"));
}

#[test]
fn test_end_to_end_results_scenario() {
    let mut record = three_station_record();
    record.supplemental_data = vec![
        SupplementalReading {
            time: time(12, 5),
            gauge_height: None,
            rated_discharge: None,
        },
        SupplementalReading {
            time: time(12, 10),
            gauge_height: Some(1.23),
            rated_discharge: None,
        },
        SupplementalReading {
            time: time(12, 15),
            gauge_height: None,
            rated_discharge: None,
        },
    ];
    let bytes = serde_json::to_vec(&record).unwrap();

    let mut appender = RecordingAppender::default();
    appender.locations.insert(
        "06306300".to_string(),
        LocationInfo {
            identifier: "06306300".to_string(),
            name: "Little Goose Creek".to_string(),
        },
    );

    let outcome = convert_to_results(
        &bytes,
        None,
        &ConverterConfig::default(),
        &JsonArchiveReader,
        &mut appender,
    );

    assert_eq!(outcome, ParseOutcome::ParsedAndValid);
    assert_eq!(appender.activities.len(), 1);

    let activity = &appender.activities[0].1;

    // Verticals preserve station order and derive their discharge split
    let portions: Vec<f64> = activity
        .channel_measurement
        .verticals
        .iter()
        .map(|vertical| vertical.segment.total_discharge_portion.unwrap())
        .collect();
    assert_eq!(portions, vec![20.0, 30.0, 50.0]);

    // Every vertical carries at least one observation
    assert!(
        activity
            .channel_measurement
            .verticals
            .iter()
            .all(|vertical| !vertical.velocity_observation.observations.is_empty())
    );

    // Value-less gauge readings were dropped
    assert_eq!(activity.gauge_height_measurements.len(), 1);
    assert_eq!(activity.gauge_height_measurements[0].time, time(12, 10));

    // The visit window spans the station times, temperature at its midpoint
    assert_eq!(activity.measurement_period.start, time(12, 0));
    assert_eq!(activity.measurement_period.end, time(13, 0));
    assert_eq!(activity.temperature_reading.time, time(12, 30));
}

#[test]
fn test_batch_conversion_isolates_failures() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    let record = three_station_record();
    std::fs::write(
        root.join("good.ft"),
        serde_json::to_vec(&record).unwrap(),
    )
    .unwrap();
    std::fs::write(root.join("bad.ft"), b"PK\x03\x04 not a record").unwrap();

    let stats = run_convert(ConvertArgs {
        paths: vec![root.to_path_buf()],
        force: true,
        units: None,
        output_dir: None,
        verbose: 0,
        quiet: true,
    })
    .unwrap();

    // The unusable file is reported, the usable one still converts
    assert_eq!(stats.files_converted, 1);
    assert_eq!(stats.errors_encountered, 1);
    assert!(root.join("good.dis").exists());
    assert!(!root.join("bad.dis").exists());

    let report = std::fs::read_to_string(root.join("good.dis")).unwrap();
    assert!(report.contains("good.ft"));
    assert!(
        report
            .lines()
            .any(|line| line == format!("{:<34}{}", "Total_Discharge", "1.0000 m^3/s"))
    );
}

#[test]
fn test_unit_override_forces_imperial_reports() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    std::fs::write(
        root.join("creek.ft"),
        serde_json::to_vec(&three_station_record()).unwrap(),
    )
    .unwrap();

    let output_dir = root.join("reports");
    std::fs::create_dir(&output_dir).unwrap();

    let stats = run_convert(ConvertArgs {
        paths: vec![root.join("creek.ft")],
        force: true,
        units: Some(ft2_converter::cli::args::UnitSystemArg::Imperial),
        output_dir: Some(output_dir.clone()),
        verbose: 0,
        quiet: true,
    })
    .unwrap();

    assert_eq!(stats.files_converted, 1);

    let report = std::fs::read_to_string(output_dir.join("creek.dis")).unwrap();
    assert!(
        report
            .lines()
            .any(|line| line == format!("{:<34}{}", "Unit_System", "English Units"))
    );
    assert!(
        report
            .lines()
            .any(|line| line == format!("{:<34}{}", "Total_Width", "32.808 ft"))
    );
}

#[test]
fn test_missing_input_path_fails_without_converting() {
    let result = run_convert(ConvertArgs {
        paths: vec![PathBuf::from("/no/such/measurements")],
        force: true,
        units: None,
        output_dir: None,
        verbose: 0,
        quiet: true,
    });

    assert!(result.is_err());
}
