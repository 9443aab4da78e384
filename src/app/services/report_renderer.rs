//! Legacy fixed-width report rendering
//!
//! Renders a source record as the `.dis` text format consumed by the
//! downstream data-management importer. Column widths, header names, and
//! unit-row text are an external compatibility contract and are reproduced
//! exactly; see [`crate::constants::report`].
//!
//! Timestamps render in handheld local time. Numeric cells sanitize missing
//! or NaN inputs to 0 before formatting, matching what the importer expects
//! from the original instrument software.

use crate::app::models::source::{DataFile, StationType, VelocityMethod};
use crate::app::services::units::{UnitConverter, UnitGroup};
use crate::constants::report::{
    EMPTY_CELL, HEADER_NAME_WIDTH, STATION_TABLE_WIDTHS, SUPPLEMENTAL_TABLE_WIDTHS,
    UNKNOWN_SITE_NAME,
};

/// Station-table method codes understood by the legacy importer
///
/// Unmapped methods render as `0.0`, which the importer treats as "Other".
const VELOCITY_METHOD_CODES: &[(VelocityMethod, &str)] = &[
    (VelocityMethod::FiveTenths, "0.5"),
    (VelocityMethod::SixTenths, "0.6"),
    (VelocityMethod::TwoTenthsEightTenths, "o2"),
    (VelocityMethod::TwoTenthsSixTenthsEightTenths, "o4"),
];

fn method_code(method: VelocityMethod) -> &'static str {
    VELOCITY_METHOD_CODES
        .iter()
        .find(|(raw, _)| *raw == method)
        .map(|(_, code)| *code)
        .unwrap_or("0.0")
}

/// Fixed-width table builder
///
/// Positive widths right-justify the cell, negative widths left-justify to
/// the absolute width. Values wider than their column render unpadded. Rows
/// may supply fewer values than there are columns; trailing columns are
/// simply omitted.
pub struct TextTable {
    widths: &'static [i32],
    buffer: String,
}

impl TextTable {
    pub fn new(widths: &'static [i32]) -> Self {
        Self {
            widths,
            buffer: String::new(),
        }
    }

    pub fn add_row(&mut self, values: &[&str]) {
        debug_assert!(
            values.len() <= self.widths.len(),
            "row of {} values exceeds {} columns",
            values.len(),
            self.widths.len()
        );

        for (value, width) in values.iter().zip(self.widths) {
            if *width < 0 {
                let width = width.unsigned_abs() as usize;
                self.buffer.push_str(&format!("{value:<width$}"));
            } else {
                let width = *width as usize;
                self.buffer.push_str(&format!("{value:>width$}"));
            }
        }

        self.buffer.push('\n');
    }

    pub fn format(&self) -> &str {
        &self.buffer
    }
}

/// Render the `.dis` report for one record
///
/// `source_name` is the file name reported on the `File_Name` header line.
pub fn render_dis_report(
    data_file: &DataFile,
    source_name: &str,
    converter: &UnitConverter,
) -> String {
    let mut report = String::new();

    let distance_units = converter.unit_id(UnitGroup::Distance);
    let area_units = converter.unit_id(UnitGroup::Area);
    let velocity_units = converter.unit_id(UnitGroup::Velocity);
    let discharge_units = converter.unit_id(UnitGroup::Discharge);
    let temperature_units = converter.unit_id(UnitGroup::Temperature);

    let totals = &data_file.calculations;
    let total_discharge = converter.discharge(totals.discharge);

    let utc_offset = data_file.handheld_info.utc_offset();
    let start_time = data_file.stations[0]
        .creation_time
        .with_timezone(&utc_offset);

    report.push('\n');
    append_value(&mut report, "File_Name", source_name);
    append_value(
        &mut report,
        "Start_Date_and_Time",
        &start_time.format("%Y/%m/%d %H:%M:%S").to_string(),
    );
    append_value(
        &mut report,
        "Site_Name",
        if data_file.properties.site_number.is_empty() {
            UNKNOWN_SITE_NAME
        } else {
            &data_file.properties.site_number
        },
    );
    append_value(&mut report, "Operator(s)", &data_file.properties.operator);
    append_value(
        &mut report,
        "Sensor_Type",
        &data_file.properties.calculations_engine,
    );
    append_value(
        &mut report,
        "Serial_#",
        &format!(
            "{}/{}",
            data_file.handheld_info.serial_number, data_file.handheld_info.cpu_serial_number
        ),
    );
    append_value(
        &mut report,
        "Software_Ver",
        concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION")),
    );

    let equation = if data_file.configuration.discharge.discharge_equation == "MidSection" {
        "Mid-Section"
    } else {
        "Mean-Section"
    };
    let start_edge = if data_file.stations[0].station_type == StationType::LeftBank {
        "LEW"
    } else {
        "REW"
    };

    append_value(
        &mut report,
        "Unit_System",
        if converter.is_imperial() {
            "English Units"
        } else {
            "Metric Units"
        },
    );
    append_value(&mut report, "Discharge_Equation", equation);
    append_value(&mut report, "Start_Edge", start_edge);
    append_value(&mut report, "#_Stations", &data_file.stations.len().to_string());
    append_value(
        &mut report,
        "Total_Width",
        &format!("{:.3} {}", converter.distance(totals.width), distance_units),
    );
    append_value(
        &mut report,
        "Total_Area",
        &format!("{:.3} {}", converter.area(totals.area), area_units),
    );
    append_value(
        &mut report,
        "Total_Discharge",
        &format!("{total_discharge:.4} {discharge_units}"),
    );
    append_value(
        &mut report,
        "Mean_Depth",
        &format!("{:.3} {}", converter.distance(totals.depth), distance_units),
    );
    append_value(
        &mut report,
        "Mean_Velocity",
        &format!(
            "{:.4} {}",
            converter.velocity(totals.velocity.x),
            velocity_units
        ),
    );
    append_value(
        &mut report,
        "Mean_Temp",
        &format!(
            "{:.2} {}",
            converter.temperature(totals.temperature),
            temperature_units
        ),
    );

    report.push('\n');
    report.push_str("Discharge_Uncertainty_(ISO)\n");
    let iso = &totals.uncertainty_iso;
    append_percentage(&mut report, "Overall", iso.overall);
    append_percentage(&mut report, "Accuracy", iso.accuracy);
    append_percentage(&mut report, "Depth", iso.depth);
    append_percentage(&mut report, "Velocity", iso.velocity);
    append_percentage(&mut report, "Width", iso.width);
    append_percentage(&mut report, "Method", sanitize(iso.method));
    append_percentage(&mut report, "#_Stations", sanitize(iso.number_of_stations));

    report.push('\n');
    report.push_str("Discharge_Uncertainty_(Statistical)\n");
    let statistical = &totals.uncertainty_statistical;
    append_percentage(&mut report, "Overall", statistical.overall);
    append_percentage(&mut report, "Accuracy", statistical.accuracy);
    append_percentage(&mut report, "Depth", statistical.depth);
    append_percentage(&mut report, "Velocity", statistical.velocity);
    append_percentage(&mut report, "Width", statistical.width);

    append_supplemental_table(&mut report, data_file, converter);

    report.push('\n');
    let mut station_table = TextTable::new(STATION_TABLE_WIDTHS);

    station_table.add_row(&[
        "St", "Clock", "Loc", "Depth", "IceD", "%Dep", "MeasD", "Npts", "Spike", "Vel", "SNR",
        "Angle", "Verr", "Bnd", "Temp", "CorrFact", "MeanV", "Area", "Flow", "%Q",
    ]);

    station_table.add_row(&[
        EMPTY_CELL,
        EMPTY_CELL,
        &format!("({distance_units})"),
        &format!("({distance_units})"),
        &format!("({distance_units})"),
        "(*D)",
        &format!("({distance_units})"),
        EMPTY_CELL,
        EMPTY_CELL,
        &format!("({velocity_units})"),
        "(dB)",
        "(deg)",
        &format!("({velocity_units})"),
        EMPTY_CELL,
        &format!("({temperature_units})"),
        EMPTY_CELL,
        &format!("({velocity_units})"),
        &format!("({area_units})"),
        &format!("({discharge_units})"),
        "(%)",
    ]);

    for (index, station) in data_file.stations.iter().enumerate() {
        let time = station.creation_time.with_timezone(&utc_offset);
        let calc = &station.calculations;
        let code = method_code(station.velocity_method);

        let effective_depth = converter.distance(station.effective_depth);
        let code_fraction = code.parse::<f64>().unwrap_or(0.0);

        let segment_discharge = converter.discharge(calc.discharge);
        let total_discharge_portion = match calc.fraction_of_total_discharge {
            Some(fraction) => 100.0 * fraction,
            None => 100.0 * segment_discharge / total_discharge,
        };

        station_table.add_row(&[
            &format!("{index:02}"),
            &time.format("%H:%M").to_string(),
            &format!("{:.2}", converter.distance(station.location)),
            &format!("{effective_depth:.3}"),
            &format!("{:.3}", converter.distance(sanitize(station.ice_thickness))),
            code,
            &format!("{:.3}", effective_depth - code_fraction * effective_depth),
            &calc.samples.to_string(),
            &calc.spikes.to_string(),
            &format!(
                "{:.3}",
                converter.velocity(calc.mean_velocity_in_vertical.x)
            ),
            &format!("{:.1}", sanitize(calc.snr.beam_1)),
            &format!("{:.0}", sanitize(calc.velocity_angle)),
            &format!(
                "{:.4}",
                converter.velocity(sanitize_nan(calc.velocity_standard_error.x))
            ),
            "0",
            &format!("{:.2}", converter.temperature(sanitize(calc.temperature))),
            &format!("{:.2}", station.correction_factor),
            &format!("{:.4}", converter.velocity(calc.mean_panel_velocity.x)),
            &format!("{:.3}", converter.area(calc.area)),
            &format!("{segment_discharge:.4}"),
            &format!("{total_discharge_portion:.1}"),
        ]);
    }

    report.push_str(station_table.format());

    report
}

/// Gauge-height table, emitted only when at least one reading has a value
fn append_supplemental_table(report: &mut String, data_file: &DataFile, converter: &UnitConverter) {
    let readings: Vec<_> = data_file
        .supplemental_data
        .iter()
        .filter_map(|reading| reading.gauge_height.map(|value| (reading, value)))
        .collect();

    if readings.is_empty() {
        return;
    }

    let distance_units = converter.unit_id(UnitGroup::Distance);
    let discharge_units = converter.unit_id(UnitGroup::Discharge);
    let utc_offset = data_file.handheld_info.utc_offset();

    report.push('\n');
    report.push_str("Supplemental_Data\n");

    let mut table = TextTable::new(SUPPLEMENTAL_TABLE_WIDTHS);

    table.add_row(&[
        "Record",
        "Date",
        "Time",
        &format!("Location({distance_units})"),
        &format!("Gauge_Height({distance_units})"),
        &format!("Rated_Flow({discharge_units})"),
        "Comments",
    ]);

    for (index, (reading, gauge_height)) in readings.iter().enumerate() {
        let time = reading.time.with_timezone(&utc_offset);
        let rated_flow = match reading.rated_discharge {
            Some(rated) => format!("{:.3}", converter.discharge(rated)),
            None => EMPTY_CELL.to_string(),
        };

        table.add_row(&[
            &(index + 1).to_string(),
            &time.format("%Y/%m/%d").to_string(),
            &time.format("%H:%M:%S").to_string(),
            EMPTY_CELL,
            &format!("{:.3}", converter.distance(*gauge_height)),
            &rated_flow,
        ]);
    }

    report.push_str(table.format());
}

fn append_value(report: &mut String, name: &str, value: &str) {
    report.push_str(&format!(
        "{:<width$}{}\n",
        name,
        value,
        width = HEADER_NAME_WIDTH
    ));
}

fn append_percentage(report: &mut String, name: &str, value: f64) {
    append_value(report, name, &format!("{:.1} %", 100.0 * value));
}

fn sanitize(value: Option<f64>) -> f64 {
    value.filter(|v| !v.is_nan()).unwrap_or(0.0)
}

fn sanitize_nan(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value }
}
