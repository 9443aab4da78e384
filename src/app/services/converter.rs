//! Conversion entry points
//!
//! Two independent consumers sit on top of the normalization engine: the
//! report path produces the legacy `.dis` text, and the results path
//! appends the canonical [`DischargeActivity`] to a host-provided sink.
//!
//! The results path never lets an error escape: every failure folds into a
//! [`ParseOutcome`] at this boundary, with the full cause chain logged for
//! anything that was not an expected conversion outcome. The activity is
//! assembled completely before the single sink call, so a failed conversion
//! leaves no partial results behind.

use crate::app::models::domain::DischargeActivity;
use crate::app::models::source::DataFile;
use crate::app::services::archive_reader::ArchiveReader;
use crate::app::services::discharge_assembler::assemble;
use crate::app::services::report_renderer::render_dis_report;
use crate::app::services::units::UnitConverter;
use crate::config::ConverterConfig;
use crate::{Error, Result, log_error_chain};
use tracing::info;

/// Outcome of one results-appending conversion
///
/// `NotRecognized` is silent: the host treats it as "try the next handler".
/// `ParsedButInvalid` means the format was recognized but the domain rules
/// could not be satisfied; the reason is a short human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    NotRecognized,
    ParsedButInvalid { reason: String },
    ParsedAndValid,
}

/// A resolved target location in the host's location directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationInfo {
    pub identifier: String,
    pub name: String,
}

/// Host-provided sink for structured results
///
/// Also serves as the location directory: when no pre-resolved location is
/// supplied, the record's site identifier is looked up here.
pub trait ResultsAppender {
    /// Resolve a location by the record's site identifier
    fn get_location_by_identifier(&self, identifier: &str) -> Result<LocationInfo>;

    /// Append one fully-assembled discharge activity
    fn add_discharge_activity(
        &mut self,
        location: &LocationInfo,
        activity: DischargeActivity,
    ) -> Result<()>;
}

/// Convert raw archive bytes to the legacy `.dis` report text
///
/// `source_name` is the file name reported inside the report. Unrecognized
/// input fails with [`Error::NotRecognized`].
pub fn convert_to_report(
    bytes: &[u8],
    source_name: &str,
    config: &ConverterConfig,
    reader: &dyn ArchiveReader,
) -> Result<String> {
    let data_file = reader
        .read(bytes)?
        .ok_or_else(|| Error::not_recognized(source_name))?;

    if data_file.stations.is_empty() {
        return Err(Error::data_validation(
            "measurement contains no stations".to_string(),
        ));
    }

    log_loaded_record(&data_file);

    let converter = UnitConverter::resolve(&data_file, config);

    Ok(render_dis_report(&data_file, source_name, &converter))
}

/// Convert raw archive bytes and append structured results to the sink
///
/// When `known_location` is absent, the target location is resolved through
/// the appender's location directory from the record's site identifier.
pub fn convert_to_results(
    bytes: &[u8],
    known_location: Option<LocationInfo>,
    config: &ConverterConfig,
    reader: &dyn ArchiveReader,
    appender: &mut dyn ResultsAppender,
) -> ParseOutcome {
    let data_file = match reader.read(bytes) {
        Ok(Some(data_file)) => data_file,
        Ok(None) => return ParseOutcome::NotRecognized,
        Err(error) => {
            log_error_chain(&error);
            return ParseOutcome::ParsedButInvalid {
                reason: error.to_string(),
            };
        }
    };

    log_loaded_record(&data_file);

    match append_results(&data_file, known_location, config, appender) {
        Ok(()) => ParseOutcome::ParsedAndValid,
        Err(error) => {
            if !error.is_expected() {
                log_error_chain(&error);
            }
            ParseOutcome::ParsedButInvalid {
                reason: error.to_string(),
            }
        }
    }
}

fn append_results(
    data_file: &DataFile,
    known_location: Option<LocationInfo>,
    config: &ConverterConfig,
    appender: &mut dyn ResultsAppender,
) -> Result<()> {
    let location = match known_location {
        Some(location) => location,
        None => {
            let site_number = &data_file.properties.site_number;
            if site_number.is_empty() {
                return Err(Error::MissingLocationIdentifier);
            }
            appender.get_location_by_identifier(site_number)?
        }
    };

    let converter = UnitConverter::resolve(data_file, config);
    let activity = assemble(data_file, config, &converter)?;

    appender.add_discharge_activity(&location, activity)
}

fn log_loaded_record(data_file: &DataFile) {
    info!(
        "Loaded {} measurement from {}/{}/{}",
        data_file.configuration.discharge.discharge_equation,
        data_file.handheld_info.serial_number,
        data_file.handheld_info.cpu_serial_number,
        data_file.handheld_info.software_version
    );
}
