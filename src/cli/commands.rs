//! Command implementations for the converter CLI
//!
//! The convert command processes its batch strictly sequentially with a
//! per-file failure boundary: one unusable file is reported and the rest of
//! the batch is still attempted.

use crate::app::adapters::filesystem::{
    discover_measurement_files, report_target_path, write_report_atomic,
};
use crate::app::services::archive_reader::{ArchiveReader, JsonArchiveReader};
use crate::app::services::converter::convert_to_report;
use crate::app::services::units::{UnitConverter, UnitGroup};
use crate::cli::args::{Args, Commands, ConvertArgs, InspectArgs};
use crate::config::ConverterConfig;
use crate::{Error, Result, log_error_chain};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Summary statistics for one CLI run
#[derive(Debug, Default)]
pub struct ConversionStats {
    pub files_converted: usize,
    pub files_skipped: usize,
    pub errors_encountered: usize,
}

/// Main command runner: dispatches to the subcommand handlers
pub fn run(args: Args) -> Result<ConversionStats> {
    match args.get_command() {
        Commands::Convert(convert_args) => run_convert(convert_args),
        Commands::Inspect(inspect_args) => run_inspect(inspect_args),
    }
}

/// Set up tracing output for a CLI run
fn setup_logging(log_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ft2_converter={log_level}")));

    // try_init: repeated CLI invocations in one process keep the first subscriber
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()
        .ok();
}

/// Convert command: batch-convert measurement files to .dis reports
pub fn run_convert(args: ConvertArgs) -> Result<ConversionStats> {
    setup_logging(args.get_log_level());
    args.validate()?;

    let config = ConverterConfig::default().with_unit_preference(args.unit_preference());
    let files = discover_measurement_files(&args.paths)?;

    if files.is_empty() {
        return Err(Error::configuration(
            "No measurement files found in the given paths".to_string(),
        ));
    }

    info!("Converting {} measurement files", files.len());

    let progress = (args.show_progress() && files.len() > 1).then(|| {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {msg}")
                .expect("progress template is valid"),
        );
        pb
    });

    let mut stats = ConversionStats::default();

    for file in &files {
        if let Some(pb) = &progress {
            pb.set_message(
                file.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            );
        }

        // One bad file must not stop the rest of the batch
        match convert_single_file(file, &args, &config) {
            Ok(Some(target)) => {
                stats.files_converted += 1;
                info!("Successfully converted '{}'", target.display());
                if !args.quiet {
                    println!("{} {}", "Converted".green(), target.display());
                }
            }
            Ok(None) => {
                stats.files_skipped += 1;
            }
            Err(error) => {
                stats.errors_encountered += 1;
                if !error.is_expected() {
                    log_error_chain(&error);
                }
                eprintln!("{} {}", "Error:".red(), error);
            }
        }

        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    if !args.quiet {
        println!(
            "{}",
            format!(
                "Converted {} of {} files ({} skipped, {} failed)",
                stats.files_converted,
                files.len(),
                stats.files_skipped,
                stats.errors_encountered
            )
            .bold()
        );
    }

    Ok(stats)
}

/// Convert one file; `Ok(None)` means the user declined an overwrite
fn convert_single_file(
    path: &Path,
    args: &ConvertArgs,
    config: &ConverterConfig,
) -> Result<Option<PathBuf>> {
    info!("Loading '{}' ...", path.display());

    let bytes = std::fs::read(path)
        .map_err(|e| Error::io(format!("Failed to read '{}'", path.display()), e))?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let text = convert_to_report(&bytes, &file_name, config, &JsonArchiveReader)?;

    let target = match &args.output_dir {
        Some(output_dir) => output_dir.join(report_target_path(Path::new(&file_name))),
        None => report_target_path(path),
    };

    if target.exists() && !args.force {
        if !crate::cli::input::confirm_overwrite(&target)? {
            warn!("Skipped existing file '{}'", target.display());
            return Ok(None);
        }
        warn!("Overwriting existing file '{}'", target.display());
    }

    write_report_atomic(&target, &text)?;

    Ok(Some(target))
}

/// Inspect command: print a one-screen summary of a parsed measurement
pub fn run_inspect(args: InspectArgs) -> Result<ConversionStats> {
    setup_logging(args.get_log_level());

    let bytes = std::fs::read(&args.path)
        .map_err(|e| Error::io(format!("Failed to read '{}'", args.path.display()), e))?;

    let data_file = JsonArchiveReader
        .read(&bytes)?
        .ok_or_else(|| Error::not_recognized(args.path.display().to_string()))?;

    let config = ConverterConfig::default();
    let converter = UnitConverter::resolve(&data_file, &config);
    let totals = &data_file.calculations;

    let site_number = if data_file.properties.site_number.is_empty() {
        "(none)"
    } else {
        &data_file.properties.site_number
    };

    println!("Site:               {site_number}");
    println!("Operator(s):        {}", data_file.properties.operator);
    println!(
        "Serial numbers:     {}/{}",
        data_file.handheld_info.serial_number, data_file.handheld_info.cpu_serial_number
    );
    println!(
        "Discharge equation: {}",
        data_file.configuration.discharge.discharge_equation
    );
    println!(
        "Unit system:        {}",
        if converter.is_imperial() {
            "imperial"
        } else {
            "metric"
        }
    );
    println!("Stations:           {}", data_file.stations.len());
    println!(
        "Total discharge:    {:.4} {}",
        converter.discharge(totals.discharge),
        converter.unit_id(UnitGroup::Discharge)
    );
    println!(
        "Total width:        {:.3} {}",
        converter.distance(totals.width),
        converter.unit_id(UnitGroup::Distance)
    );
    println!(
        "Total area:         {:.3} {}",
        converter.area(totals.area),
        converter.unit_id(UnitGroup::Area)
    );
    println!(
        "ISO uncertainty:    {:.1} %",
        100.0 * totals.uncertainty_iso.overall
    );
    println!(
        "Gauge heights:      {}",
        data_file
            .supplemental_data
            .iter()
            .filter(|reading| reading.gauge_height.is_some())
            .count()
    );

    Ok(ConversionStats::default())
}
