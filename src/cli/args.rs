//! Command-line argument definitions for the FlowTracker2 converter
//!
//! This module defines the complete CLI interface using the clap derive API.

use crate::config::UnitPreference;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the FlowTracker2 converter
///
/// Converts FlowTracker2 discharge measurements into fixed-width legacy
/// `.dis` reports for import into downstream data-management systems.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ft2-converter",
    version,
    about = "Convert FlowTracker2 discharge measurements to legacy .dis reports",
    long_about = "Converts FlowTracker2 hydroacoustic discharge measurements into \
                  fixed-width legacy .dis reports. Reports are written alongside the \
                  source files (or into --output-dir) with unit conversion, station \
                  classification, and derived quantities resolved per measurement."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the converter
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Convert measurement files to legacy .dis reports (main command)
    Convert(ConvertArgs),
    /// Print a summary of a parsed measurement file
    Inspect(InspectArgs),
}

/// Arguments for the convert command (batch report generation)
#[derive(Debug, Clone, Parser)]
pub struct ConvertArgs {
    /// Measurement files or directories to convert
    ///
    /// Directories are searched recursively for .ft measurement files.
    /// Explicitly-named files are attempted regardless of extension.
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Overwrite existing reports without asking
    ///
    /// By default an existing .dis file next to the source prompts for
    /// confirmation before being replaced.
    #[arg(long = "force", help = "Overwrite existing reports without asking")]
    pub force: bool,

    /// Unit system override
    ///
    /// By default each measurement's own units preference decides between
    /// metric and imperial output. This flag forces one system for the
    /// whole batch.
    #[arg(
        long = "units",
        value_enum,
        value_name = "SYSTEM",
        help = "Force a unit system instead of honoring each record's preference"
    )]
    pub units: Option<UnitSystemArg>,

    /// Directory to write reports into
    ///
    /// If not specified, each report is written alongside its source file.
    #[arg(
        short = 'o',
        long = "output-dir",
        value_name = "PATH",
        help = "Directory to write reports into (default: alongside sources)"
    )]
    pub output_dir: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the inspect command (parse troubleshooting)
#[derive(Debug, Clone, Parser)]
pub struct InspectArgs {
    /// Measurement file to inspect
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

/// Unit system choices for the --units override
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnitSystemArg {
    /// Metric output (m, m^2, m/s, m^3/s, degC)
    Metric,
    /// Imperial output (ft, ft^2, ft/s, ft^3/s, degF)
    Imperial,
}

impl From<UnitSystemArg> for UnitPreference {
    fn from(arg: UnitSystemArg) -> Self {
        match arg {
            UnitSystemArg::Metric => UnitPreference::Metric,
            UnitSystemArg::Imperial => UnitPreference::Imperial,
        }
    }
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .expect("Command should be present when get_command() is called")
    }
}

impl ConvertArgs {
    /// Validate the convert command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(output_dir) = &self.output_dir {
            if !output_dir.exists() {
                return Err(Error::configuration(format!(
                    "Output directory does not exist: {}",
                    output_dir.display()
                )));
            }

            if !output_dir.is_dir() {
                return Err(Error::configuration(format!(
                    "Output path is not a directory: {}",
                    output_dir.display()
                )));
            }
        }

        Ok(())
    }

    /// Unit preference override resolved from the --units flag
    pub fn unit_preference(&self) -> Option<UnitPreference> {
        self.units.map(UnitPreference::from)
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl InspectArgs {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
