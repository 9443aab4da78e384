//! FlowTracker2 Converter Library
//!
//! A Rust library for normalizing parsed FlowTracker2 hydroacoustic
//! discharge-measurement records into canonical field-visit data and
//! fixed-width legacy `.dis` reports.
//!
//! This library provides tools for:
//! - Resolving the measurement's unit system (metric or imperial) and
//!   converting every derived quantity exactly once
//! - Classifying stations into start-edge / end-edge / mid-channel verticals
//! - Resolving per-station and measurement-dominant velocity methods
//! - Building unit-consistent verticals and channel segments
//! - Assembling one discharge activity per measurement for a results sink
//! - Rendering the legacy fixed-width `.dis` report format

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models {
        pub mod domain;
        pub mod source;
    }
    pub mod services {
        pub mod archive_reader;
        pub mod converter;
        pub mod discharge_assembler;
        pub mod report_renderer;
        pub mod station_classifier;
        pub mod units;
        pub mod velocity_method;
        pub mod vertical_builder;
    }
    pub mod adapters {
        pub mod filesystem;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
    pub mod input;
}

// Re-export commonly used types
pub use app::models::domain::{DischargeActivity, UnitSystem, Vertical};
pub use app::models::source::DataFile;
pub use app::services::converter::{ParseOutcome, convert_to_report, convert_to_results};
pub use config::ConverterConfig;

/// Result type alias for the FlowTracker2 converter
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for FlowTracker2 conversion operations
///
/// The expected, frequent failure modes (`NotRecognized`, `InvalidTopology`,
/// `UnsupportedDischargeEquation`, `MissingLocationIdentifier`) never escape
/// the results entry point; [`app::services::converter`] folds them into a
/// [`ParseOutcome`] at the boundary.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Input is not a parseable measurement archive
    #[error("'{path}' is not a recognized FlowTracker2 measurement file")]
    NotRecognized { path: String },

    /// The first/last stations do not form a usable pair of bank edges
    #[error("Invalid measurement topology: {reason}")]
    InvalidTopology { reason: String },

    /// The record declares a discharge equation outside the supported set
    #[error("DischargeEquation='{equation}' is not supported")]
    UnsupportedDischargeEquation { equation: String },

    /// No target location provided and the record carries no site identifier
    #[error(
        "No SiteNumber property is set, so no target location can be inferred. \
         Try uploading the file directly to a location."
    )]
    MissingLocationIdentifier,

    /// Location directory lookup failed for the record's site identifier
    #[error("Location lookup failed for site '{identifier}': {message}")]
    LocationLookup { identifier: String, message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Source record fails a domain rule required for assembly
    #[error("Data validation error: {message}")]
    DataValidation { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a not-recognized error for a source path or stream label
    pub fn not_recognized(path: impl Into<String>) -> Self {
        Self::NotRecognized { path: path.into() }
    }

    /// Create an invalid-topology error
    pub fn invalid_topology(reason: impl Into<String>) -> Self {
        Self::InvalidTopology {
            reason: reason.into(),
        }
    }

    /// Create an unsupported-discharge-equation error
    pub fn unsupported_discharge_equation(equation: impl Into<String>) -> Self {
        Self::UnsupportedDischargeEquation {
            equation: equation.into(),
        }
    }

    /// Create a location lookup error
    pub fn location_lookup(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self::LocationLookup {
            identifier: identifier.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Whether this error is an expected conversion outcome rather than a fault
    ///
    /// Expected errors surface to users as a short actionable message;
    /// anything else also gets its cause chain logged for support purposes.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::NotRecognized { .. }
                | Self::InvalidTopology { .. }
                | Self::UnsupportedDischargeEquation { .. }
                | Self::MissingLocationIdentifier
                | Self::LocationLookup { .. }
        )
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

/// Log an error and its full nested cause chain, one level per line
///
/// The results-appending path is required to record every wrapped cause
/// before folding an unexpected failure into a parse outcome.
pub fn log_error_chain(error: &dyn std::error::Error) {
    tracing::error!("{}", error);

    let mut cause = error.source();
    while let Some(inner) = cause {
        tracing::error!("Caused by: {}", inner);
        cause = inner.source();
    }
}
