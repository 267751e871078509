//! Error type for the fallible edges of the crate
//!
//! The simulation step itself never fails: degenerate physics are clamped or
//! floored. Errors only arise when validating external input (parameter
//! edits, configuration files, CSV text) or writing exports.

use thiserror::Error;

/// Errors produced by tanksim
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid value for `{name}`: {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("Invalid transfer function: {0}")]
    InvalidTransferFunction(String),

    #[error("No data recorded")]
    NoData,

    #[error("Malformed CSV at line {line}: {reason}")]
    Csv { line: usize, reason: String },

    #[error("CSV error: {0}")]
    CsvFormat(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;
