//! Error taxonomy for normalization, scoring and configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectError {
    /// One or more of the required `date`, `service`, `cost` columns is absent.
    #[error("input must contain columns: date, service, cost (case-insensitive); missing: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    /// A cell in a required column could not be coerced.
    #[error("could not parse '{column}' value {value:?} at row {row}")]
    Parse {
        column: &'static str,
        row: usize,
        value: String,
    },

    #[error("insufficient data: need at least {needed} records, have {have}")]
    InsufficientData { needed: usize, have: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T, E = DetectError> = std::result::Result<T, E>;
