//! Error types for the merge pipeline.

use std::path::PathBuf;

use rust_decimal::Decimal;
use thiserror::Error;

/// A row that cannot be dated or weighed. Always fatal for the run.
#[derive(Error, Debug)]
pub enum RowError {
    #[error("<{kind}> row has no <{field}> element")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
    #[error("Invalid transaction date '{value}', expected YYYY-MM-DD")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("Invalid quantity '{value}' in <{field}>")]
    InvalidQuantity { field: &'static str, value: String },
    #[error("Running position overflowed after adding {quantity}")]
    PositionOverflow { quantity: Decimal },
    #[error("Running position {value} does not fit in <F8> with eight decimals")]
    PositionOutOfRange { value: Decimal },
}

/// Errors produced while loading, merging or writing reports.
#[derive(Error, Debug)]
pub enum MergeError {
    #[error(transparent)]
    Xml(#[from] edavki_xml::Error),
    #[error("Failed to merge rows of security {code}")]
    Row {
        code: String,
        #[source]
        source: RowError,
    },
    #[error("Failed to parse merge config: {0}")]
    Config(#[from] toml::de::Error),
    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
