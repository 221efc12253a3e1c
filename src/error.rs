//! Error types for loading and analysing the title catalog.

use polars::prelude::PolarsError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or projecting the CSV through polars failed.
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV lacks a column the analyses need.
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    /// A non-nullable field is empty.
    #[error("row {row}: '{column}' is empty")]
    MissingValue { column: &'static str, row: usize },

    #[error("row {row}: unknown title type '{value}' (expected MOVIE or SHOW)")]
    UnknownKind { row: usize, value: String },

    /// `production_countries` is not a list literal of quoted strings.
    #[error("row {row}: cannot parse production countries {value:?}")]
    CountryList { row: usize, value: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),
}
