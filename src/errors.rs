use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::csv::CsvError;
use crate::source::Dataset;

#[derive(Error, Debug)]
pub enum PulseError {
    #[error("Pulse error: {0}")]
    Generic(String),
    #[error(transparent)]
    Expected(#[from] PulseExpectedError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that arise in normal operation against imperfect data or configuration. These are
/// surfaced to the operator as plain messages; anything else escaping the crate is a bug.
#[derive(Error, Debug)]
pub enum PulseExpectedError {
    #[error("{0}")]
    Generic(String),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("No artists found in the catalog")]
    NoArtists,
    #[error("Artist does not exist: {id}")]
    ArtistDoesNotExist { id: String },
}

/// A dataset could not be loaded or decoded. Terminal for the requesting page: the caller
/// surfaces it and must not render partial data.
#[derive(Error, Debug)]
#[error("Failed to load dataset {dataset}: {kind}")]
pub struct LoadError {
    pub dataset: Dataset,
    pub kind: LoadErrorKind,
}

#[derive(Error, Debug)]
pub enum LoadErrorKind {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Malformed(#[from] CsvError),
    #[error("row {row}: invalid {column}: {message}")]
    InvalidValue { row: usize, column: &'static str, message: String },
}

/// A required column is absent from a dataset. A conforming source never produces this; it
/// indicates a broken data contract, not bad row content.
#[derive(Error, Debug)]
#[error("Dataset {dataset} is missing required column: {column}")]
pub struct SchemaError {
    pub dataset: Dataset,
    pub column: &'static str,
}

impl From<LoadError> for PulseError {
    fn from(err: LoadError) -> PulseError {
        PulseError::Expected(err.into())
    }
}

impl From<SchemaError> for PulseError {
    fn from(err: SchemaError) -> PulseError {
        PulseError::Expected(err.into())
    }
}

impl From<ConfigError> for PulseError {
    fn from(err: ConfigError) -> PulseError {
        PulseError::Expected(err.into())
    }
}

pub type Result<T> = std::result::Result<T, PulseError>;
