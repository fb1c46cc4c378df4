// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Error types for telemetry conversion.
//!
//! Covers the whole conversion taxonomy:
//! - Instrument / file identification
//! - Schema resolution and byte-layout mismatches
//! - Reduction stage ordering (level 0 -> 1 -> 2)
//! - Output file collisions
//!
//! A conversion either fully succeeds and produces one complete output, or
//! fails with one of these errors and produces none. Nothing here is
//! retryable.

use std::fmt;
use std::path::PathBuf;

/// Errors that can occur while converting instrument data.
#[derive(Debug, Clone)]
pub enum ConvertError {
    /// Instrument name is not one of the supported instruments
    InvalidInstrument {
        /// Name as given by the caller
        name: String,
    },

    /// File does not match any known file type for the stated instrument
    InvalidFileType {
        /// Path or name of the offending file
        file: String,
        /// Instrument the file was opened as
        instrument: String,
    },

    /// Input file does not exist
    FileNotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// No schema resolves for the instrument / file type / date combination
    SchemaNotFound {
        /// Instrument the lookup was for
        instrument: String,
        /// File type or role tag
        file_type: String,
        /// Effective date used for validity-window matching
        date: String,
    },

    /// File name does not follow the documented naming convention
    InvalidFileName {
        /// The offending file name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// Byte source does not match the layout the schema implies
    SchemaMismatch {
        /// What was being decoded
        context: String,
        /// Error message
        message: String,
    },

    /// Time column has no non-zero entry to derive a span from
    EmptyTimeColumn {
        /// Name of the time column
        column: String,
    },

    /// A reduction step was invoked on data not at the expected prior stage
    LevelOrder {
        /// Level that was requested
        requested: u8,
        /// Level the data is currently at
        current: u8,
    },

    /// Output file already exists; refusing to overwrite
    FileAlreadyExists {
        /// Path of the existing file
        path: PathBuf,
    },

    /// Concatenation inputs do not share the same schema / type
    HeterogeneousConcatenation {
        /// Description of the mismatch
        reason: String,
    },

    /// Underlying I/O failure
    Io {
        /// What was being done
        context: String,
        /// Error message
        message: String,
    },
}

impl ConvertError {
    /// Create an invalid-instrument error.
    pub fn invalid_instrument(name: impl Into<String>) -> Self {
        ConvertError::InvalidInstrument { name: name.into() }
    }

    /// Create an invalid-file-type error.
    pub fn invalid_file_type(file: impl Into<String>, instrument: impl Into<String>) -> Self {
        ConvertError::InvalidFileType {
            file: file.into(),
            instrument: instrument.into(),
        }
    }

    /// Create a file-not-found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        ConvertError::FileNotFound { path: path.into() }
    }

    /// Create a schema-not-found error.
    pub fn schema_not_found(
        instrument: impl Into<String>,
        file_type: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        ConvertError::SchemaNotFound {
            instrument: instrument.into(),
            file_type: file_type.into(),
            date: date.into(),
        }
    }

    /// Create an invalid-file-name error.
    pub fn invalid_file_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConvertError::InvalidFileName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a schema-mismatch error.
    pub fn schema_mismatch(context: impl Into<String>, message: impl Into<String>) -> Self {
        ConvertError::SchemaMismatch {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create an empty-time-column error.
    pub fn empty_time_column(column: impl Into<String>) -> Self {
        ConvertError::EmptyTimeColumn {
            column: column.into(),
        }
    }

    /// Create a level-ordering error.
    pub fn level_order(requested: u8, current: u8) -> Self {
        ConvertError::LevelOrder { requested, current }
    }

    /// Create a file-already-exists error.
    pub fn file_already_exists(path: impl Into<PathBuf>) -> Self {
        ConvertError::FileAlreadyExists { path: path.into() }
    }

    /// Create a heterogeneous-concatenation error.
    pub fn heterogeneous(reason: impl Into<String>) -> Self {
        ConvertError::HeterogeneousConcatenation {
            reason: reason.into(),
        }
    }

    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, message: impl Into<String>) -> Self {
        ConvertError::Io {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            ConvertError::InvalidInstrument { name } => vec![("instrument", name.clone())],
            ConvertError::InvalidFileType { file, instrument } => {
                vec![("file", file.clone()), ("instrument", instrument.clone())]
            }
            ConvertError::FileNotFound { path } => {
                vec![("path", path.display().to_string())]
            }
            ConvertError::SchemaNotFound {
                instrument,
                file_type,
                date,
            } => vec![
                ("instrument", instrument.clone()),
                ("file_type", file_type.clone()),
                ("date", date.clone()),
            ],
            ConvertError::InvalidFileName { name, reason } => {
                vec![("name", name.clone()), ("reason", reason.clone())]
            }
            ConvertError::SchemaMismatch { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            ConvertError::EmptyTimeColumn { column } => vec![("column", column.clone())],
            ConvertError::LevelOrder { requested, current } => vec![
                ("requested", requested.to_string()),
                ("current", current.to_string()),
            ],
            ConvertError::FileAlreadyExists { path } => {
                vec![("path", path.display().to_string())]
            }
            ConvertError::HeterogeneousConcatenation { reason } => {
                vec![("reason", reason.clone())]
            }
            ConvertError::Io { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::InvalidInstrument { name } => {
                write!(f, "Invalid instrument: {name}")
            }
            ConvertError::InvalidFileType { file, instrument } => {
                write!(
                    f,
                    "Invalid file type for '{file}' from instrument {instrument}"
                )
            }
            ConvertError::FileNotFound { path } => {
                write!(f, "File not found: {}", path.display())
            }
            ConvertError::SchemaNotFound {
                instrument,
                file_type,
                date,
            } => write!(
                f,
                "No schema resolves for instrument {instrument}, file type {file_type}, date {date}"
            ),
            ConvertError::InvalidFileName { name, reason } => {
                write!(f, "Invalid file name '{name}': {reason}")
            }
            ConvertError::SchemaMismatch { context, message } => {
                write!(f, "Schema mismatch in {context}: {message}")
            }
            ConvertError::EmptyTimeColumn { column } => {
                write!(f, "Time column '{column}' has no valid (non-zero) entries")
            }
            ConvertError::LevelOrder { requested, current } => write!(
                f,
                "Cannot produce level {requested} from data at level {current}"
            ),
            ConvertError::FileAlreadyExists { path } => {
                write!(f, "File {} already exists", path.display())
            }
            ConvertError::HeterogeneousConcatenation { reason } => {
                write!(f, "Cannot concatenate objects of different types: {reason}")
            }
            ConvertError::Io { context, message } => {
                write!(f, "I/O error in {context}: {message}")
            }
        }
    }
}

impl std::error::Error for ConvertError {}

impl From<std::io::Error> for ConvertError {
    fn from(err: std::io::Error) -> Self {
        ConvertError::Io {
            context: "IO".to_string(),
            message: err.to_string(),
        }
    }
}

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;
