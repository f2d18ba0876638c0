//! Error types for alog parsing and series queries.

use thiserror::Error;

/// The main error type for all alog operations.
///
/// This enum covers every failure that can surface to a caller, from reading
/// the source file through to querying a finished store.
#[derive(Error, Debug)]
pub enum AlogError {
    /// Error while reading or parsing an alog source.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error while querying a built store.
    #[error("query error: {0}")]
    Query(#[from] QueryError),

    /// Error while loading parse options.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors that can occur while building a store from an alog source.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The source could not be opened or read.
    #[error("failed to read alog source '{path}': {source}")]
    SourceUnreadable {
        /// The path (or reader label) that could not be read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A LOGSTART header is missing its start time or the field is not numeric.
    #[error("malformed LOGSTART header on line {line}: {reason}")]
    MalformedHeader {
        /// 1-based line number of the header.
        line: usize,
        /// Description of what was wrong with the header.
        reason: String,
    },

    /// A data record's timestamp field is not a number.
    #[error("invalid timestamp '{field}' on line {line}")]
    InvalidTimestamp {
        /// 1-based line number of the record.
        line: usize,
        /// The offending timestamp field.
        field: String,
    },
}

/// Errors that can occur when querying a built store.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The variable never appeared in the source (or was filtered out).
    #[error("unknown variable '{name}'")]
    UnknownVariable {
        /// The requested variable name.
        name: String,
    },

    /// A stored value could not be converted to the requested type.
    #[error("values of '{name}' cannot be converted to {target}: '{value}'")]
    ConversionFailure {
        /// The variable being converted.
        name: String,
        /// Name of the requested target type.
        target: &'static str,
        /// The first stored value that failed to convert.
        value: String,
    },

    /// A multi-variable query was given no variable names.
    #[error("at least one variable name is required")]
    EmptySelection,
}

/// Errors that can occur when loading [`ParseOptions`](crate::options::ParseOptions).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the options file.
    #[error("failed to load options from '{}': {source}", path.display())]
    Load {
        /// The options file path.
        path: std::path::PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the options file as JSON.
    #[error("failed to parse options from '{}': {source}", path.display())]
    Parse {
        /// The options file path.
        path: std::path::PathBuf,
        /// The underlying JSON parsing error.
        #[source]
        source: serde_json::Error,
    },
}

/// Type alias for `Result<T, AlogError>`.
pub type Result<T> = std::result::Result<T, AlogError>;
