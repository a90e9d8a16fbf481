//! Error handling for StampKit
//!
//! Provides the error types for every stage of a stamping run:
//! - Configuration errors (missing files, invalid fields)
//! - Layout errors (content that cannot be placed on the page)
//! - Layout overrun errors (a packing loop exceeded its iteration guard)
//!
//! None of these are transient, so nothing is ever retried. Every variant
//! carries enough context (symbol, row index, file path) to fix the inputs.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Configuration error type
///
/// Raised while loading or validating configuration, font and content files,
/// before any layout work starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A required input file does not exist
    #[error("Missing file: {path}")]
    MissingFile {
        /// Path of the missing file.
        path: String,
    },

    /// A file exists but could not be read or parsed
    #[error("Invalid file {path}: {reason}")]
    InvalidFile {
        /// Path of the offending file.
        path: String,
        /// Parser or I/O message.
        reason: String,
    },

    /// A file extension that no loader understands
    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat {
        /// The extension that was found.
        extension: String,
    },

    /// A field holds a value outside its valid range
    #[error("Invalid value for '{field}': {reason}")]
    InvalidField {
        /// Dotted field name, e.g. `border.left`.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The ink pad cannot hold the whole stamp footprint
    #[error("Ink pad {pad_width:.1} x {pad_height:.1} mm is too small for a {stamp_width:.1} x {stamp_height:.1} mm stamp")]
    InkPadTooSmall {
        /// Pad width in mm.
        pad_width: f64,
        /// Pad height in mm.
        pad_height: f64,
        /// Stamp footprint width in mm.
        stamp_width: f64,
        /// Stamp footprint height in mm.
        stamp_height: f64,
    },
}

/// Layout error type
///
/// Raised when content cannot be fitted onto the page under the requested
/// constraints.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Content uses a symbol the glyph table does not know
    #[error("No glyph metric for symbol '{symbol}'")]
    MissingMetric {
        /// The unknown symbol.
        symbol: String,
    },

    /// A single token is wider than the printable row
    #[error("Token '{token}' is {width:.2} mm wide but rows are only {usable:.2} mm")]
    TokenTooWide {
        /// The token that cannot fit.
        token: String,
        /// Width of the token in mm.
        width: f64,
        /// Usable row width in mm.
        usable: f64,
    },

    /// A forced keyword does not fit in its target row
    #[error("Keyword '{keyword}' needs {needed} placements in row {row} but only {available} exist")]
    KeywordDoesNotFit {
        /// The keyword being inserted.
        keyword: String,
        /// Index of the target row.
        row: usize,
        /// Placements needed (keyword length plus padding).
        needed: usize,
        /// Placements present in the row.
        available: usize,
    },

    /// There is nothing to lay out
    #[error("Empty content: {reason}")]
    EmptyContent {
        /// What was empty.
        reason: String,
    },

    /// The printable area holds no cells or rows
    #[error("Printable area {width:.1} x {height:.1} mm fits no {cell:.1} mm cells")]
    EmptyGrid {
        /// Usable width in mm.
        width: f64,
        /// Usable height in mm.
        height: f64,
        /// Cell or row size in mm.
        cell: f64,
    },
}

/// A packing loop exceeded its iteration guard
///
/// Indicates a degenerate configuration, for example a step size of zero.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Layout stage '{stage}' exceeded {limit} iterations")]
pub struct LayoutOverrunError {
    /// Name of the loop that ran away.
    pub stage: String,
    /// The iteration limit that was hit.
    pub limit: usize,
}

impl LayoutOverrunError {
    /// Create an overrun error for a named stage
    pub fn new(stage: impl Into<String>, limit: usize) -> Self {
        Self {
            stage: stage.into(),
            limit,
        }
    }
}

/// Main error type for StampKit
///
/// A unified error type that can represent any error from all stages.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Layout error
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Layout overrun error
    #[error(transparent)]
    Overrun(#[from] LayoutOverrunError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    /// Check if this is a layout error (including overruns)
    pub fn is_layout_error(&self) -> bool {
        matches!(self, Error::Layout(_) | Error::Overrun(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
