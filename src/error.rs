//! Error types for the rank engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the tenure and pay-step calculations can report.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The main error type for the rank engine.
///
/// Calculation-layer variants (`DateInvalid`, `CareerDataInvalid`,
/// `AssignmentDataInvalid`, `RankCalculationError`) are recoverable at the
/// aggregator boundary. `Unauthorized` is the only variant that must reach
/// the user.
///
/// # Example
///
/// ```
/// use rank_engine::error::EngineError;
///
/// let error = EngineError::DateInvalid {
///     input: "2024-02-30".to_string(),
///     message: "day out of range".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid date '2024-02-30': day out of range");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A date string did not parse as a valid calendar date.
    #[error("Invalid date '{input}': {message}")]
    DateInvalid {
        /// The offending input.
        input: String,
        /// A description of the parse failure.
        message: String,
    },

    /// A prior-career record carried an out-of-range rate or weekly hours.
    #[error("Invalid career data '{field}': {message}")]
    CareerDataInvalid {
        /// The field that was out of range.
        field: String,
        /// A description of the problem.
        message: String,
    },

    /// Assignments were missing start dates, ran backwards, or overlapped.
    #[error("Invalid assignment '{assignment_id}': {message}")]
    AssignmentDataInvalid {
        /// The ID of the assignment that failed validation.
        assignment_id: String,
        /// A description of the problem.
        message: String,
    },

    /// Start rank, first-upgrade date and target date are inconsistent.
    #[error("Rank calculation error: {message}")]
    RankCalculationError {
        /// A description of the inconsistency.
        message: String,
    },

    /// An employee record was invalid or could not be normalized.
    #[error("Invalid employee field '{field}': {message}")]
    InvalidEmployee {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The remote calculation service could not be reached or failed.
    #[error("Remote calculation unavailable: {message}")]
    RemoteUnavailable {
        /// A description of the transport or server failure.
        message: String,
    },

    /// The remote calculation service rejected our credentials.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// The message returned by the server.
        message: String,
    },
}

/// Discriminant of an [`EngineError`], used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// See [`EngineError::DateInvalid`].
    DateInvalid,
    /// See [`EngineError::CareerDataInvalid`].
    CareerDataInvalid,
    /// See [`EngineError::AssignmentDataInvalid`].
    AssignmentDataInvalid,
    /// See [`EngineError::RankCalculationError`].
    RankCalculationError,
    /// See [`EngineError::InvalidEmployee`].
    InvalidEmployee,
    /// Configuration could not be found or parsed.
    ConfigError,
    /// See [`EngineError::RemoteUnavailable`].
    RemoteUnavailable,
    /// See [`EngineError::Unauthorized`].
    Unauthorized,
}

impl ErrorKind {
    /// The wire code, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::DateInvalid => "DATE_INVALID",
            ErrorKind::CareerDataInvalid => "CAREER_DATA_INVALID",
            ErrorKind::AssignmentDataInvalid => "ASSIGNMENT_DATA_INVALID",
            ErrorKind::RankCalculationError => "RANK_CALCULATION_ERROR",
            ErrorKind::InvalidEmployee => "INVALID_EMPLOYEE",
            ErrorKind::ConfigError => "CONFIG_ERROR",
            ErrorKind::RemoteUnavailable => "REMOTE_UNAVAILABLE",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
        }
    }
}

impl EngineError {
    /// Returns the discriminant for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::DateInvalid { .. } => ErrorKind::DateInvalid,
            EngineError::CareerDataInvalid { .. } => ErrorKind::CareerDataInvalid,
            EngineError::AssignmentDataInvalid { .. } => ErrorKind::AssignmentDataInvalid,
            EngineError::RankCalculationError { .. } => ErrorKind::RankCalculationError,
            EngineError::InvalidEmployee { .. } => ErrorKind::InvalidEmployee,
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ErrorKind::ConfigError
            }
            EngineError::RemoteUnavailable { .. } => ErrorKind::RemoteUnavailable,
            EngineError::Unauthorized { .. } => ErrorKind::Unauthorized,
        }
    }

    /// Returns true for errors the aggregator may absorb by falling back to
    /// stored values.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::DateInvalid
                | ErrorKind::CareerDataInvalid
                | ErrorKind::AssignmentDataInvalid
                | ErrorKind::RankCalculationError
        )
    }

    pub(crate) fn date_invalid(input: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::DateInvalid {
            input: input.into(),
            message: message.into(),
        }
    }

    pub(crate) fn rank(message: impl Into<String>) -> Self {
        EngineError::RankCalculationError {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
