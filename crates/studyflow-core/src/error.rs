//! Core error types for studyflow-core.
//!
//! The interval, priority, routine and composer operations are total over
//! well-formed inputs and do not produce runtime errors; the only failure
//! surfaces are block construction (`end <= start`) and the optimizer bridge,
//! which translates raw subprocess failures into [`EngineError`].

use thiserror::Error;

/// Invariant violation when constructing a time interval.
///
/// Treated as a precondition failure at the call site, not a recoverable
/// runtime condition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    /// End of the interval is not after its start
    #[error("invalid time range: end ({end}) must be greater than start ({start})")]
    InvalidTimeRange {
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },
}

/// Failure taxonomy for the external optimizer engine.
///
/// The bridge is the sole translator from raw process failures into these
/// kinds; nothing in this crate retries automatically.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Optimizer executable is missing from the configured path
    #[error("optimizer engine not found at: {path}")]
    EngineNotFound { path: std::path::PathBuf },

    /// The engine exceeded the configured deadline and was terminated
    #[error("optimizer exceeded the {timeout_secs:.1}s time limit")]
    Timeout { timeout_secs: f64 },

    /// The engine reported memory exhaustion
    #[error("optimizer ran out of memory")]
    Memory,

    /// Engine output did not match the response schema
    #[error("failed to parse optimizer output: {message}")]
    ParseError {
        message: String,
        /// First 500 characters of the raw output, for diagnostics
        raw_output: String,
    },

    /// The engine reported that no feasible placement exists
    #[error("no valid schedule placement exists for the given tasks")]
    NoSolution,

    /// Anything else, including non-JSON stderr from the engine
    #[error("optimizer failed: {message}")]
    Unknown { message: String },
}

impl EngineError {
    /// Human-readable recovery suggestion for each failure kind.
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::EngineNotFound { .. } => {
                "Ensure the optimizer engine is built and its path is configured."
            }
            Self::Timeout { .. } => "Try reducing the number of tasks or days to optimize.",
            Self::Memory => "Try reducing the number of tasks.",
            Self::ParseError { .. } => "Check the optimizer engine build for errors.",
            Self::NoSolution => "Try removing some tasks or extending deadlines.",
            Self::Unknown { .. } => "Check the optimizer engine logs and retry.",
        }
    }
}

/// Result type alias for bridge operations
pub type EngineResult<T> = std::result::Result<T, EngineError>;
