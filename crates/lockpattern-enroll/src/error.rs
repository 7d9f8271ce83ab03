//! Error types for enrollment
//!
//! Too-short patterns and confirmation mismatches are ordinary stage
//! transitions, not errors. What remains here is:
//! - Programming errors in driving the workflow (fatal)
//! - Credential storage failures (caller may retry)
//! - Corrupt persisted input

use crate::stage::Stage;
use lockpattern_core::{ConfigError, PatternError};
use thiserror::Error;

/// Credential store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failed
    #[error("credential store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Record could not be encoded or decoded
    #[error("credential record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Record decoded but is unusable
    #[error("credential record corrupt: {0}")]
    Corrupt(String),

    /// Store refused the operation
    #[error("credential store unavailable: {0}")]
    Unavailable(String),
}

/// Enrollment errors
#[derive(Debug, Error)]
pub enum EnrollError {
    /// A completed pattern arrived in a stage that does not accept input
    #[error("illegal transition: pattern completed in stage {stage}")]
    IllegalTransition {
        /// Stage the workflow was in
        stage: Stage,
    },

    /// A confirmation stage was reached without a first pattern
    #[error("no first pattern recorded in stage {stage}")]
    MissingFirstPattern {
        /// Stage the workflow was in
        stage: Stage,
    },

    /// Persisting the credential failed; the workflow stays in
    /// `ChoiceConfirmed` until the caller retries
    #[error("credential storage failed: {0}")]
    StorageFailure(#[from] StoreError),

    /// Pattern could not be encoded or decoded
    #[error("pattern error: {0}")]
    Pattern(#[from] PatternError),

    /// Restored session is inconsistent
    #[error("invalid saved session: {0}")]
    InvalidSession(String),

    /// Configuration rejected
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl EnrollError {
    /// Programming errors that must not be recovered from
    #[inline]
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::IllegalTransition { .. } | Self::MissingFirstPattern { .. }
        )
    }

    /// Errors the caller can act on by retrying
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageFailure(_))
    }
}

/// Report a fatal workflow error
///
/// Panics under the `strict-debug` feature; otherwise logs and hands the
/// error back for the caller to propagate.
pub(crate) fn fatal(error: EnrollError) -> EnrollError {
    tracing::error!(%error, "fatal enrollment error");

    #[cfg(feature = "strict-debug")]
    panic!("fatal enrollment error: {error}");

    error
}
