//! Guide entry point
//!
//! Choosing to set up a pattern from the guide screen drops any enrolled
//! credential before enrollment starts.

use crate::error::EnrollError;
use crate::store::CredentialStore;
use crate::workflow::EnrollmentWorkflow;
use lockpattern_core::{LockPatternConfig, Viewport};

/// Starts enrollment from the guide screen
#[derive(Debug, Clone)]
pub struct GuideFlow {
    config: LockPatternConfig,
    viewport: Viewport,
}

impl GuideFlow {
    /// Guide for the given configuration and grid area
    #[must_use]
    pub fn new(config: LockPatternConfig, viewport: Viewport) -> Self {
        Self { config, viewport }
    }

    /// Clear the stored credential and begin a fresh enrollment
    ///
    /// # Errors
    /// Returns [`EnrollError::StorageFailure`] if the credential cannot be
    /// cleared; no workflow is started in that case
    pub fn start<S: CredentialStore>(&self, mut store: S) -> Result<EnrollmentWorkflow<S>, EnrollError> {
        store.clear()?;
        tracing::info!("existing credential cleared, starting enrollment");
        EnrollmentWorkflow::new(self.config.clone(), self.viewport, store)
    }
}
