//! Restorable enrollment state
//!
//! Only the stage and the serialized first pattern survive a restart. Grid
//! size and minimum length come back from configuration.

use crate::error::EnrollError;
use crate::stage::Stage;
use serde::{Deserialize, Serialize};

/// Snapshot of an enrollment in progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSession {
    /// Stage at the time of saving
    pub stage: Stage,
    /// Codec output of the first pattern, if one was accepted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_pattern: Option<String>,
}

impl SavedSession {
    /// Encode as JSON
    ///
    /// # Errors
    /// Returns [`EnrollError::InvalidSession`] if encoding fails
    pub fn to_json(&self) -> Result<String, EnrollError> {
        serde_json::to_string(self).map_err(|e| EnrollError::InvalidSession(e.to_string()))
    }

    /// Decode from JSON
    ///
    /// # Errors
    /// Returns [`EnrollError::InvalidSession`] for malformed input
    pub fn from_json(json: &str) -> Result<Self, EnrollError> {
        serde_json::from_str(json).map_err(|e| EnrollError::InvalidSession(e.to_string()))
    }

    /// Check the stage/first-pattern pairing
    ///
    /// # Errors
    /// Returns [`EnrollError::InvalidSession`] if the stage needs a first
    /// pattern and none was saved
    pub fn validate(&self) -> Result<(), EnrollError> {
        if self.stage.requires_first_pattern() && self.first_pattern.is_none() {
            return Err(EnrollError::InvalidSession(format!(
                "stage {} saved without a first pattern",
                self.stage
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_shape() {
        let session = SavedSession { stage: Stage::NeedToConfirm, first_pattern: Some("0125".into()) };
        let json = session.to_json().unwrap();
        assert_eq!(json, r#"{"stage":"NeedToConfirm","first_pattern":"0125"}"#);
        assert_eq!(SavedSession::from_json(&json).unwrap(), session);
    }

    #[test]
    fn absent_first_pattern() {
        let session = SavedSession::from_json(r#"{"stage":"Introduction"}"#).unwrap();
        assert_eq!(session.first_pattern, None);
        assert!(session.validate().is_ok());
    }

    #[test]
    fn rejects_confirmation_without_first_pattern() {
        let session = SavedSession { stage: Stage::ConfirmWrong, first_pattern: None };
        assert!(matches!(session.validate(), Err(EnrollError::InvalidSession(_))));
        assert!(SavedSession::from_json(r#"{"stage":"Nowhere"}"#).is_err());
    }
}
