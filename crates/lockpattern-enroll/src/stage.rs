//! Enrollment stages
//!
//! Each [`Stage`] fixes the header shown to the user, both button modes and
//! whether the grid accepts new gestures. The table is static; only the
//! too-short header carries a value (the configured minimum).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named step of the enrollment workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Waiting for the first pattern
    Introduction,
    /// Showing how to draw a pattern
    HelpScreen,
    /// Last attempt was shorter than the minimum
    ChoiceTooShort,
    /// First pattern accepted, about to ask for confirmation
    FirstChoiceValid,
    /// Waiting for the pattern to be drawn again
    NeedToConfirm,
    /// Confirmation did not match the first pattern
    ConfirmWrong,
    /// Confirmation matched; credential is (being) persisted
    ChoiceConfirmed,
}

impl Stage {
    /// Every stage in workflow order
    pub const ALL: [Self; 7] = [
        Self::Introduction,
        Self::HelpScreen,
        Self::ChoiceTooShort,
        Self::FirstChoiceValid,
        Self::NeedToConfirm,
        Self::ConfirmWrong,
        Self::ChoiceConfirmed,
    ];

    /// Whether new gestures are accepted
    #[inline]
    #[must_use]
    pub fn accepts_input(self) -> bool {
        matches!(
            self,
            Self::Introduction | Self::ChoiceTooShort | Self::NeedToConfirm | Self::ConfirmWrong
        )
    }

    /// Whether the stage is only reachable with a first pattern recorded
    #[inline]
    #[must_use]
    pub fn requires_first_pattern(self) -> bool {
        matches!(
            self,
            Self::FirstChoiceValid | Self::NeedToConfirm | Self::ConfirmWrong | Self::ChoiceConfirmed
        )
    }

    /// Whether a completed gesture is compared against the first pattern
    #[inline]
    #[must_use]
    pub fn is_confirming(self) -> bool {
        matches!(self, Self::NeedToConfirm | Self::ConfirmWrong)
    }

    /// Presentation for this stage
    #[must_use]
    pub fn descriptor(self, min_pattern_len: usize) -> StageDescriptor {
        use LeftButtonMode as L;
        use RightButtonMode as R;

        let (header, left, right) = match self {
            Self::Introduction => (HeaderMessage::RecordingIntro, L::Cancel, R::ContinueDisabled),
            Self::HelpScreen => (HeaderMessage::HowToRecord, L::Gone, R::Ok),
            Self::ChoiceTooShort => (
                HeaderMessage::TooShort { min: min_pattern_len },
                L::Retry,
                R::ContinueDisabled,
            ),
            Self::FirstChoiceValid => (HeaderMessage::PatternEntered, L::Retry, R::Continue),
            Self::NeedToConfirm => (HeaderMessage::NeedToConfirm, L::Cancel, R::ConfirmDisabled),
            Self::ConfirmWrong => (HeaderMessage::ConfirmWrong, L::Cancel, R::ConfirmDisabled),
            Self::ChoiceConfirmed => (HeaderMessage::PatternConfirmed, L::Cancel, R::Confirm),
        };
        StageDescriptor {
            stage: self,
            header,
            left,
            right,
            input_enabled: self.accepts_input(),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Header text shown above the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderMessage {
    /// Prompt for a new pattern
    RecordingIntro,
    /// Shown while a gesture is being drawn
    RecordingInProgress,
    /// Help title
    HowToRecord,
    /// Pattern rejected for length
    TooShort {
        /// Configured minimum
        min: usize,
    },
    /// First pattern accepted
    PatternEntered,
    /// Prompt to draw the pattern again
    NeedToConfirm,
    /// Confirmation mismatch
    ConfirmWrong,
    /// Pattern confirmed
    PatternConfirmed,
}

impl fmt::Display for HeaderMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RecordingIntro => f.write_str("Draw an unlock pattern"),
            Self::RecordingInProgress => f.write_str("Release finger when done"),
            Self::HowToRecord => f.write_str("How to draw an unlock pattern"),
            Self::TooShort { min } => write!(f, "Connect at least {min} dots. Try again."),
            Self::PatternEntered => f.write_str("Pattern recorded"),
            Self::NeedToConfirm => f.write_str("Draw pattern again to confirm"),
            Self::ConfirmWrong => f.write_str("Patterns don't match. Try again."),
            Self::PatternConfirmed => f.write_str("Your new unlock pattern"),
        }
    }
}

/// Left button presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeftButtonMode {
    /// Abandon enrollment
    Cancel,
    /// Cancel shown but inactive
    CancelDisabled,
    /// Discard the first pattern and start over
    Retry,
    /// Retry shown but inactive
    RetryDisabled,
    /// Hidden
    Gone,
}

impl LeftButtonMode {
    /// Whether the button is visible and active
    #[inline]
    #[must_use]
    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Cancel | Self::Retry)
    }
}

/// Right button presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RightButtonMode {
    /// Advance to confirmation
    Continue,
    /// Continue shown but inactive
    ContinueDisabled,
    /// Finish enrollment
    Confirm,
    /// Confirm shown but inactive
    ConfirmDisabled,
    /// Dismiss help
    Ok,
}

impl RightButtonMode {
    /// Whether the button is active
    #[inline]
    #[must_use]
    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Continue | Self::Confirm | Self::Ok)
    }
}

/// Everything a screen needs to present one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StageDescriptor {
    /// Stage described
    pub stage: Stage,
    /// Header text
    pub header: HeaderMessage,
    /// Left button
    pub left: LeftButtonMode,
    /// Right button
    pub right: RightButtonMode,
    /// Whether new gestures are accepted
    pub input_enabled: bool,
}
