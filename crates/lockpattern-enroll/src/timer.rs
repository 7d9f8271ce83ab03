//! Single-slot deferred timers
//!
//! The workflow never sleeps. Entering a stage that needs a delay arms one
//! timer in the slot, replacing whatever was there; an executor (see
//! [`EnrollmentDriver`](crate::EnrollmentDriver)) waits out the delay and
//! hands the id back. Only the currently armed id is honoured.

use std::fmt;
use std::time::Duration;

/// Identity of one armed timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Raw id
    #[inline]
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// What happens when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerAction {
    /// Clear a rejected pattern
    ClearPattern,
    /// Move from the accepted first choice to confirmation
    AdvanceToConfirm,
    /// Leave the flow after the credential was saved
    Finish,
}

/// A pending timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmedTimer {
    /// Id to hand back to `fire_timer`
    pub id: TimerId,
    /// Action applied on expiry
    pub action: TimerAction,
    /// Delay from arming
    pub delay: Duration,
}

#[derive(Debug, Default)]
pub(crate) struct TimerSlot {
    next: u64,
    armed: Option<ArmedTimer>,
}

impl TimerSlot {
    /// Arm a timer, cancelling the pending one
    pub(crate) fn arm(&mut self, action: TimerAction, delay: Duration) -> ArmedTimer {
        self.cancel();
        self.next += 1;
        let timer = ArmedTimer { id: TimerId(self.next), action, delay };
        tracing::debug!(id = %timer.id, ?action, ?delay, "timer armed");
        self.armed = Some(timer);
        timer
    }

    pub(crate) fn cancel(&mut self) -> Option<ArmedTimer> {
        let cancelled = self.armed.take();
        if let Some(timer) = &cancelled {
            tracing::debug!(id = %timer.id, action = ?timer.action, "timer cancelled");
        }
        cancelled
    }

    /// Cancel only if the pending timer performs `action`
    pub(crate) fn cancel_action(&mut self, action: TimerAction) -> Option<ArmedTimer> {
        if self.armed.is_some_and(|t| t.action == action) {
            self.cancel()
        } else {
            None
        }
    }

    /// Consume the pending timer if it is `id`
    pub(crate) fn take(&mut self, id: TimerId) -> Option<ArmedTimer> {
        if self.armed.is_some_and(|t| t.id == id) {
            self.armed.take()
        } else {
            None
        }
    }

    pub(crate) fn armed(&self) -> Option<ArmedTimer> {
        self.armed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arming_replaces_pending() {
        let mut slot = TimerSlot::default();
        let first = slot.arm(TimerAction::ClearPattern, Duration::from_millis(10));
        let second = slot.arm(TimerAction::AdvanceToConfirm, Duration::from_millis(10));
        assert_ne!(first.id, second.id);
        assert_eq!(slot.armed(), Some(second));
        assert!(slot.take(first.id).is_none());
        assert_eq!(slot.take(second.id), Some(second));
        assert!(slot.armed().is_none());
    }

    #[test]
    fn cancel_action_is_selective() {
        let mut slot = TimerSlot::default();
        slot.arm(TimerAction::Finish, Duration::ZERO);
        assert!(slot.cancel_action(TimerAction::ClearPattern).is_none());
        assert!(slot.armed().is_some());
        assert!(slot.cancel_action(TimerAction::Finish).is_some());
        assert!(slot.armed().is_none());
    }

    #[test]
    fn ids_never_repeat_after_cancel() {
        let mut slot = TimerSlot::default();
        let a = slot.arm(TimerAction::ClearPattern, Duration::ZERO);
        slot.cancel();
        let b = slot.arm(TimerAction::ClearPattern, Duration::ZERO);
        assert!(b.id > a.id);
    }
}
