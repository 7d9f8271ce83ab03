//! Tokio timer driver
//!
//! [`EnrollmentDriver`] shares one workflow behind a mutex and turns its
//! armed timer into a sleeping task. After every input the armed timer is
//! reconciled with the spawned task: a changed id aborts the old task and
//! spawns a new one. Reconciling reads the armed timer while holding the
//! pending-task lock, so concurrent callers cannot leave a stale task behind.
//!
//! Tasks hold a [`Weak`] reference and report back through
//! [`EnrollmentWorkflow::fire_timer`], so a task outliving its driver or its
//! timer does nothing.
//!
//! # Example
//!
//! ```rust,no_run
//! use lockpattern_core::{LockPatternConfig, Viewport};
//! use lockpattern_enroll::{EnrollmentDriver, EnrollmentWorkflow, MemoryCredentialStore};
//! use lockpattern_gesture::PointerEvent;
//!
//! # async fn example() -> Result<(), lockpattern_enroll::EnrollError> {
//! let workflow = EnrollmentWorkflow::new(
//!     LockPatternConfig::new(),
//!     Viewport::square(300.0).unwrap(),
//!     MemoryCredentialStore::new(),
//! )?;
//! let driver = EnrollmentDriver::new(workflow);
//! driver.pointer(PointerEvent::Down { x: 50.0, y: 50.0 })?;
//! # Ok(())
//! # }
//! ```

use crate::error::EnrollError;
use crate::stage::Stage;
use crate::store::CredentialStore;
use crate::timer::TimerId;
use crate::workflow::{EnrollmentWorkflow, FlowStatus, WorkflowEvent};
use lockpattern_gesture::PointerEvent;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

struct PendingTimer {
    id: TimerId,
    handle: JoinHandle<()>,
}

struct Shared<S> {
    workflow: Mutex<EnrollmentWorkflow<S>>,
    pending: Mutex<Option<PendingTimer>>,
}

/// Runs a workflow's timers on the current tokio runtime
pub struct EnrollmentDriver<S: CredentialStore + 'static> {
    shared: Arc<Shared<S>>,
}

impl<S: CredentialStore + 'static> EnrollmentDriver<S> {
    /// Take ownership of a workflow
    ///
    /// Timers armed while no tokio runtime is current stay armed but are
    /// never fired.
    #[must_use]
    pub fn new(workflow: EnrollmentWorkflow<S>) -> Self {
        let shared = Arc::new(Shared {
            workflow: Mutex::new(workflow),
            pending: Mutex::new(None),
        });
        sync_timer(&shared);
        Self { shared }
    }

    /// Feed one pointer event
    ///
    /// # Errors
    /// Propagates [`EnrollmentWorkflow::handle_pointer`] errors
    pub fn pointer(&self, event: PointerEvent) -> Result<(), EnrollError> {
        let result = self.shared.workflow.lock().handle_pointer(event);
        sync_timer(&self.shared);
        result
    }

    /// Run `f` against the workflow, then reconcile timers
    ///
    /// Use this for user actions such as `retry` or `retry_save`.
    pub fn with_workflow<R>(&self, f: impl FnOnce(&mut EnrollmentWorkflow<S>) -> R) -> R {
        let out = f(&mut self.shared.workflow.lock());
        sync_timer(&self.shared);
        out
    }

    /// Current stage
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.shared.workflow.lock().stage()
    }

    /// Flow status
    #[must_use]
    pub fn status(&self) -> FlowStatus {
        self.shared.workflow.lock().status()
    }

    /// Take queued notifications
    #[must_use]
    pub fn drain_events(&self) -> Vec<WorkflowEvent> {
        self.shared.workflow.lock().drain_events()
    }

    /// Id of the timer with a sleeping task
    #[must_use]
    pub fn pending_timer(&self) -> Option<TimerId> {
        self.shared.pending.lock().as_ref().map(|p| p.id)
    }

    /// Tear the workflow down and abort the pending task
    pub fn shutdown(&self) {
        self.shared.workflow.lock().teardown();
        abort_pending(&self.shared);
        tracing::debug!("enrollment driver shut down");
    }
}

impl<S: CredentialStore + 'static> Drop for EnrollmentDriver<S> {
    fn drop(&mut self) {
        abort_pending(&self.shared);
    }
}

fn abort_pending<S>(shared: &Shared<S>) {
    if let Some(old) = shared.pending.lock().take() {
        old.handle.abort();
        tracing::trace!(id = %old.id, "timer task aborted");
    }
}

fn sync_timer<S: CredentialStore + 'static>(shared: &Arc<Shared<S>>) {
    // Lock order is pending, then workflow
    let mut pending = shared.pending.lock();
    let armed = shared.workflow.lock().armed_timer();
    if pending.as_ref().map(|p| p.id) == armed.map(|t| t.id) {
        return;
    }
    if let Some(old) = pending.take() {
        old.handle.abort();
        tracing::trace!(id = %old.id, "timer task aborted");
    }
    let Some(timer) = armed else {
        return;
    };
    let Ok(runtime) = Handle::try_current() else {
        tracing::warn!(id = %timer.id, "no tokio runtime; timer will not fire");
        return;
    };

    let weak: Weak<Shared<S>> = Arc::downgrade(shared);
    let handle = runtime.spawn(async move {
        tokio::time::sleep(timer.delay).await;
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let fired = {
            let mut pending = shared.pending.lock();
            if pending.as_ref().is_some_and(|p| p.id == timer.id) {
                pending.take();
            }
            shared.workflow.lock().fire_timer(timer.id)
        };
        if let Err(error) = fired {
            tracing::error!(%error, id = %timer.id, "timer action failed");
        }
        sync_timer(&shared);
    });
    tracing::trace!(id = %timer.id, delay = ?timer.delay, "timer task spawned");
    *pending = Some(PendingTimer { id: timer.id, handle });
}
