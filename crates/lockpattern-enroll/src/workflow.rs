//! Enrollment workflow
//!
//! Walks the user through choosing a pattern and drawing it a second time.
//! The workflow owns the [`GestureRecognizer`] and the [`CredentialStore`];
//! pointer input, user actions and timer expiry are its only inputs.
//!
//! # Stages
//!
//! ```text
//!                  too short                       mismatch
//!              ┌──────────────┐               ┌──────────────┐
//!              ▼              │               ▼              │
//! Introduction ──▶ ChoiceTooShort   NeedToConfirm ──▶ ConfirmWrong
//!      │                │                ▲   │               │
//!      └──── valid ─────┴─▶ FirstChoiceValid ┘   └── match ──▶ ChoiceConfirmed
//!                              (timer / continue)               (save, timer)
//! ```
//!
//! Too-short patterns and mismatches are ordinary transitions. Completing a
//! pattern in a stage that does not take input, or confirming without a first
//! pattern, is a programming error (see [`EnrollError::is_fatal`]).
//!
//! # Timers
//!
//! At most one timer is armed at a time and entering any stage cancels it.
//! The workflow only records the timer; whoever drives it waits out
//! [`ArmedTimer::delay`] and calls [`EnrollmentWorkflow::fire_timer`]. Ids that
//! are no longer armed, or arrive after [`EnrollmentWorkflow::teardown`], are
//! ignored.

use crate::error::{fatal, EnrollError};
use crate::session::SavedSession;
use crate::stage::{HeaderMessage, Stage, StageDescriptor};
use crate::store::CredentialStore;
use crate::timer::{ArmedTimer, TimerAction, TimerId, TimerSlot};
use lockpattern_core::{Cell, Grid, GridSize, LockPatternConfig, Pattern, PatternCodec, PatternError, Viewport};
use lockpattern_gesture::{DisplayMode, GestureEvent, GestureRecognizer, PatternRenderer, PointerEvent};

/// Pattern animated on the help screen
const HELP_DEMO: [(u8, u8); 5] = [(0, 0), (0, 1), (1, 1), (2, 1), (2, 2)];

/// Whether the flow is still running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowStatus {
    /// Accepting input
    Active,
    /// Credential saved and finish delay elapsed
    Completed,
    /// Abandoned by the user or torn down
    Cancelled,
}

/// Notification for UI collaborators, drained with
/// [`EnrollmentWorkflow::drain_events`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    /// A stage was entered
    StageChanged(Stage),
    /// Recognizer output, in occurrence order
    Gesture(GestureEvent),
    /// The small preview pattern changed
    PreviewUpdated(Pattern),
    /// The confirmed credential was persisted
    CredentialSaved,
    /// The flow ended
    Finished(FlowStatus),
}

/// Two-step pattern enrollment
#[derive(Debug)]
pub struct EnrollmentWorkflow<S> {
    config: LockPatternConfig,
    recognizer: GestureRecognizer,
    store: S,
    stage: Stage,
    first_pattern: Option<Pattern>,
    preview: Pattern,
    drawing: bool,
    saved: bool,
    status: FlowStatus,
    timers: TimerSlot,
    outbox: Vec<WorkflowEvent>,
}

impl<S: CredentialStore> EnrollmentWorkflow<S> {
    /// Start a fresh enrollment in [`Stage::Introduction`]
    ///
    /// # Errors
    /// Returns [`EnrollError::Config`] if `config` does not validate
    pub fn new(config: LockPatternConfig, viewport: Viewport, store: S) -> Result<Self, EnrollError> {
        let mut workflow = Self::build(config, viewport, store)?;
        workflow.enter_stage(Stage::Introduction);
        Ok(workflow)
    }

    /// Rebuild a workflow from a saved session
    ///
    /// Entry actions of the saved stage run again, re-arming its timer.
    /// Restoring into [`Stage::ChoiceConfirmed`] does not save; call
    /// [`retry_save`](Self::retry_save).
    ///
    /// # Errors
    /// Returns [`EnrollError::InvalidSession`] if the stage needs a first
    /// pattern that is missing or shorter than the minimum, and
    /// [`EnrollError::Pattern`] if the first pattern does not decode
    pub fn restore(
        config: LockPatternConfig,
        viewport: Viewport,
        store: S,
        saved: &SavedSession,
    ) -> Result<Self, EnrollError> {
        saved.validate()?;
        let mut workflow = Self::build(config, viewport, store)?;

        if saved.stage.requires_first_pattern() {
            let encoded = saved.first_pattern.as_deref().unwrap_or_default();
            let first = PatternCodec::deserialize(encoded, workflow.config.grid_size)?;
            if first.len() < workflow.config.min_pattern_len {
                return Err(EnrollError::InvalidSession(format!(
                    "first pattern of {} cells is below the minimum of {}",
                    first.len(),
                    workflow.config.min_pattern_len
                )));
            }
            workflow.first_pattern = Some(first);
        } else if saved.first_pattern.is_some() {
            tracing::debug!(stage = %saved.stage, "discarding first pattern saved with an input stage");
        }

        tracing::info!(stage = %saved.stage, "enrollment session restored");
        workflow.enter_stage(saved.stage);
        Ok(workflow)
    }

    fn build(config: LockPatternConfig, viewport: Viewport, store: S) -> Result<Self, EnrollError> {
        config.validate()?;
        let grid = config.configure_grid(Grid::new(config.grid_size, viewport));
        Ok(Self {
            recognizer: GestureRecognizer::new(grid),
            preview: Pattern::with_capacity(config.grid_size),
            config,
            store,
            stage: Stage::Introduction,
            first_pattern: None,
            drawing: false,
            saved: false,
            status: FlowStatus::Active,
            timers: TimerSlot::default(),
            outbox: Vec::new(),
        })
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &LockPatternConfig {
        &self.config
    }

    /// Current stage
    #[inline]
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Flow status
    #[inline]
    #[must_use]
    pub fn status(&self) -> FlowStatus {
        self.status
    }

    /// Whether inputs and timers are still honoured
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == FlowStatus::Active
    }

    /// Presentation of the current stage
    ///
    /// The header switches to [`HeaderMessage::RecordingInProgress`] while a
    /// gesture is being drawn.
    #[must_use]
    pub fn descriptor(&self) -> StageDescriptor {
        let mut descriptor = self.stage.descriptor(self.config.min_pattern_len);
        if self.drawing {
            descriptor.header = HeaderMessage::RecordingInProgress;
        }
        descriptor
    }

    /// Accepted first pattern
    #[inline]
    #[must_use]
    pub fn first_pattern(&self) -> Option<&Pattern> {
        self.first_pattern.as_ref()
    }

    /// Pattern shown in the small preview
    #[inline]
    #[must_use]
    pub fn preview(&self) -> &Pattern {
        &self.preview
    }

    /// Whether the credential has been persisted by this workflow
    #[inline]
    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.saved
    }

    /// Recognizer, for rendering state
    #[inline]
    #[must_use]
    pub fn recognizer(&self) -> &GestureRecognizer {
        &self.recognizer
    }

    /// Credential store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Credential store, mutably
    #[inline]
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Pending timer, if any
    #[inline]
    #[must_use]
    pub fn armed_timer(&self) -> Option<ArmedTimer> {
        self.timers.armed()
    }

    /// Attach a renderer to the recognizer
    pub fn set_renderer(&mut self, renderer: impl PatternRenderer + 'static) {
        self.recognizer.set_renderer(renderer);
    }

    /// Take queued notifications
    pub fn drain_events(&mut self) -> Vec<WorkflowEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Feed one pointer event
    ///
    /// # Errors
    /// Returns [`EnrollError::StorageFailure`] if a matching confirmation
    /// could not be saved; the workflow stays in [`Stage::ChoiceConfirmed`].
    /// Fatal errors are returned (or panic under `strict-debug`) for
    /// completions in stages that take no input.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Result<(), EnrollError> {
        if !self.is_active() {
            tracing::trace!(?event, "pointer ignored: workflow inactive");
            return Ok(());
        }
        for gesture in self.recognizer.handle(event) {
            self.on_gesture(gesture)?;
        }
        Ok(())
    }

    /// Apply an expired timer
    ///
    /// Returns `false` without effect if the workflow is inactive or `id` is
    /// not the armed timer.
    ///
    /// # Errors
    /// Fatal if advancing to confirmation without a first pattern
    pub fn fire_timer(&mut self, id: TimerId) -> Result<bool, EnrollError> {
        if !self.is_active() {
            tracing::debug!(%id, "timer ignored: workflow inactive");
            return Ok(false);
        }
        let Some(timer) = self.timers.take(id) else {
            tracing::debug!(%id, "stale timer ignored");
            return Ok(false);
        };

        tracing::debug!(%id, action = ?timer.action, stage = %self.stage, "timer fired");
        match timer.action {
            TimerAction::ClearPattern if self.stage == Stage::ConfirmWrong => {
                self.enter_stage(Stage::NeedToConfirm);
            }
            TimerAction::ClearPattern => self.clear_recognizer(),
            TimerAction::AdvanceToConfirm => self.advance_to_confirm()?,
            TimerAction::Finish => self.finish(FlowStatus::Completed),
        }
        Ok(true)
    }

    /// Show the help screen; only from [`Stage::Introduction`] when idle
    pub fn request_help(&mut self) -> bool {
        if !self.is_active() || self.stage != Stage::Introduction || self.drawing {
            return false;
        }
        self.enter_stage(Stage::HelpScreen);
        true
    }

    /// Leave the help screen for [`Stage::Introduction`]
    pub fn dismiss_help(&mut self) -> bool {
        if !self.is_active() || self.stage != Stage::HelpScreen {
            return false;
        }
        self.enter_stage(Stage::Introduction);
        true
    }

    /// Discard the first pattern and start over
    ///
    /// Available while the left button reads Retry.
    pub fn retry(&mut self) -> bool {
        if !self.is_active() || !matches!(self.stage, Stage::ChoiceTooShort | Stage::FirstChoiceValid) {
            return false;
        }
        self.first_pattern = None;
        self.enter_stage(Stage::Introduction);
        true
    }

    /// Abandon enrollment; the first pattern is discarded and the stage
    /// returns to [`Stage::Introduction`]
    ///
    /// Refused once the credential is saved; the pending finish timer then
    /// completes the flow.
    pub fn cancel(&mut self) -> bool {
        if !self.is_active() || self.saved {
            return false;
        }
        self.first_pattern = None;
        self.enter_stage(Stage::Introduction);
        self.finish(FlowStatus::Cancelled);
        true
    }

    /// Skip the wait after a valid first choice
    ///
    /// # Errors
    /// Fatal if no first pattern is recorded
    pub fn continue_to_confirm(&mut self) -> Result<bool, EnrollError> {
        if !self.is_active() || self.stage != Stage::FirstChoiceValid {
            return Ok(false);
        }
        self.advance_to_confirm()?;
        Ok(true)
    }

    /// Persist the confirmed pattern after a failed or restored save
    ///
    /// Returns `false` outside [`Stage::ChoiceConfirmed`] or once saved.
    ///
    /// # Errors
    /// Returns [`EnrollError::StorageFailure`] if the store fails again
    pub fn retry_save(&mut self) -> Result<bool, EnrollError> {
        if !self.is_active() || self.stage != Stage::ChoiceConfirmed || self.saved {
            return Ok(false);
        }
        tracing::info!("retrying credential save");
        self.persist()?;
        Ok(true)
    }

    /// Deactivate the workflow; later inputs and timers are no-ops
    ///
    /// Stage and first pattern are kept so the session can still be saved.
    pub fn teardown(&mut self) {
        if !self.is_active() {
            return;
        }
        self.timers.cancel();
        self.recognizer.disable_input();
        self.drawing = false;
        self.status = FlowStatus::Cancelled;
        tracing::debug!(stage = %self.stage, "workflow torn down");
    }

    /// Snapshot the restorable state
    ///
    /// # Errors
    /// Returns [`EnrollError::Pattern`] if the first pattern does not encode
    pub fn save_session(&self) -> Result<SavedSession, EnrollError> {
        let first_pattern = self
            .first_pattern
            .as_ref()
            .map(|p| PatternCodec::serialize(p, self.config.grid_size))
            .transpose()?;
        Ok(SavedSession { stage: self.stage, first_pattern })
    }

    fn on_gesture(&mut self, event: GestureEvent) -> Result<(), EnrollError> {
        self.outbox.push(WorkflowEvent::Gesture(event.clone()));
        match event {
            GestureEvent::Started => {
                self.drawing = true;
                self.timers.cancel_action(TimerAction::ClearPattern);
            }
            GestureEvent::CellAdded(_) => {
                if self.stage == Stage::Introduction {
                    let in_progress = self.recognizer.pattern().clone();
                    self.set_preview(in_progress);
                }
            }
            GestureEvent::Cleared => {
                self.drawing = false;
                self.timers.cancel_action(TimerAction::ClearPattern);
            }
            GestureEvent::Completed(pattern) => {
                self.drawing = false;
                return self.on_pattern_detected(pattern);
            }
        }
        Ok(())
    }

    fn on_pattern_detected(&mut self, pattern: Pattern) -> Result<(), EnrollError> {
        tracing::debug!(stage = %self.stage, len = pattern.len(), "pattern detected");
        match self.stage {
            Stage::NeedToConfirm | Stage::ConfirmWrong => {
                let Some(first) = &self.first_pattern else {
                    return Err(fatal(EnrollError::MissingFirstPattern { stage: self.stage }));
                };
                if *first == pattern {
                    self.enter_stage(Stage::ChoiceConfirmed);
                    self.persist()
                } else {
                    self.enter_stage(Stage::ConfirmWrong);
                    Ok(())
                }
            }
            Stage::Introduction | Stage::ChoiceTooShort => {
                if pattern.len() < self.config.min_pattern_len {
                    self.enter_stage(Stage::ChoiceTooShort);
                } else {
                    self.first_pattern = Some(pattern);
                    self.enter_stage(Stage::FirstChoiceValid);
                }
                Ok(())
            }
            stage => Err(fatal(EnrollError::IllegalTransition { stage })),
        }
    }

    fn enter_stage(&mut self, stage: Stage) {
        self.timers.cancel();
        let previous = std::mem::replace(&mut self.stage, stage);
        tracing::info!(from = %previous, to = %stage, "stage transition");
        self.outbox.push(WorkflowEvent::StageChanged(stage));

        if stage.accepts_input() {
            self.recognizer.enable_input();
        } else {
            self.recognizer.disable_input();
        }

        match stage {
            Stage::Introduction => {
                self.clear_recognizer();
                self.set_preview(Pattern::new());
            }
            Stage::HelpScreen => self.show_help(),
            Stage::ChoiceTooShort | Stage::ConfirmWrong => {
                self.recognizer.set_display_mode(DisplayMode::Wrong);
                self.timers.arm(TimerAction::ClearPattern, self.config.clear_delay());
            }
            Stage::FirstChoiceValid => {
                self.timers.arm(TimerAction::AdvanceToConfirm, self.config.confirm_delay());
            }
            Stage::NeedToConfirm => {
                self.clear_recognizer();
                let preview = self.first_pattern.clone().unwrap_or_default();
                self.set_preview(preview);
            }
            Stage::ChoiceConfirmed => {}
        }
    }

    fn advance_to_confirm(&mut self) -> Result<(), EnrollError> {
        if self.first_pattern.is_none() {
            return Err(fatal(EnrollError::MissingFirstPattern { stage: Stage::NeedToConfirm }));
        }
        self.enter_stage(Stage::NeedToConfirm);
        Ok(())
    }

    fn persist(&mut self) -> Result<(), EnrollError> {
        let Some(first) = &self.first_pattern else {
            return Err(fatal(EnrollError::MissingFirstPattern { stage: self.stage }));
        };
        let len = first.len();
        let encoded = PatternCodec::serialize(first, self.config.grid_size)?;

        if let Err(error) = self.store.save(&encoded) {
            tracing::error!(%error, "credential save failed");
            return Err(error.into());
        }
        self.saved = true;
        tracing::info!(len, "credential saved");
        self.outbox.push(WorkflowEvent::CredentialSaved);
        self.timers.arm(TimerAction::Finish, self.config.finish_delay());
        Ok(())
    }

    fn finish(&mut self, status: FlowStatus) {
        self.timers.cancel();
        self.recognizer.disable_input();
        self.drawing = false;
        self.status = status;
        tracing::info!(?status, "enrollment finished");
        self.outbox.push(WorkflowEvent::Finished(status));
    }

    fn show_help(&mut self) {
        self.drawing = false;
        let shown = help_pattern(self.config.grid_size).and_then(|demo| {
            self.recognizer
                .show_pattern(DisplayMode::Animate, &demo)
                .map_err(PatternError::from)
        });
        if let Err(error) = shown {
            tracing::warn!(%error, "help demonstration does not fit the grid");
        }
    }

    fn clear_recognizer(&mut self) {
        self.drawing = false;
        for event in self.recognizer.clear_pattern() {
            self.outbox.push(WorkflowEvent::Gesture(event));
        }
    }

    fn set_preview(&mut self, preview: Pattern) {
        if self.preview != preview {
            self.preview = preview;
            self.outbox.push(WorkflowEvent::PreviewUpdated(self.preview.clone()));
        }
    }
}

fn help_pattern(size: GridSize) -> Result<Pattern, PatternError> {
    let cells = HELP_DEMO
        .iter()
        .map(|&(row, column)| Cell::at(row, column, size))
        .collect::<Result<Vec<_>, _>>()?;
    Pattern::from_cells(cells)
}
