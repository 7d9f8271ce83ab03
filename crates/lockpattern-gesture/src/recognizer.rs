//! Gesture recognizer
//!
//! Turns a single-finger pointer stream into an ordered, duplicate-free
//! [`Pattern`].
//!
//! # States
//!
//! ```text
//!            down on a cell (input enabled)
//!   Idle ───────────────────────────────────▶ Tracking
//!    ▲                                           │
//!    └──────────── up / clear_pattern() ─────────┘
//! ```
//!
//! Invalid input (down outside any cell, move or up while idle, down while
//! already tracking) is absorbed without events. Nothing here fails.

use crate::event::{GestureEvent, PointerEvent};
use crate::render::{DisplayMode, PatternRenderer, RenderSnapshot};
use lockpattern_core::{Grid, GridError, Pattern};
use std::fmt;

/// Recognizer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecognizerState {
    /// No gesture in flight
    Idle,
    /// Finger down, cells being collected
    Tracking,
}

/// Pointer-stream to pattern recognizer
pub struct GestureRecognizer {
    grid: Grid,
    state: RecognizerState,
    /// In-progress pattern, owned exclusively while tracking
    buffer: Pattern,
    /// Pattern shown when not tracking (last completed or programmatic)
    displayed: Pattern,
    in_progress: Option<(f32, f32)>,
    input_enabled: bool,
    mode: DisplayMode,
    renderer: Option<Box<dyn PatternRenderer>>,
}

impl GestureRecognizer {
    /// Create an idle recognizer with input enabled
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        Self {
            buffer: Pattern::with_capacity(grid.size()),
            displayed: Pattern::with_capacity(grid.size()),
            grid,
            state: RecognizerState::Idle,
            in_progress: None,
            input_enabled: true,
            mode: DisplayMode::Correct,
            renderer: None,
        }
    }

    /// Attach a renderer; it immediately receives the current snapshot
    pub fn set_renderer(&mut self, renderer: impl PatternRenderer + 'static) {
        self.renderer = Some(Box::new(renderer));
        self.notify_renderer();
    }

    /// Detach the renderer
    pub fn take_renderer(&mut self) -> Option<Box<dyn PatternRenderer>> {
        self.renderer.take()
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> RecognizerState {
        self.state
    }

    /// Whether a gesture is in flight
    #[inline]
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.state == RecognizerState::Tracking
    }

    /// Grid in use
    #[inline]
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// In-progress pattern (empty when idle)
    #[inline]
    #[must_use]
    pub fn pattern(&self) -> &Pattern {
        &self.buffer
    }

    /// Pattern currently shown to the user
    #[inline]
    #[must_use]
    pub fn displayed(&self) -> &Pattern {
        if self.is_tracking() {
            &self.buffer
        } else {
            &self.displayed
        }
    }

    /// Whether new gestures may start
    #[inline]
    #[must_use]
    pub fn is_input_enabled(&self) -> bool {
        self.input_enabled
    }

    /// Current display mode
    #[inline]
    #[must_use]
    pub fn display_mode(&self) -> DisplayMode {
        self.mode
    }

    /// Block new gestures; a gesture already being tracked continues
    pub fn disable_input(&mut self) {
        self.set_input_enabled(false);
    }

    /// Allow new gestures
    pub fn enable_input(&mut self) {
        self.set_input_enabled(true);
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        if self.input_enabled != enabled {
            self.input_enabled = enabled;
            self.notify_renderer();
        }
    }

    /// Change how the displayed pattern is drawn
    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        if self.mode != mode {
            self.mode = mode;
            self.notify_renderer();
        }
    }

    /// Feed one pointer event
    pub fn handle(&mut self, event: PointerEvent) -> Vec<GestureEvent> {
        match event {
            PointerEvent::Down { x, y } => self.pointer_down(x, y),
            PointerEvent::Move { x, y } => self.pointer_move(x, y),
            PointerEvent::Up { x, y } => self.pointer_up(x, y),
        }
    }

    /// Finger down
    pub fn pointer_down(&mut self, x: f32, y: f32) -> Vec<GestureEvent> {
        if !self.input_enabled {
            tracing::trace!(x, y, "pointer down ignored: input disabled");
            return Vec::new();
        }
        if self.is_tracking() {
            tracing::trace!(x, y, "pointer down ignored: gesture already tracking");
            return Vec::new();
        }
        let Some(cell) = self.grid.cell_at(x, y) else {
            tracing::trace!(x, y, "pointer down outside any cell");
            return Vec::new();
        };

        self.displayed.clear();
        self.buffer.clear();
        self.buffer.push(cell);
        self.state = RecognizerState::Tracking;
        self.in_progress = Some((x, y));
        self.mode = DisplayMode::Correct;
        tracing::debug!(%cell, "gesture started");
        self.notify_renderer();

        vec![GestureEvent::Started, GestureEvent::CellAdded(cell)]
    }

    /// Finger moved
    pub fn pointer_move(&mut self, x: f32, y: f32) -> Vec<GestureEvent> {
        if !self.is_tracking() {
            return Vec::new();
        }
        self.in_progress = Some((x, y));

        let mut events = Vec::new();
        if let (Some(hit), Some(last)) = (self.grid.cell_at(x, y), self.buffer.last()) {
            if hit != last && !self.buffer.contains(hit) {
                // Skip-over: colinear cells crossed on the way count as visited
                for cell in self.grid.cells_between(last, hit) {
                    if self.buffer.push(cell) {
                        tracing::trace!(%cell, "cell added");
                        events.push(GestureEvent::CellAdded(cell));
                    }
                }
            }
        }
        self.notify_renderer();
        events
    }

    /// Finger lifted
    pub fn pointer_up(&mut self, x: f32, y: f32) -> Vec<GestureEvent> {
        if !self.is_tracking() {
            return Vec::new();
        }
        self.state = RecognizerState::Idle;
        self.in_progress = None;
        let finished = std::mem::replace(&mut self.buffer, Pattern::with_capacity(self.grid.size()));

        let event = if finished.is_empty() {
            tracing::debug!(x, y, "gesture ended without cells");
            self.displayed.clear();
            GestureEvent::Cleared
        } else {
            tracing::debug!(len = finished.len(), "gesture completed");
            self.displayed = finished.clone();
            GestureEvent::Completed(finished)
        };
        self.notify_renderer();
        vec![event]
    }

    /// Drop any in-flight or displayed pattern and return to idle
    ///
    /// Emits [`GestureEvent::Cleared`] only when something was cleared, so
    /// repeated calls are equivalent to one. Never emits `Completed`.
    pub fn clear_pattern(&mut self) -> Vec<GestureEvent> {
        let had_content = self.is_tracking() || !self.buffer.is_empty() || !self.displayed.is_empty();
        let mode_changed = self.mode != DisplayMode::Correct;
        self.state = RecognizerState::Idle;
        self.buffer.clear();
        self.displayed.clear();
        self.in_progress = None;
        self.mode = DisplayMode::Correct;

        if had_content || mode_changed {
            self.notify_renderer();
        }
        if had_content {
            tracing::debug!("pattern cleared");
            vec![GestureEvent::Cleared]
        } else {
            Vec::new()
        }
    }

    /// Display a pattern without tracking it (demonstrations, previews)
    ///
    /// Abandons any gesture in flight without emitting events.
    ///
    /// # Errors
    /// Returns [`GridError::CellOutOfRange`] if a cell does not fit the grid
    pub fn show_pattern(&mut self, mode: DisplayMode, pattern: &Pattern) -> Result<(), GridError> {
        if let Some(cell) = pattern.iter().find(|&c| !self.grid.contains(c)) {
            return Err(GridError::CellOutOfRange {
                row: cell.row(),
                column: cell.column(),
                size: self.grid.size().get(),
            });
        }
        self.state = RecognizerState::Idle;
        self.buffer.clear();
        self.in_progress = None;
        self.displayed = pattern.clone();
        self.mode = mode;
        self.notify_renderer();
        Ok(())
    }

    /// Swap the grid geometry; all pattern and lookup state is discarded
    pub fn set_grid(&mut self, grid: Grid) -> Vec<GestureEvent> {
        let events = self.clear_pattern();
        self.buffer = Pattern::with_capacity(grid.size());
        self.displayed = Pattern::with_capacity(grid.size());
        self.grid = grid;
        self.notify_renderer();
        events
    }

    /// Build the render view of the current state
    #[must_use]
    pub fn snapshot(&self) -> RenderSnapshot {
        let shown = self.displayed();
        RenderSnapshot {
            grid_size: self.grid.size(),
            cells: shown.cells().to_vec(),
            lookup: shown.lookup(self.grid.size()),
            in_progress: self.in_progress,
            mode: self.mode,
            input_enabled: self.input_enabled,
        }
    }

    fn notify_renderer(&mut self) {
        if self.renderer.is_none() {
            return;
        }
        let snapshot = self.snapshot();
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.render(&snapshot);
        }
    }
}

impl fmt::Debug for GestureRecognizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureRecognizer")
            .field("grid_size", &self.grid.size())
            .field("state", &self.state)
            .field("len", &self.buffer.len())
            .field("displayed", &self.displayed.len())
            .field("input_enabled", &self.input_enabled)
            .field("mode", &self.mode)
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockpattern_core::{Cell, GridSize, Viewport};
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    fn recognizer() -> GestureRecognizer {
        GestureRecognizer::new(Grid::new(GridSize::DEFAULT, Viewport::square(300.0).unwrap()))
    }

    fn at(r: &GestureRecognizer, row: u8, column: u8) -> (f32, f32) {
        r.grid().center_of(r.grid().cell(row, column).unwrap())
    }

    fn cell(r: &GestureRecognizer, row: u8, column: u8) -> Cell {
        r.grid().cell(row, column).unwrap()
    }

    #[test]
    fn down_on_cell_starts_tracking() {
        let mut r = recognizer();
        let (x, y) = at(&r, 0, 0);
        let events = r.pointer_down(x, y);
        assert_eq!(events, vec![GestureEvent::Started, GestureEvent::CellAdded(cell(&r, 0, 0))]);
        assert!(r.is_tracking());
    }

    #[test]
    fn down_in_gap_does_not_start() {
        let mut r = recognizer();
        assert!(r.pointer_down(100.0, 100.0).is_empty());
        assert_eq!(r.state(), RecognizerState::Idle);
        assert!(r.pointer_up(100.0, 100.0).is_empty());
    }

    #[test]
    fn diagonal_drag_visits_center() {
        let mut r = recognizer();
        let (x0, y0) = at(&r, 0, 0);
        let (x2, y2) = at(&r, 2, 2);
        r.pointer_down(x0, y0);
        let added = r.pointer_move(x2, y2);
        assert_eq!(
            added,
            vec![GestureEvent::CellAdded(cell(&r, 1, 1)), GestureEvent::CellAdded(cell(&r, 2, 2))]
        );
        let done = r.pointer_up(x2, y2);
        let expected =
            Pattern::from_cells([cell(&r, 0, 0), cell(&r, 1, 1), cell(&r, 2, 2)]).unwrap();
        assert_eq!(done, vec![GestureEvent::Completed(expected)]);
        assert!(r.pattern().is_empty());
    }

    #[test]
    fn revisits_are_ignored_but_pointer_tracked() {
        let mut r = recognizer();
        let (x0, y0) = at(&r, 0, 0);
        let (x1, y1) = at(&r, 1, 1);
        r.pointer_down(x0, y0);
        r.pointer_move(x1, y1);
        assert!(r.pointer_move(x0 + 1.0, y0 + 1.0).is_empty());
        assert!(r.is_tracking());
        assert_eq!(r.pattern().cells(), &[cell(&r, 0, 0), cell(&r, 1, 1)]);
        assert_eq!(r.snapshot().in_progress, Some((x0 + 1.0, y0 + 1.0)));
    }

    #[test]
    fn already_visited_midpoint_is_not_repeated() {
        let mut r = recognizer();
        let (x, y) = at(&r, 0, 1);
        r.pointer_down(x, y);
        let (x, y) = at(&r, 0, 0);
        r.pointer_move(x, y);
        let (x, y) = at(&r, 0, 2);
        let events = r.pointer_move(x, y);
        assert_eq!(events, vec![GestureEvent::CellAdded(cell(&r, 0, 2))]);
    }

    #[test]
    fn disabled_input_blocks_only_new_gestures() {
        let mut r = recognizer();
        let (x0, y0) = at(&r, 0, 0);
        r.pointer_down(x0, y0);
        r.disable_input();
        let (x1, y1) = at(&r, 0, 1);
        assert_eq!(r.pointer_move(x1, y1).len(), 1);
        assert!(matches!(r.pointer_up(x1, y1).as_slice(), [GestureEvent::Completed(_)]));
        assert!(r.pointer_down(x0, y0).is_empty());
        r.enable_input();
        assert_eq!(r.pointer_down(x0, y0).len(), 2);
    }

    #[test]
    fn clear_mid_gesture_never_completes() {
        let mut r = recognizer();
        let (x0, y0) = at(&r, 0, 0);
        r.pointer_down(x0, y0);
        assert_eq!(r.clear_pattern(), vec![GestureEvent::Cleared]);
        assert!(r.pointer_up(x0, y0).is_empty());
    }

    #[test]
    fn clear_is_idempotent() {
        let mut r = recognizer();
        let (x0, y0) = at(&r, 0, 0);
        r.pointer_down(x0, y0);
        r.pointer_up(x0, y0);
        assert_eq!(r.clear_pattern(), vec![GestureEvent::Cleared]);
        assert!(r.clear_pattern().is_empty());
    }

    #[test]
    fn completed_pattern_stays_displayed_until_cleared() {
        let mut r = recognizer();
        let (x0, y0) = at(&r, 0, 0);
        let (x1, y1) = at(&r, 0, 1);
        r.pointer_down(x0, y0);
        r.pointer_move(x1, y1);
        r.pointer_up(x1, y1);
        let snapshot = r.snapshot();
        assert_eq!(snapshot.cells.len(), 2);
        assert!(snapshot.is_selected(cell(&r, 0, 1)));
        assert_eq!(snapshot.in_progress, None);
        r.clear_pattern();
        assert!(r.snapshot().cells.is_empty());
    }

    #[test]
    fn renderer_sees_every_mutation() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut r = recognizer();
        r.set_renderer(move |s: &RenderSnapshot| sink.lock().unwrap().push(s.cells.len()));
        let (x0, y0) = at(&r, 0, 0);
        let (x1, y1) = at(&r, 1, 0);
        r.pointer_down(x0, y0);
        r.pointer_move(x1, y1);
        r.pointer_up(x1, y1);
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 2]);
    }

    #[test]
    fn renderer_sees_input_and_mode_changes() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut r = recognizer();
        r.set_renderer(move |s: &RenderSnapshot| sink.lock().unwrap().push((s.input_enabled, s.mode)));

        r.disable_input();
        r.disable_input();
        r.enable_input();
        r.set_display_mode(DisplayMode::Wrong);
        // Nothing displayed, but the mode resets
        assert!(r.clear_pattern().is_empty());
        assert!(r.clear_pattern().is_empty());

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (true, DisplayMode::Correct),
                (false, DisplayMode::Correct),
                (true, DisplayMode::Correct),
                (true, DisplayMode::Wrong),
                (true, DisplayMode::Correct),
            ]
        );
    }

    #[test]
    fn show_pattern_rejects_foreign_cells() {
        let mut r = recognizer();
        let big = GridSize::new(4).unwrap();
        let foreign = Pattern::from_cells([Cell::at(3, 3, big).unwrap()]).unwrap();
        assert!(r.show_pattern(DisplayMode::Animate, &foreign).is_err());
        let demo = Pattern::from_cells([cell(&r, 0, 0), cell(&r, 0, 1)]).unwrap();
        r.show_pattern(DisplayMode::Animate, &demo).unwrap();
        assert_eq!(r.snapshot().mode, DisplayMode::Animate);
        assert_eq!(r.displayed(), &demo);
    }

    #[test]
    fn set_grid_discards_state() {
        let mut r = recognizer();
        let (x0, y0) = at(&r, 0, 0);
        r.pointer_down(x0, y0);
        let events = r.set_grid(Grid::new(GridSize::new(4).unwrap(), Viewport::square(400.0).unwrap()));
        assert_eq!(events, vec![GestureEvent::Cleared]);
        assert_eq!(r.snapshot().lookup.len(), 16);
        assert!(!r.is_tracking());
    }
}
