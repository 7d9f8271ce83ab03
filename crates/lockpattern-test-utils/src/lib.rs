//! Testing utilities for the lock pattern workspace
//!
//! Pointer stream builders, a store that fails on demand, and tracing setup.

#![allow(missing_docs)]

use lockpattern_core::{Grid, GridSize, LockPatternConfig, Viewport};
use lockpattern_enroll::{CredentialStore, EnrollmentWorkflow, MemoryCredentialStore, StoreError};
use lockpattern_gesture::PointerEvent;

/// Interpolation steps between consecutive cell centres
pub const DRAG_STEPS: u8 = 8;

/// Side of the square viewport used by [`viewport`]
pub const VIEWPORT_SIDE: f32 = 300.0;

pub fn viewport() -> Viewport {
    Viewport::square(VIEWPORT_SIDE).unwrap()
}

pub fn grid(side: u8) -> Grid {
    Grid::new(GridSize::new(side).unwrap(), viewport())
}

/// Down on the first cell, small moves through the rest, up on the last
pub fn drag(grid: &Grid, cells: &[(u8, u8)]) -> Vec<PointerEvent> {
    assert!(!cells.is_empty(), "drag needs at least one cell");
    let centers: Vec<(f32, f32)> = cells
        .iter()
        .map(|&(row, column)| {
            let cell = grid
                .cell(row, column)
                .unwrap_or_else(|| panic!("({row}, {column}) is outside a {} grid", grid.size()));
            grid.center_of(cell)
        })
        .collect();

    let (x, y) = centers[0];
    let mut events = vec![PointerEvent::Down { x, y }];
    for pair in centers.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        for step in 1..=DRAG_STEPS {
            let t = f32::from(step) / f32::from(DRAG_STEPS);
            events.push(PointerEvent::Move { x: x0 + (x1 - x0) * t, y: y0 + (y1 - y0) * t });
        }
    }
    let (x, y) = centers[centers.len() - 1];
    events.push(PointerEvent::Up { x, y });
    events
}

/// Feed a whole drag into a workflow, stopping at the first error
pub fn draw<S: CredentialStore>(
    workflow: &mut EnrollmentWorkflow<S>,
    cells: &[(u8, u8)],
) -> Result<(), lockpattern_enroll::EnrollError> {
    for event in drag(workflow.recognizer().grid(), cells) {
        workflow.handle_pointer(event)?;
    }
    Ok(())
}

pub fn memory_workflow(config: LockPatternConfig) -> EnrollmentWorkflow<MemoryCredentialStore> {
    EnrollmentWorkflow::new(config, viewport(), MemoryCredentialStore::new()).unwrap()
}

/// In-memory store whose saves and clears fail while `failing` is set
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryCredentialStore,
    failing: bool,
    attempts: usize,
}

impl FailingStore {
    pub fn failing() -> Self {
        Self { failing: true, ..Self::default() }
    }

    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    /// Save calls seen, successful or not
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn credential(&self) -> Option<&str> {
        self.inner.credential()
    }
}

impl CredentialStore for FailingStore {
    fn save(&mut self, serialized: &str) -> Result<(), StoreError> {
        self.attempts += 1;
        if self.failing {
            return Err(StoreError::Unavailable("injected save failure".to_string()));
        }
        self.inner.save(serialized)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        if self.failing {
            return Err(StoreError::Unavailable("injected clear failure".to_string()));
        }
        self.inner.clear()
    }

    fn load(&self) -> Result<Option<String>, StoreError> {
        self.inner.load()
    }
}

/// Install a test subscriber honouring `RUST_LOG`; later calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
