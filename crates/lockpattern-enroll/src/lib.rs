//! Lock Pattern Enrollment
//!
//! Two-step enrollment of a gesture unlock pattern: draw once, draw again to
//! confirm, persist the result.
//!
//! # Core Concepts
//!
//! - [`EnrollmentWorkflow`]: Stage machine owning recognizer and store
//! - [`Stage`] and [`StageDescriptor`]: What each step shows and accepts
//! - [`ArmedTimer`]: Deferred clear/advance/finish actions
//! - [`EnrollmentDriver`]: Runs armed timers on tokio
//! - [`CredentialStore`]: Where the confirmed pattern goes
//! - [`SavedSession`]: Stage and first pattern across restarts
//!
//! # Example
//!
//! ```rust
//! use lockpattern_core::{LockPatternConfig, Viewport};
//! use lockpattern_enroll::{EnrollmentWorkflow, MemoryCredentialStore, Stage};
//! use lockpattern_gesture::PointerEvent;
//!
//! let mut workflow = EnrollmentWorkflow::new(
//!     LockPatternConfig::new(),
//!     Viewport::square(300.0).unwrap(),
//!     MemoryCredentialStore::new(),
//! )
//! .unwrap();
//!
//! // Two cells is below the default minimum of four
//! workflow.handle_pointer(PointerEvent::Down { x: 50.0, y: 50.0 }).unwrap();
//! workflow.handle_pointer(PointerEvent::Move { x: 150.0, y: 50.0 }).unwrap();
//! workflow.handle_pointer(PointerEvent::Up { x: 150.0, y: 50.0 }).unwrap();
//! assert_eq!(workflow.stage(), Stage::ChoiceTooShort);
//!
//! // The armed clear timer is handed back when it expires
//! let timer = workflow.armed_timer().unwrap();
//! assert!(workflow.fire_timer(timer.id).unwrap());
//! assert!(workflow.recognizer().displayed().is_empty());
//! ```
//!
//! # Features
//!
//! - `strict-debug`: Panic on fatal workflow errors instead of returning them

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod driver;
mod error;
mod guide;
mod session;
mod stage;
mod store;
mod timer;
mod workflow;

// Re-exports
pub use driver::EnrollmentDriver;
pub use error::{EnrollError, StoreError};
pub use guide::GuideFlow;
pub use session::SavedSession;
pub use stage::{HeaderMessage, LeftButtonMode, RightButtonMode, Stage, StageDescriptor};
pub use store::{verify_pattern, CredentialRecord, CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use timer::{ArmedTimer, TimerAction, TimerId};
pub use workflow::{EnrollmentWorkflow, FlowStatus, WorkflowEvent};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
