//! Timer driver on a paused tokio clock

use lockpattern_core::LockPatternConfig;
use lockpattern_enroll::{EnrollmentDriver, EnrollmentWorkflow, FlowStatus, MemoryCredentialStore, Stage};
use lockpattern_test_utils::{drag, init_tracing, memory_workflow, viewport, FailingStore};
use std::sync::Arc;
use std::time::Duration;

const VALID: &[(u8, u8)] = &[(0, 0), (0, 1), (0, 2), (1, 2)];
const SHORT: &[(u8, u8)] = &[(0, 0), (0, 1)];

fn driver() -> EnrollmentDriver<MemoryCredentialStore> {
    EnrollmentDriver::new(memory_workflow(LockPatternConfig::new()))
}

fn draw<S: lockpattern_enroll::CredentialStore>(driver: &EnrollmentDriver<S>, cells: &[(u8, u8)]) {
    let events = driver.with_workflow(|wf| drag(wf.recognizer().grid(), cells));
    for event in events {
        driver.pointer(event).unwrap();
    }
}

fn displayed_len<S: lockpattern_enroll::CredentialStore>(driver: &EnrollmentDriver<S>) -> usize {
    driver.with_workflow(|wf| wf.recognizer().displayed().len())
}

async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    tokio::task::yield_now().await;
}

#[tokio::test(start_paused = true)]
async fn test_short_pattern_clears_after_delay() {
    init_tracing();
    let driver = driver();
    draw(&driver, SHORT);
    assert_eq!(driver.stage(), Stage::ChoiceTooShort);
    assert!(driver.pending_timer().is_some());

    advance(900).await;
    assert_eq!(displayed_len(&driver), SHORT.len());

    advance(200).await;
    assert_eq!(displayed_len(&driver), 0);
    assert_eq!(driver.stage(), Stage::ChoiceTooShort);
    assert!(driver.pending_timer().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_full_enrollment_completes() {
    let driver = driver();
    draw(&driver, VALID);
    assert_eq!(driver.stage(), Stage::FirstChoiceValid);

    advance(1001).await;
    assert_eq!(driver.stage(), Stage::NeedToConfirm);

    draw(&driver, VALID);
    assert_eq!(driver.stage(), Stage::ChoiceConfirmed);
    assert_eq!(driver.status(), FlowStatus::Active);

    advance(251).await;
    assert_eq!(driver.status(), FlowStatus::Completed);
    assert_eq!(driver.with_workflow(|wf| wf.store().credential().map(str::to_owned)), Some("0125".to_owned()));
}

#[tokio::test(start_paused = true)]
async fn test_new_gesture_supersedes_pending_clear() {
    let driver = driver();
    draw(&driver, SHORT);
    let stale = driver.pending_timer().unwrap();

    advance(500).await;
    draw(&driver, VALID);
    assert_eq!(driver.stage(), Stage::FirstChoiceValid);
    assert_ne!(driver.pending_timer(), Some(stale));

    // Past the superseded clear deadline, before the confirm deadline
    advance(600).await;
    assert_eq!(driver.stage(), Stage::FirstChoiceValid);
    assert_eq!(displayed_len(&driver), VALID.len());

    advance(500).await;
    assert_eq!(driver.stage(), Stage::NeedToConfirm);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_timers() {
    let driver = driver();
    draw(&driver, SHORT);
    driver.shutdown();
    assert!(driver.pending_timer().is_none());

    advance(2000).await;
    assert_eq!(driver.status(), FlowStatus::Cancelled);
    assert_eq!(driver.stage(), Stage::ChoiceTooShort);
    assert_eq!(displayed_len(&driver), SHORT.len());
}

#[tokio::test(start_paused = true)]
async fn test_retry_save_through_driver() {
    let workflow = EnrollmentWorkflow::new(LockPatternConfig::new(), viewport(), FailingStore::failing()).unwrap();
    let driver = EnrollmentDriver::new(workflow);
    draw(&driver, VALID);
    assert!(driver.with_workflow(|wf| wf.continue_to_confirm()).unwrap());

    let events = driver.with_workflow(|wf| drag(wf.recognizer().grid(), VALID));
    let results: Vec<_> = events.into_iter().map(|e| driver.pointer(e)).collect();
    assert!(results.last().unwrap().is_err());
    assert_eq!(driver.stage(), Stage::ChoiceConfirmed);
    assert!(driver.pending_timer().is_none());

    let saved = driver.with_workflow(|wf| {
        wf.store_mut().set_failing(false);
        wf.retry_save()
    });
    assert!(saved.unwrap());
    assert!(driver.pending_timer().is_some());

    advance(300).await;
    assert_eq!(driver.status(), FlowStatus::Completed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_actions_track_armed_timer() {
    // Delays long enough that no timer fires during the test
    let long = Duration::from_secs(600);
    let config = LockPatternConfig::new().with_delays(long, long, long);
    let driver = Arc::new(EnrollmentDriver::new(memory_workflow(config)));

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let driver = Arc::clone(&driver);
            tokio::task::spawn_blocking(move || {
                for _ in 0..50 {
                    let events = driver.with_workflow(|wf| drag(wf.recognizer().grid(), SHORT));
                    for event in events {
                        // Interleaved gestures from other workers may be rejected
                        let _ = driver.pointer(event);
                    }
                    driver.with_workflow(EnrollmentWorkflow::retry);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.await.unwrap();
    }

    let armed = driver.with_workflow(|wf| wf.armed_timer().map(|t| t.id));
    assert_eq!(driver.pending_timer(), armed);
}

#[test]
fn test_without_runtime_timer_stays_armed() {
    let driver = driver();
    draw(&driver, SHORT);
    assert!(driver.pending_timer().is_none());
    assert!(driver.with_workflow(|wf| wf.armed_timer()).is_some());
}
