//! Enrollment orchestration for the "pay and enroll" action
//!
//! One controller per session drives the per-course state machine
//! `Idle -> Submitting -> {Succeeded | Failed}` with `Failed -> Idle` for
//! retries and `Succeeded -> Idle` once the caller has re-fetched
//! enrollment facts. At most one write is in flight per course; ledger
//! errors are terminal here and never propagate to rendering code.

use crate::{
    error::LedgerError,
    ledger::LedgerClient,
    normalize::native_to_wei,
    types::{AccessState, SessionEvent, TxReceipt},
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Capacity of the session event channel
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Status of one enrollment attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStatus {
    /// No submission in progress
    Idle,
    /// Write issued, waiting for settlement
    Submitting,
    /// Write settled successfully
    Succeeded,
    /// Write failed; retry allowed after acknowledgement
    Failed,
}

/// One in-flight or settled enrollment submission for a course
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentAttempt {
    /// The course this attempt belongs to
    pub course_id: String,
    /// Current state-machine position
    pub status: AttemptStatus,
    /// Human-readable failure message, set only when `Failed`
    pub error_message: Option<String>,
}

impl EnrollmentAttempt {
    fn idle(course_id: &str) -> Self {
        Self {
            course_id: course_id.to_string(),
            status: AttemptStatus::Idle,
            error_message: None,
        }
    }
}

/// Drives asynchronous enrollment submissions for one session
///
/// # Example
/// ```no_run
/// # use std::sync::Arc;
/// # use course_market_sdk::{AccessState, EnrollmentController, LedgerClient};
/// # async fn example(ledger: Arc<dyn LedgerClient>) {
/// let controller = EnrollmentController::new(ledger);
/// let attempt = controller.submit("1", "0.5", AccessState::Available).await;
/// println!("enrollment: {:?}", attempt.status);
/// # }
/// ```
pub struct EnrollmentController {
    ledger: Arc<dyn LedgerClient>,
    attempts: Mutex<HashMap<String, EnrollmentAttempt>>,
    events: broadcast::Sender<SessionEvent>,
}

impl EnrollmentController {
    /// Creates a new controller over a ledger client
    pub fn new(ledger: Arc<dyn LedgerClient>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            ledger,
            attempts: Mutex::new(HashMap::new()),
            events,
        }
    }

    /// Submits the "pay and enroll" action for one course
    ///
    /// No-op returning the current attempt unless `current_access` is
    /// [`AccessState::Available`]; the button state stays authoritative and
    /// a stale or race-won click never fires a transaction. While an
    /// attempt is `Submitting`, further calls are rejected synchronously
    /// without issuing a second write.
    ///
    /// # Arguments
    /// * `course_id` - The course to enroll in
    /// * `price_native` - Whole-unit price text; converted back to the
    ///   exact smallest-unit amount for the payment
    /// * `current_access` - The resolved affordance state for this course
    pub async fn submit(
        &self,
        course_id: &str,
        price_native: &str,
        current_access: AccessState,
    ) -> EnrollmentAttempt {
        if current_access != AccessState::Available {
            tracing::debug!(
                course_id,
                access = ?current_access,
                "Enrollment not available, ignoring submit"
            );
            return self.attempt(course_id);
        }

        {
            let mut attempts = self.attempts.lock().unwrap();
            let entry = attempts
                .entry(course_id.to_string())
                .or_insert_with(|| EnrollmentAttempt::idle(course_id));
            if entry.status == AttemptStatus::Submitting {
                tracing::debug!(course_id, "Enrollment already in flight, ignoring submit");
                return entry.clone();
            }
            entry.status = AttemptStatus::Submitting;
            entry.error_message = None;
        }

        let value_wei = match native_to_wei(price_native) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(course_id, error = %e, "Cannot convert price for enrollment");
                return self.settle(course_id, Err(e.to_string()));
            }
        };

        tracing::info!(course_id, value_wei = %value_wei, "Submitting enrollment");

        match self.ledger.buy_and_register(course_id, value_wei).await {
            Ok(receipt) => {
                tracing::info!(course_id, tx_hash = %receipt.tx_hash, "Enrollment settled");
                self.settle(course_id, Ok(receipt))
            }
            Err(e) => {
                tracing::warn!(course_id, error = %e, "Enrollment write failed");
                self.settle(course_id, Err(describe_failure(&e)))
            }
        }
    }

    /// Returns the current attempt for a course (idle if never submitted)
    pub fn attempt(&self, course_id: &str) -> EnrollmentAttempt {
        self.attempts
            .lock()
            .unwrap()
            .get(course_id)
            .cloned()
            .unwrap_or_else(|| EnrollmentAttempt::idle(course_id))
    }

    /// Acknowledges a settled attempt, returning it to idle
    ///
    /// `Failed -> Idle` enables a retry; `Succeeded -> Idle` is for after
    /// the caller re-fetched enrollment facts. A `Submitting` attempt
    /// cannot be acknowledged away.
    pub fn acknowledge(&self, course_id: &str) {
        let mut attempts = self.attempts.lock().unwrap();
        if let Some(entry) = attempts.get_mut(course_id) {
            if entry.status != AttemptStatus::Submitting {
                entry.status = AttemptStatus::Idle;
                entry.error_message = None;
            }
        }
    }

    /// Subscribes to session events emitted by this controller
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Records the settled outcome and emits the matching event
    fn settle(
        &self,
        course_id: &str,
        outcome: Result<TxReceipt, String>,
    ) -> EnrollmentAttempt {
        let mut attempts = self.attempts.lock().unwrap();
        let entry = attempts
            .entry(course_id.to_string())
            .or_insert_with(|| EnrollmentAttempt::idle(course_id));

        match outcome {
            Ok(_) => {
                entry.status = AttemptStatus::Succeeded;
                entry.error_message = None;
                let _ = self.events.send(SessionEvent::EnrollmentSucceeded {
                    id: Uuid::new_v4(),
                    course_id: course_id.to_string(),
                    timestamp: Utc::now(),
                });
            }
            Err(message) => {
                entry.status = AttemptStatus::Failed;
                entry.error_message = Some(message.clone());
                let _ = self.events.send(SessionEvent::EnrollmentFailed {
                    id: Uuid::new_v4(),
                    course_id: course_id.to_string(),
                    error_message: message,
                    timestamp: Utc::now(),
                });
            }
        }

        entry.clone()
    }
}

/// Human-readable message for a failed write
fn describe_failure(error: &LedgerError) -> String {
    match error {
        LedgerError::Rejected(_) => "Transaction was rejected in the wallet".to_string(),
        LedgerError::Reverted(reason) => format!("The contract rejected the purchase: {}", reason),
        LedgerError::Timeout => "The network took too long to respond".to_string(),
        other => other.to_string(),
    }
}
