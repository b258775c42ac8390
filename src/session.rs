//! Catalog session orchestration
//!
//! Owns the read path of one catalog view: fetching and normalizing
//! course records, deriving the visible course list from the current
//! controls, resolving per-course access, lazily loading student lists,
//! and dispatching user actions. All mutable state is scoped to one
//! session; a detached session discards late-arriving reads instead of
//! applying them to a view that no longer exists.

use crate::{
    access,
    catalog,
    enroll::{EnrollmentAttempt, EnrollmentController},
    error::LedgerError,
    ledger::LedgerClient,
    normalize,
    oracle,
    store::RateStore,
    types::{
        AccessState, CatalogAction, CourseView, RawCourseRecord, SessionEvent, SortOption,
        StatusFilter, TxReceipt,
    },
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

/// Catalog as seen by the listing view
///
/// `Loading` means the ledger read has not resolved yet, which is
/// rendered as a loading affordance and is distinct from an empty
/// catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSnapshot {
    /// Course list not loaded yet
    Loading,
    /// Loaded catalog after filtering and sorting
    Ready(Vec<CourseView>),
}

/// User-controlled filter and sort settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogControls {
    /// Text query over name and description
    pub query: String,
    /// Status filter
    pub status: StatusFilter,
    /// Sort criterion
    pub sort: SortOption,
}

/// Session-scoped view state guarded by one lock
struct SessionState {
    controls: CatalogControls,
    catalog: Option<Vec<CourseView>>,
    owner: Option<String>,
    connected: Option<String>,
}

/// One catalog browsing session
///
/// Combines the ledger client, the fiat rate store and the enrollment
/// controller behind a small view-model surface.
///
/// # Example
/// ```no_run
/// # use std::sync::Arc;
/// # use course_market_sdk::{CatalogAction, CatalogSession, LedgerClient, RateStore};
/// # async fn example(ledger: Arc<dyn LedgerClient>) -> Result<(), Box<dyn std::error::Error>> {
/// let session = CatalogSession::new(ledger, Arc::new(RateStore::new()));
/// session.set_connected_address(Some("0xdef...".to_string()));
/// session.refresh().await?;
///
/// session
///     .dispatch(CatalogAction::ChangeQuery {
///         query: "rust".to_string(),
///     })
///     .await?;
///
/// for course in session.visible_courses().into_courses() {
///     println!("{} — {} ETH", course.name, course.price_native);
/// }
/// # Ok(())
/// # }
/// ```
pub struct CatalogSession {
    ledger: Arc<dyn LedgerClient>,
    rates: Arc<RateStore>,
    enrollment: EnrollmentController,
    state: Mutex<SessionState>,
    students: tokio::sync::Mutex<HashMap<String, Vec<String>>>,
    generation: AtomicU64,
}

impl CatalogSnapshot {
    /// Unwraps into the course list, empty while loading
    pub fn into_courses(self) -> Vec<CourseView> {
        match self {
            CatalogSnapshot::Loading => Vec::new(),
            CatalogSnapshot::Ready(courses) => courses,
        }
    }

    /// Whether the catalog is still loading
    pub fn is_loading(&self) -> bool {
        matches!(self, CatalogSnapshot::Loading)
    }
}

impl CatalogSession {
    /// Creates a new session over a ledger client and rate store
    pub fn new(ledger: Arc<dyn LedgerClient>, rates: Arc<RateStore>) -> Self {
        let enrollment = EnrollmentController::new(ledger.clone());
        Self {
            ledger,
            rates,
            enrollment,
            state: Mutex::new(SessionState {
                controls: CatalogControls::default(),
                catalog: None,
                owner: None,
                connected: None,
            }),
            students: tokio::sync::Mutex::new(HashMap::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Sets or clears the connected wallet address
    pub fn set_connected_address(&self, address: Option<String>) {
        self.state.lock().unwrap().connected = address;
    }

    /// Refreshes course records and the owner address from the ledger
    ///
    /// Both reads run concurrently. A `NotReady` read keeps the previous
    /// value (the snapshot stays `Loading` until the first course list
    /// arrives). Each record is normalized in isolation: a malformed one
    /// is excluded and logged while the rest of the catalog still
    /// renders. A refresh that resolves after [`Self::detach`] is
    /// discarded.
    pub async fn refresh(&self) -> Result<(), LedgerError> {
        let generation = self.generation.load(Ordering::SeqCst);

        let (courses, owner) =
            futures::join!(self.ledger.get_all_courses(), self.ledger.get_owner());

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("Discarding catalog refresh for a detached view");
            return Ok(());
        }

        let normalized = match courses {
            Ok(raw) => Some(Self::normalize_all(&raw)),
            Err(LedgerError::NotReady) => None,
            Err(e) => return Err(e),
        };
        let owner = match owner {
            Ok(address) => Some(address),
            Err(LedgerError::NotReady) => None,
            Err(e) => return Err(e),
        };

        let mut state = self.state.lock().unwrap();
        if let Some(catalog) = normalized {
            tracing::debug!(count = catalog.len(), "Catalog refreshed");
            state.catalog = Some(catalog);
        }
        if let Some(address) = owner {
            state.owner = Some(address);
        }
        Ok(())
    }

    /// Returns the catalog as filtered and sorted by the current controls
    pub fn visible_courses(&self) -> CatalogSnapshot {
        let state = self.state.lock().unwrap();
        match &state.catalog {
            None => CatalogSnapshot::Loading,
            Some(courses) => CatalogSnapshot::Ready(catalog::apply(
                courses,
                &state.controls.query,
                state.controls.status,
                state.controls.sort,
            )),
        }
    }

    /// Returns the current controls
    pub fn controls(&self) -> CatalogControls {
        self.state.lock().unwrap().controls.clone()
    }

    /// Resolves the affordance state for one course
    ///
    /// `Pending` while the connected address, the owner address or the
    /// catalog itself is still loading, so the card never shows a false
    /// negative mid-load.
    pub async fn access_for(&self, course_id: &str) -> Result<AccessState, LedgerError> {
        let (connected, owner, course) = {
            let state = self.state.lock().unwrap();
            (
                state.connected.clone(),
                state.owner.clone(),
                state
                    .catalog
                    .as_ref()
                    .map(|courses| courses.iter().find(|c| c.id == course_id).cloned()),
            )
        };

        let (connected, owner) = match (connected, owner) {
            (Some(c), Some(o)) => (c, o),
            _ => return Ok(AccessState::Pending),
        };
        let course = match course {
            None => return Ok(AccessState::Pending),
            Some(None) => return Ok(AccessState::Unavailable),
            Some(Some(course)) => course,
        };

        let enrolled = self.ledger.is_enrolled(&connected, course_id).await?;
        Ok(access::resolve(
            Some(&connected),
            Some(&owner),
            enrolled,
            course.is_active,
        ))
    }

    /// Returns the enrolled identities for one course
    ///
    /// The read is issued lazily on first request and cached per course
    /// for the rest of the session (the detail dialog is the only
    /// consumer, so there is no background subscription).
    pub async fn students_for(&self, course_id: &str) -> Result<Vec<String>, LedgerError> {
        let mut cache = self.students.lock().await;
        if let Some(students) = cache.get(course_id) {
            return Ok(students.clone());
        }

        let students = self.ledger.get_students_by_course(course_id).await?;
        cache.insert(course_id.to_string(), students.clone());
        Ok(students)
    }

    /// Dispatches one user action
    ///
    /// Control changes are pure state updates; `SubmitEnrollment`
    /// resolves the current access and price and delegates to the
    /// enrollment controller, returning the resulting attempt.
    pub async fn dispatch(
        &self,
        action: CatalogAction,
    ) -> Result<Option<EnrollmentAttempt>, LedgerError> {
        match action {
            CatalogAction::ChangeQuery { query } => {
                self.state.lock().unwrap().controls.query = query;
                Ok(None)
            }
            CatalogAction::ChangeStatus { status } => {
                self.state.lock().unwrap().controls.status = status;
                Ok(None)
            }
            CatalogAction::ChangeSort { sort } => {
                self.state.lock().unwrap().controls.sort = sort;
                Ok(None)
            }
            CatalogAction::SubmitEnrollment { course_id } => {
                let access = self.access_for(&course_id).await?;
                let price_native = {
                    let state = self.state.lock().unwrap();
                    state
                        .catalog
                        .as_ref()
                        .and_then(|courses| courses.iter().find(|c| c.id == course_id))
                        .map(|c| c.price_native.clone())
                        .unwrap_or_default()
                };
                let attempt = self.enrollment.submit(&course_id, &price_native, access).await;
                Ok(Some(attempt))
            }
        }
    }

    /// Fiat display price for one course
    ///
    /// Uses the last rate snapshot even when stale; falls back to the
    /// fixed `"0.00"` text only when no rate was ever fetched.
    pub async fn fiat_price(&self, course: &CourseView) -> String {
        oracle::to_fiat_display(&course.price_native, self.rates.display_quote().await)
    }

    /// Creates a new course on the ledger
    ///
    /// Owner-only by contract enforcement; this layer validates that the
    /// fields are non-empty and the price converts exactly before issuing
    /// the write.
    pub async fn create_course(
        &self,
        name: &str,
        description: &str,
        price_native: &str,
    ) -> Result<TxReceipt, LedgerError> {
        let name = name.trim();
        let description = description.trim();
        if name.is_empty() || description.is_empty() {
            return Err(LedgerError::InvalidRequest(
                "Name and description are required".to_string(),
            ));
        }
        let price_wei = normalize::native_to_wei(price_native)
            .map_err(|e| LedgerError::InvalidRequest(e.to_string()))?;

        let receipt = self.ledger.create_course(name, description, price_wei).await?;
        tracing::info!(name, tx_hash = %receipt.tx_hash, "Course created");
        Ok(receipt)
    }

    /// Returns the current enrollment attempt for a course
    pub fn attempt(&self, course_id: &str) -> EnrollmentAttempt {
        self.enrollment.attempt(course_id)
    }

    /// Acknowledges a settled enrollment attempt
    pub fn acknowledge(&self, course_id: &str) {
        self.enrollment.acknowledge(course_id)
    }

    /// Subscribes to enrollment events for this session
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.enrollment.subscribe()
    }

    /// Detaches the session from its view
    ///
    /// A refresh still in flight when the view goes away resolves into
    /// nothing: its result is discarded instead of applied.
    pub fn detach(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Normalizes records with per-record fault isolation
    fn normalize_all(raw: &[RawCourseRecord]) -> Vec<CourseView> {
        raw.iter()
            .filter_map(|record| match normalize::normalize(record) {
                Ok(view) => Some(view),
                Err(e) => {
                    tracing::warn!(error = %e, "Excluding malformed course record");
                    None
                }
            })
            .collect()
    }
}
