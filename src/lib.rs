//! # Course Marketplace Catalog & Enrollment SDK
//!
//! Catalog view-model and enrollment orchestration for an on-chain course
//! marketplace: normalizes raw ledger records into display values, filters
//! and sorts the catalog deterministically, converts native-asset prices
//! into fiat display text from an external rate feed, and drives the
//! asynchronous "pay and enroll" action.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use course_market_sdk::{CatalogAction, CatalogSession, LedgerClient, RateTracker, SortOption};
//!
//! # async fn example(ledger: Arc<dyn LedgerClient>) -> Result<(), Box<dyn std::error::Error>> {
//! // Rate tracker polls the fiat feed in the background
//! let tracker = RateTracker::global().await;
//!
//! let session = CatalogSession::new(ledger, tracker.store());
//! session.set_connected_address(Some("0xdef...".to_string()));
//! session.refresh().await?;
//!
//! session
//!     .dispatch(CatalogAction::ChangeSort {
//!         sort: SortOption::PriceAsc,
//!     })
//!     .await?;
//!
//! for course in session.visible_courses().into_courses() {
//!     let fiat = session.fiat_price(&course).await;
//!     println!("{} — {} ETH (${})", course.name, course.price_native, fiat);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! LedgerClient (external contract reads/writes)
//!     ↓
//! CatalogSession (refresh, controls, access, actions)
//!     ├─ normalize (raw record -> CourseView, exact wei conversion)
//!     ├─ catalog (deterministic filter + stable sort)
//!     ├─ access (owner / enrolled / available / unavailable / pending)
//!     ├─ oracle (fiat display text) ← RateStore ← RateTracker ← RateProvider
//!     └─ EnrollmentController (Idle -> Submitting -> Succeeded | Failed)
//! ```
//!
//! ## Error Handling
//!
//! Failures are terminal at the component that detects them. A malformed
//! ledger record is excluded from the catalog without blanking the page, a
//! failed enrollment write settles into a `Failed` attempt with a message,
//! and a broken rate feed degrades the fiat text to `"0.00"`:
//!
//! ```no_run
//! use course_market_sdk::CatalogSession;
//!
//! # async fn example(session: &CatalogSession) -> Result<(), Box<dyn std::error::Error>> {
//! let attempt = session
//!     .dispatch(course_market_sdk::CatalogAction::SubmitEnrollment {
//!         course_id: "1".to_string(),
//!     })
//!     .await?;
//!
//! if let Some(attempt) = attempt {
//!     if let Some(message) = attempt.error_message {
//!         eprintln!("enrollment failed: {}", message);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod catalog;
pub mod constants;
pub mod enroll;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod normalize;
pub mod oracle;
pub mod provider;
pub mod providers;
pub mod session;
pub mod store;
pub mod tracker;
pub mod types;

// Re-export commonly used types
pub use enroll::{AttemptStatus, EnrollmentAttempt, EnrollmentController};
pub use error::{LedgerError, NormalizeError, RateError, RateFeedError};
pub use ledger::LedgerClient;
pub use metrics::FeedMetrics;
pub use provider::RateProvider;
pub use session::{CatalogControls, CatalogSession, CatalogSnapshot};
pub use store::RateStore;
pub use tracker::RateTracker;
pub use types::{
    AccessState, CatalogAction, CourseView, RateQuote, RateSnapshot, RawCourseRecord,
    SessionEvent, SortOption, StatusFilter, TxReceipt,
};
