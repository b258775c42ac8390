//! Types for the course marketplace catalog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raw course record as returned by the ledger client
///
/// Fields are loosely typed on purpose: the ledger is an external system
/// and a malformed value must surface as a normalization fault rather
/// than be silently coerced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCourseRecord {
    /// Opaque unique course identifier
    pub id: String,
    /// Course name
    pub name: String,
    /// Course description
    pub description: String,
    /// Price in the smallest native-asset unit (wei), as decimal text
    pub price_wei: String,
    /// Whether the course is open for enrollment
    pub is_active: bool,
    /// Number of enrolled students
    pub student_count: i64,
}

/// Display-ready course view model
///
/// Produced by normalization, immutable once built. `price_native` keeps
/// full precision; rounding is a display concern of the fiat oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseView {
    /// Opaque unique course identifier
    pub id: String,
    /// Course name
    pub name: String,
    /// Course description
    pub description: String,
    /// Price in whole native-asset units, exact decimal text
    pub price_native: String,
    /// Whether the course is open for enrollment
    pub is_active: bool,
    /// Number of enrolled students
    pub student_count: u64,
}

/// UI-affordance state for one course card
///
/// `Pending` is transient while identity data is still loading; the other
/// four are mutually exclusive with fixed precedence (owner beats
/// already-enrolled beats active).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessState {
    /// Connected or owner address not resolved yet
    Pending,
    /// The connected identity owns the marketplace
    Owner,
    /// The connected identity already paid for this course
    AlreadyEnrolled,
    /// Open for enrollment
    Available,
    /// Inactive and not otherwise accessible
    Unavailable,
}

impl AccessState {
    /// Get the button label for this state
    pub fn label(&self) -> &'static str {
        match self {
            AccessState::Pending => "Loading",
            AccessState::Owner => "Admin mode",
            AccessState::AlreadyEnrolled => "Already enrolled",
            AccessState::Available => "Enroll",
            AccessState::Unavailable => "Not available",
        }
    }

    /// Whether the enroll affordance is enabled in this state
    pub fn is_enabled(&self) -> bool {
        matches!(self, AccessState::Available)
    }
}

/// Catalog status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// All courses
    #[default]
    All,
    /// Active courses only
    Active,
    /// Inactive courses only
    Inactive,
}

/// Catalog sort criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Lexicographic by name, ascending (default)
    #[default]
    Name,
    /// Native price, ascending
    PriceAsc,
    /// Native price, descending
    PriceDesc,
    /// Student count, descending
    Students,
}

/// Closed union of catalog user actions
///
/// Dispatched into the session so every interaction goes through one
/// exhaustive match instead of loosely typed handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CatalogAction {
    /// Replace the text query
    ChangeQuery { query: String },
    /// Replace the status filter
    ChangeStatus { status: StatusFilter },
    /// Replace the sort criterion
    ChangeSort { sort: SortOption },
    /// Pay and enroll into one course
    SubmitEnrollment { course_id: String },
}

/// Fiat rate quote in either of the two upstream wire shapes
///
/// CoinGecko nests the rate under a key, Coinbase returns a bare amount.
/// Both are valid inputs to the fiat oracle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RateQuote {
    /// Bare number shape
    Bare(f64),
    /// Record-with-price shape
    Keyed { price: f64 },
}

impl RateQuote {
    /// Extracts the numeric rate regardless of shape
    pub fn value(&self) -> f64 {
        match self {
            RateQuote::Bare(rate) => *rate,
            RateQuote::Keyed { price } => *price,
        }
    }
}

/// One complete fiat-rate reading from a feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSnapshot {
    /// Rate in USD per whole native-asset unit
    pub rate_usd: f64,

    /// Last updated timestamp
    pub last_updated: DateTime<Utc>,

    /// Feed source name
    pub source: String,
}

impl RateSnapshot {
    /// Create a new rate snapshot
    pub fn new(rate_usd: f64, source: String) -> Self {
        Self {
            rate_usd,
            last_updated: Utc::now(),
            source,
        }
    }

    /// Quote form consumed by the fiat oracle
    pub fn quote(&self) -> RateQuote {
        RateQuote::Bare(self.rate_usd)
    }

    /// Check if the snapshot is stale (older than threshold seconds)
    pub fn is_stale(&self, threshold_seconds: u64) -> bool {
        let now = Utc::now();
        let age = now.signed_duration_since(self.last_updated);
        age.num_seconds() > threshold_seconds as i64
    }

    /// Get the age of the snapshot in seconds
    pub fn age(&self) -> std::time::Duration {
        let now = Utc::now();
        let duration = now.signed_duration_since(self.last_updated);
        std::time::Duration::from_secs(duration.num_seconds().max(0) as u64)
    }
}

/// Receipt for a settled ledger write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// Transaction hash
    pub tx_hash: String,
}

/// Session events for the unified event system
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionEvent {
    /// An enrollment write settled successfully
    EnrollmentSucceeded {
        id: Uuid,
        course_id: String,
        timestamp: DateTime<Utc>,
    },

    /// An enrollment write failed
    EnrollmentFailed {
        id: Uuid,
        course_id: String,
        error_message: String,
        timestamp: DateTime<Utc>,
    },

    /// The fiat rate was refreshed
    RateUpdated {
        id: Uuid,
        old_rate_usd: Option<f64>,
        new_rate_usd: f64,
        timestamp: DateTime<Utc>,
    },
}

impl SessionEvent {
    /// Get the event ID
    pub fn id(&self) -> Uuid {
        match self {
            SessionEvent::EnrollmentSucceeded { id, .. } => *id,
            SessionEvent::EnrollmentFailed { id, .. } => *id,
            SessionEvent::RateUpdated { id, .. } => *id,
        }
    }

    /// Get the event type as string
    pub fn event_type(&self) -> &'static str {
        match self {
            SessionEvent::EnrollmentSucceeded { .. } => "ENROLLMENT_SUCCEEDED",
            SessionEvent::EnrollmentFailed { .. } => "ENROLLMENT_FAILED",
            SessionEvent::RateUpdated { .. } => "RATE_UPDATED",
        }
    }
}

impl std::fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionEvent::EnrollmentSucceeded { course_id, .. } => {
                write!(f, "Enrollment succeeded for course {}", course_id)
            }
            SessionEvent::EnrollmentFailed {
                course_id,
                error_message,
                ..
            } => {
                write!(
                    f,
                    "Enrollment failed for course {}: {}",
                    course_id, error_message
                )
            }
            SessionEvent::RateUpdated { new_rate_usd, .. } => {
                write!(f, "Rate updated: ${:.2}", new_rate_usd)
            }
        }
    }
}
