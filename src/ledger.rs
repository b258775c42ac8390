//! Ledger client abstraction for catalog reads and enrollment writes
//!
//! The transport (RPC, wallet signing, contract ABI) lives behind this
//! trait. Read operations distinguish "not yet loaded" from "empty" via
//! [`LedgerError::NotReady`] so the catalog can render a loading state.

use crate::{
    error::LedgerError,
    types::{RawCourseRecord, TxReceipt},
};
use async_trait::async_trait;

/// Trait for ledger clients
///
/// Implementations bridge to the on-chain course marketplace contract.
/// Write permissions (owner-only course creation) are enforced by the
/// contract itself; this layer only reflects them in the UI affordances.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Fetches all course records
    ///
    /// # Returns
    /// The full course list, or [`LedgerError::NotReady`] while the read
    /// has not resolved yet. An empty list is a valid, loaded catalog.
    async fn get_all_courses(&self) -> Result<Vec<RawCourseRecord>, LedgerError>;

    /// Fetches the marketplace owner address
    async fn get_owner(&self) -> Result<String, LedgerError>;

    /// Checks whether an identity is enrolled in a course
    async fn is_enrolled(&self, address: &str, course_id: &str) -> Result<bool, LedgerError>;

    /// Fetches the enrolled identities for one course
    async fn get_students_by_course(&self, course_id: &str) -> Result<Vec<String>, LedgerError>;

    /// Creates a new course (owner-only by contract enforcement)
    async fn create_course(
        &self,
        name: &str,
        description: &str,
        price_wei: u128,
    ) -> Result<TxReceipt, LedgerError>;

    /// Pays for and registers into a course
    ///
    /// # Arguments
    /// * `course_id` - The course to enroll in
    /// * `value_wei` - Payment amount in the smallest unit, must equal the
    ///   course price exactly
    async fn buy_and_register(
        &self,
        course_id: &str,
        value_wei: u128,
    ) -> Result<TxReceipt, LedgerError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Scripted outcome for the next enrollment writes
    enum BuyOutcome {
        Succeed,
        Reject(String),
        Revert(String),
    }

    /// Mock ledger client for testing
    pub struct MockLedgerClient {
        courses: Mutex<Option<Vec<RawCourseRecord>>>,
        owner: Mutex<Option<String>>,
        enrollments: Mutex<HashSet<(String, String)>>,
        students: Mutex<HashMap<String, Vec<String>>>,
        buy_outcome: Mutex<BuyOutcome>,
        buy_delay: Mutex<Duration>,
        read_delay: Mutex<Duration>,
        buy_calls: Mutex<usize>,
        student_calls: Mutex<usize>,
    }

    impl Default for MockLedgerClient {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockLedgerClient {
        pub fn new() -> Self {
            Self {
                courses: Mutex::new(None),
                owner: Mutex::new(None),
                enrollments: Mutex::new(HashSet::new()),
                students: Mutex::new(HashMap::new()),
                buy_outcome: Mutex::new(BuyOutcome::Succeed),
                buy_delay: Mutex::new(Duration::ZERO),
                read_delay: Mutex::new(Duration::ZERO),
                buy_calls: Mutex::new(0),
                student_calls: Mutex::new(0),
            }
        }

        pub fn set_courses(&self, courses: Vec<RawCourseRecord>) {
            *self.courses.lock().unwrap() = Some(courses);
        }

        pub fn set_not_ready(&self) {
            *self.courses.lock().unwrap() = None;
        }

        pub fn set_owner(&self, owner: &str) {
            *self.owner.lock().unwrap() = Some(owner.to_string());
        }

        pub fn add_enrollment(&self, address: &str, course_id: &str) {
            self.enrollments
                .lock()
                .unwrap()
                .insert((address.to_string(), course_id.to_string()));
        }

        pub fn set_students(&self, course_id: &str, students: Vec<String>) {
            self.students
                .lock()
                .unwrap()
                .insert(course_id.to_string(), students);
        }

        pub fn set_buy_rejection(&self, message: &str) {
            *self.buy_outcome.lock().unwrap() = BuyOutcome::Reject(message.to_string());
        }

        pub fn set_buy_revert(&self, message: &str) {
            *self.buy_outcome.lock().unwrap() = BuyOutcome::Revert(message.to_string());
        }

        /// Delays enrollment writes so tests can observe the in-flight state
        pub fn set_buy_delay(&self, delay: Duration) {
            *self.buy_delay.lock().unwrap() = delay;
        }

        /// Delays catalog reads so tests can observe in-flight refreshes
        pub fn set_read_delay(&self, delay: Duration) {
            *self.read_delay.lock().unwrap() = delay;
        }

        pub fn buy_calls(&self) -> usize {
            *self.buy_calls.lock().unwrap()
        }

        pub fn student_calls(&self) -> usize {
            *self.student_calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl LedgerClient for MockLedgerClient {
        async fn get_all_courses(&self) -> Result<Vec<RawCourseRecord>, LedgerError> {
            let delay = *self.read_delay.lock().unwrap();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            self.courses
                .lock()
                .unwrap()
                .clone()
                .ok_or(LedgerError::NotReady)
        }

        async fn get_owner(&self) -> Result<String, LedgerError> {
            self.owner.lock().unwrap().clone().ok_or(LedgerError::NotReady)
        }

        async fn is_enrolled(&self, address: &str, course_id: &str) -> Result<bool, LedgerError> {
            Ok(self
                .enrollments
                .lock()
                .unwrap()
                .contains(&(address.to_string(), course_id.to_string())))
        }

        async fn get_students_by_course(
            &self,
            course_id: &str,
        ) -> Result<Vec<String>, LedgerError> {
            *self.student_calls.lock().unwrap() += 1;
            Ok(self
                .students
                .lock()
                .unwrap()
                .get(course_id)
                .cloned()
                .unwrap_or_default())
        }

        async fn create_course(
            &self,
            name: &str,
            description: &str,
            price_wei: u128,
        ) -> Result<TxReceipt, LedgerError> {
            let mut courses = self.courses.lock().unwrap();
            let list = courses.get_or_insert_with(Vec::new);
            let id = (list.len() + 1).to_string();
            list.push(RawCourseRecord {
                id: id.clone(),
                name: name.to_string(),
                description: description.to_string(),
                price_wei: price_wei.to_string(),
                is_active: true,
                student_count: 0,
            });
            Ok(TxReceipt {
                tx_hash: format!("0xcreate{}", id),
            })
        }

        async fn buy_and_register(
            &self,
            course_id: &str,
            _value_wei: u128,
        ) -> Result<TxReceipt, LedgerError> {
            let call = {
                let mut calls = self.buy_calls.lock().unwrap();
                *calls += 1;
                *calls
            };

            let delay = *self.buy_delay.lock().unwrap();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let outcome = self.buy_outcome.lock().unwrap();
            match &*outcome {
                BuyOutcome::Succeed => Ok(TxReceipt {
                    tx_hash: format!("0xbuy{}{}", course_id, call),
                }),
                BuyOutcome::Reject(msg) => Err(LedgerError::Rejected(msg.clone())),
                BuyOutcome::Revert(msg) => Err(LedgerError::Reverted(msg.clone())),
            }
        }
    }
}
