//! Port for the local enrollment ledger.
//!
//! The ledger records enrollments the dashboard performed. Batches are
//! written atomically: either every row of a batch is stored or none is.

use async_trait::async_trait;

use crate::domain::{EnrollmentId, EnrollmentRecord, NewEnrollment};

use super::define_port_error;

define_port_error! {
    /// Errors raised by enrollment ledger adapters.
    pub enum EnrollmentLedgerError {
        /// Ledger connection could not be established.
        Connection { message: String } =>
            "enrollment ledger connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "enrollment ledger query failed: {message}",
    }
}

/// Port for enrollment ledger storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentLedger: Send + Sync {
    /// Insert a batch in one transaction and return the stored rows.
    ///
    /// On error nothing from the batch is stored.
    async fn record_batch(
        &self,
        entries: &[NewEnrollment],
    ) -> Result<Vec<EnrollmentRecord>, EnrollmentLedgerError>;

    /// All records, newest first.
    async fn list_recent(&self) -> Result<Vec<EnrollmentRecord>, EnrollmentLedgerError>;

    /// Look up one record.
    async fn find_by_id(
        &self,
        id: EnrollmentId,
    ) -> Result<Option<EnrollmentRecord>, EnrollmentLedgerError>;

    /// Delete one record, returning whether a row was removed.
    async fn delete(&self, id: EnrollmentId) -> Result<bool, EnrollmentLedgerError>;
}
