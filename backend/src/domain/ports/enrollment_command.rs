//! Driving ports for enrollment mutations and training status reads.
//!
//! Inbound adapters call these without knowing which learning platform or
//! ledger backs them.

use async_trait::async_trait;

use crate::domain::{
    DisenrollOutcome, EnrollmentId, EnrollmentReport, EnrollmentRequest, Error, TrainingStatusEntry,
};

/// Domain use-case port for enrolling and disenrolling users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentCommand: Send + Sync {
    /// Enrol every resolvable email into every requested course.
    ///
    /// Per-item failures are reported inside the [`EnrollmentReport`]; only a
    /// malformed request returns an error.
    async fn enroll(&self, request: EnrollmentRequest) -> Result<EnrollmentReport, Error>;

    /// Remove one ledger enrollment after the platform confirms it.
    async fn disenroll(&self, id: EnrollmentId) -> Result<DisenrollOutcome, Error>;
}

/// Domain use-case port for the training status view.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrainingStatusQuery: Send + Sync {
    /// Ledger records, newest first, annotated with live completion status.
    async fn training_status(&self) -> Result<Vec<TrainingStatusEntry>, Error>;
}
