//! Enrollment reconciliation services.
//!
//! [`EnrollmentService`] implements the enrollment driving ports on top of a
//! [`LearningPlatform`] and an [`EnrollmentLedger`]. Remote calls run
//! sequentially and one failed item never aborts the rest of a batch. The
//! ledger commit is the only all-or-nothing step.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    CourseCompletion, EnrollmentCommand, EnrollmentLedger, EnrollmentLedgerError,
    LearningPlatform, LearningPlatformError, LmsUser, TrainingStatusQuery,
};
use crate::domain::user_resolution::resolve_user_by_email;
use crate::domain::{
    CompletionStatus, CourseId, DisenrollOutcome, EnrollmentFailure, EnrollmentId,
    EnrollmentRecord, EnrollmentReport, EnrollmentRequest, Error, NewEnrollment,
    TrainingStatusEntry,
};

/// Shown when the platform refuses an un-enrollment without a message.
pub const UNKNOWN_REMOTE_ERROR: &str = "Unknown Moodle API error.";

const MISSING_CAMPAIGN_SELECTION: &str = "Error: You must select at least one course and one user.";
const MISSING_MANUAL_SELECTION: &str =
    "Error: You must provide at least one email and select one course.";

/// Enrollment service implementing [`EnrollmentCommand`] and
/// [`TrainingStatusQuery`].
#[derive(Clone)]
pub struct EnrollmentService<P, L> {
    platform: Arc<P>,
    ledger: Arc<L>,
}

impl<P, L> EnrollmentService<P, L> {
    /// Create a new service over the given platform client and ledger.
    pub fn new(platform: Arc<P>, ledger: Arc<L>) -> Self {
        Self { platform, ledger }
    }
}

fn map_ledger_error(error: EnrollmentLedgerError) -> Error {
    match error {
        EnrollmentLedgerError::Connection { message } => {
            Error::service_unavailable(format!("enrollment ledger unavailable: {message}"))
        }
        EnrollmentLedgerError::Query { message } => {
            Error::internal(format!("enrollment ledger error: {message}"))
        }
    }
}

fn validate(request: &EnrollmentRequest) -> Result<(), Error> {
    if !request.course_ids.is_empty() && !request.emails.is_empty() {
        return Ok(());
    }
    let message = if request.campaign.is_manual() {
        MISSING_MANUAL_SELECTION
    } else {
        MISSING_CAMPAIGN_SELECTION
    };
    Err(Error::invalid_request(message))
}

/// Map a completion payload to the display status.
fn completion_label(result: Result<CourseCompletion, LearningPlatformError>) -> CompletionStatus {
    match result {
        Ok(completion) if completion.completed => CompletionStatus::Completed,
        Ok(_) => CompletionStatus::InProgress,
        Err(error) => {
            debug!(error = %error, "completion status unavailable");
            CompletionStatus::StatusUnavailable
        }
    }
}

impl<P, L> EnrollmentService<P, L>
where
    P: LearningPlatform,
    L: EnrollmentLedger,
{
    /// Enrol one resolved user into one course, classifying the outcome.
    async fn enrol_pair(
        &self,
        user: &LmsUser,
        email: &str,
        course_id: CourseId,
    ) -> Result<(), EnrollmentFailure> {
        match self.platform.enrol_user(user.id, course_id).await {
            Ok(()) => Ok(()),
            Err(error) if error.is_notification_failure() => {
                debug!(
                    email,
                    course_id = course_id.get(),
                    "enrolled; notification email not sent"
                );
                Ok(())
            }
            Err(error) => {
                warn!(
                    email,
                    course_id = course_id.get(),
                    remote_user_id = user.id.get(),
                    error = %error,
                    "enrollment rejected"
                );
                Err(EnrollmentFailure::CourseRejected {
                    email: email.to_owned(),
                    course_id,
                    reason: error.to_string(),
                })
            }
        }
    }

    /// Course names keyed by id; empty when the catalogue is unreachable.
    async fn course_names(&self) -> HashMap<CourseId, String> {
        match self.platform.list_courses().await {
            Ok(courses) => courses
                .into_iter()
                .map(|course| (course.id, course.fullname))
                .collect(),
            Err(error) => {
                warn!(error = %error, "course catalogue unavailable");
                HashMap::new()
            }
        }
    }

    async fn annotate(
        &self,
        mut record: EnrollmentRecord,
        names: &HashMap<CourseId, String>,
    ) -> TrainingStatusEntry {
        let completion = self
            .platform
            .course_completion(record.remote_course_id, record.remote_user_id)
            .await;
        record.completion_status = completion_label(completion);
        let course_name = names.get(&record.remote_course_id).cloned().unwrap_or_else(|| {
            format!("Unknown Course (ID: {})", record.remote_course_id)
        });
        TrainingStatusEntry {
            record,
            course_name,
        }
    }
}

#[async_trait]
impl<P, L> EnrollmentCommand for EnrollmentService<P, L>
where
    P: LearningPlatform,
    L: EnrollmentLedger,
{
    async fn enroll(&self, request: EnrollmentRequest) -> Result<EnrollmentReport, Error> {
        validate(&request)?;

        let mut report = EnrollmentReport::default();
        let mut pending = Vec::new();

        for email in &request.emails {
            let Some(user) = resolve_user_by_email(self.platform.as_ref(), email).await else {
                info!(email = %email, "user not found on learning platform");
                report.failures.push(EnrollmentFailure::UserNotFound {
                    email: email.clone(),
                });
                continue;
            };

            for &course_id in &request.course_ids {
                match self.enrol_pair(&user, email, course_id).await {
                    Ok(()) => pending.push(NewEnrollment {
                        campaign: request.campaign,
                        user_email: email.clone(),
                        remote_user_id: user.id,
                        remote_course_id: course_id,
                    }),
                    Err(failure) => report.failures.push(failure),
                }
            }
        }

        report.remote_successes = pending.len();
        if pending.is_empty() {
            return Ok(report);
        }

        match self.ledger.record_batch(&pending).await {
            Ok(records) => {
                info!(
                    campaign_id = request.campaign.get(),
                    recorded = records.len(),
                    "enrollment batch recorded"
                );
                report.recorded = records;
            }
            Err(error) => {
                warn!(
                    campaign_id = request.campaign.get(),
                    remote_successes = report.remote_successes,
                    error = %error,
                    "enrollment batch rolled back"
                );
                report.storage_error = Some(error.to_string());
            }
        }
        Ok(report)
    }

    async fn disenroll(&self, id: EnrollmentId) -> Result<DisenrollOutcome, Error> {
        let Some(record) = self
            .ledger
            .find_by_id(id)
            .await
            .map_err(map_ledger_error)?
        else {
            return Ok(DisenrollOutcome::NotFound);
        };

        if let Err(error) = self
            .platform
            .unenrol_user(record.remote_user_id, record.remote_course_id)
            .await
        {
            warn!(
                enrollment_id = id.get(),
                remote_user_id = record.remote_user_id.get(),
                course_id = record.remote_course_id.get(),
                error = %error,
                "un-enrollment rejected"
            );
            let message = error.remote_message().unwrap_or(UNKNOWN_REMOTE_ERROR);
            return Ok(DisenrollOutcome::RemoteRejected {
                message: message.to_owned(),
            });
        }

        match self.ledger.delete(id).await {
            Ok(true) => {
                info!(enrollment_id = id.get(), email = %record.user_email, "disenrolled");
            }
            Ok(false) => {
                warn!(
                    enrollment_id = id.get(),
                    email = %record.user_email,
                    "ledger row already gone after un-enrollment"
                );
            }
            Err(error) => {
                warn!(
                    enrollment_id = id.get(),
                    email = %record.user_email,
                    error = %error,
                    "un-enrolled remotely but ledger row not deleted"
                );
                return Ok(DisenrollOutcome::LedgerNotUpdated {
                    user_email: record.user_email,
                    reason: error.to_string(),
                });
            }
        }
        Ok(DisenrollOutcome::Disenrolled {
            user_email: record.user_email,
        })
    }
}

#[async_trait]
impl<P, L> TrainingStatusQuery for EnrollmentService<P, L>
where
    P: LearningPlatform,
    L: EnrollmentLedger,
{
    async fn training_status(&self) -> Result<Vec<TrainingStatusEntry>, Error> {
        let records = self.ledger.list_recent().await.map_err(map_ledger_error)?;
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let names = self.course_names().await;
        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            entries.push(self.annotate(record, &names).await);
        }
        Ok(entries)
    }
}

#[cfg(test)]
#[path = "enrollment_service_tests.rs"]
mod tests;
