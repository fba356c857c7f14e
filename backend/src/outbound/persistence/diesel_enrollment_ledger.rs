//! PostgreSQL-backed `EnrollmentLedger` implementation using Diesel ORM.
//!
//! Batches are inserted inside one transaction so a failed commit leaves no
//! partial rows behind.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::{debug, warn};

use crate::domain::ports::{EnrollmentLedger, EnrollmentLedgerError};
use crate::domain::{
    CampaignRef, CompletionStatus, CourseId, EnrollmentId, EnrollmentRecord, LmsUserId,
    NewEnrollment,
};

use super::models::{EnrollmentRow, NewEnrollmentRow};
use super::pool::{DbPool, PoolError};
use super::schema::enrollments;

/// Diesel-backed implementation of the `EnrollmentLedger` port.
#[derive(Clone)]
pub struct DieselEnrollmentLedger {
    pool: DbPool,
}

impl DieselEnrollmentLedger {
    /// Create a new ledger with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EnrollmentLedgerError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            EnrollmentLedgerError::connection(message)
        }
    }
}

/// Map Diesel errors, keeping the database message for operators.
fn map_diesel_error(error: diesel::result::Error) -> EnrollmentLedgerError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::NotFound => EnrollmentLedgerError::query("record not found"),
        DieselError::QueryBuilderError(_) => {
            EnrollmentLedgerError::query("database query error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            EnrollmentLedgerError::connection("database connection error")
        }
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
            EnrollmentLedgerError::query(format!("database error: {}", info.message()))
        }
        other => {
            debug!(error = %other, "diesel operation failed");
            EnrollmentLedgerError::query("database error")
        }
    }
}

fn row_to_record(row: EnrollmentRow) -> EnrollmentRecord {
    let completion_status =
        CompletionStatus::from_label(&row.completion_status).unwrap_or_else(|| {
            warn!(
                value = row.completion_status.as_str(),
                enrollment_id = row.id,
                "unrecognised completion status, defaulting to Enrolled"
            );
            CompletionStatus::Enrolled
        });

    EnrollmentRecord {
        id: EnrollmentId::new(row.id),
        campaign: CampaignRef::new(row.campaign_id),
        user_email: row.user_email,
        remote_user_id: LmsUserId::new(row.remote_user_id),
        remote_course_id: CourseId::new(row.remote_course_id),
        enrolled_at: row.enrolled_at,
        completion_status,
    }
}

fn to_new_row(entry: &NewEnrollment) -> NewEnrollmentRow<'_> {
    NewEnrollmentRow {
        campaign_id: entry.campaign.get(),
        user_email: entry.user_email.as_str(),
        remote_user_id: entry.remote_user_id.get(),
        remote_course_id: entry.remote_course_id.get(),
    }
}

#[async_trait]
impl EnrollmentLedger for DieselEnrollmentLedger {
    async fn record_batch(
        &self,
        entries: &[NewEnrollment],
    ) -> Result<Vec<EnrollmentRecord>, EnrollmentLedgerError> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<NewEnrollmentRow<'_>> = entries.iter().map(to_new_row).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let inserted: Vec<EnrollmentRow> = conn
            .transaction(|conn| {
                async move {
                    diesel::insert_into(enrollments::table)
                        .values(&rows)
                        .returning(EnrollmentRow::as_returning())
                        .get_results(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(inserted.into_iter().map(row_to_record).collect())
    }

    async fn list_recent(&self) -> Result<Vec<EnrollmentRecord>, EnrollmentLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<EnrollmentRow> = enrollments::table
            .order((enrollments::enrolled_at.desc(), enrollments::id.desc()))
            .select(EnrollmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_record).collect())
    }

    async fn find_by_id(
        &self,
        id: EnrollmentId,
    ) -> Result<Option<EnrollmentRecord>, EnrollmentLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<EnrollmentRow> = enrollments::table
            .find(id.get())
            .select(EnrollmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_record))
    }

    async fn delete(&self, id: EnrollmentId) -> Result<bool, EnrollmentLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(enrollments::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}
