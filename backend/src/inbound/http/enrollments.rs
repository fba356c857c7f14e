//! Enrollment HTTP handlers.
//!
//! ```text
//! POST   /api/v1/enrollments
//! POST   /api/v1/enrollments/manual
//! GET    /api/v1/enrollments/status
//! DELETE /api/v1/enrollments/{id}
//! ```
//!
//! Every outcome the operator should see is queued as a flash message and
//! echoed in the response body.

use actix_web::{delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    CampaignRef, CourseId, DisenrollOutcome, EnrollmentId, EnrollmentReport, EnrollmentRequest,
    Error, TrainingStatusEntry,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::flash::{Flash, FlashMessage};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Enroll failed campaign recipients into remedial courses.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignEnrollmentRequest {
    pub campaign_id: i64,
    #[serde(default)]
    pub course_ids: Vec<i64>,
    #[serde(default)]
    pub emails: Vec<String>,
}

/// Enroll free-text emails, one per line, outside any campaign.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManualEnrollmentRequest {
    #[serde(default)]
    pub course_ids: Vec<i64>,
    #[serde(default)]
    pub emails_text: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentResultResponse {
    /// (email, course) pairs the learning platform accepted.
    pub remote_successes: usize,
    /// Ledger rows committed.
    pub recorded: usize,
    pub failures: Vec<String>,
    pub storage_error: Option<String>,
    pub messages: Vec<FlashMessage>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrainingStatusResponse {
    pub id: i64,
    /// `0` for manual enrollments.
    pub campaign_id: i64,
    pub user_email: String,
    pub remote_user_id: i64,
    pub remote_course_id: i64,
    pub course_name: String,
    pub enrolled_at: String,
    #[schema(example = "In Progress")]
    pub completion_status: String,
}

impl From<TrainingStatusEntry> for TrainingStatusResponse {
    fn from(value: TrainingStatusEntry) -> Self {
        let record = value.record;
        Self {
            id: record.id.get(),
            campaign_id: record.campaign.get(),
            user_email: record.user_email,
            remote_user_id: record.remote_user_id.get(),
            remote_course_id: record.remote_course_id.get(),
            course_name: value.course_name,
            enrolled_at: record.enrolled_at.to_rfc3339(),
            completion_status: record.completion_status.as_str().to_owned(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DisenrollResponse {
    pub message: String,
}

const LISTED_FAILURES: usize = 5;

/// Operator messages for one enrollment batch.
fn report_messages(report: &EnrollmentReport, campaign: CampaignRef) -> Vec<FlashMessage> {
    let mut messages = Vec::new();
    if report.remote_successes > 0 {
        let outcome = match &report.storage_error {
            Some(error) => FlashMessage::error(format!("Database error: {error}")),
            None if campaign.is_manual() => FlashMessage::success(format!(
                "Process complete. Created {} new course enrollments.",
                report.recorded.len()
            )),
            None => FlashMessage::success(format!(
                "Successfully created {} new enrollments.",
                report.recorded.len()
            )),
        };
        messages.push(outcome);
    }
    if !report.failures.is_empty() {
        messages.push(FlashMessage::error(format!(
            "Failed to create some enrollments: {}",
            failure_summary(&report.failure_messages())
        )));
    }
    messages
}

/// List the first few failures; the response body carries the full list.
fn failure_summary(failures: &[String]) -> String {
    let listed = failures
        .iter()
        .take(LISTED_FAILURES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    match failures.len().saturating_sub(LISTED_FAILURES) {
        0 => listed,
        more => format!("{listed} and {more} more"),
    }
}

async fn run_enrollment(
    state: &HttpState,
    flash: &Flash,
    request: EnrollmentRequest,
) -> ApiResult<web::Json<EnrollmentResultResponse>> {
    let campaign = request.campaign;
    let report = match state.enrollments.enroll(request).await {
        Ok(report) => report,
        Err(error) => {
            flash.push(FlashMessage::error(error.message()))?;
            return Err(error);
        }
    };

    let messages = report_messages(&report, campaign);
    flash.push_all(messages.iter().cloned())?;
    Ok(web::Json(EnrollmentResultResponse {
        remote_successes: report.remote_successes,
        recorded: report.recorded.len(),
        failures: report.failure_messages(),
        storage_error: report.storage_error,
        messages,
    }))
}

fn ledger_not_updated_message(user_email: &str) -> String {
    format!(
        "Disenrolled {user_email} in Moodle, but the enrollment record could not be deleted. \
         It still appears in training status until removed."
    )
}

fn course_ids(raw: Vec<i64>) -> Vec<CourseId> {
    raw.into_iter().map(CourseId::new).collect()
}

/// Enroll campaign recipients into the selected courses.
#[utoipa::path(
    post,
    path = "/api/v1/enrollments",
    request_body = CampaignEnrollmentRequest,
    responses(
        (status = 200, description = "Batch processed", body = EnrollmentResultResponse),
        (status = 400, description = "No course or no user selected", body = ErrorSchema)
    ),
    tags = ["enrollments"],
    operation_id = "enrollCampaignUsers"
)]
#[post("/enrollments")]
pub async fn enroll_campaign(
    state: web::Data<HttpState>,
    flash: Flash,
    payload: web::Json<CampaignEnrollmentRequest>,
) -> ApiResult<web::Json<EnrollmentResultResponse>> {
    let payload = payload.into_inner();
    let request = EnrollmentRequest {
        campaign: CampaignRef::new(payload.campaign_id),
        course_ids: course_ids(payload.course_ids),
        emails: payload.emails,
    };
    run_enrollment(&state, &flash, request).await
}

/// Enroll users typed in by the operator.
#[utoipa::path(
    post,
    path = "/api/v1/enrollments/manual",
    request_body = ManualEnrollmentRequest,
    responses(
        (status = 200, description = "Batch processed", body = EnrollmentResultResponse),
        (status = 400, description = "No email or no course provided", body = ErrorSchema)
    ),
    tags = ["enrollments"],
    operation_id = "enrollManualUsers"
)]
#[post("/enrollments/manual")]
pub async fn enroll_manual(
    state: web::Data<HttpState>,
    flash: Flash,
    payload: web::Json<ManualEnrollmentRequest>,
) -> ApiResult<web::Json<EnrollmentResultResponse>> {
    let payload = payload.into_inner();
    let request = EnrollmentRequest::manual(course_ids(payload.course_ids), &payload.emails_text);
    run_enrollment(&state, &flash, request).await
}

/// Ledger records annotated with live completion status.
#[utoipa::path(
    get,
    path = "/api/v1/enrollments/status",
    responses(
        (status = 200, description = "Training status", body = [TrainingStatusResponse]),
        (status = 503, description = "Ledger unavailable", body = ErrorSchema)
    ),
    tags = ["enrollments"],
    operation_id = "trainingStatus"
)]
#[get("/enrollments/status")]
pub async fn training_status(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<TrainingStatusResponse>>> {
    let entries = state.training_status.training_status().await?;
    Ok(web::Json(
        entries.into_iter().map(TrainingStatusResponse::from).collect(),
    ))
}

/// Remove a user from a course and delete the ledger record.
#[utoipa::path(
    delete,
    path = "/api/v1/enrollments/{id}",
    params(("id" = i64, Path, description = "Ledger record identifier")),
    responses(
        (status = 200, description = "User disenrolled", body = DisenrollResponse),
        (status = 404, description = "Unknown record", body = ErrorSchema),
        (status = 502, description = "Learning platform refused", body = ErrorSchema),
        (status = 503, description = "Un-enrolled remotely but the record was kept", body = ErrorSchema)
    ),
    tags = ["enrollments"],
    operation_id = "disenroll"
)]
#[delete("/enrollments/{id}")]
pub async fn disenroll(
    state: web::Data<HttpState>,
    flash: Flash,
    path: web::Path<i64>,
) -> ApiResult<web::Json<DisenrollResponse>> {
    let outcome = state
        .enrollments
        .disenroll(EnrollmentId::new(path.into_inner()))
        .await?;

    match outcome {
        DisenrollOutcome::Disenrolled { user_email } => {
            let message = format!("Successfully disenrolled {user_email}.");
            flash.push(FlashMessage::success(message.clone()))?;
            Ok(web::Json(DisenrollResponse { message }))
        }
        DisenrollOutcome::NotFound => {
            let message = "Enrollment record not found.";
            flash.push(FlashMessage::error(message))?;
            Err(Error::not_found(message))
        }
        DisenrollOutcome::RemoteRejected { message } => {
            let message = format!("Moodle API error: Could not disenroll user. {message}");
            flash.push(FlashMessage::error(message.clone()))?;
            Err(Error::remote_rejected(message))
        }
        DisenrollOutcome::LedgerNotUpdated { user_email, .. } => {
            let message = ledger_not_updated_message(&user_email);
            flash.push(FlashMessage::error(message.clone()))?;
            Err(Error::service_unavailable(message))
        }
    }
}

#[cfg(test)]
#[path = "enrollments_tests.rs"]
mod tests;
