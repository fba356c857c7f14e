//! Domain primitives, services and ports.
//!
//! Purpose: Define the enrollment reconciliation workflow and the views the
//! dashboard serves, independent of the remote services and storage behind
//! them. Adapters plug in through [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - EnrollmentService: enrollment, disenroll and training status.
//! - CampaignService, CourseDirectoryService, ContentLabService: read views
//!   and the content lab.

mod campaign;
mod campaign_service;
mod content_lab;
mod course_directory;
mod enrollment;
mod enrollment_service;
pub mod error;
pub mod ports;
mod trace_id;
mod user_resolution;

pub use self::campaign::{
    CampaignDetail, CampaignResult, CampaignStats, CampaignSummary, FAILED_RESULT_STATUSES,
};
pub use self::campaign_service::CampaignService;
pub use self::content_lab::{
    ContentLabService, ContentType, INVALID_TYPE_MESSAGE, NOT_CONFIGURED_MESSAGE,
};
pub use self::course_directory::CourseDirectoryService;
pub use self::enrollment::{
    CampaignRef, CompletionStatus, CourseId, DisenrollOutcome, EnrollmentFailure, EnrollmentId,
    EnrollmentRecord, EnrollmentReport, EnrollmentRequest, LmsUserId, NewEnrollment,
    TrainingStatusEntry,
};
pub use self::enrollment_service::{EnrollmentService, UNKNOWN_REMOTE_ERROR};
pub use self::error::{Error, ErrorCode};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user_resolution::resolve_user_by_email;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use dashboard::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("no such enrollment"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
