//! Enrollment ledger entities and workflow reports.
//!
//! An [`EnrollmentRecord`] is what the dashboard believes it enrolled. It is
//! created only after the learning platform accepted the enrollment and is
//! deleted only after the platform confirmed the un-enrollment. Nothing ties
//! it to the platform's own enrollment table, so status must be re-queried.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Local ledger identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnrollmentId(i64);

impl EnrollmentId {
    /// Wrap a raw ledger identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EnrollmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Campaign that triggered an enrollment.
///
/// `0` means the enrollment was entered by hand rather than from a campaign
/// view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignRef(i64);

impl CampaignRef {
    /// Reference used for manual enrollments.
    pub const MANUAL: Self = Self(0);

    /// Wrap a campaign identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw campaign identifier.
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Whether this reference denotes a manual enrollment.
    pub const fn is_manual(self) -> bool {
        self.0 == 0
    }
}

/// Learning-platform course identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(i64);

impl CourseId {
    /// Wrap a course identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw course identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Learning-platform user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LmsUserId(i64);

impl LmsUserId {
    /// Wrap a user identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw user identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for LmsUserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display status derived from the learning platform's completion data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompletionStatus {
    /// Freshly recorded; no status query has run yet.
    #[default]
    #[serde(rename = "Enrolled")]
    Enrolled,
    /// Completion tracked but not yet complete.
    #[serde(rename = "In Progress")]
    InProgress,
    /// Course completed.
    #[serde(rename = "Completed")]
    Completed,
    /// The platform returned an error or an unrecognised shape.
    #[serde(rename = "Status Unavailable")]
    StatusUnavailable,
}

impl CompletionStatus {
    /// Label stored in the ledger and shown to operators.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enrolled => "Enrolled",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::StatusUnavailable => "Status Unavailable",
        }
    }

    /// Parse a stored label, returning `None` for unknown values.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Enrolled" => Some(Self::Enrolled),
            "In Progress" => Some(Self::InProgress),
            "Completed" => Some(Self::Completed),
            "Status Unavailable" => Some(Self::StatusUnavailable),
            _ => None,
        }
    }
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted enrollment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    pub id: EnrollmentId,
    pub campaign: CampaignRef,
    pub user_email: String,
    pub remote_user_id: LmsUserId,
    pub remote_course_id: CourseId,
    pub enrolled_at: DateTime<Utc>,
    /// Recomputed on each status pass and never written back.
    pub completion_status: CompletionStatus,
}

/// Pending ledger insert produced by a successful remote enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEnrollment {
    pub campaign: CampaignRef,
    pub user_email: String,
    pub remote_user_id: LmsUserId,
    pub remote_course_id: CourseId,
}

/// Request accepted by the enrollment reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentRequest {
    pub campaign: CampaignRef,
    pub course_ids: Vec<CourseId>,
    /// Duplicates are not removed and produce duplicate ledger rows.
    pub emails: Vec<String>,
}

impl EnrollmentRequest {
    /// Build a manual request from free text holding one email per line.
    ///
    /// Lines are trimmed and blank lines dropped.
    ///
    /// # Examples
    /// ```
    /// use dashboard::domain::{CampaignRef, CourseId, EnrollmentRequest};
    ///
    /// let request = EnrollmentRequest::manual(vec![CourseId::new(7)], "a@x.com\n\n  b@x.com \n");
    /// assert_eq!(request.campaign, CampaignRef::MANUAL);
    /// assert_eq!(request.emails, vec!["a@x.com", "b@x.com"]);
    /// ```
    pub fn manual(course_ids: Vec<CourseId>, emails_text: &str) -> Self {
        Self {
            campaign: CampaignRef::MANUAL,
            course_ids,
            emails: emails_text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_owned)
                .collect(),
        }
    }
}

/// One failed item in an enrollment batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EnrollmentFailure {
    /// The email did not resolve to a learning-platform user.
    #[serde(rename_all = "camelCase")]
    UserNotFound { email: String },
    /// The platform rejected the enrollment of a resolved user.
    #[serde(rename_all = "camelCase")]
    CourseRejected {
        email: String,
        course_id: CourseId,
        reason: String,
    },
}

impl fmt::Display for EnrollmentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserNotFound { email } => write!(f, "{email} (User not found)"),
            Self::CourseRejected {
                email, course_id, ..
            } => write!(f, "{email} -> CourseID {course_id}"),
        }
    }
}

/// Outcome of one enrollment batch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnrollmentReport {
    /// Pairs the learning platform accepted.
    pub remote_successes: usize,
    /// Ledger rows committed for this batch.
    pub recorded: Vec<EnrollmentRecord>,
    pub failures: Vec<EnrollmentFailure>,
    /// Set when the batch commit failed; remote enrollments still stand.
    pub storage_error: Option<String>,
}

impl EnrollmentReport {
    /// Human-readable failure descriptions, one per failed item.
    pub fn failure_messages(&self) -> Vec<String> {
        self.failures.iter().map(ToString::to_string).collect()
    }
}

/// Result of a disenroll request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisenrollOutcome {
    /// Remote un-enrollment confirmed and the ledger row deleted.
    Disenrolled { user_email: String },
    /// No ledger row with that identifier; nothing was sent remotely.
    NotFound,
    /// The platform refused; the ledger row was kept.
    RemoteRejected { message: String },
    /// The platform confirmed the un-enrollment but the ledger row could not
    /// be deleted, so the ledger still lists an enrollment that is gone.
    LedgerNotUpdated { user_email: String, reason: String },
}

/// Ledger record annotated for display.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingStatusEntry {
    pub record: EnrollmentRecord,
    pub course_name: String,
}
