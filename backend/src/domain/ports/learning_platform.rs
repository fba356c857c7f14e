//! Driven port for the learning-management platform (Moodle web services).
//!
//! Adapters decode every response at the boundary: the domain only sees typed
//! records or a [`LearningPlatformError`], never raw JSON shapes.

use async_trait::async_trait;
use serde::Serialize;

use super::define_port_error;
use crate::domain::{CourseId, LmsUserId};

/// Error code the platform reports when an enrollment succeeded but the
/// welcome notification could not be delivered.
pub const MESSAGE_NOT_SENT_ERRORCODE: &str = "Message was not sent.";

/// User account on the learning platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LmsUser {
    pub id: LmsUserId,
    pub username: String,
    pub fullname: String,
    pub email: String,
}

/// Course on the learning platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Course {
    pub id: CourseId,
    pub fullname: String,
    pub shortname: String,
    pub category_id: Option<i64>,
}

/// Completion state of one user in one course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseCompletion {
    pub completed: bool,
}

/// Connectivity check payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SiteInfo {
    pub site_name: Option<String>,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub release: Option<String>,
    pub version: Option<String>,
}

define_port_error! {
    /// Errors surfaced while calling the learning platform.
    pub enum LearningPlatformError {
        /// Network transport failed or a non-success status came back.
        Transport { message: String } =>
            "learning platform transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } =>
            "learning platform timeout: {message}",
        /// The platform answered with an exception payload.
        Remote { errorcode: String, message: String } =>
            "learning platform error {errorcode}: {message}",
        /// The payload did not have the shape the function promises.
        Decode { message: String } =>
            "learning platform response decode failed: {message}",
    }
}

impl LearningPlatformError {
    /// Whether the primary action took effect and only the notification
    /// email failed.
    pub fn is_notification_failure(&self) -> bool {
        matches!(self, Self::Remote { errorcode, .. } if errorcode == MESSAGE_NOT_SENT_ERRORCODE)
    }

    /// Message reported by the platform itself, if it sent one.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            Self::Remote { message, .. } if !message.is_empty() => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Port for the learning-platform web-service functions the dashboard uses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LearningPlatform: Send + Sync {
    /// Users whose email matches exactly; may hold several accounts.
    async fn find_users_by_email(&self, email: &str)
    -> Result<Vec<LmsUser>, LearningPlatformError>;

    /// Full course catalogue.
    async fn list_courses(&self) -> Result<Vec<Course>, LearningPlatformError>;

    /// One course by identifier.
    async fn find_course(&self, course_id: CourseId)
    -> Result<Option<Course>, LearningPlatformError>;

    /// Users enrolled in a course.
    async fn enrolled_users(&self, course_id: CourseId)
    -> Result<Vec<LmsUser>, LearningPlatformError>;

    /// Courses a user is enrolled in.
    async fn user_courses(&self, user_id: LmsUserId) -> Result<Vec<Course>, LearningPlatformError>;

    /// Manually enrol a user into a course with the student role.
    async fn enrol_user(
        &self,
        user_id: LmsUserId,
        course_id: CourseId,
    ) -> Result<(), LearningPlatformError>;

    /// Remove a manual student enrolment.
    async fn unenrol_user(
        &self,
        user_id: LmsUserId,
        course_id: CourseId,
    ) -> Result<(), LearningPlatformError>;

    /// Completion state for a user in a course.
    async fn course_completion(
        &self,
        course_id: CourseId,
        user_id: LmsUserId,
    ) -> Result<CourseCompletion, LearningPlatformError>;

    /// Site metadata; used as a connectivity check.
    async fn site_info(&self) -> Result<SiteInfo, LearningPlatformError>;
}
