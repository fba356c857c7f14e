//! Driving port for browsing the learning platform.

use async_trait::async_trait;
use serde::Serialize;

use super::{Course, LmsUser, SiteInfo};
use crate::domain::{CourseId, Error};

/// Enrolled users of one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseUsersView {
    pub course_id: CourseId,
    /// `Unknown` when the course could not be fetched.
    pub course_name: String,
    pub users: Vec<LmsUser>,
}

/// Result of searching for a user by email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSearchView {
    pub email: String,
    pub user: Option<LmsUser>,
    pub courses: Vec<Course>,
    pub searched: bool,
}

/// Domain use-case port for course and user lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseDirectoryQuery: Send + Sync {
    /// Course catalogue; empty when the platform is unreachable.
    async fn list_courses(&self) -> Vec<Course>;

    /// Users enrolled in a course.
    async fn course_users(&self, course_id: CourseId) -> CourseUsersView;

    /// Resolve an email and list that user's courses.
    async fn search_user(&self, email: &str) -> Result<UserSearchView, Error>;

    /// Connectivity check.
    async fn site_info(&self) -> Result<SiteInfo, Error>;
}
