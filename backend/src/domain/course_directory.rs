//! Course directory service: read-only browsing of the learning platform.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{
    Course, CourseDirectoryQuery, CourseUsersView, LearningPlatform, LearningPlatformError,
    SiteInfo, UserSearchView,
};
use crate::domain::user_resolution::resolve_user_by_email;
use crate::domain::{CourseId, Error};

const UNKNOWN_COURSE_NAME: &str = "Unknown";

/// Implements [`CourseDirectoryQuery`].
#[derive(Clone)]
pub struct CourseDirectoryService<P> {
    platform: Arc<P>,
}

impl<P> CourseDirectoryService<P> {
    pub fn new(platform: Arc<P>) -> Self {
        Self { platform }
    }
}

fn empty_on_error<T>(result: Result<Vec<T>, LearningPlatformError>, what: &str) -> Vec<T> {
    result.unwrap_or_else(|error| {
        warn!(error = %error, what, "learning platform read failed");
        Vec::new()
    })
}

#[async_trait]
impl<P> CourseDirectoryQuery for CourseDirectoryService<P>
where
    P: LearningPlatform,
{
    async fn list_courses(&self) -> Vec<Course> {
        empty_on_error(self.platform.list_courses().await, "courses")
    }

    async fn course_users(&self, course_id: CourseId) -> CourseUsersView {
        let course_name = match self.platform.find_course(course_id).await {
            Ok(Some(course)) => course.fullname,
            Ok(None) => UNKNOWN_COURSE_NAME.to_owned(),
            Err(error) => {
                warn!(course_id = course_id.get(), error = %error, "course lookup failed");
                UNKNOWN_COURSE_NAME.to_owned()
            }
        };
        let users = empty_on_error(
            self.platform.enrolled_users(course_id).await,
            "enrolled users",
        );
        CourseUsersView {
            course_id,
            course_name,
            users,
        }
    }

    async fn search_user(&self, email: &str) -> Result<UserSearchView, Error> {
        let email = email.trim();
        if email.is_empty() {
            return Err(Error::invalid_request("email must not be empty"));
        }

        let Some(user) = resolve_user_by_email(self.platform.as_ref(), email).await else {
            return Ok(UserSearchView {
                email: email.to_owned(),
                user: None,
                courses: Vec::new(),
                searched: true,
            });
        };
        let courses = empty_on_error(self.platform.user_courses(user.id).await, "user courses");
        Ok(UserSearchView {
            email: email.to_owned(),
            user: Some(user),
            courses,
            searched: true,
        })
    }

    async fn site_info(&self) -> Result<SiteInfo, Error> {
        self.platform.site_info().await.map_err(|error| {
            warn!(error = %error, "learning platform connectivity check failed");
            Error::service_unavailable(format!("learning platform unreachable: {error}"))
        })
    }
}
