//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::web;

use crate::domain::ports::{
    MockCampaignQuery, MockContentLabCommand, MockCourseDirectoryQuery, MockEnrollmentCommand,
    MockTrainingStatusQuery,
};
use crate::inbound::http::state::HttpState;

pub const TEST_SESSION_COOKIE: &str = "session";

/// Build a session middleware configured for tests.
///
/// Each call generates a fresh key and disables the `Secure` flag so cookies
/// flow over plain HTTP test requests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(TEST_SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// Session cookie set by a response, if any.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == TEST_SESSION_COOKIE)
        .map(|cookie| cookie.into_owned())
}

/// Builder for [`HttpState`] backed by strict mocks.
///
/// Ports left unset panic on any call, so each test names exactly the
/// collaborators it exercises.
pub struct TestStateBuilder {
    campaigns: MockCampaignQuery,
    enrollments: MockEnrollmentCommand,
    training_status: MockTrainingStatusQuery,
    courses: MockCourseDirectoryQuery,
    content_lab: MockContentLabCommand,
}

pub fn test_state() -> TestStateBuilder {
    TestStateBuilder {
        campaigns: MockCampaignQuery::new(),
        enrollments: MockEnrollmentCommand::new(),
        training_status: MockTrainingStatusQuery::new(),
        courses: MockCourseDirectoryQuery::new(),
        content_lab: MockContentLabCommand::new(),
    }
}

impl TestStateBuilder {
    pub fn with_campaigns(mut self, mock: MockCampaignQuery) -> Self {
        self.campaigns = mock;
        self
    }

    pub fn with_enrollments(mut self, mock: MockEnrollmentCommand) -> Self {
        self.enrollments = mock;
        self
    }

    pub fn with_training_status(mut self, mock: MockTrainingStatusQuery) -> Self {
        self.training_status = mock;
        self
    }

    pub fn with_courses(mut self, mock: MockCourseDirectoryQuery) -> Self {
        self.courses = mock;
        self
    }

    pub fn with_content_lab(mut self, mock: MockContentLabCommand) -> Self {
        self.content_lab = mock;
        self
    }

    pub fn build(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(
            Arc::new(self.campaigns),
            Arc::new(self.enrollments),
            Arc::new(self.training_status),
            Arc::new(self.courses),
            Arc::new(self.content_lab),
        ))
    }
}
