//! Reqwest-backed Moodle web-service adapter.
//!
//! Every function is a form-encoded POST to the REST endpoint carrying the
//! token and function name. Responses are classified into a [`MoodleReply`]
//! before any payload decoding.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::{
    CompletionDto, CourseDto, CoursesByFieldDto, MoodleExceptionDto, MoodleReply, SiteInfoDto,
    UserDto,
};
use crate::domain::ports::{
    Course, CourseCompletion, LearningPlatform, LearningPlatformError, LmsUser, SiteInfo,
};
use crate::domain::{CourseId, LmsUserId};
use crate::outbound::body_preview;

/// Default timeout for learning-platform calls.
pub const DEFAULT_MOODLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Role id of the built-in student role.
const STUDENT_ROLE_ID: &str = "5";
const REST_PATH: &str = "webservice/rest/server.php";

type Params = Vec<(String, String)>;

/// Moodle adapter calling the REST web-service endpoint.
pub struct MoodleHttpClient {
    client: Client,
    endpoint: Url,
    token: String,
}

impl MoodleHttpClient {
    /// Build an adapter for the site at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: rest_endpoint(base_url),
            token: token.into(),
        })
    }

    async fn call(
        &self,
        function: &str,
        params: Params,
    ) -> Result<MoodleReply, LearningPlatformError> {
        debug!(function, "calling learning platform");
        let mut form = vec![
            ("wstoken".to_owned(), self.token.clone()),
            ("wsfunction".to_owned(), function.to_owned()),
            ("moodlewsrestformat".to_owned(), "json".to_owned()),
        ];
        form.extend(params);

        let response = self
            .client
            .post(self.endpoint.clone())
            .form(&form)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        MoodleReply::classify(body.as_ref()).map_err(LearningPlatformError::decode)
    }

    /// Call a function whose reply must be a payload of type `T`.
    async fn fetch<T: DeserializeOwned>(
        &self,
        function: &str,
        params: Params,
    ) -> Result<T, LearningPlatformError> {
        match self.call(function, params).await? {
            MoodleReply::Payload(value) => serde_json::from_value(value).map_err(|error| {
                LearningPlatformError::decode(format!("{function}: {error}"))
            }),
            MoodleReply::Empty => Err(LearningPlatformError::decode(format!(
                "{function}: empty response"
            ))),
            MoodleReply::Exception(exception) => Err(remote_error(exception)),
        }
    }
}

fn rest_endpoint(mut base_url: Url) -> Url {
    let path = base_url.path().trim_end_matches('/').to_owned();
    base_url.set_path(&format!("{path}/{REST_PATH}"));
    base_url
}

fn param(key: &str, value: impl ToString) -> (String, String) {
    (key.to_owned(), value.to_string())
}

fn enrolment_params(user_id: LmsUserId, course_id: CourseId) -> Params {
    vec![
        param("enrolments[0][roleid]", STUDENT_ROLE_ID),
        param("enrolments[0][userid]", user_id),
        param("enrolments[0][courseid]", course_id),
    ]
}

fn remote_error(exception: MoodleExceptionDto) -> LearningPlatformError {
    let errorcode = exception.errorcode.unwrap_or_else(|| match exception.exception {
        serde_json::Value::String(name) => name,
        _ => String::new(),
    });
    LearningPlatformError::remote(errorcode, exception.message.unwrap_or_default())
}

/// Enrolment succeeds unless the platform raised an exception.
fn enrolment_outcome(reply: MoodleReply) -> Result<(), LearningPlatformError> {
    match reply {
        MoodleReply::Exception(exception) => Err(remote_error(exception)),
        MoodleReply::Empty | MoodleReply::Payload(_) => Ok(()),
    }
}

/// Un-enrolment succeeds only on an empty reply or a mapping.
fn unenrolment_outcome(reply: MoodleReply) -> Result<(), LearningPlatformError> {
    match reply {
        MoodleReply::Empty => Ok(()),
        MoodleReply::Payload(value) if value.is_object() => Ok(()),
        MoodleReply::Payload(_) => Err(LearningPlatformError::decode(
            "unexpected un-enrolment response",
        )),
        MoodleReply::Exception(exception) => Err(remote_error(exception)),
    }
}

#[async_trait]
impl LearningPlatform for MoodleHttpClient {
    async fn find_users_by_email(
        &self,
        email: &str,
    ) -> Result<Vec<LmsUser>, LearningPlatformError> {
        let users: Vec<UserDto> = self
            .fetch(
                "core_user_get_users_by_field",
                vec![param("field", "email"), param("values[0]", email)],
            )
            .await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    async fn list_courses(&self) -> Result<Vec<Course>, LearningPlatformError> {
        let courses: Vec<CourseDto> = self.fetch("core_course_get_courses", Vec::new()).await?;
        Ok(courses.into_iter().map(Into::into).collect())
    }

    async fn find_course(
        &self,
        course_id: CourseId,
    ) -> Result<Option<Course>, LearningPlatformError> {
        let found: CoursesByFieldDto = self
            .fetch(
                "core_course_get_courses_by_field",
                vec![param("field", "id"), param("value", course_id)],
            )
            .await?;
        Ok(found.courses.into_iter().next().map(Into::into))
    }

    async fn enrolled_users(
        &self,
        course_id: CourseId,
    ) -> Result<Vec<LmsUser>, LearningPlatformError> {
        let users: Vec<UserDto> = self
            .fetch(
                "core_enrol_get_enrolled_users",
                vec![param("courseid", course_id)],
            )
            .await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    async fn user_courses(&self, user_id: LmsUserId) -> Result<Vec<Course>, LearningPlatformError> {
        let courses: Vec<CourseDto> = self
            .fetch("core_enrol_get_users_courses", vec![param("userid", user_id)])
            .await?;
        Ok(courses.into_iter().map(Into::into).collect())
    }

    async fn enrol_user(
        &self,
        user_id: LmsUserId,
        course_id: CourseId,
    ) -> Result<(), LearningPlatformError> {
        let reply = self
            .call(
                "enrol_manual_enrol_users",
                enrolment_params(user_id, course_id),
            )
            .await?;
        enrolment_outcome(reply)
    }

    async fn unenrol_user(
        &self,
        user_id: LmsUserId,
        course_id: CourseId,
    ) -> Result<(), LearningPlatformError> {
        let reply = self
            .call(
                "enrol_manual_unenrol_users",
                enrolment_params(user_id, course_id),
            )
            .await?;
        unenrolment_outcome(reply)
    }

    async fn course_completion(
        &self,
        course_id: CourseId,
        user_id: LmsUserId,
    ) -> Result<CourseCompletion, LearningPlatformError> {
        let completion: CompletionDto = self
            .fetch(
                "core_completion_get_course_completion_status",
                vec![param("courseid", course_id), param("userid", user_id)],
            )
            .await?;
        completion
            .into_completion()
            .ok_or_else(|| LearningPlatformError::decode("no completion status returned"))
    }

    async fn site_info(&self) -> Result<SiteInfo, LearningPlatformError> {
        let info: SiteInfoDto = self
            .fetch("core_webservice_get_site_info", Vec::new())
            .await?;
        Ok(info.into())
    }
}

fn map_transport_error(error: reqwest::Error) -> LearningPlatformError {
    if error.is_timeout() {
        LearningPlatformError::timeout(error.to_string())
    } else {
        LearningPlatformError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> LearningPlatformError {
    let preview = body_preview(body);
    if preview.is_empty() {
        LearningPlatformError::transport(format!("status {}", status.as_u16()))
    } else {
        LearningPlatformError::transport(format!("status {}: {preview}", status.as_u16()))
    }
}
