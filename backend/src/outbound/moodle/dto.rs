//! DTOs for decoding Moodle web-service responses.
//!
//! Every response is first classified into a [`MoodleReply`], then payloads
//! are decoded into the DTOs below and mapped to port types in one pass.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::ports::{Course, CourseCompletion, LmsUser, SiteInfo};
use crate::domain::{CourseId, LmsUserId};

/// Response from one web-service call.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum MoodleReply {
    /// Empty body or JSON `null`; Moodle's way of saying "done".
    Empty,
    /// Any list or mapping without an `exception` key.
    Payload(Value),
    /// A mapping carrying an `exception` key.
    Exception(MoodleExceptionDto),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(super) struct MoodleExceptionDto {
    #[serde(default)]
    pub(super) exception: Value,
    #[serde(default)]
    pub(super) errorcode: Option<String>,
    #[serde(default)]
    pub(super) message: Option<String>,
}

impl MoodleReply {
    /// Classify a raw response body.
    pub(super) fn classify(body: &[u8]) -> Result<Self, String> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::Empty);
        }
        let value: Value = serde_json::from_slice(body)
            .map_err(|error| format!("invalid Moodle JSON payload: {error}"))?;
        if value.is_null() {
            return Ok(Self::Empty);
        }
        if value.get("exception").is_some() {
            return serde_json::from_value(value)
                .map(Self::Exception)
                .map_err(|error| format!("malformed Moodle exception: {error}"));
        }
        Ok(Self::Payload(value))
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    id: i64,
    #[serde(default)]
    username: String,
    #[serde(default)]
    fullname: String,
    #[serde(default)]
    email: String,
}

impl From<UserDto> for LmsUser {
    fn from(value: UserDto) -> Self {
        Self {
            id: LmsUserId::new(value.id),
            username: value.username,
            fullname: value.fullname,
            email: value.email,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CourseDto {
    id: i64,
    #[serde(default)]
    fullname: String,
    #[serde(default)]
    shortname: String,
    #[serde(default, alias = "category")]
    categoryid: Option<i64>,
}

impl From<CourseDto> for Course {
    fn from(value: CourseDto) -> Self {
        Self {
            id: CourseId::new(value.id),
            fullname: value.fullname,
            shortname: value.shortname,
            category_id: value.categoryid,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CoursesByFieldDto {
    #[serde(default)]
    pub(super) courses: Vec<CourseDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CompletionDto {
    #[serde(default)]
    completionstatus: Option<Value>,
}

impl CompletionDto {
    /// Completion state, or `None` when no completion data was returned.
    pub(super) fn into_completion(self) -> Option<CourseCompletion> {
        match self.completionstatus {
            Some(Value::Object(status)) if !status.is_empty() => Some(CourseCompletion {
                completed: status.get("completed").is_some_and(is_truthy),
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct SiteInfoDto {
    sitename: Option<String>,
    username: Option<String>,
    fullname: Option<String>,
    release: Option<String>,
    version: Option<String>,
}

impl From<SiteInfoDto> for SiteInfo {
    fn from(value: SiteInfoDto) -> Self {
        Self {
            site_name: value.sitename,
            username: value.username,
            full_name: value.fullname,
            release: value.release,
            version: value.version,
        }
    }
}

/// Moodle flags arrive as booleans or as `0`/`1`.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty() && text != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Null => false,
    }
}
