//! Shared test doubles for the integration suites.
//!
//! The doubles record every call so tests can assert on remote traffic as
//! well as on returned values.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use dashboard::domain::ports::{
    Course, CourseCompletion, EnrollmentLedger, EnrollmentLedgerError, LearningPlatform,
    LearningPlatformError, LmsUser, MESSAGE_NOT_SENT_ERRORCODE, SiteInfo,
};
use dashboard::domain::{
    CompletionStatus, CourseId, EnrollmentId, EnrollmentRecord, LmsUserId, NewEnrollment,
};

/// One remote call observed by [`RecordingPlatform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    FindUsers(String),
    Enrol(LmsUserId, CourseId),
    Unenrol(LmsUserId, CourseId),
    Completion(CourseId, LmsUserId),
    ListCourses,
}

/// In-memory learning platform with scripted users and rejections.
#[derive(Default)]
pub struct RecordingPlatform {
    users: HashMap<String, Vec<LmsUser>>,
    courses: Vec<Course>,
    rejected: HashSet<(LmsUserId, CourseId)>,
    unsent_notifications: HashSet<(LmsUserId, CourseId)>,
    completed: HashSet<(LmsUserId, CourseId)>,
    unenrol_error: Option<LearningPlatformError>,
    calls: Mutex<Vec<PlatformCall>>,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, id: i64, email: &str) -> Self {
        self.users.entry(email.to_owned()).or_default().push(LmsUser {
            id: LmsUserId::new(id),
            username: format!("user{id}"),
            fullname: format!("User {id}"),
            email: email.to_owned(),
        });
        self
    }

    pub fn with_course(mut self, id: i64, name: &str) -> Self {
        self.courses.push(Course {
            id: CourseId::new(id),
            fullname: name.to_owned(),
            shortname: format!("C{id}"),
            category_id: Some(1),
        });
        self
    }

    pub fn rejecting(mut self, user: i64, course: i64) -> Self {
        self.rejected
            .insert((LmsUserId::new(user), CourseId::new(course)));
        self
    }

    pub fn without_notification(mut self, user: i64, course: i64) -> Self {
        self.unsent_notifications
            .insert((LmsUserId::new(user), CourseId::new(course)));
        self
    }

    pub fn completed(mut self, user: i64, course: i64) -> Self {
        self.completed
            .insert((LmsUserId::new(user), CourseId::new(course)));
        self
    }

    pub fn failing_unenrol(mut self, error: LearningPlatformError) -> Self {
        self.unenrol_error = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().expect("platform calls lock").clone()
    }

    pub fn enrol_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, PlatformCall::Enrol(..)))
            .count()
    }

    fn record(&self, call: PlatformCall) {
        self.calls.lock().expect("platform calls lock").push(call);
    }
}

#[async_trait]
impl LearningPlatform for RecordingPlatform {
    async fn find_users_by_email(
        &self,
        email: &str,
    ) -> Result<Vec<LmsUser>, LearningPlatformError> {
        self.record(PlatformCall::FindUsers(email.to_owned()));
        Ok(self.users.get(email).cloned().unwrap_or_default())
    }

    async fn list_courses(&self) -> Result<Vec<Course>, LearningPlatformError> {
        self.record(PlatformCall::ListCourses);
        Ok(self.courses.clone())
    }

    async fn find_course(
        &self,
        course_id: CourseId,
    ) -> Result<Option<Course>, LearningPlatformError> {
        Ok(self.courses.iter().find(|c| c.id == course_id).cloned())
    }

    async fn enrolled_users(
        &self,
        _course_id: CourseId,
    ) -> Result<Vec<LmsUser>, LearningPlatformError> {
        Ok(Vec::new())
    }

    async fn user_courses(&self, _user_id: LmsUserId) -> Result<Vec<Course>, LearningPlatformError> {
        Ok(Vec::new())
    }

    async fn enrol_user(
        &self,
        user_id: LmsUserId,
        course_id: CourseId,
    ) -> Result<(), LearningPlatformError> {
        self.record(PlatformCall::Enrol(user_id, course_id));
        if self.rejected.contains(&(user_id, course_id)) {
            return Err(LearningPlatformError::remote(
                "invalidparameter",
                "Invalid parameter value detected",
            ));
        }
        if self.unsent_notifications.contains(&(user_id, course_id)) {
            return Err(LearningPlatformError::remote(
                MESSAGE_NOT_SENT_ERRORCODE,
                "Message was not sent.",
            ));
        }
        Ok(())
    }

    async fn unenrol_user(
        &self,
        user_id: LmsUserId,
        course_id: CourseId,
    ) -> Result<(), LearningPlatformError> {
        self.record(PlatformCall::Unenrol(user_id, course_id));
        match &self.unenrol_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn course_completion(
        &self,
        course_id: CourseId,
        user_id: LmsUserId,
    ) -> Result<CourseCompletion, LearningPlatformError> {
        self.record(PlatformCall::Completion(course_id, user_id));
        Ok(CourseCompletion {
            completed: self.completed.contains(&(user_id, course_id)),
        })
    }

    async fn site_info(&self) -> Result<SiteInfo, LearningPlatformError> {
        Ok(SiteInfo {
            site_name: Some("Test Academy".to_owned()),
            ..SiteInfo::default()
        })
    }
}

/// In-memory ledger honouring the all-or-nothing batch contract.
#[derive(Default)]
pub struct InMemoryLedger {
    rows: Mutex<Vec<EnrollmentRecord>>,
    next_id: Mutex<i64>,
    fail_commits: bool,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger whose batch commits always fail.
    pub fn failing_commits() -> Self {
        Self {
            fail_commits: true,
            ..Self::default()
        }
    }

    pub fn rows(&self) -> Vec<EnrollmentRecord> {
        self.rows.lock().expect("ledger rows lock").clone()
    }
}

#[async_trait]
impl EnrollmentLedger for InMemoryLedger {
    async fn record_batch(
        &self,
        entries: &[NewEnrollment],
    ) -> Result<Vec<EnrollmentRecord>, EnrollmentLedgerError> {
        if self.fail_commits {
            return Err(EnrollmentLedgerError::query("commit failed"));
        }
        let mut next_id = self.next_id.lock().expect("ledger id lock");
        let stored: Vec<EnrollmentRecord> = entries
            .iter()
            .map(|entry| {
                *next_id += 1;
                EnrollmentRecord {
                    id: EnrollmentId::new(*next_id),
                    campaign: entry.campaign,
                    user_email: entry.user_email.clone(),
                    remote_user_id: entry.remote_user_id,
                    remote_course_id: entry.remote_course_id,
                    enrolled_at: Utc::now(),
                    completion_status: CompletionStatus::Enrolled,
                }
            })
            .collect();
        self.rows
            .lock()
            .expect("ledger rows lock")
            .extend(stored.iter().cloned());
        Ok(stored)
    }

    async fn list_recent(&self) -> Result<Vec<EnrollmentRecord>, EnrollmentLedgerError> {
        let mut rows = self.rows();
        rows.sort_by(|a, b| b.id.get().cmp(&a.id.get()));
        Ok(rows)
    }

    async fn find_by_id(
        &self,
        id: EnrollmentId,
    ) -> Result<Option<EnrollmentRecord>, EnrollmentLedgerError> {
        Ok(self.rows().into_iter().find(|row| row.id == id))
    }

    async fn delete(&self, id: EnrollmentId) -> Result<bool, EnrollmentLedgerError> {
        let mut rows = self.rows.lock().expect("ledger rows lock");
        let before = rows.len();
        rows.retain(|row| row.id != id);
        Ok(rows.len() < before)
    }
}

/// Platform and ledger shared between a service and the test body.
pub fn shared(
    platform: RecordingPlatform,
    ledger: InMemoryLedger,
) -> (Arc<RecordingPlatform>, Arc<InMemoryLedger>) {
    (Arc::new(platform), Arc::new(ledger))
}
