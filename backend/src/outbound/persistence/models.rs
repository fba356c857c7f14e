//! Internal Diesel row structs for the enrollments table.
//!
//! These types never leave the persistence layer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::enrollments;

/// Row struct for reading from the enrollments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = enrollments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EnrollmentRow {
    pub id: i64,
    pub campaign_id: i64,
    pub user_email: String,
    pub remote_user_id: i64,
    pub remote_course_id: i64,
    pub enrolled_at: DateTime<Utc>,
    pub completion_status: String,
}

/// Insertable struct; `enrolled_at` and `completion_status` use column
/// defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = enrollments)]
pub(crate) struct NewEnrollmentRow<'a> {
    pub campaign_id: i64,
    pub user_email: &'a str,
    pub remote_user_id: i64,
    pub remote_course_id: i64,
}
