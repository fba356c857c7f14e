//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly; regenerate with
//! `diesel print-schema` when a migration changes them.

diesel::table! {
    /// Enrollments the dashboard performed on the learning platform.
    enrollments (id) {
        id -> Int8,
        /// Campaign that triggered the enrollment; `0` for manual entries.
        campaign_id -> Int8,
        #[max_length = 100]
        user_email -> Varchar,
        remote_user_id -> Int8,
        remote_course_id -> Int8,
        enrolled_at -> Timestamptz,
        #[max_length = 50]
        completion_status -> Varchar,
    }
}
