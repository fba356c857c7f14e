//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CampaignQuery, ContentLabCommand, CourseDirectoryQuery, EnrollmentCommand,
    TrainingStatusQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub campaigns: Arc<dyn CampaignQuery>,
    pub enrollments: Arc<dyn EnrollmentCommand>,
    pub training_status: Arc<dyn TrainingStatusQuery>,
    pub courses: Arc<dyn CourseDirectoryQuery>,
    pub content_lab: Arc<dyn ContentLabCommand>,
}

impl HttpState {
    /// Bundle the port implementations.
    pub fn new(
        campaigns: Arc<dyn CampaignQuery>,
        enrollments: Arc<dyn EnrollmentCommand>,
        training_status: Arc<dyn TrainingStatusQuery>,
        courses: Arc<dyn CourseDirectoryQuery>,
        content_lab: Arc<dyn ContentLabCommand>,
    ) -> Self {
        Self {
            campaigns,
            enrollments,
            training_status,
            courses,
            content_lab,
        }
    }
}
