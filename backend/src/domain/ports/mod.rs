//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod campaign_query;
mod campaign_source;
mod content_generator;
mod content_lab_command;
mod course_directory_query;
mod enrollment_command;
mod enrollment_ledger;
mod learning_platform;

pub use campaign_query::{CampaignDetailView, CampaignOverview, CampaignQuery};
#[cfg(test)]
pub use campaign_query::MockCampaignQuery;
pub use campaign_source::{CampaignSource, CampaignSourceError, UnconfiguredCampaignSource};
#[cfg(test)]
pub use campaign_source::MockCampaignSource;
pub use content_generator::{ContentGenerator, ContentGeneratorError};
#[cfg(test)]
pub use content_generator::MockContentGenerator;
pub use content_lab_command::{ContentLabCommand, ContentOutcome};
#[cfg(test)]
pub use content_lab_command::MockContentLabCommand;
pub use course_directory_query::{CourseDirectoryQuery, CourseUsersView, UserSearchView};
#[cfg(test)]
pub use course_directory_query::MockCourseDirectoryQuery;
pub use enrollment_command::{EnrollmentCommand, TrainingStatusQuery};
#[cfg(test)]
pub use enrollment_command::{MockEnrollmentCommand, MockTrainingStatusQuery};
pub use enrollment_ledger::{EnrollmentLedger, EnrollmentLedgerError};
#[cfg(test)]
pub use enrollment_ledger::MockEnrollmentLedger;
pub use learning_platform::{
    Course, CourseCompletion, LearningPlatform, LearningPlatformError, LmsUser,
    MESSAGE_NOT_SENT_ERRORCODE, SiteInfo,
};
#[cfg(test)]
pub use learning_platform::MockLearningPlatform;
