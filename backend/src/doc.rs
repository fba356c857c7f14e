//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `/api/v1`, the health checks and
//! the adapter-layer schema wrappers. The document backs Swagger UI in debug
//! builds and is exported with `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::campaigns::{
    CampaignDetailResponse, CampaignInfoResponse, CampaignListResponse, CampaignStatsResponse,
    CampaignSummaryResponse, RecipientResponse,
};
use crate::inbound::http::content_lab::{ContentLabRequest, ContentLabResponse, ContentStatus};
use crate::inbound::http::courses::{
    CourseResponse, CourseUsersResponse, LmsUserResponse, SiteInfoResponse, UserSearchRequest,
    UserSearchResponse,
};
use crate::inbound::http::enrollments::{
    CampaignEnrollmentRequest, DisenrollResponse, EnrollmentResultResponse,
    ManualEnrollmentRequest, TrainingStatusResponse,
};
use crate::inbound::http::flash::{FlashLevel, FlashMessage};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// Adds the session cookie that carries flash messages.
struct SessionAddon;

impl Modify for SessionAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Private session cookie holding queued flash messages.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SessionAddon),
    info(
        title = "Phishing remediation dashboard API",
        description = "Campaign results, remedial course enrollment and training status."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::campaigns::list_campaigns,
        crate::inbound::http::campaigns::campaign_details,
        crate::inbound::http::enrollments::enroll_campaign,
        crate::inbound::http::enrollments::enroll_manual,
        crate::inbound::http::enrollments::training_status,
        crate::inbound::http::enrollments::disenroll,
        crate::inbound::http::courses::list_courses,
        crate::inbound::http::courses::course_users,
        crate::inbound::http::courses::search_user,
        crate::inbound::http::courses::site_info,
        crate::inbound::http::content_lab::generate_content,
        crate::inbound::http::messages::drain_messages,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        FlashLevel,
        FlashMessage,
        CampaignStatsResponse,
        CampaignSummaryResponse,
        CampaignListResponse,
        CampaignInfoResponse,
        CampaignDetailResponse,
        RecipientResponse,
        CampaignEnrollmentRequest,
        ManualEnrollmentRequest,
        EnrollmentResultResponse,
        TrainingStatusResponse,
        DisenrollResponse,
        CourseResponse,
        CourseUsersResponse,
        LmsUserResponse,
        UserSearchRequest,
        UserSearchResponse,
        SiteInfoResponse,
        ContentLabRequest,
        ContentLabResponse,
        ContentStatus,
    )),
    tags(
        (name = "campaigns", description = "Phishing campaign results"),
        (name = "enrollments", description = "Remedial course enrollment and training status"),
        (name = "courses", description = "Learning platform course directory"),
        (name = "content-lab", description = "Generated phishing templates and quizzes"),
        (name = "messages", description = "One-shot operator messages"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
