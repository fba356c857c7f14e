//! Builders wiring outbound adapters into the domain services behind
//! [`HttpState`].

use std::io;
use std::sync::Arc;

use tracing::{info, warn};

use dashboard::domain::ports::{CampaignSource, ContentGenerator, UnconfiguredCampaignSource};
use dashboard::domain::{
    CampaignService, ContentLabService, CourseDirectoryService, EnrollmentService,
};
use dashboard::inbound::http::state::HttpState;
use dashboard::outbound::gemini::{DEFAULT_GEMINI_TIMEOUT, GeminiHttpGenerator};
use dashboard::outbound::gophish::GophishHttpSource;
use dashboard::outbound::moodle::{DEFAULT_MOODLE_TIMEOUT, MoodleHttpClient};
use dashboard::outbound::persistence::{DbPool, DieselEnrollmentLedger};
use dashboard::settings::ResolvedSettings;

fn client_error(adapter: &str, error: reqwest::Error) -> io::Error {
    io::Error::other(format!("failed to build {adapter} client: {error}"))
}

fn build_campaign_source(settings: &ResolvedSettings) -> io::Result<Arc<dyn CampaignSource>> {
    match &settings.gophish {
        Some(gophish) => {
            let source = GophishHttpSource::new(gophish.clone())
                .map_err(|error| client_error("campaign", error))?;
            info!(url = %gophish.base_url, "campaign server configured");
            Ok(Arc::new(source))
        }
        None => {
            warn!("gophish_url not set; campaign views will be empty");
            Ok(Arc::new(UnconfiguredCampaignSource))
        }
    }
}

fn build_generator(settings: &ResolvedSettings) -> io::Result<Option<Arc<dyn ContentGenerator>>> {
    let Some(gemini) = &settings.gemini else {
        warn!("gemini_api_key not set; content lab disabled");
        return Ok(None);
    };
    let generator =
        GeminiHttpGenerator::new(gemini.api_key.clone(), &gemini.model, DEFAULT_GEMINI_TIMEOUT)
            .map_err(|error| client_error("generative model", error))?;
    Ok(Some(Arc::new(generator)))
}

fn build_platform(settings: &ResolvedSettings) -> io::Result<Arc<MoodleHttpClient>> {
    MoodleHttpClient::new(
        settings.moodle_url.clone(),
        settings.moodle_token.clone(),
        DEFAULT_MOODLE_TIMEOUT,
    )
    .map(Arc::new)
    .map_err(|error| client_error("learning platform", error))
}

/// Assemble every port implementation behind the HTTP handlers.
///
/// # Errors
///
/// Returns [`io::Error`] when an HTTP client cannot be constructed.
pub fn build_http_state(settings: &ResolvedSettings, pool: DbPool) -> io::Result<HttpState> {
    let platform = build_platform(settings)?;
    let ledger = Arc::new(DieselEnrollmentLedger::new(pool));
    let enrollments = Arc::new(EnrollmentService::new(platform.clone(), ledger));

    Ok(HttpState::new(
        Arc::new(CampaignService::new(
            build_campaign_source(settings)?,
            platform.clone(),
        )),
        enrollments.clone(),
        enrollments,
        Arc::new(CourseDirectoryService::new(platform)),
        Arc::new(ContentLabService::new(build_generator(settings)?)),
    ))
}
