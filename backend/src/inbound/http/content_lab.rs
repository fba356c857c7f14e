//! Content lab HTTP handler.
//!
//! ```text
//! POST /api/v1/content-lab
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::ContentOutcome;
use crate::inbound::http::ApiResult;
use crate::inbound::http::flash::{Flash, FlashMessage};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

const MISSING_INPUT_MESSAGE: &str = "Please select a content type and enter a prompt.";
const GENERATING_MESSAGE: &str = "Generating content with Gemini AI, please wait...";

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentLabRequest {
    /// `phishing_email` or `moodle_quiz`.
    #[schema(example = "phishing_email")]
    pub content_type: Option<String>,
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Generated,
    Failed,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContentLabResponse {
    pub status: ContentStatus,
    /// Generated text, or the plain-text reason generation failed.
    pub text: String,
}

impl From<ContentOutcome> for ContentLabResponse {
    fn from(value: ContentOutcome) -> Self {
        match value {
            ContentOutcome::Generated(text) => Self {
                status: ContentStatus::Generated,
                text,
            },
            ContentOutcome::Failed(text) => Self {
                status: ContentStatus::Failed,
                text,
            },
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// Generate a phishing template or quiz questions.
#[utoipa::path(
    post,
    path = "/api/v1/content-lab",
    request_body = ContentLabRequest,
    responses(
        (status = 200, description = "Generation attempted", body = ContentLabResponse),
        (status = 400, description = "Missing content type or prompt", body = ErrorSchema)
    ),
    tags = ["content-lab"],
    operation_id = "generateContent"
)]
#[post("/content-lab")]
pub async fn generate_content(
    state: web::Data<HttpState>,
    flash: Flash,
    payload: web::Json<ContentLabRequest>,
) -> ApiResult<web::Json<ContentLabResponse>> {
    let payload = payload.into_inner();
    let (Some(content_type), Some(prompt)) =
        (non_blank(payload.content_type), non_blank(payload.prompt))
    else {
        flash.push(FlashMessage::error(MISSING_INPUT_MESSAGE))?;
        return Err(Error::invalid_request(MISSING_INPUT_MESSAGE));
    };

    flash.push(FlashMessage::info(GENERATING_MESSAGE))?;
    let outcome = state.content_lab.generate(&content_type, &prompt).await;
    Ok(web::Json(ContentLabResponse::from(outcome)))
}
