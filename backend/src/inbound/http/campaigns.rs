//! Campaign overview HTTP handlers.
//!
//! ```text
//! GET /api/v1/campaigns
//! GET /api/v1/campaigns/{id}
//! ```
//!
//! Campaign-server failures are not errors here: the views come back empty
//! and the warning is queued as a flash message as well as returned inline.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CampaignDetailView, CampaignOverview};
use crate::domain::{CampaignDetail, CampaignResult, CampaignStats, CampaignSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::courses::CourseResponse;
use crate::inbound::http::flash::{Flash, FlashMessage};
use crate::inbound::http::state::HttpState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignStatsResponse {
    pub total: u64,
    pub sent: u64,
    pub opened: u64,
    pub clicked_link: u64,
    pub submitted_data: u64,
    pub email_reported: u64,
}

impl From<CampaignStats> for CampaignStatsResponse {
    fn from(value: CampaignStats) -> Self {
        Self {
            total: value.total,
            sent: value.sent,
            opened: value.opened,
            clicked_link: value.clicked_link,
            submitted_data: value.submitted_data,
            email_reported: value.email_reported,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSummaryResponse {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub created_date: Option<String>,
    pub stats: CampaignStatsResponse,
    /// Percentage with two decimals and a `%` suffix, or `N/A`.
    #[schema(example = "37.50%")]
    pub fail_rate: String,
}

impl From<CampaignSummary> for CampaignSummaryResponse {
    fn from(value: CampaignSummary) -> Self {
        Self {
            fail_rate: value.stats.fail_rate(),
            id: value.id,
            name: value.name,
            status: value.status,
            created_date: value.created_date,
            stats: CampaignStatsResponse::from(value.stats),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CampaignListResponse {
    pub campaigns: Vec<CampaignSummaryResponse>,
    pub warning: Option<String>,
}

impl From<CampaignOverview> for CampaignListResponse {
    fn from(value: CampaignOverview) -> Self {
        Self {
            campaigns: value
                .campaigns
                .into_iter()
                .map(CampaignSummaryResponse::from)
                .collect(),
            warning: value.warning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipientResponse {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub status: String,
}

impl From<CampaignResult> for RecipientResponse {
    fn from(value: CampaignResult) -> Self {
        Self {
            email: value.email,
            first_name: value.first_name,
            last_name: value.last_name,
            position: value.position,
            status: value.status,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignInfoResponse {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub results: Vec<RecipientResponse>,
}

impl From<CampaignDetail> for CampaignInfoResponse {
    fn from(value: CampaignDetail) -> Self {
        Self {
            id: value.id,
            name: value.name,
            status: value.status,
            results: value.results.into_iter().map(RecipientResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDetailResponse {
    pub campaign: Option<CampaignInfoResponse>,
    /// Recipients who opened, clicked or submitted data.
    pub failed_users: Vec<RecipientResponse>,
    /// Courses available for remedial enrollment.
    pub courses: Vec<CourseResponse>,
    pub warning: Option<String>,
}

impl From<CampaignDetailView> for CampaignDetailResponse {
    fn from(value: CampaignDetailView) -> Self {
        Self {
            campaign: value.campaign.map(CampaignInfoResponse::from),
            failed_users: value
                .failed_users
                .into_iter()
                .map(RecipientResponse::from)
                .collect(),
            courses: value.courses.into_iter().map(CourseResponse::from).collect(),
            warning: value.warning,
        }
    }
}

fn flash_warning(flash: &Flash, warning: Option<&String>) -> ApiResult<()> {
    match warning {
        Some(message) => flash.push(FlashMessage::error(message.clone())),
        None => Ok(()),
    }
}

/// List campaigns with their fail rates.
#[utoipa::path(
    get,
    path = "/api/v1/campaigns",
    responses((status = 200, description = "Campaign overview", body = CampaignListResponse)),
    tags = ["campaigns"],
    operation_id = "listCampaigns"
)]
#[get("/campaigns")]
pub async fn list_campaigns(
    state: web::Data<HttpState>,
    flash: Flash,
) -> ApiResult<web::Json<CampaignListResponse>> {
    let overview = state.campaigns.list_campaigns().await;
    flash_warning(&flash, overview.warning.as_ref())?;
    Ok(web::Json(CampaignListResponse::from(overview)))
}

/// Show one campaign's failed recipients alongside the course catalogue.
#[utoipa::path(
    get,
    path = "/api/v1/campaigns/{id}",
    params(("id" = i64, Path, description = "Campaign identifier")),
    responses((status = 200, description = "Campaign detail", body = CampaignDetailResponse)),
    tags = ["campaigns"],
    operation_id = "getCampaign"
)]
#[get("/campaigns/{id}")]
pub async fn campaign_details(
    state: web::Data<HttpState>,
    flash: Flash,
    path: web::Path<i64>,
) -> ApiResult<web::Json<CampaignDetailResponse>> {
    let view = state.campaigns.campaign_details(path.into_inner()).await;
    flash_warning(&flash, view.warning.as_ref())?;
    Ok(web::Json(CampaignDetailResponse::from(view)))
}
