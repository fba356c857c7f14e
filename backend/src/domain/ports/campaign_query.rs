//! Driving port for the campaign dashboard views.

use async_trait::async_trait;
use serde::Serialize;

use super::Course;
use crate::domain::{CampaignDetail, CampaignResult, CampaignSummary};

/// Campaign list with an optional warning when the source was unreachable.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CampaignOverview {
    pub campaigns: Vec<CampaignSummary>,
    pub warning: Option<String>,
}

/// Campaign detail view used to pick remediation targets.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDetailView {
    pub campaign: Option<CampaignDetail>,
    pub failed_users: Vec<CampaignResult>,
    pub courses: Vec<Course>,
    pub warning: Option<String>,
}

/// Domain use-case port for campaign reads.
///
/// Reads never fail outright: unreachable services degrade to empty views
/// carrying a warning.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CampaignQuery: Send + Sync {
    /// Every campaign with its fail rate.
    async fn list_campaigns(&self) -> CampaignOverview;

    /// One campaign, its failed recipients and the course catalogue.
    async fn campaign_details(&self, campaign_id: i64) -> CampaignDetailView;
}
