//! DTOs for decoding GoPhish campaign responses.

use serde::Deserialize;

use crate::domain::{CampaignDetail, CampaignResult, CampaignStats, CampaignSummary};

#[derive(Debug, Default, Deserialize)]
pub(super) struct StatsDto {
    #[serde(default)]
    total: u64,
    #[serde(default)]
    sent: u64,
    #[serde(default)]
    opened: u64,
    #[serde(default, alias = "clicked")]
    clicked_link: u64,
    #[serde(default)]
    submitted_data: u64,
    #[serde(default)]
    email_reported: u64,
}

impl From<StatsDto> for CampaignStats {
    fn from(value: StatsDto) -> Self {
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

#[derive(Debug, Deserialize)]
pub(super) struct CampaignDto {
    id: i64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    created_date: Option<String>,
    #[serde(default)]
    stats: StatsDto,
    #[serde(default)]
    results: Vec<ResultDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ResultDto {
    #[serde(default)]
    email: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    position: String,
    #[serde(default)]
    status: String,
}

impl From<ResultDto> for CampaignResult {
    fn from(value: ResultDto) -> Self {
        Self {
            email: value.email,
            first_name: value.first_name,
            last_name: value.last_name,
            position: value.position,
            status: value.status,
        }
    }
}

impl CampaignDto {
    pub(super) fn into_summary(self) -> CampaignSummary {
        CampaignSummary {
            id: self.id,
            name: self.name,
            status: self.status,
            created_date: self.created_date,
            stats: self.stats.into(),
        }
    }

    pub(super) fn into_detail(self) -> CampaignDetail {
        CampaignDetail {
            id: self.id,
            name: self.name,
            status: self.status,
            results: self.results.into_iter().map(Into::into).collect(),
        }
    }
}
