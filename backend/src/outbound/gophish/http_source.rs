//! Reqwest-backed GoPhish campaign source.
//!
//! Campaign reads are bearer-authenticated GETs. Certificate verification can
//! be relaxed for deployments fronted by self-signed certificates.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use super::dto::CampaignDto;
use crate::domain::ports::{CampaignSource, CampaignSourceError};
use crate::domain::{CampaignDetail, CampaignSummary};
use crate::outbound::body_preview;

/// Default timeout for campaign reads.
pub const DEFAULT_GOPHISH_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the GoPhish admin API.
#[derive(Clone)]
pub struct GophishSettings {
    pub base_url: Url,
    pub api_key: String,
    pub timeout: Duration,
    pub accept_invalid_certs: bool,
}

/// Campaign source adapter over the GoPhish REST API.
pub struct GophishHttpSource {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl GophishHttpSource {
    /// Build an adapter from connection settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(settings: GophishSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .build()?;
        Ok(Self {
            client,
            base_url: settings.base_url,
            api_key: settings.api_key,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, CampaignSourceError> {
        let url = endpoint(&self.base_url, path);
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        serde_json::from_slice(body.as_ref()).map_err(|error| {
            CampaignSourceError::decode(format!("invalid GoPhish JSON payload: {error}"))
        })
    }
}

fn endpoint(base_url: &Url, path: &str) -> Url {
    let mut url = base_url.clone();
    let base_path = base_url.path().trim_end_matches('/');
    url.set_path(&format!("{base_path}/{path}"));
    url
}

#[async_trait]
impl CampaignSource for GophishHttpSource {
    async fn list_campaigns(&self) -> Result<Vec<CampaignSummary>, CampaignSourceError> {
        let campaigns: Vec<CampaignDto> = self.get("api/campaigns/").await?;
        Ok(campaigns
            .into_iter()
            .map(CampaignDto::into_summary)
            .collect())
    }

    async fn campaign(&self, campaign_id: i64) -> Result<CampaignDetail, CampaignSourceError> {
        let campaign: CampaignDto = self.get(&format!("api/campaigns/{campaign_id}")).await?;
        Ok(campaign.into_detail())
    }
}

fn map_transport_error(error: reqwest::Error) -> CampaignSourceError {
    if error.is_timeout() {
        CampaignSourceError::timeout(error.to_string())
    } else {
        CampaignSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> CampaignSourceError {
    CampaignSourceError::status(status.as_u16(), body_preview(body))
}
