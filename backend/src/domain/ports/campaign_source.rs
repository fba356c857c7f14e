//! Driven port for reading phishing campaigns from the campaign manager.

use async_trait::async_trait;

use crate::domain::{CampaignDetail, CampaignSummary};

use super::define_port_error;

define_port_error! {
    /// Errors raised while reading campaigns.
    pub enum CampaignSourceError {
        /// No campaign manager URL was configured.
        NotConfigured =>
            "campaign manager is not configured",
        /// Network transport failed.
        Transport { message: String } =>
            "campaign manager transport failed: {message}",
        /// The request exceeded its timeout.
        Timeout { message: String } =>
            "campaign manager timeout: {message}",
        /// The campaign manager answered with a non-success status.
        Status { status: u16, message: String } =>
            "campaign manager returned status {status}: {message}",
        /// The payload could not be decoded.
        Decode { message: String } =>
            "campaign manager response decode failed: {message}",
    }
}

/// Port for campaign reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CampaignSource: Send + Sync {
    /// Every campaign with its aggregate statistics.
    async fn list_campaigns(&self) -> Result<Vec<CampaignSummary>, CampaignSourceError>;

    /// One campaign with per-recipient results.
    async fn campaign(&self, campaign_id: i64) -> Result<CampaignDetail, CampaignSourceError>;
}

/// Source wired in when no campaign manager is configured.
///
/// Every call fails with [`CampaignSourceError::NotConfigured`] so the
/// dashboard degrades to its warning path instead of refusing to start.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredCampaignSource;

#[async_trait]
impl CampaignSource for UnconfiguredCampaignSource {
    async fn list_campaigns(&self) -> Result<Vec<CampaignSummary>, CampaignSourceError> {
        Err(CampaignSourceError::not_configured())
    }

    async fn campaign(&self, _campaign_id: i64) -> Result<CampaignDetail, CampaignSourceError> {
        Err(CampaignSourceError::not_configured())
    }
}
