//! Campaign dashboard service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{
    CampaignDetailView, CampaignOverview, CampaignQuery, CampaignSource, LearningPlatform,
};

/// Implements [`CampaignQuery`] over a campaign source and the learning
/// platform's course catalogue.
///
/// `S` may be a trait object such as `dyn CampaignSource`.
pub struct CampaignService<S: ?Sized, P> {
    source: Arc<S>,
    platform: Arc<P>,
}

impl<S: ?Sized, P> CampaignService<S, P> {
    /// Create a new service.
    pub fn new(source: Arc<S>, platform: Arc<P>) -> Self {
        Self { source, platform }
    }
}

#[async_trait]
impl<S, P> CampaignQuery for CampaignService<S, P>
where
    S: CampaignSource + ?Sized,
    P: LearningPlatform,
{
    async fn list_campaigns(&self) -> CampaignOverview {
        match self.source.list_campaigns().await {
            Ok(campaigns) => CampaignOverview {
                campaigns,
                warning: None,
            },
            Err(error) => {
                warn!(error = %error, "campaign list unavailable");
                CampaignOverview {
                    campaigns: Vec::new(),
                    warning: Some(format!("Could not fetch campaigns from GoPhish: {error}")),
                }
            }
        }
    }

    async fn campaign_details(&self, campaign_id: i64) -> CampaignDetailView {
        let campaign = match self.source.campaign(campaign_id).await {
            Ok(campaign) => campaign,
            Err(error) => {
                warn!(campaign_id, error = %error, "campaign details unavailable");
                return CampaignDetailView {
                    warning: Some(format!("Could not fetch campaign details: {error}")),
                    ..CampaignDetailView::default()
                };
            }
        };

        let courses = self.platform.list_courses().await.unwrap_or_else(|error| {
            warn!(error = %error, "course catalogue unavailable");
            Vec::new()
        });

        CampaignDetailView {
            failed_users: campaign.failed_recipients(),
            campaign: Some(campaign),
            courses,
            warning: None,
        }
    }
}
