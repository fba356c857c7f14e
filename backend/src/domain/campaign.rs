//! Phishing campaign views built from campaign-manager data.

use serde::Serialize;

/// Recipient statuses that count as failing the simulation.
pub const FAILED_RESULT_STATUSES: [&str; 3] = ["Clicked Link", "Submitted Data", "Email Opened"];

/// Aggregate counters reported for a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CampaignStats {
    pub total: u64,
    pub sent: u64,
    pub opened: u64,
    pub clicked_link: u64,
    pub submitted_data: u64,
    pub email_reported: u64,
}

impl CampaignStats {
    /// Share of recipients who clicked or submitted data.
    ///
    /// # Examples
    /// ```
    /// use dashboard::domain::CampaignStats;
    ///
    /// let stats = CampaignStats { total: 8, clicked_link: 2, submitted_data: 1, ..Default::default() };
    /// assert_eq!(stats.fail_rate(), "37.50%");
    /// assert_eq!(CampaignStats::default().fail_rate(), "N/A");
    /// ```
    pub fn fail_rate(&self) -> String {
        let Some(basis_points) = self.fail_basis_points() else {
            return "N/A".to_owned();
        };
        let whole = basis_points.checked_div(100).unwrap_or_default();
        let fraction = basis_points.checked_rem(100).unwrap_or_default();
        format!("{whole}.{fraction:02}%")
    }

    /// Failure share in hundredths of a percent, rounded half up; `None`
    /// when the campaign has no recipients.
    fn fail_basis_points(&self) -> Option<u128> {
        let failed = u128::from(self.submitted_data) + u128::from(self.clicked_link);
        let total = u128::from(self.total);
        (failed * 20_000 + total).checked_div(total * 2)
    }
}

/// Campaign as listed on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignSummary {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub created_date: Option<String>,
    pub stats: CampaignStats,
}

/// One recipient outcome within a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignResult {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub status: String,
}

impl CampaignResult {
    /// Whether this recipient interacted with the phishing email.
    pub fn is_failure(&self) -> bool {
        FAILED_RESULT_STATUSES.contains(&self.status.as_str())
    }
}

/// Campaign with its per-recipient results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignDetail {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub results: Vec<CampaignResult>,
}

impl CampaignDetail {
    /// Recipients eligible for remedial training.
    pub fn failed_recipients(&self) -> Vec<CampaignResult> {
        self.results
            .iter()
            .filter(|result| result.is_failure())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn result(email: &str, status: &str) -> CampaignResult {
        CampaignResult {
            email: email.to_owned(),
            first_name: String::new(),
            last_name: String::new(),
            position: String::new(),
            status: status.to_owned(),
        }
    }

    #[rstest]
    #[case(0, 0, 0, "N/A")]
    #[case(4, 1, 1, "50.00%")]
    #[case(3, 1, 0, "33.33%")]
    #[case(5, 0, 0, "0.00%")]
    #[case(3, 1, 1, "66.67%")]
    #[case(8, 1, 2, "37.50%")]
    #[case(7, 0, 1, "14.29%")]
    #[case(u64::MAX, u64::MAX, 0, "100.00%")]
    fn fail_rate_counts_clicks_and_submissions(
        #[case] total: u64,
        #[case] clicked_link: u64,
        #[case] submitted_data: u64,
        #[case] expected: &str,
    ) {
        let stats = CampaignStats {
            total,
            clicked_link,
            submitted_data,
            ..CampaignStats::default()
        };
        assert_eq!(stats.fail_rate(), expected);
    }

    #[rstest]
    fn failed_recipients_keep_interacting_statuses_only() {
        let detail = CampaignDetail {
            id: 4,
            name: "Quarterly".to_owned(),
            status: "In progress".to_owned(),
            results: vec![
                result("a@x.com", "Clicked Link"),
                result("b@x.com", "Email Sent"),
                result("c@x.com", "Submitted Data"),
                result("d@x.com", "Email Opened"),
                result("e@x.com", "Email Reported"),
            ],
        };

        let emails: Vec<String> = detail
            .failed_recipients()
            .into_iter()
            .map(|r| r.email)
            .collect();
        assert_eq!(emails, vec!["a@x.com", "c@x.com", "d@x.com"]);
    }
}
