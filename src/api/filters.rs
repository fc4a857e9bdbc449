//! Filter options and summary endpoints
//!
//! Both are keyed by the dashboard's selected month: filter dropdowns list
//! the distinct values present that month, and the summary returns the
//! per-status counts shown as tab badges.

use serde::Deserialize;

use crate::api::{handle_json, ApiClient};
use crate::error::Result;
use crate::month::EmiMonth;

/// Distinct values available for each filter dropdown.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub branches: Vec<String>,
    #[serde(default)]
    pub tl_names: Vec<String>,
    #[serde(default)]
    pub rm_names: Vec<String>,
    #[serde(default)]
    pub dealers: Vec<String>,
    #[serde(default)]
    pub lenders: Vec<String>,
    #[serde(default)]
    pub statuses: Vec<String>,
    #[serde(default)]
    pub emi_months: Vec<String>,
    #[serde(default)]
    pub demand_nums: Vec<String>,
}

/// Per-status counts for one month.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusSummary {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub future: u64,
    #[serde(default)]
    pub partially_paid: u64,
    #[serde(default)]
    pub paid: u64,
    #[serde(default)]
    pub overdue: u64,
    #[serde(default)]
    pub foreclose: u64,
    #[serde(default)]
    pub paid_pending_approval: u64,
    #[serde(default)]
    pub paid_rejected: u64,
}

impl ApiClient {
    /// Filter dropdown values for one month.
    pub async fn filter_options(&self, month: Option<&EmiMonth>) -> Result<FilterOptions> {
        let mut request = self.get("/filters/options");
        if let Some(month) = month {
            request = request.query(&[("emi_month", month.as_str())]);
        }
        let response = request.send().await?;
        handle_json(response).await
    }

    /// Status-count summary for one month.
    pub async fn status_summary(&self, month: Option<&EmiMonth>) -> Result<StatusSummary> {
        let mut request = self.get("/summary/summary");
        if let Some(month) = month {
            request = request.query(&[("emi_month", month.as_str())]);
        }
        let response = request.send().await?;
        handle_json(response).await
    }
}
