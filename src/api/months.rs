//! Month-dropdown endpoint
//!
//! Secondary source of month options, keyed by loan id. Used when the
//! payment-details records do not resolve a month, and to populate the
//! month selector with repayment ids.

use serde::Deserialize;

use crate::api::{handle_json, ApiClient};
use crate::error::Result;
use crate::month::EmiMonth;

/// One selectable month for a loan.
#[derive(Debug, Clone, Deserialize)]
pub struct MonthOption {
    /// Canonical `Mon-YY` month string.
    pub month: String,
    pub repayment_id: Option<i64>,
    pub demand_date: Option<String>,
    #[serde(default)]
    pub is_current: bool,
}

impl MonthOption {
    pub fn emi_month(&self) -> Option<EmiMonth> {
        EmiMonth::parse(&self.month)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonthDropdownResponse {
    pub loan_id: i64,
    #[serde(default)]
    pub total_months: u32,
    pub current_month: Option<String>,
    #[serde(default)]
    pub months: Vec<MonthOption>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiClient {
    /// Fetch the selectable months for a loan.
    pub async fn month_options(&self, loan_id: i64) -> Result<MonthDropdownResponse> {
        let response = self
            .get(&format!("/month-dropdown/{loan_id}/months"))
            .send()
            .await?;
        handle_json(response).await
    }
}
