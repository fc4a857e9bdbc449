//! Payment-details (monthly repayment record) endpoints
//!
//! The month-specific endpoint answers with a single record; when it is
//! unavailable the loan-wide listing is fetched and filtered client-side,
//! which keeps a month change working against older backend deployments.

use serde::Deserialize;

use crate::api::{handle_json, ApiClient};
use crate::error::Result;
use crate::models::MonthlyRecord;
use crate::month::EmiMonth;

#[derive(Debug, Deserialize)]
struct PaymentDetailsResponse {
    #[serde(default)]
    results: Vec<MonthlyRecord>,
}

impl ApiClient {
    /// All monthly records for a loan.
    pub async fn payment_details(&self, loan_id: i64) -> Result<Vec<MonthlyRecord>> {
        let response = self
            .get(&format!("/payment-details/loan/{loan_id}"))
            .send()
            .await?;
        let list: PaymentDetailsResponse = handle_json(response).await?;
        Ok(list.results)
    }

    /// One monthly record by its repayment id.
    pub async fn payment_detail(&self, repayment_id: i64) -> Result<MonthlyRecord> {
        let response = self
            .get(&format!("/payment-details/{repayment_id}"))
            .send()
            .await?;
        handle_json(response).await
    }

    /// The monthly record for one (loan, month) pair, if any.
    pub async fn payment_details_for_month(
        &self,
        loan_id: i64,
        month: &EmiMonth,
    ) -> Result<Option<MonthlyRecord>> {
        let (month_num, year) = month.parts();
        let response = self
            .get("/payment-details/by_loan_and_month")
            .query(&[
                ("loan_id", loan_id.to_string()),
                ("month", month_num.to_string()),
                ("year", year.to_string()),
            ])
            .send()
            .await?;

        if response.status().is_success() {
            // The month-scoped route answers with one record, or null.
            return Ok(response.json::<Option<MonthlyRecord>>().await?);
        }

        // Older deployments lack the month-scoped route.
        tracing::debug!(loan_id, month = %month, "falling back to loan-wide payment details");
        let records = self.payment_details(loan_id).await?;
        Ok(records
            .into_iter()
            .find(|record| record.emi_month().as_ref() == Some(month)))
    }
}
