//! Application and monthly repayment models

use serde::{Deserialize, Serialize};

use crate::month::EmiMonth;
use crate::models::CallingStatus;

/// Contact details for one of the people attached to a loan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub address: String,
}

impl ContactInfo {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.mobile.is_empty()
    }
}

/// One loan applicant's case as returned by the applications endpoint.
///
/// Carries the currently selected month's overrides (status, PTP date, amount
/// collected, calling statuses) alongside the loan-level fields; the merger
/// layers a `MonthlyRecord` over these when the month changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Application {
    pub applicant_id: String,
    pub loan_id: Option<i64>,
    /// Repayment id of the month the backend considered current when this
    /// record was fetched.
    pub payment_id: Option<i64>,
    pub demand_num: Option<String>,
    pub applicant_name: String,
    #[serde(default)]
    pub applicant: ContactInfo,
    #[serde(default)]
    pub co_applicant: ContactInfo,
    #[serde(default)]
    pub guarantor: ContactInfo,
    #[serde(default)]
    pub reference: ContactInfo,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub team_lead: String,
    #[serde(default)]
    pub rm_name: String,
    #[serde(default)]
    pub dealer: String,
    pub lender: Option<String>,
    /// Raw status value: integer code or label, depending on backend path.
    pub status: Option<String>,
    pub emi_amount: f64,
    /// Month string as the backend sent it (may be `Mon-YY` or a date).
    pub emi_month: Option<String>,
    pub demand_date: Option<String>,
    pub ptp_date: Option<String>,
    pub amount_collected: Option<f64>,
    pub demand_calling_status: Option<String>,
    #[serde(default)]
    pub calling_statuses: CallingStatuses,
    pub loan_amount: Option<f64>,
    pub disbursement_date: Option<String>,
    pub payment_mode: Option<String>,
    pub house_ownership: Option<String>,
}

/// Per-contact calling statuses for the selected month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallingStatuses {
    #[serde(default)]
    pub applicant: CallingStatus,
    #[serde(default)]
    pub co_applicant: CallingStatus,
    #[serde(default)]
    pub guarantor: CallingStatus,
    #[serde(default)]
    pub reference: CallingStatus,
}

/// Repayment-status sub-object carried on some monthly record payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepaymentStatusInfo {
    pub id: i32,
    pub label: String,
}

/// One month's demand for a loan (a.k.a. payment detail / repayment record).
///
/// At most one record should match a given (loan, calendar month) pair; the
/// resolver tolerates zero matches and falls back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonthlyRecord {
    /// Repayment / payment id.
    pub id: i64,
    pub loan_application_id: Option<i64>,
    /// Full demand date, `YYYY-MM-DD`, when the backend provides it.
    pub demand_date: Option<String>,
    /// Separate numeric month (1..=12) and year fields, the fallback source
    /// for month reconstruction.
    pub demand_month: Option<u32>,
    pub demand_year: Option<i32>,
    pub demand_num: Option<i32>,
    pub demand_amount: Option<f64>,
    pub amount_collected: Option<f64>,
    /// Month-level status string from the LMS.
    pub status: Option<String>,
    pub repayment_status: Option<RepaymentStatusInfo>,
    pub ptp_date: Option<String>,
}

impl MonthlyRecord {
    /// The `Mon-YY` month this record belongs to: derived from the demand
    /// date when present, else reconstructed from the numeric month/year
    /// fields. `None` when neither source yields a month.
    pub fn emi_month(&self) -> Option<EmiMonth> {
        if let Some(date) = self.demand_date.as_deref() {
            if let Some(month) = EmiMonth::parse(date) {
                return Some(month);
            }
        }
        match (self.demand_month, self.demand_year) {
            (Some(m), Some(y)) => EmiMonth::from_parts(m, y),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_month_from_demand_date() {
        let record = MonthlyRecord {
            id: 1,
            demand_date: Some("2025-08-05".to_string()),
            ..Default::default()
        };
        assert_eq!(record.emi_month().unwrap().as_str(), "Aug-25");
    }

    #[test]
    fn test_record_month_from_parts_fallback() {
        let record = MonthlyRecord {
            id: 2,
            demand_month: Some(8),
            demand_year: Some(2025),
            ..Default::default()
        };
        assert_eq!(record.emi_month().unwrap().as_str(), "Aug-25");
    }

    #[test]
    fn test_record_month_prefers_demand_date() {
        let record = MonthlyRecord {
            id: 3,
            demand_date: Some("2025-09-05".to_string()),
            demand_month: Some(8),
            demand_year: Some(2025),
            ..Default::default()
        };
        assert_eq!(record.emi_month().unwrap().as_str(), "Sep-25");
    }

    #[test]
    fn test_record_month_bad_date_falls_back_to_parts() {
        let record = MonthlyRecord {
            id: 4,
            demand_date: Some("not-a-date".to_string()),
            demand_month: Some(10),
            demand_year: Some(2025),
            ..Default::default()
        };
        assert_eq!(record.emi_month().unwrap().as_str(), "Oct-25");
    }

    #[test]
    fn test_record_month_absent() {
        let record = MonthlyRecord {
            id: 5,
            ..Default::default()
        };
        assert!(record.emi_month().is_none());
    }
}
