//! Applications listing and per-application detail fetches
//!
//! The backend returns a flat wire shape per application; `ApplicationItem`
//! mirrors it and converts into the richer domain `Application`, grouping the
//! four contact roles and parsing the month-scoped calling statuses.

use serde::Deserialize;

use crate::api::{handle_json, ApiClient};
use crate::error::Result;
use crate::models::application::{CallingStatuses, ContactInfo};
use crate::models::{Application, CallingStatus};
use crate::month::EmiMonth;

/// Query filters for the applications listing.
#[derive(Debug, Clone, Default)]
pub struct ApplicationFilters {
    pub emi_month: Option<String>,
    pub search: Option<String>,
    pub branch: Option<String>,
    pub tl_name: Option<String>,
    pub rm_name: Option<String>,
    pub dealer: Option<String>,
    pub lender: Option<String>,
    pub status: Option<String>,
    pub demand_num: Option<String>,
    pub ptp_date_filter: Option<String>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

impl ApplicationFilters {
    pub fn for_month(month: &EmiMonth) -> Self {
        ApplicationFilters {
            emi_month: Some(month.as_str().to_string()),
            ..Default::default()
        }
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        let mut push = |key, value: Option<String>| {
            if let Some(v) = value {
                params.push((key, v));
            }
        };
        push("emi_month", self.emi_month.clone());
        push("search", self.search.clone());
        push("branch", self.branch.clone());
        push("tl_name", self.tl_name.clone());
        push("rm_name", self.rm_name.clone());
        push("dealer", self.dealer.clone());
        push("lender", self.lender.clone());
        push("status", self.status.clone());
        push("demand_num", self.demand_num.clone());
        push("ptp_date_filter", self.ptp_date_filter.clone());
        push("offset", self.offset.map(|v| v.to_string()));
        push("limit", self.limit.map(|v| v.to_string()));
        params
    }
}

/// Flat application record as the backend sends it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationItem {
    #[serde(default)]
    pub application_id: String,
    pub loan_id: Option<i64>,
    pub payment_id: Option<i64>,
    pub demand_num: Option<String>,
    #[serde(default)]
    pub applicant_name: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub co_applicant_name: String,
    #[serde(default)]
    pub co_applicant_mobile: String,
    #[serde(default)]
    pub co_applicant_address: String,
    #[serde(default)]
    pub guarantor_name: String,
    #[serde(default)]
    pub guarantor_mobile: String,
    #[serde(default)]
    pub guarantor_address: String,
    #[serde(default)]
    pub reference_name: String,
    #[serde(default)]
    pub reference_mobile: String,
    #[serde(default)]
    pub reference_address: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub tl_name: String,
    #[serde(default)]
    pub rm_name: String,
    #[serde(default)]
    pub dealer_name: String,
    pub lender_name: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub emi_amount: f64,
    pub emi_month: Option<String>,
    pub demand_date: Option<String>,
    pub ptp_date: Option<String>,
    pub amount_collected: Option<f64>,
    pub demand_calling_status: Option<String>,
    pub applicant_calling_status: Option<String>,
    pub co_applicant_calling_status: Option<String>,
    pub guarantor_calling_status: Option<String>,
    pub reference_calling_status: Option<String>,
    pub loan_amount: Option<f64>,
    pub disbursement_date: Option<String>,
    pub payment_mode: Option<String>,
    pub house_ownership: Option<String>,
}

impl ApplicationItem {
    /// Convert the flat wire record into the domain model.
    pub fn into_application(self) -> Application {
        let calling = |raw: Option<String>| {
            raw.as_deref()
                .map(CallingStatus::parse)
                .unwrap_or_default()
        };
        Application {
            applicant_id: self.application_id,
            loan_id: self.loan_id,
            payment_id: self.payment_id,
            demand_num: self.demand_num,
            applicant_name: self.applicant_name.clone(),
            applicant: ContactInfo {
                name: self.applicant_name,
                mobile: self.mobile,
                address: self.address,
            },
            co_applicant: ContactInfo {
                name: self.co_applicant_name,
                mobile: self.co_applicant_mobile,
                address: self.co_applicant_address,
            },
            guarantor: ContactInfo {
                name: self.guarantor_name,
                mobile: self.guarantor_mobile,
                address: self.guarantor_address,
            },
            reference: ContactInfo {
                name: self.reference_name,
                mobile: self.reference_mobile,
                address: self.reference_address,
            },
            branch: self.branch,
            team_lead: self.tl_name,
            rm_name: self.rm_name,
            dealer: self.dealer_name,
            lender: self.lender_name,
            status: self.status,
            emi_amount: self.emi_amount,
            emi_month: self.emi_month,
            demand_date: self.demand_date,
            ptp_date: self.ptp_date,
            amount_collected: self.amount_collected,
            demand_calling_status: self.demand_calling_status,
            calling_statuses: CallingStatuses {
                applicant: calling(self.applicant_calling_status),
                co_applicant: calling(self.co_applicant_calling_status),
                guarantor: calling(self.guarantor_calling_status),
                reference: calling(self.reference_calling_status),
            },
            loan_amount: self.loan_amount,
            disbursement_date: self.disbursement_date,
            payment_mode: self.payment_mode,
            house_ownership: self.house_ownership,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApplicationListResponse {
    #[serde(default)]
    total: u64,
    #[serde(default)]
    results: Vec<ApplicationItem>,
}

/// A page of applications plus the unpaginated total.
#[derive(Debug, Clone)]
pub struct ApplicationPage {
    pub total: u64,
    pub applications: Vec<Application>,
}

impl ApiClient {
    /// List applications matching the filters.
    pub async fn list_applications(&self, filters: &ApplicationFilters) -> Result<ApplicationPage> {
        let response = self
            .get("/applications/")
            .query(&filters.query())
            .send()
            .await?;
        let list: ApplicationListResponse = handle_json(response).await?;
        Ok(ApplicationPage {
            total: list.total,
            applications: list
                .results
                .into_iter()
                .map(ApplicationItem::into_application)
                .collect(),
        })
    }

    /// Fetch one application's full details for a specific month. `None` when
    /// the backend has no row for that (applicant, month) pair.
    pub async fn application_details(
        &self,
        applicant_id: &str,
        month: Option<&EmiMonth>,
    ) -> Result<Option<Application>> {
        let mut filters = ApplicationFilters {
            search: Some(applicant_id.to_string()),
            limit: Some(1),
            ..Default::default()
        };
        if let Some(month) = month {
            filters.emi_month = Some(month.as_str().to_string());
        }
        let page = self.list_applications(&filters).await?;
        Ok(page
            .applications
            .into_iter()
            .find(|app| app.applicant_id == applicant_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_skip_unset_params() {
        let filters = ApplicationFilters {
            emi_month: Some("Aug-25".to_string()),
            limit: Some(50),
            ..Default::default()
        };
        let query = filters.query();
        assert_eq!(query.len(), 2);
        assert!(query.contains(&("emi_month", "Aug-25".to_string())));
        assert!(query.contains(&("limit", "50".to_string())));
    }

    #[test]
    fn test_item_conversion_groups_contacts() {
        let item = ApplicationItem {
            application_id: "APP-1".to_string(),
            applicant_name: "R. Sharma".to_string(),
            mobile: "9876500001".to_string(),
            co_applicant_name: "M. Sharma".to_string(),
            guarantor_calling_status: Some("1".to_string()),
            ..Default::default()
        };
        let app = item.into_application();
        assert_eq!(app.applicant.name, "R. Sharma");
        assert_eq!(app.applicant.mobile, "9876500001");
        assert_eq!(app.co_applicant.name, "M. Sharma");
        assert_eq!(app.calling_statuses.guarantor, CallingStatus::Answered);
        assert_eq!(app.calling_statuses.reference, CallingStatus::NotCalled);
    }
}
