//! Application state merging
//!
//! Produces the single display model a tab renders for one (application,
//! month) pair by layering three sources in priority order: the month's
//! repayment record, the application's own persisted fields, and hardcoded
//! placeholders.

use serde::{Deserialize, Serialize};

use crate::month::{format_ptp_date, EmiMonth};
use crate::models::application::CallingStatuses;
use crate::models::{status_label, Application, MonthlyRecord};

/// Composite identity of a merged view. Consumers key dependent state on this
/// so a month change forces a re-derivation instead of reusing stale fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewKey {
    pub payment_id: Option<i64>,
    pub month: EmiMonth,
}

/// The merged display model for one application in one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationView {
    pub key: ViewKey,
    pub applicant_id: String,
    pub applicant_name: String,
    /// Display label, never a bare integer code.
    pub status: String,
    /// Formatted `DD-MMM-YY`, or `"Not Set"`.
    pub ptp_date: String,
    pub amount_collected: f64,
    pub demand_amount: f64,
    pub emi_amount: f64,
    pub branch: String,
    pub team_lead: String,
    pub rm_name: String,
    pub dealer: String,
    pub lender: String,
    pub demand_calling_status: String,
    pub calling: CallingStatuses,
}

impl ApplicationView {
    /// Compose the display model for `month`, layering `record` over `app`.
    ///
    /// Field rule: prefer the record's value when present and
    /// non-null/non-zero, else the application's, else a placeholder. Status
    /// specifically prefers the repayment-status sub-object's label, then the
    /// record's month-level status string, then the application's own status.
    pub fn compose(app: &Application, record: Option<&MonthlyRecord>, month: &EmiMonth) -> Self {
        let payment_id = record.map(|r| r.id).or(app.payment_id);

        let status_raw = record
            .and_then(|r| r.repayment_status.as_ref().map(|s| s.label.clone()))
            .or_else(|| record.and_then(|r| r.status.clone()))
            .or_else(|| app.status.clone());
        let status = match status_raw.as_deref() {
            None | Some("") | Some("Unknown") => "Not Set".to_string(),
            some => status_label(some),
        };

        let ptp_raw = record
            .and_then(|r| r.ptp_date.clone())
            .or_else(|| app.ptp_date.clone());

        let amount_collected = record
            .and_then(|r| r.amount_collected)
            .filter(|amount| *amount != 0.0)
            .or(app.amount_collected)
            .unwrap_or(0.0);

        ApplicationView {
            key: ViewKey {
                payment_id,
                month: month.clone(),
            },
            applicant_id: app.applicant_id.clone(),
            applicant_name: app.applicant_name.clone(),
            status,
            ptp_date: format_ptp_date(ptp_raw.as_deref()),
            amount_collected,
            demand_amount: record.and_then(|r| r.demand_amount).unwrap_or(app.emi_amount),
            emi_amount: app.emi_amount,
            branch: placeholder(&app.branch),
            team_lead: placeholder(&app.team_lead),
            rm_name: placeholder(&app.rm_name),
            dealer: placeholder(&app.dealer),
            lender: app
                .lender
                .clone()
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| "Not Set".to_string()),
            demand_calling_status: app
                .demand_calling_status
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "Not Called".to_string()),
            calling: app.calling_statuses,
        }
    }

    /// True when the merged status locks every editable field.
    pub fn is_paid(&self) -> bool {
        self.status == "Paid"
    }
}

fn placeholder(value: &str) -> String {
    if value.is_empty() {
        "Not Set".to_string()
    } else {
        value.to_string()
    }
}
