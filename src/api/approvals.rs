//! Paid-pending approval endpoints
//!
//! Records marked Paid (Pending Approval) queue here for a reviewer, who
//! either approves them to Paid or rejects them to Paid Rejected.

use serde::{Deserialize, Serialize};

use crate::api::{handle_json, ApiClient};
use crate::error::Result;

/// Reviewer decision on a paid-pending record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalAction {
    Approve,
    Reject,
}

/// One queued paid-pending record.
#[derive(Debug, Clone, Deserialize)]
pub struct PaidPendingItem {
    pub loan_id: i64,
    pub repayment_id: i64,
    #[serde(default)]
    pub applicant_name: String,
    #[serde(default)]
    pub branch: String,
    pub demand_date: Option<String>,
    pub amount_collected: Option<f64>,
    #[serde(default)]
    pub marked_by: String,
    pub marked_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PaidPendingListResponse {
    #[serde(default)]
    total: u64,
    #[serde(default)]
    results: Vec<PaidPendingItem>,
}

#[derive(Debug, Serialize)]
struct ApprovalRequest<'a> {
    loan_id: i64,
    repayment_id: i64,
    action: ApprovalAction,
    user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    comments: Option<&'a str>,
}

/// Outcome of an approval decision.
#[derive(Debug, Clone, Deserialize)]
pub struct ApprovalResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub new_status: Option<String>,
}

impl ApiClient {
    /// The reviewer's queue of paid-pending records.
    pub async fn paid_pending_queue(&self) -> Result<(u64, Vec<PaidPendingItem>)> {
        let response = self.get("/paidpending-approval/").send().await?;
        let list: PaidPendingListResponse = handle_json(response).await?;
        Ok((list.total, list.results))
    }

    /// Approve or reject one queued record.
    pub async fn decide_paid_pending(
        &self,
        loan_id: i64,
        repayment_id: i64,
        action: ApprovalAction,
        user_id: i64,
        comments: Option<&str>,
    ) -> Result<ApprovalResponse> {
        let body = ApprovalRequest {
            loan_id,
            repayment_id,
            action,
            user_id,
            comments,
        };
        let response = self
            .post("/paidpending-approval/approve")
            .json(&body)
            .send()
            .await?;
        handle_json(response).await
    }
}
