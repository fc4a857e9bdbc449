//! Repayment status codes and label mapping
//!
//! The backend speaks integer codes; the UI speaks labels. The mapping
//! utilities accept either form and pass unknown values through rather than
//! failing, because status vocabularies have drifted between backend releases.

use serde::{Deserialize, Serialize};

/// Repayment status of one month's demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepaymentStatus {
    Future,
    PartiallyPaid,
    Paid,
    Overdue,
    Foreclose,
    PaidPendingApproval,
    PaidRejected,
}

impl RepaymentStatus {
    pub fn code(self) -> i32 {
        match self {
            RepaymentStatus::Future => 1,
            RepaymentStatus::PartiallyPaid => 2,
            RepaymentStatus::Paid => 3,
            RepaymentStatus::Overdue => 4,
            RepaymentStatus::Foreclose => 5,
            RepaymentStatus::PaidPendingApproval => 6,
            RepaymentStatus::PaidRejected => 7,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(RepaymentStatus::Future),
            2 => Some(RepaymentStatus::PartiallyPaid),
            3 => Some(RepaymentStatus::Paid),
            4 => Some(RepaymentStatus::Overdue),
            5 => Some(RepaymentStatus::Foreclose),
            6 => Some(RepaymentStatus::PaidPendingApproval),
            7 => Some(RepaymentStatus::PaidRejected),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RepaymentStatus::Future => "Future",
            RepaymentStatus::PartiallyPaid => "Partially Paid",
            RepaymentStatus::Paid => "Paid",
            RepaymentStatus::Overdue => "Overdue",
            RepaymentStatus::Foreclose => "Foreclose",
            RepaymentStatus::PaidPendingApproval => "Paid (Pending Approval)",
            RepaymentStatus::PaidRejected => "Paid Rejected",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Future" => Some(RepaymentStatus::Future),
            "Partially Paid" => Some(RepaymentStatus::PartiallyPaid),
            "Paid" => Some(RepaymentStatus::Paid),
            "Overdue" => Some(RepaymentStatus::Overdue),
            "Foreclose" => Some(RepaymentStatus::Foreclose),
            "Paid (Pending Approval)" => Some(RepaymentStatus::PaidPendingApproval),
            "Paid Rejected" => Some(RepaymentStatus::PaidRejected),
            _ => None,
        }
    }

    /// True when the month is settled and its fields are locked for editing.
    pub fn is_paid(self) -> bool {
        matches!(self, RepaymentStatus::Paid)
    }
}

/// Convert a raw status value (integer code or label) to its display label.
///
/// `None`/empty becomes `"Unknown"`; a value that is already a label, or an
/// integer outside the known range, is returned as-is.
pub fn status_label(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "Unknown".to_string();
    };
    if raw.is_empty() {
        return "Unknown".to_string();
    }
    match raw.parse::<i32>() {
        Ok(code) => RepaymentStatus::from_code(code)
            .map(|s| s.label().to_string())
            .unwrap_or_else(|| raw.to_string()),
        Err(_) => raw.to_string(),
    }
}

/// Convert a raw status value (label or integer code) to its integer code
/// string. `None`/unknown defaults to `"1"` (Future); a value that is already
/// numeric is returned as-is.
pub fn status_code(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "1".to_string();
    };
    if raw.is_empty() {
        return "1".to_string();
    }
    if raw.parse::<i32>().is_ok() {
        return raw.to_string();
    }
    RepaymentStatus::from_label(raw)
        .map(|s| s.code().to_string())
        .unwrap_or_else(|| "1".to_string())
}

/// True when the raw status value (code or label) means "Paid".
pub fn is_paid_status(raw: &str) -> bool {
    raw == "3" || raw == "Paid"
}
