//! Domain models for the collections desk client

pub mod application;
pub mod status;

pub use application::{Application, ContactInfo, MonthlyRecord, RepaymentStatusInfo};
pub use status::{status_code, status_label, RepaymentStatus};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of an attempted contact call, keyed per contact and month.
///
/// Defaults to `NotCalled`; only explicit user action moves it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallingStatus {
    Answered,
    NotAnswered,
    #[default]
    NotCalled,
}

impl CallingStatus {
    /// Wire code used by the status-management endpoint.
    pub fn code(self) -> i32 {
        match self {
            CallingStatus::Answered => 1,
            CallingStatus::NotAnswered => 2,
            CallingStatus::NotCalled => 3,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(CallingStatus::Answered),
            2 => Some(CallingStatus::NotAnswered),
            3 => Some(CallingStatus::NotCalled),
            _ => None,
        }
    }

    /// Parse either a wire code or a backend display string.
    pub fn parse(raw: &str) -> Self {
        if let Ok(code) = raw.parse::<i32>() {
            return Self::from_code(code).unwrap_or_default();
        }
        match raw.to_lowercase().as_str() {
            "answered" => CallingStatus::Answered,
            "not answered" => CallingStatus::NotAnswered,
            _ => CallingStatus::NotCalled,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CallingStatus::Answered => "Answered",
            CallingStatus::NotAnswered => "Not Answered",
            CallingStatus::NotCalled => "Not Called",
        }
    }
}

/// The four contact roles attached to an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactType {
    Applicant,
    CoApplicant,
    Guarantor,
    Reference,
}

impl ContactType {
    pub const ALL: [ContactType; 4] = [
        ContactType::Applicant,
        ContactType::CoApplicant,
        ContactType::Guarantor,
        ContactType::Reference,
    ];

    pub fn code(self) -> i32 {
        match self {
            ContactType::Applicant => 1,
            ContactType::CoApplicant => 2,
            ContactType::Guarantor => 3,
            ContactType::Reference => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContactType::Applicant => "applicant",
            ContactType::CoApplicant => "co_applicant",
            ContactType::Guarantor => "guarantor",
            ContactType::Reference => "reference",
        }
    }
}

/// Demand-calling outcome recorded against the month's demand itself
/// (as opposed to a specific contact).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemandCallingStatus {
    DepositedInBank,
    CashCollected,
    PtpTaken,
    NoResponse,
}

impl DemandCallingStatus {
    pub fn code(self) -> i32 {
        match self {
            DemandCallingStatus::DepositedInBank => 1,
            DemandCallingStatus::CashCollected => 2,
            DemandCallingStatus::PtpTaken => 3,
            DemandCallingStatus::NoResponse => 4,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(DemandCallingStatus::DepositedInBank),
            2 => Some(DemandCallingStatus::CashCollected),
            3 => Some(DemandCallingStatus::PtpTaken),
            4 => Some(DemandCallingStatus::NoResponse),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DemandCallingStatus::DepositedInBank => "Deposited in Bank",
            DemandCallingStatus::CashCollected => "Cash Collected",
            DemandCallingStatus::PtpTaken => "PTP Taken",
            DemandCallingStatus::NoResponse => "No Response",
        }
    }
}

/// Comment-type tag scoping a note to a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentType {
    ApplicationDetails,
    PaidPending,
}

impl CommentType {
    pub fn code(self) -> i32 {
        match self {
            CommentType::ApplicationDetails => 1,
            CommentType::PaidPending => 2,
        }
    }
}

/// Append-only record of a field change, created as a side effect of a
/// committed mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub field: String,
    pub previous_value: Option<String>,
    pub new_value: Option<String>,
    pub actor: String,
    /// Demand date of the month the change applies to.
    pub demand_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    pub fn new(
        field: impl Into<String>,
        previous_value: Option<String>,
        new_value: Option<String>,
        actor: impl Into<String>,
        demand_date: NaiveDate,
    ) -> Self {
        AuditLogEntry {
            id: Uuid::new_v4(),
            field: field.into(),
            previous_value,
            new_value,
            actor: actor.into(),
            demand_date,
            created_at: Utc::now(),
        }
    }
}
