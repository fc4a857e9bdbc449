//! Field mutation types for optimistic updates
//!
//! Each editable field moves through an explicit per-field state machine:
//! `Idle -> Submitting -> {Committed | RolledBack}`. A field already
//! `Submitting` refuses a second submission; the session enforces this where
//! the original UI only noted it as an open issue.

use chrono::NaiveDate;

use crate::merge::ApplicationView;
use crate::month::MONTH_NAMES;
use crate::models::{CallingStatus, ContactType, DemandCallingStatus, RepaymentStatus};

/// The editable fields of a monthly record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    RepaymentStatus,
    PtpDate,
    AmountCollected,
    DemandCalling,
    ContactCalling(ContactType),
}

impl Field {
    /// Human-readable field name used in audit-log entries.
    pub fn name(self) -> String {
        match self {
            Field::RepaymentStatus => "Status".to_string(),
            Field::PtpDate => "PTP Date".to_string(),
            Field::AmountCollected => "Amount Collected".to_string(),
            Field::DemandCalling => "Demand Calling Status".to_string(),
            Field::ContactCalling(contact) => {
                format!("Calling Status ({})", contact.as_str())
            }
        }
    }
}

/// Lifecycle of one field's in-flight mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MutationPhase {
    #[default]
    Idle,
    Submitting,
    Committed,
    RolledBack,
}

/// A single requested field change with its new value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldChange {
    Status(RepaymentStatus),
    PtpDate(NaiveDate),
    AmountCollected(f64),
    DemandCalling(DemandCallingStatus),
    ContactCalling {
        contact: ContactType,
        status: CallingStatus,
    },
}

impl FieldChange {
    pub fn field(&self) -> Field {
        match self {
            FieldChange::Status(_) => Field::RepaymentStatus,
            FieldChange::PtpDate(_) => Field::PtpDate,
            FieldChange::AmountCollected(_) => Field::AmountCollected,
            FieldChange::DemandCalling(_) => Field::DemandCalling,
            FieldChange::ContactCalling { contact, .. } => Field::ContactCalling(*contact),
        }
    }

    /// The value as displayed after the change, used both for the optimistic
    /// view update and the audit log's "new value".
    pub fn display_value(&self) -> String {
        match self {
            FieldChange::Status(status) => status.label().to_string(),
            FieldChange::PtpDate(date) => format_display_date(*date),
            FieldChange::AmountCollected(amount) => format!("{}", amount),
            FieldChange::DemandCalling(status) => status.label().to_string(),
            FieldChange::ContactCalling { status, .. } => status.label().to_string(),
        }
    }

    /// Apply this change to a merged view, in place.
    pub fn apply_to(&self, view: &mut ApplicationView) {
        match self {
            FieldChange::Status(status) => view.status = status.label().to_string(),
            FieldChange::PtpDate(date) => view.ptp_date = format_display_date(*date),
            FieldChange::AmountCollected(amount) => view.amount_collected = *amount,
            FieldChange::DemandCalling(status) => {
                view.demand_calling_status = status.label().to_string()
            }
            FieldChange::ContactCalling { contact, status } => match contact {
                ContactType::Applicant => view.calling.applicant = *status,
                ContactType::CoApplicant => view.calling.co_applicant = *status,
                ContactType::Guarantor => view.calling.guarantor = *status,
                ContactType::Reference => view.calling.reference = *status,
            },
        }
    }

    /// Read the field's current display value from a view, for the audit
    /// log's "previous value".
    pub fn previous_value(&self, view: &ApplicationView) -> String {
        match self {
            FieldChange::Status(_) => view.status.clone(),
            FieldChange::PtpDate(_) => view.ptp_date.clone(),
            FieldChange::AmountCollected(_) => format!("{}", view.amount_collected),
            FieldChange::DemandCalling(_) => view.demand_calling_status.clone(),
            FieldChange::ContactCalling { contact, .. } => match contact {
                ContactType::Applicant => view.calling.applicant,
                ContactType::CoApplicant => view.calling.co_applicant,
                ContactType::Guarantor => view.calling.guarantor,
                ContactType::Reference => view.calling.reference,
            }
            .label()
            .to_string(),
        }
    }
}

fn format_display_date(date: NaiveDate) -> String {
    use chrono::Datelike;
    format!(
        "{:02}-{}-{:02}",
        date.day(),
        MONTH_NAMES[(date.month() - 1) as usize],
        date.year().rem_euclid(100)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::{ApplicationView, ViewKey};
    use crate::month::EmiMonth;
    use crate::models::application::CallingStatuses;

    fn view() -> ApplicationView {
        ApplicationView {
            key: ViewKey {
                payment_id: Some(42),
                month: EmiMonth::parse("Aug-25").unwrap(),
            },
            applicant_id: "APP-1".to_string(),
            applicant_name: "R. Sharma".to_string(),
            status: "Overdue".to_string(),
            ptp_date: "Not Set".to_string(),
            amount_collected: 0.0,
            demand_amount: 5200.0,
            emi_amount: 5200.0,
            branch: "Indore".to_string(),
            team_lead: "S. Iyer".to_string(),
            rm_name: "K. Patel".to_string(),
            dealer: "Not Set".to_string(),
            lender: "Not Set".to_string(),
            demand_calling_status: "Not Called".to_string(),
            calling: CallingStatuses::default(),
        }
    }

    #[test]
    fn test_field_names() {
        assert_eq!(Field::RepaymentStatus.name(), "Status");
        assert_eq!(Field::PtpDate.name(), "PTP Date");
        assert_eq!(
            Field::ContactCalling(ContactType::Guarantor).name(),
            "Calling Status (guarantor)"
        );
    }

    #[test]
    fn test_apply_status_change() {
        let mut v = view();
        FieldChange::Status(RepaymentStatus::PartiallyPaid).apply_to(&mut v);
        assert_eq!(v.status, "Partially Paid");
    }

    #[test]
    fn test_apply_ptp_change() {
        let mut v = view();
        let date = NaiveDate::from_ymd_opt(2025, 8, 28).unwrap();
        FieldChange::PtpDate(date).apply_to(&mut v);
        assert_eq!(v.ptp_date, "28-Aug-25");
    }

    #[test]
    fn test_apply_contact_calling_change() {
        let mut v = view();
        FieldChange::ContactCalling {
            contact: ContactType::CoApplicant,
            status: CallingStatus::Answered,
        }
        .apply_to(&mut v);
        assert_eq!(v.calling.co_applicant, CallingStatus::Answered);
        // Other contacts untouched.
        assert_eq!(v.calling.applicant, CallingStatus::NotCalled);
    }

    #[test]
    fn test_previous_value_reads_current_view() {
        let v = view();
        let change = FieldChange::AmountCollected(2600.0);
        assert_eq!(change.previous_value(&v), "0");
        assert_eq!(change.display_value(), "2600");
    }
}
