//! Selection and mutation state for one open application
//!
//! Replaces the original dashboard's trio of boolean refs
//! (initialized / user-selected / updating) with one explicit state machine
//! with single-writer transitions:
//!
//! - automatic re-resolution never overrides a user-selected month
//! - nothing re-resolves while a mutation is in flight
//! - a rolled-back mutation restores the exact pre-mutation view

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::merge::ApplicationView;
use crate::month::EmiMonth;
use crate::models::{Application, AuditLogEntry, MonthlyRecord};
use crate::mutation::{Field, FieldChange, MutationPhase};
use crate::resolver::{MonthResolver, Resolution, ResolveRequest};

/// How the currently selected month came to be selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthSelection {
    Uninitialized,
    AutoResolved(EmiMonth),
    UserSelected(EmiMonth),
    /// A mutation is in flight for this month; selection changes are held.
    Mutating(EmiMonth),
}

impl MonthSelection {
    pub fn month(&self) -> Option<&EmiMonth> {
        match self {
            MonthSelection::Uninitialized => None,
            MonthSelection::AutoResolved(m)
            | MonthSelection::UserSelected(m)
            | MonthSelection::Mutating(m) => Some(m),
        }
    }

    fn is_user_selected(&self) -> bool {
        matches!(self, MonthSelection::UserSelected(_))
    }

    fn is_mutating(&self) -> bool {
        matches!(self, MonthSelection::Mutating(_))
    }
}

/// Snapshot held while one mutation is in flight.
#[derive(Debug, Clone)]
struct ActiveMutation {
    change: FieldChange,
    snapshot: ApplicationView,
    previous_value: String,
    /// Whether the month was user-selected before the mutation began.
    was_user_selected: bool,
}

/// Per-application working state: the application, its monthly records, the
/// month selection, the merged view, and the session audit log.
#[derive(Debug)]
pub struct Session {
    actor: String,
    application: Option<Application>,
    records: Vec<MonthlyRecord>,
    selection: MonthSelection,
    view: Option<ApplicationView>,
    active: Option<ActiveMutation>,
    phases: HashMap<Field, MutationPhase>,
    audit_log: Vec<AuditLogEntry>,
}

impl Session {
    pub fn new(actor: impl Into<String>) -> Self {
        Session {
            actor: actor.into(),
            application: None,
            records: Vec::new(),
            selection: MonthSelection::Uninitialized,
            view: None,
            active: None,
            phases: HashMap::new(),
            audit_log: Vec::new(),
        }
    }

    /// Set the actor recorded on audit-log entries, normally after login.
    pub fn set_actor(&mut self, actor: impl Into<String>) {
        self.actor = actor.into();
    }

    /// Open a new application, discarding all per-application state.
    pub fn open(&mut self, application: Application) {
        tracing::info!(applicant_id = %application.applicant_id, "opening application");
        self.application = Some(application);
        self.records.clear();
        self.selection = MonthSelection::Uninitialized;
        self.view = None;
        self.active = None;
        self.phases.clear();
    }

    /// Replace the known monthly records for the open application.
    pub fn set_records(&mut self, records: Vec<MonthlyRecord>) {
        self.records = records;
        // The view may be stale against the new records.
        self.recompose();
    }

    pub fn application(&self) -> Option<&Application> {
        self.application.as_ref()
    }

    /// Merge freshly fetched per-month application data into the open
    /// application, keeping the session's view consistent.
    pub fn update_application(&mut self, application: Application) {
        self.application = Some(application);
        self.recompose();
    }

    pub fn records(&self) -> &[MonthlyRecord] {
        &self.records
    }

    pub fn selection(&self) -> &MonthSelection {
        &self.selection
    }

    pub fn selected_month(&self) -> Option<&EmiMonth> {
        self.selection.month()
    }

    pub fn view(&self) -> Option<&ApplicationView> {
        self.view.as_ref()
    }

    pub fn audit_log(&self) -> &[AuditLogEntry] {
        &self.audit_log
    }

    pub fn field_phase(&self, field: Field) -> MutationPhase {
        self.phases.get(&field).copied().unwrap_or_default()
    }

    /// Automatically resolve the active month via the resolver cascade.
    ///
    /// A no-op while a user-selected month is active or a mutation is in
    /// flight; automatic resolution never overrides either.
    pub fn auto_resolve(&mut self, selected_month_hint: Option<&str>) -> &MonthSelection {
        if self.selection.is_user_selected() || self.selection.is_mutating() {
            tracing::debug!(selection = ?self.selection, "skipping auto-resolution");
            return &self.selection;
        }
        let Some(app) = self.application.as_ref() else {
            return &self.selection;
        };

        let request = ResolveRequest {
            selected_month_hint,
            current_repayment_id: app.payment_id,
            application_month: app.emi_month.as_deref().or(app.demand_date.as_deref()),
        };
        match MonthResolver::new(&self.records).resolve(request) {
            Resolution::Resolved { month, source, .. } => {
                tracing::info!(month = %month, ?source, "auto-resolved month");
                self.selection = MonthSelection::AutoResolved(month);
                self.recompose();
            }
            Resolution::Unresolved => {
                tracing::info!("no resolvable month; selector stays empty");
                self.selection = MonthSelection::Uninitialized;
                self.view = None;
            }
        }
        &self.selection
    }

    /// Explicit user month selection. Takes precedence over any later
    /// automatic resolution; refused while a mutation is in flight.
    pub fn select_month(&mut self, month: EmiMonth) -> Result<()> {
        if self.selection.is_mutating() {
            return Err(Error::Validation(
                "cannot change month while an update is in flight".to_string(),
            ));
        }
        tracing::info!(month = %month, "user selected month");
        self.selection = MonthSelection::UserSelected(month);
        self.recompose();
        Ok(())
    }

    /// The monthly record backing the currently selected month, if any.
    pub fn current_record(&self) -> Option<&MonthlyRecord> {
        let month = self.selection.month()?;
        self.records
            .iter()
            .find(|record| record.emi_month().as_ref() == Some(month))
    }

    /// Begin an optimistic mutation: validate, snapshot the view, apply the
    /// change locally, and hold the selection until commit or rollback.
    pub fn begin_change(&mut self, change: FieldChange) -> Result<()> {
        let Some(month) = self.selection.month().cloned() else {
            return Err(Error::Validation("no month selected".to_string()));
        };
        let Some(view) = self.view.as_mut() else {
            return Err(Error::Validation("no application view loaded".to_string()));
        };

        // Paid months are read-only; refuse before any network call.
        if view.is_paid() {
            return Err(Error::PaidLocked);
        }

        // One mutation at a time, regardless of field: a second begin would
        // drop the held snapshot and strand the first field in Submitting.
        if let Some(active) = self.active.as_ref() {
            return Err(Error::MutationInFlight(active.change.field().name()));
        }
        let field = change.field();

        let snapshot = view.clone();
        let previous_value = change.previous_value(view);
        change.apply_to(view);

        self.active = Some(ActiveMutation {
            change,
            snapshot,
            previous_value,
            was_user_selected: self.selection.is_user_selected(),
        });
        self.phases.insert(field, MutationPhase::Submitting);
        self.selection = MonthSelection::Mutating(month);
        Ok(())
    }

    /// Commit the in-flight mutation: keep the optimistic value, append an
    /// audit-log entry, write the change through to the backing record, and
    /// release the selection.
    pub fn commit_change(&mut self) -> Result<&AuditLogEntry> {
        let Some(active) = self.active.take() else {
            return Err(Error::Validation("no mutation in flight".to_string()));
        };
        let field = active.change.field();
        self.phases.insert(field, MutationPhase::Committed);

        let month = self.release_selection(active.was_user_selected);
        self.write_through(&active.change, &month);

        let entry = AuditLogEntry::new(
            field.name(),
            Some(active.previous_value),
            Some(active.change.display_value()),
            self.actor.clone(),
            month.demand_date(),
        );
        tracing::info!(field = %entry.field, month = %month, "mutation committed");
        self.audit_log.push(entry);
        Ok(self.audit_log.last().expect("entry just pushed"))
    }

    /// Roll the in-flight mutation back to the pre-mutation snapshot.
    /// Idempotent: rolling back with nothing in flight is a no-op.
    pub fn rollback_change(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        let field = active.change.field();
        tracing::error!(field = %field.name(), "mutation failed, rolling back");
        self.view = Some(active.snapshot);
        self.phases.insert(field, MutationPhase::RolledBack);
        self.release_selection(active.was_user_selected);
    }

    fn release_selection(&mut self, was_user_selected: bool) -> EmiMonth {
        let month = self
            .selection
            .month()
            .cloned()
            .expect("mutating selection always carries a month");
        self.selection = if was_user_selected {
            MonthSelection::UserSelected(month.clone())
        } else {
            MonthSelection::AutoResolved(month.clone())
        };
        month
    }

    /// Propagate a committed change into the matching monthly record so a
    /// later recompose does not resurrect the old value.
    fn write_through(&mut self, change: &FieldChange, month: &EmiMonth) {
        let Some(record) = self
            .records
            .iter_mut()
            .find(|record| record.emi_month().as_ref() == Some(month))
        else {
            return;
        };
        match change {
            FieldChange::Status(status) => {
                record.status = Some(status.code().to_string());
                record.repayment_status = None;
            }
            FieldChange::PtpDate(date) => {
                record.ptp_date = Some(date.format("%Y-%m-%d").to_string())
            }
            FieldChange::AmountCollected(amount) => record.amount_collected = Some(*amount),
            // Calling statuses live on the application, not the record.
            FieldChange::DemandCalling(_) | FieldChange::ContactCalling { .. } => {}
        }
    }

    fn recompose(&mut self) {
        let Some(app) = self.application.as_ref() else {
            return;
        };
        let Some(month) = self.selection.month().cloned() else {
            return;
        };
        let record = self
            .records
            .iter()
            .find(|record| record.emi_month().as_ref() == Some(&month));
        let mut view = ApplicationView::compose(app, record, &month);
        // An in-flight optimistic value survives a recompose.
        if let Some(active) = self.active.as_ref() {
            active.change.apply_to(&mut view);
        }
        self.view = Some(view);
    }
}
