//! Dashboard coordinator
//!
//! Ties the API client to the per-application session: opening an
//! application fans out the detail, month-option and repayment-record
//! fetches, month changes refetch per-month data without clobbering the
//! current view on failure, and field edits run the optimistic
//! submit / commit-or-rollback cycle against the status-management endpoint.

use crate::api::applications::ApplicationFilters;
use crate::api::approvals::{ApprovalAction, ApprovalResponse, PaidPendingItem};
use crate::api::auth::AuthResponse;
use crate::api::comments::Comment;
use crate::api::filters::{FilterOptions, StatusSummary};
use crate::api::months::MonthOption;
use crate::api::status::{StatusUpdateRequest, StatusUpdateResponse};
use crate::api::ApiClient;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::merge::ApplicationView;
use crate::models::{Application, CommentType};
use crate::month::EmiMonth;
use crate::mutation::FieldChange;
use crate::session::Session;

/// One operator's dashboard: an authenticated API client plus the working
/// state of the currently open application.
#[derive(Debug)]
pub struct Dashboard {
    api: ApiClient,
    session: Session,
    month_options: Vec<MonthOption>,
    user_id: Option<i64>,
}

impl Dashboard {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Dashboard {
            api: ApiClient::new(config)?,
            session: Session::new(""),
            month_options: Vec::new(),
            user_id: None,
        })
    }

    /// Log in and record the operator as the audit-log actor.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthResponse> {
        let auth = self.api.login(email, password).await?;
        let actor = if auth.user_name.is_empty() {
            email.to_string()
        } else {
            auth.user_name.clone()
        };
        self.session.set_actor(actor);
        self.user_id = auth.user_id;
        Ok(auth)
    }

    pub async fn logout(&mut self) {
        self.api.logout().await;
        self.user_id = None;
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn view(&self) -> Option<&ApplicationView> {
        self.session.view()
    }

    /// Months selectable for the open application's loan.
    pub fn month_options(&self) -> &[MonthOption] {
        &self.month_options
    }

    /// List applications for the dashboard grid.
    pub async fn search(&self, filters: &ApplicationFilters) -> Result<Vec<Application>> {
        Ok(self.api.list_applications(filters).await?.applications)
    }

    /// Open an application from the grid: fetch its monthly records, month
    /// options and full details, then resolve the active month. Each fetch
    /// is independent; a failure degrades that data source instead of
    /// aborting the open.
    pub async fn open_application(
        &mut self,
        application: Application,
        dashboard_month: Option<&str>,
    ) -> Result<()> {
        let applicant_id = application.applicant_id.clone();
        let loan_id = application.loan_id;
        self.session.open(application);
        self.month_options.clear();

        if let Some(loan_id) = loan_id {
            match self.api.payment_details(loan_id).await {
                Ok(records) => self.session.set_records(records),
                Err(err) => {
                    tracing::warn!(loan_id, error = %err, "payment details fetch failed")
                }
            }
            match self.api.month_options(loan_id).await {
                Ok(dropdown) => self.month_options = dropdown.months,
                Err(err) => {
                    tracing::warn!(loan_id, error = %err, "month options fetch failed")
                }
            }
        }

        let month_hint = dashboard_month.and_then(EmiMonth::parse);
        match self
            .api
            .application_details(&applicant_id, month_hint.as_ref())
            .await
        {
            Ok(Some(details)) => self.session.update_application(details),
            Ok(None) => {
                tracing::debug!(%applicant_id, "no enriched details, keeping grid data")
            }
            Err(err) => {
                tracing::warn!(%applicant_id, error = %err, "detail fetch failed")
            }
        }

        self.session.auto_resolve(dashboard_month);
        Ok(())
    }

    /// Switch the open application to another month at the user's request.
    ///
    /// The selection changes immediately; the per-month refetches then
    /// update the view, and on fetch failure the previous application data
    /// stays merged under the new month rather than blanking the panel.
    pub async fn change_month(&mut self, month: EmiMonth) -> Result<()> {
        self.session.select_month(month.clone())?;

        let Some(app) = self.session.application() else {
            return Ok(());
        };
        let applicant_id = app.applicant_id.clone();
        let loan_id = app.loan_id;

        if let Some(loan_id) = loan_id {
            if self.session.current_record().is_none() {
                match self.api.payment_details_for_month(loan_id, &month).await {
                    Ok(Some(record)) => {
                        let mut records = self.session.records().to_vec();
                        records.push(record);
                        self.session.set_records(records);
                    }
                    Ok(None) => {}
                    Err(err) => {
                        tracing::warn!(loan_id, month = %month, error = %err, "record fetch failed")
                    }
                }
            }
        }

        match self.api.application_details(&applicant_id, Some(&month)).await {
            Ok(Some(mut details)) => {
                if details.payment_id.is_none() {
                    details.payment_id = self.repayment_id_for(&month);
                }
                self.session.update_application(details);
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(%applicant_id, month = %month, error = %err, "month detail fetch failed, keeping current view");
            }
        }
        Ok(())
    }

    fn repayment_id_for(&self, month: &EmiMonth) -> Option<i64> {
        self.month_options
            .iter()
            .find(|option| option.emi_month().as_ref() == Some(month))
            .and_then(|option| option.repayment_id)
    }

    /// Submit one field change optimistically: apply it to the view, send it
    /// to the status-management endpoint, then commit or roll back.
    pub async fn submit_change(&mut self, change: FieldChange) -> Result<StatusUpdateResponse> {
        if !self.api.is_authenticated() {
            return Err(Error::Unauthorized("not logged in".to_string()));
        }
        let loan_id = self
            .session
            .application()
            .and_then(|app| app.loan_id)
            .ok_or_else(|| Error::Validation("application has no loan id".to_string()))?;

        self.session.begin_change(change)?;

        let request = match self.build_update_request(&change, loan_id) {
            Ok(request) => request,
            Err(err) => {
                self.session.rollback_change();
                return Err(err);
            }
        };

        match self.api.update_status(&request).await {
            Ok(response) => {
                self.session.commit_change()?;
                Ok(response)
            }
            Err(err) => {
                self.session.rollback_change();
                Err(err)
            }
        }
    }

    fn build_update_request(
        &self,
        change: &FieldChange,
        loan_id: i64,
    ) -> Result<StatusUpdateRequest> {
        let view = self
            .session
            .view()
            .ok_or_else(|| Error::Validation("no application view loaded".to_string()))?;
        let repayment_id = view
            .key
            .payment_id
            .ok_or_else(|| Error::Validation("no repayment id for selected month".to_string()))?;
        let month = &view.key.month;

        Ok(match change {
            FieldChange::Status(status) => {
                StatusUpdateRequest::demand(loan_id, repayment_id).with_status(*status)
            }
            FieldChange::PtpDate(date) => {
                StatusUpdateRequest::demand(loan_id, repayment_id).with_ptp_date(*date)
            }
            FieldChange::AmountCollected(amount) => {
                StatusUpdateRequest::demand(loan_id, repayment_id).with_amount_collected(*amount)
            }
            FieldChange::DemandCalling(status) => {
                StatusUpdateRequest::demand(loan_id, repayment_id).with_demand_calling(*status)
            }
            FieldChange::ContactCalling { contact, status } => {
                StatusUpdateRequest::contact_calling(
                    loan_id,
                    repayment_id,
                    *contact,
                    status.code(),
                    month,
                )
            }
        })
    }

    /// Attach a comment to the open application's selected repayment.
    pub async fn add_comment(
        &self,
        text: &str,
        comment_type: CommentType,
    ) -> Result<Comment> {
        let repayment_id = self.selected_repayment_id()?;
        self.api.create_comment(repayment_id, text, comment_type).await
    }

    /// The comment thread for the open application's selected repayment.
    pub async fn comments(&self, comment_type: CommentType) -> Result<Vec<Comment>> {
        let repayment_id = self.selected_repayment_id()?;
        self.api.comments(repayment_id, comment_type).await
    }

    /// Comment count for the selected repayment in one workflow's thread.
    pub async fn comment_count(&self, comment_type: CommentType) -> Result<u64> {
        let repayment_id = self.selected_repayment_id()?;
        let count = self
            .api
            .comment_count_by_type(repayment_id, comment_type)
            .await?;
        Ok(count.comment_count)
    }

    fn selected_repayment_id(&self) -> Result<i64> {
        self.session
            .view()
            .and_then(|view| view.key.payment_id)
            .ok_or_else(|| Error::Validation("no repayment selected".to_string()))
    }

    /// The reviewer's paid-pending queue.
    pub async fn paid_pending_queue(&self) -> Result<Vec<PaidPendingItem>> {
        Ok(self.api.paid_pending_queue().await?.1)
    }

    /// Approve or reject a queued paid-pending record as the logged-in user.
    pub async fn decide_paid_pending(
        &self,
        loan_id: i64,
        repayment_id: i64,
        action: ApprovalAction,
        comments: Option<&str>,
    ) -> Result<ApprovalResponse> {
        let user_id = self
            .user_id
            .ok_or_else(|| Error::Unauthorized("not logged in".to_string()))?;
        self.api
            .decide_paid_pending(loan_id, repayment_id, action, user_id, comments)
            .await
    }

    /// Filter dropdown values for the dashboard's month context.
    pub async fn filter_options(&self, month: Option<&EmiMonth>) -> Result<FilterOptions> {
        self.api.filter_options(month).await
    }

    /// Status-count summary for the dashboard's month context.
    pub async fn status_summary(&self, month: Option<&EmiMonth>) -> Result<StatusSummary> {
        self.api.status_summary(month).await
    }
}
