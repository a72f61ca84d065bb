//! The four-step intake wizard state machine.

use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use mindtoweb_backend::{Backend, BackendError};
use mindtoweb_core::{NewServiceRequest, ServiceRequest};

use crate::autosave::Autosave;
use crate::draft::{load_draft, DraftStore, DRAFT_KEY};
use crate::form::{IntakeField, IntakeForm, IntakeInput};
use crate::validate::validate_step;

/// Steps of the intake wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Basics,
    Scope,
    Details,
    Extras,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Basics,
        WizardStep::Scope,
        WizardStep::Details,
        WizardStep::Extras,
    ];

    pub fn index(self) -> usize {
        match self {
            WizardStep::Basics => 0,
            WizardStep::Scope => 1,
            WizardStep::Details => 2,
            WizardStep::Extras => 3,
        }
    }

    fn next(self) -> Option<WizardStep> {
        Self::ALL.get(self.index() + 1).copied()
    }

    fn prev(self) -> Option<WizardStep> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }
}

/// Why a submission attempt did not create a request.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Submission is only available from the final step")]
    NotOnFinalStep,
    #[error("The form has validation errors")]
    Validation(BTreeMap<IntakeField, String>),
    #[error("You must be logged in to submit a request")]
    LoginRequired,
    #[error("This request was already submitted")]
    AlreadySubmitted,
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Driver for the intake flow: holds the form, the current step, the
/// per-field error map, and the debounced draft writer.
pub struct IntakeWizard {
    backend: Arc<dyn Backend>,
    store: Arc<dyn DraftStore>,
    form: IntakeForm,
    step: WizardStep,
    errors: BTreeMap<IntakeField, String>,
    autosave: Option<Autosave>,
    submitted: Option<ServiceRequest>,
}

impl IntakeWizard {
    /// Opens the wizard, resuming from the saved draft when one exists and
    /// parses; anything else starts from an empty form.
    pub async fn open(backend: Arc<dyn Backend>, store: Arc<dyn DraftStore>) -> Self {
        let form = load_draft(store.as_ref()).await.unwrap_or_default();
        let autosave = Autosave::new(store.clone());
        Self {
            backend,
            store,
            form,
            step: WizardStep::Basics,
            errors: BTreeMap::new(),
            autosave: Some(autosave),
            submitted: None,
        }
    }

    pub fn form(&self) -> &IntakeForm {
        &self.form
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Validation errors from the most recent advance or submit attempt.
    pub fn errors(&self) -> &BTreeMap<IntakeField, String> {
        &self.errors
    }

    /// The created request, once submission has succeeded.
    pub fn submitted(&self) -> Option<&ServiceRequest> {
        self.submitted.as_ref()
    }

    /// Applies one edit: the field's stale error clears immediately and the
    /// new snapshot is queued for the debounced draft write. Ignored once
    /// the request has been submitted.
    pub fn apply(&mut self, input: IntakeInput) {
        if self.submitted.is_some() {
            return;
        }
        self.errors.remove(&input.field());
        self.form.set(input);
        if let Some(autosave) = &self.autosave {
            autosave.push(self.form.clone());
        }
    }

    /// Moves to the next step if the current one validates. On failure the
    /// step stays put and [`errors`](Self::errors) holds the reasons.
    pub fn advance(&mut self) -> bool {
        if self.submitted.is_some() {
            return false;
        }
        let errors = validate_step(self.step, &self.form);
        if !errors.is_empty() {
            self.errors = errors;
            return false;
        }
        self.errors.clear();
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        true
    }

    /// Moves to the previous step. Never validates; entered data stays.
    pub fn back(&mut self) -> bool {
        if self.submitted.is_some() {
            return false;
        }
        match self.step.prev() {
            Some(prev) => {
                self.step = prev;
                true
            }
            None => false,
        }
    }

    /// Jumps directly to an earlier step. Forward jumps are refused; the
    /// only way forward is through [`advance`](Self::advance).
    pub fn jump_to(&mut self, step: WizardStep) -> bool {
        if self.submitted.is_some() {
            return false;
        }
        if step.index() < self.step.index() {
            self.step = step;
            true
        } else {
            false
        }
    }

    /// Submits the completed form as a new service request.
    ///
    /// Only valid from the final step with every step passing validation and
    /// a signed-in user. On success the draft is cleared and the wizard is
    /// terminal; every failure leaves the form and the draft untouched.
    pub async fn submit(&mut self) -> Result<ServiceRequest, SubmitError> {
        if self.submitted.is_some() {
            return Err(SubmitError::AlreadySubmitted);
        }
        if self.step != WizardStep::Extras {
            return Err(SubmitError::NotOnFinalStep);
        }

        let mut errors = BTreeMap::new();
        for step in WizardStep::ALL {
            errors.extend(validate_step(step, &self.form));
        }
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Err(SubmitError::Validation(errors));
        }

        let user = match self.backend.current_user().await? {
            Some(user) => user,
            None => return Err(SubmitError::LoginRequired),
        };

        let request = self.build_request(&user.id)?;
        let row = self.backend.insert_service_request(&request).await?;
        info!(request_id = %row.id, "Service request submitted");

        // Stop the debounced writer before clearing the slot, otherwise a
        // snapshot still waiting out its quiet period would recreate it.
        self.autosave = None;
        if let Err(e) = self.store.delete(DRAFT_KEY).await {
            warn!("Could not clear intake draft after submission: {}", e);
        }

        self.submitted = Some(row.clone());
        Ok(row)
    }

    fn build_request(&self, user_id: &str) -> Result<NewServiceRequest, SubmitError> {
        let (Some(service_type), Some(budget_range), Some(expected_timeline), Some(urgency_level)) = (
            self.form.service_type.clone(),
            self.form.budget_range.clone(),
            self.form.expected_timeline.clone(),
            self.form.urgency_level,
        ) else {
            return Err(SubmitError::Validation(validate_step(
                WizardStep::Scope,
                &self.form,
            )));
        };

        let mut request = NewServiceRequest::new(
            user_id,
            self.form.project_title.clone(),
            self.form.business_name.clone(),
            service_type,
            budget_range,
            expected_timeline,
            urgency_level,
            self.form.description.clone(),
        );
        request.industry = self.form.industry.clone();
        request.website_url = self.form.website_url.clone();
        request.goals = self.form.goals.clone();
        request.target_audience = self.form.target_audience.clone();
        request.key_features = self.form.key_features.clone();
        request.inspiration_links = self.form.inspiration_links.clone();
        request.additional_notes = self.form.additional_notes.clone();
        Ok(request)
    }
}
