//! Lead capture for the marketing chat widget.

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use mindtoweb_backend::{Backend, BackendError};
use mindtoweb_core::{NewLead, LEAD_SOURCE_CHAT_WIDGET};

/// What the visitor has typed into the widget so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadForm {
    pub name: String,
    pub email: String,
    pub business_name: String,
    pub message: String,
    pub budget_range: String,
    pub timeline: String,
}

impl LeadForm {
    /// Minimal pre-submit check: name, email, and message present, and the
    /// email at least shaped like one. Values are taken as typed.
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
            && !self.email.is_empty()
            && !self.message.is_empty()
            && self.email.contains('@')
    }
}

/// Where the widget's submit button is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadStatus {
    Idle,
    Success,
    Error,
}

#[derive(Debug, Error)]
pub enum LeadError {
    #[error("Name, email, and message are required")]
    Invalid,
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Drives the chat widget's capture flow. Anonymous by design: no session
/// is involved, the row is stamped with the widget's source tag.
pub struct LeadCapture {
    backend: Arc<dyn Backend>,
    pub form: LeadForm,
    status: LeadStatus,
}

impl LeadCapture {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            form: LeadForm::default(),
            status: LeadStatus::Idle,
        }
    }

    pub fn status(&self) -> LeadStatus {
        self.status
    }

    /// Submits the captured lead. Invalid forms are refused locally and
    /// leave the status untouched so the visitor can keep typing.
    pub async fn submit(&mut self) -> Result<(), LeadError> {
        if !self.form.is_valid() {
            return Err(LeadError::Invalid);
        }

        let lead = NewLead {
            name: self.form.name.clone(),
            email: self.form.email.clone(),
            business_name: self.form.business_name.clone(),
            message: self.form.message.clone(),
            budget_range: self.form.budget_range.clone(),
            timeline: self.form.timeline.clone(),
            source: LEAD_SOURCE_CHAT_WIDGET.to_string(),
        };

        match self.backend.insert_lead(&lead).await {
            Ok(()) => {
                info!("Lead captured from chat widget");
                self.status = LeadStatus::Success;
                Ok(())
            }
            Err(e) => {
                self.status = LeadStatus::Error;
                Err(e.into())
            }
        }
    }

    /// Clears the widget for another capture.
    pub fn reset(&mut self) {
        self.form = LeadForm::default();
        self.status = LeadStatus::Idle;
    }
}
