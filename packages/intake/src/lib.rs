//! Intake wizard for new project requests.
//!
//! A four-step form (Basics, Scope, Details, Extras) with per-step
//! validation, a debounced draft saved to local storage between sessions,
//! and a single submission that creates a `service_requests` row owned by
//! the signed-in client.

pub mod autosave;
pub mod draft;
pub mod form;
pub mod validate;
pub mod wizard;

pub use autosave::Autosave;
pub use draft::{DraftError, DraftStore, FileDraftStore, MemoryDraftStore, DRAFT_KEY};
pub use form::{IntakeField, IntakeForm, IntakeInput};
pub use validate::validate_step;
pub use wizard::{IntakeWizard, SubmitError, WizardStep};
