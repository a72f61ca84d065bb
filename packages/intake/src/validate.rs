use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

use crate::form::{IntakeField, IntakeForm};
use crate::wizard::WizardStep;

lazy_static! {
    /// Loose URL shape: optional scheme, dotted domain, optional path.
    static ref URL_PATTERN: Regex =
        Regex::new(r"^(https?://)?([\da-z.-]+)\.([a-z.]{2,6})([/\w .-]*)*/?$")
            .expect("URL pattern is valid");
}

/// Returns whether `url` passes the loose website check. Empty input is
/// fine; the field is optional.
pub fn is_valid_website_url(url: &str) -> bool {
    url.is_empty() || URL_PATTERN.is_match(url)
}

/// Validates the required fields for one wizard step.
///
/// Returns an empty map when the step is complete. Steps never validate
/// each other's fields; the wizard enforces order instead.
pub fn validate_step(step: WizardStep, form: &IntakeForm) -> BTreeMap<IntakeField, String> {
    let mut errors = BTreeMap::new();

    match step {
        WizardStep::Basics => {
            if form.project_title.trim().is_empty() {
                errors.insert(
                    IntakeField::ProjectTitle,
                    "Project Title is required".to_string(),
                );
            }
            if form.business_name.trim().is_empty() {
                errors.insert(
                    IntakeField::BusinessName,
                    "Business Name is required".to_string(),
                );
            }
            if !is_valid_website_url(&form.website_url) {
                errors.insert(IntakeField::WebsiteUrl, "Invalid URL format".to_string());
            }
        }
        WizardStep::Scope => {
            if form.service_type.is_none() {
                errors.insert(
                    IntakeField::ServiceType,
                    "Please select a service type".to_string(),
                );
            }
            if form.budget_range.is_none() {
                errors.insert(
                    IntakeField::BudgetRange,
                    "Please select a budget range".to_string(),
                );
            }
            if form.expected_timeline.is_none() {
                errors.insert(
                    IntakeField::ExpectedTimeline,
                    "Please select a timeline".to_string(),
                );
            }
            if form.urgency_level.is_none() {
                errors.insert(
                    IntakeField::UrgencyLevel,
                    "Please select an urgency level".to_string(),
                );
            }
        }
        WizardStep::Details => {
            if form.description.trim().is_empty() {
                errors.insert(
                    IntakeField::Description,
                    "Please provide a project description".to_string(),
                );
            }
        }
        WizardStep::Extras => {}
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::IntakeInput;
    use mindtoweb_core::{BudgetRange, ProjectTimeline, ServiceType, UrgencyLevel};

    #[test]
    fn website_url_accepts_common_shapes() {
        assert!(is_valid_website_url(""));
        assert!(is_valid_website_url("example.com"));
        assert!(is_valid_website_url("www.yoursite.com"));
        assert!(is_valid_website_url("https://example.com/path/page"));
        assert!(is_valid_website_url("http://sub.domain.co.uk"));
    }

    #[test]
    fn website_url_rejects_junk() {
        assert!(!is_valid_website_url("not a url"));
        assert!(!is_valid_website_url("nodot"));
        assert!(!is_valid_website_url("http://"));
    }

    #[test]
    fn basics_requires_title_and_business_name() {
        let form = IntakeForm::default();
        let errors = validate_step(WizardStep::Basics, &form);
        assert!(errors.contains_key(&IntakeField::ProjectTitle));
        assert!(errors.contains_key(&IntakeField::BusinessName));
        assert!(!errors.contains_key(&IntakeField::WebsiteUrl));
    }

    #[test]
    fn basics_flags_malformed_website() {
        let mut form = IntakeForm::default();
        form.set(IntakeInput::ProjectTitle("Shop".to_string()));
        form.set(IntakeInput::BusinessName("Acme".to_string()));
        form.set(IntakeInput::WebsiteUrl("not a url".to_string()));

        let errors = validate_step(WizardStep::Basics, &form);
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key(&IntakeField::WebsiteUrl));
    }

    #[test]
    fn scope_requires_every_selection() {
        let errors = validate_step(WizardStep::Scope, &IntakeForm::default());
        assert_eq!(errors.len(), 4);

        let mut form = IntakeForm::default();
        form.set(IntakeInput::ServiceType(ServiceType::Branding));
        form.set(IntakeInput::BudgetRange(BudgetRange::Under500));
        form.set(IntakeInput::ExpectedTimeline(ProjectTimeline::Flexible));
        form.set(IntakeInput::UrgencyLevel(UrgencyLevel::Low));
        assert!(validate_step(WizardStep::Scope, &form).is_empty());
    }

    #[test]
    fn details_requires_description_and_extras_requires_nothing() {
        let form = IntakeForm::default();
        assert!(validate_step(WizardStep::Details, &form)
            .contains_key(&IntakeField::Description));
        assert!(validate_step(WizardStep::Extras, &form).is_empty());

        let mut form = IntakeForm::default();
        form.set(IntakeInput::Description("  ".to_string()));
        assert!(validate_step(WizardStep::Details, &form)
            .contains_key(&IntakeField::Description));
    }
}
