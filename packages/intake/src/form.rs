use serde::{Deserialize, Serialize};

use mindtoweb_core::{BudgetRange, ProjectTimeline, ServiceType, UrgencyLevel};

/// Working state of the intake wizard form.
///
/// This is exactly what gets serialized into the local draft slot, so the
/// JSON round-trip must be lossless: free-text fields stay strings, the
/// select-style fields stay `None` until the client picks something.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IntakeForm {
    #[serde(default)]
    pub project_title: String,
    #[serde(default)]
    pub business_name: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub website_url: String,
    #[serde(default)]
    pub service_type: Option<ServiceType>,
    #[serde(default)]
    pub budget_range: Option<BudgetRange>,
    #[serde(default)]
    pub expected_timeline: Option<ProjectTimeline>,
    #[serde(default)]
    pub urgency_level: Option<UrgencyLevel>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub goals: String,
    #[serde(default)]
    pub target_audience: String,
    #[serde(default)]
    pub key_features: String,
    #[serde(default)]
    pub inspiration_links: String,
    #[serde(default)]
    pub additional_notes: String,
}

/// Form fields, used as keys in the wizard's error map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IntakeField {
    ProjectTitle,
    BusinessName,
    Industry,
    WebsiteUrl,
    ServiceType,
    BudgetRange,
    ExpectedTimeline,
    UrgencyLevel,
    Description,
    Goals,
    TargetAudience,
    KeyFeatures,
    InspirationLinks,
    AdditionalNotes,
}

/// One form edit, routed through [`crate::IntakeWizard::apply`].
#[derive(Debug, Clone)]
pub enum IntakeInput {
    ProjectTitle(String),
    BusinessName(String),
    Industry(String),
    WebsiteUrl(String),
    ServiceType(ServiceType),
    BudgetRange(BudgetRange),
    ExpectedTimeline(ProjectTimeline),
    UrgencyLevel(UrgencyLevel),
    Description(String),
    Goals(String),
    TargetAudience(String),
    KeyFeatures(String),
    InspirationLinks(String),
    AdditionalNotes(String),
}

impl IntakeInput {
    /// The field this edit touches.
    pub fn field(&self) -> IntakeField {
        match self {
            IntakeInput::ProjectTitle(_) => IntakeField::ProjectTitle,
            IntakeInput::BusinessName(_) => IntakeField::BusinessName,
            IntakeInput::Industry(_) => IntakeField::Industry,
            IntakeInput::WebsiteUrl(_) => IntakeField::WebsiteUrl,
            IntakeInput::ServiceType(_) => IntakeField::ServiceType,
            IntakeInput::BudgetRange(_) => IntakeField::BudgetRange,
            IntakeInput::ExpectedTimeline(_) => IntakeField::ExpectedTimeline,
            IntakeInput::UrgencyLevel(_) => IntakeField::UrgencyLevel,
            IntakeInput::Description(_) => IntakeField::Description,
            IntakeInput::Goals(_) => IntakeField::Goals,
            IntakeInput::TargetAudience(_) => IntakeField::TargetAudience,
            IntakeInput::KeyFeatures(_) => IntakeField::KeyFeatures,
            IntakeInput::InspirationLinks(_) => IntakeField::InspirationLinks,
            IntakeInput::AdditionalNotes(_) => IntakeField::AdditionalNotes,
        }
    }
}

impl IntakeForm {
    /// Applies one edit to the form.
    pub fn set(&mut self, input: IntakeInput) {
        match input {
            IntakeInput::ProjectTitle(v) => self.project_title = v,
            IntakeInput::BusinessName(v) => self.business_name = v,
            IntakeInput::Industry(v) => self.industry = v,
            IntakeInput::WebsiteUrl(v) => self.website_url = v,
            IntakeInput::ServiceType(v) => self.service_type = Some(v),
            IntakeInput::BudgetRange(v) => self.budget_range = Some(v),
            IntakeInput::ExpectedTimeline(v) => self.expected_timeline = Some(v),
            IntakeInput::UrgencyLevel(v) => self.urgency_level = Some(v),
            IntakeInput::Description(v) => self.description = v,
            IntakeInput::Goals(v) => self.goals = v,
            IntakeInput::TargetAudience(v) => self.target_audience = v,
            IntakeInput::KeyFeatures(v) => self.key_features = v,
            IntakeInput::InspirationLinks(v) => self.inspiration_links = v,
            IntakeInput::AdditionalNotes(v) => self.additional_notes = v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn form_json_round_trip_is_lossless() {
        let mut form = IntakeForm::default();
        form.set(IntakeInput::ProjectTitle("AI Shop".to_string()));
        form.set(IntakeInput::BusinessName("Acme".to_string()));
        form.set(IntakeInput::ServiceType(ServiceType::AiAutomation));
        form.set(IntakeInput::BudgetRange(BudgetRange::Other(
            "Equity only".to_string(),
        )));
        form.set(IntakeInput::UrgencyLevel(UrgencyLevel::High));
        form.set(IntakeInput::Goals("More sales".to_string()));

        let json = serde_json::to_string(&form).unwrap();
        let restored: IntakeForm = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, form);
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let restored: IntakeForm = serde_json::from_str("{}").unwrap();
        assert_eq!(restored, IntakeForm::default());
    }
}
