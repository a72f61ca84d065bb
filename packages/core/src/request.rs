use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Status lifecycle for a service request.
///
/// The vocabulary is agency-controlled: rows are created as `PendingReview`
/// and only agency staff move them forward. Clients never write this field
/// after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum RequestStatus {
    #[serde(rename = "Pending Review")]
    PendingReview,
    #[serde(rename = "In Planning")]
    InPlanning,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Awaiting Feedback")]
    AwaitingFeedback,
    Completed,
}

impl Default for RequestStatus {
    fn default() -> Self {
        RequestStatus::PendingReview
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestStatus::PendingReview => write!(f, "Pending Review"),
            RequestStatus::InPlanning => write!(f, "In Planning"),
            RequestStatus::InProgress => write!(f, "In Progress"),
            RequestStatus::AwaitingFeedback => write!(f, "Awaiting Feedback"),
            RequestStatus::Completed => write!(f, "Completed"),
        }
    }
}

/// Urgency levels offered by the intake wizard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrgencyLevel::Low => write!(f, "Low"),
            UrgencyLevel::Medium => write!(f, "Medium"),
            UrgencyLevel::High => write!(f, "High"),
        }
    }
}

/// Expands to an enum-like string field with known variants and an
/// `Other(String)` pass-through for values outside the current option set.
/// Serialization always reproduces the stored string byte for byte.
macro_rules! open_string_enum {
    ($(#[$doc:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum $name {
            $($variant,)+
            /// A value outside the known option set, passed through unchanged.
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $text,)+
                    $name::Other(s) => s,
                }
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    $($text => $name::$variant,)+
                    other => $name::Other(other.to_string()),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok($name::from(s.as_str()))
            }
        }
    };
}

open_string_enum! {
    /// Service offerings selectable in the intake wizard.
    ServiceType {
        WebsiteDevelopment => "Website Development",
        AiAutomation => "AI Automation",
        Branding => "Branding",
        FullDigitalSystem => "Full Digital System",
        Unspecified => "Other",
    }
}

open_string_enum! {
    /// Budget brackets selectable in the intake wizard.
    BudgetRange {
        Under500 => "Under $500",
        From500To1500 => "$500 - $1,500",
        From1500To5000 => "$1,500 - $5,000",
        Over5000 => "$5,000+",
    }
}

open_string_enum! {
    /// Delivery timelines selectable in the intake wizard.
    ProjectTimeline {
        Asap => "ASAP",
        OneMonth => "1 month",
        OneToThreeMonths => "1-3 months",
        Flexible => "Flexible",
    }
}

/// A client's submitted project intake, as stored in `service_requests`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: String,
    pub user_id: String,
    pub project_title: String,
    pub business_name: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub website_url: String,
    pub service_type: ServiceType,
    pub budget_range: BudgetRange,
    pub expected_timeline: ProjectTimeline,
    pub urgency_level: UrgencyLevel,
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
    #[serde(default)]
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for `service_requests`.
///
/// There is deliberately no way to choose a status here: every new request
/// enters the lifecycle as `Pending Review`.
#[derive(Debug, Clone, Serialize)]
pub struct NewServiceRequest {
    pub user_id: String,
    pub project_title: String,
    pub business_name: String,
    pub industry: String,
    pub website_url: String,
    pub service_type: ServiceType,
    pub budget_range: BudgetRange,
    pub expected_timeline: ProjectTimeline,
    pub urgency_level: UrgencyLevel,
    pub description: String,
    pub goals: String,
    pub target_audience: String,
    pub key_features: String,
    pub inspiration_links: String,
    pub additional_notes: String,
    status: RequestStatus,
}

impl NewServiceRequest {
    /// Builds an insert payload owned by `user_id`. The status is forced to
    /// `Pending Review` regardless of anything the caller holds.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: impl Into<String>,
        project_title: impl Into<String>,
        business_name: impl Into<String>,
        service_type: ServiceType,
        budget_range: BudgetRange,
        expected_timeline: ProjectTimeline,
        urgency_level: UrgencyLevel,
        description: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            project_title: project_title.into(),
            business_name: business_name.into(),
            industry: String::new(),
            website_url: String::new(),
            service_type,
            budget_range,
            expected_timeline,
            urgency_level,
            description: description.into(),
            goals: String::new(),
            target_audience: String::new(),
            key_features: String::new(),
            inspiration_links: String::new(),
            additional_notes: String::new(),
            status: RequestStatus::PendingReview,
        }
    }

    pub fn status(&self) -> &RequestStatus {
        &self.status
    }
}
