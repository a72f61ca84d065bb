use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source tag stamped on leads captured by the marketing chat widget.
pub const LEAD_SOURCE_CHAT_WIDGET: &str = "chat_widget";

/// A marketing-capture record, distinct from a service request.
///
/// Leads are write-only from the client's perspective: the platform creates
/// them and never reads them back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub business_name: String,
    pub message: String,
    #[serde(default)]
    pub budget_range: String,
    #[serde(default)]
    pub timeline: String,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for `leads`.
#[derive(Debug, Clone, Serialize)]
pub struct NewLead {
    pub name: String,
    pub email: String,
    pub business_name: String,
    pub message: String,
    pub budget_range: String,
    pub timeline: String,
    pub source: String,
}
