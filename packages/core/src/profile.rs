use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-user display metadata, keyed one-to-one with the auth account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub business_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Upsert payload for `profiles`, produced by the profile form.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    pub id: String,
    pub full_name: String,
    pub business_name: String,
    pub updated_at: DateTime<Utc>,
}

impl ProfileUpdate {
    pub fn new(
        id: impl Into<String>,
        full_name: impl Into<String>,
        business_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            business_name: business_name.into(),
            updated_at: Utc::now(),
        }
    }
}
