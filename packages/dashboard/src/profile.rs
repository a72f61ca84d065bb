//! Profile editor backing the dashboard's account settings form.

use std::sync::Arc;
use tracing::info;

use mindtoweb_backend::{Backend, BackendResult};
use mindtoweb_core::ProfileUpdate;

/// Editable copy of the signed-in user's profile.
pub struct ProfileEditor {
    backend: Arc<dyn Backend>,
    user_id: String,
    pub full_name: String,
    pub business_name: String,
}

impl ProfileEditor {
    /// Opens the editor prefilled with the existing profile. A user without
    /// a profile row yet starts from empty fields.
    pub async fn load(backend: Arc<dyn Backend>, user_id: impl Into<String>) -> BackendResult<Self> {
        let user_id = user_id.into();
        let existing = backend
            .get_profiles(&[user_id.clone()])
            .await?
            .into_iter()
            .next();

        let (full_name, business_name) = match existing {
            Some(profile) => (profile.full_name, profile.business_name),
            None => (String::new(), String::new()),
        };

        Ok(Self {
            backend,
            user_id,
            full_name,
            business_name,
        })
    }

    /// Saves the edited fields, creating the profile row if needed.
    pub async fn save(&self) -> BackendResult<()> {
        let update = ProfileUpdate::new(
            self.user_id.clone(),
            self.full_name.clone(),
            self.business_name.clone(),
        );
        self.backend.upsert_profile(&update).await?;
        info!(user_id = %self.user_id, "Profile saved");
        Ok(())
    }
}
