use async_trait::async_trait;

use mindtoweb_core::{
    DiscussionComment, NewComment, NewLead, NewServiceRequest, Profile, ProfileUpdate,
    ServiceRequest,
};

use crate::auth::AuthUser;
use crate::error::BackendResult;

/// Table holding submitted project intakes.
pub const SERVICE_REQUESTS_TABLE: &str = "service_requests";
/// Table holding per-user display metadata.
pub const PROFILES_TABLE: &str = "profiles";
/// Table holding per-project discussion comments.
pub const DISCUSSIONS_TABLE: &str = "project_discussions";
/// Table holding marketing leads.
pub const LEADS_TABLE: &str = "leads";

/// Operations the platform requires from the hosted backend.
///
/// Every method is a suspension point; callers must not assume ordering
/// between independently issued calls. Implementations must not panic on
/// remote failure: errors come back through [`BackendResult`].
#[async_trait]
pub trait Backend: Send + Sync {
    // --- auth ---

    /// Returns the account behind the current session, or `None` when
    /// unauthenticated.
    async fn current_user(&self) -> BackendResult<Option<AuthUser>>;

    async fn sign_up(&self, email: &str, password: &str) -> BackendResult<AuthUser>;

    async fn sign_out(&self) -> BackendResult<()>;

    // --- service_requests ---

    /// Inserts a new service request and returns the created row, including
    /// the server-assigned identifier and timestamp.
    async fn insert_service_request(
        &self,
        request: &NewServiceRequest,
    ) -> BackendResult<ServiceRequest>;

    /// All requests owned by `user_id`, newest first.
    async fn list_service_requests(&self, user_id: &str) -> BackendResult<Vec<ServiceRequest>>;

    async fn get_service_request(&self, id: &str) -> BackendResult<Option<ServiceRequest>>;

    // --- profiles ---

    /// Batch-fetches the profiles matching `ids`. Missing rows are simply
    /// absent from the result; that is not an error.
    async fn get_profiles(&self, ids: &[String]) -> BackendResult<Vec<Profile>>;

    async fn upsert_profile(&self, update: &ProfileUpdate) -> BackendResult<()>;

    // --- project_discussions ---

    /// All comments for `project_id`, oldest first.
    async fn list_comments(&self, project_id: &str) -> BackendResult<Vec<DiscussionComment>>;

    async fn insert_comment(&self, comment: &NewComment) -> BackendResult<DiscussionComment>;

    // --- leads ---

    async fn insert_lead(&self, lead: &NewLead) -> BackendResult<()>;
}
