//! In-memory [`Backend`] used by tests and local development.
//!
//! Behaves like the hosted backend at the contract level: server-assigned
//! identifiers and timestamps, owner-scoped listing with the same sort
//! orders, and change-feed publication on comment inserts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use uuid::Uuid;

use mindtoweb_core::{
    BudgetRange, DiscussionComment, Lead, NewComment, NewLead, NewServiceRequest, Profile,
    ProfileUpdate, ProjectTimeline, RequestStatus, ServiceRequest, ServiceType, UrgencyLevel,
};

use crate::auth::AuthUser;
use crate::backend::{Backend, DISCUSSIONS_TABLE};
use crate::error::{BackendError, BackendResult};
use crate::feed::{ChangeEvent, ChannelChangeFeed};

#[derive(Default)]
struct State {
    current_user: Option<AuthUser>,
    service_requests: Vec<ServiceRequest>,
    profiles: Vec<Profile>,
    comments: Vec<DiscussionComment>,
    leads: Vec<Lead>,
    fail_writes: bool,
}

pub struct InMemoryBackend {
    state: Mutex<State>,
    feed: ChannelChangeFeed,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            feed: ChannelChangeFeed::new(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The change-feed hub this backend publishes comment inserts to.
    pub fn feed(&self) -> ChannelChangeFeed {
        self.feed.clone()
    }

    pub fn set_current_user(&self, user: Option<AuthUser>) {
        self.lock().current_user = user;
    }

    /// Makes every subsequent write fail, for failure-path tests.
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Seeds a comment row directly, bypassing the change feed.
    pub fn seed_comment(
        &self,
        project_id: &str,
        user_id: &str,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> DiscussionComment {
        let comment = DiscussionComment {
            id: Uuid::new_v4().to_string(),
            project_id: project_id.to_string(),
            user_id: user_id.to_string(),
            content: content.to_string(),
            created_at,
        };
        self.lock().comments.push(comment.clone());
        comment
    }

    /// Seeds a service request row directly with a fixed timestamp.
    pub fn seed_service_request(
        &self,
        user_id: &str,
        project_title: &str,
        created_at: DateTime<Utc>,
    ) -> ServiceRequest {
        let row = ServiceRequest {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            project_title: project_title.to_string(),
            business_name: String::new(),
            industry: String::new(),
            website_url: String::new(),
            service_type: ServiceType::WebsiteDevelopment,
            budget_range: BudgetRange::Under500,
            expected_timeline: ProjectTimeline::Flexible,
            urgency_level: UrgencyLevel::Low,
            description: String::new(),
            goals: String::new(),
            target_audience: String::new(),
            key_features: String::new(),
            inspiration_links: String::new(),
            additional_notes: String::new(),
            status: RequestStatus::default(),
            created_at,
        };
        self.lock().service_requests.push(row.clone());
        row
    }

    pub fn seed_profile(&self, profile: Profile) {
        let mut state = self.lock();
        state.profiles.retain(|p| p.id != profile.id);
        state.profiles.push(profile);
    }

    /// Snapshot of every stored service request, insertion order.
    pub fn service_requests(&self) -> Vec<ServiceRequest> {
        self.lock().service_requests.clone()
    }

    pub fn leads(&self) -> Vec<Lead> {
        self.lock().leads.clone()
    }

    pub fn comment_count(&self) -> usize {
        self.lock().comments.len()
    }

    pub fn profiles(&self) -> Vec<Profile> {
        self.lock().profiles.clone()
    }

    fn check_writable(state: &State) -> BackendResult<()> {
        if state.fail_writes {
            Err(BackendError::api("simulated write failure"))
        } else {
            Ok(())
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn current_user(&self) -> BackendResult<Option<AuthUser>> {
        Ok(self.lock().current_user.clone())
    }

    async fn sign_up(&self, email: &str, _password: &str) -> BackendResult<AuthUser> {
        let user = AuthUser {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
        };
        self.lock().current_user = Some(user.clone());
        Ok(user)
    }

    async fn sign_out(&self) -> BackendResult<()> {
        self.lock().current_user = None;
        Ok(())
    }

    async fn insert_service_request(
        &self,
        request: &NewServiceRequest,
    ) -> BackendResult<ServiceRequest> {
        let mut state = self.lock();
        Self::check_writable(&state)?;

        let row = ServiceRequest {
            id: Uuid::new_v4().to_string(),
            user_id: request.user_id.clone(),
            project_title: request.project_title.clone(),
            business_name: request.business_name.clone(),
            industry: request.industry.clone(),
            website_url: request.website_url.clone(),
            service_type: request.service_type.clone(),
            budget_range: request.budget_range.clone(),
            expected_timeline: request.expected_timeline.clone(),
            urgency_level: request.urgency_level,
            description: request.description.clone(),
            goals: request.goals.clone(),
            target_audience: request.target_audience.clone(),
            key_features: request.key_features.clone(),
            inspiration_links: request.inspiration_links.clone(),
            additional_notes: request.additional_notes.clone(),
            status: request.status().clone(),
            created_at: Utc::now(),
        };
        state.service_requests.push(row.clone());
        Ok(row)
    }

    async fn list_service_requests(&self, user_id: &str) -> BackendResult<Vec<ServiceRequest>> {
        let mut rows: Vec<ServiceRequest> = self
            .lock()
            .service_requests
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn get_service_request(&self, id: &str) -> BackendResult<Option<ServiceRequest>> {
        Ok(self
            .lock()
            .service_requests
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn get_profiles(&self, ids: &[String]) -> BackendResult<Vec<Profile>> {
        Ok(self
            .lock()
            .profiles
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn upsert_profile(&self, update: &ProfileUpdate) -> BackendResult<()> {
        let mut state = self.lock();
        Self::check_writable(&state)?;

        let profile = Profile {
            id: update.id.clone(),
            full_name: update.full_name.clone(),
            business_name: update.business_name.clone(),
            avatar_url: state
                .profiles
                .iter()
                .find(|p| p.id == update.id)
                .and_then(|p| p.avatar_url.clone()),
            updated_at: Some(update.updated_at),
        };
        state.profiles.retain(|p| p.id != update.id);
        state.profiles.push(profile);
        Ok(())
    }

    async fn list_comments(&self, project_id: &str) -> BackendResult<Vec<DiscussionComment>> {
        let mut rows: Vec<DiscussionComment> = self
            .lock()
            .comments
            .iter()
            .filter(|c| c.project_id == project_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows)
    }

    async fn insert_comment(&self, comment: &NewComment) -> BackendResult<DiscussionComment> {
        let row = {
            let mut state = self.lock();
            Self::check_writable(&state)?;

            let row = DiscussionComment {
                id: Uuid::new_v4().to_string(),
                project_id: comment.project_id.clone(),
                user_id: comment.user_id.clone(),
                content: comment.content.clone(),
                created_at: Utc::now(),
            };
            state.comments.push(row.clone());
            row
        };

        self.feed.publish(ChangeEvent {
            table: DISCUSSIONS_TABLE.to_string(),
            event: crate::feed::EventKind::Insert,
            project_id: row.project_id.clone(),
            payload: serde_json::to_value(&row).ok(),
        });

        Ok(row)
    }

    async fn insert_lead(&self, lead: &NewLead) -> BackendResult<()> {
        let mut state = self.lock();
        Self::check_writable(&state)?;

        state.leads.push(Lead {
            id: Uuid::new_v4().to_string(),
            name: lead.name.clone(),
            email: lead.email.clone(),
            business_name: lead.business_name.clone(),
            message: lead.message.clone(),
            budget_range: lead.budget_range.clone(),
            timeline: lead.timeline.clone(),
            source: lead.source.clone(),
            created_at: Utc::now(),
        });
        Ok(())
    }
}
