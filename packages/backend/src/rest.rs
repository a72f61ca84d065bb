//! HTTP implementation of [`Backend`] against the hosted backend's
//! PostgREST/GoTrue-style API surface.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use std::time::Duration;
use tracing::debug;

use mindtoweb_core::{
    DiscussionComment, NewComment, NewLead, NewServiceRequest, Profile, ProfileUpdate,
    ServiceRequest,
};

use crate::auth::{AuthUser, SignUpRequest};
use crate::backend::{
    Backend, DISCUSSIONS_TABLE, LEADS_TABLE, PROFILES_TABLE, SERVICE_REQUESTS_TABLE,
};
use crate::config::BackendConfig;
use crate::error::{BackendError, BackendResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Hosted-backend client speaking the REST surface directly.
pub struct RestBackend {
    http: Client,
    project_url: String,
    anon_key: String,
    access_token: RwLock<Option<String>>,
}

/// GoTrue sign-up responses carry either a session (with the user nested)
/// or the bare user record, depending on confirmation settings.
#[derive(Debug, Deserialize)]
struct SignUpResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    user: Option<AuthUser>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl RestBackend {
    pub fn new(config: &BackendConfig) -> BackendResult<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Ok(Self {
            http,
            project_url: config.project_url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            access_token: RwLock::new(None),
        })
    }

    /// Adopt an access token obtained out of band (e.g. a restored session).
    pub fn set_access_token(&self, token: impl Into<String>) {
        *self.access_token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.into());
    }

    fn token(&self) -> Option<String> {
        self.access_token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn clear_token(&self) {
        *self.access_token.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    fn auth_header(&self) -> String {
        match self.token() {
            Some(token) => format!("Bearer {}", token),
            None => format!("Bearer {}", self.anon_key),
        }
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.project_url, table)
    }

    fn auth_url(&self, endpoint: &str) -> String {
        format!("{}/auth/v1/{}", self.project_url, endpoint)
    }

    fn with_headers(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .header("Authorization", self.auth_header())
    }

    /// Runs a filtered select and deserializes the row array.
    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> BackendResult<Vec<T>> {
        let response = self
            .with_headers(self.http.get(self.rest_url(table)))
            .query(query)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json::<Vec<T>>().await?),
            StatusCode::UNAUTHORIZED => {
                Err(BackendError::auth("Invalid or expired token"))
            }
            status => {
                let error_text = response.text().await.unwrap_or_else(|_| status.to_string());
                Err(BackendError::api(error_text))
            }
        }
    }

    /// Inserts a row and returns the created representation.
    async fn insert_returning<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> BackendResult<T> {
        let response = self
            .with_headers(self.http.post(self.rest_url(table)))
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED | StatusCode::OK => {
                let mut rows: Vec<T> = response.json().await?;
                if rows.is_empty() {
                    Err(BackendError::api("Insert returned no row"))
                } else {
                    Ok(rows.remove(0))
                }
            }
            StatusCode::UNAUTHORIZED => {
                Err(BackendError::auth("Invalid or expired token"))
            }
            status => {
                let error_text = response.text().await.unwrap_or_else(|_| status.to_string());
                Err(BackendError::api(error_text))
            }
        }
    }

    /// Inserts a row without asking for the representation back.
    async fn insert_only<B: Serialize>(&self, table: &str, body: &B) -> BackendResult<()> {
        let response = self
            .with_headers(self.http.post(self.rest_url(table)))
            .json(body)
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED | StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            StatusCode::UNAUTHORIZED => {
                Err(BackendError::auth("Invalid or expired token"))
            }
            status => {
                let error_text = response.text().await.unwrap_or_else(|_| status.to_string());
                Err(BackendError::api(error_text))
            }
        }
    }
}

#[async_trait]
impl Backend for RestBackend {
    async fn current_user(&self) -> BackendResult<Option<AuthUser>> {
        let Some(token) = self.token() else {
            return Ok(None);
        };

        let response = self
            .http
            .get(self.auth_url("user"))
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(Some(response.json::<AuthUser>().await?)),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status => {
                let error_text = response.text().await.unwrap_or_else(|_| status.to_string());
                Err(BackendError::api(error_text))
            }
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> BackendResult<AuthUser> {
        let request = SignUpRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self
            .http
            .post(self.auth_url("signup"))
            .header("apikey", &self.anon_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::auth(format!(
                "Sign up failed: {}",
                response.status()
            )));
        }

        let body: SignUpResponse = response.json().await?;
        if let Some(token) = body.access_token {
            self.set_access_token(token);
        }

        let user = match body.user {
            Some(user) => user,
            None => match (body.id, body.email) {
                (Some(id), Some(email)) => AuthUser { id, email },
                _ => return Err(BackendError::api("Sign up response carried no user")),
            },
        };

        debug!(user_id = %user.id, "signed up new account");
        Ok(user)
    }

    async fn sign_out(&self) -> BackendResult<()> {
        let token = self.token();
        // The local session ends no matter what the server says.
        self.clear_token();

        if let Some(token) = token {
            let response = self
                .http
                .post(self.auth_url("logout"))
                .header("apikey", &self.anon_key)
                .header("Authorization", format!("Bearer {}", token))
                .send()
                .await?;

            if !response.status().is_success() && response.status() != StatusCode::UNAUTHORIZED {
                return Err(BackendError::api(format!(
                    "Sign out failed: {}",
                    response.status()
                )));
            }
        }

        Ok(())
    }

    async fn insert_service_request(
        &self,
        request: &NewServiceRequest,
    ) -> BackendResult<ServiceRequest> {
        let created: ServiceRequest = self
            .insert_returning(SERVICE_REQUESTS_TABLE, request)
            .await?;
        debug!(id = %created.id, "inserted service request");
        Ok(created)
    }

    async fn list_service_requests(&self, user_id: &str) -> BackendResult<Vec<ServiceRequest>> {
        self.select(
            SERVICE_REQUESTS_TABLE,
            &[
                ("user_id", format!("eq.{}", user_id)),
                ("order", "created_at.desc".to_string()),
            ],
        )
        .await
    }

    async fn get_service_request(&self, id: &str) -> BackendResult<Option<ServiceRequest>> {
        let rows: Vec<ServiceRequest> = self
            .select(SERVICE_REQUESTS_TABLE, &[("id", format!("eq.{}", id))])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn get_profiles(&self, ids: &[String]) -> BackendResult<Vec<Profile>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.select(
            PROFILES_TABLE,
            &[("id", format!("in.({})", ids.join(",")))],
        )
        .await
    }

    async fn upsert_profile(&self, update: &ProfileUpdate) -> BackendResult<()> {
        let response = self
            .with_headers(self.http.post(self.rest_url(PROFILES_TABLE)))
            .header("Prefer", "resolution=merge-duplicates")
            .json(update)
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED | StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            StatusCode::UNAUTHORIZED => Err(BackendError::auth("Invalid or expired token")),
            status => {
                let error_text = response.text().await.unwrap_or_else(|_| status.to_string());
                Err(BackendError::api(error_text))
            }
        }
    }

    async fn list_comments(&self, project_id: &str) -> BackendResult<Vec<DiscussionComment>> {
        self.select(
            DISCUSSIONS_TABLE,
            &[
                ("project_id", format!("eq.{}", project_id)),
                ("order", "created_at.asc".to_string()),
            ],
        )
        .await
    }

    async fn insert_comment(&self, comment: &NewComment) -> BackendResult<DiscussionComment> {
        self.insert_returning(DISCUSSIONS_TABLE, comment).await
    }

    async fn insert_lead(&self, lead: &NewLead) -> BackendResult<()> {
        self.insert_only(LEADS_TABLE, lead).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindtoweb_core::{BudgetRange, ProjectTimeline, RequestStatus, ServiceType, UrgencyLevel};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend_for(server: &MockServer) -> RestBackend {
        RestBackend::new(&BackendConfig::new(server.uri(), "anon-key")).unwrap()
    }

    fn request_row() -> serde_json::Value {
        json!({
            "id": "req-1",
            "user_id": "user-1",
            "project_title": "AI Shop",
            "business_name": "Acme",
            "industry": "",
            "website_url": "",
            "service_type": "Website Development",
            "budget_range": "$500 - $1,500",
            "expected_timeline": "1 month",
            "urgency_level": "Medium",
            "description": "Need a shop site",
            "goals": "",
            "target_audience": "",
            "key_features": "",
            "inspiration_links": "",
            "additional_notes": "",
            "status": "Pending Review",
            "created_at": "2026-08-01T12:00:00Z"
        })
    }

    #[tokio::test]
    async fn current_user_is_none_without_a_session() {
        let server = MockServer::start().await;
        let backend = backend_for(&server);
        assert_eq!(backend.current_user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn current_user_is_none_when_token_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let backend = backend_for(&server);
        backend.set_access_token("stale-token");
        assert_eq!(backend.current_user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn sign_up_with_a_session_response_stores_the_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "fresh-token",
                "user": { "id": "user-1", "email": "jo@acme.test" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "user-1",
                "email": "jo@acme.test"
            })))
            .mount(&server)
            .await;

        let backend = backend_for(&server);
        let user = backend.sign_up("jo@acme.test", "hunter2").await.unwrap();
        assert_eq!(user.id, "user-1");

        // The token from the session now authenticates user lookups.
        assert_eq!(backend.current_user().await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn sign_up_with_a_bare_user_response_leaves_no_session() {
        let server = MockServer::start().await;
        // Confirmation-required projects return the user record alone.
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "user-1",
                "email": "jo@acme.test"
            })))
            .mount(&server)
            .await;

        let backend = backend_for(&server);
        let user = backend.sign_up("jo@acme.test", "hunter2").await.unwrap();
        assert_eq!(user.email, "jo@acme.test");

        // No token was issued, so there is no session to resolve.
        assert_eq!(backend.current_user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn sign_out_clears_the_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/logout"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let backend = backend_for(&server);
        backend.set_access_token("live-token");
        backend.sign_out().await.unwrap();

        // The local session is gone without another auth round trip.
        assert_eq!(backend.current_user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn insert_service_request_returns_created_row() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/service_requests"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([request_row()])))
            .mount(&server)
            .await;

        let backend = backend_for(&server);
        let new_request = NewServiceRequest::new(
            "user-1",
            "AI Shop",
            "Acme",
            ServiceType::WebsiteDevelopment,
            BudgetRange::From500To1500,
            ProjectTimeline::OneMonth,
            UrgencyLevel::Medium,
            "Need a shop site",
        );

        let created = backend.insert_service_request(&new_request).await.unwrap();
        assert_eq!(created.id, "req-1");
        assert_eq!(created.status, RequestStatus::PendingReview);
    }

    #[tokio::test]
    async fn list_comments_parses_rows() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/project_discussions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": "c-1",
                    "project_id": "req-1",
                    "user_id": "user-1",
                    "content": "Hello",
                    "created_at": "2026-08-01T12:00:00Z"
                }
            ])))
            .mount(&server)
            .await;

        let backend = backend_for(&server);
        let comments = backend.list_comments("req-1").await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].content, "Hello");
    }

    #[tokio::test]
    async fn write_failures_surface_as_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/leads"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let backend = backend_for(&server);
        let lead = NewLead {
            name: "Jo".to_string(),
            email: "jo@example.com".to_string(),
            business_name: String::new(),
            message: "Hi".to_string(),
            budget_range: String::new(),
            timeline: String::new(),
            source: "chat_widget".to_string(),
        };

        let err = backend.insert_lead(&lead).await.unwrap_err();
        assert!(matches!(err, BackendError::Api(_)));
    }
}
