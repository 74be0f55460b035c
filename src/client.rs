//! HTTP client for the Taskify backend.
//!
//! Every endpoint speaks JSON. A 2xx response yields the parsed body; any
//! other status yields [`ClientError::Api`] carrying the backend's `error`
//! field, or a per-operation fallback message when the body has none.
//! Calls are never retried and no client-side timeout is set.
//!
//! Configuration is via [`Config`](crate::Config) or the environment:
//! - `TASKIFY_API_URL` - Base URL (default: `http://127.0.0.1:8000`)

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::models::*;

/// Default URL for local development.
pub const DEFAULT_URL: &str = "http://127.0.0.1:8000";

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response. `message` is shown to the user as is.
    #[error("{message}")]
    Api { status: StatusCode, message: String },
}

impl ClientError {
    /// HTTP status of an API error.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http(e) => e.status(),
            Self::Api { status, .. } => Some(*status),
        }
    }
}

/// Error body shape shared by every endpoint.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// HTTP client for the Taskify backend.
#[derive(Debug, Clone)]
pub struct TaskifyClient {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl TaskifyClient {
    /// Create client from environment variables.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("TASKIFY_API_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
        Self::new(base_url)
    }

    /// Create with explicit base URL, without credentials.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            client: Client::new(),
        }
    }

    /// Attach the bearer token sent with protected endpoints.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Build a request without credentials.
    fn public_request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {}", method, url);
        self.client.request(method, &url)
    }

    /// Build a request with the bearer header, if a token is set.
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let req = self.public_request(method, path);
        match self.token {
            Some(ref token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Turn a non-2xx response into an [`ClientError::Api`].
    async fn api_error(response: reqwest::Response, fallback: &str) -> ClientError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string());
        tracing::warn!("Request failed with {}: {}", status, message);
        ClientError::Api { status, message }
    }

    /// Handle response, converting HTTP errors to ClientError.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<T, ClientError> {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(Self::api_error(response, fallback).await)
        }
    }

    /// Handle response whose success body carries nothing the client needs.
    async fn handle_empty_response(
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<(), ClientError> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::api_error(response, fallback).await)
        }
    }

    // ============================================================
    // Accounts
    // ============================================================

    /// Register a developer.
    pub async fn developer_signup(&self, input: &DeveloperSignup) -> Result<(), ClientError> {
        let response = self
            .public_request(Method::POST, "/api/developer/signup/")
            .json(input)
            .send()
            .await?;
        Self::handle_empty_response(response, "Signup failed. Please try again.").await
    }

    /// Register a manager.
    pub async fn manager_signup(&self, input: &ManagerSignup) -> Result<(), ClientError> {
        let response = self
            .public_request(Method::POST, "/api/manager/signup/")
            .json(input)
            .send()
            .await?;
        Self::handle_empty_response(response, "Signup failed. Please try again.").await
    }

    /// Log in with the endpoint of the given role.
    pub async fn login(
        &self,
        role: Role,
        input: &LoginRequest,
    ) -> Result<LoginResponse, ClientError> {
        let response = self
            .public_request(Method::POST, &format!("/api/{}/login/", role.as_str()))
            .json(input)
            .send()
            .await?;
        Self::handle_response(response, "Login failed").await
    }

    pub async fn developer_login(&self, input: &LoginRequest) -> Result<LoginResponse, ClientError> {
        self.login(Role::Developer, input).await
    }

    pub async fn manager_login(&self, input: &LoginRequest) -> Result<LoginResponse, ClientError> {
        self.login(Role::Manager, input).await
    }

    // ============================================================
    // Developers
    // ============================================================

    /// List developers available for team matching.
    pub async fn list_developers(&self) -> Result<Vec<Developer>, ClientError> {
        let response = self.request(Method::GET, "/api/developers/").send().await?;
        let list: DeveloperList =
            Self::handle_response(response, "Failed to fetch developers").await?;
        Ok(list.developers)
    }

    // ============================================================
    // Pipeline
    // ============================================================

    /// Submit a project idea and receive its generated analysis.
    pub async fn submit_idea(
        &self,
        project_id: &ProjectId,
        idea: &str,
        team_metadata: &TeamMetadata,
    ) -> Result<ProjectAnalysis, ClientError> {
        let response = self
            .request(Method::POST, "/api/submit-idea/")
            .json(&serde_json::json!({
                "project_id": project_id,
                "idea": idea,
                "team_metadata": team_metadata,
            }))
            .send()
            .await?;
        let body: SubmitIdeaResponse =
            Self::handle_response(response, "Failed to submit idea").await?;
        Ok(body.analysis)
    }

    /// Save an (edited) analysis.
    pub async fn save_analysis(
        &self,
        project_id: &ProjectId,
        analysis: &ProjectAnalysis,
    ) -> Result<(), ClientError> {
        let response = self
            .request(Method::POST, "/api/save-analysis/")
            .json(&serde_json::json!({
                "project_id": project_id,
                "analysis": analysis,
            }))
            .send()
            .await?;
        Self::handle_empty_response(response, "Failed to save analysis").await
    }

    /// Generate (or fetch) the epics and user stories of a project.
    pub async fn generate_epics(
        &self,
        project_id: &ProjectId,
    ) -> Result<EpicsAndStories, ClientError> {
        let response = self
            .request(Method::POST, "/api/epics/")
            .json(&serde_json::json!({ "project_id": project_id }))
            .send()
            .await?;
        let body: EpicsResponse = Self::handle_response(response, "Failed to fetch epics").await?;
        Ok(body.epics_stories)
    }

    /// Save (edited) epics and user stories.
    pub async fn save_epics(
        &self,
        project_id: &ProjectId,
        epics_stories: &EpicsAndStories,
    ) -> Result<(), ClientError> {
        let response = self
            .request(Method::POST, "/api/save-epics-features/")
            .json(&serde_json::json!({
                "project_id": project_id,
                "epics_stories": epics_stories,
            }))
            .send()
            .await?;
        Self::handle_empty_response(response, "Failed to save epics and features").await
    }

    /// Generate the team matching of a project, right after its epics were saved.
    ///
    /// The backend reads `project_id` from the query string; it is sent in
    /// the body as well.
    pub async fn generate_team_matching(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<Allocation>, ClientError> {
        self.team_matcher(project_id, "Failed to generate team matching")
            .await
    }

    /// Same endpoint, called when the team matching page opens on a project id.
    pub async fn fetch_team_matching(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<Allocation>, ClientError> {
        self.team_matcher(project_id, "Failed to fetch team matching")
            .await
    }

    async fn team_matcher(
        &self,
        project_id: &ProjectId,
        fallback: &str,
    ) -> Result<Vec<Allocation>, ClientError> {
        let response = self
            .request(Method::POST, "/api/team-matcher/")
            .query(&[("project_id", project_id.as_str())])
            .json(&serde_json::json!({ "project_id": project_id }))
            .send()
            .await?;
        let body: TeamMatchingResponse = Self::handle_response(response, fallback).await?;
        Ok(body.allocations)
    }

    /// Save (edited) allocations.
    pub async fn save_team_matching(
        &self,
        project_id: &ProjectId,
        allocations: &[Allocation],
    ) -> Result<(), ClientError> {
        let response = self
            .request(Method::POST, "/api/save-team-matching/")
            .json(&serde_json::json!({
                "project_id": project_id,
                "allocations": allocations,
            }))
            .send()
            .await?;
        Self::handle_empty_response(response, "Failed to save team matching").await
    }
}
