//! Intake API Client
//!
//! HTTP client for the complaint intake server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use intake_core::{ClassifierVerdict, ComplaintStatus, ComplaintSubmission};

use crate::logic::store::Reporter;

/// Intake server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub server_url: String,
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        use crate::constants;

        Self {
            server_url: constants::get_api_url(),
            timeout_seconds: constants::DEFAULT_API_TIMEOUT,
        }
    }
}

/// Intake API client
pub struct IntakeApiClient {
    config: ApiConfig,
    http_client: reqwest::Client,
}

// Request/Response types

/// Registration form; blank optional fields are not sent
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

impl ProfileRequest {
    /// Drop optional fields that are empty strings
    pub fn without_blanks(mut self) -> Self {
        for field in [
            &mut self.gender,
            &mut self.address,
            &mut self.city,
            &mut self.state,
            &mut self.occupation,
            &mut self.organization,
        ] {
            if field.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *field = None;
            }
        }
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub organization: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Result of a registration attempt
#[derive(Debug, Clone)]
pub enum ProfileOutcome {
    Created(ProfileView),
    /// Email was already registered; the stored profile is returned
    Existing(ProfileView),
}

impl ProfileOutcome {
    pub fn profile(&self) -> &ProfileView {
        match self {
            Self::Created(p) | Self::Existing(p) => p,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProfileEnvelope {
    profile: Option<ProfileView>,
    message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitComplaintRequest<'a> {
    #[serde(flatten)]
    reporter: &'a Reporter,
    #[serde(flatten)]
    submission: &'a ComplaintSubmission,
}

#[derive(Debug, Deserialize)]
pub struct ComplaintReceipt {
    #[serde(rename = "_id")]
    pub id: String,
    pub status: ComplaintStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitComplaintResponse {
    pub complaint: ComplaintReceipt,
    pub ml_result: ClassifierVerdict,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
    pub classifier_fallbacks: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

/// Intake client errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to build HTTP client: {0}")]
    Setup(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),
}

impl IntakeApiClient {
    /// Create new intake client
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ApiError::Setup(e.to_string()))?;

        Ok(Self { config, http_client })
    }

    pub fn server_url(&self) -> &str {
        &self.config.server_url
    }

    /// Check server health
    pub async fn health_check(&self) -> Result<HealthResponse, ApiError> {
        let url = format!("{}/api/health", self.config.server_url);

        let response = self.http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if response.status().is_success() {
            response.json().await
                .map_err(|e| ApiError::Parse(e.to_string()))
        } else {
            Err(server_error(response).await)
        }
    }

    /// Register a profile. A 409 is not an error: the existing profile is returned.
    pub async fn register_profile(&self, request: &ProfileRequest) -> Result<ProfileOutcome, ApiError> {
        let url = format!("{}/api/profiles", self.config.server_url);

        log::info!("Registering profile for {}", request.email);

        let response = self.http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() && status != reqwest::StatusCode::CONFLICT {
            return Err(server_error(response).await);
        }

        let envelope: ProfileEnvelope = response.json().await
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        let profile = envelope.profile.ok_or_else(|| {
            ApiError::Parse(envelope.message.unwrap_or_else(|| "response carried no profile".to_string()))
        })?;

        if status == reqwest::StatusCode::CONFLICT {
            log::info!("Profile already registered: {}", profile.id);
            Ok(ProfileOutcome::Existing(profile))
        } else {
            log::info!("Profile created: {}", profile.id);
            Ok(ProfileOutcome::Created(profile))
        }
    }

    /// Look up a profile by email; `None` when not registered
    pub async fn find_profile_by_email(&self, email: &str) -> Result<Option<ProfileView>, ApiError> {
        let url = self.profile_email_url(email)?;

        let response = self.http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(server_error(response).await);
        }

        let envelope: ProfileEnvelope = response.json().await
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        Ok(envelope.profile)
    }

    /// `/api/profiles/email/<email>` with the email percent-encoded as one segment
    fn profile_email_url(&self, email: &str) -> Result<reqwest::Url, ApiError> {
        let mut url = reqwest::Url::parse(&self.config.server_url)
            .map_err(|e| ApiError::Setup(format!("invalid server URL {}: {}", self.config.server_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| ApiError::Setup(format!("invalid server URL {}", self.config.server_url)))?
            .pop_if_empty()
            .extend(["api", "profiles", "email", email.trim()]);

        Ok(url)
    }

    /// Have the server classify a complaint
    pub async fn submit_complaint(
        &self,
        reporter: &Reporter,
        submission: &ComplaintSubmission,
    ) -> Result<SubmitComplaintResponse, ApiError> {
        let url = format!("{}/api/complaints", self.config.server_url);

        let response = self.http_client
            .post(&url)
            .json(&SubmitComplaintRequest { reporter, submission })
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if response.status().is_success() {
            response.json().await
                .map_err(|e| ApiError::Parse(e.to_string()))
        } else {
            Err(server_error(response).await)
        }
    }
}

async fn server_error(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&text)
        .map(|e| e.message)
        .unwrap_or(text);

    log::error!("Intake server error ({}): {}", status, message);
    ApiError::Server { status, message }
}
