//! Classifier Gateway
//!
//! Single best-effort POST to the external classifier. Any failure is
//! reported as [`ClassifierUnavailable`]; there are no retries.

use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::request::ClassifierRequest;
use crate::verdict::{ClassifierVerdict, UNKNOWN_CATEGORY};

/// Classifier endpoint used when none is configured.
pub const DEFAULT_CLASSIFIER_URL: &str = "http://localhost:8000/api/predict";

/// Upper bound on one classifier call (connect + response body).
pub const DEFAULT_CLASSIFIER_TIMEOUT_SECS: u64 = 10;

/// Classifier endpoint configuration, fixed at startup.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

impl ClassifierConfig {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_CLASSIFIER_URL,
            Duration::from_secs(DEFAULT_CLASSIFIER_TIMEOUT_SECS),
        )
    }
}

/// Why the classifier could not produce a verdict.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifierUnavailable {
    #[error("network error: {0}")]
    Network(String),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("classifier responded with status {0}")]
    Status(u16),

    #[error("unreadable response body: {0}")]
    Body(String),
}

#[derive(Debug, Error)]
#[error("failed to build classifier HTTP client: {0}")]
pub struct GatewaySetupError(#[from] reqwest::Error);

/// Classifier reply. Both `is_threat` and `isThreat` are accepted; the
/// snake_case field wins when both are present.
#[derive(Debug, Default, Deserialize)]
struct GatewayReply {
    is_threat: Option<bool>,
    #[serde(rename = "isThreat")]
    is_threat_camel: Option<bool>,
    category: Option<String>,
    confidence: Option<f64>,
}

impl GatewayReply {
    fn into_verdict(self) -> ClassifierVerdict {
        let category = self
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());

        let reported = self.confidence.unwrap_or(0.0);
        let confidence = reported.clamp(0.0, 1.0);
        if confidence != reported {
            tracing::debug!(reported, confidence, "Classifier confidence out of range, clamped");
        }

        ClassifierVerdict {
            is_threat: self.is_threat.or(self.is_threat_camel).unwrap_or(false),
            category,
            confidence,
            analyzed_at: Utc::now(),
        }
    }
}

/// HTTP client bound to one classifier endpoint.
#[derive(Debug, Clone)]
pub struct ClassifierGateway {
    config: ClassifierConfig,
    http_client: reqwest::Client,
}

impl ClassifierGateway {
    pub fn new(config: ClassifierConfig) -> Result<Self, GatewaySetupError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self { config, http_client })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// POST the request once and normalize the reply.
    pub async fn send(&self, request: &ClassifierRequest) -> Result<ClassifierVerdict, ClassifierUnavailable> {
        let response = self
            .http_client
            .post(&self.config.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifierUnavailable::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;
        let reply: GatewayReply = serde_json::from_slice(&body)
            .map_err(|e| ClassifierUnavailable::Body(e.to_string()))?;

        tracing::debug!(
            endpoint = %self.config.endpoint,
            category = reply.category.as_deref().unwrap_or(UNKNOWN_CATEGORY),
            "Classifier replied"
        );

        Ok(reply.into_verdict())
    }

    fn transport_error(&self, err: reqwest::Error) -> ClassifierUnavailable {
        if err.is_timeout() {
            ClassifierUnavailable::Timeout(self.config.timeout)
        } else {
            ClassifierUnavailable::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complaint::{ComplaintSubmission, ComplaintType};
    use crate::test_support::{closed_endpoint, spawn_classifier, spawn_echo_classifier, spawn_slow_classifier};
    use axum::http::StatusCode;
    use serde_json::json;

    fn parse(body: serde_json::Value) -> ClassifierVerdict {
        serde_json::from_value::<GatewayReply>(body).unwrap().into_verdict()
    }

    fn gateway(endpoint: String) -> ClassifierGateway {
        ClassifierGateway::new(ClassifierConfig::new(endpoint, Duration::from_secs(5))).unwrap()
    }

    fn request() -> ClassifierRequest {
        ClassifierRequest::from(&ComplaintSubmission::new(ComplaintType::Phishing, "Fake invoice", "Clicked a link"))
    }

    #[test]
    fn test_reply_snake_case() {
        let verdict = parse(json!({ "is_threat": true, "category": "phishing", "confidence": 0.92 }));
        assert!(verdict.is_threat);
        assert_eq!(verdict.category, "phishing");
        assert_eq!(verdict.confidence, 0.92);
    }

    #[test]
    fn test_reply_camel_case() {
        let verdict = parse(json!({ "isThreat": true, "category": "pcap_analysis", "confidence": 0.9 }));
        assert!(verdict.is_threat);
        assert_eq!(verdict.category, "pcap_analysis");
    }

    #[test]
    fn test_reply_snake_case_takes_precedence() {
        let verdict = parse(json!({ "is_threat": false, "isThreat": true }));
        assert!(!verdict.is_threat);
    }

    #[test]
    fn test_reply_defaults() {
        let verdict = parse(json!({}));
        assert!(!verdict.is_threat);
        assert_eq!(verdict.category, UNKNOWN_CATEGORY);
        assert_eq!(verdict.confidence, 0.0);

        let verdict = parse(json!({ "is_threat": null, "category": null, "confidence": null }));
        assert!(!verdict.is_threat);
        assert_eq!(verdict.category, UNKNOWN_CATEGORY);
    }

    #[test]
    fn test_reply_blank_category_is_unknown() {
        assert_eq!(parse(json!({ "category": "  " })).category, UNKNOWN_CATEGORY);
    }

    #[test]
    fn test_reply_confidence_clamped() {
        assert_eq!(parse(json!({ "confidence": 1.7 })).confidence, 1.0);
        assert_eq!(parse(json!({ "confidence": -0.2 })).confidence, 0.0);
    }

    #[test]
    fn test_reply_confidence_in_range_kept_exactly() {
        assert_eq!(parse(json!({ "confidence": 0.42 })).confidence, 0.42);
        assert_eq!(parse(json!({ "confidence": 1.0 })).confidence, 1.0);
        assert_eq!(parse(json!({ "confidence": 0 })).confidence, 0.0);
    }

    #[test]
    fn test_reply_extra_fields_ignored() {
        let verdict = parse(json!({ "prediction": 1, "is_threat": true, "isThreat": true, "category": "pcap_analysis", "confidence": 0.9 }));
        assert!(verdict.is_threat);
    }

    #[tokio::test]
    async fn test_send_success() {
        let endpoint = spawn_classifier(StatusCode::OK, r#"{"is_threat": true, "category": "phishing", "confidence": 0.92}"#).await;

        let verdict = gateway(endpoint).send(&request()).await.unwrap();
        assert!(verdict.is_threat);
        assert_eq!(verdict.category, "phishing");
        assert_eq!(verdict.confidence, 0.92);
    }

    #[tokio::test]
    async fn test_send_posts_request_body() {
        let (endpoint, received) = spawn_echo_classifier().await;

        gateway(endpoint).send(&request()).await.unwrap();

        let body = received.lock().unwrap().clone().expect("classifier saw no request");
        assert_eq!(body, json!({
            "complaint_type": "Phishing",
            "description": "Clicked a link",
            "subject": "Fake invoice",
        }));
    }

    #[tokio::test]
    async fn test_send_server_error() {
        let endpoint = spawn_classifier(StatusCode::INTERNAL_SERVER_ERROR, r#"{"message": "Prediction failed"}"#).await;

        let err = gateway(endpoint).send(&request()).await.unwrap_err();
        assert_eq!(err, ClassifierUnavailable::Status(500));
    }

    #[tokio::test]
    async fn test_send_unparseable_body() {
        let endpoint = spawn_classifier(StatusCode::OK, "<html>maintenance</html>").await;

        let err = gateway(endpoint).send(&request()).await.unwrap_err();
        assert!(matches!(err, ClassifierUnavailable::Body(_)));
    }

    #[tokio::test]
    async fn test_send_non_object_body() {
        let endpoint = spawn_classifier(StatusCode::OK, "[true, \"phishing\"]").await;

        let err = gateway(endpoint).send(&request()).await.unwrap_err();
        assert!(matches!(err, ClassifierUnavailable::Body(_)));
    }

    #[tokio::test]
    async fn test_send_unreachable() {
        let err = gateway(closed_endpoint().await).send(&request()).await.unwrap_err();
        assert!(matches!(err, ClassifierUnavailable::Network(_)));
    }

    #[tokio::test]
    async fn test_send_times_out() {
        let endpoint = spawn_slow_classifier(Duration::from_secs(3)).await;
        let timeout = Duration::from_millis(200);
        let gateway = ClassifierGateway::new(ClassifierConfig::new(endpoint, timeout)).unwrap();

        let err = gateway.send(&request()).await.unwrap_err();
        assert_eq!(err, ClassifierUnavailable::Timeout(timeout));
    }
}
