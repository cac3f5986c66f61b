//! Complaint classification workflow
//!
//! Builds the classifier payload, calls the gateway once, and substitutes the
//! fallback verdict when the classifier is unavailable. Callers always get a
//! verdict; classifier failures never escape this module.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::complaint::ComplaintSubmission;
use crate::fallback::fallback_verdict;
use crate::gateway::{ClassifierConfig, ClassifierGateway, GatewaySetupError};
use crate::request::ClassifierRequest;
use crate::verdict::{Classification, ClassifierVerdict};

/// Shared entry point for server and client call sites.
#[derive(Debug)]
pub struct ComplaintClassifier {
    gateway: ClassifierGateway,
    fallbacks: AtomicU64,
}

impl ComplaintClassifier {
    pub fn new(config: ClassifierConfig) -> Result<Self, GatewaySetupError> {
        Ok(Self {
            gateway: ClassifierGateway::new(config)?,
            fallbacks: AtomicU64::new(0),
        })
    }

    pub fn endpoint(&self) -> &str {
        self.gateway.endpoint()
    }

    /// Number of verdicts produced by the fallback policy since startup.
    pub fn fallback_count(&self) -> u64 {
        self.fallbacks.load(Ordering::Relaxed)
    }

    /// Classify a submission, reporting which path produced the verdict.
    pub async fn assess(&self, submission: &ComplaintSubmission) -> Classification {
        let request = ClassifierRequest::from_submission(submission);

        match self.gateway.send(&request).await {
            Ok(verdict) => Classification::Gateway(verdict),
            Err(reason) => {
                let total = self.fallbacks.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::warn!(
                    endpoint = %self.gateway.endpoint(),
                    complaint_type = %submission.complaint_type,
                    reason = %reason,
                    fallback_total = total,
                    "Classifier unavailable, using fallback verdict"
                );
                Classification::Fallback(fallback_verdict(&submission.complaint_type))
            }
        }
    }

    /// Classify a submission.
    pub async fn classify(&self, submission: &ComplaintSubmission) -> ClassifierVerdict {
        self.assess(submission).await.into_verdict()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complaint::ComplaintType;
    use crate::test_support::{closed_endpoint, spawn_classifier, spawn_echo_classifier};
    use crate::verdict::VerdictSource;
    use axum::http::StatusCode;
    use serde_json::json;
    use std::time::Duration;

    fn classifier(endpoint: String) -> ComplaintClassifier {
        ComplaintClassifier::new(ClassifierConfig::new(endpoint, Duration::from_secs(5))).unwrap()
    }

    #[tokio::test]
    async fn test_gateway_verdict_for_phishing() {
        let endpoint = spawn_classifier(StatusCode::OK, r#"{"is_threat": true, "category": "phishing", "confidence": 0.92}"#).await;
        let classifier = classifier(endpoint);
        let submission = ComplaintSubmission::new(ComplaintType::Phishing, "Bank SMS", "OTP requested");

        let classification = classifier.assess(&submission).await;
        assert_eq!(classification.source(), VerdictSource::Gateway);

        let verdict = classification.verdict();
        assert!(verdict.is_threat);
        assert_eq!(verdict.category, "phishing");
        assert_eq!(verdict.confidence, 0.92);
        assert_eq!(classifier.fallback_count(), 0);
    }

    #[tokio::test]
    async fn test_server_error_falls_back_for_online_fraud() {
        let endpoint = spawn_classifier(StatusCode::INTERNAL_SERVER_ERROR, "{}").await;
        let classifier = classifier(endpoint);
        let submission = ComplaintSubmission::new(ComplaintType::OnlineFraud, "Marketplace scam", "Paid, never shipped");

        let classification = classifier.assess(&submission).await;
        assert_eq!(classification.source(), VerdictSource::Fallback);

        let verdict = classification.into_verdict();
        assert!(!verdict.is_threat);
        assert_eq!(verdict.category, "Online Fraud");
        assert_eq!(verdict.confidence, 0.85);
        assert_eq!(classifier.fallback_count(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_ransomware_is_threat() {
        let classifier = classifier(closed_endpoint().await);
        let submission = ComplaintSubmission::new(ComplaintType::Ransomware, "Files locked", "Note demands BTC");

        let verdict = classifier.classify(&submission).await;
        assert!(verdict.is_threat);
        assert_eq!(verdict.category, "Ransomware");
        assert_eq!(verdict.confidence, 0.85);
    }

    #[tokio::test]
    async fn test_unreachable_unlisted_type_is_not_threat() {
        let classifier = classifier(closed_endpoint().await);
        let submission = ComplaintSubmission::new(ComplaintType::from_label("Crypto Scam"), "Wallet drained", "");

        let verdict = classifier.classify(&submission).await;
        assert!(!verdict.is_threat);
        assert_eq!(verdict.category, "Crypto Scam");
    }

    #[tokio::test]
    async fn test_same_response_gives_same_decision() {
        let endpoint = spawn_classifier(StatusCode::OK, r#"{"isThreat": false, "category": "fraud", "confidence": 0.4}"#).await;
        let classifier = classifier(endpoint);
        let submission = ComplaintSubmission::new(ComplaintType::OnlineFraud, "Fake shop", "No delivery");

        let first = classifier.classify(&submission).await;
        let second = classifier.classify(&submission).await;
        assert!(first.same_decision(&second));
        assert!(second.analyzed_at >= first.analyzed_at);
    }

    #[tokio::test]
    async fn test_payload_reaches_classifier() {
        let (endpoint, received) = spawn_echo_classifier().await;
        let classifier = classifier(endpoint);

        let mut device = crate::complaint::DeviceInfo::new();
        device.insert("timezone".to_string(), json!("Asia/Kolkata"));
        let submission = ComplaintSubmission::new(ComplaintType::DataBreach, "Dump found", "Emails + hashes")
            .with_device_info(device)
            .with_file_path("leak.pcap");

        let verdict = classifier.classify(&submission).await;
        assert_eq!(verdict.category, "Data Breach");

        let body = received.lock().unwrap().clone().unwrap();
        assert_eq!(body["complaint_type"], json!("Data Breach"));
        assert_eq!(body["device_info"]["timezone"], json!("Asia/Kolkata"));
        assert_eq!(body["file_path"], json!("leak.pcap"));
    }
}
