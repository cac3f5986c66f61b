//! Payload builder for the classifier endpoint

use serde::Serialize;

use crate::complaint::{ComplaintSubmission, DeviceInfo};

/// JSON body POSTed to the classifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifierRequest {
    pub complaint_type: String,
    pub description: String,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_info: Option<DeviceInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl ClassifierRequest {
    /// Project a submission onto the classifier contract. Fields are copied
    /// verbatim; nothing is trimmed or validated.
    pub fn from_submission(submission: &ComplaintSubmission) -> Self {
        Self {
            complaint_type: submission.complaint_type.label().to_string(),
            description: submission.description.clone(),
            subject: submission.subject.clone(),
            device_info: submission.device_info.clone(),
            file_path: submission.file_path.clone(),
        }
    }
}

impl From<&ComplaintSubmission> for ClassifierRequest {
    fn from(submission: &ComplaintSubmission) -> Self {
        Self::from_submission(submission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complaint::ComplaintType;
    use serde_json::json;

    #[test]
    fn test_fields_copied_verbatim() {
        let submission = ComplaintSubmission::new(
            ComplaintType::Phishing,
            "  Fake bank SMS ",
            "Link asked for my OTP\n",
        );

        let request = ClassifierRequest::from_submission(&submission);
        assert_eq!(request.complaint_type, "Phishing");
        assert_eq!(request.subject, "  Fake bank SMS ");
        assert_eq!(request.description, "Link asked for my OTP\n");
    }

    #[test]
    fn test_optional_fields_omitted_from_body() {
        let submission = ComplaintSubmission::new(ComplaintType::Other, "s", "d");
        let body = serde_json::to_value(ClassifierRequest::from(&submission)).unwrap();

        assert_eq!(body, json!({
            "complaint_type": "Other",
            "description": "d",
            "subject": "s",
        }));
    }

    #[test]
    fn test_device_info_and_file_path_forwarded() {
        let mut device = DeviceInfo::new();
        device.insert("language".to_string(), json!("en-IN"));
        device.insert("hardwareConcurrency".to_string(), json!(8));

        let submission = ComplaintSubmission::new(ComplaintType::Ransomware, "Files encrypted", "Ransom note on desktop")
            .with_device_info(device)
            .with_file_path("/srv/captures/host-17.pcap");

        let body = serde_json::to_value(ClassifierRequest::from(&submission)).unwrap();
        assert_eq!(body["device_info"]["language"], json!("en-IN"));
        assert_eq!(body["device_info"]["hardwareConcurrency"], json!(8));
        assert_eq!(body["file_path"], json!("/srv/captures/host-17.pcap"));
    }
}
