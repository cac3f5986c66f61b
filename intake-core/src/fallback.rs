//! Rule-based verdict used while the classifier is unavailable

use chrono::Utc;

use crate::complaint::ComplaintType;
use crate::verdict::{ClassifierVerdict, UNKNOWN_CATEGORY};

/// Fixed confidence reported by the fallback policy.
pub const FALLBACK_CONFIDENCE: f64 = 0.85;

/// Deterministic verdict derived only from the complaint type.
pub fn fallback_verdict(complaint_type: &ComplaintType) -> ClassifierVerdict {
    let category = match complaint_type.label() {
        "" => UNKNOWN_CATEGORY.to_string(),
        label => label.to_string(),
    };

    ClassifierVerdict {
        is_threat: complaint_type.is_known_threat(),
        category,
        confidence: FALLBACK_CONFIDENCE,
        analyzed_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ransomware_is_threat() {
        let verdict = fallback_verdict(&ComplaintType::Ransomware);
        assert!(verdict.is_threat);
        assert_eq!(verdict.category, "Ransomware");
        assert_eq!(verdict.confidence, 0.85);
    }

    #[test]
    fn test_online_fraud_is_not_threat() {
        let verdict = fallback_verdict(&ComplaintType::OnlineFraud);
        assert!(!verdict.is_threat);
        assert_eq!(verdict.category, "Online Fraud");
        assert_eq!(verdict.confidence, FALLBACK_CONFIDENCE);
    }

    #[test]
    fn test_every_listed_type_keeps_its_label() {
        for complaint_type in ComplaintType::LISTED {
            let verdict = fallback_verdict(&complaint_type);
            assert_eq!(verdict.category, complaint_type.label());
            assert_eq!(verdict.is_threat, complaint_type.is_known_threat());
        }
    }

    #[test]
    fn test_empty_label_reports_unknown() {
        let verdict = fallback_verdict(&ComplaintType::Unlisted(String::new()));
        assert!(!verdict.is_threat);
        assert_eq!(verdict.category, UNKNOWN_CATEGORY);
    }
}
