//! Complaint submission model

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Device / environment fingerprint captured by the submitting client.
pub type DeviceInfo = serde_json::Map<String, serde_json::Value>;

/// Complaint types the fallback policy treats as high-risk.
pub const KNOWN_THREAT_CATEGORIES: [&str; 4] = [
    "Hacking / Unauthorized Access",
    "Ransomware",
    "Data Breach",
    "Identity Theft",
];

/// Complaint type selected on the intake form.
///
/// Labels outside the form's list are kept verbatim as [`ComplaintType::Unlisted`];
/// the workflow never rejects a submission because of its type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComplaintType {
    IdentityTheft,
    OnlineFraud,
    HackingUnauthorizedAccess,
    DataBreach,
    CyberstalkingHarassment,
    Phishing,
    Ransomware,
    IntellectualPropertyTheft,
    Other,
    Unlisted(String),
}

impl ComplaintType {
    /// Types offered by the intake form, in display order.
    pub const LISTED: [ComplaintType; 9] = [
        ComplaintType::IdentityTheft,
        ComplaintType::OnlineFraud,
        ComplaintType::HackingUnauthorizedAccess,
        ComplaintType::DataBreach,
        ComplaintType::CyberstalkingHarassment,
        ComplaintType::Phishing,
        ComplaintType::Ransomware,
        ComplaintType::IntellectualPropertyTheft,
        ComplaintType::Other,
    ];

    /// Parse a form label. Unknown labels are carried as-is.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Identity Theft" => Self::IdentityTheft,
            "Online Fraud" => Self::OnlineFraud,
            "Hacking / Unauthorized Access" => Self::HackingUnauthorizedAccess,
            "Data Breach" => Self::DataBreach,
            "Cyberstalking / Harassment" => Self::CyberstalkingHarassment,
            "Phishing" => Self::Phishing,
            "Ransomware" => Self::Ransomware,
            "Intellectual Property Theft" => Self::IntellectualPropertyTheft,
            "Other" => Self::Other,
            other => Self::Unlisted(other.to_string()),
        }
    }

    /// Label exactly as shown on the form and sent to the classifier.
    pub fn label(&self) -> &str {
        match self {
            Self::IdentityTheft => "Identity Theft",
            Self::OnlineFraud => "Online Fraud",
            Self::HackingUnauthorizedAccess => "Hacking / Unauthorized Access",
            Self::DataBreach => "Data Breach",
            Self::CyberstalkingHarassment => "Cyberstalking / Harassment",
            Self::Phishing => "Phishing",
            Self::Ransomware => "Ransomware",
            Self::IntellectualPropertyTheft => "Intellectual Property Theft",
            Self::Other => "Other",
            Self::Unlisted(label) => label,
        }
    }

    pub fn is_known_threat(&self) -> bool {
        KNOWN_THREAT_CATEGORIES.contains(&self.label())
    }
}

impl Default for ComplaintType {
    fn default() -> Self {
        Self::Unlisted(String::new())
    }
}

impl From<String> for ComplaintType {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<ComplaintType> for String {
    fn from(complaint_type: ComplaintType) -> Self {
        match complaint_type {
            ComplaintType::Unlisted(label) => label,
            listed => listed.label().to_string(),
        }
    }
}

impl fmt::Display for ComplaintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A complaint handed to the classification workflow.
///
/// Deserialization never fails on field content: missing or null text fields
/// become empty, and an incident date that is not a calendar date or an
/// RFC 3339 timestamp is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintSubmission {
    #[serde(default, deserialize_with = "lenient_complaint_type")]
    pub complaint_type: ComplaintType,
    #[serde(default, deserialize_with = "lenient_string")]
    pub subject: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_device_info", skip_serializing_if = "Option::is_none")]
    pub device_info: Option<DeviceInfo>,
    #[serde(default, deserialize_with = "lenient_date", skip_serializing_if = "Option::is_none")]
    pub incident_date: Option<NaiveDate>,
    /// Evidence capture path forwarded to the classifier (e.g. a pcap).
    #[serde(
        default,
        alias = "file_path",
        deserialize_with = "lenient_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub file_path: Option<String>,
}

fn text_of(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(text_of(Option::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_optional_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(text_of(Option::deserialize(deserializer)?).filter(|s| !s.trim().is_empty()))
}

fn lenient_complaint_type<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ComplaintType, D::Error> {
    Ok(ComplaintType::from_label(&lenient_string(deserializer)?))
}

fn lenient_device_info<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DeviceInfo>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Object(map)) => Ok(Some(map)),
        _ => Ok(None),
    }
}

fn lenient_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    let Some(raw) = lenient_optional_string(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();

    Ok(NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive())))
}

impl ComplaintSubmission {
    pub fn new(complaint_type: ComplaintType, subject: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            complaint_type,
            subject: subject.into(),
            description: description.into(),
            device_info: None,
            incident_date: None,
            file_path: None,
        }
    }

    pub fn with_device_info(mut self, device_info: DeviceInfo) -> Self {
        self.device_info = Some(device_info);
        self
    }

    pub fn with_incident_date(mut self, date: NaiveDate) -> Self {
        self.incident_date = Some(date);
        self
    }

    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }
}

/// Lifecycle of a stored complaint record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplaintStatus {
    Analyzing,
    Analyzed,
}

impl ComplaintStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Analyzing => "analyzing",
            Self::Analyzed => "analyzed",
        }
    }
}
