//! Verdict records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category reported when the classifier omits one.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Canonical classification result returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierVerdict {
    pub is_threat: bool,
    pub category: String,
    /// Always within `[0, 1]`
    pub confidence: f64,
    pub analyzed_at: DateTime<Utc>,
}

impl ClassifierVerdict {
    /// Same verdict ignoring `analyzed_at`.
    pub fn same_decision(&self, other: &Self) -> bool {
        self.is_threat == other.is_threat
            && self.category == other.category
            && self.confidence == other.confidence
    }

    /// Confidence as a percentage with one decimal, e.g. `92.0%`.
    pub fn confidence_percent(&self) -> String {
        format!("{:.1}%", self.confidence * 100.0)
    }
}

/// Which path produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictSource {
    Gateway,
    Fallback,
}

impl fmt::Display for VerdictSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gateway => f.write_str("gateway"),
            Self::Fallback => f.write_str("fallback"),
        }
    }
}

/// Terminal state of the workflow. There is no way back to pending.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Gateway(ClassifierVerdict),
    Fallback(ClassifierVerdict),
}

impl Classification {
    pub fn source(&self) -> VerdictSource {
        match self {
            Self::Gateway(_) => VerdictSource::Gateway,
            Self::Fallback(_) => VerdictSource::Fallback,
        }
    }

    pub fn verdict(&self) -> &ClassifierVerdict {
        match self {
            Self::Gateway(verdict) | Self::Fallback(verdict) => verdict,
        }
    }

    pub fn into_verdict(self) -> ClassifierVerdict {
        match self {
            Self::Gateway(verdict) | Self::Fallback(verdict) => verdict,
        }
    }
}
