//! Complaint Intake - shared classification workflow
//!
//! Used by both the API server and the command-line client so that a
//! complaint is classified the same way regardless of where it is submitted.
//!
//! # Flow
//!
//! ```text
//! ComplaintSubmission
//!        │
//!        ▼
//! ┌────────────────┐     ┌────────────────────┐
//! │ Payload Builder│────▶│ Classifier Gateway │── 2xx ──▶ Classified(gateway)
//! └────────────────┘     └─────────┬──────────┘
//!                                  │ ClassifierUnavailable
//!                                  ▼
//!                        ┌────────────────────┐
//!                        │  Fallback Policy   │────────▶ Classified(fallback)
//!                        └────────────────────┘
//! ```

pub mod classifier;
pub mod complaint;
pub mod fallback;
pub mod gateway;
pub mod request;
pub mod verdict;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use classifier::ComplaintClassifier;
pub use complaint::{ComplaintStatus, ComplaintSubmission, ComplaintType, DeviceInfo, KNOWN_THREAT_CATEGORIES};
pub use fallback::{fallback_verdict, FALLBACK_CONFIDENCE};
pub use gateway::{
    ClassifierConfig, ClassifierGateway, ClassifierUnavailable, GatewaySetupError,
    DEFAULT_CLASSIFIER_TIMEOUT_SECS, DEFAULT_CLASSIFIER_URL,
};
pub use request::ClassifierRequest;
pub use verdict::{Classification, ClassifierVerdict, VerdictSource, UNKNOWN_CATEGORY};
