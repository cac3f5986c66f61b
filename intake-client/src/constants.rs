//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.

use std::path::PathBuf;

use intake_core::{DEFAULT_CLASSIFIER_TIMEOUT_SECS, DEFAULT_CLASSIFIER_URL};

/// Default intake API URL
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Default timeout for intake API calls (seconds)
pub const DEFAULT_API_TIMEOUT: u64 = 30;

/// Local complaint store file
pub const STORE_FILE_NAME: &str = "forensic_complaints.json";

/// Directory under the platform data dir
pub const DATA_DIR_NAME: &str = "complaint-intake";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "ComplaintIntake";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get intake API URL from environment or use default
pub fn get_api_url() -> String {
    std::env::var("INTAKE_API_URL")
        .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Get classifier endpoint from environment or use default
pub fn get_classifier_url() -> String {
    std::env::var("ML_API_URL")
        .unwrap_or_else(|_| DEFAULT_CLASSIFIER_URL.to_string())
}

/// Get classifier timeout from environment or use default
pub fn get_classifier_timeout() -> u64 {
    std::env::var("CLASSIFIER_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|t| *t > 0)
        .unwrap_or(DEFAULT_CLASSIFIER_TIMEOUT_SECS)
}

/// Get local data directory from environment or use the platform default
pub fn get_data_dir() -> PathBuf {
    std::env::var_os("INTAKE_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(DATA_DIR_NAME)
        })
}
