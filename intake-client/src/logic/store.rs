//! Local complaint store
//!
//! Complaints submitted from this machine are kept in a single JSON array
//! file. Writes go to a temp file first and are renamed into place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

use intake_core::{ClassifierVerdict, ComplaintStatus, ComplaintSubmission};

use crate::constants::STORE_FILE_NAME;

/// Who filed the complaint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reporter {
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

/// Stored complaint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintRecord {
    pub id: String,
    #[serde(flatten)]
    pub reporter: Reporter,
    #[serde(flatten)]
    pub submission: ComplaintSubmission,
    pub created_at: DateTime<Utc>,
    pub status: ComplaintStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml_result: Option<ClassifierVerdict>,
}

impl ComplaintRecord {
    pub fn new(reporter: Reporter, submission: ComplaintSubmission) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            reporter,
            submission,
            created_at: Utc::now(),
            status: ComplaintStatus::Analyzing,
            ml_result: None,
        }
    }

    pub fn mark_analyzed(&mut self, verdict: ClassifierVerdict) {
        self.ml_result = Some(verdict);
        self.status = ComplaintStatus::Analyzed;
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("complaint store {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// JSON-file complaint store
pub struct ComplaintStore {
    file_path: PathBuf,
}

impl ComplaintStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            file_path: data_dir.as_ref().join(STORE_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// All stored complaints, oldest first. A missing file is an empty store.
    pub fn load(&self) -> Result<Vec<ComplaintRecord>, StoreError> {
        let content = match fs::read_to_string(&self.file_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(&self.file_path, e)),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: self.file_path.clone(),
            source,
        })
    }

    /// Append a complaint, keeping every earlier record.
    pub fn append(&self, record: &ComplaintRecord) -> Result<(), StoreError> {
        let mut records = self.load()?;
        records.push(record.clone());
        self.save(&records)
    }

    pub fn find(&self, id: &str) -> Result<Option<ComplaintRecord>, StoreError> {
        Ok(self.load()?.into_iter().find(|r| r.id == id))
    }

    fn save(&self, records: &[ComplaintRecord]) -> Result<(), StoreError> {
        if let Some(dir) = self.file_path.parent() {
            fs::create_dir_all(dir).map_err(|e| self.io_error(dir, e))?;
        }

        let json = serde_json::to_string_pretty(records).map_err(|source| StoreError::Corrupt {
            path: self.file_path.clone(),
            source,
        })?;

        let tmp_path = self.file_path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(|e| self.io_error(&tmp_path, e))?;
        fs::rename(&tmp_path, &self.file_path).map_err(|e| self.io_error(&self.file_path, e))?;

        log::debug!("Saved {} complaint(s) to {}", records.len(), self.file_path.display());
        Ok(())
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::ComplaintType;

    fn reporter() -> Reporter {
        Reporter {
            full_name: "Nisha Verma".to_string(),
            email: "nisha@example.org".to_string(),
            phone: "9876543210".to_string(),
        }
    }

    fn verdict() -> ClassifierVerdict {
        ClassifierVerdict {
            is_threat: true,
            category: "Identity Theft".to_string(),
            confidence: 0.85,
            analyzed_at: Utc::now(),
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ComplaintStore::new(dir.path().join("not-created-yet"));
        assert!(store.load().unwrap().is_empty());
        assert!(store.find("anything").unwrap().is_none());
    }

    #[test]
    fn test_append_keeps_earlier_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = ComplaintStore::new(dir.path());

        let first = ComplaintRecord::new(reporter(), ComplaintSubmission::new(ComplaintType::IdentityTheft, "PAN misuse", "Loan taken in my name"));
        let mut second = ComplaintRecord::new(reporter(), ComplaintSubmission::new(ComplaintType::Phishing, "Fake KYC", "SMS link"));
        second.mark_analyzed(verdict());

        store.append(&first).unwrap();
        store.append(&second).unwrap();

        let records = store.load().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], first);
        assert_eq!(records[1], second);
        assert_eq!(store.find(&second.id).unwrap().unwrap().status, ComplaintStatus::Analyzed);
    }

    #[test]
    fn test_record_json_shape() {
        let mut record = ComplaintRecord::new(reporter(), ComplaintSubmission::new(ComplaintType::Ransomware, "Locked", "Files encrypted"));
        assert_eq!(record.status, ComplaintStatus::Analyzing);
        record.mark_analyzed(verdict());

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["fullName"], "Nisha Verma");
        assert_eq!(value["complaintType"], "Ransomware");
        assert_eq!(value["status"], "analyzed");
        assert_eq!(value["mlResult"]["isThreat"], true);
    }

    #[test]
    fn test_corrupt_file_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = ComplaintStore::new(dir.path());
        fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(store.load(), Err(StoreError::Corrupt { .. })));
    }
}
