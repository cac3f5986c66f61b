//! Complaint submission from this machine
//!
//! Local mode classifies through the shared workflow directly against the
//! classifier endpoint; remote mode lets the intake server do it. Either way
//! the analyzed record ends up in the local store.

use intake_core::{ComplaintClassifier, ComplaintSubmission};
use thiserror::Error;

use crate::logic::api_client::{ApiError, IntakeApiClient};
use crate::logic::store::{ComplaintRecord, ComplaintStore, Reporter, StoreError};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Classify locally and store the record
pub async fn submit_local(
    classifier: &ComplaintClassifier,
    store: &ComplaintStore,
    reporter: Reporter,
    submission: ComplaintSubmission,
) -> Result<ComplaintRecord, SubmitError> {
    let mut record = ComplaintRecord::new(reporter, submission);

    let classification = classifier.assess(&record.submission).await;
    log::info!(
        "Complaint {} analyzed via {} (threat: {})",
        record.id,
        classification.source(),
        classification.verdict().is_threat
    );

    record.mark_analyzed(classification.into_verdict());
    store.append(&record)?;
    Ok(record)
}

/// Have the intake server classify, then store the record under the server's id
pub async fn submit_remote(
    api: &IntakeApiClient,
    store: &ComplaintStore,
    reporter: Reporter,
    submission: ComplaintSubmission,
) -> Result<ComplaintRecord, SubmitError> {
    let response = api.submit_complaint(&reporter, &submission).await?;

    let mut record = ComplaintRecord::new(reporter, submission);
    record.id = response.complaint.id;
    record.mark_analyzed(response.ml_result);

    log::info!("Complaint {} analyzed by {}", record.id, api.server_url());

    store.append(&record)?;
    Ok(record)
}
