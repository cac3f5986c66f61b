//! Complaint handlers

use axum::{extract::{rejection::JsonRejection, State, Path}, Json};
use uuid::Uuid;

use intake_core::{ComplaintStatus, ComplaintSubmission};

use crate::{AppState, AppResult, AppError};
use crate::models::{ComplaintReceipt, SubmitComplaintResponse};

/// Classify a complaint. Classifier outages are absorbed by the fallback
/// policy, so this never fails because of the classifier. Only a body that
/// is not a JSON object is refused.
pub async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<ComplaintSubmission>, JsonRejection>,
) -> AppResult<Json<SubmitComplaintResponse>> {
    let Json(submission) = payload?;
    let classification = state.classifier.assess(&submission).await;
    let id = Uuid::new_v4();

    tracing::info!(
        complaint_id = %id,
        complaint_type = %submission.complaint_type,
        source = %classification.source(),
        is_threat = classification.verdict().is_threat,
        "Complaint analyzed"
    );

    Ok(Json(SubmitComplaintResponse {
        success: true,
        complaint: ComplaintReceipt {
            id,
            status: ComplaintStatus::Analyzed,
        },
        ml_result: classification.into_verdict(),
    }))
}

/// Complaints live in the submitting client's local store
pub async fn get(Path(_id): Path<String>) -> AppResult<Json<SubmitComplaintResponse>> {
    Err(AppError::NotFound(
        "Complaints are stored by the submitting client. Retrieve them from the client's local store.".to_string(),
    ))
}
