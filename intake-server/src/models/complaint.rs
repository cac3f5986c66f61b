//! Complaint submission responses

use serde::Serialize;
use uuid::Uuid;

use intake_core::{ClassifierVerdict, ComplaintStatus};

/// Receipt for an accepted complaint. Complaints are not persisted server-side.
#[derive(Debug, Serialize)]
pub struct ComplaintReceipt {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub status: ComplaintStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitComplaintResponse {
    pub success: bool,
    pub complaint: ComplaintReceipt,
    pub ml_result: ClassifierVerdict,
}
