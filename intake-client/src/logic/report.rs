//! Terminal result view

use std::fmt::Write;

use intake_core::ClassifierVerdict;

use crate::logic::store::ComplaintRecord;

const RULE: &str = "============================================================";

/// Result view for one analyzed complaint
pub fn render_result(verdict: &ClassifierVerdict, complaint_id: Option<&str>) -> String {
    let mut out = String::new();
    let timestamp = verdict.analyzed_at.to_rfc3339();

    if verdict.is_threat {
        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "  THREAT DETECTED :: SYSTEM COMPROMISED");
        let _ = writeln!(out, "  Immediate action required");
        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "  STATUS:     THREAT CONFIRMED");
        let _ = writeln!(out, "  CATEGORY:   {}", verdict.category.to_uppercase());
        let _ = writeln!(out, "  CONFIDENCE: {}", verdict.confidence_percent());
        let _ = writeln!(out, "  CASE ID:    {}", complaint_id.unwrap_or("PENDING"));
        let _ = writeln!(out, "  TIMESTAMP:  {}", timestamp);
        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "  Your device has been flagged for potential compromise.");
        let _ = writeln!(out, "  Do not share sensitive information on this device until");
        let _ = writeln!(out, "  the investigation is complete.");
    } else {
        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "  ALL CLEAR :: DEVICE SECURE");
        let _ = writeln!(out, "  No threats detected");
        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "  STATUS:     SECURE");
        let _ = writeln!(out, "  SCAN TYPE:  {}", verdict.category.to_uppercase());
        let _ = writeln!(out, "  CONFIDENCE: {}", verdict.confidence_percent());
        let _ = writeln!(out, "  TIMESTAMP:  {}", timestamp);
        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "  No evidence of compromise was found. Keep your software");
        let _ = writeln!(out, "  up to date and run periodic scans.");
    }

    out
}

/// One line per stored complaint
pub fn render_list(records: &[ComplaintRecord]) -> String {
    if records.is_empty() {
        return "No complaints stored.\n".to_string();
    }

    let mut out = String::new();
    for record in records {
        let verdict = match &record.ml_result {
            Some(v) if v.is_threat => format!("THREAT {} ({})", v.category, v.confidence_percent()),
            Some(v) => format!("SAFE   {} ({})", v.category, v.confidence_percent()),
            None => "PENDING".to_string(),
        };
        let _ = writeln!(
            out,
            "{}  {}  {:<30}  {:<9}  {}",
            record.id,
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.submission.complaint_type.label(),
            record.status.as_str(),
            verdict
        );
    }
    out
}
