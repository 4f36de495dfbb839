// src/models/report.rs
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    #[default]
    Open,          // Submitted, nobody has looked at it yet
    UnderReview,   // An admin is handling it
    Resolved,      // Closed with action taken
    Dismissed,     // Closed without action
}

/// Report categories offered to passengers; free text is also accepted.
pub const REPORT_TYPES: &[&str] = &[
    "Reckless Driving",
    "Unprofessional Behaviour",
    "Overcharging / Fare Dispute",
    "Vehicle Condition",
    "Route Deviation",
    "Harassment",
    "Other",
];

/// A known category in its listed spelling, otherwise the trimmed free text.
pub fn canonical_report_type(input: &str) -> String {
    let input = input.trim();
    REPORT_TYPES
        .iter()
        .find(|known| known.eq_ignore_ascii_case(input))
        .map_or_else(|| input.to_string(), |known| known.to_string())
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AdminResponse {
    pub message: String,
    pub responded_at: DateTime<Utc>,
    pub responder_id: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Report {
    pub id: String,
    pub driver_id: String,          // References Driver.id
    pub passenger_id: String,
    pub report_type: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub status: ReportStatus,
    pub admin_response: Option<AdminResponse>,
}

/// A passenger's report as typed into the report form.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ReportSubmission {
    pub driver_id: String,
    pub passenger_id: String,
    pub report_type: String,
    pub description: String,
}

impl ReportStatus {
    /// Resolved and dismissed reports accept no further changes.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReportStatus::Resolved | ReportStatus::Dismissed)
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReportStatus::Open => "open",
            ReportStatus::UnderReview => "under_review",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Dismissed => "dismissed",
        };
        f.write_str(label)
    }
}
