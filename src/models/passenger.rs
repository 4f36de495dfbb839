// src/models/passenger.rs
use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PassengerRequest {
    pub id: String,
    pub passenger_id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub nin_redacted: String,       // e.g. "********123"
    pub selfie_ref: String,         // Opaque reference held by the media collaborator
    pub submitted_at: DateTime<Utc>,
    pub status: RequestStatus,
    pub decided_at: Option<DateTime<Utc>>,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

/// Mask all but the last three digits of a National Identification Number.
pub fn redact_nin(nin: &str) -> String {
    let digits: Vec<char> = nin.chars().filter(|c| c.is_ascii_digit()).collect();
    let keep = digits.len().min(3);
    let hidden = digits.len() - keep;
    let tail: String = digits[hidden..].iter().collect();
    format!("{}{}", "*".repeat(hidden), tail)
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        };
        f.write_str(label)
    }
}
