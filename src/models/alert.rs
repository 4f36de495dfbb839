// src/models/alert.rs
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Report,        // "New report filed against Emeka Okafor"
    Approval,      // "Passenger request approved"
    Suspension,    // "Driver suspended"
    Flag,          // "Driver flagged for review"
    Verification,  // "New passenger awaiting verification"
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AlertItem {
    pub id: String,
    pub alert_type: AlertType,
    pub title: String,
    pub detail: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

impl AlertItem {
    pub fn new(
        alert_type: AlertType,
        title: impl Into<String>,
        detail: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: nanoid::nanoid!(10),
            alert_type,
            title: title.into(),
            detail: detail.into(),
            created_at,
            read: false,
        }
    }

    /// Relative label shown in the feed, e.g. "Just now" or "5 min ago".
    pub fn time_label(&self, now: DateTime<Utc>) -> String {
        let elapsed = now.signed_duration_since(self.created_at);
        let minutes = elapsed.num_minutes();
        if minutes < 1 {
            "Just now".to_string()
        } else if minutes < 60 {
            format!("{} min ago", minutes)
        } else if elapsed.num_hours() < 24 {
            format!("{}h ago", elapsed.num_hours())
        } else {
            format!("{}d ago", elapsed.num_days())
        }
    }
}
