// src/models/driver.rs
use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Verified,      // Identity and documents checked
    Unverified,    // Awaiting document review
    Rejected,      // Documents failed review
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    #[default]
    Active,        // Allowed to operate
    Suspended,     // Barred from operating pending review
    Flagged,       // Operating, but under watch
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DriverLifecycleAction {
    Suspend,
    Flag,
    Restore,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Driver {
    pub id: String,
    pub driver_id: String,          // Public badge id shown to passengers
    pub full_name: String,
    pub photo: String,
    pub license_number: String,
    pub vehicle_plate: String,
    pub vehicle_model: String,
    pub cab_company: String,
    pub state: String,
    pub city: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub verification_status: VerificationStatus,
    pub last_verified_date: NaiveDate,
    pub driver_status: DriverStatus,
    pub status_reason: Option<String>,  // Reason given for the last lifecycle action
    pub status_changed_at: Option<DateTime<Utc>>,
}

/// Unsaved input from the add-driver form.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct DriverRegistration {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub vehicle_plate: String,
    pub vehicle_model: String,
    pub license_number: String,
    pub cab_company: String,
    pub city: String,
    pub state: String,
}

impl Driver {
    pub fn is_verified(&self) -> bool {
        self.verification_status == VerificationStatus::Verified
    }
}

impl DriverLifecycleAction {
    pub fn target_status(&self) -> DriverStatus {
        match self {
            DriverLifecycleAction::Suspend => DriverStatus::Suspended,
            DriverLifecycleAction::Flag => DriverStatus::Flagged,
            DriverLifecycleAction::Restore => DriverStatus::Active,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            DriverLifecycleAction::Suspend => "suspend",
            DriverLifecycleAction::Flag => "flag",
            DriverLifecycleAction::Restore => "restore",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VerificationStatus::Verified => "verified",
            VerificationStatus::Unverified => "unverified",
            VerificationStatus::Rejected => "rejected",
        };
        f.write_str(label)
    }
}

impl fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DriverStatus::Active => "active",
            DriverStatus::Suspended => "suspended",
            DriverStatus::Flagged => "flagged",
        };
        f.write_str(label)
    }
}
