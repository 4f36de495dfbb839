// src/services/views.rs
//! Pure selectors over the canonical collections.
//!
//! Nothing here mutates its input; every count is recomputed on each call so
//! badges can never drift from the underlying data.

use serde::{Deserialize, Serialize};

use crate::models::{
    AlertItem, DashboardCounts, Driver, DriverStatus, PassengerRequest, Report, ReportStatus,
    RequestStatus, SystemMetrics,
};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct DriverFilters {
    pub search: String,
    pub verified_only: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter<S> {
    All,
    Only(S),
}

impl<S> Default for StatusFilter<S> {
    fn default() -> Self {
        StatusFilter::All
    }
}

impl<S: PartialEq> StatusFilter<S> {
    pub fn matches(&self, status: &S) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

pub type ReportFilter = StatusFilter<ReportStatus>;
pub type RequestFilter = StatusFilter<RequestStatus>;

/// Lowercase and strip hyphens and whitespace, so "LND-123 GH" == "lnd123gh".
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn driver_matches(driver: &Driver, normalized_query: &str) -> bool {
    normalized_query.is_empty()
        || [&driver.full_name, &driver.vehicle_plate, &driver.driver_id]
            .iter()
            .any(|field| normalize(field).contains(normalized_query))
}

pub fn filtered_drivers<'a>(drivers: &'a [Driver], filters: &DriverFilters) -> Vec<&'a Driver> {
    let query = normalize(&filters.search);
    let result: Vec<&Driver> = drivers
        .iter()
        .filter(|d| !filters.verified_only || d.is_verified())
        .filter(|d| driver_matches(d, &query))
        .collect();
    tracing::debug!(
        query = %query,
        verified_only = filters.verified_only,
        matched = result.len(),
        "Filtered drivers"
    );
    result
}

pub fn filtered_reports<'a>(reports: &'a [Report], filter: &ReportFilter) -> Vec<&'a Report> {
    reports.iter().filter(|r| filter.matches(&r.status)).collect()
}

pub fn filtered_passenger_requests<'a>(
    requests: &'a [PassengerRequest],
    filter: &RequestFilter,
) -> Vec<&'a PassengerRequest> {
    requests.iter().filter(|r| filter.matches(&r.status)).collect()
}

pub fn counts(
    drivers: &[Driver],
    reports: &[Report],
    requests: &[PassengerRequest],
    alerts: &[AlertItem],
) -> DashboardCounts {
    let with_status = |status: DriverStatus| drivers.iter().filter(|d| d.driver_status == status).count();

    DashboardCounts {
        open_reports: reports.iter().filter(|r| r.status == ReportStatus::Open).count(),
        pending_requests: requests
            .iter()
            .filter(|r| r.status == RequestStatus::Pending)
            .count(),
        unread_alerts: alerts.iter().filter(|a| !a.read).count(),
        verified_drivers: drivers.iter().filter(|d| d.is_verified()).count(),
        total_drivers: drivers.len(),
        suspended_drivers: with_status(DriverStatus::Suspended),
        flagged_drivers: with_status(DriverStatus::Flagged),
    }
}

/// Seed metrics with every figure the collections can answer recomputed.
pub fn live_metrics(seed: &SystemMetrics, drivers: &[Driver], reports: &[Report]) -> SystemMetrics {
    let total = drivers.len() as u32;
    let verified = drivers.iter().filter(|d| d.is_verified()).count() as u32;
    let verified_percentage = if total == 0 {
        0.0
    } else {
        ((verified as f32 / total as f32) * 1000.0).round() / 10.0
    };

    SystemMetrics {
        total_drivers: total,
        verified_drivers: verified,
        verified_percentage,
        reports_submitted: reports.len() as u32,
        flagged_drivers: drivers
            .iter()
            .filter(|d| d.driver_status == DriverStatus::Flagged)
            .count() as u32,
        ..seed.clone()
    }
}

/// Public verification page: plate (punctuation-insensitive) or badge id.
pub fn lookup_driver<'a>(drivers: &'a [Driver], query: &str) -> Option<&'a Driver> {
    let raw = query.trim().to_lowercase();
    if raw.is_empty() {
        return None;
    }
    let plate_query = normalize(&raw);

    drivers.iter().find(|d| {
        normalize(&d.vehicle_plate).contains(&plate_query) || d.driver_id.to_lowercase().contains(&raw)
    })
}

pub fn driver_name<'a>(drivers: &'a [Driver], driver_id: &str) -> &'a str {
    drivers
        .iter()
        .find(|d| d.id == driver_id)
        .map(|d| d.full_name.as_str())
        .unwrap_or("Unknown")
}

/// A passenger's own reports, newest first.
pub fn reports_for_passenger<'a>(reports: &'a [Report], passenger_id: &str) -> Vec<&'a Report> {
    let mut mine: Vec<&Report> = reports.iter().filter(|r| r.passenger_id == passenger_id).collect();
    mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    mine
}

/// Distinct drivers a passenger has reported, in first-seen order.
pub fn drivers_for_passenger<'a>(
    drivers: &'a [Driver],
    reports: &[Report],
    passenger_id: &str,
) -> Vec<&'a Driver> {
    let mut seen: Vec<&str> = Vec::new();
    for report in reports.iter().filter(|r| r.passenger_id == passenger_id) {
        if !seen.contains(&report.driver_id.as_str()) {
            seen.push(&report.driver_id);
        }
    }
    seen.into_iter()
        .filter_map(|id| drivers.iter().find(|d| d.id == id))
        .collect()
}
