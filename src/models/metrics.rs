// src/models/metrics.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeeklyTrendPoint {
    pub week: String,
    pub flagged: u32,
    pub reports: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MonthlyTrendPoint {
    pub month: String,
    pub flagged: u32,
    pub reports: u32,
    pub passengers: Option<u32>,
    pub drivers: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct SystemMetrics {
    pub total_passengers: u32,
    pub total_drivers: u32,
    pub verified_drivers: u32,
    pub verified_percentage: f32,
    pub reports_submitted: u32,
    pub flagged_drivers: u32,
    pub weekly_trend: Vec<WeeklyTrendPoint>,
    pub monthly_trend: Vec<MonthlyTrendPoint>,
}

/// Badge counts shown on the dashboard, always derived from live collections.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardCounts {
    pub open_reports: usize,
    pub pending_requests: usize,
    pub unread_alerts: usize,
    pub verified_drivers: usize,
    pub total_drivers: usize,
    pub suspended_drivers: usize,
    pub flagged_drivers: usize,
}
