// src/services/dashboard.rs
//! Admin dashboard controller.
//!
//! Owns the session's [`Collections`] and the serializable [`UiState`].
//! UI state changes only through [`Dashboard::dispatch`]; data changes only
//! through the reducer-backed methods below.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{DashboardError, DashboardResult},
    models::{
        AlertItem, DashboardCounts, Driver, DriverLifecycleAction, DriverRegistration,
        PassengerRequest, Report, ReportStatus, ReportSubmission, RequestStatus, SystemMetrics,
    },
    services::{
        feed::ScheduledAlert,
        reducer::{Collections, RequestDecision},
        views::{self, DriverFilters, ReportFilter, RequestFilter, StatusFilter},
    },
};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Overview,
    Drivers,
    Reports,
    Passengers,
}

/// The one modal or side panel that may be open.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Panel {
    #[default]
    None,
    AddDriver {
        draft: DriverRegistration,
    },
    DriverAction {
        driver_id: String,
        action: DriverLifecycleAction,
        reason: String,
    },
    DriverProfile {
        driver_id: String,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MetricCard {
    TotalPassengers,
    TotalDrivers,
    VerifiedDrivers,
    ReportsSubmitted,
    OpenReports,
    PendingRequests,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct UiState {
    pub tab: Tab,
    pub driver_filters: DriverFilters,
    pub report_filter: ReportFilter,
    pub request_filter: RequestFilter,
    pub panel: Panel,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiAction {
    SelectTab { tab: Tab },
    SetSearch { text: String },
    SetVerifiedOnly { verified_only: bool },
    SetReportFilter { filter: ReportFilter },
    SetRequestFilter { filter: RequestFilter },
    ClickMetric { card: MetricCard },
    OpenAddDriver,
    EditDriverDraft { draft: DriverRegistration },
    OpenDriverAction { driver_id: String, action: DriverLifecycleAction },
    EditActionReason { reason: String },
    OpenDriverProfile { driver_id: String },
    ClosePanel,
}

#[derive(Debug, Serialize, Clone)]
pub struct ReportRow {
    #[serde(flatten)]
    pub report: Report,
    pub driver_name: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct AlertView {
    #[serde(flatten)]
    pub alert: AlertItem,
    pub time: String,
}

/// Read-only bundle handed to the presentation layer.
#[derive(Debug, Serialize, Clone)]
pub struct DashboardSnapshot {
    pub ui: UiState,
    pub counts: DashboardCounts,
    pub metrics: SystemMetrics,
    pub drivers: Vec<Driver>,
    pub reports: Vec<ReportRow>,
    pub passenger_requests: Vec<PassengerRequest>,
    pub alerts: Vec<AlertView>,
    pub profile: Option<Driver>,
}

impl DashboardSnapshot {
    pub fn to_json(&self) -> DashboardResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug)]
pub struct Dashboard {
    collections: Collections,
    seed_metrics: SystemMetrics,
    ui: UiState,
    responder_id: String,
    scheduled: Option<ScheduledAlert>,
}

impl Dashboard {
    pub fn new(collections: Collections, seed_metrics: SystemMetrics, responder_id: impl Into<String>) -> Self {
        Self {
            collections,
            seed_metrics,
            ui: UiState::default(),
            responder_id: responder_id.into(),
            scheduled: None,
        }
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn collections(&self) -> &Collections {
        &self.collections
    }

    pub fn counts(&self) -> DashboardCounts {
        self.collections.counts()
    }

    pub fn metrics(&self) -> SystemMetrics {
        views::live_metrics(&self.seed_metrics, self.collections.drivers(), self.collections.reports())
    }

    pub fn filtered_drivers(&self) -> Vec<&Driver> {
        views::filtered_drivers(self.collections.drivers(), &self.ui.driver_filters)
    }

    pub fn filtered_reports(&self) -> Vec<&Report> {
        views::filtered_reports(self.collections.reports(), &self.ui.report_filter)
    }

    pub fn filtered_passenger_requests(&self) -> Vec<&PassengerRequest> {
        views::filtered_passenger_requests(self.collections.requests(), &self.ui.request_filter)
    }

    pub fn dispatch(&mut self, action: UiAction) -> DashboardResult<()> {
        tracing::debug!(?action, "UI action");
        match action {
            UiAction::SelectTab { tab } => self.ui.tab = tab,
            UiAction::SetSearch { text } => self.ui.driver_filters.search = text,
            UiAction::SetVerifiedOnly { verified_only } => self.ui.driver_filters.verified_only = verified_only,
            UiAction::SetReportFilter { filter } => self.ui.report_filter = filter,
            UiAction::SetRequestFilter { filter } => self.ui.request_filter = filter,
            UiAction::ClickMetric { card } => self.apply_metric_preset(card),
            UiAction::OpenAddDriver => {
                self.ui.panel = Panel::AddDriver { draft: DriverRegistration::default() };
            }
            UiAction::EditDriverDraft { draft: edited } => {
                let Panel::AddDriver { draft } = &mut self.ui.panel else {
                    return Err(DashboardError::validation_error("panel", "The add-driver form is not open."));
                };
                *draft = edited;
            }
            UiAction::OpenDriverAction { driver_id, action } => {
                self.require_driver(&driver_id)?;
                self.ui.panel = Panel::DriverAction { driver_id, action, reason: String::new() };
            }
            UiAction::EditActionReason { reason: edited } => {
                let Panel::DriverAction { reason, .. } = &mut self.ui.panel else {
                    return Err(DashboardError::validation_error("panel", "No driver action is open."));
                };
                *reason = edited;
            }
            UiAction::OpenDriverProfile { driver_id } => {
                self.require_driver(&driver_id)?;
                self.ui.panel = Panel::DriverProfile { driver_id };
            }
            UiAction::ClosePanel => self.ui.panel = Panel::None,
        }
        Ok(())
    }

    fn require_driver(&self, driver_id: &str) -> DashboardResult<()> {
        self.collections
            .driver(driver_id)
            .map(|_| ())
            .ok_or_else(|| DashboardError::driver_not_found(driver_id))
    }

    // Metric cards jump to a tab with a preset filter; other tabs' filters stay put.
    fn apply_metric_preset(&mut self, card: MetricCard) {
        match card {
            MetricCard::TotalPassengers => {
                self.ui.tab = Tab::Passengers;
                self.ui.request_filter = StatusFilter::All;
            }
            MetricCard::PendingRequests => {
                self.ui.tab = Tab::Passengers;
                self.ui.request_filter = StatusFilter::Only(RequestStatus::Pending);
            }
            MetricCard::TotalDrivers => {
                self.ui.tab = Tab::Drivers;
                self.ui.driver_filters.verified_only = false;
            }
            MetricCard::VerifiedDrivers => {
                self.ui.tab = Tab::Drivers;
                self.ui.driver_filters.verified_only = true;
            }
            MetricCard::ReportsSubmitted => {
                self.ui.tab = Tab::Reports;
                self.ui.report_filter = StatusFilter::All;
            }
            MetricCard::OpenReports => {
                self.ui.tab = Tab::Reports;
                self.ui.report_filter = StatusFilter::Only(ReportStatus::Open);
            }
        }
    }

    /// Commit the open driver-action dialog. The dialog closes on success
    /// and stays open, reason intact, on failure.
    pub fn confirm_driver_action(&mut self) -> DashboardResult<&Driver> {
        let Panel::DriverAction { driver_id, action, reason } = &self.ui.panel else {
            return Err(DashboardError::validation_error("panel", "No driver action is open."));
        };
        let (driver_id, action, reason) = (driver_id.clone(), *action, reason.clone());

        let driver = self.collections.set_driver_lifecycle(&driver_id, action, &reason, Utc::now())?;
        self.ui.panel = Panel::None;
        Ok(driver)
    }

    /// Commit the add-driver form. Field errors leave the form open with the draft.
    pub fn submit_add_driver(&mut self) -> DashboardResult<&Driver> {
        let Panel::AddDriver { draft } = &self.ui.panel else {
            return Err(DashboardError::validation_error("panel", "The add-driver form is not open."));
        };
        let draft = draft.clone();

        let driver = self.collections.add_driver(&draft, Utc::now())?;
        self.ui.panel = Panel::None;
        Ok(driver)
    }

    pub fn set_driver_lifecycle(
        &mut self,
        driver_id: &str,
        action: DriverLifecycleAction,
        reason: &str,
    ) -> DashboardResult<&Driver> {
        self.collections.set_driver_lifecycle(driver_id, action, reason, Utc::now())
    }

    pub fn update_report_status(&mut self, report_id: &str, status: ReportStatus) -> DashboardResult<&Report> {
        self.collections.update_report_status(report_id, status)
    }

    pub fn respond_to_report(&mut self, report_id: &str, message: &str) -> DashboardResult<&Report> {
        self.collections
            .respond_to_report(report_id, message, &self.responder_id, Utc::now())
    }

    pub fn decide_passenger_request(
        &mut self,
        request_id: &str,
        decision: RequestDecision,
    ) -> DashboardResult<&PassengerRequest> {
        self.collections.decide_passenger_request(request_id, decision, Utc::now())
    }

    pub fn submit_report(&mut self, submission: &ReportSubmission) -> DashboardResult<&Report> {
        self.collections.submit_report(submission, Utc::now())
    }

    pub fn enqueue_passenger_request(&mut self, request: PassengerRequest) -> DashboardResult<&PassengerRequest> {
        self.collections.enqueue_passenger_request(request)
    }

    pub fn dismiss_alert(&mut self, alert_id: &str) -> DashboardResult<()> {
        self.collections.dismiss_alert(alert_id)
    }

    pub fn dismiss_all_alerts(&mut self) -> usize {
        self.collections.dismiss_all_alerts()
    }

    /// Arm the session's simulated alert. Only one may ever be armed; a
    /// fired or cancelled alert still counts.
    pub fn schedule_alert(&mut self, scheduled: ScheduledAlert) -> DashboardResult<()> {
        if self.scheduled.is_some() {
            tracing::warn!("Simulated alert already armed this session");
            return Err(DashboardError::validation_error(
                "scheduled_alert",
                "A simulated alert was already armed for this session.",
            ));
        }
        tracing::debug!(due_at = %scheduled.due_at(), "Simulated alert armed");
        self.scheduled = Some(scheduled);
        Ok(())
    }

    pub fn cancel_scheduled_alert(&mut self) {
        if let Some(scheduled) = self.scheduled.as_mut() {
            scheduled.cancel();
        }
    }

    /// Push the scheduled alert into the feed if it is due. True when delivered.
    pub fn deliver_due_alert(&mut self, now: DateTime<Utc>) -> bool {
        match self.scheduled.as_mut().and_then(|s| s.fire_if_due(now)) {
            Some(alert) => {
                self.collections.push_alert(alert);
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> DashboardSnapshot {
        let drivers = self.collections.drivers();
        let profile = match &self.ui.panel {
            Panel::DriverProfile { driver_id } => self.collections.driver(driver_id).cloned(),
            _ => None,
        };

        DashboardSnapshot {
            ui: self.ui.clone(),
            counts: self.counts(),
            metrics: self.metrics(),
            drivers: self.filtered_drivers().into_iter().cloned().collect(),
            reports: self
                .filtered_reports()
                .into_iter()
                .map(|r| ReportRow {
                    report: r.clone(),
                    driver_name: views::driver_name(drivers, &r.driver_id).to_string(),
                })
                .collect(),
            passenger_requests: self.filtered_passenger_requests().into_iter().cloned().collect(),
            alerts: self
                .collections
                .alerts()
                .iter()
                .map(|a| AlertView { alert: a.clone(), time: a.time_label(now) })
                .collect(),
            profile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DriverStatus, VerificationStatus};
    use crate::services::source::fixtures::{driver, report, request};
    use chrono::Duration;

    fn dashboard() -> Dashboard {
        let collections = Collections::new(
            vec![
                driver("D1", "Amara Dike", "LND-123-GH", VerificationStatus::Verified),
                driver("D2", "Emeka Okafor", "KJA-234-AB", VerificationStatus::Unverified),
            ],
            vec![report("R1", "D1", "PSG001"), report("R2", "D2", "PSG002")],
            vec![request("REQ001"), request("REQ002")],
            Vec::new(),
        );
        Dashboard::new(collections, SystemMetrics::default(), "ADMIN001")
    }

    #[test]
    fn test_verified_card_presets_driver_tab() {
        let mut d = dashboard();
        d.dispatch(UiAction::ClickMetric { card: MetricCard::VerifiedDrivers }).unwrap();
        assert_eq!(d.ui().tab, Tab::Drivers);
        assert!(d.ui().driver_filters.verified_only);
        assert_eq!(d.filtered_drivers().len(), 1);
    }

    #[test]
    fn test_metric_cards_route_to_tabs() {
        let mut d = dashboard();
        d.dispatch(UiAction::ClickMetric { card: MetricCard::OpenReports }).unwrap();
        assert_eq!(d.ui().tab, Tab::Reports);
        assert_eq!(d.ui().report_filter, StatusFilter::Only(ReportStatus::Open));

        d.dispatch(UiAction::ClickMetric { card: MetricCard::PendingRequests }).unwrap();
        assert_eq!(d.ui().tab, Tab::Passengers);
        assert_eq!(d.ui().request_filter, StatusFilter::Only(RequestStatus::Pending));
        assert_eq!(d.ui().report_filter, StatusFilter::Only(ReportStatus::Open));
    }

    #[test]
    fn test_switching_tabs_keeps_filters() {
        let mut d = dashboard();
        d.dispatch(UiAction::SetSearch { text: "okafor".into() }).unwrap();
        d.dispatch(UiAction::SetReportFilter { filter: StatusFilter::Only(ReportStatus::UnderReview) }).unwrap();
        d.dispatch(UiAction::SelectTab { tab: Tab::Passengers }).unwrap();
        d.dispatch(UiAction::SelectTab { tab: Tab::Drivers }).unwrap();

        assert_eq!(d.ui().driver_filters.search, "okafor");
        assert_eq!(d.ui().report_filter, StatusFilter::Only(ReportStatus::UnderReview));
        assert_eq!(d.filtered_drivers()[0].id, "D2");
    }

    #[test]
    fn test_only_one_panel_at_a_time() {
        let mut d = dashboard();
        d.dispatch(UiAction::OpenAddDriver).unwrap();
        d.dispatch(UiAction::OpenDriverProfile { driver_id: "D1".into() }).unwrap();
        assert_eq!(d.ui().panel, Panel::DriverProfile { driver_id: "D1".into() });

        let snap = d.snapshot(Utc::now());
        assert_eq!(snap.profile.unwrap().id, "D1");
    }

    #[test]
    fn test_open_panel_for_unknown_driver() {
        let mut d = dashboard();
        let err = d
            .dispatch(UiAction::OpenDriverAction { driver_id: "D9".into(), action: DriverLifecycleAction::Flag })
            .unwrap_err();
        assert!(matches!(err, DashboardError::DriverNotFound(_)));
        assert_eq!(d.ui().panel, Panel::None);
    }

    #[test]
    fn test_edits_need_their_panel_open() {
        let mut d = dashboard();
        d.dispatch(UiAction::OpenDriverProfile { driver_id: "D1".into() }).unwrap();

        let err = d
            .dispatch(UiAction::EditActionReason { reason: "Speeding".into() })
            .unwrap_err();
        assert_eq!(err.field_errors(), vec![("panel", "No driver action is open.")]);

        let err = d
            .dispatch(UiAction::EditDriverDraft { draft: DriverRegistration::default() })
            .unwrap_err();
        assert_eq!(err.field_errors()[0].0, "panel");
        assert_eq!(d.ui().panel, Panel::DriverProfile { driver_id: "D1".into() });
    }

    #[test]
    fn test_confirm_driver_action_closes_dialog() {
        let mut d = dashboard();
        d.dispatch(UiAction::OpenDriverAction { driver_id: "D2".into(), action: DriverLifecycleAction::Suspend })
            .unwrap();
        d.dispatch(UiAction::EditActionReason { reason: "Fake documents".into() }).unwrap();

        let driver = d.confirm_driver_action().unwrap();
        assert_eq!(driver.driver_status, DriverStatus::Suspended);
        assert_eq!(d.ui().panel, Panel::None);
        assert_eq!(d.counts().suspended_drivers, 1);
        assert_eq!(d.counts().unread_alerts, 1);
    }

    #[test]
    fn test_failed_driver_action_keeps_dialog_open() {
        let mut d = dashboard();
        d.dispatch(UiAction::OpenDriverAction { driver_id: "D1".into(), action: DriverLifecycleAction::Flag })
            .unwrap();
        assert!(matches!(d.confirm_driver_action(), Err(DashboardError::MissingReason(_))));
        assert!(matches!(d.ui().panel, Panel::DriverAction { .. }));
        assert_eq!(d.collections().driver("D1").unwrap().driver_status, DriverStatus::Active);
    }

    #[test]
    fn test_closing_panel_keeps_committed_changes() {
        let mut d = dashboard();
        d.dispatch(UiAction::OpenDriverProfile { driver_id: "D1".into() }).unwrap();
        d.set_driver_lifecycle("D1", DriverLifecycleAction::Flag, "Late-night complaints").unwrap();
        d.dispatch(UiAction::ClosePanel).unwrap();
        assert_eq!(d.collections().driver("D1").unwrap().driver_status, DriverStatus::Flagged);
    }

    #[test]
    fn test_add_driver_form_flow() {
        let mut d = dashboard();
        d.dispatch(UiAction::OpenAddDriver).unwrap();
        let mut draft = DriverRegistration {
            full_name: "Tunde Bakare".into(),
            email: "tunde@example".into(),
            phone: "08035550199".into(),
            vehicle_plate: "ABC-987-XY".into(),
            vehicle_model: "Corolla".into(),
            license_number: "LAG-DL-55123".into(),
            cab_company: "Vyride Cabs".into(),
            city: "Ikeja".into(),
            state: "Lagos".into(),
        };
        d.dispatch(UiAction::EditDriverDraft { draft: draft.clone() }).unwrap();

        let err = d.submit_add_driver().unwrap_err();
        assert_eq!(err.field_errors()[0].0, "email");
        assert!(matches!(&d.ui().panel, Panel::AddDriver { draft: kept } if kept.full_name == "Tunde Bakare"));

        draft.email = "tunde@example.com".into();
        d.dispatch(UiAction::EditDriverDraft { draft }).unwrap();
        d.submit_add_driver().unwrap();
        assert_eq!(d.ui().panel, Panel::None);
        assert_eq!(d.counts().total_drivers, 3);
    }

    #[test]
    fn test_cancelled_add_driver_discards_draft() {
        let mut d = dashboard();
        d.dispatch(UiAction::OpenAddDriver).unwrap();
        d.dispatch(UiAction::EditDriverDraft {
            draft: DriverRegistration { full_name: "Half typed".into(), ..Default::default() },
        })
        .unwrap();
        d.dispatch(UiAction::ClosePanel).unwrap();
        d.dispatch(UiAction::OpenAddDriver).unwrap();
        assert_eq!(d.ui().panel, Panel::AddDriver { draft: DriverRegistration::default() });
        assert!(d.submit_add_driver().is_err());
        assert_eq!(d.counts().total_drivers, 2);
    }

    #[test]
    fn test_respond_uses_configured_responder() {
        let mut d = dashboard();
        let report = d.respond_to_report("R1", "Thanks, investigating").unwrap();
        assert_eq!(report.status, ReportStatus::UnderReview);
        assert_eq!(report.admin_response.as_ref().unwrap().responder_id, "ADMIN001");
        assert_eq!(d.counts().open_reports, 1);
    }

    #[test]
    fn test_scheduled_alert_delivery() {
        let mut d = dashboard();
        let loaded = Utc::now();
        d.schedule_alert(ScheduledAlert::simulated_report(loaded, Duration::seconds(8))).unwrap();

        assert!(!d.deliver_due_alert(loaded));
        assert!(d.deliver_due_alert(loaded + Duration::seconds(8)));
        assert!(!d.deliver_due_alert(loaded + Duration::seconds(20)));
        assert_eq!(d.counts().unread_alerts, 1);
    }

    #[test]
    fn test_simulated_alert_cannot_be_rearmed() {
        let mut d = dashboard();
        let loaded = Utc::now();
        d.schedule_alert(ScheduledAlert::simulated_report(loaded, Duration::seconds(1))).unwrap();
        assert!(d.deliver_due_alert(loaded + Duration::seconds(2)));

        let err = d
            .schedule_alert(ScheduledAlert::simulated_report(loaded, Duration::seconds(2)))
            .unwrap_err();
        assert!(matches!(err, DashboardError::ValidationFailed(_)));
        assert!(!d.deliver_due_alert(loaded + Duration::seconds(3)));
        assert_eq!(d.collections().alerts().len(), 1);
    }

    #[test]
    fn test_cancelled_alert_cannot_be_rearmed() {
        let mut d = dashboard();
        let loaded = Utc::now();
        d.schedule_alert(ScheduledAlert::simulated_report(loaded, Duration::seconds(1))).unwrap();
        d.cancel_scheduled_alert();
        assert!(d.schedule_alert(ScheduledAlert::simulated_report(loaded, Duration::seconds(1))).is_err());
        assert!(!d.deliver_due_alert(loaded + Duration::minutes(1)));
        assert!(d.collections().alerts().is_empty());
    }

    #[test]
    fn test_cancelled_scheduled_alert() {
        let mut d = dashboard();
        let loaded = Utc::now();
        d.schedule_alert(ScheduledAlert::simulated_report(loaded, Duration::seconds(1))).unwrap();
        d.cancel_scheduled_alert();
        assert!(!d.deliver_due_alert(loaded + Duration::minutes(5)));
        assert_eq!(d.collections().alerts().len(), 0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut d = dashboard();
        d.dispatch(UiAction::ClickMetric { card: MetricCard::OpenReports }).unwrap();
        let snap = d.snapshot(Utc::now());
        assert_eq!(snap.reports.len(), 2);
        assert_eq!(snap.reports[0].driver_name, "Amara Dike");

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["ui"]["tab"], "reports");
        assert_eq!(json["ui"]["report_filter"]["only"], "open");
        assert_eq!(json["ui"]["panel"]["kind"], "none");
        assert_eq!(json["reports"][0]["driver_name"], "Amara Dike");
    }

    #[test]
    fn test_ui_action_round_trips_from_json() {
        let action: UiAction =
            serde_json::from_str(r#"{"type":"click_metric","card":"verified_drivers"}"#).unwrap();
        assert_eq!(action, UiAction::ClickMetric { card: MetricCard::VerifiedDrivers });
    }
}
