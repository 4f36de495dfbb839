// src/services/reducer.rs
//! Every state change in a session goes through [`Collections`].
//!
//! Each operation validates first and mutates second, so a rejected action
//! leaves the collections exactly as they were.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{DashboardError, DashboardResult},
    models::{
        canonical_report_type, AdminResponse, AlertItem, AlertType, DashboardCounts, Driver, DriverLifecycleAction,
        DriverRegistration, DriverStatus, PassengerRequest, Report, ReportStatus,
        ReportSubmission, RequestStatus, VerificationStatus,
    },
    services::{feed::NotificationFeed, views},
    utils::{
        id_generator::{IdGenerator, IdType},
        validation::{validate_driver_registration, FieldErrors},
    },
};

/// Shortest description a passenger report may carry, exclusive.
pub const MIN_REPORT_DESCRIPTION: usize = 10;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RequestDecision {
    Approved,
    Rejected,
}

impl RequestDecision {
    pub fn status(&self) -> RequestStatus {
        match self {
            RequestDecision::Approved => RequestStatus::Approved,
            RequestDecision::Rejected => RequestStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Collections {
    drivers: Vec<Driver>,
    reports: Vec<Report>,
    requests: Vec<PassengerRequest>,
    feed: NotificationFeed,
}

impl Collections {
    pub fn new(
        drivers: Vec<Driver>,
        reports: Vec<Report>,
        requests: Vec<PassengerRequest>,
        alerts: Vec<AlertItem>,
    ) -> Self {
        Self {
            drivers,
            reports,
            requests,
            feed: NotificationFeed::new(alerts),
        }
    }

    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn requests(&self) -> &[PassengerRequest] {
        &self.requests
    }

    pub fn alerts(&self) -> &[AlertItem] {
        self.feed.alerts()
    }

    pub fn driver(&self, id: &str) -> Option<&Driver> {
        self.drivers.iter().find(|d| d.id == id)
    }

    pub fn report(&self, id: &str) -> Option<&Report> {
        self.reports.iter().find(|r| r.id == id)
    }

    pub fn request(&self, id: &str) -> Option<&PassengerRequest> {
        self.requests.iter().find(|r| r.id == id)
    }

    pub fn counts(&self) -> DashboardCounts {
        views::counts(&self.drivers, &self.reports, &self.requests, self.feed.alerts())
    }

    fn driver_index(&self, id: &str) -> DashboardResult<usize> {
        self.drivers
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| DashboardError::driver_not_found(id))
    }

    fn report_index(&self, id: &str) -> DashboardResult<usize> {
        self.reports
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| DashboardError::report_not_found(id))
    }

    fn request_index(&self, id: &str) -> DashboardResult<usize> {
        self.requests
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| DashboardError::request_not_found(id))
    }

    /// Suspend, flag or restore a driver. A non-blank reason is required for
    /// all three and is kept as the reason for the latest action.
    pub fn set_driver_lifecycle(
        &mut self,
        driver_id: &str,
        action: DriverLifecycleAction,
        reason: &str,
        at: DateTime<Utc>,
    ) -> DashboardResult<&Driver> {
        let reason = reason.trim();
        if reason.is_empty() {
            tracing::warn!(driver_id, action = action.verb(), "Lifecycle action rejected: no reason");
            return Err(DashboardError::MissingReason(action.verb().to_string()));
        }
        let idx = self.driver_index(driver_id)?;

        let driver = &mut self.drivers[idx];
        let previous = driver.driver_status;
        driver.driver_status = action.target_status();
        driver.status_reason = Some(reason.to_string());
        driver.status_changed_at = Some(at);

        let (alert_type, title, detail) = match action {
            DriverLifecycleAction::Suspend => (
                AlertType::Suspension,
                "Driver suspended",
                format!("{} was suspended: {}", driver.full_name, reason),
            ),
            DriverLifecycleAction::Flag => (
                AlertType::Flag,
                "Driver flagged for review",
                format!("{} was flagged: {}", driver.full_name, reason),
            ),
            DriverLifecycleAction::Restore => (
                AlertType::Verification,
                "Driver restored",
                format!("{} was restored to active: {}", driver.full_name, reason),
            ),
        };
        tracing::info!(
            driver_id,
            from = %previous,
            to = %driver.driver_status,
            "Driver lifecycle updated"
        );
        self.feed.push(AlertItem::new(alert_type, title, detail, at));

        Ok(&self.drivers[idx])
    }

    pub fn update_report_status(
        &mut self,
        report_id: &str,
        new_status: ReportStatus,
    ) -> DashboardResult<&Report> {
        let idx = self.report_index(report_id)?;
        let report = &mut self.reports[idx];

        if report.status.is_terminal() {
            tracing::warn!(report_id, status = %report.status, "Report is closed; status change rejected");
            return Err(DashboardError::invalid_transition("report", report_id, report.status, new_status));
        }

        tracing::info!(report_id, from = %report.status, to = %new_status, "Report status updated");
        report.status = new_status;
        Ok(&self.reports[idx])
    }

    /// Attach an admin response. An open report moves to under review.
    pub fn respond_to_report(
        &mut self,
        report_id: &str,
        message: &str,
        responder_id: &str,
        at: DateTime<Utc>,
    ) -> DashboardResult<&Report> {
        let idx = self.report_index(report_id)?;
        let report = &mut self.reports[idx];

        if report.status.is_terminal() {
            tracing::warn!(report_id, status = %report.status, "Report is closed; response rejected");
            return Err(DashboardError::invalid_transition("report", report_id, report.status, "responded"));
        }
        let message = message.trim();
        if message.is_empty() {
            return Err(DashboardError::validation_error("message", "Response message is required."));
        }

        report.admin_response = Some(AdminResponse {
            message: message.to_string(),
            responded_at: at,
            responder_id: responder_id.to_string(),
        });
        if report.status == ReportStatus::Open {
            report.status = ReportStatus::UnderReview;
        }
        tracing::info!(report_id, responder_id, "Admin responded to report");

        Ok(&self.reports[idx])
    }

    pub fn decide_passenger_request(
        &mut self,
        request_id: &str,
        decision: RequestDecision,
        at: DateTime<Utc>,
    ) -> DashboardResult<&PassengerRequest> {
        let idx = self.request_index(request_id)?;
        let request = &mut self.requests[idx];

        if request.status != RequestStatus::Pending {
            tracing::warn!(request_id, status = %request.status, "Request already decided");
            return Err(DashboardError::invalid_transition(
                "passenger request",
                request_id,
                request.status,
                decision.status(),
            ));
        }

        request.status = decision.status();
        request.decided_at = Some(at);
        tracing::info!(request_id, decision = %request.status, "Passenger request decided");

        let title = match decision {
            RequestDecision::Approved => "Passenger approved",
            RequestDecision::Rejected => "Passenger rejected",
        };
        let detail = format!("{}'s verification request was {}", request.full_name, request.status);
        self.feed.push(AlertItem::new(AlertType::Approval, title, detail, at));

        Ok(&self.requests[idx])
    }

    pub fn dismiss_alert(&mut self, alert_id: &str) -> DashboardResult<()> {
        self.feed.dismiss(alert_id)
    }

    pub fn dismiss_all_alerts(&mut self) -> usize {
        self.feed.dismiss_all()
    }

    /// Deliver an externally produced alert (e.g. the simulated live one).
    pub fn push_alert(&mut self, alert: AlertItem) {
        self.feed.push(alert);
    }

    pub fn add_driver(&mut self, form: &DriverRegistration, at: DateTime<Utc>) -> DashboardResult<&Driver> {
        if let Err(err) = validate_driver_registration(form) {
            tracing::warn!(errors = ?err.field_errors(), "Add driver rejected");
            return Err(err);
        }

        let company = form.cab_company.trim();
        let driver = Driver {
            id: IdGenerator::generate_with_timestamp(IdType::Driver, at),
            driver_id: IdGenerator::generate_badge(at),
            full_name: form.full_name.trim().to_string(),
            photo: String::new(),
            license_number: form.license_number.trim().to_string(),
            vehicle_plate: form.vehicle_plate.trim().to_uppercase(),
            vehicle_model: form.vehicle_model.trim().to_string(),
            cab_company: if company.is_empty() { "Independent".to_string() } else { company.to_string() },
            state: form.state.trim().to_string(),
            city: form.city.trim().to_string(),
            email: Some(form.email.trim().to_string()),
            phone: Some(form.phone.trim().to_string()),
            verification_status: VerificationStatus::Unverified,
            last_verified_date: at.date_naive(),
            driver_status: DriverStatus::Active,
            status_reason: None,
            status_changed_at: None,
        };

        tracing::info!(driver_id = %driver.id, badge = %driver.driver_id, "Driver added");
        let detail = format!("{} ({}) is awaiting document review", driver.full_name, driver.vehicle_plate);
        self.drivers.insert(0, driver);
        self.feed.push(AlertItem::new(AlertType::Verification, "New driver added", detail, at));

        Ok(&self.drivers[0])
    }

    /// File a passenger's report against a driver.
    pub fn submit_report(&mut self, submission: &ReportSubmission, at: DateTime<Utc>) -> DashboardResult<&Report> {
        let driver_name = self
            .driver(&submission.driver_id)
            .map(|d| d.full_name.clone())
            .ok_or_else(|| DashboardError::driver_not_found(&submission.driver_id))?;

        let mut errors = FieldErrors::new();
        errors
            .require("passenger_id", &submission.passenger_id, "Passenger is required.")
            .require("report_type", &submission.report_type, "Choose a report type.")
            .check(
                submission.description.trim().chars().count() > MIN_REPORT_DESCRIPTION,
                "description",
                "Describe the issue in a little more detail.",
            );
        errors.finish()?;

        let report = Report {
            id: IdGenerator::generate_with_timestamp(IdType::Report, at),
            driver_id: submission.driver_id.clone(),
            passenger_id: submission.passenger_id.trim().to_string(),
            report_type: canonical_report_type(&submission.report_type),
            description: submission.description.trim().to_string(),
            created_at: at,
            status: ReportStatus::Open,
            admin_response: None,
        };

        tracing::info!(report_id = %report.id, driver_id = %report.driver_id, "Report submitted");
        let detail = format!("{} reported against {}", report.report_type, driver_name);
        self.reports.insert(0, report);
        self.feed.push(AlertItem::new(AlertType::Report, "New report filed", detail, at));

        Ok(&self.reports[0])
    }

    /// Queue a registration wizard submission for admin review.
    pub fn enqueue_passenger_request(&mut self, request: PassengerRequest) -> DashboardResult<&PassengerRequest> {
        if request.status != RequestStatus::Pending {
            return Err(DashboardError::invalid_transition(
                "passenger request",
                &request.id,
                request.status,
                RequestStatus::Pending,
            ));
        }
        if self.request(&request.id).is_some() {
            return Err(DashboardError::validation_error("id", "Request already submitted."));
        }

        tracing::info!(request_id = %request.id, "Passenger request queued");
        let detail = format!("{} submitted a selfie and NIN for review", request.full_name);
        let at = request.submitted_at;
        self.requests.push(request);
        self.feed.push(AlertItem::new(
            AlertType::Verification,
            "New passenger awaiting verification",
            detail,
            at,
        ));

        Ok(&self.requests[self.requests.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::source::fixtures::{driver, report, request};
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 10, 30, 0).unwrap()
    }

    fn collections() -> Collections {
        Collections::new(
            vec![
                driver("D1", "Amara Dike", "LND-123-GH", VerificationStatus::Verified),
                driver("D2", "Emeka Okafor", "KJA-234-AB", VerificationStatus::Unverified),
            ],
            vec![report("R1", "D1", "PSG001"), report("R2", "D2", "PSG002")],
            vec![request("REQ001"), request("REQ002"), request("REQ003"), request("REQ004")],
            Vec::new(),
        )
    }

    #[test]
    fn test_suspend_driver_records_reason_and_alert() {
        let mut c = collections();
        let driver = c
            .set_driver_lifecycle("D1", DriverLifecycleAction::Suspend, "Repeated speeding", at())
            .unwrap();
        assert_eq!(driver.driver_status, DriverStatus::Suspended);
        assert_eq!(driver.status_reason.as_deref(), Some("Repeated speeding"));
        assert_eq!(driver.status_changed_at, Some(at()));

        assert_eq!(c.alerts().len(), 1);
        let alert = &c.alerts()[0];
        assert_eq!(alert.alert_type, AlertType::Suspension);
        assert!(!alert.read);
        assert!(alert.detail.contains("Amara Dike"));
        assert!(alert.detail.contains("Repeated speeding"));
    }

    #[test]
    fn test_flag_and_restore() {
        let mut c = collections();
        c.set_driver_lifecycle("D2", DriverLifecycleAction::Flag, "Passenger complaints", at()).unwrap();
        assert_eq!(c.driver("D2").unwrap().driver_status, DriverStatus::Flagged);
        assert_eq!(c.alerts()[0].alert_type, AlertType::Flag);

        let restored = c
            .set_driver_lifecycle("D2", DriverLifecycleAction::Restore, "Cleared after review", at())
            .unwrap();
        assert_eq!(restored.driver_status, DriverStatus::Active);
        assert_eq!(restored.status_reason.as_deref(), Some("Cleared after review"));
        assert_eq!(c.alerts().len(), 2);
    }

    #[test]
    fn test_lifecycle_without_reason_is_rejected() {
        let mut c = collections();
        let err = c
            .set_driver_lifecycle("D1", DriverLifecycleAction::Flag, "   ", at())
            .unwrap_err();
        assert!(matches!(err, DashboardError::MissingReason(ref v) if v == "flag"));
        assert_eq!(c.driver("D1").unwrap().driver_status, DriverStatus::Active);
        assert!(c.alerts().is_empty());
    }

    #[test]
    fn test_restore_without_reason_is_rejected() {
        let mut c = collections();
        c.set_driver_lifecycle("D2", DriverLifecycleAction::Suspend, "Expired license", at()).unwrap();
        let before = c.driver("D2").unwrap().clone();

        let err = c
            .set_driver_lifecycle("D2", DriverLifecycleAction::Restore, "", at())
            .unwrap_err();
        assert!(matches!(err, DashboardError::MissingReason(ref v) if v == "restore"));
        assert_eq!(c.driver("D2").unwrap(), &before);
        assert_eq!(c.alerts().len(), 1);
    }

    #[test]
    fn test_unknown_report_and_request_ids() {
        let mut c = collections();
        let untouched = c.clone();
        let unchanged = |c: &Collections| {
            assert_eq!(c.drivers(), untouched.drivers());
            assert_eq!(c.reports(), untouched.reports());
            assert_eq!(c.requests(), untouched.requests());
            assert_eq!(c.alerts(), untouched.alerts());
        };

        let err = c.update_report_status("R9", ReportStatus::Resolved).unwrap_err();
        assert!(matches!(err, DashboardError::ReportNotFound(ref id) if id == "R9"));
        unchanged(&c);

        let err = c.respond_to_report("R9", "Looking into it", "ADMIN001", at()).unwrap_err();
        assert!(matches!(err, DashboardError::ReportNotFound(ref id) if id == "R9"));
        unchanged(&c);

        let err = c
            .decide_passenger_request("REQ999", RequestDecision::Approved, at())
            .unwrap_err();
        assert!(matches!(err, DashboardError::RequestNotFound(ref id) if id == "REQ999"));
        unchanged(&c);
    }

    #[test]
    fn test_lifecycle_unknown_driver() {
        let mut c = collections();
        let err = c
            .set_driver_lifecycle("D9", DriverLifecycleAction::Suspend, "x", at())
            .unwrap_err();
        assert!(matches!(err, DashboardError::DriverNotFound(_)));
        assert!(c.alerts().is_empty());
    }

    #[test]
    fn test_respond_moves_open_report_under_review() {
        let mut c = collections();
        let report = c
            .respond_to_report("R1", "Thanks, investigating", "ADMIN001", at())
            .unwrap();
        assert_eq!(report.status, ReportStatus::UnderReview);
        let response = report.admin_response.as_ref().unwrap();
        assert_eq!(response.message, "Thanks, investigating");
        assert_eq!(response.responder_id, "ADMIN001");
    }

    #[test]
    fn test_respond_keeps_under_review() {
        let mut c = collections();
        c.update_report_status("R1", ReportStatus::UnderReview).unwrap();
        let report = c.respond_to_report("R1", "Update", "ADMIN001", at()).unwrap();
        assert_eq!(report.status, ReportStatus::UnderReview);
    }

    #[test]
    fn test_terminal_reports_are_locked() {
        for terminal in [ReportStatus::Resolved, ReportStatus::Dismissed] {
            let mut c = collections();
            c.update_report_status("R1", terminal).unwrap();
            let before = c.report("R1").unwrap().clone();

            let err = c.update_report_status("R1", ReportStatus::Open).unwrap_err();
            assert!(matches!(err, DashboardError::InvalidTransition { .. }));
            let err = c.respond_to_report("R1", "Reopening", "ADMIN001", at()).unwrap_err();
            assert!(matches!(err, DashboardError::InvalidTransition { .. }));

            assert_eq!(c.report("R1").unwrap(), &before);
        }
    }

    #[test]
    fn test_blank_response_rejected() {
        let mut c = collections();
        let err = c.respond_to_report("R1", "  ", "ADMIN001", at()).unwrap_err();
        assert_eq!(err.field_errors(), vec![("message", "Response message is required.")]);
        assert_eq!(c.report("R1").unwrap().status, ReportStatus::Open);
    }

    #[test]
    fn test_approve_single_request() {
        let mut c = collections();
        let pending_before = c.counts().pending_requests;
        assert_eq!(pending_before, 4);

        c.decide_passenger_request("REQ002", RequestDecision::Approved, at()).unwrap();

        for r in c.requests() {
            let expected = if r.id == "REQ002" { RequestStatus::Approved } else { RequestStatus::Pending };
            assert_eq!(r.status, expected, "request {}", r.id);
        }
        assert_eq!(c.counts().pending_requests, pending_before - 1);
        assert_eq!(c.alerts()[0].alert_type, AlertType::Approval);
    }

    #[test]
    fn test_decided_request_is_terminal() {
        let mut c = collections();
        c.decide_passenger_request("REQ001", RequestDecision::Rejected, at()).unwrap();
        let before = c.request("REQ001").unwrap().clone();
        let alerts_before = c.alerts().len();

        let err = c
            .decide_passenger_request("REQ001", RequestDecision::Approved, at())
            .unwrap_err();
        assert!(matches!(err, DashboardError::InvalidTransition { .. }));
        assert_eq!(c.request("REQ001").unwrap(), &before);
        assert_eq!(c.alerts().len(), alerts_before);
    }

    #[test]
    fn test_add_driver() {
        let mut c = collections();
        let form = DriverRegistration {
            full_name: "Tunde Bakare".into(),
            email: "tunde@example.com".into(),
            phone: "0803 555 0199".into(),
            vehicle_plate: "abc-987-xy".into(),
            vehicle_model: "Toyota Corolla".into(),
            license_number: "LAG-DL-55123".into(),
            cab_company: "".into(),
            city: "Ikeja".into(),
            state: "Lagos".into(),
        };
        let driver = c.add_driver(&form, at()).unwrap();
        assert_eq!(driver.verification_status, VerificationStatus::Unverified);
        assert_eq!(driver.driver_status, DriverStatus::Active);
        assert_eq!(driver.vehicle_plate, "ABC-987-XY");
        assert_eq!(driver.cab_company, "Independent");
        assert!(driver.id.starts_with("drv-261016-"));
        assert!(driver.driver_id.starts_with("VYR-2610-"));

        assert_eq!(c.drivers().len(), 3);
        assert_eq!(c.alerts()[0].alert_type, AlertType::Verification);
    }

    #[test]
    fn test_add_driver_bad_email() {
        let mut c = collections();
        let form = DriverRegistration {
            full_name: "Tunde Bakare".into(),
            email: "tunde-at-example".into(),
            phone: "08035550199".into(),
            vehicle_plate: "ABC-987-XY".into(),
            vehicle_model: "Corolla".into(),
            license_number: "L1".into(),
            cab_company: "Vyride".into(),
            city: "Ikeja".into(),
            state: "Lagos".into(),
        };
        let err = c.add_driver(&form, at()).unwrap_err();
        assert_eq!(err.field_errors(), vec![("email", "Enter a valid email.")]);
        assert_eq!(c.drivers().len(), 2);
        assert!(c.alerts().is_empty());
    }

    #[test]
    fn test_submit_report() {
        let mut c = collections();
        let submission = ReportSubmission {
            driver_id: "D2".into(),
            passenger_id: "PSG001".into(),
            report_type: "  route deviation ".into(),
            description: "Driver took a long detour through Surulere.".into(),
        };
        let report = c.submit_report(&submission, at()).unwrap();
        assert_eq!(report.status, ReportStatus::Open);
        assert_eq!(report.report_type, "Route Deviation");
        assert!(report.id.starts_with("rpt-"));
        assert_eq!(c.counts().open_reports, 3);
        assert_eq!(c.alerts()[0].alert_type, AlertType::Report);
        assert!(c.alerts()[0].detail.contains("Emeka Okafor"));
    }

    #[test]
    fn test_submit_report_validation() {
        let mut c = collections();
        let short = ReportSubmission {
            driver_id: "D1".into(),
            passenger_id: "PSG001".into(),
            report_type: "".into(),
            description: "too short".into(),
        };
        let err = c.submit_report(&short, at()).unwrap_err();
        let fields: Vec<&str> = err.field_errors().into_iter().map(|(f, _)| f).collect();
        assert_eq!(fields, vec!["report_type", "description"]);

        let unknown = ReportSubmission { driver_id: "D9".into(), ..short };
        assert!(matches!(c.submit_report(&unknown, at()), Err(DashboardError::DriverNotFound(_))));
        assert_eq!(c.reports().len(), 2);
    }

    #[test]
    fn test_enqueue_request() {
        let mut c = collections();
        let mut fresh = request("REQ005");
        fresh.full_name = "Chioma Eze".into();
        c.enqueue_passenger_request(fresh).unwrap();
        assert_eq!(c.counts().pending_requests, 5);
        assert!(c.alerts()[0].detail.contains("Chioma Eze"));

        let dup = request("REQ005");
        assert!(c.enqueue_passenger_request(dup).is_err());

        let mut decided = request("REQ006");
        decided.status = RequestStatus::Approved;
        assert!(matches!(
            c.enqueue_passenger_request(decided),
            Err(DashboardError::InvalidTransition { .. })
        ));
    }
}
