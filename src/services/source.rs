// src/services/source.rs
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::{
    errors::{DashboardError, DashboardResult},
    models::{
        AdminResponse, AlertItem, AlertType, Driver, DriverStatus, MonthlyTrendPoint,
        PassengerRequest, Report, ReportStatus, RequestStatus, SystemMetrics, VerificationStatus,
        WeeklyTrendPoint,
    },
    services::reducer::Collections,
};

/// Supplies the initial collections for a session. Persistence lives
/// behind this trait; the dashboard only ever reads from it once, at load.
#[async_trait]
pub trait DashboardSource: Send + Sync {
    async fn load_drivers(&self) -> DashboardResult<Vec<Driver>>;
    async fn load_reports(&self) -> DashboardResult<Vec<Report>>;
    async fn load_passenger_requests(&self) -> DashboardResult<Vec<PassengerRequest>>;
    async fn load_alerts(&self) -> DashboardResult<Vec<AlertItem>>;
    async fn load_metrics(&self) -> DashboardResult<SystemMetrics>;
}

pub async fn load_collections(source: &dyn DashboardSource) -> DashboardResult<(Collections, SystemMetrics)> {
    let drivers = source.load_drivers().await?;
    let reports = source.load_reports().await?;
    let requests = source.load_passenger_requests().await?;
    let alerts = source.load_alerts().await?;
    let metrics = source.load_metrics().await?;

    for report in reports.iter().filter(|r| !drivers.iter().any(|d| d.id == r.driver_id)) {
        tracing::warn!(report_id = %report.id, driver_id = %report.driver_id, "Report references unknown driver");
    }
    tracing::info!(
        drivers = drivers.len(),
        reports = reports.len(),
        requests = requests.len(),
        alerts = alerts.len(),
        "Dashboard data loaded"
    );

    Ok((Collections::new(drivers, reports, requests, alerts), metrics))
}

fn timestamp(value: &str) -> DashboardResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DashboardError::Source(format!("Invalid date/time '{}': {}", value, e)))
}

fn date(value: &str) -> DashboardResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| DashboardError::Source(format!("Invalid date '{}': {}", value, e)))
}

/// Built-in demo data standing in for the document store.
#[derive(Debug, Clone, Default)]
pub struct MockDataSource;

impl MockDataSource {
    pub fn new() -> Self {
        Self
    }

    #[allow(clippy::too_many_arguments)]
    fn driver(
        id: &str,
        driver_id: &str,
        full_name: &str,
        license: &str,
        plate: &str,
        model: &str,
        company: &str,
        city: &str,
        state: &str,
        status: VerificationStatus,
        last_verified: &str,
    ) -> DashboardResult<Driver> {
        let handle = full_name.to_lowercase().replace(' ', ".");
        Ok(Driver {
            id: id.to_string(),
            driver_id: driver_id.to_string(),
            full_name: full_name.to_string(),
            photo: format!("/drivers/{}.jpg", id.to_lowercase()),
            license_number: license.to_string(),
            vehicle_plate: plate.to_string(),
            vehicle_model: model.to_string(),
            cab_company: company.to_string(),
            state: state.to_string(),
            city: city.to_string(),
            email: Some(format!("{}@vyride.ng", handle)),
            phone: Some(format!("+234 803 555 01{:0>2}", id.trim_start_matches('D'))),
            verification_status: status,
            last_verified_date: date(last_verified)?,
            driver_status: DriverStatus::Active,
            status_reason: None,
            status_changed_at: None,
        })
    }

    fn report(
        id: &str,
        driver_id: &str,
        passenger_id: &str,
        report_type: &str,
        description: &str,
        created_at: &str,
        status: ReportStatus,
    ) -> DashboardResult<Report> {
        Ok(Report {
            id: id.to_string(),
            driver_id: driver_id.to_string(),
            passenger_id: passenger_id.to_string(),
            report_type: report_type.to_string(),
            description: description.to_string(),
            created_at: timestamp(created_at)?,
            status,
            admin_response: None,
        })
    }

    fn request(
        id: &str,
        passenger_id: &str,
        full_name: &str,
        phone: &str,
        dob: &str,
        nin_tail: &str,
        submitted_at: &str,
    ) -> DashboardResult<PassengerRequest> {
        let handle = full_name.to_lowercase().replace(' ', ".");
        Ok(PassengerRequest {
            id: id.to_string(),
            passenger_id: passenger_id.to_string(),
            full_name: full_name.to_string(),
            email: format!("{}@email.com", handle),
            phone: phone.to_string(),
            date_of_birth: date(dob)?,
            nin_redacted: format!("********{}", nin_tail),
            selfie_ref: format!("selfies/{}.jpg", passenger_id.to_lowercase()),
            submitted_at: timestamp(submitted_at)?,
            status: RequestStatus::Pending,
            decided_at: None,
        })
    }
}

#[async_trait]
impl DashboardSource for MockDataSource {
    async fn load_drivers(&self) -> DashboardResult<Vec<Driver>> {
        use VerificationStatus::*;
        Ok(vec![
            Self::driver("D1", "VYR-0001", "Amara Dike", "LAG-DL-20931", "LND-123-GH", "Toyota Camry 2018", "Vyride Cabs", "Ikeja", "Lagos", Verified, "2026-08-14")?,
            Self::driver("D2", "VYR-0002", "Emeka Okafor", "LAG-DL-33817", "KJA-234-AB", "Honda Accord 2016", "Vyride Cabs", "Lekki", "Lagos", Verified, "2026-07-02")?,
            Self::driver("D3", "VYR-0003", "Bola Adeyemi", "OYO-DL-11902", "IBD-552-XT", "Toyota Corolla 2015", "Metro Rides", "Ibadan", "Oyo", Unverified, "2026-03-21")?,
            Self::driver("D4", "VYR-0004", "Musa Bello", "FCT-DL-48220", "ABJ-771-KT", "Kia Rio 2019", "Capital Cabs", "Garki", "FCT", Verified, "2026-09-30")?,
            Self::driver("D5", "VYR-0005", "Ngozi Nwosu", "ENU-DL-07764", "ENU-908-PL", "Hyundai Elantra 2014", "Metro Rides", "Enugu", "Enugu", Rejected, "2026-01-11")?,
            Self::driver("D6", "VYR-0006", "Chinedu Obi", "RIV-DL-61539", "PHC-315-RV", "Toyota Sienna 2012", "Garden City Taxis", "Port Harcourt", "Rivers", Unverified, "2026-05-18")?,
        ])
    }

    async fn load_reports(&self) -> DashboardResult<Vec<Report>> {
        let mut reports = vec![
            Self::report("R1", "D3", "PSG001", "Reckless Driving", "Driver ran two red lights on Allen Avenue and ignored requests to slow down.", "2026-10-12T18:42:00Z", ReportStatus::Open)?,
            Self::report("R2", "D5", "PSG002", "Overcharging / Fare Dispute", "Charged nearly double the quoted fare at drop-off.", "2026-10-10T08:15:00Z", ReportStatus::Open)?,
            Self::report("R3", "D2", "PSG001", "Route Deviation", "Took an unfamiliar route through a poorly lit area without explanation.", "2026-10-05T21:03:00Z", ReportStatus::UnderReview)?,
            Self::report("R4", "D6", "PSG003", "Vehicle Condition", "Back door would not close properly and seatbelts were missing.", "2026-09-28T13:30:00Z", ReportStatus::Resolved)?,
            Self::report("R5", "D1", "PSG004", "Unprofessional Behaviour", "Driver was on a phone call for the entire trip.", "2026-09-20T10:00:00Z", ReportStatus::Dismissed)?,
        ];
        reports[2].admin_response = Some(AdminResponse {
            message: "Thank you. We have contacted the driver and are reviewing trip GPS data.".to_string(),
            responded_at: timestamp("2026-10-06T09:20:00Z")?,
            responder_id: "ADMIN001".to_string(),
        });
        Ok(reports)
    }

    async fn load_passenger_requests(&self) -> DashboardResult<Vec<PassengerRequest>> {
        Ok(vec![
            Self::request("REQ001", "PSG010", "Chioma Eze", "+234 803 555 0110", "1995-04-02", "418", "2026-10-15T07:12:00Z")?,
            Self::request("REQ002", "PSG011", "Ibrahim Yusuf", "+234 806 555 0111", "1989-11-23", "207", "2026-10-15T09:40:00Z")?,
            Self::request("REQ003", "PSG012", "Funke Akindele", "+234 809 555 0112", "1992-06-15", "933", "2026-10-14T16:05:00Z")?,
            Self::request("REQ004", "PSG013", "Tobi Lawal", "+234 802 555 0113", "2000-01-30", "561", "2026-10-13T11:58:00Z")?,
        ])
    }

    async fn load_alerts(&self) -> DashboardResult<Vec<AlertItem>> {
        let now = Utc::now();
        Ok(vec![
            AlertItem::new(AlertType::Report, "New report filed", "Reckless Driving reported against Bola Adeyemi", now - Duration::minutes(2)),
            AlertItem::new(AlertType::Verification, "New passenger awaiting verification", "Chioma Eze submitted a selfie and NIN for review", now - Duration::minutes(15)),
            AlertItem::new(AlertType::Flag, "Driver flagged for review", "Ngozi Nwosu has 3 open complaints this month", now - Duration::hours(1)),
        ])
    }

    async fn load_metrics(&self) -> DashboardResult<SystemMetrics> {
        let week = |w: &str, flagged, reports| WeeklyTrendPoint { week: w.to_string(), flagged, reports };
        let month = |m: &str, flagged, reports, passengers, drivers| MonthlyTrendPoint {
            month: m.to_string(),
            flagged,
            reports,
            passengers: Some(passengers),
            drivers: Some(drivers),
        };

        Ok(SystemMetrics {
            total_passengers: 12_480,
            total_drivers: 3_215,
            verified_drivers: 2_687,
            verified_percentage: 83.6,
            reports_submitted: 342,
            flagged_drivers: 47,
            weekly_trend: vec![
                week("Wk 1", 9, 61),
                week("Wk 2", 14, 88),
                week("Wk 3", 11, 79),
                week("Wk 4", 13, 114),
            ],
            monthly_trend: vec![
                month("May", 21, 180, 8_900, 2_410),
                month("Jun", 18, 204, 9_650, 2_600),
                month("Jul", 25, 231, 10_300, 2_790),
                month("Aug", 30, 266, 11_020, 2_930),
                month("Sep", 41, 298, 11_800, 3_080),
                month("Oct", 47, 342, 12_480, 3_215),
            ],
        })
    }
}
