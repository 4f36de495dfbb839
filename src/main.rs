use std::sync::Arc;

use chrono::Utc;
use vyride_admin::{
    models::{DriverLifecycleAction, ReportSubmission},
    services::{
        registration::{RegistrationField, RegistrationWizard},
        views,
    },
    AppConfig, AppState, MetricCard, MockDataSource, RequestDecision, UiAction,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    tracing_subscriber::fmt().with_max_level(config.log_level).init();
    tracing::info!(?config, "Loaded configuration");

    let mut state = AppState::new(config, Arc::new(MockDataSource::new())).await?;

    {
        let mut dashboard = state.dashboard.lock().await;

        // Passenger side: look a cab up by plate and report it.
        let driver_id = views::lookup_driver(dashboard.collections().drivers(), "ibd 552")
            .map(|d| d.id.clone())
            .ok_or("demo driver missing")?;
        dashboard.submit_report(&ReportSubmission {
            driver_id: driver_id.clone(),
            passenger_id: "PSG001".to_string(),
            report_type: "Reckless Driving".to_string(),
            description: "Overtook a danfo on the shoulder at high speed.".to_string(),
        })?;

        // New passenger signs up.
        let mut wizard = RegistrationWizard::new();
        wizard.update(RegistrationField::FullName, "Adaeze Nnamdi");
        wizard.update(RegistrationField::Email, "adaeze.nnamdi@email.com");
        wizard.update(RegistrationField::Phone, "+234 805 555 0142");
        wizard.update(RegistrationField::DateOfBirth, "1997-08-09");
        wizard.update(RegistrationField::Password, "lagos-2026");
        wizard.update(RegistrationField::ConfirmPassword, "lagos-2026");
        wizard.next()?;
        wizard.attach_selfie("selfies/adaeze.jpg");
        wizard.next()?;
        wizard.update(RegistrationField::Nin, "48213579026");
        wizard.next()?;
        let request = wizard.submit(Utc::now())?;
        dashboard.enqueue_passenger_request(request)?;

        // Admin side.
        dashboard.dispatch(UiAction::ClickMetric { card: MetricCard::VerifiedDrivers })?;
        dashboard.dispatch(UiAction::OpenDriverAction {
            driver_id,
            action: DriverLifecycleAction::Suspend,
        })?;
        dashboard.dispatch(UiAction::EditActionReason {
            reason: "Multiple reckless driving reports".to_string(),
        })?;
        dashboard.confirm_driver_action()?;
        dashboard.respond_to_report("R1", "Thanks, investigating")?;
        dashboard.decide_passenger_request("REQ002", RequestDecision::Approved)?;
    }

    state.wait_for_simulated_alert().await;

    let dashboard = state.dashboard.lock().await;
    let snapshot = dashboard.snapshot(Utc::now());
    println!("{}", snapshot.to_json()?);

    Ok(())
}
