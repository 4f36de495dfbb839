// src/state.rs
use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tokio::{sync::Mutex, task::JoinHandle};

use crate::{
    errors::{DashboardError, DashboardResult},
    services::{
        dashboard::Dashboard,
        feed::ScheduledAlert,
        source::{load_collections, DashboardSource},
    },
};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub simulated_alert_enabled: bool,
    pub simulated_alert_delay: Duration,
    pub responder_id: String,
    pub log_level: tracing::Level,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            simulated_alert_enabled: true,
            simulated_alert_delay: Duration::from_secs(8),
            responder_id: "ADMIN001".to_string(),
            log_level: tracing::Level::INFO,
        }
    }
}

impl AppConfig {
    /// Read `VYRIDE_*` variables, falling back to defaults for unset ones.
    pub fn from_env() -> DashboardResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DashboardResult<Self> {
        let mut config = Self::default();

        if let Some(value) = lookup("VYRIDE_SIMULATED_ALERT_ENABLED") {
            config.simulated_alert_enabled = value
                .trim()
                .parse()
                .map_err(|_| invalid("VYRIDE_SIMULATED_ALERT_ENABLED", &value))?;
        }
        if let Some(value) = lookup("VYRIDE_SIMULATED_ALERT_DELAY_SECS") {
            let secs: u64 = value
                .trim()
                .parse()
                .map_err(|_| invalid("VYRIDE_SIMULATED_ALERT_DELAY_SECS", &value))?;
            config.simulated_alert_delay = Duration::from_secs(secs);
        }
        if let Some(value) = lookup("VYRIDE_RESPONDER_ID") {
            if value.trim().is_empty() {
                return Err(invalid("VYRIDE_RESPONDER_ID", &value));
            }
            config.responder_id = value.trim().to_string();
        }
        if let Some(value) = lookup("VYRIDE_LOG_LEVEL") {
            config.log_level = value.trim().parse().map_err(|_| invalid("VYRIDE_LOG_LEVEL", &value))?;
        }

        Ok(config)
    }
}

fn invalid(key: &str, value: &str) -> DashboardError {
    DashboardError::Configuration(format!("Invalid value '{}' for {}", value, key))
}

/// Handle on the one-shot simulated alert task. Dropping it aborts the task.
#[derive(Debug)]
pub struct AlertTimer {
    handle: Option<JoinHandle<()>>,
}

impl AlertTimer {
    /// Wait for the timer to fire and deliver its alert.
    pub async fn finished(mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    tracing::error!("Simulated alert task failed: {}", e);
                }
            }
        }
    }
}

impl Drop for AlertTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

pub struct AppState {
    pub dashboard: Arc<Mutex<Dashboard>>,
    pub config: AppConfig,
    alert_timer: Option<AlertTimer>,
}

impl AppState {
    pub async fn new(config: AppConfig, source: Arc<dyn DashboardSource>) -> DashboardResult<Self> {
        let (collections, metrics) = load_collections(source.as_ref()).await?;
        let dashboard = Arc::new(Mutex::new(Dashboard::new(
            collections,
            metrics,
            config.responder_id.clone(),
        )));

        let alert_timer = if config.simulated_alert_enabled {
            Some(Self::arm_simulated_alert(&dashboard, config.simulated_alert_delay).await?)
        } else {
            tracing::info!("Simulated alert disabled");
            None
        };

        Ok(Self {
            dashboard,
            config,
            alert_timer,
        })
    }

    async fn arm_simulated_alert(dashboard: &Arc<Mutex<Dashboard>>, delay: Duration) -> DashboardResult<AlertTimer> {
        let chrono_delay = chrono::Duration::from_std(delay)
            .map_err(|e| DashboardError::Configuration(format!("Alert delay out of range: {}", e)))?;
        let scheduled = ScheduledAlert::simulated_report(Utc::now(), chrono_delay);
        let due_at = scheduled.due_at();
        dashboard.lock().await.schedule_alert(scheduled)?;

        let dashboard = Arc::clone(dashboard);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let delivered = dashboard.lock().await.deliver_due_alert(due_at.max(Utc::now()));
            tracing::info!(delivered, "Simulated alert timer fired");
        });

        Ok(AlertTimer { handle: Some(handle) })
    }

    /// Disarm the simulated alert if it has not fired yet.
    pub async fn cancel_simulated_alert(&mut self) {
        self.alert_timer.take();
        self.dashboard.lock().await.cancel_scheduled_alert();
    }

    /// Wait until the simulated alert has been delivered (no-op when disarmed).
    pub async fn wait_for_simulated_alert(&mut self) {
        if let Some(timer) = self.alert_timer.take() {
            timer.finished().await;
        }
    }
}
