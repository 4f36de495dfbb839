// src/services/feed.rs
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{DashboardError, DashboardResult},
    models::{AlertItem, AlertType},
};

/// Most-recent-first alert list. Alerts are only ever prepended and only
/// their `read` flag ever changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationFeed {
    alerts: Vec<AlertItem>,
}

impl NotificationFeed {
    /// Build from seed alerts, newest first.
    pub fn new(mut alerts: Vec<AlertItem>) -> Self {
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self { alerts }
    }

    pub fn push(&mut self, alert: AlertItem) -> &AlertItem {
        tracing::info!(alert_id = %alert.id, alert_type = ?alert.alert_type, "Alert raised: {}", alert.title);
        self.alerts.insert(0, alert);
        &self.alerts[0]
    }

    pub fn alerts(&self) -> &[AlertItem] {
        &self.alerts
    }

    pub fn unread_count(&self) -> usize {
        self.alerts.iter().filter(|a| !a.read).count()
    }

    /// Mark one alert read. Already-read alerts are left as they are.
    pub fn dismiss(&mut self, alert_id: &str) -> DashboardResult<()> {
        let alert = self
            .alerts
            .iter_mut()
            .find(|a| a.id == alert_id)
            .ok_or_else(|| DashboardError::AlertNotFound(alert_id.to_string()))?;

        if !alert.read {
            alert.read = true;
            tracing::debug!(alert_id, "Alert dismissed");
        }
        Ok(())
    }

    /// Mark every alert read; returns how many flipped.
    pub fn dismiss_all(&mut self) -> usize {
        let mut flipped = 0;
        for alert in self.alerts.iter_mut().filter(|a| !a.read) {
            alert.read = true;
            flipped += 1;
        }
        tracing::debug!(flipped, "All alerts dismissed");
        flipped
    }
}

/// The single simulated "live" alert injected some time after load.
///
/// Fires at most once; `cancel` disarms it. Time is passed in so callers
/// (and tests) decide when it is due.
#[derive(Debug, Clone)]
pub struct ScheduledAlert {
    due_at: DateTime<Utc>,
    pending: Option<AlertItem>,
}

impl ScheduledAlert {
    pub fn new(loaded_at: DateTime<Utc>, delay: Duration, alert: AlertItem) -> Self {
        Self {
            due_at: loaded_at + delay,
            pending: Some(alert),
        }
    }

    /// The demo alert: a fresh passenger report coming in.
    pub fn simulated_report(loaded_at: DateTime<Utc>, delay: Duration) -> Self {
        let alert = AlertItem::new(
            AlertType::Report,
            "New report filed",
            "A passenger reported Route Deviation on a Lagos trip",
            loaded_at + delay,
        );
        Self::new(loaded_at, delay, alert)
    }

    pub fn due_at(&self) -> DateTime<Utc> {
        self.due_at
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            tracing::debug!("Simulated alert cancelled");
        }
    }

    /// Hand over the alert once `now` reaches the due time.
    pub fn fire_if_due(&mut self, now: DateTime<Utc>) -> Option<AlertItem> {
        if now < self.due_at {
            return None;
        }
        self.pending.take()
    }

    /// Hand over the alert regardless of time.
    pub fn fire_now(&mut self) -> Option<AlertItem> {
        self.pending.take()
    }
}
