pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use errors::{DashboardError, DashboardResult, ValidationError};
pub use services::dashboard::{Dashboard, DashboardSnapshot, MetricCard, Panel, Tab, UiAction, UiState};
pub use services::reducer::{Collections, RequestDecision};
pub use services::source::{DashboardSource, MockDataSource};
pub use state::{AppConfig, AppState};
