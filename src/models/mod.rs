// src/models/mod.rs
pub mod alert;
pub mod driver;
pub mod metrics;
pub mod passenger;
pub mod report;

pub use alert::*;
pub use driver::*;
pub use metrics::*;
pub use passenger::*;
pub use report::*;
