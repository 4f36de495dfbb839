// src/services/mod.rs
pub mod dashboard;
pub mod feed;
pub mod reducer;
pub mod registration;
pub mod source;
pub mod views;
