// src/utils/mod.rs
pub mod id_generator;
pub mod validation;
