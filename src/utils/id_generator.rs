// src/utils/id_generator.rs
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdType {
    Driver,
    Report,
    Request,
    Passenger,
}

impl IdType {
    pub fn to_prefix(&self) -> &'static str {
        match self {
            IdType::Driver => "drv",
            IdType::Report => "rpt",
            IdType::Request => "req",
            IdType::Passenger => "psg",
        }
    }
}

pub struct IdGenerator;

impl IdGenerator {
    /// Generate a unique ID with format: {prefix}-{yymmdd}-{5 char suffix}
    pub fn generate_with_timestamp(id_type: IdType, timestamp: DateTime<Utc>) -> String {
        let date_part = timestamp.format("%y%m%d");
        let random_suffix = Self::generate_random_suffix();

        format!("{}-{}-{}", id_type.to_prefix(), date_part, random_suffix)
    }

    /// Public badge number printed on a driver's card, e.g. `VYR-2610-K3F9`.
    pub fn generate_badge(timestamp: DateTime<Utc>) -> String {
        let date_part = timestamp.format("%y%m");
        let suffix = Self::generate_from_chars(BADGE_CHARS, 4);

        format!("VYR-{}-{}", date_part, suffix)
    }

    // 50/50: 3 hex + 2 alphanumeric, or 3 alphanumeric + 2 hex
    fn generate_random_suffix() -> String {
        if rand::random::<bool>() {
            format!(
                "{}{}",
                Self::generate_from_chars(HEX_CHARS, 3),
                Self::generate_from_chars(ALPHANUMERIC_CHARS, 2)
            )
        } else {
            format!(
                "{}{}",
                Self::generate_from_chars(ALPHANUMERIC_CHARS, 3),
                Self::generate_from_chars(HEX_CHARS, 2)
            )
        }
    }

    fn generate_from_chars(charset: &[u8], n: usize) -> String {
        let mut rng = rand::rng();
        (0..n)
            .map(|_| charset[rng.random_range(0..charset.len())] as char)
            .collect()
    }

}

const HEX_CHARS: &[u8] = b"0123456789abcdef";
const ALPHANUMERIC_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const BADGE_CHARS: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
