// src/utils/validation.rs
//! Client-side form checks shared by the add-driver form, the passenger
//! report form and the registration wizard.

use regex::Regex;
use std::sync::LazyLock;

use crate::errors::{DashboardError, DashboardResult, ValidationError};
use crate::models::DriverRegistration;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

pub const MIN_PHONE_DIGITS: usize = 10;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email.trim())
}

pub fn phone_digit_count(phone: &str) -> usize {
    phone.chars().filter(|c| c.is_ascii_digit()).count()
}

/// Accumulates field-level errors so a form can show all of them at once.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<ValidationError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
        self.check(!value.trim().is_empty(), field, message)
    }

    pub fn check(&mut self, ok: bool, field: &str, message: &str) -> &mut Self {
        if !ok && !self.errors.iter().any(|e| e.field == field) {
            self.errors.push(ValidationError::new(field, message));
        }
        self
    }

    pub fn finish(self) -> DashboardResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(DashboardError::ValidationFailed(self.errors))
        }
    }
}

pub fn validate_driver_registration(form: &DriverRegistration) -> DashboardResult<()> {
    let mut errors = FieldErrors::new();
    errors
        .require("full_name", &form.full_name, "Full name is required.")
        .check(is_valid_email(&form.email), "email", "Enter a valid email.")
        .check(
            phone_digit_count(&form.phone) >= MIN_PHONE_DIGITS,
            "phone",
            "Enter a valid phone number.",
        )
        .require("vehicle_plate", &form.vehicle_plate, "Plate number is required.")
        .require("vehicle_model", &form.vehicle_model, "Vehicle model is required.")
        .require("license_number", &form.license_number, "License number is required.")
        .require("city", &form.city, "City is required.")
        .require("state", &form.state, "State is required.");
    errors.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> DriverRegistration {
        DriverRegistration {
            full_name: "Tunde Bakare".into(),
            email: "tunde@example.com".into(),
            phone: "+234 803 555 0199".into(),
            vehicle_plate: "ABC-987-XY".into(),
            vehicle_model: "Toyota Corolla 2015".into(),
            license_number: "LAG-DL-55123".into(),
            cab_company: String::new(),
            city: "Ikeja".into(),
            state: "Lagos".into(),
        }
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("  amara.dike@vyride.ng "));
        assert!(!is_valid_email("amara@vyride"));
        assert!(!is_valid_email("amara dike@vyride.ng"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_complete_form_passes() {
        assert!(validate_driver_registration(&complete_form()).is_ok());
    }

    #[test]
    fn test_malformed_email_is_field_error() {
        let mut form = complete_form();
        form.email = "not-an-email".into();
        let err = validate_driver_registration(&form).unwrap_err();
        assert_eq!(err.field_errors(), vec![("email", "Enter a valid email.")]);
    }

    #[test]
    fn test_empty_form_reports_every_required_field() {
        let err = validate_driver_registration(&DriverRegistration::default()).unwrap_err();
        let fields: Vec<&str> = err.field_errors().into_iter().map(|(f, _)| f).collect();
        assert_eq!(
            fields,
            vec![
                "full_name",
                "email",
                "phone",
                "vehicle_plate",
                "vehicle_model",
                "license_number",
                "city",
                "state"
            ]
        );
    }
}
