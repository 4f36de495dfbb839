// src/services/registration.rs
//! Four-step passenger sign-up: account details, selfie, NIN, review.
//! A finished wizard yields a pending [`PassengerRequest`] for admins.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{DashboardError, DashboardResult, ValidationError},
    models::{redact_nin, PassengerRequest, RequestStatus},
    utils::{
        id_generator::{IdGenerator, IdType},
        validation::{is_valid_email, phone_digit_count, FieldErrors, MIN_PHONE_DIGITS},
    },
};

pub const NIN_LENGTH: usize = 11;
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Account,
    Selfie,
    Identity,
    Review,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::Account => 1,
            WizardStep::Selfie => 2,
            WizardStep::Identity => 3,
            WizardStep::Review => 4,
        }
    }

    fn next(self) -> Self {
        match self {
            WizardStep::Account => WizardStep::Selfie,
            WizardStep::Selfie => WizardStep::Identity,
            WizardStep::Identity | WizardStep::Review => WizardStep::Review,
        }
    }

    fn previous(self) -> Self {
        match self {
            WizardStep::Account | WizardStep::Selfie => WizardStep::Account,
            WizardStep::Identity => WizardStep::Selfie,
            WizardStep::Review => WizardStep::Identity,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationField {
    FullName,
    Email,
    Phone,
    DateOfBirth,
    Password,
    ConfirmPassword,
    Nin,
}

impl RegistrationField {
    pub fn key(&self) -> &'static str {
        match self {
            RegistrationField::FullName => "full_name",
            RegistrationField::Email => "email",
            RegistrationField::Phone => "phone",
            RegistrationField::DateOfBirth => "dob",
            RegistrationField::Password => "password",
            RegistrationField::ConfirmPassword => "confirm_password",
            RegistrationField::Nin => "nin",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct RegistrationForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub dob: String,            // yyyy-mm-dd as entered
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_serializing)]
    pub confirm_password: String,
    pub nin: String,            // digits only, at most 11
    pub selfie: Option<String>, // reference returned by the capture collaborator
}

#[derive(Debug, Default)]
pub struct RegistrationWizard {
    step: WizardStep,
    form: RegistrationForm,
    errors: Vec<ValidationError>,
    submitted: bool,
}

impl RegistrationWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Set a field and clear any error shown against it.
    pub fn update(&mut self, field: RegistrationField, value: &str) {
        let slot = match field {
            RegistrationField::FullName => &mut self.form.full_name,
            RegistrationField::Email => &mut self.form.email,
            RegistrationField::Phone => &mut self.form.phone,
            RegistrationField::DateOfBirth => &mut self.form.dob,
            RegistrationField::Password => &mut self.form.password,
            RegistrationField::ConfirmPassword => &mut self.form.confirm_password,
            RegistrationField::Nin => &mut self.form.nin,
        };
        *slot = if field == RegistrationField::Nin {
            value.chars().filter(|c| c.is_ascii_digit()).take(NIN_LENGTH).collect()
        } else {
            value.to_string()
        };
        self.errors.retain(|e| e.field != field.key());
    }

    pub fn attach_selfie(&mut self, reference: impl Into<String>) {
        self.form.selfie = Some(reference.into());
        self.errors.retain(|e| e.field != "selfie");
    }

    pub fn retake_selfie(&mut self) {
        self.form.selfie = None;
    }

    /// Validate the current step and advance on success.
    pub fn next(&mut self) -> DashboardResult<WizardStep> {
        self.check(self.step)?;
        self.step = self.step.next();
        tracing::debug!(step = self.step.number(), "Registration advanced");
        Ok(self.step)
    }

    pub fn back(&mut self) -> WizardStep {
        self.step = self.step.previous();
        self.step
    }

    /// Re-check every step and produce the pending verification request.
    pub fn submit(&mut self, at: DateTime<Utc>) -> DashboardResult<PassengerRequest> {
        if self.step != WizardStep::Review {
            return Err(DashboardError::validation_error("step", "Complete every step before submitting."));
        }
        if self.submitted {
            return Err(DashboardError::validation_error("step", "Registration already submitted."));
        }
        for step in [WizardStep::Account, WizardStep::Selfie, WizardStep::Identity] {
            if let Err(err) = self.check(step) {
                self.step = step;
                return Err(err);
            }
        }

        let dob = parse_dob(&self.form.dob).ok_or_else(|| {
            DashboardError::validation_error("dob", "Date of birth is required.")
        })?;
        let selfie_ref = self.form.selfie.clone().unwrap_or_default();
        let request = PassengerRequest {
            id: IdGenerator::generate_with_timestamp(IdType::Request, at),
            passenger_id: IdGenerator::generate_with_timestamp(IdType::Passenger, at),
            full_name: self.form.full_name.trim().to_string(),
            email: self.form.email.trim().to_string(),
            phone: self.form.phone.trim().to_string(),
            date_of_birth: dob,
            nin_redacted: redact_nin(&self.form.nin),
            selfie_ref,
            submitted_at: at,
            status: RequestStatus::Pending,
            decided_at: None,
        };
        self.submitted = true;
        tracing::info!(request_id = %request.id, "Passenger registration submitted");

        Ok(request)
    }

    fn check(&mut self, step: WizardStep) -> DashboardResult<()> {
        let form = &self.form;
        let mut errors = FieldErrors::new();
        match step {
            WizardStep::Account => {
                errors
                    .require("full_name", &form.full_name, "Full name is required.")
                    .check(is_valid_email(&form.email), "email", "Enter a valid email.")
                    .check(
                        phone_digit_count(&form.phone) >= MIN_PHONE_DIGITS,
                        "phone",
                        "Enter a valid phone number.",
                    )
                    .check(parse_dob(&form.dob).is_some(), "dob", "Date of birth is required.")
                    .check(
                        form.password.chars().count() >= MIN_PASSWORD_LENGTH,
                        "password",
                        "Password must be at least 8 characters.",
                    )
                    .check(
                        form.password == form.confirm_password,
                        "confirm_password",
                        "Passwords do not match.",
                    );
            }
            WizardStep::Selfie => {
                errors.check(form.selfie.is_some(), "selfie", "Please take or upload a selfie.");
            }
            WizardStep::Identity => {
                errors.check(form.nin.len() == NIN_LENGTH, "nin", "NIN must be exactly 11 digits.");
            }
            WizardStep::Review => {}
        }

        let result = errors.finish();
        self.errors = match &result {
            Err(DashboardError::ValidationFailed(list)) => list.clone(),
            _ => Vec::new(),
        };
        result
    }
}

fn parse_dob(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}
