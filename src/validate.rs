//! Input schema for login and registration forms.
//!
//! SYSTEM CONTEXT
//! ==============
//! The auth gateway runs these checks before any network call; a failure
//! short-circuits the flow with a [`ValidationError`] and the backend is
//! never contacted.

use std::sync::LazyLock;

use regex::Regex;
use time::Date;
use time::macros::format_description;

use crate::backend::{LoginRequest, RecruiterRegisterRequest, TalentRegisterRequest};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const PASSWORD_SPECIALS: &str = "!@#$%^&*";
pub const PHONE_DIGITS: usize = 10;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("email pattern compiles"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Password must be at least 8 characters")]
    PasswordTooShort,
    #[error("Password must contain at least one uppercase letter")]
    PasswordMissingUppercase,
    #[error("Password must contain at least one number")]
    PasswordMissingDigit,
    #[error("Password must contain at least one special character (!@#$%^&*)")]
    PasswordMissingSpecial,
    #[error("Phone number must be exactly 10 digits")]
    InvalidPhoneNumber,
    #[error("Date of birth must be a past date in YYYY-MM-DD format")]
    InvalidDateOfBirth,
    #[error("Passwords do not match")]
    PasswordMismatch,
}

impl ValidationError {
    /// Form field the error belongs to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::Required { field } => *field,
            Self::InvalidEmail => "email",
            Self::PasswordTooShort
            | Self::PasswordMissingUppercase
            | Self::PasswordMissingDigit
            | Self::PasswordMissingSpecial => "password",
            Self::InvalidPhoneNumber => "phoneNumber",
            Self::InvalidDateOfBirth => "dateOfBirth",
            Self::PasswordMismatch => "confirmPassword",
        }
    }
}

// =============================================================================
// FIELD RULES
// =============================================================================

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(trimmed.to_owned())
}

/// Trimmed, syntactically valid address.
///
/// # Errors
///
/// [`ValidationError::Required`] when blank, [`ValidationError::InvalidEmail`] otherwise.
pub fn email(value: &str) -> Result<String, ValidationError> {
    let value = required("email", value)?;
    if !EMAIL_PATTERN.is_match(&value) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(value)
}

/// Passwords are never trimmed; whitespace is part of the secret.
///
/// # Errors
///
/// The first rule the password breaks: length, uppercase, digit, then special character.
pub fn password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Required { field: "password" });
    }
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    if !value.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::PasswordMissingUppercase);
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::PasswordMissingDigit);
    }
    if !value.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
        return Err(ValidationError::PasswordMissingSpecial);
    }
    Ok(())
}

/// # Errors
///
/// [`ValidationError::InvalidPhoneNumber`] unless the value is exactly ten ASCII digits.
pub fn phone_number(value: &str) -> Result<String, ValidationError> {
    let value = required("phoneNumber", value)?;
    if value.len() != PHONE_DIGITS || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidPhoneNumber);
    }
    Ok(value)
}

/// `YYYY-MM-DD`, strictly before `today`.
///
/// # Errors
///
/// [`ValidationError::InvalidDateOfBirth`] for an unparseable, current or future date.
pub fn date_of_birth(value: &str, today: Date) -> Result<String, ValidationError> {
    let value = required("dateOfBirth", value)?;
    let date =
        Date::parse(&value, format_description!("[year]-[month]-[day]")).map_err(|_| ValidationError::InvalidDateOfBirth)?;
    if date >= today {
        return Err(ValidationError::InvalidDateOfBirth);
    }
    Ok(value)
}

fn confirmed(password_value: &str, confirm: &str) -> Result<(), ValidationError> {
    if password_value != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

fn today() -> Date {
    time::OffsetDateTime::now_utc().date()
}

// =============================================================================
// FORMS
// =============================================================================

/// Raw login form input.
#[derive(Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }

    /// Check the form and build the backend request.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found, checking fields in form order.
    pub fn validate(&self) -> Result<LoginRequest, ValidationError> {
        let email = email(&self.email)?;
        password(&self.password)?;
        Ok(LoginRequest { email, password: self.password.clone() })
    }
}

/// Raw talent sign-up form input.
#[derive(Clone, Default)]
pub struct TalentSignupForm {
    pub fname: String,
    pub lname: String,
    pub email: String,
    pub phone_number: String,
    pub date_of_birth: String,
    pub password: String,
    pub confirm_password: String,
}

impl TalentSignupForm {
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found, checking fields in form order.
    pub fn validate(&self) -> Result<TalentRegisterRequest, ValidationError> {
        self.validate_on(today())
    }

    pub(crate) fn validate_on(&self, today: Date) -> Result<TalentRegisterRequest, ValidationError> {
        let fname = required("fname", &self.fname)?;
        let lname = required("lname", &self.lname)?;
        let email = email(&self.email)?;
        let phone_number = phone_number(&self.phone_number)?;
        let date_of_birth = date_of_birth(&self.date_of_birth, today)?;
        password(&self.password)?;
        confirmed(&self.password, &self.confirm_password)?;
        Ok(TalentRegisterRequest { fname, lname, email, phone_number, date_of_birth, password: self.password.clone() })
    }
}

/// Raw recruiter sign-up form input.
#[derive(Clone, Default)]
pub struct RecruiterSignupForm {
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub confirm_password: String,
}

impl RecruiterSignupForm {
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found, checking fields in form order.
    pub fn validate(&self) -> Result<RecruiterRegisterRequest, ValidationError> {
        let company_name = required("companyName", &self.company_name)?;
        let contact_name = required("contactName", &self.contact_name)?;
        let email = email(&self.email)?;
        let phone_number = phone_number(&self.phone_number)?;
        password(&self.password)?;
        confirmed(&self.password, &self.confirm_password)?;
        Ok(RecruiterRegisterRequest { company_name, contact_name, email, phone_number, password: self.password.clone() })
    }
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
