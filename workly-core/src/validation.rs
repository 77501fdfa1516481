//! Form validation rules.
//!
//! Each rule is an independent predicate over user input that returns a
//! [`ValidationResult`] carrying a human-readable message on failure.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{WorklyError, WorklyResult};

pub const MIN_PASSWORD_LENGTH: usize = 8;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

/// Outcome of a single validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(String),
}

impl ValidationResult {
    fn invalid(message: impl Into<String>) -> Self {
        ValidationResult::Invalid(message.into())
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// The failure message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(msg) => Some(msg),
        }
    }

    /// Keep the first failure; otherwise evaluate `next`.
    pub fn and(self, next: impl FnOnce() -> ValidationResult) -> ValidationResult {
        match self {
            ValidationResult::Valid => next(),
            invalid => invalid,
        }
    }

    pub fn into_result(self) -> WorklyResult<()> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(msg) => Err(WorklyError::Validation(msg)),
        }
    }
}

/// Return the first failing result, or `Valid` if all pass.
pub fn validate_all<I>(results: I) -> ValidationResult
where
    I: IntoIterator<Item = ValidationResult>,
{
    results
        .into_iter()
        .find(|r| !r.is_valid())
        .unwrap_or(ValidationResult::Valid)
}

pub fn validate_not_empty(field: &str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        ValidationResult::invalid(format!("{} cannot be empty", field))
    } else {
        ValidationResult::Valid
    }
}

pub fn validate_email(email: &str) -> ValidationResult {
    let email = email.trim();
    if email.is_empty() {
        return ValidationResult::invalid("Email cannot be empty");
    }
    if EMAIL_RE.is_match(email) {
        ValidationResult::Valid
    } else {
        ValidationResult::invalid("Invalid email address")
    }
}

/// Password must be at least [`MIN_PASSWORD_LENGTH`] characters and mix
/// upper case, lower case, digits and special characters.
pub fn validate_password(password: &str) -> ValidationResult {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return ValidationResult::invalid(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        ));
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return ValidationResult::invalid("Password must contain an uppercase letter");
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return ValidationResult::invalid("Password must contain a lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return ValidationResult::invalid("Password must contain a digit");
    }
    if !password
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace())
    {
        return ValidationResult::invalid("Password must contain a special character");
    }
    ValidationResult::Valid
}

pub fn validate_password_match(password: &str, confirmation: &str) -> ValidationResult {
    if password == confirmation {
        ValidationResult::Valid
    } else {
        ValidationResult::invalid("Passwords do not match")
    }
}

/// Fails when `end` is before `start`. Equal instants are allowed.
pub fn validate_dates<T: PartialOrd>(start: &T, end: &T) -> ValidationResult {
    if end < start {
        ValidationResult::invalid("End time cannot be before start time")
    } else {
        ValidationResult::Valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn not_empty_rejects_blank() {
        assert!(validate_not_empty("Title", "Standup").is_valid());
        let result = validate_not_empty("Title", "   ");
        assert_eq!(result.message(), Some("Title cannot be empty"));
    }

    #[test]
    fn email_shapes() {
        assert!(validate_email("a@b.com").is_valid());
        assert!(validate_email("first.last+tag@mail.example.org").is_valid());
        assert!(validate_email("  padded@example.com ").is_valid());

        assert!(!validate_email("not-an-email").is_valid());
        assert!(!validate_email("missing@tld").is_valid());
        assert!(!validate_email("two@@example.com").is_valid());
        assert!(!validate_email("@example.com").is_valid());
        assert!(!validate_email("a@b.c").is_valid());
        assert_eq!(validate_email("").message(), Some("Email cannot be empty"));
    }

    #[test]
    fn password_strength() {
        assert!(validate_password("Abcdef1!").is_valid());

        let short = validate_password("abc");
        assert_eq!(
            short.message(),
            Some("Password must be at least 8 characters long")
        );

        assert_eq!(
            validate_password("abcdef1!").message(),
            Some("Password must contain an uppercase letter")
        );
        assert_eq!(
            validate_password("ABCDEF1!").message(),
            Some("Password must contain a lowercase letter")
        );
        assert_eq!(
            validate_password("Abcdefg!").message(),
            Some("Password must contain a digit")
        );
        assert_eq!(
            validate_password("Abcdefg1").message(),
            Some("Password must contain a special character")
        );
    }

    #[test]
    fn password_confirmation() {
        assert!(validate_password_match("Abcdef1!", "Abcdef1!").is_valid());
        assert_eq!(
            validate_password_match("Abcdef1!", "Abcdef1?").message(),
            Some("Passwords do not match")
        );
    }

    #[test]
    fn date_ordering() {
        let start = Utc.with_ymd_and_hms(2025, 3, 20, 15, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 20, 16, 0, 0).unwrap();

        assert!(validate_dates(&start, &end).is_valid());
        assert!(validate_dates(&start, &start).is_valid());
        assert_eq!(
            validate_dates(&end, &start).message(),
            Some("End time cannot be before start time")
        );
    }

    #[test]
    fn first_failure_wins() {
        let result = validate_all([
            validate_not_empty("Name", "Ada"),
            validate_email("nope"),
            validate_password("abc"),
        ]);
        assert_eq!(result.message(), Some("Invalid email address"));

        let chained = validate_not_empty("Name", "").and(|| validate_email("nope"));
        assert_eq!(chained.message(), Some("Name cannot be empty"));
    }

    #[test]
    fn into_result_maps_to_validation_error() {
        assert!(ValidationResult::Valid.into_result().is_ok());
        let err = validate_email("nope").into_result().unwrap_err();
        assert!(matches!(err, WorklyError::Validation(ref m) if m == "Invalid email address"));
    }
}
