// Common validation types, field validators and the Validatable trait

use regex::Regex;
use std::fmt::Display;

/// Ordered accumulator of validation messages for one validation pass
pub type ValidationErrors = Vec<String>;

/// Outcome of one validation pass
///
/// Success is derived from the error list, so a result is successful
/// exactly when it carries no errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: ValidationErrors,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn failure(errors: ValidationErrors) -> Self {
        Self { errors }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_errors(self) -> ValidationErrors {
        self.errors
    }
}

/// Aggregate validation failure carrying every field violation in order
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Validation failed: {}", .errors.join("; "))]
pub struct ValidationError {
    pub errors: ValidationErrors,
}

/// Anything that can check itself into an error accumulator
pub trait Validatable {
    /// Appends violations to `errors` and returns whether `errors` is empty afterwards
    fn validate(&self, errors: &mut ValidationErrors) -> bool;

    fn validation_result(&self) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        if self.validate(&mut errors) {
            ValidationResult::success()
        } else {
            ValidationResult::failure(errors)
        }
    }

    /// Runs a full pass and fails with every collected message
    fn validate_and_raise(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationErrors::new();
        if self.validate(&mut errors) {
            Ok(())
        } else {
            Err(ValidationError { errors })
        }
    }
}

// ============================================================================
// Field Validators
// ============================================================================

/// Label used in messages: the last dot-separated segment, or "Field"
pub fn field_label(field: &str) -> &str {
    field
        .split('.')
        .filter(|segment| !segment.trim().is_empty())
        .last()
        .unwrap_or("Field")
}

pub fn validate_not_empty(value: &str, field: &str, errors: &mut ValidationErrors) -> bool {
    if value.is_empty() {
        errors.push(format!("[{}] is required.", field_label(field)));
        return false;
    }
    true
}

pub fn validate_min_length(
    value: &str,
    min_length: usize,
    field: &str,
    errors: &mut ValidationErrors,
) -> bool {
    if value.is_empty() || value.chars().count() < min_length {
        errors.push(format!(
            "[{}] must be at least {} characters long.",
            field_label(field),
            min_length
        ));
        return false;
    }
    true
}

pub fn validate_max_length(
    value: &str,
    max_length: usize,
    field: &str,
    errors: &mut ValidationErrors,
) -> bool {
    if value.chars().count() > max_length {
        errors.push(format!(
            "[{}] cannot exceed {} characters.",
            field_label(field),
            max_length
        ));
        return false;
    }
    true
}

pub fn validate_min_value<T>(value: T, min: T, field: &str, errors: &mut ValidationErrors) -> bool
where
    T: PartialOrd + Display,
{
    if value < min {
        errors.push(format!(
            "[{}] must be greater than or equal to {}.",
            field_label(field),
            min
        ));
        return false;
    }
    true
}

pub fn validate_max_value<T>(value: T, max: T, field: &str, errors: &mut ValidationErrors) -> bool
where
    T: PartialOrd + Display,
{
    if value > max {
        errors.push(format!(
            "[{}] must be less than or equal to {}.",
            field_label(field),
            max
        ));
        return false;
    }
    true
}

/// Custom `message` is used verbatim when given
pub fn validate_pattern(
    value: &str,
    pattern: &Regex,
    field: &str,
    message: Option<&str>,
    errors: &mut ValidationErrors,
) -> bool {
    if value.is_empty() || !pattern.is_match(value) {
        let message = match message {
            Some(custom) => custom.to_string(),
            None => format!("[{}] has an invalid format.", field_label(field)),
        };
        errors.push(message);
        return false;
    }
    true
}

pub fn validate_not_empty_items<T>(items: &[T], field: &str, errors: &mut ValidationErrors) -> bool {
    if items.is_empty() {
        errors.push(format!(
            "[{}] must contain at least one item.",
            field_label(field)
        ));
        return false;
    }
    true
}
