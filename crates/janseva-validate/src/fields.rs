//! # Field Validation Engine
//!
//! Validates a step's form values against its [`FieldSpec`] declarations.
//! Required fields fail with [`FieldError::MissingValue`] when the trimmed
//! value is empty; pattern fields fail with [`FieldError::FormatMismatch`]
//! when the value does not match the declared shape.
//!
//! Returns an empty map on success. No side effects.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use janseva_core::{FieldFormat, FieldSpec};

/// A field-level validation failure, keyed by field in the [`ErrorMap`].
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldError {
    /// A required field is empty after trimming.
    #[error("{label} is required")]
    MissingValue {
        /// Label of the field, for display.
        label: String,
    },

    /// A value does not match the field's declared format.
    #[error("{label} must be {expected}")]
    FormatMismatch {
        /// Label of the field, for display.
        label: String,
        /// Human-readable description of the expected shape.
        expected: String,
    },
}

/// Map from field key to its validation failure.
pub type ErrorMap = BTreeMap<String, FieldError>;

/// Validate `values` against the given field declarations.
///
/// Optional fields are only format-checked when non-empty. A missing
/// entry in `values` is treated the same as an empty string.
pub fn validate(fields: &[FieldSpec], values: &BTreeMap<String, String>) -> ErrorMap {
    let mut errors = ErrorMap::new();
    for field in fields {
        let raw = values.get(&field.key).map(String::as_str).unwrap_or("");
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            if field.required {
                errors.insert(
                    field.key.clone(),
                    FieldError::MissingValue {
                        label: field.label.clone(),
                    },
                );
            }
            continue;
        }

        if let Some(expected) = format_violation(field.format, trimmed) {
            errors.insert(
                field.key.clone(),
                FieldError::FormatMismatch {
                    label: field.label.clone(),
                    expected: expected.to_string(),
                },
            );
        }
    }
    errors
}

/// Returns the expected-shape description if `value` violates `format`.
fn format_violation(format: FieldFormat, value: &str) -> Option<&'static str> {
    match format {
        FieldFormat::FreeText => None,
        FieldFormat::Mobile => {
            (!is_exact_digits(value, 10)).then_some("a 10-digit mobile number")
        }
        FieldFormat::Pincode => (!is_exact_digits(value, 6)).then_some("a 6-digit PIN code"),
        FieldFormat::Aadhaar => {
            (!is_exact_digits(value, 12)).then_some("a 12-digit Aadhaar number")
        }
        FieldFormat::Date => (!is_plausible_date(value)).then_some("a date in DD/MM/YYYY form"),
    }
}

/// Whether `value`, with whitespace stripped, is exactly `len` ASCII digits.
fn is_exact_digits(value: &str, len: usize) -> bool {
    let digits: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    digits.len() == len && digits.chars().all(|c| c.is_ascii_digit())
}

/// Shallow `DD/MM/YYYY` check — day and month ranges only, no calendar
/// arithmetic. The backend re-validates dates it actually stores.
fn is_plausible_date(value: &str) -> bool {
    let parts: Vec<&str> = value.split('/').collect();
    let [day, month, year] = parts.as_slice() else {
        return false;
    };
    let all_digits =
        |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if day.len() != 2 || month.len() != 2 || year.len() != 4 {
        return false;
    }
    if !(all_digits(day) && all_digits(month) && all_digits(year)) {
        return false;
    }
    let d: u32 = day.parse().unwrap_or(0);
    let m: u32 = month.parse().unwrap_or(0);
    (1..=31).contains(&d) && (1..=12).contains(&m)
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn mobile_field() -> FieldSpec {
        FieldSpec::required("mobile", "Mobile Number", FieldFormat::Mobile)
    }

    // ── required-ness ────────────────────────────────────────────────

    #[test]
    fn test_required_field_empty_fails() {
        let fields = vec![mobile_field()];
        let errors = validate(&fields, &values(&[]));
        assert!(matches!(
            errors.get("mobile"),
            Some(FieldError::MissingValue { .. })
        ));
    }

    #[test]
    fn test_required_field_whitespace_only_fails() {
        let fields = vec![FieldSpec::required("name", "Name", FieldFormat::FreeText)];
        let errors = validate(&fields, &values(&[("name", "   ")]));
        assert!(errors.contains_key("name"));
    }

    #[test]
    fn test_optional_field_empty_passes() {
        let fields = vec![FieldSpec::optional("email", "Email", FieldFormat::FreeText)];
        let errors = validate(&fields, &values(&[]));
        assert!(errors.is_empty());
    }

    // ── format checks ────────────────────────────────────────────────

    #[test]
    fn test_mobile_ten_digits_passes() {
        let errors = validate(&[mobile_field()], &values(&[("mobile", "9876543210")]));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_mobile_with_spaces_passes() {
        let errors = validate(&[mobile_field()], &values(&[("mobile", "98765 43210")]));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_mobile_nine_digits_fails() {
        let errors = validate(&[mobile_field()], &values(&[("mobile", "987654321")]));
        assert!(matches!(
            errors.get("mobile"),
            Some(FieldError::FormatMismatch { .. })
        ));
    }

    #[test]
    fn test_pincode_six_digits() {
        let fields = vec![FieldSpec::required("pincode", "PIN Code", FieldFormat::Pincode)];
        assert!(validate(&fields, &values(&[("pincode", "305001")])).is_empty());
        assert!(!validate(&fields, &values(&[("pincode", "30500")])).is_empty());
        assert!(!validate(&fields, &values(&[("pincode", "3050011")])).is_empty());
        assert!(!validate(&fields, &values(&[("pincode", "3o5001")])).is_empty());
    }

    #[test]
    fn test_aadhaar_twelve_digits() {
        let fields = vec![FieldSpec::required("aadhaar", "Aadhaar Number", FieldFormat::Aadhaar)];
        assert!(validate(&fields, &values(&[("aadhaar", "1234 5678 9012")])).is_empty());
        assert!(!validate(&fields, &values(&[("aadhaar", "1234 5678")])).is_empty());
    }

    #[test]
    fn test_optional_field_with_bad_format_fails() {
        let fields = vec![FieldSpec::optional("alt_mobile", "Alternate Mobile", FieldFormat::Mobile)];
        let errors = validate(&fields, &values(&[("alt_mobile", "12")]));
        assert!(errors.contains_key("alt_mobile"));
    }

    #[test]
    fn test_date_format() {
        let fields = vec![FieldSpec::required("dob", "Date of Birth", FieldFormat::Date)];
        assert!(validate(&fields, &values(&[("dob", "01/05/1990")])).is_empty());
        assert!(!validate(&fields, &values(&[("dob", "1990-05-01")])).is_empty());
        assert!(!validate(&fields, &values(&[("dob", "32/01/1990")])).is_empty());
        assert!(!validate(&fields, &values(&[("dob", "01/13/1990")])).is_empty());
        assert!(!validate(&fields, &values(&[("dob", "1/5/1990")])).is_empty());
    }

    // ── aggregation ──────────────────────────────────────────────────

    #[test]
    fn test_multiple_errors_reported_together() {
        let fields = vec![
            mobile_field(),
            FieldSpec::required("pincode", "PIN Code", FieldFormat::Pincode),
            FieldSpec::required("name", "Name", FieldFormat::FreeText),
        ];
        let errors = validate(&fields, &values(&[("mobile", "12"), ("name", "Asha")]));
        assert_eq!(errors.len(), 2);
        assert!(errors.contains_key("mobile"));
        assert!(errors.contains_key("pincode"));
    }

    #[test]
    fn test_error_messages_name_the_field() {
        let errors = validate(&[mobile_field()], &values(&[]));
        let msg = errors.get("mobile").unwrap().to_string();
        assert!(msg.contains("Mobile Number"));
    }

    #[test]
    fn test_validate_is_pure() {
        let fields = vec![mobile_field()];
        let vals = values(&[("mobile", "12")]);
        assert_eq!(validate(&fields, &vals), validate(&fields, &vals));
    }
}
