// ABOUTME: Field-level and cross-field validation rules for form input
// ABOUTME: Rules run synchronously against the raw text a user typed

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Email addresses, matched case-insensitively
pub static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("email pattern compiles")
});

/// Business registration numbers: 10 to 12 digits, no separators
pub static BUSINESS_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10,12}$").expect("business number pattern compiles"));

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(String),

    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{0} must be a number")]
    NotANumber(String),

    #[error("{0} must be a whole number")]
    NotAnInteger(String),

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    #[error("{0} must be a date (YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("{0} must be a date and time (YYYY-MM-DDTHH:MM)")]
    InvalidDateTime(String),

    #[error("Invalid {field} value: {value}. Must be one of: {expected}")]
    InvalidChoice {
        field: String,
        value: String,
        expected: String,
    },

    /// A pattern or cross-field rule failed; the message is the rule's own
    #[error("{message}")]
    Rule { field: String, message: String },

    #[error("Unknown field: {0}")]
    UnknownField(String),
}

/// A check applied to one field's text.
///
/// Every rule except [`Rule::Required`] accepts an empty value, so optional
/// fields only get checked once something is typed.
#[derive(Debug, Clone)]
pub enum Rule {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Number,
    Integer,
    Range { min: f64, max: f64 },
    Date,
    DateTime,
    Pattern { regex: Regex, message: &'static str },
    OneOf(&'static [&'static str]),
}

impl Rule {
    pub fn email() -> Self {
        Rule::Pattern {
            regex: EMAIL_PATTERN.clone(),
            message: "Enter a valid email address",
        }
    }

    pub fn business_number() -> Self {
        Rule::Pattern {
            regex: BUSINESS_NUMBER_PATTERN.clone(),
            message: "Business number must be 10 to 12 digits",
        }
    }

    /// Check `value` for the field labelled `label`
    pub fn check(&self, label: &str, value: &str) -> Result<(), ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return match self {
                Rule::Required => Err(ValidationError::Required(label.to_string())),
                _ => Ok(()),
            };
        }

        match self {
            Rule::Required => Ok(()),
            Rule::MinLength(min) => {
                if value.chars().count() < *min {
                    Err(ValidationError::TooShort {
                        field: label.to_string(),
                        min: *min,
                    })
                } else {
                    Ok(())
                }
            }
            Rule::MaxLength(max) => {
                if value.chars().count() > *max {
                    Err(ValidationError::TooLong {
                        field: label.to_string(),
                        max: *max,
                    })
                } else {
                    Ok(())
                }
            }
            Rule::Number => finite(trimmed)
                .map(|_| ())
                .ok_or_else(|| ValidationError::NotANumber(label.to_string())),
            Rule::Integer => trimmed
                .parse::<i64>()
                .map(|_| ())
                .map_err(|_| ValidationError::NotAnInteger(label.to_string())),
            Rule::Range { min, max } => {
                let parsed = finite(trimmed)
                    .ok_or_else(|| ValidationError::NotANumber(label.to_string()))?;
                if parsed < *min || parsed > *max {
                    Err(ValidationError::OutOfRange {
                        field: label.to_string(),
                        min: *min,
                        max: *max,
                    })
                } else {
                    Ok(())
                }
            }
            Rule::Date => chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .map(|_| ())
                .map_err(|_| ValidationError::InvalidDate(label.to_string())),
            Rule::DateTime => parse_date_time(trimmed)
                .map(|_| ())
                .ok_or_else(|| ValidationError::InvalidDateTime(label.to_string())),
            Rule::Pattern { regex, message } => {
                if regex.is_match(trimmed) {
                    Ok(())
                } else {
                    Err(ValidationError::Rule {
                        field: label.to_string(),
                        message: message.to_string(),
                    })
                }
            }
            Rule::OneOf(allowed) => {
                if allowed.iter().any(|a| a.eq_ignore_ascii_case(trimmed)) {
                    Ok(())
                } else {
                    Err(ValidationError::InvalidChoice {
                        field: label.to_string(),
                        value: trimmed.to_string(),
                        expected: allowed.join(", "),
                    })
                }
            }
        }
    }
}

/// `NaN` and `inf` parse as `f64` but have no JSON form
fn finite(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Accepts `YYYY-MM-DDTHH:MM` (what a datetime input produces) with optional seconds
pub fn parse_date_time(value: &str) -> Option<chrono::NaiveDateTime> {
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| chrono::NaiveDateTime::parse_from_str(value, format).ok())
}

/// `field` must equal `other`; re-checked whenever either one changes
#[derive(Debug, Clone, PartialEq)]
pub struct MatchesRule {
    pub field: &'static str,
    pub other: &'static str,
    pub message: &'static str,
}

impl MatchesRule {
    pub fn new(field: &'static str, other: &'static str, message: &'static str) -> Self {
        Self {
            field,
            other,
            message,
        }
    }

    pub fn involves(&self, name: &str) -> bool {
        self.field == name || self.other == name
    }

    pub fn check(&self, value: &str, other_value: &str) -> Result<(), ValidationError> {
        if value.is_empty() || value == other_value {
            Ok(())
        } else {
            Err(ValidationError::Rule {
                field: self.field.to_string(),
                message: self.message.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        assert!(Rule::Required.check("Name", "Kim").is_ok());
        assert_eq!(
            Rule::Required.check("Name", "   "),
            Err(ValidationError::Required("Name".to_string()))
        );
    }

    #[test]
    fn test_optional_fields_skip_other_rules_when_empty() {
        assert!(Rule::Integer.check("Budget", "").is_ok());
        assert!(Rule::email().check("Email", "").is_ok());
        assert!(Rule::MinLength(8).check("Password", "").is_ok());
    }

    #[test]
    fn test_length_counts_characters() {
        assert!(Rule::MaxLength(3).check("Code", "가나다").is_ok());
        assert!(Rule::MaxLength(3).check("Code", "가나다라").is_err());
        assert!(Rule::MinLength(8).check("Password", "short").is_err());
        assert!(Rule::MinLength(8).check("Password", "long-enough").is_ok());
    }

    #[test]
    fn test_email_pattern() {
        let rule = Rule::email();
        assert!(rule.check("Email", "kim@example.com").is_ok());
        assert!(rule.check("Email", "Kim.Lee+dev@Example.CO.KR").is_ok());
        assert!(rule.check("Email", "kim@example").is_err());
        assert!(rule.check("Email", "not an email").is_err());
    }

    #[test]
    fn test_business_number_pattern() {
        let rule = Rule::business_number();
        assert!(rule.check("Business number", "1234567890").is_ok());
        assert!(rule.check("Business number", "123456789012").is_ok());
        assert!(rule.check("Business number", "123-45-67890").is_err());
        assert!(rule.check("Business number", "1234567890123").is_err());
        assert!(rule.check("Business number", "123456789").is_err());
    }

    #[test]
    fn test_numeric_rules() {
        assert!(Rule::Integer.check("Budget", "1500").is_ok());
        assert!(Rule::Integer.check("Budget", "15.5").is_err());
        assert!(Rule::Number.check("Man-days", "2.5").is_ok());

        let range = Rule::Range { min: 0.0, max: 100.0 };
        assert!(range.check("Rate", "100").is_ok());
        assert!(matches!(range.check("Rate", "101"), Err(ValidationError::OutOfRange { .. })));
        assert!(matches!(range.check("Rate", "abc"), Err(ValidationError::NotANumber(_))));
    }

    #[test]
    fn test_non_finite_numbers_are_rejected() {
        let range = Rule::Range { min: 0.0, max: 9_999.0 };
        for raw in ["NaN", "nan", "inf", "-infinity"] {
            let number = Rule::Number.check("Man-days", raw);
            assert!(matches!(number, Err(ValidationError::NotANumber(_))), "{}", raw);
            let ranged = range.check("Man-days", raw);
            assert!(matches!(ranged, Err(ValidationError::NotANumber(_))), "{}", raw);
        }
    }

    #[test]
    fn test_tuple_variant_messages_name_the_field() {
        assert_eq!(
            Rule::Number.check("Budget", "lots").unwrap_err().to_string(),
            "Budget must be a number"
        );
        assert_eq!(
            Rule::Integer.check("Budget", "1.5").unwrap_err().to_string(),
            "Budget must be a whole number"
        );
        assert_eq!(
            Rule::Date.check("Start date", "soon").unwrap_err().to_string(),
            "Start date must be a date (YYYY-MM-DD)"
        );
        assert_eq!(
            Rule::DateTime.check("Occurred at", "soon").unwrap_err().to_string(),
            "Occurred at must be a date and time (YYYY-MM-DDTHH:MM)"
        );
    }

    #[test]
    fn test_date_rules() {
        assert!(Rule::Date.check("Start date", "2024-02-29").is_ok());
        assert!(Rule::Date.check("Start date", "2023-02-29").is_err());
        assert!(Rule::Date.check("Start date", "02/03/2024").is_err());
        assert!(Rule::DateTime.check("Occurred at", "2024-03-01T09:30").is_ok());
        assert!(Rule::DateTime.check("Occurred at", "2024-03-01").is_err());
    }

    #[test]
    fn test_one_of() {
        let rule = Rule::OneOf(&["SI", "SM"]);
        assert!(rule.check("Type", "si").is_ok());
        let err = rule.check("Type", "XX").unwrap_err();
        assert_eq!(err.to_string(), "Invalid Type value: XX. Must be one of: SI, SM");
    }

    #[test]
    fn test_matches_rule() {
        let rule = MatchesRule::new("confirmPassword", "password", "Passwords do not match");
        assert!(rule.involves("password"));
        assert!(rule.check("secret123", "secret123").is_ok());
        assert!(rule.check("", "secret123").is_ok());
        assert_eq!(
            rule.check("secret124", "secret123").unwrap_err().to_string(),
            "Passwords do not match"
        );
    }
}
