//! Rule-level value validation.

use regex::Regex;
use tracing::warn;

/// Validate a normalized value against an optional validation pattern.
///
/// The pattern is anchored at the start of the value. Returns
/// `(is_valid, error_message)`. An unparseable pattern is logged and fails
/// open; an empty value is always valid.
pub fn validate_value(value: &str, validation_pattern: Option<&str>) -> (bool, Option<String>) {
    let Some(pattern) = validation_pattern else {
        return (true, None);
    };
    if pattern.is_empty() || value.is_empty() {
        return (true, None);
    }

    match Regex::new(&format!(r"\A(?:{pattern})")) {
        Ok(re) => {
            if re.is_match(value) {
                (true, None)
            } else {
                (false, Some(format!("value does not match pattern: {pattern}")))
            }
        }
        Err(e) => {
            warn!(pattern = %pattern, "invalid validation pattern: {e}");
            (true, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_pattern_is_valid() {
        assert_eq!(validate_value("anything", None), (true, None));
    }

    #[test]
    fn test_matching_prefix() {
        let (ok, err) = validate_value("INV-001", Some(r"INV-\d+"));
        assert!(ok);
        assert!(err.is_none());
    }

    #[test]
    fn test_anchored_at_start() {
        // the pattern must match from the beginning of the value
        let (ok, err) = validate_value("ref INV-001", Some(r"INV-\d+"));
        assert!(!ok);
        assert!(err.unwrap().contains("does not match"));
    }

    #[test]
    fn test_mismatch_reports_pattern() {
        let (ok, err) = validate_value("INV-001", Some(r"\d{4}-\d{2}-\d{2}"));
        assert!(!ok);
        assert!(err.unwrap().contains(r"\d{4}-\d{2}-\d{2}"));
    }

    #[test]
    fn test_invalid_pattern_fails_open() {
        let (ok, err) = validate_value("INV-001", Some("[unclosed"));
        assert!(ok);
        assert!(err.is_none());
    }

    #[test]
    fn test_empty_value_is_valid() {
        assert_eq!(validate_value("", Some(r"\d+")), (true, None));
    }
}
