use subtle::ConstantTimeEq;

/// Constant-time string comparison to prevent timing attacks
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Check a caller-supplied admin PIN against the configured one.
/// Surrounding whitespace on the candidate is ignored; a missing or blank
/// candidate never matches.
pub fn validate_admin_pin(candidate: Option<&str>, expected: &str) -> bool {
    match candidate.map(str::trim) {
        Some(pin) if !pin.is_empty() => constant_time_compare(pin, expected),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("secret123", "secret123"));
        assert!(!constant_time_compare("secret123", "secret124"));
        assert!(!constant_time_compare("secret123", "secret12"));
        assert!(!constant_time_compare("", "secret"));
    }

    #[test]
    fn test_validate_admin_pin() {
        assert!(validate_admin_pin(Some("2468"), "2468"));
        assert!(validate_admin_pin(Some(" 2468\n"), "2468"));
        assert!(!validate_admin_pin(Some("1234"), "2468"));
        assert!(!validate_admin_pin(Some(""), "2468"));
        assert!(!validate_admin_pin(None, "2468"));
    }
}
