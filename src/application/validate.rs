use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

/// Shallow shape check; deliverability is out of scope.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Trims `value` and returns it, or `None` when nothing is left.
pub fn non_empty_trimmed(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Trims an optional field, collapsing whitespace-only input to `None`.
pub fn trimmed_or_none(value: Option<&str>) -> Option<String> {
    value.and_then(non_empty_trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("ops@merchtopia.test"));
        assert!(is_valid_email("first.last+tag@example.co.uk"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email("missing@tld"));
    }

    #[test]
    fn trims_and_drops_empty_strings() {
        assert_eq!(non_empty_trimmed("  sku-1  "), Some("sku-1".to_string()));
        assert_eq!(non_empty_trimmed("   "), None);
        assert_eq!(trimmed_or_none(Some("  note ")), Some("note".to_string()));
        assert_eq!(trimmed_or_none(Some(" ")), None);
        assert_eq!(trimmed_or_none(None), None);
    }
}
