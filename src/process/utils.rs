/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parse a salary or percentage cell into `f64`.
///
/// Accepts a leading `$` and thousands separators (`"$98,765.00"`).
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned = clean_str(raw);
    let digits: String = cleaned
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    digits.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_str_trims_and_unquotes() {
        assert_eq!(clean_str("  plain "), "plain");
        assert_eq!(clean_str("\" quoted \""), "quoted");
        assert_eq!(clean_str("\""), "\"");
    }

    #[test]
    fn parses_amounts() {
        assert_eq!(parse_amount("98765.00"), Some(98765.0));
        assert_eq!(parse_amount("98,765.00"), Some(98765.0));
        assert_eq!(parse_amount("$1,234,567.5"), Some(1_234_567.5));
        assert_eq!(parse_amount("100"), Some(100.0));
        assert_eq!(parse_amount(" 0.75 "), Some(0.75));
    }

    #[test]
    fn rejects_non_numbers() {
        assert_eq!(parse_amount("n/a"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount("inf"), None);
    }
}
