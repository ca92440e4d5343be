/// Parse an unsigned integer, honoring a `0x`, `0o` or `0b` base prefix.
///
/// Unprefixed text is decimal. Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns a message naming the offending text.
pub fn parse_int(text: &str) -> Result<u64, String> {
    let s = text.trim();
    let (digits, radix) = match s.get(..2) {
        Some("0x" | "0X") => (&s[2..], 16),
        Some("0o" | "0O") => (&s[2..], 8),
        Some("0b" | "0B") => (&s[2..], 2),
        _ => (s, 10),
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(format!("invalid integer '{s}'"));
    }
    u64::from_str_radix(digits, radix).map_err(|e| format!("invalid integer '{s}': {e}"))
}

/// Parse a bare hexadecimal number (no prefix).
pub(crate) fn parse_hex(text: &str) -> Result<u64, String> {
    let s = text.trim();
    if s.is_empty() || s.starts_with(['+', '-']) {
        return Err(format!("invalid hex address '{s}'"));
    }
    u64::from_str_radix(s, 16).map_err(|e| format!("invalid hex address '{s}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int_prefixes() {
        assert_eq!(parse_int("0x7f12718c2000"), Ok(0x7f12_718c_2000));
        assert_eq!(parse_int("0XFF"), Ok(255));
        assert_eq!(parse_int("0o17"), Ok(15));
        assert_eq!(parse_int("0b101"), Ok(5));
        assert_eq!(parse_int(" 104\n"), Ok(104));
    }

    #[test]
    fn test_parse_int_rejects_garbage() {
        assert!(parse_int("").is_err());
        assert!(parse_int("0x").is_err());
        assert!(parse_int("7f00").is_err());
        assert!(parse_int("-5").is_err());
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("7f17cac14b70"), Ok(0x7f17_cac1_4b70));
        assert!(parse_hex("0x10").is_err());
        assert!(parse_hex("").is_err());
    }
}
