#[cfg(test)]
pub mod testing;

#[inline]
pub fn is_alphabetic(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

#[inline]
pub fn is_numeric(c: char) -> bool {
    c.is_ascii_digit()
}

#[inline]
pub fn is_alphanumeric(c: char) -> bool {
    is_alphabetic(c) || is_numeric(c)
}

/// Renders a number the way `print` shows it: integral values without a
/// fractional part.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        String::from("NaN")
    } else if value.is_infinite() {
        String::from(if value > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        // f64's Display already drops the ".0" of integral values
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-12.0), "-12");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(1.0 / 0.0), "Infinity");
        assert_eq!(format_number(-1.0 / 0.0), "-Infinity");
        assert_eq!(format_number(0.0 / 0.0), "NaN");
    }

    #[test]
    fn test_character_classes() {
        assert!(is_alphabetic('_'));
        assert!(is_alphabetic('Q'));
        assert!(!is_alphabetic('1'));
        assert!(is_numeric('9'));
        assert!(!is_numeric(')'));
        assert!(is_alphanumeric('7'));
        assert!(!is_alphanumeric('$'));
    }
}
