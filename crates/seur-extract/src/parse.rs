//! Price and quantity text parsing.

/// Parse a price as displayed on the storefront.
///
/// Everything except digits, commas and periods is stripped. When a comma is
/// present it is the decimal separator and periods are thousands separators
/// (`"1.234,50 €"` is `1234.50`); otherwise the period is the decimal
/// separator. Trailing garbage after the number is ignored.
///
/// Returns `None` when no number can be read.
pub fn parse_price(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replacen(',', ".", 1)
    } else {
        cleaned
    };

    let mut seen_point = false;
    let number: String = normalized
        .chars()
        .take_while(|c| match c {
            '.' if !seen_point => {
                seen_point = true;
                true
            }
            c => c.is_ascii_digit(),
        })
        .collect();

    if !number.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    number.parse::<f64>().ok().filter(|p| p.is_finite())
}

/// Parse a quantity. The trimmed text must be a whole number of at least one.
pub fn parse_quantity(text: &str) -> Option<u32> {
    text.trim().parse::<u32>().ok().filter(|q| *q >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_decimal_price() {
        assert_eq!(parse_price("12,50 \u{20ac}"), Some(12.50));
        assert_eq!(parse_price("\u{20ac}7,05"), Some(7.05));
    }

    #[test]
    fn test_period_decimal_price() {
        assert_eq!(parse_price("$19.99"), Some(19.99));
        assert_eq!(parse_price("25"), Some(25.0));
    }

    #[test]
    fn test_thousands_separator() {
        assert_eq!(parse_price("1.234,50 \u{20ac}"), Some(1234.50));
    }

    #[test]
    fn test_unparsable_price() {
        assert_eq!(parse_price("abc"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("."), None);
    }

    #[test]
    fn test_zero_price_parses() {
        assert_eq!(parse_price("0,00 \u{20ac}"), Some(0.0));
    }

    #[test]
    fn test_quantity() {
        assert_eq!(parse_quantity(" 3 "), Some(3));
        assert_eq!(parse_quantity("2 units"), None);
        assert_eq!(parse_quantity("x"), None);
        assert_eq!(parse_quantity("0"), None);
        assert_eq!(parse_quantity("1.5"), None);
    }
}
