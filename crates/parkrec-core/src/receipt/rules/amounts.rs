//! Gross amount extraction for Swedish receipts.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{trace, warn};

use super::patterns::amount_patterns;

/// Currency suffix used wherever money is displayed.
pub const CURRENCY_SUFFIX: &str = "kr";

/// Parse the gross ("brutto") amount from page text.
///
/// Patterns are tried in priority order: labelled amount with a `kr` suffix,
/// bare amount with `kr`, bare amount with `sek`, labelled amount without a
/// suffix. A match whose number does not parse falls through to the next
/// pattern.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    for pattern in amount_patterns() {
        let Some(caps) = pattern.captures(text) else {
            continue;
        };

        match parse_swedish_number(&caps[1]) {
            Some(amount) => return Some(amount),
            None => trace!("Unparseable amount {:?}, trying next pattern", &caps[1]),
        }
    }

    None
}

/// Parse a number written with a comma or period decimal separator
/// ("45,50", "45.50", "45").
pub fn parse_swedish_number(s: &str) -> Option<Decimal> {
    let normalized = s.trim().replace(',', ".");
    let normalized = normalized.strip_suffix('.').unwrap_or(&normalized);
    if normalized.is_empty() {
        return None;
    }

    match Decimal::from_str(normalized) {
        Ok(amount) => Some(amount),
        Err(e) => {
            warn!("Amount {:?} cannot be represented, ignoring it: {}", normalized, e);
            None
        }
    }
}

/// Format an amount with two decimals and the currency suffix ("123.40 kr").
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2} {}", rounded, CURRENCY_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_labeled_amount_with_comma() {
        assert_eq!(parse_amount("Brutto: 45,50 kr"), Some(d("45.50")));
    }

    #[test]
    fn test_parse_no_amount() {
        assert_eq!(parse_amount("no amount here"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_labeled_amount_beats_earlier_kr_amount() {
        let text = "Moms 9,10 kr\nBrutto 45,50 kr";
        assert_eq!(parse_amount(text), Some(d("45.50")));
    }

    #[test]
    fn test_parse_bare_kr_amount() {
        assert_eq!(parse_amount("Att betala 120 kr"), Some(d("120")));
    }

    #[test]
    fn test_parse_sek_amount() {
        assert_eq!(parse_amount("Totalt 99.90 SEK"), Some(d("99.90")));
    }

    #[test]
    fn test_parse_labeled_amount_without_currency() {
        assert_eq!(parse_amount("BRUTTO:\n37,00\nMoms"), Some(d("37.00")));
    }

    #[test]
    fn test_trailing_separator() {
        assert_eq!(parse_swedish_number("45,"), Some(d("45")));
        assert_eq!(parse_swedish_number("1.5"), Some(d("1.5")));
        assert_eq!(parse_swedish_number(""), None);
    }

    #[test]
    fn test_amount_beyond_decimal_range_is_rejected() {
        assert_eq!(parse_swedish_number("123456789012345678901234567890"), None);
        assert_eq!(parse_amount("Brutto: 123456789012345678901234567890 kr"), None);
        assert_eq!(
            parse_swedish_number("79228162514264337593543950335"),
            Some(Decimal::MAX)
        );
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(d("123.4")), "123.40 kr");
        assert_eq!(format_currency(d("20.5")), "20.50 kr");
        assert_eq!(format_currency(Decimal::ZERO), "0.00 kr");
        assert_eq!(format_currency(d("10.005")), "10.01 kr");
    }
}
