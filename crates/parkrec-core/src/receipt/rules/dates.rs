//! Receipt date extraction.

use super::patterns::DATE_YMD;

/// Extract the first `YYYY-MM-DD` shaped substring.
///
/// Only the shape is checked; "2024-13-45" is returned as-is.
pub fn extract_date(text: &str) -> Option<String> {
    DATE_YMD.captures(text).map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_first_date() {
        let text = "Start 2024-03-01 08:00\nSlut 2024-03-02 17:30";
        assert_eq!(extract_date(text).as_deref(), Some("2024-03-01"));
    }

    #[test]
    fn test_calendar_is_not_validated() {
        assert_eq!(extract_date("2024-13-45").as_deref(), Some("2024-13-45"));
    }

    #[test]
    fn test_no_date() {
        assert_eq!(extract_date("01.03.2024"), None);
        assert_eq!(extract_date(""), None);
    }
}
