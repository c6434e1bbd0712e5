//! Vocabulary heuristic deciding whether a page belongs to a Parkster
//! receipt document.

use tracing::trace;

use super::rules::extract_ticket_number;
use crate::models::config::ValidationConfig;

/// Keywords from the receipt vendor's vocabulary, matched lower-case.
pub const RECEIPT_KEYWORDS: [&str; 6] = [
    "parkster",
    "biljettnummer",
    "brutto",
    "parkeringskvitto",
    "parkering",
    "kvitto",
];

/// Classifies page text by keyword presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentValidator {
    /// Keywords needed when no ticket number is present.
    min_indicators: usize,
    /// Keywords needed alongside a ticket number.
    min_indicators_with_ticket: usize,
}

impl DocumentValidator {
    /// Create a validator with the default thresholds (2, or 1 plus a ticket).
    pub fn new() -> Self {
        Self {
            min_indicators: 2,
            min_indicators_with_ticket: 1,
        }
    }

    /// Build a validator from configuration.
    pub fn from_config(config: &ValidationConfig) -> Self {
        Self::new()
            .with_min_indicators(config.min_indicators)
            .with_min_indicators_with_ticket(config.min_indicators_with_ticket)
    }

    /// Set the keyword threshold used when no ticket number is present.
    pub fn with_min_indicators(mut self, count: usize) -> Self {
        self.min_indicators = count;
        self
    }

    /// Set the keyword threshold used alongside a ticket number.
    pub fn with_min_indicators_with_ticket(mut self, count: usize) -> Self {
        self.min_indicators_with_ticket = count;
        self
    }

    /// Whether the page text looks like a Parkster receipt.
    pub fn is_expected_document(&self, text: &str) -> bool {
        let indicators = indicator_count(text);
        let has_ticket = extract_ticket_number(text).is_some();

        trace!(indicators, has_ticket, "Vocabulary check");

        indicators >= self.min_indicators
            || (has_ticket && indicators >= self.min_indicators_with_ticket)
    }
}

impl Default for DocumentValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of distinct receipt keywords present in `text`.
pub fn indicator_count(text: &str) -> usize {
    let lower = text.to_lowercase();
    RECEIPT_KEYWORDS
        .iter()
        .filter(|keyword| lower.contains(*keyword))
        .count()
}

/// Check page text with the default thresholds.
pub fn is_expected_document(text: &str) -> bool {
    DocumentValidator::new().is_expected_document(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_count_is_presence_not_frequency() {
        assert_eq!(indicator_count("Brutto brutto BRUTTO"), 1);
        assert_eq!(indicator_count("nothing relevant"), 0);
    }

    #[test]
    fn test_overlapping_keywords_count_separately() {
        // "parkeringskvitto" also contains "parkering" and "kvitto".
        assert_eq!(indicator_count("PARKERINGSKVITTO"), 3);
    }

    #[test]
    fn test_two_keywords_pass() {
        assert!(is_expected_document("Parkster\nBrutto 45,00 kr"));
    }

    #[test]
    fn test_one_keyword_with_ticket_passes() {
        assert!(is_expected_document("Kvitto 123456789"));
    }

    #[test]
    fn test_one_keyword_without_ticket_fails() {
        assert!(!is_expected_document("Brutto 45,00 kr"));
    }

    #[test]
    fn test_ticket_alone_fails() {
        assert!(!is_expected_document("Order 123456789"));
    }

    #[test]
    fn test_empty_text_fails() {
        assert!(!is_expected_document(""));
    }

    #[test]
    fn test_custom_thresholds() {
        let strict = DocumentValidator::new()
            .with_min_indicators(3)
            .with_min_indicators_with_ticket(2);
        assert!(!strict.is_expected_document("Parkster brutto"));
        assert!(strict.is_expected_document("Parkster brutto 123456789"));
    }
}
