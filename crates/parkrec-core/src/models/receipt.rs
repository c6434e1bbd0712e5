//! Receipt records and processing results.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ProcessingError;
use crate::receipt::rules::format_currency;

/// One page that carried a recognisable ticket number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Position of the page in the source document (0-indexed).
    pub page_index: usize,

    /// Nine-digit ticket number; the deduplication key.
    pub ticket_number: String,

    /// Gross amount, zero when the page had none.
    pub amount: Decimal,

    /// First `YYYY-MM-DD` date on the page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Leading slice of the raw page text, kept for diagnostics.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text_snippet: String,
}

/// What a single page produced during the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page yielded a receipt.
    Record(PageRecord),
    /// No ticket number; the page is dropped.
    Skipped,
}

impl PageOutcome {
    pub fn into_record(self) -> Option<PageRecord> {
        match self {
            Self::Record(record) => Some(record),
            Self::Skipped => None,
        }
    }
}

/// Ticket numbers seen on more than one page, with their total occurrence
/// count.
///
/// An entry exists only for repeated tickets and its count includes the
/// first (kept) occurrence, so every count is at least 2.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DuplicateLedger(BTreeMap<String, usize>);

impl DuplicateLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a repeated occurrence of `ticket` and return its new count.
    pub fn record_repeat(&mut self, ticket: &str) -> usize {
        let count = self.0.entry(ticket.to_string()).or_insert(1);
        *count += 1;
        *count
    }

    /// Total occurrences of `ticket`, if it was duplicated.
    pub fn count(&self, ticket: &str) -> Option<usize> {
        self.0.get(ticket).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct duplicated tickets.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Duplicated tickets in ascending ticket order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(ticket, count)| (ticket.as_str(), *count))
    }

    /// Pages discarded as duplicates: the sum of `count - 1`.
    pub fn removed_count(&self) -> usize {
        self.0.values().map(|count| count.saturating_sub(1)).sum()
    }
}

impl FromIterator<(String, usize)> for DuplicateLedger {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Outcome of one pipeline run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingResult {
    records: Vec<PageRecord>,
    duplicates: DuplicateLedger,
    total_amount: Decimal,
    page_count: usize,
    receipt_count: usize,
}

impl ProcessingResult {
    /// Order unique records by ticket number and total their amounts.
    ///
    /// `receipt_count` is the number of pages that produced a record before
    /// deduplication; `page_count` is the size of the source document.
    /// Fails when the total does not fit in a `Decimal`.
    pub fn new(
        mut records: Vec<PageRecord>,
        duplicates: DuplicateLedger,
        page_count: usize,
        receipt_count: usize,
    ) -> Result<Self, ProcessingError> {
        records.sort_by(|a, b| a.ticket_number.cmp(&b.ticket_number));
        let total_amount = records
            .iter()
            .try_fold(Decimal::ZERO, |total, r| total.checked_add(r.amount))
            .ok_or(ProcessingError::TotalOverflow {
                unique_count: records.len(),
            })?;

        Ok(Self {
            records,
            duplicates,
            total_amount,
            page_count,
            receipt_count,
        })
    }

    /// Unique records in ascending ticket order.
    pub fn records(&self) -> &[PageRecord] {
        &self.records
    }

    pub fn duplicates(&self) -> &DuplicateLedger {
        &self.duplicates
    }

    /// Sum of the unique records' amounts.
    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    /// Pages in the source document.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Pages that yielded a receipt, duplicates included.
    pub fn receipt_count(&self) -> usize {
        self.receipt_count
    }

    pub fn unique_count(&self) -> usize {
        self.records.len()
    }

    /// Source page indices in output order.
    pub fn page_order(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.page_index).collect()
    }

    /// Flat summary view for display and serialisation.
    pub fn summary(&self) -> ReceiptSummary {
        ReceiptSummary {
            total_receipts: self.receipt_count,
            unique_receipts: self.unique_count(),
            duplicates: self.duplicates.clone(),
            duplicate_count: self.duplicates.removed_count(),
            total_amount: self.total_amount,
            formatted_amount: format_currency(self.total_amount),
        }
    }
}

/// Headline numbers of a processing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptSummary {
    /// Receipts found, duplicates included.
    pub total_receipts: usize,
    /// Receipts kept after deduplication.
    pub unique_receipts: usize,
    /// Duplicated tickets and their occurrence counts.
    pub duplicates: DuplicateLedger,
    /// Pages removed as duplicates.
    pub duplicate_count: usize,
    /// Total of unique receipts.
    pub total_amount: Decimal,
    /// Total rendered with the currency suffix.
    pub formatted_amount: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn record(page_index: usize, ticket: &str, amount: &str) -> PageRecord {
        PageRecord {
            page_index,
            ticket_number: ticket.to_string(),
            amount: Decimal::from_str(amount).unwrap(),
            date: None,
            text_snippet: String::new(),
        }
    }

    #[test]
    fn test_ledger_counts_total_occurrences() {
        let mut ledger = DuplicateLedger::new();
        assert_eq!(ledger.record_repeat("123456789"), 2);
        assert_eq!(ledger.record_repeat("123456789"), 3);
        assert_eq!(ledger.record_repeat("987654321"), 2);

        assert_eq!(ledger.count("123456789"), Some(3));
        assert_eq!(ledger.count("111111111"), None);
        assert_eq!(ledger.removed_count(), 3);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_result_orders_and_totals() {
        let result = ProcessingResult::new(
            vec![
                record(0, "300000000", "10.25"),
                record(1, "100000000", "5"),
                record(2, "200000000", "0"),
            ],
            DuplicateLedger::new(),
            3,
            3,
        )
        .unwrap();

        let tickets: Vec<&str> = result
            .records()
            .iter()
            .map(|r| r.ticket_number.as_str())
            .collect();
        assert_eq!(tickets, vec!["100000000", "200000000", "300000000"]);
        assert_eq!(result.page_order(), vec![1, 2, 0]);
        assert_eq!(result.total_amount(), Decimal::from_str("15.25").unwrap());
    }

    #[test]
    fn test_empty_result_totals_zero() {
        let result = ProcessingResult::new(Vec::new(), DuplicateLedger::new(), 4, 0).unwrap();
        assert_eq!(result.total_amount(), Decimal::ZERO);
        assert_eq!(result.unique_count(), 0);
    }

    #[test]
    fn test_summary_view() {
        let duplicates: DuplicateLedger = [("123456789".to_string(), 3)].into_iter().collect();
        let result = ProcessingResult::new(
            vec![record(0, "123456789", "20.5"), record(1, "111111111", "50")],
            duplicates,
            5,
            4,
        )
        .unwrap();

        let summary = result.summary();
        assert_eq!(summary.total_receipts, 4);
        assert_eq!(summary.unique_receipts, 2);
        assert_eq!(summary.duplicate_count, 2);
        assert_eq!(summary.formatted_amount, "70.50 kr");
    }

    #[test]
    fn test_total_overflow_is_an_error() {
        let result = ProcessingResult::new(
            vec![
                record(0, "100000001", "79228162514264337593543950335"),
                record(1, "100000002", "1"),
            ],
            DuplicateLedger::new(),
            2,
            2,
        );

        assert_eq!(result, Err(ProcessingError::TotalOverflow { unique_count: 2 }));
    }

    #[test]
    fn test_removed_count_ignores_degenerate_counts() {
        let ledger: DuplicateLedger = [("123456789".to_string(), 0), ("111111111".to_string(), 2)]
            .into_iter()
            .collect();
        assert_eq!(ledger.removed_count(), 1);

        let parsed: DuplicateLedger = serde_json::from_str(r#"{"222222222": 0}"#).unwrap();
        assert_eq!(parsed.removed_count(), 0);
    }

    #[test]
    fn test_page_outcome_into_record() {
        assert_eq!(PageOutcome::Skipped.into_record(), None);
        let r = record(4, "123456789", "1");
        assert_eq!(PageOutcome::Record(r.clone()).into_record(), Some(r));
    }
}
