//! Receipt pipeline: scan pages, drop duplicate tickets, order and total.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::{debug, info};

use super::rules::{extract_date, extract_ticket_number, parse_amount};
use super::validator::DocumentValidator;
use crate::error::ProcessingError;
use crate::models::config::ParkrecConfig;
use crate::models::receipt::{DuplicateLedger, PageOutcome, PageRecord, ProcessingResult};
use crate::pdf::DocumentSource;
use crate::progress::ProgressSink;

/// Output of the scan phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Pages in the source document.
    pub page_count: usize,
    /// Records in original page order, duplicates included.
    pub records: Vec<PageRecord>,
    /// Whether any page passed the vocabulary check.
    pub vocabulary_matched: bool,
}

/// Output of the deduplication phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deduplicated {
    /// First record seen for each ticket, in original page order.
    pub unique: Vec<PageRecord>,
    /// Tickets that appeared on more than one page.
    pub duplicates: DuplicateLedger,
}

/// Extracts, deduplicates, and orders parking receipts.
#[derive(Debug, Clone)]
pub struct ReceiptPipeline {
    validator: DocumentValidator,
    snippet_length: usize,
}

impl ReceiptPipeline {
    /// Create a pipeline with default settings.
    pub fn new() -> Self {
        Self {
            validator: DocumentValidator::new(),
            snippet_length: 200,
        }
    }

    /// Build a pipeline from configuration.
    pub fn from_config(config: &ParkrecConfig) -> Self {
        Self::new()
            .with_validator(DocumentValidator::from_config(&config.validation))
            .with_snippet_length(config.extraction.snippet_length)
    }

    /// Replace the document validator.
    pub fn with_validator(mut self, validator: DocumentValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Set how many characters of page text each record keeps.
    pub fn with_snippet_length(mut self, length: usize) -> Self {
        self.snippet_length = length;
        self
    }

    /// Run all three phases over `source`.
    pub fn process<D>(
        &self,
        source: &D,
        progress: &mut dyn ProgressSink,
    ) -> Result<ProcessingResult, ProcessingError>
    where
        D: DocumentSource + ?Sized,
    {
        let scan = self.scan(source, progress)?;
        let receipt_count = scan.records.len();
        let Deduplicated { unique, duplicates } = deduplicate(scan.records);

        let result = ProcessingResult::new(unique, duplicates, scan.page_count, receipt_count)?;
        info!(
            "Processed {} pages: {} receipts, {} unique, {} duplicates removed, total {}",
            result.page_count(),
            result.receipt_count(),
            result.unique_count(),
            result.duplicates().removed_count(),
            result.total_amount()
        );

        Ok(result)
    }

    /// Scan every page in order, collecting records.
    ///
    /// Fails on an empty document, or when no page matched the receipt
    /// vocabulary and no page yielded a ticket number.
    pub fn scan<D>(
        &self,
        source: &D,
        progress: &mut dyn ProgressSink,
    ) -> Result<ScanOutcome, ProcessingError>
    where
        D: DocumentSource + ?Sized,
    {
        let page_count = source.page_count();
        if page_count == 0 {
            return Err(ProcessingError::EmptyDocument);
        }

        let mut outcome = ScanOutcome {
            page_count,
            ..ScanOutcome::default()
        };

        for index in 0..page_count {
            let text = source.page_text(index);

            if !outcome.vocabulary_matched && self.validator.is_expected_document(&text) {
                debug!("Page {} matches receipt vocabulary", index);
                outcome.vocabulary_matched = true;
            }

            if let PageOutcome::Record(record) = self.extract_page(index, &text) {
                outcome.records.push(record);
            }

            progress.on_progress(index, page_count);
        }

        if !outcome.vocabulary_matched && outcome.records.is_empty() {
            return Err(ProcessingError::UnrecognizedDocument { page_count });
        }

        debug!(
            "Scan found {} receipts in {} pages",
            outcome.records.len(),
            page_count
        );
        Ok(outcome)
    }

    /// Extract a record from one page's text.
    pub fn extract_page(&self, page_index: usize, text: &str) -> PageOutcome {
        let Some(ticket_number) = extract_ticket_number(text) else {
            debug!("Page {}: no ticket number, skipped", page_index);
            return PageOutcome::Skipped;
        };

        let amount = parse_amount(text).unwrap_or(Decimal::ZERO);
        debug!("Page {}: ticket {} amount {}", page_index, ticket_number, amount);

        PageOutcome::Record(PageRecord {
            page_index,
            ticket_number,
            amount,
            date: extract_date(text),
            text_snippet: text.chars().take(self.snippet_length).collect(),
        })
    }
}

impl Default for ReceiptPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep the first record per ticket number, counting the rest.
///
/// Records must be in original page order; the first occurrence wins.
pub fn deduplicate(records: Vec<PageRecord>) -> Deduplicated {
    let mut seen = HashSet::with_capacity(records.len());
    let mut result = Deduplicated::default();

    for record in records {
        if seen.insert(record.ticket_number.clone()) {
            result.unique.push(record);
        } else {
            let count = result.duplicates.record_repeat(&record.ticket_number);
            debug!(
                "Page {}: duplicate ticket {} (occurrence {})",
                record.page_index, record.ticket_number, count
            );
        }
    }

    result
}
