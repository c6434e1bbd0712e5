//! Core library for parking receipt processing.
//!
//! This crate provides:
//! - Per-page PDF text access and page-subset PDF writing
//! - Ticket number, gross amount, and date extraction for Parkster receipts
//! - A vocabulary heuristic that rejects unrelated documents
//! - Deduplication by ticket number, ordering, and totals
//! - A plain text summary report

pub mod error;
pub mod models;
pub mod pdf;
pub mod progress;
pub mod receipt;
pub mod report;

pub use error::{OutputError, ParkrecError, PdfError, ProcessingError, Result};
pub use models::{
    DuplicateLedger, PageOutcome, PageRecord, ParkrecConfig, ProcessingResult, ReceiptSummary,
};
pub use pdf::{build_filtered_document, DocumentSource, DocumentWriter, PdfDocument};
pub use progress::{NoProgress, ProgressSink};
pub use receipt::rules::{extract_date, extract_ticket_number, format_currency, parse_amount};
pub use receipt::{is_expected_document, DocumentValidator, ReceiptPipeline};
pub use report::render_summary;
