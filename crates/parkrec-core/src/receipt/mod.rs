//! Parking receipt extraction and deduplication.

mod pipeline;
pub mod rules;
pub mod validator;

pub use pipeline::{deduplicate, Deduplicated, ReceiptPipeline, ScanOutcome};
pub use validator::{indicator_count, is_expected_document, DocumentValidator, RECEIPT_KEYWORDS};
