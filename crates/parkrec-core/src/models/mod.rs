//! Data models for receipts and configuration.

pub mod config;
pub mod receipt;

pub use config::ParkrecConfig;
pub use receipt::{DuplicateLedger, PageOutcome, PageRecord, ProcessingResult, ReceiptSummary};
