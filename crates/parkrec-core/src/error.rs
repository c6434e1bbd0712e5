//! Error types for the parkrec-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the parkrec library.
#[derive(Error, Debug)]
pub enum ParkrecError {
    /// Input document could not be opened.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// The document as a whole could not be processed.
    #[error("processing error: {0}")]
    Processing(#[from] ProcessingError),

    /// Building or writing the filtered document failed.
    #[error("output error: {0}")]
    Output(#[from] OutputError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while opening an input document.
#[derive(Error, Debug)]
pub enum PdfError {
    /// No file at the given path.
    #[error("file does not exist: {}", .0.display())]
    NotFound(PathBuf),

    /// The path does not name a PDF file.
    #[error("file must be a PDF: {}", .0.display())]
    NotPdf(PathBuf),

    /// The file exists but cannot be read.
    #[error("cannot read {}: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },

    /// Failed to parse the PDF structure.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF is encrypted with a non-empty password.
    #[error("PDF is encrypted")]
    Encrypted,
}

/// Whole-document conditions that abort a pipeline run.
///
/// A single unreadable page is never one of these; it is skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessingError {
    /// The source document has zero pages.
    #[error("the document has no pages")]
    EmptyDocument,

    /// No page looked like a parking receipt and no ticket number was found.
    #[error(
        "no parking receipts found in {page_count} page(s); this does not look like a Parkster receipt document"
    )]
    UnrecognizedDocument { page_count: usize },

    /// The receipt amounts add up to more than the decimal range holds.
    #[error("total of {unique_count} receipt amounts exceeds the supported range")]
    TotalOverflow { unique_count: usize },
}

/// Errors from building or writing the filtered document.
#[derive(Error, Debug)]
pub enum OutputError {
    /// The source document structure could not be read.
    #[error("failed to read source document: {0}")]
    Read(String),

    /// The destination could not be written.
    #[error("failed to write output document: {0}")]
    Write(String),

    /// A requested page index is outside the source document.
    #[error("page index {index} is out of range (document has {page_count} pages)")]
    InvalidPage { index: usize, page_count: usize },
}

/// Result type for the parkrec library.
pub type Result<T> = std::result::Result<T, ParkrecError>;
