//! PDF document source using lopdf and pdf-extract.

use std::cell::OnceCell;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use lopdf::Document;
use tracing::{debug, warn};

use super::{DocumentSource, DocumentWriter};
use super::writer::{build_filtered_document, write_document};
use crate::error::{OutputError, PdfError};
use crate::progress::ProgressSink;

/// A loaded PDF with lazily extracted per-page text.
pub struct PdfDocument {
    document: Document,
    raw_data: Vec<u8>,
    page_count: usize,
    page_texts: OnceCell<Option<Vec<String>>>,
}

impl PdfDocument {
    /// Open a PDF file.
    pub fn open(path: &Path) -> Result<Self, PdfError> {
        let data = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PdfError::NotFound(path.to_path_buf()),
            _ => PdfError::Unreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
        })?;
        Self::load_mem(&data)
    }

    /// Load a PDF from bytes.
    ///
    /// A document without pages loads successfully; the pipeline rejects it.
    pub fn load_mem(data: &[u8]) -> Result<Self, PdfError> {
        let mut document = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let raw_data = if document.is_encrypted() {
            if document.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract reads the bytes, so keep a decrypted copy
            let mut decrypted = Vec::new();
            document
                .save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        let page_count = document.get_pages().len();
        debug!("Loaded PDF with {} pages", page_count);

        Ok(Self {
            document,
            raw_data,
            page_count,
            page_texts: OnceCell::new(),
        })
    }

    /// The underlying lopdf document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    fn extracted_pages(&self) -> Option<&[String]> {
        self.page_texts
            .get_or_init(|| self.extract_all_pages())
            .as_deref()
    }

    fn extract_all_pages(&self) -> Option<Vec<String>> {
        // pdf-extract panics on some malformed fonts
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(&self.raw_data)
        }));

        match outcome {
            Ok(Ok(pages)) if pages.len() == self.page_count => Some(pages),
            Ok(Ok(pages)) => {
                debug!(
                    "pdf-extract returned {} pages, expected {}; using lopdf per page",
                    pages.len(),
                    self.page_count
                );
                None
            }
            Ok(Err(e)) => {
                debug!("pdf-extract failed: {}; using lopdf per page", e);
                None
            }
            Err(_) => {
                warn!("pdf-extract panicked; using lopdf per page");
                None
            }
        }
    }

    fn lopdf_page_text(&self, index: usize) -> String {
        let Ok(page_number) = u32::try_from(index + 1) else {
            return String::new();
        };

        match self.document.extract_text(&[page_number]) {
            Ok(text) => text,
            Err(e) => {
                warn!("Could not read text of page {}: {}", page_number, e);
                String::new()
            }
        }
    }
}

impl DocumentSource for PdfDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page_text(&self, index: usize) -> String {
        if index >= self.page_count {
            return String::new();
        }

        match self.extracted_pages().and_then(|pages| pages.get(index)) {
            Some(text) if !text.trim().is_empty() => text.clone(),
            _ => self.lopdf_page_text(index),
        }
    }
}

impl DocumentWriter for PdfDocument {
    fn write_filtered(
        &self,
        page_indices: &[usize],
        dest: &Path,
        progress: &mut dyn ProgressSink,
    ) -> Result<(), OutputError> {
        let mut filtered = build_filtered_document(&self.document, page_indices, progress)?;
        write_document(&mut filtered, dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::receipt_pdf;
    use crate::progress::NoProgress;

    #[test]
    fn test_page_count_and_text() {
        let bytes = receipt_pdf(&[
            &["Parkster", "Biljettnummer: 123456789"],
            &["Kvitto", "Brutto: 45,50 kr"],
        ]);
        let pdf = PdfDocument::load_mem(&bytes).unwrap();

        assert_eq!(pdf.page_count(), 2);
        assert!(pdf.page_text(0).contains("123456789"));
        assert!(pdf.page_text(1).contains("Brutto"));
    }

    #[test]
    fn test_out_of_range_page_is_empty() {
        let bytes = receipt_pdf(&[&["Parkster"]]);
        let pdf = PdfDocument::load_mem(&bytes).unwrap();
        assert_eq!(pdf.page_text(5), "");
    }

    #[test]
    fn test_zero_page_document_loads() {
        let bytes = receipt_pdf(&[]);
        let pdf = PdfDocument::load_mem(&bytes).unwrap();
        assert_eq!(pdf.page_count(), 0);
    }

    #[test]
    fn test_garbage_is_parse_error() {
        assert!(matches!(
            PdfDocument::load_mem(b"definitely not a pdf"),
            Err(PdfError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = PdfDocument::open(&dir.path().join("missing.pdf"));
        assert!(matches!(result, Err(PdfError::NotFound(_))));
    }

    #[test]
    fn test_write_filtered_round_trip() {
        let bytes = receipt_pdf(&[&["Page A"], &["Page B"], &["Page C"]]);
        let pdf = PdfDocument::load_mem(&bytes).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.pdf");
        pdf.write_filtered(&[2, 0], &dest, &mut NoProgress).unwrap();

        let reloaded = PdfDocument::open(&dest).unwrap();
        assert_eq!(reloaded.page_count(), 2);
        assert!(reloaded.page_text(0).contains("Page C"));
        assert!(reloaded.page_text(1).contains("Page A"));
    }
}
