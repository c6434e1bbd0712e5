//! Document access: per-page text in, page subsets out.

mod document;
mod input;
mod writer;

#[cfg(test)]
pub(crate) mod fixtures;

pub use document::PdfDocument;
pub use input::{check_input_file, sanitize_file_stem};
pub use writer::{build_filtered_document, write_document};

use std::path::Path;

use crate::error::OutputError;
use crate::progress::ProgressSink;

/// A paginated document the pipeline can read text from.
pub trait DocumentSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Text of the page at `index` (0-indexed).
    ///
    /// Returns an empty string for a page whose text cannot be read.
    fn page_text(&self, index: usize) -> String;
}

/// A document that can be rebuilt from a subset of its pages.
pub trait DocumentWriter {
    /// Write a new document holding the pages at `page_indices`, in that
    /// order, to `dest`.
    fn write_filtered(
        &self,
        page_indices: &[usize],
        dest: &Path,
        progress: &mut dyn ProgressSink,
    ) -> std::result::Result<(), OutputError>;
}

impl<S: AsRef<str>> DocumentSource for [S] {
    fn page_count(&self) -> usize {
        self.len()
    }

    fn page_text(&self, index: usize) -> String {
        self.get(index)
            .map(|page| page.as_ref().to_string())
            .unwrap_or_default()
    }
}

impl<S: AsRef<str>> DocumentSource for Vec<S> {
    fn page_count(&self) -> usize {
        self.as_slice().page_count()
    }

    fn page_text(&self, index: usize) -> String {
        self.as_slice().page_text(index)
    }
}
