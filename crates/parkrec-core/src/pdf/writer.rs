//! Rebuild a PDF from an ordered subset of its pages.
//!
//! The source document is cloned and its root page tree is replaced by a flat
//! `Kids` array listing only the kept pages. Objects no longer reachable are
//! pruned before saving.

use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::debug;

use crate::error::OutputError;
use crate::progress::ProgressSink;

/// Page attributes that may be inherited from page-tree ancestors.
const INHERITABLE_ATTRIBUTES: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains in malformed files.
const MAX_TREE_DEPTH: usize = 64;

/// Build a document containing the pages at `page_indices` (0-indexed), in
/// that order.
pub fn build_filtered_document(
    source: &Document,
    page_indices: &[usize],
    progress: &mut dyn ProgressSink,
) -> Result<Document, OutputError> {
    let pages = source.get_pages();
    let page_count = pages.len();

    let pages_root = source
        .catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|e| OutputError::Read(format!("missing page tree root: {}", e)))?;

    let mut filtered = source.clone();
    let total = page_indices.len();
    let mut kids = Vec::with_capacity(total);

    for (position, &index) in page_indices.iter().enumerate() {
        let page_id = u32::try_from(index + 1)
            .ok()
            .and_then(|number| pages.get(&number))
            .copied()
            .ok_or(OutputError::InvalidPage { index, page_count })?;

        let page = detach_page(source, page_id, pages_root)?;
        filtered.objects.insert(page_id, Object::Dictionary(page));
        kids.push(Object::Reference(page_id));

        progress.on_progress(position, total);
    }

    let root = filtered
        .get_object_mut(pages_root)
        .and_then(Object::as_dict_mut)
        .map_err(|e| OutputError::Read(format!("page tree root is not a dictionary: {}", e)))?;
    root.set("Kids", Object::Array(kids));
    root.set("Count", Object::Integer(total as i64));

    let pruned = filtered.prune_objects();
    debug!(
        "Filtered document: {} of {} pages kept, {} objects pruned",
        total,
        page_count,
        pruned.len()
    );

    Ok(filtered)
}

/// Save a document to `dest`, compressing its streams.
pub fn write_document(document: &mut Document, dest: &Path) -> Result<(), OutputError> {
    document.compress();
    document
        .save(dest)
        .map_err(|e| OutputError::Write(format!("{}: {}", dest.display(), e)))?;
    Ok(())
}

/// Copy a page dictionary, pull down inherited attributes, and point it at
/// the root page tree node.
fn detach_page(
    source: &Document,
    page_id: ObjectId,
    pages_root: ObjectId,
) -> Result<Dictionary, OutputError> {
    let mut page = source
        .get_dictionary(page_id)
        .map_err(|e| OutputError::Read(format!("page object {:?}: {}", page_id, e)))?
        .clone();

    for key in INHERITABLE_ATTRIBUTES {
        if page.has(key) {
            continue;
        }
        if let Some(value) = inherited_attribute(source, &page, key) {
            page.set(key, value);
        }
    }

    page.set("Parent", Object::Reference(pages_root));
    Ok(page)
}

fn inherited_attribute(source: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

    for _ in 0..MAX_TREE_DEPTH {
        let node = source.get_dictionary(parent?).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    None
}
