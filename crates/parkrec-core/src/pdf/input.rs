//! Input file checks and output name hygiene.

use std::fs::File;
use std::path::Path;

use crate::error::PdfError;
use crate::models::config::InputConfig;

const MAX_STEM_LEN: usize = 100;
const UNSAFE_STEM_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*', '\\', '/', '.'];

/// Check that `path` names a readable PDF.
///
/// Returns a warning for files larger than the configured size limit; the
/// file is still accepted.
pub fn check_input_file(path: &Path, config: &InputConfig) -> Result<Option<String>, PdfError> {
    if path.as_os_str().is_empty() {
        return Err(PdfError::NotFound(path.to_path_buf()));
    }

    if !path.exists() {
        return Err(PdfError::NotFound(path.to_path_buf()));
    }

    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        return Err(PdfError::NotPdf(path.to_path_buf()));
    }

    let unreadable = |e: std::io::Error| PdfError::Unreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };
    File::open(path).map_err(unreadable)?;
    let size = path.metadata().map_err(unreadable)?.len();

    let size_mb = size as f64 / (1024.0 * 1024.0);
    if size_mb > config.max_file_size_mb as f64 {
        return Ok(Some(format!(
            "Large file ({:.1} MB) may take time to process",
            size_mb
        )));
    }

    Ok(None)
}

/// Make a file name safe to reuse as an output stem.
///
/// Directory components are dropped, separator and wildcard characters
/// become `_`, and the result is capped at 100 characters.
pub fn sanitize_file_stem(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    base.chars()
        .map(|c| if UNSAFE_STEM_CHARS.contains(&c) { '_' } else { c })
        .take(MAX_STEM_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        let result = check_input_file(Path::new("/nonexistent/receipts.pdf"), &InputConfig::default());
        assert!(matches!(result, Err(PdfError::NotFound(_))));
    }

    #[test]
    fn test_empty_path() {
        let result = check_input_file(Path::new(""), &InputConfig::default());
        assert!(matches!(result, Err(PdfError::NotFound(_))));
    }

    #[test]
    fn test_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipts.txt");
        std::fs::write(&path, b"hello").unwrap();

        let result = check_input_file(&path, &InputConfig::default());
        assert!(matches!(result, Err(PdfError::NotPdf(_))));
    }

    #[test]
    fn test_uppercase_extension_and_size_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("RECEIPTS.PDF");
        std::fs::write(&path, vec![0u8; 2 * 1024 * 1024]).unwrap();

        let relaxed = InputConfig { max_file_size_mb: 100 };
        assert_eq!(check_input_file(&path, &relaxed).unwrap(), None);

        let strict = InputConfig { max_file_size_mb: 1 };
        let warning = check_input_file(&path, &strict).unwrap().unwrap();
        assert!(warning.contains("2.0 MB"));
    }

    #[test]
    fn test_sanitize_file_stem() {
        assert_eq!(sanitize_file_stem("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_stem("C:\\tmp\\kvitto.2024"), "kvitto_2024");
        assert_eq!(sanitize_file_stem("a<b>c:d|e?f*g\"h"), "a_b_c_d_e_f_g_h");
        assert_eq!(sanitize_file_stem(&"x".repeat(150)).len(), 100);
    }
}
