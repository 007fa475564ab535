use crate::error::BalneaError;
use crate::extraction::{PageContent, PdfExtractor};
use std::io::Write;
use std::process::Command;

/// PDF extraction backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -layout` so label/value alignment inside bulletin tables
/// survives into the text.
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for PdftotextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, BalneaError> {
        // Write PDF bytes to a temp file
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| BalneaError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| BalneaError::Extraction(e.to_string()))?;

        let output = Command::new("pdftotext")
            .arg("-layout")
            .arg(tmpfile.path())
            .arg("-") // output to stdout
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    BalneaError::PdftotextNotFound
                } else {
                    BalneaError::Extraction(format!("pdftotext failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(BalneaError::PdftotextFailed { code, stderr });
        }

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(pages_from_text(&text))
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// Split pdftotext output into pages (form feed \x0c is the page separator).
fn pages_from_text(text: &str) -> Vec<PageContent> {
    text.split('\x0c')
        .enumerate()
        .map(|(i, page_text)| PageContent {
            page_number: i + 1,
            lines: page_text.lines().map(|l| l.to_string()).collect(),
        })
        .filter(|p| !p.lines.is_empty() || p.page_number == 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_from_text_splits_on_form_feed() {
        let pages = pages_from_text("first page\nline two\x0csecond page\n");
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page_number, 1);
        assert_eq!(pages[0].lines, vec!["first page", "line two"]);
        assert_eq!(pages[1].lines, vec!["second page"]);
    }

    #[test]
    fn test_pages_from_text_drops_trailing_empty_page() {
        let pages = pages_from_text("only page\x0c");
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn test_pages_from_text_empty_input_keeps_first_page() {
        let pages = pages_from_text("");
        assert_eq!(pages.len(), 1);
        assert!(pages[0].lines.is_empty());
    }
}
