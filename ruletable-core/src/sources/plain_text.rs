//! Plain text source
//!
//! Reads text that an external extractor already pulled out of a document.
//! Pages are separated by form feed (`\x0c`), the convention `pdftotext`
//! follows.

use super::source::TextSource;
use crate::error::Result;
use std::path::Path;

pub const PAGE_BREAK: char = '\u{0c}';

#[derive(Debug, Default)]
pub struct PlainTextSource;

impl PlainTextSource {
    pub fn new() -> Self {
        Self
    }

    /// Split already-decoded text into pages
    pub fn split_pages(text: &str) -> Vec<Option<String>> {
        text.split(PAGE_BREAK)
            .map(|page| {
                if page.trim().is_empty() {
                    None
                } else {
                    Some(page.to_string())
                }
            })
            .collect()
    }
}

impl TextSource for PlainTextSource {
    fn read_pages(&self, bytes: &[u8]) -> Result<Vec<Option<String>>> {
        let text = String::from_utf8_lossy(bytes);
        let pages = Self::split_pages(&text);
        tracing::debug!("read {} pages from plain text", pages.len());
        Ok(pages)
    }

    fn name(&self) -> &str {
        "PlainText"
    }

    fn supports_file_type(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "txt" | "text"))
            .unwrap_or(false)
    }
}
