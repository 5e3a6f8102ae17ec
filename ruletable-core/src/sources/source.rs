// Source abstraction for page text
//
// Rule extraction only consumes page strings. Turning a PDF (or anything
// else) into those strings is the job of a TextSource implementation.

use crate::error::{ExtractError, Result};
use std::path::{Path, PathBuf};

/// TextSource trait - converts document bytes into ordered page texts
///
/// A page that yields no text is `None` and contributes no rules.
pub trait TextSource {
    fn read_pages(&self, bytes: &[u8]) -> Result<Vec<Option<String>>>;

    /// Reads the file and hands its bytes to `read_pages`
    fn read_file(&self, input: &Path) -> Result<Vec<Option<String>>> {
        let bytes = std::fs::read(input).map_err(|source| ExtractError::Io {
            path: PathBuf::from(input),
            source,
        })?;
        self.read_pages(&bytes)
    }

    /// Source name for logging
    fn name(&self) -> &str;

    fn supports_file_type(&self, path: &Path) -> bool;
}
