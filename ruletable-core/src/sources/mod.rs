//! Page Text Sources
//!
//! This module is the boundary between document text extraction and rule
//! extraction. A source turns a document into ordered page texts; everything
//! after that point works on plain strings.
//!
//! ## Architecture
//!
//! ```text
//! Document (PDF, text dump, ...)
//!     ↓
//! [TextSource]
//!     ↓
//! Vec<Option<String>> (one entry per page)
//!     ↓
//! [RuleProcessor]
//!     ↓
//! RuleTable
//! ```
//!
//! ## Available Sources
//!
//! - `PlainTextSource` - text already extracted from a PDF, pages split on form feed

pub mod source;
pub mod plain_text;

pub use source::TextSource;
pub use plain_text::PlainTextSource;
