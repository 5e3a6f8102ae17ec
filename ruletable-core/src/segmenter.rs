use crate::error::Result;
use regex::Regex;

/// Splits one page of raw text into rule candidate sentences.
///
/// A boundary is a `.`, `!` or `?` followed by optional whitespace and a
/// line break. The punctuation stays with the sentence before it; the
/// whitespace run is dropped. Punctuation in the middle of a line never
/// splits, so wrapped paragraphs stay together.
pub struct Segmenter {
    boundary: Regex,
}

impl Segmenter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            boundary: Regex::new(r"[.!?]\s*\n")?,
        })
    }

    pub fn segment(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut start = 0;

        for m in self.boundary.find_iter(text) {
            // Terminal punctuation is always a single ASCII byte
            let end = m.start() + 1;
            push_trimmed(&mut sentences, &text[start..end]);
            start = m.end();
        }
        push_trimmed(&mut sentences, &text[start..]);

        sentences
    }

    /// Segment an optional page; pages without text yield nothing
    pub fn segment_page(&self, page: Option<&str>) -> Vec<String> {
        page.map(|text| self.segment(text)).unwrap_or_default()
    }
}

fn push_trimmed(sentences: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        sentences.push(piece.to_string());
    }
}
