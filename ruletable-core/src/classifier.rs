use crate::config::{ClassifierConfig, SpanCase};
use crate::error::Result;
use crate::types::{FormTier, LogicalForm};
use regex::Regex;

/// One priority level of the classifier. Returns `None` to hand the
/// sentence to the next tier.
pub trait TierMatcher: Send + Sync {
    fn apply(&self, sentence: &str) -> Option<LogicalForm>;

    fn name(&self) -> &str;
}

/// Maps a sentence to its logical form by trying tiers in priority order.
///
/// Order: full `if/then/else`, bare `if ... then`, `if` only, `shall`
/// obligation, and the `Rule:` fallback. The `if` only tier matches every
/// sentence that contains "if", so the obligation tier never sees one.
pub struct RuleClassifier {
    tiers: Vec<Box<dyn TierMatcher>>,
    fallback: Fallback,
}

impl RuleClassifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        let tiers: Vec<Box<dyn TierMatcher>> = vec![
            Box::new(FullConditional::new(config.span_case)?),
            Box::new(BareIfThen::new()?),
            Box::new(IfOnly),
            Box::new(Obligation::new(config.span_case)?),
        ];
        Ok(Self {
            tiers,
            fallback: Fallback,
        })
    }

    pub fn classify(&self, sentence: &str) -> LogicalForm {
        for tier in &self.tiers {
            if let Some(form) = tier.apply(sentence) {
                tracing::trace!(tier = tier.name(), "classified: {}", form.text);
                return form;
            }
        }
        self.fallback.form(sentence)
    }

    pub fn tier_names(&self) -> Vec<&str> {
        self.tiers
            .iter()
            .map(|t| t.name())
            .chain(std::iter::once(self.fallback.name()))
            .collect()
    }
}

// ===== TIERS =====

/// `if <condition> then <action> [else <alternative>]`, normalized spans
pub struct FullConditional {
    pattern: Regex,
    span_case: SpanCase,
}

impl FullConditional {
    pub fn new(span_case: SpanCase) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(r"(?i)if (.+?) then (.+?)(?: else (.+))?$")?,
            span_case,
        })
    }
}

impl TierMatcher for FullConditional {
    fn apply(&self, sentence: &str) -> Option<LogicalForm> {
        find_keyword(sentence, "if")?;
        let caps = self.pattern.captures(sentence)?;

        // Only the span that closes the sentence loses its trailing punctuation
        let condition = normalize_span(&caps[1], self.span_case, false);
        let text = match caps.get(3) {
            Some(alternative) => format!(
                "IF {condition} THEN {} ELSE {}",
                normalize_span(&caps[2], self.span_case, false),
                normalize_span(alternative.as_str(), self.span_case, true)
            ),
            None => format!(
                "IF {condition} THEN {}",
                normalize_span(&caps[2], self.span_case, true)
            ),
        };

        Some(LogicalForm {
            tier: FormTier::FullConditional,
            text,
        })
    }

    fn name(&self) -> &str {
        "FullConditional"
    }
}

/// "if" and "then" present but not in the full shape (no surrounding
/// spaces, line breaks in between). Spans keep their source casing.
pub struct BareIfThen {
    then_word: Regex,
}

impl BareIfThen {
    pub fn new() -> Result<Self> {
        Ok(Self {
            then_word: Regex::new(r"(?i)\bthen\b")?,
        })
    }
}

impl TierMatcher for BareIfThen {
    fn apply(&self, sentence: &str) -> Option<LogicalForm> {
        find_keyword(sentence, "if")?;
        find_keyword(sentence, "then")?;

        let parts: Vec<&str> = self.then_word.split(sentence).collect();
        if parts.len() != 2 {
            return None;
        }

        // Only the first lowercase "if" is dropped; "If" at the start survives
        let condition = parts[0].replacen("if", "", 1);
        let condition = condition.trim();
        let action = parts[1].trim();

        Some(LogicalForm {
            tier: FormTier::BareIfThen,
            text: format!("IF {condition} THEN {action}"),
        })
    }

    fn name(&self) -> &str {
        "BareIfThen"
    }
}

/// "if" with no usable "then": everything after the keyword is the condition
pub struct IfOnly;

impl TierMatcher for IfOnly {
    fn apply(&self, sentence: &str) -> Option<LogicalForm> {
        let pos = find_keyword(sentence, "if")?;
        let condition = sentence[pos + "if".len()..].trim();

        Some(LogicalForm {
            tier: FormTier::IfOnly,
            text: format!("IF {condition} THEN [action unspecified]"),
        })
    }

    fn name(&self) -> &str {
        "IfOnly"
    }
}

/// `<subject> shall <action>`
pub struct Obligation {
    pattern: Regex,
    span_case: SpanCase,
}

impl Obligation {
    pub fn new(span_case: SpanCase) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(r"(?i)(.+?) shall (.+)")?,
            span_case,
        })
    }
}

impl TierMatcher for Obligation {
    fn apply(&self, sentence: &str) -> Option<LogicalForm> {
        find_keyword(sentence, "shall")?;

        let form = match self.pattern.captures(sentence) {
            Some(caps) => LogicalForm {
                tier: FormTier::Obligation,
                text: format!(
                    "IF {} THEN {}",
                    normalize_span(&caps[1], self.span_case, false),
                    normalize_span(&caps[2], self.span_case, true)
                ),
            },
            // "shall" leads the sentence or is part of another word
            None => LogicalForm {
                tier: FormTier::ObligationUnsplit,
                text: format!("IF condition THEN {sentence}"),
            },
        };
        Some(form)
    }

    fn name(&self) -> &str {
        "Obligation"
    }
}

/// Always matches; the sentence is kept verbatim
pub struct Fallback;

impl Fallback {
    fn form(&self, sentence: &str) -> LogicalForm {
        LogicalForm {
            tier: FormTier::Fallback,
            text: format!("Rule: {sentence}"),
        }
    }

    fn name(&self) -> &str {
        "Fallback"
    }
}

// ===== TEXT HELPERS =====

/// Byte offset of the first case-insensitive occurrence of an ASCII keyword.
/// Plain substring search: "if" is found inside "specified" too.
pub fn find_keyword(text: &str, keyword: &str) -> Option<usize> {
    text.to_ascii_lowercase().find(keyword)
}

/// Trim a captured span and apply the configured casing. `terminal` marks the
/// span that ends the sentence; only that one loses trailing `.`, `!` and `?`.
fn normalize_span(span: &str, span_case: SpanCase, terminal: bool) -> String {
    let mut span = span.trim();
    if terminal {
        span = span.trim_end_matches(['.', '!', '?']).trim_end();
    }
    match span_case {
        SpanCase::Capitalize => capitalize(span),
        SpanCase::Preserve => span.to_string(),
    }
}

/// First character uppercased, every other character lowercased.
///
/// The tail goes through `str::to_lowercase` so a word-final `Σ` becomes `ς`.
/// The head uses the uppercase mapping, not titlecase: `ß` becomes `SS`, and
/// digraphs like `ǆ` become `Ǆ` rather than `ǅ`.
pub fn capitalize(span: &str) -> String {
    let mut chars = span.chars();
    match chars.next() {
        Some(first) => {
            let mut out: String = first.to_uppercase().collect();
            out.push_str(&chars.as_str().to_lowercase());
            out
        }
        None => String::new(),
    }
}
