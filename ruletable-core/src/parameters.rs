use crate::config::ParameterConfig;
use crate::error::Result;
use crate::types::{ParameterKind, ParameterList, ParameterToken};
use regex::Regex;
use std::collections::HashSet;
use std::ops::Range;

/// Pulls money, percentages, time periods and plain numbers out of a sentence.
///
/// Patterns run one after another over the whole sentence, so all currency
/// matches come first, then percentages, then time periods, then plain
/// numbers. Dedup is by exact text: `$1,000` and the `1,000` inside it are
/// both kept.
pub struct ParameterExtractor {
    patterns: Vec<(ParameterKind, Regex)>,
    suppress_nested: bool,
}

impl ParameterExtractor {
    pub fn new(config: &ParameterConfig) -> Result<Self> {
        let patterns = vec![
            (
                ParameterKind::Currency,
                Regex::new(r"\$\d+(?:,\d{3})*(?:\.\d+)?")?,
            ),
            (ParameterKind::Percentage, Regex::new(r"\d+(?:\.\d+)?\s*%")?),
            (
                ParameterKind::TimePeriod,
                Regex::new(r"\d+\s*(?:days?|months?|years?)")?,
            ),
            (ParameterKind::Number, Regex::new(r"\d+(?:,\d{3})*(?:\.\d+)?")?),
        ];

        Ok(Self {
            patterns,
            suppress_nested: config.suppress_nested,
        })
    }

    pub fn extract(&self, sentence: &str) -> ParameterList {
        let mut tokens = Vec::new();
        let mut seen = HashSet::new();
        let mut captured: Vec<Range<usize>> = Vec::new();

        for (kind, pattern) in &self.patterns {
            let mut spans = Vec::new();
            for m in pattern.find_iter(sentence) {
                if self.suppress_nested && is_nested(&captured, m.range()) {
                    continue;
                }
                spans.push(m.range());

                let text = m.as_str().trim_matches([' ', ',', '.']);
                if seen.insert(text.to_string()) {
                    tokens.push(ParameterToken {
                        kind: *kind,
                        text: text.to_string(),
                    });
                }
            }
            // Spans only shadow later patterns, never matches of the same one
            captured.extend(spans);
        }

        ParameterList { tokens }
    }
}

fn is_nested(captured: &[Range<usize>], span: Range<usize>) -> bool {
    captured
        .iter()
        .any(|outer| outer.start <= span.start && span.end <= outer.end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(sentence: &str) -> String {
        ParameterExtractor::new(&ParameterConfig::default())
            .unwrap()
            .extract(sentence)
            .to_string()
    }

    fn extract_suppressed(sentence: &str) -> String {
        let config = ParameterConfig {
            suppress_nested: true,
        };
        ParameterExtractor::new(&config)
            .unwrap()
            .extract(sentence)
            .to_string()
    }

    #[test]
    fn test_patterns_contribute_in_fixed_order() {
        assert_eq!(
            extract("Pay $1,000 within 30 days or 5% penalty"),
            "$1,000, 5%, 30 days, 1,000, 30, 5"
        );
    }

    #[test]
    fn test_nested_suppression() {
        assert_eq!(
            extract_suppressed("Pay $1,000 within 30 days or 5% penalty"),
            "$1,000, 5%, 30 days"
        );
    }

    #[test]
    fn test_nothing_found_yields_none() {
        assert_eq!(extract("General provisions apply to all policies."), "None");
        assert_eq!(extract(""), "None");
    }

    #[test]
    fn test_exact_duplicates_collapse() {
        assert_eq!(extract("Pay $500 now and $500 later."), "$500, 500");
    }

    #[test]
    fn test_sentence_final_period_is_trimmed() {
        // The plain pattern takes "2024" and leaves the period outside the
        // match; the decimal case needs a digit after the dot
        assert_eq!(extract("Effective in 2024."), "2024");
        assert_eq!(extract("A rate of 3.75% applies."), "3.75%, 3.75");
    }

    #[test]
    fn test_time_periods_singular_and_plural() {
        assert_eq!(
            extract("Wait 1 day, 6 months or 2years."),
            "1 day, 6 months, 2years, 1, 6, 2"
        );
    }

    #[test]
    fn test_percentage_with_space() {
        assert_eq!(extract("Up to 10 % of the limit"), "10 %, 10");
    }

    #[test]
    fn test_currency_with_cents() {
        assert_eq!(extract("A fee of $1,250.50 is due."), "$1,250.50, 1,250.50");
    }

    #[test]
    fn test_tokens_carry_kind() {
        let list = ParameterExtractor::new(&ParameterConfig::default())
            .unwrap()
            .extract("Pay $20 after 3 years");
        let kinds: Vec<ParameterKind> = list.tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ParameterKind::Currency,
                ParameterKind::TimePeriod,
                ParameterKind::Number,
                ParameterKind::Number,
            ]
        );
        assert_eq!(list.texts(), vec!["$20", "3 years", "20", "3"]);
    }
}
