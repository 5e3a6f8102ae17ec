use crate::classifier::RuleClassifier;
use crate::config::ExtractionConfig;
use crate::parameters::ParameterExtractor;
use crate::types::RuleRecord;

/// Assembles the records of one document.
///
/// Owns the rule code counter and the output collection; create a fresh
/// builder for every document so codes restart at 1.
pub struct RuleRecordBuilder<'a> {
    config: &'a ExtractionConfig,
    classifier: &'a RuleClassifier,
    extractor: &'a ParameterExtractor,
    counter: usize,
    records: Vec<RuleRecord>,
}

impl<'a> RuleRecordBuilder<'a> {
    pub fn new(
        config: &'a ExtractionConfig,
        classifier: &'a RuleClassifier,
        extractor: &'a ParameterExtractor,
    ) -> Self {
        Self {
            config,
            classifier,
            extractor,
            counter: 0,
            records: Vec::new(),
        }
    }

    /// Append one record for `sentence`. Blank sentences are skipped and
    /// do not consume a rule code; returns whether a record was added.
    pub fn push_sentence(&mut self, sentence: &str) -> bool {
        let notes = sentence.trim();
        if notes.is_empty() {
            return false;
        }

        self.counter += 1;
        let rule_code = self.config.rule_code.format(self.counter);
        let form = self.classifier.classify(notes);
        let parameters = self.extractor.extract(notes);

        tracing::debug!(
            rule_code = %rule_code,
            tier = ?form.tier,
            parameters = parameters.len(),
            "built rule record"
        );

        self.records.push(RuleRecord {
            state: self.config.state.clone(),
            rule_code,
            insurance_class: self.config.insurance_class.clone(),
            notes: notes.to_string(),
            logical_form: form.text,
            parameters: parameters.to_string(),
        });
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn finish(self) -> Vec<RuleRecord> {
        self.records
    }
}
