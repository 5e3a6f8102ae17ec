use crate::builder::RuleRecordBuilder;
use crate::classifier::RuleClassifier;
use crate::config::ExtractionConfig;
use crate::parameters::ParameterExtractor;
use crate::segmenter::Segmenter;
use crate::sources::TextSource;
use crate::types::*;
use anyhow::{Context, Result};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::time::Instant;

/// Captured intermediate outputs from each pipeline stage
/// Used by stage dumps and tests to inspect each boundary
#[derive(Debug, Clone, serde::Serialize)]
pub struct PipelineStages {
    pub pages: Vec<Option<String>>,
    /// Sentences per page, in page order
    pub sentences: Vec<Vec<String>>,
    pub forms: Vec<LogicalForm>,
    pub table: RuleTable,
}

/// Runs the extraction pipeline over one document at a time.
///
/// Compiled patterns are built once and shared by every document; the rule
/// code counter is created fresh inside each call, so one processor can
/// serve many documents (and threads) without codes leaking between them.
pub struct RuleProcessor {
    config: ExtractionConfig,
    segmenter: Segmenter,
    classifier: RuleClassifier,
    extractor: ParameterExtractor,
}

impl RuleProcessor {
    pub fn new(config: ExtractionConfig) -> crate::error::Result<Self> {
        config.validate()?;
        Ok(Self {
            segmenter: Segmenter::new()?,
            classifier: RuleClassifier::new(&config.classifier)?,
            extractor: ParameterExtractor::new(&config.parameters)?,
            config,
        })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }

    pub fn classifier(&self) -> &RuleClassifier {
        &self.classifier
    }

    pub fn extractor(&self) -> &ParameterExtractor {
        &self.extractor
    }

    /// Pages → RuleTable. Never fails on text content.
    pub fn process_pages(&self, pages: &[Option<String>], source_name: &str) -> RuleTable {
        let start_time = Instant::now();
        let sentences = self.segment_pages(pages);
        let table = self.build_table(pages, &sentences, source_name);

        tracing::info!(
            source = source_name,
            pages = pages.len(),
            records = table.records.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "extracted rule table"
        );
        table
    }

    /// Convenience for a single block of text (one page)
    pub fn process_text(&self, text: &str, source_name: &str) -> RuleTable {
        self.process_pages(&[Some(text.to_string())], source_name)
    }

    /// Read pages through `source` and run the pipeline
    pub fn process_source(&self, source: &dyn TextSource, input: &Path) -> Result<RuleTable> {
        tracing::info!("reading {} with {} source", input.display(), source.name());
        let pages = source
            .read_file(input)
            .with_context(|| format!("failed to extract text from {}", input.display()))?;

        let source_name = input
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document");
        Ok(self.process_pages(&pages, source_name))
    }

    /// Same as `process_pages` but keeps every intermediate stage
    pub fn process_pages_capture_stages(
        &self,
        pages: &[Option<String>],
        source_name: &str,
    ) -> PipelineStages {
        let sentences = self.segment_pages(pages);
        let forms = sentences
            .iter()
            .flatten()
            .map(|sentence| self.classifier.classify(sentence))
            .collect();
        let table = self.build_table(pages, &sentences, source_name);

        PipelineStages {
            pages: pages.to_vec(),
            sentences,
            forms,
            table,
        }
    }

    fn segment_pages(&self, pages: &[Option<String>]) -> Vec<Vec<String>> {
        pages
            .iter()
            .map(|page| self.segmenter.segment_page(page.as_deref()))
            .collect()
    }

    fn build_table(
        &self,
        pages: &[Option<String>],
        sentences: &[Vec<String>],
        source_name: &str,
    ) -> RuleTable {
        let mut builder = RuleRecordBuilder::new(&self.config, &self.classifier, &self.extractor);
        let mut pages_with_rules = 0;

        for (page_index, page_sentences) in sentences.iter().enumerate() {
            let before = builder.len();
            for sentence in page_sentences {
                builder.push_sentence(sentence);
            }
            if builder.len() > before {
                pages_with_rules += 1;
            } else {
                tracing::debug!("page {} produced no rules", page_index + 1);
            }
        }

        RuleTable {
            schema_version: SCHEMA_VERSION.to_string(),
            document_info: DocumentInfo {
                source: source_name.to_string(),
                source_hash: calculate_source_hash(pages),
                config_hash: calculate_config_hash(&self.config),
                page_count: pages.len(),
                pages_with_rules,
                extracted_at: Utc::now(),
            },
            records: builder.finish(),
        }
    }
}

/// Hash of the page texts; absent pages still count as page boundaries
pub fn calculate_source_hash(pages: &[Option<String>]) -> String {
    let mut hasher = Sha256::new();
    for page in pages {
        hasher.update(page.as_deref().unwrap_or("").as_bytes());
        hasher.update(b"\x0c");
    }
    format!("{:x}", hasher.finalize())
}

pub fn calculate_config_hash(config: &ExtractionConfig) -> String {
    // Plain structs of strings and numbers always serialize
    let config_json = serde_json::to_string(config).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(config_json.as_bytes());
    format!("{:x}", hasher.finalize())
}
