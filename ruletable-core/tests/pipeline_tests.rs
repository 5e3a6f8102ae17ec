//! Pipeline boundary tests.
//!
//! Run the whole extraction pipeline through the public API against the
//! text fixture in `test_fixtures/` and assert on the record table:
//!
//! - Boundary 1 (page text → sentences): page splitting and segmentation
//! - Boundary 2 (sentences → records): codes, logical forms, parameters
//! - Boundary 3 (records → output): column contract of the serializers

use ruletable_core::config::SpanCase;
use ruletable_core::{
    ExtractionConfig, PlainTextSource, RuleProcessor, RuleRecord, RuleTable, TextSource,
};
use std::path::PathBuf;

// ============================================================================
// Fixture helpers
// ============================================================================

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

fn default_processor() -> RuleProcessor {
    RuleProcessor::new(ExtractionConfig::default()).expect("default config is valid")
}

fn load_sample_table() -> RuleTable {
    default_processor()
        .process_source(&PlainTextSource::new(), &fixture_path("oklahoma_sample.txt"))
        .expect("fixture should be readable")
}

fn record<'a>(table: &'a RuleTable, code: &str) -> &'a RuleRecord {
    table
        .records
        .iter()
        .find(|r| r.rule_code == code)
        .unwrap_or_else(|| panic!("missing record {code}"))
}

// ============================================================================
// Boundary 1: page text → sentences
// ============================================================================

mod segmentation_boundary {
    use super::*;

    #[test]
    fn fixture_has_three_pages_one_blank() {
        let pages = PlainTextSource::new()
            .read_file(&fixture_path("oklahoma_sample.txt"))
            .unwrap();
        assert_eq!(pages.len(), 3);
        assert!(pages[1].is_none(), "whitespace-only page should be absent");
    }

    #[test]
    fn paragraph_endings_split_sentences() {
        let sentences = default_processor().segmenter().segment(
            "The rate shall not exceed 5%.\nIf income exceeds $50,000 then tax applies.\n",
        );
        assert_eq!(
            sentences,
            vec![
                "The rate shall not exceed 5%.",
                "If income exceeds $50,000 then tax applies.",
            ]
        );
    }

    #[test]
    fn heading_without_punctuation_joins_next_sentence() {
        let table = load_sample_table();
        assert_eq!(
            record(&table, "R001").notes,
            "GENERAL INSURANCE RULES\nThe insurer shall provide written notice of cancellation \
             at least 10 days before the effective date."
        );
    }
}

// ============================================================================
// Boundary 2: sentences → records
// ============================================================================

mod record_contract {
    use super::*;

    #[test]
    fn rule_codes_are_sequential_across_pages() {
        let table = load_sample_table();
        let codes: Vec<&str> = table.records.iter().map(|r| r.rule_code.as_str()).collect();
        assert_eq!(codes, vec!["R001", "R002", "R003", "R004", "R005", "R006"]);
        assert_eq!(table.document_info.page_count, 3);
        assert_eq!(table.document_info.pages_with_rules, 2);
        assert_eq!(table.document_info.source, "oklahoma_sample.txt");
    }

    #[test]
    fn every_record_carries_configured_labels() {
        let table = load_sample_table();
        for r in &table.records {
            assert_eq!(r.state, "Oklahoma");
            assert_eq!(r.insurance_class, "General Insurance");
            assert!(!r.notes.is_empty());
            assert!(r.logical_form.starts_with("IF ") || r.logical_form.starts_with("Rule: "));
        }
    }

    #[test]
    fn obligation_after_heading() {
        let table = load_sample_table();
        let r = record(&table, "R001");
        assert_eq!(
            r.logical_form,
            "IF The insurer THEN Provide written notice of cancellation \
             at least 10 days before the effective date"
        );
        assert_eq!(r.parameters, "10 days, 10");
    }

    #[test]
    fn full_conditional_with_else() {
        let table = load_sample_table();
        let r = record(&table, "R002");
        assert_eq!(
            r.logical_form,
            "IF The premium is not paid within 30 days \
             THEN The policy lapses ELSE Coverage continues"
        );
        assert_eq!(r.parameters, "30 days, 30");
    }

    #[test]
    fn fallback_rule() {
        let table = load_sample_table();
        let r = record(&table, "R003");
        assert_eq!(
            r.logical_form,
            "Rule: A late fee of $25 applies to each missed installment."
        );
        assert_eq!(r.parameters, "$25, 25");
    }

    #[test]
    fn conditional_wrapped_over_two_lines_uses_bare_split() {
        let table = load_sample_table();
        let r = record(&table, "R004");
        assert_eq!(
            r.logical_form,
            "IF If the claim exceeds $1,000,000 THEN the claim requires\nreview by the board."
        );
        assert_eq!(r.parameters, "$1,000,000, 1,000,000");
    }

    #[test]
    fn remaining_records() {
        let table = load_sample_table();
        assert_eq!(record(&table, "R005").parameters, "7.5%, 7.5");
        assert_eq!(record(&table, "R006").logical_form, "Rule: Section 12 is reserved.");
        assert_eq!(record(&table, "R006").parameters, "12");
    }

    #[test]
    fn reruns_produce_identical_records() {
        let first = load_sample_table();
        let second = load_sample_table();
        assert_eq!(first.records, second.records);
        assert_eq!(first.document_info.source_hash, second.document_info.source_hash);
    }

    #[test]
    fn only_empty_pages_yield_no_records() {
        let pages = [None, Some("\n\t\n".to_string()), None];
        let table = default_processor().process_pages(&pages, "empty");
        assert!(table.records.is_empty());
    }

    #[test]
    fn custom_labels_and_preserved_case() {
        let mut config = ExtractionConfig::from_yaml(
            "state: Kansas\ninsurance_class: Property\nrule_code:\n  prefix: KS-\n  width: 4\n",
        )
        .unwrap();
        config.classifier.span_case = SpanCase::Preserve;

        let table = RuleProcessor::new(config)
            .unwrap()
            .process_text("If the NAIC model applies then use Form A.\n", "kansas.txt");
        let r = &table.records[0];
        assert_eq!(r.state, "Kansas");
        assert_eq!(r.insurance_class, "Property");
        assert_eq!(r.rule_code, "KS-0001");
        assert_eq!(r.logical_form, "IF the NAIC model applies THEN use Form A");
    }

    #[test]
    fn processors_are_independent_across_threads() {
        let processor = std::sync::Arc::new(default_processor());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let processor = std::sync::Arc::clone(&processor);
                std::thread::spawn(move || processor.process_text("A.\nB.\nC.\n", "t"))
            })
            .collect();

        for handle in handles {
            let table = handle.join().unwrap();
            let codes: Vec<&str> = table.records.iter().map(|r| r.rule_code.as_str()).collect();
            assert_eq!(codes, vec!["R001", "R002", "R003"]);
        }
    }
}

// ============================================================================
// Boundary 3: records → serialized output
// ============================================================================

mod output_contract {
    use super::*;
    use serde_json::Value;

    #[test]
    fn records_format_keeps_column_names() {
        let table = load_sample_table();
        let json: Value =
            serde_json::from_str(&table.to_json_with_format("records").unwrap()).unwrap();

        assert_eq!(json["schema_version"], "0.1.0");
        let first = &json["records"][0];
        for column in ["State", "Rule Code", "Insurance Class", "Notes", "Rules", "Parameters"] {
            assert!(first[column].is_string(), "missing column {column}");
        }
    }

    #[test]
    fn table_format_rows_match_records() {
        let table = load_sample_table();
        let json: Value =
            serde_json::from_str(&table.to_json_with_format("table").unwrap()).unwrap();

        assert_eq!(json["columns"][1], "Rule Code");
        assert_eq!(json["rows"].as_array().unwrap().len(), table.records.len());
        assert_eq!(
            json["rows"][2][4],
            "Rule: A late fee of $25 applies to each missed installment."
        );
    }
}
