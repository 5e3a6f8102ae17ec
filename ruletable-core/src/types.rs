use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The schema version stamped on every rule table output.
/// Bump this when the output shape changes.
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Column names in the order the downstream tabular writer expects them.
pub const COLUMNS: [&str; 6] = [
    "State",
    "Rule Code",
    "Insurance Class",
    "Notes",
    "Rules",
    "Parameters",
];

/// Sentinel written to the Parameters column when nothing was extracted.
pub const NO_PARAMETERS: &str = "None";

// ===== RECORD TYPES =====

/// One structured output row. Field order matches `COLUMNS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRecord {
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Rule Code")]
    pub rule_code: String,
    #[serde(rename = "Insurance Class")]
    pub insurance_class: String,
    /// The trimmed source sentence, verbatim
    #[serde(rename = "Notes")]
    pub notes: String,
    #[serde(rename = "Rules")]
    pub logical_form: String,
    #[serde(rename = "Parameters")]
    pub parameters: String,
}

impl RuleRecord {
    /// Cell values in column order
    pub fn to_row(&self) -> [&str; 6] {
        [
            self.state.as_str(),
            self.rule_code.as_str(),
            self.insurance_class.as_str(),
            self.notes.as_str(),
            self.logical_form.as_str(),
            self.parameters.as_str(),
        ]
    }
}

/// Metadata about the document a rule table was built from.
/// One per document, independent of the records themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Display name of the source (usually the input file name)
    pub source: String,
    /// SHA-256 of the concatenated page text
    pub source_hash: String,
    /// SHA-256 of the serialized extraction config
    pub config_hash: String,
    pub page_count: usize,
    /// Pages that produced at least one record
    pub pages_with_rules: usize,
    pub extracted_at: DateTime<Utc>,
}

/// Full output for one document: records in page order, then in-page order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleTable {
    pub schema_version: String,
    pub document_info: DocumentInfo,
    pub records: Vec<RuleRecord>,
}

impl RuleTable {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Header + rows layout handed to spreadsheet writers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabularRules {
    pub format: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Minimal layout: just the logical forms in order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatRules {
    pub format: String,
    pub rules: Vec<String>,
}

// ===== CLASSIFIER TYPES =====

/// Which classifier tier produced a logical form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormTier {
    FullConditional,
    BareIfThen,
    IfOnly,
    Obligation,
    /// "shall" was present but the subject/action split failed
    ObligationUnsplit,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalForm {
    pub tier: FormTier,
    pub text: String,
}

impl fmt::Display for LogicalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// ===== PARAMETER TYPES =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterKind {
    Currency,
    Percentage,
    TimePeriod,
    Number,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterToken {
    pub kind: ParameterKind,
    /// Matched text after trimming spaces, commas and periods
    pub text: String,
}

/// Deduplicated tokens of one sentence, in extraction order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterList {
    pub tokens: Vec<ParameterToken>,
}

impl ParameterList {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}

impl fmt::Display for ParameterList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tokens.is_empty() {
            return f.write_str(NO_PARAMETERS);
        }
        f.write_str(&self.texts().join(", "))
    }
}
