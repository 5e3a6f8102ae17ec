use crate::error::{ExtractError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// Default value functions for serde
fn default_state() -> String {
    "Oklahoma".to_string()
}

fn default_insurance_class() -> String {
    "General Insurance".to_string()
}

fn default_prefix() -> String {
    "R".to_string()
}

fn default_width() -> usize {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Label written to the State column of every record
    #[serde(default = "default_state")]
    pub state: String,
    /// Label written to the Insurance Class column of every record
    #[serde(default = "default_insurance_class")]
    pub insurance_class: String,
    #[serde(default)]
    pub rule_code: RuleCodeConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub parameters: ParameterConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleCodeConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Zero-padded width of the counter
    #[serde(default = "default_width")]
    pub width: usize,
}

impl Default for RuleCodeConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            width: default_width(),
        }
    }
}

impl RuleCodeConfig {
    pub fn format(&self, counter: usize) -> String {
        format!("{}{:0width$}", self.prefix, counter, width = self.width)
    }
}

/// How captured condition/action spans are cased in the logical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanCase {
    /// First character uppercased, the rest lowercased. Lossy for acronyms
    /// and proper nouns, kept as the default for output compatibility.
    #[default]
    Capitalize,
    /// Keep the casing of the source text
    Preserve,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub span_case: SpanCase,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParameterConfig {
    /// Drop matches that sit inside a span an earlier pattern already captured
    /// (e.g. the bare `30` inside `30 days`). Off by default.
    #[serde(default)]
    pub suppress_nested: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            state: default_state(),
            insurance_class: default_insurance_class(),
            rule_code: RuleCodeConfig::default(),
            classifier: ClassifierConfig::default(),
            parameters: ParameterConfig::default(),
        }
    }
}

impl ExtractionConfig {
    /// Load config from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ExtractError::Io {
            path: PathBuf::from(path),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: ExtractionConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                tracing::warn!("failed to load config from {p}: {e}; using defaults");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.rule_code.prefix.is_empty() {
            return Err(ExtractError::InvalidConfig(
                "rule_code.prefix must not be empty".to_string(),
            ));
        }
        if self.rule_code.width == 0 {
            return Err(ExtractError::InvalidConfig(
                "rule_code.width must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
