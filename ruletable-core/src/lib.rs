// Ruletable Core Library
//
// Turns page text from regulatory and insurance documents into ordered
// rule records: sentence segmentation, IF/THEN classification and
// parameter extraction. Text extraction from the source document happens
// upstream behind the TextSource boundary.

pub mod types;
pub mod error;
pub mod config;
pub mod segmenter;
pub mod classifier;
pub mod parameters;
pub mod builder;
pub mod processor;
pub mod sources;
pub mod serialization;

// Re-export main types and functions for easy use
pub use types::*;
pub use error::ExtractError;
pub use config::ExtractionConfig;
pub use segmenter::Segmenter;
pub use classifier::RuleClassifier;
pub use parameters::ParameterExtractor;
pub use builder::RuleRecordBuilder;
pub use processor::RuleProcessor;
pub use sources::{PlainTextSource, TextSource};
