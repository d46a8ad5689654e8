pub mod core;
pub mod extractor;
pub mod financials;
pub mod validation;
pub mod xbrl;

// Re-exports
pub use crate::core::{AiExtraction, AiExtractor, ExtractorConfig};
pub use extractor::Extractor;
pub use financials::{
    CanonicalField, FieldConfidence, FilingType, Financials, MappingResult, MergedRecord,
    Provenance, RecordSource,
};
pub use validation::{ScaleFinding, Severity};
