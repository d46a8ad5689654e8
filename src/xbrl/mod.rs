pub mod concepts;
pub mod contexts;
pub mod detector;
pub mod facts;
pub mod mapper;
pub mod periods;

pub use contexts::{Context, ContextPeriod};
pub use detector::is_inline_xbrl;
pub use facts::{Fact, IdentityFacts};
pub use periods::ResolvedPeriods;

use crate::financials::{FilingType, MappingResult};

/// Run the deterministic half of the pipeline: contexts + facts out of the
/// document, period resolution, then concept mapping. Pure function of the
/// document text and filing type; structural errors are counted, never fatal.
pub fn parse_document(content: &str, filing_type: FilingType) -> MappingResult {
    let (contexts, context_errors) = contexts::parse_contexts(content);
    let (fact_list, fact_errors) = facts::parse_facts(content);
    let periods = periods::resolve_periods(&contexts, filing_type);
    mapper::map_facts(&fact_list, &periods, context_errors + fact_errors)
}
