use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::financials::{CanonicalField, FilingType, Financials};

/// What the probabilistic extraction pass returns: the same canonical-field
/// shape, its own per-field confidence, and any warnings it raised.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiExtraction {
    pub financials: Financials,
    pub confidence: HashMap<CanonicalField, f64>,
    pub warnings: Vec<String>,
}

/// The language-model collaborator boundary. The orchestrator is agnostic to
/// which underlying model produced the extraction; implementations wrap the
/// actual client and its credentials.
#[async_trait::async_trait]
pub trait AiExtractor: Send + Sync {
    async fn extract(&self, document: &str, filing_type: FilingType) -> Result<AiExtraction>;
}
