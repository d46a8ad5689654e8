use std::sync::Arc;
use strum::IntoEnumIterator;

use crate::core::{AiExtraction, AiExtractor, ExtractorConfig};
use crate::financials::{
    CanonicalField, FieldConfidence, FilingType, Financials, MappingResult, MergedRecord,
    Provenance, RecordSource,
};
use crate::validation;
use crate::xbrl;
use crate::xbrl::facts::IdentityFacts;

// Base per-field confidence before calibration.
const XBRL_BASE_CONFIDENCE: f64 = 0.9;
const DERIVED_BASE_CONFIDENCE: f64 = 0.85;
const AI_DEFAULT_CONFIDENCE: f64 = 0.7;

/// Decides whether the deterministic XBRL mapping stands alone or must be
/// merged with the probabilistic extraction, performs the field-level merge,
/// and runs the record through calibration and scale validation.
pub struct Extractor {
    ai: Arc<dyn AiExtractor>,
    config: ExtractorConfig,
}

impl Extractor {
    pub fn new(ai: Arc<dyn AiExtractor>) -> Self {
        Self::with_config(ai, ExtractorConfig::default())
    }

    pub fn with_config(ai: Arc<dyn AiExtractor>, config: ExtractorConfig) -> Self {
        Self { ai, config }
    }

    /// Extract a validated record from a filing document. Never fails: the
    /// worst case is a record with unset fields and an exhaustive warnings
    /// list.
    pub async fn extract(&self, document: &str, filing_type: FilingType) -> MergedRecord {
        let detected = xbrl::is_inline_xbrl(document);

        let (mapping, identity) = if detected {
            (
                xbrl::parse_document(document, filing_type),
                xbrl::facts::parse_identity(document),
            )
        } else {
            log::info!("No inline XBRL detected, relying on AI extraction");
            (
                xbrl::mapper::map_facts(&[], &xbrl::ResolvedPeriods::default(), 0),
                IdentityFacts::default(),
            )
        };

        let mut warnings = Vec::new();
        if mapping.parse_errors > 0 {
            warnings.push(format!(
                "{} malformed XBRL elements were skipped during parsing",
                mapping.parse_errors
            ));
        }

        let xbrl_sufficient = detected
            && mapping.financials.is_set(CanonicalField::Revenue)
            && mapping.confidence >= self.config.min_xbrl_confidence;

        let ai_result = if xbrl_sufficient {
            log::info!(
                "XBRL mapping sufficient (coverage {:.2}), skipping AI extraction",
                mapping.confidence
            );
            None
        } else {
            match self.call_ai(document, filing_type).await {
                Ok(extraction) => Some(extraction),
                Err(reason) => {
                    log::warn!("AI extraction unavailable: {}", reason);
                    warnings.push(format!(
                        "AI extraction unavailable ({}); returning XBRL-only result",
                        reason
                    ));
                    None
                }
            }
        };

        let mut record = merge(mapping, identity, ai_result, warnings);

        let adjustments = validation::calibrate(&mut record);
        log::debug!("Calibration applied {} adjustments", adjustments.len());

        record.scale_findings = validation::validate_scale(&record.financials);
        for finding in &record.scale_findings {
            record.warnings.push(format!(
                "[{}] {}: {}",
                finding.severity, finding.field, finding.message
            ));
        }

        record
    }

    async fn call_ai(&self, document: &str, filing_type: FilingType) -> Result<AiExtraction, String> {
        match tokio::time::timeout(self.config.ai_timeout, self.ai.extract(document, filing_type))
            .await
        {
            Ok(Ok(extraction)) => Ok(extraction),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!("timed out after {:?}", self.config.ai_timeout)),
        }
    }
}

/// Field-level priority merge. A present, non-zero XBRL value is
/// authoritative and is never overwritten by an AI value, whatever the AI
/// confidence; AI fills the gaps. Identity fields fill from AI only when the
/// XBRL side is missing or a placeholder.
fn merge(
    mapping: MappingResult,
    identity: IdentityFacts,
    ai: Option<AiExtraction>,
    mut warnings: Vec<String>,
) -> MergedRecord {
    let mut financials = mapping.financials.clone();
    let mut provenance = mapping.provenance.clone();
    let mut confidence = FieldConfidence::default();

    financials.company_name = identity.company_name;
    financials.ticker = identity.ticker;
    financials.fiscal_year = identity.fiscal_year;
    financials.fiscal_period = identity.fiscal_period;

    let mut xbrl_fields = 0usize;
    let mut ai_fields = 0usize;

    for field in CanonicalField::iter() {
        let xbrl_value = financials.get(field).filter(|v| *v != 0.0);
        match xbrl_value {
            Some(_) => {
                xbrl_fields += 1;
                let base = match provenance.get(&field) {
                    Some(Provenance::Derived) => DERIVED_BASE_CONFIDENCE,
                    _ => XBRL_BASE_CONFIDENCE,
                };
                confidence.set(field, base);
            }
            None => {
                let ai_value = ai.as_ref().and_then(|a| a.financials.get(field));
                if let Some(value) = ai_value {
                    financials.set(field, value);
                    provenance.insert(field, Provenance::Ai);
                    ai_fields += 1;
                    let base = ai
                        .as_ref()
                        .and_then(|a| a.confidence.get(&field).copied())
                        .unwrap_or(AI_DEFAULT_CONFIDENCE);
                    confidence.set(field, base);
                }
            }
        }
    }

    if let Some(a) = &ai {
        fill_identity(&mut financials, &a.financials);
        warnings.extend(a.warnings.iter().cloned());
    }

    let source = match (xbrl_fields, ai_fields) {
        (_, 0) => RecordSource::Xbrl,
        (0, _) => RecordSource::Ai,
        _ => RecordSource::Hybrid,
    };
    log::debug!(
        "Merged record: {} XBRL fields, {} AI fields, source {:?}",
        xbrl_fields,
        ai_fields,
        source
    );

    MergedRecord {
        financials,
        confidence,
        provenance,
        source,
        warnings,
        scale_findings: Vec::new(),
    }
}

fn is_placeholder(value: &Option<String>) -> bool {
    match value {
        None => true,
        Some(s) => {
            let s = s.trim().to_lowercase();
            s.is_empty() || s == "n/a" || s == "none" || s == "unknown"
        }
    }
}

fn fill_identity(target: &mut Financials, ai: &Financials) {
    if is_placeholder(&target.company_name) && !is_placeholder(&ai.company_name) {
        target.company_name = ai.company_name.clone();
    }
    if is_placeholder(&target.ticker) && !is_placeholder(&ai.ticker) {
        target.ticker = ai.ticker.clone();
    }
    if is_placeholder(&target.fiscal_year) && !is_placeholder(&ai.fiscal_year) {
        target.fiscal_year = ai.fiscal_year.clone();
    }
    if is_placeholder(&target.fiscal_period) && !is_placeholder(&ai.fiscal_period) {
        target.fiscal_period = ai.fiscal_period.clone();
    }
}
