use anyhow::Result;
use std::time::Duration;

/// Tunables for the extraction orchestrator.
#[derive(Clone, Debug)]
pub struct ExtractorConfig {
    /// Minimum coverage confidence for an XBRL-only result to stand alone.
    pub min_xbrl_confidence: f64,
    /// Bound on the AI collaborator call; a timeout degrades to XBRL-only.
    pub ai_timeout: Duration,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_xbrl_confidence: 0.4,
            ai_timeout: Duration::from_secs(60),
        }
    }
}

impl ExtractorConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(threshold) = std::env::var("FINFACTS_MIN_XBRL_CONFIDENCE") {
            config.min_xbrl_confidence = threshold.parse()?;
        }
        if let Ok(timeout) = std::env::var("FINFACTS_AI_TIMEOUT_SECS") {
            config.ai_timeout = Duration::from_secs(timeout.parse()?);
        }

        Ok(config)
    }
}
