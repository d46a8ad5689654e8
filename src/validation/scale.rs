use serde::{Deserialize, Serialize};
use std::fmt;

use crate::financials::{CanonicalField, Financials};

// Plausibility bounds for a US-listed filer, in dollars / share counts.
const MIN_PLAUSIBLE_REVENUE: f64 = 1_000_000.0;
const MAX_PLAUSIBLE_REVENUE: f64 = 10_000_000_000_000.0;
const MIN_PLAUSIBLE_SHARES: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// One suspected unit-scale problem. Advisory only: findings annotate the
/// record, they never rewrite values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaleFinding {
    pub field: CanonicalField,
    pub severity: Severity,
    pub message: String,
    /// Corrective multiplier, where one can be proposed safely.
    pub suggested_multiplier: Option<f64>,
    pub suggested_value: Option<f64>,
}

impl ScaleFinding {
    fn new(field: CanonicalField, severity: Severity, message: String) -> Self {
        Self {
            field,
            severity,
            message,
            suggested_multiplier: None,
            suggested_value: None,
        }
    }

    fn with_correction(mut self, current: f64, multiplier: f64) -> Self {
        self.suggested_multiplier = Some(multiplier);
        self.suggested_value = Some(current * multiplier);
        self
    }
}

/// Detect likely thousands-vs-dollars mistakes, over-multiplication, share
/// count scale errors and gross cross-scale mismatches. Each heuristic is
/// independent; all are evaluated.
pub fn validate_scale(financials: &Financials) -> Vec<ScaleFinding> {
    let mut findings = Vec::new();

    if let Some(revenue) = financials.revenue {
        if revenue > 0.0 && revenue < MIN_PLAUSIBLE_REVENUE {
            let corrected = revenue * 1000.0;
            let mut finding = ScaleFinding::new(
                CanonicalField::Revenue,
                Severity::High,
                format!(
                    "Revenue {:.0} is below the plausible public-company minimum; \
                     value is likely reported in thousands",
                    revenue
                ),
            );
            if (MIN_PLAUSIBLE_REVENUE..=MAX_PLAUSIBLE_REVENUE).contains(&corrected) {
                finding = finding.with_correction(revenue, 1000.0);
            }
            findings.push(finding);
        }

        if revenue > MAX_PLAUSIBLE_REVENUE {
            findings.push(
                ScaleFinding::new(
                    CanonicalField::Revenue,
                    Severity::High,
                    format!(
                        "Revenue {:.0} exceeds any plausible public company; \
                         value looks over-scaled",
                        revenue
                    ),
                )
                .with_correction(revenue, 0.001),
            );
        }
    }

    if let (Some(net_income), Some(revenue)) = (financials.net_income, financials.revenue) {
        if net_income > 0.0 && revenue > 0.0 && net_income > revenue {
            findings.push(ScaleFinding::new(
                CanonicalField::NetIncome,
                Severity::Critical,
                format!(
                    "Net income {:.0} exceeds revenue {:.0}; no safe automatic correction",
                    net_income, revenue
                ),
            ));
        }
    }

    if let (Some(debt), Some(assets)) = (financials.total_debt, financials.total_assets) {
        if assets > 0.0 && debt > 2.0 * assets {
            findings.push(ScaleFinding::new(
                CanonicalField::TotalDebt,
                Severity::High,
                format!(
                    "Total debt {:.0} exceeds twice total assets {:.0}",
                    debt, assets
                ),
            ));
        }
    }

    if let Some(shares) = financials.shares_outstanding_basic {
        if shares > 0.0 && shares < MIN_PLAUSIBLE_SHARES {
            findings.push(
                ScaleFinding::new(
                    CanonicalField::SharesOutstandingBasic,
                    Severity::Medium,
                    format!(
                        "Share count {:.0} is implausibly low; value is likely \
                         reported in millions",
                        shares
                    ),
                )
                .with_correction(shares, 1_000_000.0),
            );
        }
    }

    if let (Some(receivables), Some(revenue)) =
        (financials.accounts_receivable, financials.revenue)
    {
        if revenue > 0.0 && receivables > 0.0 {
            let collection_days = receivables / revenue * 365.0;
            if collection_days > 365.0 {
                findings.push(ScaleFinding::new(
                    CanonicalField::AccountsReceivable,
                    Severity::Medium,
                    format!(
                        "Receivables imply {:.0} collection days; receivables and \
                         revenue are probably on different scales",
                        collection_days
                    ),
                ));
            }
        }
    }

    if let (Some(assets), Some(liabilities), Some(equity)) = (
        financials.total_assets,
        financials.total_liabilities,
        financials.total_equity,
    ) {
        if assets > 0.0 {
            let imbalance = (assets - liabilities - equity).abs();
            if imbalance > 0.5 * assets {
                findings.push(ScaleFinding::new(
                    CanonicalField::TotalAssets,
                    Severity::High,
                    format!(
                        "Balance sheet is out by {:.0} ({:.0}% of assets); probable \
                         cross-scale mismatch between statements",
                        imbalance,
                        imbalance / assets * 100.0
                    ),
                ));
            }
        }
    }

    findings
}
