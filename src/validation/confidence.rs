use serde::{Deserialize, Serialize};

use crate::financials::{CanonicalField, MergedRecord, Provenance, RecordSource};

const BALANCE_TOLERANCE: f64 = 0.05;
const BALANCE_PENALTY_CAP: f64 = 0.3;
const GROSS_PROFIT_TOLERANCE: f64 = 0.02;
const GROSS_PROFIT_PENALTY_CAP: f64 = 0.2;
const OPERATING_INCOME_PENALTY: f64 = 0.3;
const DEBT_SUM_TOLERANCE: f64 = 0.10;
const DEBT_SUM_PENALTY: f64 = 0.2;
const ROUND_NUMBER_PENALTY: f64 = 0.1;
const ROUND_NUMBER_UNIT: f64 = 10_000_000.0;
const OVERALL_PENALTY_PER_ADJUSTMENT: f64 = 0.05;
const OVERALL_PENALTY_CAP: f64 = 0.2;
const OVERALL_FLOOR: f64 = 0.1;

/// One applied confidence penalty, with a human-readable reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceAdjustment {
    pub field: CanonicalField,
    pub delta: f64,
    pub reason: String,
}

/// Re-score per-field confidence using cross-field arithmetic identities and
/// the source multiplier, then recompute the overall score. Every triggered
/// check appends its reason to the record's warnings.
pub fn calibrate(record: &mut MergedRecord) -> Vec<ConfidenceAdjustment> {
    let mut adjustments = Vec::new();

    check_balance_sheet_identity(record, &mut adjustments);
    check_gross_profit_identity(record, &mut adjustments);
    check_operating_income_bound(record, &mut adjustments);
    check_debt_sum_identity(record, &mut adjustments);
    check_round_numbers(record, &mut adjustments);
    apply_source_multiplier(record);

    record.confidence.overall = overall_confidence(record, adjustments.len());

    for adj in &adjustments {
        record
            .warnings
            .push(format!("{} confidence -{:.2}: {}", adj.field, adj.delta, adj.reason));
    }

    adjustments
}

fn penalize(
    record: &mut MergedRecord,
    adjustments: &mut Vec<ConfidenceAdjustment>,
    field: CanonicalField,
    delta: f64,
    reason: String,
) {
    let current = record.confidence.get(field);
    record.confidence.set(field, (current - delta).max(0.0));
    log::debug!("Confidence penalty on {}: -{:.2} ({})", field, delta, reason);
    adjustments.push(ConfidenceAdjustment {
        field,
        delta,
        reason,
    });
}

/// Assets must roughly equal liabilities plus equity; deviation beyond 5% of
/// assets penalizes the balance-sheet fields proportionally.
fn check_balance_sheet_identity(
    record: &mut MergedRecord,
    adjustments: &mut Vec<ConfidenceAdjustment>,
) {
    let (assets, liabilities, equity) = match (
        record.financials.total_assets,
        record.financials.total_liabilities,
        record.financials.total_equity,
    ) {
        (Some(a), Some(l), Some(e)) if a != 0.0 => (a, l, e),
        _ => return,
    };

    let deviation = (assets - (liabilities + equity)).abs() / assets.abs();
    if deviation <= BALANCE_TOLERANCE {
        return;
    }

    let penalty = deviation.min(BALANCE_PENALTY_CAP);
    let reason = format!(
        "assets {:.0} differ from liabilities + equity {:.0} by {:.1}%",
        assets,
        liabilities + equity,
        deviation * 100.0
    );
    for field in [
        CanonicalField::TotalAssets,
        CanonicalField::TotalLiabilities,
        CanonicalField::TotalEquity,
    ] {
        penalize(record, adjustments, field, penalty, reason.clone());
    }
}

/// Gross profit must roughly equal revenue minus cost of revenue.
fn check_gross_profit_identity(
    record: &mut MergedRecord,
    adjustments: &mut Vec<ConfidenceAdjustment>,
) {
    let (revenue, cost, gross) = match (
        record.financials.revenue,
        record.financials.cost_of_revenue,
        record.financials.gross_profit,
    ) {
        (Some(r), Some(c), Some(g)) if r != 0.0 => (r, c, g),
        _ => return,
    };

    let deviation = (gross - (revenue - cost)).abs() / revenue.abs();
    if deviation <= GROSS_PROFIT_TOLERANCE {
        return;
    }

    let penalty = deviation.min(GROSS_PROFIT_PENALTY_CAP);
    let reason = format!(
        "gross profit {:.0} differs from revenue - cost of revenue {:.0} by {:.1}% of revenue",
        gross,
        revenue - cost,
        deviation * 100.0
    );
    for field in [
        CanonicalField::Revenue,
        CanonicalField::CostOfRevenue,
        CanonicalField::GrossProfit,
    ] {
        penalize(record, adjustments, field, penalty, reason.clone());
    }
}

/// Operating income above gross profit is a logical impossibility, not noise.
fn check_operating_income_bound(
    record: &mut MergedRecord,
    adjustments: &mut Vec<ConfidenceAdjustment>,
) {
    let (operating, gross) = match (
        record.financials.operating_income,
        record.financials.gross_profit,
    ) {
        (Some(o), Some(g)) => (o, g),
        _ => return,
    };

    if operating > gross {
        let reason = format!(
            "operating income {:.0} exceeds gross profit {:.0}",
            operating, gross
        );
        penalize(
            record,
            adjustments,
            CanonicalField::OperatingIncome,
            OPERATING_INCOME_PENALTY,
            reason,
        );
    }
}

fn check_debt_sum_identity(
    record: &mut MergedRecord,
    adjustments: &mut Vec<ConfidenceAdjustment>,
) {
    let (total, short, long) = match (
        record.financials.total_debt,
        record.financials.short_term_debt,
        record.financials.long_term_debt,
    ) {
        (Some(t), Some(s), Some(l)) if t != 0.0 => (t, s, l),
        _ => return,
    };

    let deviation = (total - (short + long)).abs() / total.abs();
    if deviation > DEBT_SUM_TOLERANCE {
        let reason = format!(
            "total debt {:.0} differs from short-term + long-term debt {:.0} by {:.1}%",
            total,
            short + long,
            deviation * 100.0
        );
        penalize(
            record,
            adjustments,
            CanonicalField::TotalDebt,
            DEBT_SUM_PENALTY,
            reason,
        );
    }
}

/// A headline value that is an exact multiple of 10^7 reads like an estimate
/// rather than an extraction.
fn check_round_numbers(record: &mut MergedRecord, adjustments: &mut Vec<ConfidenceAdjustment>) {
    for field in [
        CanonicalField::Revenue,
        CanonicalField::NetIncome,
        CanonicalField::TotalAssets,
    ] {
        let value = match record.financials.get(field) {
            Some(v) => v,
            None => continue,
        };
        if value.abs() >= ROUND_NUMBER_UNIT && value % ROUND_NUMBER_UNIT == 0.0 {
            let reason = format!("{} {:.0} is suspiciously round; possibly estimated", field, value);
            penalize(record, adjustments, field, ROUND_NUMBER_PENALTY, reason);
        }
    }
}

/// Non-XBRL-sourced fields are discounted relative to XBRL's 1.0.
fn apply_source_multiplier(record: &mut MergedRecord) {
    let multiplier = match record.source {
        RecordSource::Ai => 0.8,
        RecordSource::Hybrid => 0.9,
        RecordSource::Xbrl => return,
    };

    let ai_fields: Vec<CanonicalField> = record
        .provenance
        .iter()
        .filter(|(_, p)| **p == Provenance::Ai)
        .map(|(f, _)| *f)
        .collect();
    for field in ai_fields {
        let scaled = record.confidence.get(field) * multiplier;
        record.confidence.set(field, scaled);
    }
}

/// Overall = mean of the populated headline fields, less a penalty for the
/// number of triggered adjustments, floored so a degraded record still
/// carries a usable score.
fn overall_confidence(record: &MergedRecord, adjustment_count: usize) -> f64 {
    let headline: Vec<f64> = CanonicalField::CRITICAL
        .iter()
        .filter(|f| record.financials.is_set(**f))
        .map(|f| record.confidence.get(*f))
        .collect();

    let base = if headline.is_empty() {
        OVERALL_FLOOR
    } else {
        headline.iter().sum::<f64>() / headline.len() as f64
    };

    let penalty = (adjustment_count as f64 * OVERALL_PENALTY_PER_ADJUSTMENT).min(OVERALL_PENALTY_CAP);
    (base - penalty).max(OVERALL_FLOOR).clamp(0.0, 1.0)
}
