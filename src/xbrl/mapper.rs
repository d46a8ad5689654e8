use std::collections::HashMap;
use strum::IntoEnumIterator;

use super::concepts::CONCEPT_ALIASES;
use super::facts::Fact;
use super::periods::ResolvedPeriods;
use crate::financials::{CanonicalField, Financials, MappingResult, Provenance, Statement};

/// Map parsed facts onto the canonical record using the resolved periods.
///
/// Income-statement and cash-flow fields read facts from the current-period
/// context, balance-sheet fields from the balance-sheet instant, and the
/// year-over-year field from the prior period. The alias table drives the
/// scan: first alias match per field wins and a populated field is never
/// overwritten, so table order is the priority order.
pub fn map_facts(facts: &[Fact], periods: &ResolvedPeriods, parse_errors: usize) -> MappingResult {
    let current_id = periods.current.as_ref().map(|c| c.id.as_str());
    let instant_id = periods.instant.as_ref().map(|c| c.id.as_str());
    let prior_id = periods.prior.as_ref().map(|c| c.id.as_str());

    let mut financials = Financials::default();
    let mut provenance: HashMap<CanonicalField, Provenance> = HashMap::new();

    for (alias, field) in CONCEPT_ALIASES {
        if financials.is_set(*field) {
            continue;
        }
        let context_id = match field.statement() {
            Statement::Duration => current_id,
            Statement::Instant => instant_id,
            Statement::PriorDuration => prior_id,
        };
        let context_id = match context_id {
            Some(id) => id,
            None => continue,
        };

        // Unparsed facts are unusable and never map as zero; the scan moves
        // on to the next candidate.
        let hit = facts.iter().find(|f| {
            f.context_ref == context_id
                && f.value.is_some()
                && f.local_name().eq_ignore_ascii_case(alias)
        });
        if let Some(fact) = hit {
            let value = fact.value.unwrap_or_default();
            log::debug!("Mapped {} from {} = {}", field, fact.concept, value);
            financials.set(*field, value);
            provenance.insert(*field, Provenance::Xbrl);
        }
    }

    derive_missing(&mut financials, &mut provenance);

    let mut fields_found = Vec::new();
    let mut fields_missing = Vec::new();
    for field in CanonicalField::iter() {
        if financials.is_set(field) {
            fields_found.push(field);
        } else {
            fields_missing.push(field);
        }
    }

    let confidence = coverage_confidence(&fields_found);
    log::debug!(
        "Mapping found {}/{} fields, coverage confidence {:.2}",
        fields_found.len(),
        fields_found.len() + fields_missing.len(),
        confidence
    );

    MappingResult {
        financials,
        fields_found,
        fields_missing,
        provenance,
        confidence,
        current_context: periods.current.as_ref().map(|c| c.id.clone()),
        instant_context: periods.instant.as_ref().map(|c| c.id.clone()),
        prior_context: periods.prior.as_ref().map(|c| c.id.clone()),
        parse_errors,
    }
}

/// Compute fields whose direct concept was absent but whose components are
/// all present. Never overwrites a directly mapped value.
fn derive_missing(
    financials: &mut Financials,
    provenance: &mut HashMap<CanonicalField, Provenance>,
) {
    if !financials.is_set(CanonicalField::TotalDebt) {
        if let (Some(short), Some(long)) = (
            financials.get(CanonicalField::ShortTermDebt),
            financials.get(CanonicalField::LongTermDebt),
        ) {
            financials.set(CanonicalField::TotalDebt, short + long);
            provenance.insert(CanonicalField::TotalDebt, Provenance::Derived);
        }
    }

    if !financials.is_set(CanonicalField::GrossProfit) {
        if let (Some(revenue), Some(cost)) = (
            financials.get(CanonicalField::Revenue),
            financials.get(CanonicalField::CostOfRevenue),
        ) {
            financials.set(CanonicalField::GrossProfit, revenue - cost);
            provenance.insert(CanonicalField::GrossProfit, Provenance::Derived);
        }
    }

    if !financials.is_set(CanonicalField::FreeCashFlow) {
        if let (Some(ocf), Some(capex)) = (
            financials.get(CanonicalField::OperatingCashFlow),
            financials.get(CanonicalField::CapitalExpenditures),
        ) {
            // Capex is tagged as a payment and may arrive either sign.
            financials.set(CanonicalField::FreeCashFlow, ocf - capex.abs());
            provenance.insert(CanonicalField::FreeCashFlow, Provenance::Derived);
        }
    }
}

/// Coverage confidence in [0,1]: breadth across the whole field set weighted
/// with presence of the critical valuation fields.
fn coverage_confidence(fields_found: &[CanonicalField]) -> f64 {
    let total = CanonicalField::iter().count() as f64;
    let found = fields_found.len() as f64;
    let critical_found = CanonicalField::CRITICAL
        .iter()
        .filter(|f| fields_found.contains(f))
        .count() as f64;
    let critical_total = CanonicalField::CRITICAL.len() as f64;

    (0.7 * (found / total) + 0.3 * (critical_found / critical_total)).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::financials::FilingType;
    use crate::xbrl::contexts::{Context, ContextPeriod};
    use crate::xbrl::periods::resolve_periods;
    use chrono::NaiveDate;

    fn fact(concept: &str, value: f64, context: &str) -> Fact {
        Fact {
            concept: concept.to_string(),
            value: Some(value),
            raw_text: value.to_string(),
            scale: 0,
            sign_negative: false,
            decimals: 0,
            context_ref: context.to_string(),
            unit_ref: "USD".to_string(),
        }
    }

    fn periods_fixture() -> ResolvedPeriods {
        let mut contexts = HashMap::new();
        contexts.insert(
            "cur".to_string(),
            Context {
                id: "cur".to_string(),
                period: ContextPeriod::Duration {
                    start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                    end: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
                },
                entity: "123".to_string(),
                dimensional: false,
            },
        );
        contexts.insert(
            "prior".to_string(),
            Context {
                id: "prior".to_string(),
                period: ContextPeriod::Duration {
                    start: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
                    end: NaiveDate::from_ymd_opt(2022, 12, 31).unwrap(),
                },
                entity: "123".to_string(),
                dimensional: false,
            },
        );
        contexts.insert(
            "bs".to_string(),
            Context {
                id: "bs".to_string(),
                period: ContextPeriod::Instant(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()),
                entity: "123".to_string(),
                dimensional: false,
            },
        );
        resolve_periods(&contexts, FilingType::Annual)
    }

    #[test]
    fn test_first_alias_match_wins() {
        let periods = periods_fixture();
        // Revenues appears later in the alias table than the contract-revenue
        // concept, so the latter must win regardless of fact order.
        let facts = vec![
            fact("us-gaap:Revenues", 600.0, "cur"),
            fact(
                "us-gaap:RevenueFromContractWithCustomerExcludingAssessedTax",
                500.0,
                "cur",
            ),
        ];
        let result = map_facts(&facts, &periods, 0);
        assert_eq!(result.financials.revenue, Some(500.0));
    }

    #[test]
    fn test_statement_routing() {
        let periods = periods_fixture();
        let facts = vec![
            fact("us-gaap:Revenues", 1000.0, "cur"),
            // Balance-sheet concept tagged against the duration context must
            // not populate the balance-sheet field.
            fact("us-gaap:Assets", 5000.0, "cur"),
            fact("us-gaap:Liabilities", 3000.0, "bs"),
            fact("us-gaap:Revenues", 900.0, "prior"),
        ];
        let result = map_facts(&facts, &periods, 0);
        assert_eq!(result.financials.revenue, Some(1000.0));
        assert_eq!(result.financials.total_assets, None);
        assert_eq!(result.financials.total_liabilities, Some(3000.0));
        assert_eq!(result.financials.prior_year_revenue, Some(900.0));
    }

    #[test]
    fn test_derived_fields() {
        let periods = periods_fixture();
        let facts = vec![
            fact("us-gaap:Revenues", 1000.0, "cur"),
            fact("us-gaap:CostOfRevenue", 400.0, "cur"),
            fact("us-gaap:LongTermDebtCurrent", 50.0, "bs"),
            fact("us-gaap:LongTermDebtNoncurrent", 150.0, "bs"),
            fact("us-gaap:NetCashProvidedByUsedInOperatingActivities", 300.0, "cur"),
            fact("us-gaap:PaymentsToAcquirePropertyPlantAndEquipment", -80.0, "cur"),
        ];
        let result = map_facts(&facts, &periods, 0);
        assert_eq!(result.financials.gross_profit, Some(600.0));
        assert_eq!(result.financials.total_debt, Some(200.0));
        assert_eq!(result.financials.free_cash_flow, Some(220.0));
        assert_eq!(
            result.provenance[&CanonicalField::GrossProfit],
            Provenance::Derived
        );
        assert_eq!(
            result.provenance[&CanonicalField::TotalDebt],
            Provenance::Derived
        );
    }

    #[test]
    fn test_direct_concept_beats_derivation() {
        let periods = periods_fixture();
        let facts = vec![
            fact("us-gaap:Revenues", 1000.0, "cur"),
            fact("us-gaap:CostOfRevenue", 400.0, "cur"),
            fact("us-gaap:GrossProfit", 590.0, "cur"),
        ];
        let result = map_facts(&facts, &periods, 0);
        // The filer's own figure stands even when it disagrees with the
        // arithmetic; the calibrator flags that, the mapper does not.
        assert_eq!(result.financials.gross_profit, Some(590.0));
        assert_eq!(
            result.provenance[&CanonicalField::GrossProfit],
            Provenance::Xbrl
        );
    }

    #[test]
    fn test_unparsed_fact_leaves_field_unset() {
        let periods = periods_fixture();
        let mut bad = fact("us-gaap:Revenues", 0.0, "cur");
        bad.value = None;
        let result = map_facts(&[bad], &periods, 1);
        assert_eq!(result.financials.revenue, None);
        assert_eq!(result.parse_errors, 1);
    }

    #[test]
    fn test_coverage_confidence_weights_critical_fields() {
        let periods = periods_fixture();
        let facts = vec![
            fact("us-gaap:Revenues", 1000.0, "cur"),
            fact("us-gaap:NetIncomeLoss", 100.0, "cur"),
            fact("us-gaap:Assets", 5000.0, "bs"),
            fact("us-gaap:Liabilities", 3000.0, "bs"),
            fact("us-gaap:StockholdersEquity", 2000.0, "bs"),
        ];
        let result = map_facts(&facts, &periods, 0);
        let total = CanonicalField::iter().count() as f64;
        let expected = 0.7 * (5.0 / total) + 0.3;
        assert!((result.confidence - expected).abs() < 1e-9);
    }
}
