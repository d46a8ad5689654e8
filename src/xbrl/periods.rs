use chrono::Months;
use std::collections::HashMap;

use super::contexts::{Context, ContextPeriod};
use crate::financials::FilingType;

/// The up-to-three contexts the mapper reads facts from. Any selection may be
/// absent; callers treat the corresponding fields as unavailable, not zero.
#[derive(Debug, Clone, Default)]
pub struct ResolvedPeriods {
    pub current: Option<Context>,
    pub instant: Option<Context>,
    pub prior: Option<Context>,
}

/// Select the current reporting period, the balance-sheet instant, and the
/// prior comparable period. Only non-dimensional, dated contexts participate.
pub fn resolve_periods(
    contexts: &HashMap<String, Context>,
    filing_type: FilingType,
) -> ResolvedPeriods {
    let durations: Vec<&Context> = contexts
        .values()
        .filter(|c| !c.dimensional && matches!(c.period, ContextPeriod::Duration { .. }))
        .collect();
    let instants: Vec<&Context> = contexts
        .values()
        .filter(|c| !c.dimensional && matches!(c.period, ContextPeriod::Instant(_)))
        .collect();

    let current = select_current(&durations, filing_type);
    let instant = instants
        .iter()
        .max_by_key(|c| c.end_date())
        .map(|c| (*c).clone());
    let prior = current
        .as_ref()
        .and_then(|cur| select_prior(&durations, cur));

    log::debug!(
        "Resolved periods: current={:?} instant={:?} prior={:?}",
        current.as_ref().map(|c| &c.id),
        instant.as_ref().map(|c| &c.id),
        prior.as_ref().map(|c| &c.id)
    );

    ResolvedPeriods {
        current,
        instant,
        prior,
    }
}

/// Duration contexts within the tolerance band around the expected filing
/// duration; latest end date wins among matches. When nothing falls in the
/// band, the single longest duration is the last resort.
fn select_current(durations: &[&Context], filing_type: FilingType) -> Option<Context> {
    let (expected, tolerance) = filing_type.expected_duration();

    let in_band = durations
        .iter()
        .filter(|c| {
            c.duration_days()
                .map(|d| (d - expected).abs() <= tolerance)
                .unwrap_or(false)
        })
        .max_by_key(|c| c.end_date());

    if let Some(ctx) = in_band {
        return Some((*ctx).clone());
    }

    durations
        .iter()
        .max_by_key(|c| c.duration_days())
        .map(|c| {
            log::debug!(
                "No context within {}±{} days, falling back to longest duration {}",
                expected,
                tolerance,
                c.id
            );
            (*c).clone()
        })
}

/// The prior comparable period: duration within 10% of the current one and
/// end date within 30 days of one year before the current end.
fn select_prior(durations: &[&Context], current: &Context) -> Option<Context> {
    let current_days = current.duration_days()?;
    let current_end = current.end_date()?;
    let target_end = current_end.checked_sub_months(Months::new(12))?;

    durations
        .iter()
        .filter(|c| c.id != current.id)
        .filter(|c| {
            let days = match c.duration_days() {
                Some(d) => d,
                None => return false,
            };
            let end = match c.end_date() {
                Some(e) => e,
                None => return false,
            };
            let duration_close =
                (days - current_days).abs() as f64 <= current_days as f64 * 0.10;
            let end_close = (end - target_end).num_days().abs() <= 30;
            duration_close && end_close
        })
        .max_by_key(|c| c.end_date())
        .map(|c| (*c).clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn duration(id: &str, start: (i32, u32, u32), end: (i32, u32, u32)) -> Context {
        Context {
            id: id.to_string(),
            period: ContextPeriod::Duration {
                start: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
                end: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            },
            entity: "123".to_string(),
            dimensional: false,
        }
    }

    fn instant(id: &str, date: (i32, u32, u32)) -> Context {
        Context {
            id: id.to_string(),
            period: ContextPeriod::Instant(
                NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            ),
            entity: "123".to_string(),
            dimensional: false,
        }
    }

    fn context_map(contexts: Vec<Context>) -> HashMap<String, Context> {
        contexts.into_iter().map(|c| (c.id.clone(), c)).collect()
    }

    #[test]
    fn test_annual_selects_within_band_latest_end() {
        // Durations of 364, 365, 366, 90 and 730 days; annual selection must
        // land in [335, 395] and prefer the latest end date.
        let contexts = context_map(vec![
            duration("d364", (2022, 1, 2), (2023, 1, 1)),
            duration("d365", (2023, 1, 1), (2024, 1, 1)),
            duration("d366", (2022, 12, 30), (2023, 12, 31)),
            duration("d90", (2023, 10, 2), (2023, 12, 31)),
            duration("d730", (2022, 1, 1), (2023, 12, 31)),
        ]);
        let resolved = resolve_periods(&contexts, FilingType::Annual);
        assert_eq!(resolved.current.unwrap().id, "d365");
    }

    #[test]
    fn test_quarterly_band() {
        let contexts = context_map(vec![
            duration("q", (2023, 10, 1), (2023, 12, 31)),
            duration("fy", (2023, 1, 1), (2023, 12, 31)),
        ]);
        let resolved = resolve_periods(&contexts, FilingType::Quarterly);
        assert_eq!(resolved.current.unwrap().id, "q");
    }

    #[test]
    fn test_fallback_to_longest_duration() {
        let contexts = context_map(vec![
            duration("short", (2023, 12, 1), (2023, 12, 31)),
            duration("longer", (2023, 6, 1), (2023, 12, 31)),
        ]);
        let resolved = resolve_periods(&contexts, FilingType::Annual);
        assert_eq!(resolved.current.unwrap().id, "longer");
    }

    #[test]
    fn test_latest_instant_selected() {
        let contexts = context_map(vec![
            instant("i2022", (2022, 12, 31)),
            instant("i2023", (2023, 12, 31)),
        ]);
        let resolved = resolve_periods(&contexts, FilingType::Annual);
        assert_eq!(resolved.instant.unwrap().id, "i2023");
    }

    #[test]
    fn test_prior_period_selected() {
        let contexts = context_map(vec![
            duration("fy2023", (2023, 1, 1), (2023, 12, 31)),
            duration("fy2022", (2022, 1, 1), (2022, 12, 31)),
        ]);
        let resolved = resolve_periods(&contexts, FilingType::Annual);
        assert_eq!(resolved.prior.unwrap().id, "fy2022");
    }

    #[test]
    fn test_prior_absent_when_no_comparable() {
        // A two-year-old period misses the 30-day window around
        // current end minus one year.
        let contexts = context_map(vec![
            duration("fy2023", (2023, 1, 1), (2023, 12, 31)),
            duration("fy2021", (2021, 1, 1), (2021, 12, 31)),
        ]);
        let resolved = resolve_periods(&contexts, FilingType::Annual);
        assert!(resolved.prior.is_none());
    }

    #[test]
    fn test_dimensional_contexts_excluded() {
        let mut seg = duration("seg", (2023, 1, 1), (2023, 12, 31));
        seg.dimensional = true;
        let contexts = context_map(vec![seg, duration("fy", (2022, 1, 1), (2022, 12, 31))]);
        let resolved = resolve_periods(&contexts, FilingType::Annual);
        assert_eq!(resolved.current.unwrap().id, "fy");
    }
}
