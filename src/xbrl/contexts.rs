use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The dating of a context. Undated contexts are kept for bookkeeping but
/// never selected by the period resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContextPeriod {
    Instant(NaiveDate),
    Duration { start: NaiveDate, end: NaiveDate },
    Undated,
}

/// A temporal/entity scope that facts reference via `contextRef`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub id: String,
    pub period: ContextPeriod,
    pub entity: String,
    /// True when the context carries a segment/axis qualifier. Dimensional
    /// contexts are excluded from consolidated-statement mapping.
    pub dimensional: bool,
}

impl Context {
    pub fn duration_days(&self) -> Option<i64> {
        match self.period {
            ContextPeriod::Duration { start, end } => Some((end - start).num_days()),
            _ => None,
        }
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        match self.period {
            ContextPeriod::Instant(d) => Some(d),
            ContextPeriod::Duration { end, .. } => Some(end),
            ContextPeriod::Undated => None,
        }
    }
}

// Context blocks appear with or without the xbrli prefix depending on the
// filer's namespace setup.
static CONTEXT_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<(?:xbrli:)?context\s+[^>]*id\s*=\s*"([^"]+)"[^>]*>(.*?)</(?:xbrli:)?context\s*>"#)
        .unwrap()
});
static INSTANT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(?:xbrli:)?instant\s*>\s*([^<\s]+)\s*</(?:xbrli:)?instant\s*>").unwrap()
});
static START_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(?:xbrli:)?startdate\s*>\s*([^<\s]+)\s*</(?:xbrli:)?startdate\s*>").unwrap()
});
static END_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(?:xbrli:)?enddate\s*>\s*([^<\s]+)\s*</(?:xbrli:)?enddate\s*>").unwrap()
});
static ENTITY_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(?:xbrli:)?identifier[^>]*>\s*([^<\s]+)\s*</(?:xbrli:)?identifier\s*>")
        .unwrap()
});
static DIMENSIONAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(?:xbrli:)?segment|<(?:xbrldi:)?explicitmember|<(?:xbrldi:)?typedmember")
        .unwrap()
});

/// Scan the document for context definitions. Malformed blocks are skipped
/// and counted; partial results are always returned.
pub fn parse_contexts(content: &str) -> (HashMap<String, Context>, usize) {
    let mut contexts = HashMap::new();
    let mut errors = 0usize;

    for cap in CONTEXT_BLOCK.captures_iter(content) {
        let id = cap[1].to_string();
        let body = &cap[2];

        let entity = ENTITY_ID
            .captures(body)
            .map(|c| c[1].to_string())
            .unwrap_or_default();
        let dimensional = DIMENSIONAL.is_match(body);

        // Instant first, then a start/end pair. A block with dates that do
        // not parse counts as a structural error but is still recorded.
        let mut malformed = false;
        let period = if let Some(c) = INSTANT.captures(body) {
            match parse_date(&c[1]) {
                Some(d) => ContextPeriod::Instant(d),
                None => {
                    malformed = true;
                    ContextPeriod::Undated
                }
            }
        } else {
            match (START_DATE.captures(body), END_DATE.captures(body)) {
                (Some(s), Some(e)) => match (parse_date(&s[1]), parse_date(&e[1])) {
                    (Some(start), Some(end)) => ContextPeriod::Duration { start, end },
                    _ => {
                        malformed = true;
                        ContextPeriod::Undated
                    }
                },
                _ => ContextPeriod::Undated,
            }
        };

        if malformed {
            errors += 1;
            log::debug!("Context {} has unparseable dates, recording as undated", id);
        }

        contexts.insert(
            id.clone(),
            Context {
                id,
                period,
                entity,
                dimensional,
            },
        );
    }

    log::debug!(
        "Parsed {} contexts ({} malformed blocks)",
        contexts.len(),
        errors
    );
    (contexts, errors)
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_context() {
        let doc = r#"
            <xbrli:context id="FY2023">
                <xbrli:entity><xbrli:identifier scheme="http://www.sec.gov/CIK">0000320193</xbrli:identifier></xbrli:entity>
                <xbrli:period>
                    <xbrli:startDate>2023-01-01</xbrli:startDate>
                    <xbrli:endDate>2023-12-31</xbrli:endDate>
                </xbrli:period>
            </xbrli:context>
        "#;
        let (contexts, errors) = parse_contexts(doc);
        assert_eq!(errors, 0);
        let ctx = &contexts["FY2023"];
        assert_eq!(ctx.entity, "0000320193");
        assert!(!ctx.dimensional);
        assert_eq!(ctx.duration_days(), Some(364));
    }

    #[test]
    fn test_parse_instant_context() {
        let doc = r#"
            <context id="AsOf2023">
                <entity><identifier scheme="cik">123</identifier></entity>
                <period><instant>2023-12-31</instant></period>
            </context>
        "#;
        let (contexts, _) = parse_contexts(doc);
        assert_eq!(
            contexts["AsOf2023"].period,
            ContextPeriod::Instant(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap())
        );
    }

    #[test]
    fn test_dimensional_context_flagged() {
        let doc = r#"
            <xbrli:context id="Seg1">
                <xbrli:entity>
                    <xbrli:identifier scheme="cik">123</xbrli:identifier>
                    <xbrli:segment>
                        <xbrldi:explicitMember dimension="us-gaap:StatementBusinessSegmentsAxis">abc:AmericasMember</xbrldi:explicitMember>
                    </xbrli:segment>
                </xbrli:entity>
                <xbrli:period><xbrli:instant>2023-12-31</xbrli:instant></xbrli:period>
            </xbrli:context>
        "#;
        let (contexts, _) = parse_contexts(doc);
        assert!(contexts["Seg1"].dimensional);
    }

    #[test]
    fn test_malformed_dates_counted_not_fatal() {
        let doc = r#"
            <context id="bad"><period><instant>not-a-date</instant></period></context>
            <context id="good"><period><instant>2023-12-31</instant></period></context>
        "#;
        let (contexts, errors) = parse_contexts(doc);
        assert_eq!(errors, 1);
        assert_eq!(contexts.len(), 2);
        assert_eq!(contexts["bad"].period, ContextPeriod::Undated);
        assert!(matches!(contexts["good"].period, ContextPeriod::Instant(_)));
    }

    #[test]
    fn test_undated_context_recorded() {
        let doc = r#"<context id="nodate"><entity><identifier scheme="cik">1</identifier></entity></context>"#;
        let (contexts, errors) = parse_contexts(doc);
        assert_eq!(errors, 0);
        assert_eq!(contexts["nodate"].period, ContextPeriod::Undated);
    }
}
