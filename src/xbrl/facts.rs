use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use serde::{Deserialize, Serialize};

/// One tagged numeric value, as extracted from an `ix:nonFraction` element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    /// Taxonomy-qualified concept name, e.g. "us-gaap:Revenues".
    pub concept: String,
    /// Resolved value: parsed text × 10^scale, sign applied. `None` when the
    /// text failed numeric parsing — deliberately distinct from a reported
    /// zero so the mapper can skip the fact instead of planting a phantom 0.
    pub value: Option<f64>,
    pub raw_text: String,
    pub scale: i32,
    pub sign_negative: bool,
    pub decimals: i32,
    pub context_ref: String,
    pub unit_ref: String,
}

impl Fact {
    /// Local name of the concept, without the taxonomy prefix.
    pub fn local_name(&self) -> &str {
        match self.concept.split_once(':') {
            Some((_, local)) => local,
            None => &self.concept,
        }
    }
}

/// Non-numeric identity facts (`ix:nonNumeric`, dei taxonomy) used to fill
/// the record's identity fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityFacts {
    pub company_name: Option<String>,
    pub ticker: Option<String>,
    pub fiscal_year: Option<String>,
    pub fiscal_period: Option<String>,
}

// Self-closing tags (nil facts) match with no body group so they cannot
// swallow the following fact.
static NON_FRACTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<ix:nonfraction([^>]*?)(?:/>|>(.*?)</ix:nonfraction\s*>)").unwrap()
});
static NON_NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<ix:nonnumeric([^>]*?)(?:/>|>(.*?)</ix:nonnumeric\s*>)").unwrap()
});
static ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([a-zA-Z][\w:-]*)\s*=\s*"([^"]*)""#).unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

fn attribute(attrs: &str, name: &str) -> Option<String> {
    ATTR.captures_iter(attrs)
        .find(|c| c[1].eq_ignore_ascii_case(name))
        .map(|c| c[2].to_string())
}

/// Scan the document for numeric facts. Facts missing a concept name or a
/// context reference are unusable and dropped. Unparsable numeric text
/// increments the error counter and leaves `value` unset.
pub fn parse_facts(content: &str) -> (Vec<Fact>, usize) {
    let mut facts = Vec::new();
    let mut errors = 0usize;

    for cap in NON_FRACTION.captures_iter(content) {
        let attrs = &cap[1];
        let body = match cap.get(2) {
            Some(m) => m.as_str(),
            None => continue, // nil fact, no value to extract
        };
        let (concept, context_ref) = match (attribute(attrs, "name"), attribute(attrs, "contextRef"))
        {
            (Some(n), Some(c)) => (n, c),
            _ => continue,
        };

        let unit_ref = attribute(attrs, "unitRef").unwrap_or_else(|| "USD".to_string());
        let decimals = attribute(attrs, "decimals")
            .and_then(|d| d.parse::<i32>().ok())
            .unwrap_or(0);
        let scale = attribute(attrs, "scale")
            .and_then(|s| s.parse::<i32>().ok())
            .unwrap_or(0);
        let sign_negative = attribute(attrs, "sign").as_deref() == Some("-");

        let raw_text = sanitize_text(body);
        let value = match resolve_value(&raw_text, scale, sign_negative) {
            Some(v) => Some(v),
            None => {
                errors += 1;
                log::debug!(
                    "Unparsable numeric text {:?} for concept {}, leaving unset",
                    raw_text,
                    concept
                );
                None
            }
        };

        facts.push(Fact {
            concept,
            value,
            raw_text,
            scale,
            sign_negative,
            decimals,
            context_ref,
            unit_ref,
        });
    }

    log::debug!("Parsed {} facts ({} unparsable values)", facts.len(), errors);
    (facts, errors)
}

/// Scan for the dei identity facts carried as `ix:nonNumeric` elements.
pub fn parse_identity(content: &str) -> IdentityFacts {
    let mut identity = IdentityFacts::default();

    for cap in NON_NUMERIC.captures_iter(content) {
        let name = match attribute(&cap[1], "name") {
            Some(n) => n,
            None => continue,
        };
        let value = match cap.get(2) {
            Some(m) => sanitize_text(m.as_str()),
            None => continue,
        };
        if value.is_empty() {
            continue;
        }

        let slot = match name.rsplit(':').next().unwrap_or("") {
            "EntityRegistrantName" => &mut identity.company_name,
            "TradingSymbol" => &mut identity.ticker,
            "DocumentFiscalYearFocus" => &mut identity.fiscal_year,
            "DocumentFiscalPeriodFocus" => &mut identity.fiscal_period,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    identity
}

/// Fact text may carry nested presentation HTML; strip it before parsing.
fn sanitize_text(input: &str) -> String {
    let mut output = input.to_string();
    if output.contains('<') {
        let fragment = Html::parse_fragment(&output);
        output = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    }
    WHITESPACE.replace_all(output.trim(), " ").to_string()
}

/// Resolve numeric fact text: strip separators, handle parenthetical
/// negatives, apply the scale exponent, then the explicit sign. The sign
/// attribute wins over the text's own polarity; signs are not additive.
fn resolve_value(text: &str, scale: i32, sign_negative: bool) -> Option<f64> {
    let mut cleaned = text
        .replace(',', "")
        .replace('$', "")
        .replace('\u{a0}', "")
        .replace(char::is_whitespace, "");

    let mut parenthetical = false;
    if cleaned.starts_with('(') && cleaned.ends_with(')') && cleaned.len() > 2 {
        parenthetical = true;
        cleaned = cleaned[1..cleaned.len() - 1].to_string();
    }

    let parsed: f64 = cleaned.parse().ok()?;
    let magnitude = parsed * 10f64.powi(scale);

    Some(if sign_negative {
        -magnitude.abs()
    } else if parenthetical {
        -magnitude.abs()
    } else {
        magnitude
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parenthetical_negative() {
        assert_eq!(resolve_value("(1,234)", 0, false), Some(-1234.0));
        assert_eq!(resolve_value("1,234", 0, false), Some(1234.0));
    }

    #[test]
    fn test_scale_applied() {
        assert_eq!(resolve_value("1,000,000", 3, false), Some(1_000_000_000.0));
        assert_eq!(resolve_value("2.5", 6, false), Some(2_500_000.0));
    }

    #[test]
    fn test_sign_attribute_wins_over_text_polarity() {
        // Sign forces negativity; it does not stack with the parentheses.
        assert_eq!(resolve_value("(500)", 0, true), Some(-500.0));
        assert_eq!(resolve_value("500", 0, true), Some(-500.0));
        assert_eq!(resolve_value("(500)", 3, true), Some(-500_000.0));
    }

    #[test]
    fn test_unparsable_is_none_not_zero() {
        assert_eq!(resolve_value("N/A", 0, false), None);
        assert_eq!(resolve_value("", 0, false), None);
        assert_eq!(resolve_value("0", 0, false), Some(0.0));
    }

    #[test]
    fn test_parse_facts_defaults_and_skips() {
        let doc = r#"
            <ix:nonFraction name="us-gaap:Revenues" contextRef="c1" scale="3" decimals="-3" unitRef="usd">1,000</ix:nonFraction>
            <ix:nonFraction contextRef="c1">42</ix:nonFraction>
            <ix:nonFraction name="us-gaap:NetIncomeLoss" contextRef="c1" sign="-">250</ix:nonFraction>
        "#;
        let (facts, errors) = parse_facts(doc);
        assert_eq!(errors, 0);
        // The fact without a concept name is dropped, not defaulted.
        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0].value, Some(1_000_000.0));
        assert_eq!(facts[0].unit_ref, "usd");
        assert_eq!(facts[0].decimals, -3);
        assert_eq!(facts[1].value, Some(-250.0));
        assert_eq!(facts[1].local_name(), "NetIncomeLoss");
    }

    #[test]
    fn test_nested_html_stripped_from_value() {
        let doc = r#"<ix:nonFraction name="us-gaap:Revenues" contextRef="c1"><span>9,876</span></ix:nonFraction>"#;
        let (facts, _) = parse_facts(doc);
        assert_eq!(facts[0].value, Some(9876.0));
    }

    #[test]
    fn test_unparsable_counts_error() {
        let doc = r#"<ix:nonFraction name="us-gaap:Revenues" contextRef="c1">see note 4</ix:nonFraction>"#;
        let (facts, errors) = parse_facts(doc);
        assert_eq!(errors, 1);
        assert_eq!(facts[0].value, None);
    }

    #[test]
    fn test_parse_identity() {
        let doc = r#"
            <ix:nonNumeric name="dei:EntityRegistrantName" contextRef="c1">Acme Corp</ix:nonNumeric>
            <ix:nonNumeric name="dei:TradingSymbol" contextRef="c1">ACME</ix:nonNumeric>
            <ix:nonNumeric name="dei:DocumentFiscalYearFocus" contextRef="c1">2023</ix:nonNumeric>
            <ix:nonNumeric name="dei:DocumentFiscalPeriodFocus" contextRef="c1">FY</ix:nonNumeric>
        "#;
        let identity = parse_identity(doc);
        assert_eq!(identity.company_name.as_deref(), Some("Acme Corp"));
        assert_eq!(identity.ticker.as_deref(), Some("ACME"));
        assert_eq!(identity.fiscal_year.as_deref(), Some("2023"));
        assert_eq!(identity.fiscal_period.as_deref(), Some("FY"));
    }
}
