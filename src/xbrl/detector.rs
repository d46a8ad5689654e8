/// Markers that indicate a document carries inline XBRL. Checked against a
/// lowercased copy of the text, so matching is case-insensitive.
const INLINE_XBRL_MARKERS: &[&str] = &[
    "http://www.xbrl.org/2013/inlinexbrl",
    "xmlns:ix=",
    "<ix:nonfraction",
    "<ix:nonnumeric",
    "<xbrli:context",
    "<context ",
];

/// Cheap presence check for inline-XBRL content. A single scan, no parse;
/// this gates whether the rest of the pipeline runs at all.
pub fn is_inline_xbrl(content: &str) -> bool {
    let lower = content.to_lowercase();
    INLINE_XBRL_MARKERS.iter().any(|m| lower.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_namespace_declaration() {
        let doc = r#"<html xmlns:ix="http://www.xbrl.org/2013/inlineXBRL"><body/></html>"#;
        assert!(is_inline_xbrl(doc));
    }

    #[test]
    fn test_detects_fact_tag() {
        let doc = r#"<p><ix:nonFraction name="us-gaap:Revenues" contextRef="c1">5</ix:nonFraction></p>"#;
        assert!(is_inline_xbrl(doc));
    }

    #[test]
    fn test_detects_context_element() {
        let doc = r#"<xbrli:context id="c1"><xbrli:period/></xbrli:context>"#;
        assert!(is_inline_xbrl(doc));
    }

    #[test]
    fn test_plain_html_is_negative() {
        let doc = "<html><body><h1>Annual Report</h1><p>Revenue was $5 million.</p></body></html>";
        assert!(!is_inline_xbrl(doc));
    }
}
