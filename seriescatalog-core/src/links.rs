//! Link Parsing
//!
//! Spreadsheet link cells hold either an absolute URL or a status token
//! saying the link does not exist yet. Tokens are not errors.

use url::Url;

/// Status tokens meaning "intentionally not a URL yet". Matched case-insensitively.
pub const SPECIAL_LINKS: &[&str] = &[
    "-",
    "n/a",
    "n/e",
    "abrogated",
    "in progress",
    "editing",
    "rendering",
    "rendered",
    "flash",
    "uploading",
];

pub fn is_special_link(raw: &str) -> bool {
    let raw = raw.trim();
    SPECIAL_LINKS.iter().any(|token| token.eq_ignore_ascii_case(raw))
}

/// Parse one link cell.
///
/// `Ok(None)` for special tokens, `Err` with a readable problem otherwise.
/// `what` names the link in the message, e.g. `"audio"`.
pub fn parse_link(raw: &str, what: &str) -> Result<Option<Url>, String> {
    if is_special_link(raw) {
        return Ok(None);
    }
    Url::parse(raw.trim())
        .map(Some)
        .map_err(|e| format!("unable to parse {} URL '{}': {}", what, raw, e))
}

/// Result of parsing a `;`-delimited list of links.
///
/// Links that parse are kept even when others fail. Empty entries between
/// separators count as failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLinks {
    pub links: Vec<Url>,
    pub error: Option<String>,
}

pub fn parse_link_list(raw: &str) -> ParsedLinks {
    if is_special_link(raw) {
        return ParsedLinks::default();
    }

    let mut parsed = ParsedLinks::default();
    let mut failures = vec![];
    let mut entries: Vec<&str> = raw.split(';').map(str::trim).collect();
    // Trailing separators are ignored; an empty entry anywhere else is malformed.
    while entries.last() == Some(&"") {
        entries.pop();
    }
    for link in entries {
        match Url::parse(link) {
            Ok(url) => parsed.links.push(url),
            Err(e) => failures.push(format!("'{}' ({})", link, e)),
        }
    }

    if !failures.is_empty() {
        parsed.error = Some(format!(
            "unable to parse the study guide URLs: {}",
            failures.join(", ")
        ));
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_tokens_are_not_errors() {
        for token in SPECIAL_LINKS {
            assert_eq!(parse_link(token, "audio"), Ok(None));
        }
        assert_eq!(parse_link("In Progress", "audio"), Ok(None));
    }

    #[test]
    fn test_bad_url_reports_problem() {
        let err = parse_link("http://bad url", "video").unwrap_err();
        assert!(err.starts_with("unable to parse video URL 'http://bad url'"));
    }

    #[test]
    fn test_link_list_keeps_good_links() {
        let parsed = parse_link_list("http://a.example/1.pdf ;not a url; http://a.example/2.pdf");
        assert_eq!(parsed.links.len(), 2);
        let error = parsed.error.unwrap();
        assert!(error.contains("'not a url'"));
    }

    #[test]
    fn test_link_list_empty_entries() {
        let parsed = parse_link_list("http://a.example/1.pdf;;http://a.example/2.pdf");
        assert_eq!(parsed.links.len(), 2);
        assert!(parsed.error.unwrap().starts_with("unable to parse the study guide URLs: '' ("));

        let trailing = parse_link_list("http://a.example/1.pdf; ;");
        assert_eq!(trailing.links.len(), 1);
        assert_eq!(trailing.error, None);
    }

    #[test]
    fn test_link_list_special_token() {
        assert_eq!(parse_link_list("n/a"), ParsedLinks::default());
    }
}
