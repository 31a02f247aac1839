//! Text cleanup passes applied while building Pivot records.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// Collapse all whitespace runs (including newlines) to single spaces.
pub fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `(site web)` / `(web site)` marker, any case.
static WEB_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\((?:site web|web site)\)").expect("valid regex"));

/// Trailing issue counters: `no. 482`, `n° 12`, or a bare trailing number.
static ISSUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+(?:no?\s*[.°]?\s*)?\d+\s*$").expect("valid regex"));

/// Clean a harvested journal name: keep the part before the first comma,
/// strip web-edition markers and trailing issue counters.
pub fn clean_journal(raw: &str) -> String {
    let head = raw.split(',').next().unwrap_or(raw);
    let no_marker = WEB_MARKER_RE.replace_all(head, "");
    let no_issue = ISSUE_RE.replace(no_marker.trim(), "");
    collapse_ws(&no_issue)
}

/// Leading label such as `Sujets :` or `Subjects:` on a keyword line.
static KEYWORD_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L} ]{1,24}:\s*").expect("valid regex"));

/// Split a harvested subject line into a deduplicated keyword set.
pub fn split_keywords(raw: &str) -> BTreeSet<String> {
    let stripped = KEYWORD_LABEL_RE.replace(raw.trim(), "");
    stripped
        .split([',', ';'])
        .map(collapse_ws)
        .filter(|kw| !kw.is_empty())
        .collect()
}

/// Byline prefix (`Par `, `By `), any case.
static BYLINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:par|by)\s+").expect("valid regex"));

/// Normalize an author line: strip the byline prefix and collapse whitespace.
pub fn clean_author(raw: &str) -> String {
    collapse_ws(&BYLINE_RE.replace(raw.trim(), ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn journal_keeps_head_before_comma() {
        assert_eq!(
            clean_journal("Le Quotidien, no. 482, mardi 4 mars 2014"),
            "Le Quotidien"
        );
    }

    #[test]
    fn journal_strips_web_marker_and_counter() {
        assert_eq!(clean_journal("La Gazette (site web)"), "La Gazette");
        assert_eq!(clean_journal("La Gazette no. 12"), "La Gazette");
        assert_eq!(clean_journal("L'Écho 2041"), "L'Écho");
    }

    #[test]
    fn journal_collapses_whitespace() {
        assert_eq!(clean_journal("  Le \n Devoir "), "Le Devoir");
    }

    #[test]
    fn keywords_split_and_dedupe() {
        let kws = split_keywords("Sujets : climat, énergie; climat ,  transport");
        assert_eq!(kws.len(), 3);
        assert!(kws.contains("climat"));
        assert!(kws.contains("énergie"));
        assert!(kws.contains("transport"));
    }

    #[test]
    fn keywords_without_label() {
        let kws = split_keywords("agriculture; eau");
        assert_eq!(kws.len(), 2);
        assert!(kws.contains("agriculture"));
    }

    #[test]
    fn empty_subject_line_yields_empty_set() {
        assert!(split_keywords("Sujets :").is_empty());
        assert!(split_keywords("  ").is_empty());
    }

    #[test]
    fn author_byline_stripped() {
        assert_eq!(clean_author("Par Jane  Doe"), "Jane Doe");
        assert_eq!(clean_author("by John Roe"), "John Roe");
        assert_eq!(clean_author("Jane Doe"), "Jane Doe");
    }
}
