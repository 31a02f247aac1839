//! Corpus statistics aggregation.
//!
//! [`summarize`] runs exactly once per pipeline run, after deduplication, and
//! its result is shared read-only by every statistics-dependent renderer
//! (aggregate/processed stats, plots, narrative summary).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use pressmill_shared::{Params, Pivot, PressmillError, Result};

// ---------------------------------------------------------------------------
// Summary types
// ---------------------------------------------------------------------------

/// One value of a frequency axis with its record support.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyRow {
    pub value: String,
    pub count: u64,
}

/// A support-filtered frequency table, ordered by descending count then
/// ascending value so equal inputs always produce identical tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrequencyTable {
    pub rows: Vec<FrequencyRow>,
    /// Distinct values observed before threshold filtering.
    pub distinct: usize,
    /// Distinct values removed by the threshold.
    pub dropped: usize,
}

impl FrequencyTable {
    /// Total record support across the surviving rows.
    pub fn total(&self) -> u64 {
        self.rows.iter().map(|r| r.count).sum()
    }

    /// The `n` best-supported rows.
    pub fn top(&self, n: usize) -> &[FrequencyRow] {
        &self.rows[..self.rows.len().min(n)]
    }
}

/// Derived aggregate over the deduplicated record set, computed once per run
/// and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsSummary {
    /// Records seen before the language/keyword filters.
    pub input_count: usize,
    /// Records that survived the filters and back the tables below.
    pub article_count: usize,
    /// Earliest publication date (`%Y %m %d`) among surviving records.
    pub first_date: Option<String>,
    /// Latest publication date among surviving records.
    pub last_date: Option<String>,
    /// Cleaned journal names.
    pub journals: FrequencyTable,
    /// Author lines (records without an author do not contribute).
    pub authors: FrequencyTable,
    /// Individual keywords.
    pub keywords: FrequencyTable,
    /// Publication-month buckets, `YYYY-MM`.
    pub months: FrequencyTable,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Compute the shared statistics summary for a deduplicated record set.
///
/// Applies the two record filters from `params`, then builds per-axis
/// frequency tables pruned by the axis' minimum-support threshold.
#[instrument(skip_all, fields(records = pivots.len()))]
pub fn summarize(pivots: &[Pivot], params: &Params) -> Result<StatisticsSummary> {
    params
        .validate()
        .map_err(|e| PressmillError::Aggregation(e.to_string()))?;

    let kept: Vec<&Pivot> = pivots
        .iter()
        .filter(|p| !params.filter_lang || recognized_lang(&p.lang))
        .filter(|p| !params.filter_keywords || !p.keywords.is_empty())
        .collect();

    let mut journals: HashMap<String, u64> = HashMap::new();
    let mut authors: HashMap<String, u64> = HashMap::new();
    let mut keywords: HashMap<String, u64> = HashMap::new();
    let mut months: HashMap<String, u64> = HashMap::new();

    for pivot in &kept {
        if !pivot.journal_clean.is_empty() {
            *journals.entry(pivot.journal_clean.clone()).or_default() += 1;
        }
        if !pivot.author.is_empty() {
            *authors.entry(pivot.author.clone()).or_default() += 1;
        }
        for kw in &pivot.keywords {
            *keywords.entry(kw.clone()).or_default() += 1;
        }
        *months
            .entry(format!("{:04}-{:02}", pivot.year, pivot.month))
            .or_default() += 1;
    }

    let first_date = kept
        .iter()
        .min_by_key(|p| p.epoch)
        .map(|p| p.date.clone());
    let last_date = kept
        .iter()
        .max_by_key(|p| p.epoch)
        .map(|p| p.date.clone());

    let summary = StatisticsSummary {
        input_count: pivots.len(),
        article_count: kept.len(),
        first_date,
        last_date,
        journals: build_table(journals, params.journal_support()),
        authors: build_table(authors, params.author_support()),
        keywords: build_table(keywords, params.keyword_support()),
        months: build_table(months, params.date_support()),
    };

    info!(
        input = summary.input_count,
        kept = summary.article_count,
        journals = summary.journals.rows.len(),
        keywords = summary.keywords.rows.len(),
        "statistics aggregated"
    );

    Ok(summary)
}

/// A language code is recognized when it is exactly two ASCII letters.
fn recognized_lang(lang: &str) -> bool {
    lang.len() == 2 && lang.chars().all(|c| c.is_ascii_alphabetic())
}

/// Apply the support threshold and impose the deterministic row order.
fn build_table(counts: HashMap<String, u64>, threshold: u32) -> FrequencyTable {
    let distinct = counts.len();

    let mut rows: Vec<FrequencyRow> = counts
        .into_iter()
        .filter(|(_, count)| *count >= u64::from(threshold))
        .map(|(value, count)| FrequencyRow { value, count })
        .collect();

    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));

    let dropped = distinct - rows.len();
    FrequencyTable {
        rows,
        distinct,
        dropped,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn pivot(journal: &str, author: &str, kws: &[&str], month: u32, lang: &str) -> Pivot {
        Pivot {
            journal: journal.into(),
            journal_clean: journal.into(),
            title: format!("{journal}-{author}-{month}"),
            complement: String::new(),
            year: 2014,
            month,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
            date: format!("2014 {month:02} 01"),
            epoch: 1_388_534_400 + i64::from(month) * 2_678_400,
            author: author.into(),
            text: "body".into(),
            keywords: kws.iter().map(|s| s.to_string()).collect(),
            lang: lang.into(),
        }
    }

    #[test]
    fn counts_and_orders_axes() {
        let pivots = vec![
            pivot("Le Quotidien", "Jane Doe", &["climat"], 1, "fr"),
            pivot("Le Quotidien", "Jane Doe", &["climat", "eau"], 2, "fr"),
            pivot("La Gazette", "", &["eau"], 2, "fr"),
        ];

        let summary = summarize(&pivots, &Params::default()).unwrap();

        assert_eq!(summary.input_count, 3);
        assert_eq!(summary.article_count, 3);

        assert_eq!(summary.journals.rows[0].value, "Le Quotidien");
        assert_eq!(summary.journals.rows[0].count, 2);

        // Empty author lines contribute nothing.
        assert_eq!(summary.authors.rows.len(), 1);

        // Equal counts tie-break on value, ascending.
        assert_eq!(summary.keywords.rows[0].value, "climat");
        assert_eq!(summary.keywords.rows[1].value, "eau");

        assert_eq!(summary.months.rows[0].value, "2014-02");
        assert_eq!(summary.months.total(), 3);
    }

    #[test]
    fn thresholds_prune_axes_independently() {
        let pivots = vec![
            pivot("Le Quotidien", "Jane Doe", &["climat"], 1, "fr"),
            pivot("Le Quotidien", "Paul Renard", &["climat"], 2, "fr"),
            pivot("La Gazette", "Jane Doe", &["eau"], 3, "fr"),
        ];

        let params = Params {
            minimal_support: 2,
            minimal_support_dates: Some(1),
            ..Params::default()
        };
        let summary = summarize(&pivots, &params).unwrap();

        // journals: only Le Quotidien (2) survives support 2.
        assert_eq!(summary.journals.rows.len(), 1);
        assert_eq!(summary.journals.dropped, 1);
        assert_eq!(summary.journals.distinct, 2);

        // keywords: climat (2) survives, eau (1) dropped.
        assert_eq!(summary.keywords.rows.len(), 1);
        assert_eq!(summary.keywords.rows[0].value, "climat");

        // dates keep their own threshold of 1: all three months survive.
        assert_eq!(summary.months.rows.len(), 3);
    }

    #[test]
    fn filter_keywords_drops_keywordless_records() {
        let pivots = vec![
            pivot("Le Quotidien", "Jane Doe", &["climat"], 1, "fr"),
            pivot("La Gazette", "Paul Renard", &[], 1, "fr"),
        ];

        let params = Params {
            filter_keywords: true,
            ..Params::default()
        };
        let summary = summarize(&pivots, &params).unwrap();

        assert_eq!(summary.input_count, 2);
        assert_eq!(summary.article_count, 1);
        // The dropped record's journal and author vanish from every table.
        assert!(summary.journals.rows.iter().all(|r| r.value != "La Gazette"));
        assert!(summary.authors.rows.iter().all(|r| r.value != "Paul Renard"));
    }

    #[test]
    fn filter_lang_drops_unrecognized_codes() {
        let pivots = vec![
            pivot("Le Quotidien", "", &["a"], 1, "fr"),
            pivot("La Gazette", "", &["a"], 1, "und"),
        ];

        let params = Params {
            filter_lang: true,
            ..Params::default()
        };
        let summary = summarize(&pivots, &params).unwrap();
        assert_eq!(summary.article_count, 1);
    }

    #[test]
    fn date_range_spans_surviving_records() {
        let pivots = vec![
            pivot("A", "", &[], 3, "fr"),
            pivot("B", "", &[], 1, "fr"),
            pivot("C", "", &[], 2, "fr"),
        ];

        let summary = summarize(&pivots, &Params::default()).unwrap();
        assert_eq!(summary.first_date.as_deref(), Some("2014 01 01"));
        assert_eq!(summary.last_date.as_deref(), Some("2014 03 01"));
    }

    #[test]
    fn empty_input_is_not_an_error() {
        let summary = summarize(&[], &Params::default()).unwrap();
        assert_eq!(summary.article_count, 0);
        assert!(summary.first_date.is_none());
        assert!(summary.journals.rows.is_empty());
    }

    #[test]
    fn invalid_params_fail_as_aggregation_error() {
        let params = Params {
            minimal_support: 0,
            ..Params::default()
        };
        let err = summarize(&[], &params).unwrap_err();
        assert!(matches!(err, PressmillError::Aggregation(_)));
    }

    #[test]
    fn summary_serializes_to_json() {
        let pivots = vec![pivot("Le Quotidien", "Jane Doe", &["climat"], 1, "fr")];
        let summary = summarize(&pivots, &Params::default()).unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["article_count"], 1);
        assert_eq!(json["journals"]["rows"][0]["value"], "Le Quotidien");
    }
}
