//! Record deduplication over the (journal, date, title) identity key.

use std::collections::HashMap;

use tracing::debug;

use pressmill_shared::{Pivot, PivotKey};

/// Collapse a merged record collection to set semantics over [`PivotKey`].
///
/// First-occurrence order is preserved. Among identity-key duplicates the
/// record with the longest body text survives; equal lengths keep the first
/// seen, so the surviving content does not depend on input arrival order.
pub fn dedup(pivots: Vec<Pivot>) -> Vec<Pivot> {
    let merged = pivots.len();
    let mut by_key: HashMap<PivotKey, usize> = HashMap::with_capacity(merged);
    let mut kept: Vec<Pivot> = Vec::with_capacity(merged);

    for pivot in pivots {
        match by_key.get(&pivot.key()) {
            Some(&i) => {
                if pivot.text.len() > kept[i].text.len() {
                    kept[i] = pivot;
                }
            }
            None => {
                by_key.insert(pivot.key(), kept.len());
                kept.push(pivot);
            }
        }
    }

    debug!(merged, unique = kept.len(), "records deduplicated");
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn pivot(journal: &str, date: &str, title: &str, text: &str) -> Pivot {
        Pivot {
            journal: journal.into(),
            journal_clean: journal.into(),
            title: title.into(),
            complement: String::new(),
            year: 2014,
            month: 3,
            day: 4,
            hour: 0,
            minute: 0,
            second: 0,
            date: date.into(),
            epoch: 1_393_891_200,
            author: String::new(),
            text: text.into(),
            keywords: BTreeSet::new(),
            lang: "fr".into(),
        }
    }

    #[test]
    fn identical_keys_collapse_to_one() {
        let a = pivot("Le Quotidien", "2014 03 04", "Titre", "short");
        let mut b = pivot("Le Quotidien", "2014 03 04", "Titre", "short");
        b.keywords.insert("climat".into());
        b.author = "Jane Doe".into();

        let out = dedup(vec![a, b]);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn distinct_keys_all_survive() {
        let out = dedup(vec![
            pivot("Le Quotidien", "2014 03 04", "Titre", "x"),
            pivot("Le Quotidien", "2014 03 05", "Titre", "x"),
            pivot("La Gazette", "2014 03 04", "Titre", "x"),
            pivot("Le Quotidien", "2014 03 04", "Autre titre", "x"),
        ]);
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn longest_text_wins_regardless_of_order() {
        let short = pivot("J", "2014 03 04", "T", "abc");
        let long = pivot("J", "2014 03 04", "T", "abcdefghij");

        let out = dedup(vec![short.clone(), long.clone()]);
        assert_eq!(out[0].text, "abcdefghij");

        let out = dedup(vec![long, short]);
        assert_eq!(out[0].text, "abcdefghij");
    }

    #[test]
    fn equal_length_keeps_first_seen() {
        let first = pivot("J", "2014 03 04", "T", "aaa");
        let second = pivot("J", "2014 03 04", "T", "bbb");

        let out = dedup(vec![first, second]);
        assert_eq!(out[0].text, "aaa");
    }

    #[test]
    fn idempotent_on_its_own_output() {
        let input = vec![
            pivot("J", "2014 03 04", "T", "abc"),
            pivot("J", "2014 03 04", "T", "abcdef"),
            pivot("K", "2014 03 04", "T", "x"),
        ];

        let once = dedup(input);
        let twice = dedup(once.clone());

        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.key(), b.key());
            assert_eq!(a.text, b.text);
        }
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(dedup(Vec::new()).is_empty());
    }

    #[test]
    fn first_occurrence_order_preserved() {
        let out = dedup(vec![
            pivot("B", "2014 03 04", "T", "x"),
            pivot("A", "2014 03 04", "T", "x"),
            pivot("B", "2014 03 04", "T", "longer text"),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].journal, "B");
        assert_eq!(out[0].text, "longer text");
        assert_eq!(out[1].journal, "A");
    }
}
