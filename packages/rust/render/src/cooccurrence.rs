//! Iramuteq-style corpus text for keyword/co-occurrence analysis.
//!
//! Each record becomes a starred-variable header line followed by the article
//! body, blank-line separated:
//!
//! ```text
//! **** *journal_le_quotidien *year_2014 *month_3 *day_4 *author_jane_doe *lang_fr *kw_climat
//! Body text…
//! ```

use pressmill_shared::{ArtifactData, ArtifactFormat, Pivot, RenderedArtifact, Result};

pub fn render(pivots: &[Pivot]) -> Result<RenderedArtifact> {
    let mut out = String::new();

    for p in pivots {
        out.push_str("****");
        push_var(&mut out, "journal", &p.journal_clean);
        push_var(&mut out, "year", &p.year.to_string());
        push_var(&mut out, "month", &p.month.to_string());
        push_var(&mut out, "day", &p.day.to_string());
        if !p.author.is_empty() {
            push_var(&mut out, "author", &p.author);
        }
        push_var(&mut out, "lang", &p.lang);
        for kw in &p.keywords {
            push_var(&mut out, "kw", kw);
        }
        out.push('\n');
        out.push_str(&p.text);
        out.push_str("\n\n");
    }

    Ok(RenderedArtifact {
        data: ArtifactData::Text(out),
        format: ArtifactFormat::Txt,
        filename: "corpus.txt".into(),
    })
}

fn push_var(out: &mut String, name: &str, value: &str) {
    out.push_str(&format!(" *{name}_{}", format_value(value)));
}

/// Starred-variable values: lowercased, every non-alphanumeric run collapsed
/// to a single underscore.
fn format_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut last_was_sep = true;

    for c in value.to_lowercase().chars() {
        if c.is_alphanumeric() {
            out.push(c);
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }

    out.trim_end_matches('_').to_string()
}
