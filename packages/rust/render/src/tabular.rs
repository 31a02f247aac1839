//! CSV export, one row per record.

use pressmill_shared::{ArtifactData, ArtifactFormat, Pivot, RenderedArtifact, Result};

/// Column order of the export.
const HEADER: [&str; 16] = [
    "journal",
    "journal_clean",
    "title",
    "complement",
    "year",
    "month",
    "day",
    "hour",
    "minute",
    "second",
    "date",
    "epoch",
    "author",
    "text",
    "keywords",
    "lang",
];

pub fn render(pivots: &[Pivot]) -> Result<RenderedArtifact> {
    let mut out = String::new();
    out.push_str(&HEADER.join(","));
    out.push('\n');

    for p in pivots {
        let keywords = p.keywords.iter().cloned().collect::<Vec<_>>().join(", ");
        let fields: [String; 16] = [
            p.journal.clone(),
            p.journal_clean.clone(),
            p.title.clone(),
            p.complement.clone(),
            p.year.to_string(),
            p.month.to_string(),
            p.day.to_string(),
            p.hour.to_string(),
            p.minute.to_string(),
            p.second.to_string(),
            p.date.clone(),
            p.epoch.to_string(),
            p.author.clone(),
            p.text.clone(),
            keywords,
            p.lang.clone(),
        ];

        let row: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }

    Ok(RenderedArtifact {
        data: ArtifactData::Text(out),
        format: ArtifactFormat::Csv,
        filename: "corpus.csv".into(),
    })
}

/// RFC 4180 quoting: wrap when the field carries a comma, quote, or newline;
/// embedded quotes are doubled.
fn escape_field(field: &str) -> String {
    if field.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
