//! Markdown narrative summary of the corpus.

use pressmill_shared::{ArtifactData, ArtifactFormat, RenderedArtifact, Result};
use pressmill_stats::{FrequencyTable, StatisticsSummary};

/// Rows shown per axis table.
const TOP_N: usize = 10;

pub fn render(summary: &StatisticsSummary) -> Result<RenderedArtifact> {
    let mut md = String::from("# Corpus summary\n\n");

    md.push_str(&format!(
        "- Articles kept: **{}** (of {} harvested)\n",
        summary.article_count, summary.input_count
    ));

    match (&summary.first_date, &summary.last_date) {
        (Some(first), Some(last)) if first != last => {
            md.push_str(&format!("- Period: {first} to {last}\n"));
        }
        (Some(first), _) => {
            md.push_str(&format!("- Period: {first}\n"));
        }
        _ => {
            md.push_str("- Period: empty corpus\n");
        }
    }

    md.push_str(&format!(
        "- Journals: {} distinct, {} above support\n",
        summary.journals.distinct,
        summary.journals.rows.len()
    ));
    md.push_str(&format!(
        "- Keywords: {} distinct, {} above support\n\n",
        summary.keywords.distinct,
        summary.keywords.rows.len()
    ));

    push_axis_table(&mut md, "Top journals", "Journal", &summary.journals);
    push_axis_table(&mut md, "Top authors", "Author", &summary.authors);
    push_axis_table(&mut md, "Top keywords", "Keyword", &summary.keywords);
    push_axis_table(&mut md, "Articles per month", "Month", &summary.months);

    Ok(RenderedArtifact {
        data: ArtifactData::Text(md),
        format: ArtifactFormat::Txt,
        filename: "summary.md".into(),
    })
}

fn push_axis_table(md: &mut String, heading: &str, label: &str, table: &FrequencyTable) {
    md.push_str(&format!("## {heading}\n\n"));

    if table.rows.is_empty() {
        md.push_str("Nothing above the support threshold.\n\n");
        return;
    }

    md.push_str(&format!("| {label} | Articles |\n"));
    md.push_str("| --- | --- |\n");
    for row in table.top(TOP_N) {
        md.push_str(&format!("| {} | {} |\n", escape_cell(&row.value), row.count));
    }
    if table.rows.len() > TOP_N {
        md.push_str(&format!("\n({} more rows)\n", table.rows.len() - TOP_N));
    }
    md.push('\n');
}

/// Pipes would break the table layout.
fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}
