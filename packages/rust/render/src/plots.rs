//! SVG frequency plots, delivered as one ZIP with a chart per axis.
//!
//! Charts are plain hand-built SVG horizontal bar charts; the interesting
//! part for the pipeline is that this renderer returns an archive-typed
//! artifact, which the packager flattens into any composite archive.

use std::io::{Cursor, Write};

use tracing::debug;
use zip::ZipWriter;
use zip::write::FileOptions;

use pressmill_shared::{
    ArtifactData, ArtifactFormat, PressmillError, RenderedArtifact, Result,
};
use pressmill_stats::{FrequencyTable, StatisticsSummary};

use crate::corpus::escape_xml;

/// Bars drawn per chart.
const MAX_BARS: usize = 15;

const LABEL_WIDTH: u32 = 220;
const CHART_WIDTH: u32 = 360;
const BAR_HEIGHT: u32 = 18;
const BAR_GAP: u32 = 8;
const HEADER_HEIGHT: u32 = 40;

pub fn render(summary: &StatisticsSummary) -> Result<RenderedArtifact> {
    let charts: [(&str, &str, &FrequencyTable); 3] = [
        ("journals.svg", "Articles per journal", &summary.journals),
        ("keywords.svg", "Keyword frequency", &summary.keywords),
        ("months.svg", "Articles per month", &summary.months),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default();

    for (name, title, table) in charts {
        let svg = bar_chart_svg(title, table);
        zip.start_file(name, options)
            .map_err(|e| PressmillError::Archive(format!("{name}: {e}")))?;
        zip.write_all(svg.as_bytes())
            .map_err(|e| PressmillError::Archive(format!("{name}: {e}")))?;
        debug!(chart = name, bytes = svg.len(), "plot rendered");
    }

    let cursor = zip
        .finish()
        .map_err(|e| PressmillError::Archive(e.to_string()))?;

    Ok(RenderedArtifact {
        data: ArtifactData::Binary(cursor.into_inner()),
        format: ArtifactFormat::Zip,
        filename: "plots.zip".into(),
    })
}

/// A horizontal bar chart over the table's best-supported rows.
fn bar_chart_svg(title: &str, table: &FrequencyTable) -> String {
    let rows = table.top(MAX_BARS);
    let width = LABEL_WIDTH + CHART_WIDTH + 60;
    let height = HEADER_HEIGHT + rows.len() as u32 * (BAR_HEIGHT + BAR_GAP) + 16;
    let max_count = rows.iter().map(|r| r.count).max().unwrap_or(0);

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" \
         font-family=\"sans-serif\" font-size=\"12\">\n"
    );
    svg.push_str(&format!(
        "  <text x=\"10\" y=\"24\" font-size=\"15\" font-weight=\"bold\">{}</text>\n",
        escape_xml(title)
    ));

    if rows.is_empty() {
        svg.push_str(&format!(
            "  <text x=\"10\" y=\"{}\" fill=\"#666\">no data above support threshold</text>\n",
            HEADER_HEIGHT + 10
        ));
    }

    for (i, row) in rows.iter().enumerate() {
        let y = HEADER_HEIGHT + i as u32 * (BAR_HEIGHT + BAR_GAP);
        let bar = if max_count == 0 {
            1
        } else {
            ((row.count * u64::from(CHART_WIDTH)) / max_count).max(1) as u32
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" text-anchor=\"end\">{}</text>\n",
            LABEL_WIDTH - 8,
            y + BAR_HEIGHT - 5,
            escape_xml(&truncate_label(&row.value))
        ));
        svg.push_str(&format!(
            "  <rect x=\"{LABEL_WIDTH}\" y=\"{y}\" width=\"{bar}\" height=\"{BAR_HEIGHT}\" \
             fill=\"#4c78a8\"/>\n"
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\">{}</text>\n",
            LABEL_WIDTH + bar + 6,
            y + BAR_HEIGHT - 5,
            row.count
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Keep labels inside the label gutter.
fn truncate_label(label: &str) -> String {
    const MAX_CHARS: usize = 28;
    if label.chars().count() <= MAX_CHARS {
        label.to_string()
    } else {
        let head: String = label.chars().take(MAX_CHARS - 1).collect();
        format!("{head}…")
    }
}
