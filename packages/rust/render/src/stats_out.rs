//! Aggregate and processed statistics exports.

use pressmill_shared::{
    ArtifactData, ArtifactFormat, PressmillError, RenderedArtifact, Result,
};
use pressmill_stats::{FrequencyTable, StatisticsSummary};

/// Full summary object as pretty JSON.
pub fn render_aggregate(summary: &StatisticsSummary) -> Result<RenderedArtifact> {
    let json = serde_json::to_string_pretty(summary)
        .map_err(|e| PressmillError::render("aggregate-stats", e.to_string()))?;

    Ok(RenderedArtifact {
        data: ArtifactData::Text(json),
        format: ArtifactFormat::Json,
        filename: "stats.json".into(),
    })
}

/// Flat, analysis-ready view: per axis, the rank-ordered `[value, count]`
/// pairs that survived support filtering.
pub fn render_processed(summary: &StatisticsSummary) -> Result<RenderedArtifact> {
    let doc = serde_json::json!({
        "article_count": summary.article_count,
        "first_date": summary.first_date,
        "last_date": summary.last_date,
        "journals": pairs(&summary.journals),
        "authors": pairs(&summary.authors),
        "keywords": pairs(&summary.keywords),
        "months": pairs(&summary.months),
    });

    let json = serde_json::to_string_pretty(&doc)
        .map_err(|e| PressmillError::render("processed-stats", e.to_string()))?;

    Ok(RenderedArtifact {
        data: ArtifactData::Text(json),
        format: ArtifactFormat::Json,
        filename: "processed_stats.json".into(),
    })
}

fn pairs(table: &FrequencyTable) -> Vec<(String, u64)> {
    table
        .rows
        .iter()
        .map(|r| (r.value.clone(), r.count))
        .collect()
}
