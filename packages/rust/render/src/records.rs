//! JSON dump of the deduplicated record set.

use pressmill_shared::{
    ArtifactData, ArtifactFormat, Pivot, PressmillError, RenderedArtifact, Result,
};

pub fn render(pivots: &[Pivot]) -> Result<RenderedArtifact> {
    let json = serde_json::to_string_pretty(pivots)
        .map_err(|e| PressmillError::render("records", e.to_string()))?;

    Ok(RenderedArtifact {
        data: ArtifactData::Text(json),
        format: ArtifactFormat::Json,
        filename: "records.json".into(),
    })
}
