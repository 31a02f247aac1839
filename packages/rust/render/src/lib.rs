//! Renderer registry: one rendering operation per output kind.
//!
//! The registry is a fixed, compile-time-checked dispatch — an exhaustive
//! match per family, no runtime lookup table — so adding or removing an
//! output kind is a type-checked change. Direct renderers consume the
//! deduplicated record set; statistics-dependent renderers consume the shared
//! [`StatisticsSummary`] instead.

mod cooccurrence;
mod corpus;
mod narrative;
mod plots;
mod records;
mod stats_out;
mod tabular;

use pressmill_shared::{OutputKind, Pivot, PressmillError, RenderedArtifact, Result};
use pressmill_stats::StatisticsSummary;

/// Render a direct output kind from the deduplicated record set.
pub fn render_direct(kind: OutputKind, pivots: &[Pivot]) -> Result<RenderedArtifact> {
    match kind {
        OutputKind::Records => records::render(pivots),
        OutputKind::Tabular => tabular::render(pivots),
        OutputKind::CorpusMarkup => corpus::render(pivots),
        OutputKind::Cooccurrence => cooccurrence::render(pivots),
        OutputKind::GraphExport => Err(PressmillError::render(kind, "no renderer registered")),
        OutputKind::AggregateStats
        | OutputKind::ProcessedStats
        | OutputKind::Plots
        | OutputKind::NarrativeSummary => Err(PressmillError::render(
            kind,
            "requires the statistics summary, not the record set",
        )),
    }
}

/// Render a statistics-dependent output kind from the shared summary.
pub fn render_stats(kind: OutputKind, summary: &StatisticsSummary) -> Result<RenderedArtifact> {
    match kind {
        OutputKind::AggregateStats => stats_out::render_aggregate(summary),
        OutputKind::ProcessedStats => stats_out::render_processed(summary),
        OutputKind::Plots => plots::render(summary),
        OutputKind::NarrativeSummary => narrative::render(summary),
        OutputKind::GraphExport => Err(PressmillError::render(kind, "no renderer registered")),
        OutputKind::Records
        | OutputKind::Tabular
        | OutputKind::CorpusMarkup
        | OutputKind::Cooccurrence => Err(PressmillError::render(
            kind,
            "renders from the record set, not the statistics summary",
        )),
    }
}
