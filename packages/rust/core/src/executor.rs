//! Fan-out executor: one isolated unit of work per requested output kind.
//!
//! Units are CPU-bound and hold their own intermediate state, so each runs as
//! its own blocking task. Results are collected as they complete; a failing
//! or panicking unit is captured as a [`RenderFailure`] and never cancels its
//! siblings.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, warn};

use pressmill_shared::{OutputKind, Pivot, PressmillError, RenderedArtifact};
use pressmill_stats::StatisticsSummary;

/// One requested rendering unit, carrying a read-only snapshot of exactly the
/// data its renderer family consumes. Units share no mutable state.
#[derive(Clone)]
pub enum RenderRequest {
    /// Renders from the deduplicated record set.
    Direct {
        kind: OutputKind,
        pivots: Arc<[Pivot]>,
    },
    /// Renders from the shared statistics summary; the aggregator is
    /// guaranteed to have completed before this unit is built.
    Stats {
        kind: OutputKind,
        summary: Arc<StatisticsSummary>,
    },
}

impl RenderRequest {
    pub fn kind(&self) -> OutputKind {
        match self {
            RenderRequest::Direct { kind, .. } => *kind,
            RenderRequest::Stats { kind, .. } => *kind,
        }
    }
}

/// A captured failure for one output kind.
#[derive(Debug)]
pub struct RenderFailure {
    pub kind: OutputKind,
    pub error: PressmillError,
}

/// Execute every request concurrently and collect outcomes in completion
/// order. The artifact list and the failure list together account for every
/// request; no ordering is guaranteed beyond "delivered as completed".
pub async fn execute(
    requests: Vec<RenderRequest>,
) -> (Vec<RenderedArtifact>, Vec<RenderFailure>) {
    let mut set: JoinSet<(OutputKind, pressmill_shared::Result<RenderedArtifact>)> =
        JoinSet::new();

    for request in requests {
        let kind = request.kind();
        set.spawn_blocking(move || {
            let outcome = catch_unwind(AssertUnwindSafe(|| match request {
                RenderRequest::Direct { kind, pivots } => {
                    pressmill_render::render_direct(kind, &pivots)
                }
                RenderRequest::Stats { kind, summary } => {
                    pressmill_render::render_stats(kind, &summary)
                }
            }));

            let result = match outcome {
                Ok(result) => result,
                Err(_) => Err(PressmillError::render(kind, "renderer panicked")),
            };
            (kind, result)
        });
    }

    let mut artifacts = Vec::new();
    let mut failures = Vec::new();

    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((kind, Ok(artifact))) => {
                debug!(%kind, file = %artifact.filename, bytes = artifact.data.len(), "output rendered");
                artifacts.push(artifact);
            }
            Ok((kind, Err(error))) => {
                warn!(%kind, %error, "output failed");
                failures.push(RenderFailure { kind, error });
            }
            Err(join_err) => {
                // Panics are caught inside the unit; this is cancellation only.
                warn!(error = %join_err, "renderer task aborted");
            }
        }
    }

    (artifacts, failures)
}
