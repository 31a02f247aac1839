//! End-to-end pipeline: input files → normalize → dedup → aggregate →
//! fan-out render → package.
//!
//! One call to [`run`] owns one record collection and one statistics summary;
//! both are published read-only to the renderer units. The only blocking
//! points are all-normalizers-done before dedup, aggregator-done before any
//! statistics-dependent renderer, and all-units-done before packaging.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;
use tracing::{info, instrument, warn};

use pressmill_shared::{
    InputFile, OutputKind, Params, Pivot, PressmillError, Result, RunId,
};

use crate::dedup;
use crate::executor::{self, RenderFailure, RenderRequest};
use crate::packager::{self, PackagedArtifact};

/// A captured per-file normalization failure.
#[derive(Debug)]
pub struct ParseFailure {
    pub file: String,
    pub error: PressmillError,
}

/// Outcome of one pipeline run. Per-unit failures are reported here rather
/// than raised; the caller decides whether a partial result set is acceptable.
#[derive(Debug)]
pub struct PipelineReport {
    /// Run identifier, also present in the run's log records.
    pub run_id: RunId,
    /// The delivered artifact (single or composite, possibly degraded).
    pub artifact: PackagedArtifact,
    /// Input files that could not be normalized.
    pub parse_failures: Vec<ParseFailure>,
    /// Output kinds that failed to render.
    pub render_failures: Vec<RenderFailure>,
    /// Input files received.
    pub files_in: usize,
    /// Articles found across all files, before deduplication.
    pub articles_found: usize,
    /// Articles remaining after deduplication.
    pub articles_unique: usize,
    /// Total wall-clock time of the run.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when an input file finishes normalizing.
    fn file_normalized(&self, file: &str, articles: usize, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, report: &PipelineReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn file_normalized(&self, _file: &str, _articles: usize, _current: usize, _total: usize) {}
    fn done(&self, _report: &PipelineReport) {}
}

/// Run the full pipeline over `files`, producing `outputs`.
///
/// Fails synchronously with a validation error on malformed params, an
/// unimplemented output kind, or a kind requested more than once. Every other
/// failure is isolated to its file or output kind and surfaced through the
/// report.
#[instrument(skip_all, fields(files = files.len(), outputs = outputs.len()))]
pub async fn run(
    files: Vec<InputFile>,
    outputs: &[OutputKind],
    params: &Params,
    progress: &dyn ProgressReporter,
) -> Result<PipelineReport> {
    let start = Instant::now();
    let run_id = RunId::new();

    // --- Validation (before any work starts) ---
    params.validate()?;

    let mut seen: HashSet<OutputKind> = HashSet::new();
    for kind in outputs {
        if !kind.implemented() {
            return Err(PressmillError::validation(format!(
                "output kind '{kind}' has no renderer registered"
            )));
        }
        if !seen.insert(*kind) {
            return Err(PressmillError::validation(format!(
                "output kind '{kind}' requested more than once"
            )));
        }
    }

    info!(%run_id, files = files.len(), "starting pipeline run");

    // --- Normalize each file concurrently ---
    progress.phase("Normalizing input files");
    let files_in = files.len();
    let (merged, parse_failures) = normalize_files(files, progress).await;
    let articles_found = merged.len();

    // --- Deduplicate ---
    progress.phase("Deduplicating records");
    let pivots: Arc<[Pivot]> = dedup::dedup(merged).into();
    let articles_unique = pivots.len();

    // --- Aggregate once, before any statistics-dependent renderer ---
    let stats_kinds: Vec<OutputKind> = outputs
        .iter()
        .copied()
        .filter(|k| k.stats_dependent())
        .collect();

    let mut requests: Vec<RenderRequest> = outputs
        .iter()
        .copied()
        .filter(|k| !k.stats_dependent())
        .map(|kind| RenderRequest::Direct {
            kind,
            pivots: pivots.clone(),
        })
        .collect();

    let mut render_failures: Vec<RenderFailure> = Vec::new();

    if !stats_kinds.is_empty() {
        progress.phase("Aggregating statistics");
        match aggregate(pivots.clone(), params.clone()).await {
            Ok(summary) => {
                let summary = Arc::new(summary);
                requests.extend(stats_kinds.iter().map(|&kind| RenderRequest::Stats {
                    kind,
                    summary: summary.clone(),
                }));
            }
            Err(error) => {
                // Fatal to the whole statistics family, not to direct outputs.
                warn!(%error, "statistics aggregation failed");
                let message = error.to_string();
                render_failures.extend(stats_kinds.iter().map(|&kind| RenderFailure {
                    kind,
                    error: PressmillError::Aggregation(message.clone()),
                }));
            }
        }
    }

    // --- Fan out over the renderer units ---
    progress.phase("Rendering outputs");
    let (artifacts, mut failures) = executor::execute(requests).await;
    render_failures.append(&mut failures);

    // --- Package ---
    progress.phase("Packaging artifacts");
    let artifact = packager::package(artifacts, outputs.len())?;

    let report = PipelineReport {
        run_id,
        artifact,
        parse_failures,
        render_failures,
        files_in,
        articles_found,
        articles_unique,
        elapsed: start.elapsed(),
    };

    progress.done(&report);

    info!(
        run_id = %report.run_id,
        articles_found = report.articles_found,
        articles_unique = report.articles_unique,
        parse_failures = report.parse_failures.len(),
        render_failures = report.render_failures.len(),
        elapsed_ms = report.elapsed.as_millis(),
        "pipeline run complete"
    );

    Ok(report)
}

/// Normalize every file as its own blocking task; per-file failures are
/// collected, never raised.
async fn normalize_files(
    files: Vec<InputFile>,
    progress: &dyn ProgressReporter,
) -> (Vec<Pivot>, Vec<ParseFailure>) {
    let total = files.len();
    let mut set: JoinSet<(String, pressmill_shared::Result<Vec<Pivot>>)> = JoinSet::new();

    for file in files {
        set.spawn_blocking(move || {
            let name = file.name.clone();
            let result = pressmill_pivot::normalize(&file);
            (name, result)
        });
    }

    let mut merged = Vec::new();
    let mut failures = Vec::new();
    let mut processed = 0;

    while let Some(joined) = set.join_next().await {
        processed += 1;
        match joined {
            Ok((name, Ok(pivots))) => {
                progress.file_normalized(&name, pivots.len(), processed, total);
                merged.extend(pivots);
            }
            Ok((name, Err(error))) => {
                warn!(file = %name, %error, "input file failed to normalize");
                failures.push(ParseFailure { file: name, error });
            }
            Err(join_err) => {
                warn!(error = %join_err, "normalizer task aborted");
                failures.push(ParseFailure {
                    file: "<unknown>".into(),
                    error: PressmillError::parse("<unknown>", "normalizer task aborted"),
                });
            }
        }
    }

    (merged, failures)
}

/// Run the aggregator off the async runtime; it is CPU-bound over the whole
/// record set.
async fn aggregate(
    pivots: Arc<[Pivot]>,
    params: Params,
) -> Result<pressmill_stats::StatisticsSummary> {
    tokio::task::spawn_blocking(move || pressmill_stats::summarize(&pivots, &params))
        .await
        .map_err(|e| PressmillError::Aggregation(format!("aggregator task failed: {e}")))?
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
