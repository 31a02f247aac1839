//! Core domain types for the pressmill corpus pipeline.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper identifying one pipeline run (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// InputFile
// ---------------------------------------------------------------------------

/// A named raw harvested document, consumed once by the normalizer.
#[derive(Debug, Clone)]
pub struct InputFile {
    /// Original file name, used in parse-error reports.
    pub name: String,
    /// Decoded UTF-8 content.
    pub content: String,
}

// ---------------------------------------------------------------------------
// Pivot
// ---------------------------------------------------------------------------

/// Canonical normalized article record — the unit of data for the whole
/// pipeline. Immutable once built; shared read-only across renderers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pivot {
    /// Source journal name as harvested.
    pub journal: String,
    /// Cleaned journal name (edition counters and suffixes stripped).
    pub journal_clean: String,
    /// Article title.
    pub title: String,
    /// Subtitle or complement line, empty when absent.
    pub complement: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// Formatted publication date, `%Y %m %d`.
    pub date: String,
    /// Publication timestamp as Unix seconds.
    pub epoch: i64,
    /// Author line, empty when absent.
    pub author: String,
    /// Full article body.
    pub text: String,
    /// Unordered, unique keyword strings. Serialized as a comma-joined
    /// string for the tabular and corpus outputs.
    #[serde(with = "keywords_serde")]
    pub keywords: BTreeSet<String>,
    /// Two-letter language code.
    pub lang: String,
}

impl Pivot {
    /// The structural identity of this record: two Pivots describe the same
    /// article iff their keys are equal, regardless of every other field.
    pub fn key(&self) -> PivotKey {
        PivotKey {
            journal: self.journal.clone(),
            date: self.date.clone(),
            title: self.title.clone(),
        }
    }
}

/// (journal, formatted-date, title) identity triple used for deduplication
/// and any hash-based set membership test.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PivotKey {
    pub journal: String,
    pub date: String,
    pub title: String,
}

/// Serialize a keyword set as `"a, b, c"`; deserialize by splitting back.
mod keywords_serde {
    use std::collections::BTreeSet;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(kw: &BTreeSet<String>, ser: S) -> Result<S::Ok, S::Error> {
        let joined = kw.iter().cloned().collect::<Vec<_>>().join(", ");
        ser.serialize_str(&joined)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<BTreeSet<String>, D::Error> {
        let raw = String::deserialize(de)?;
        Ok(raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect())
    }
}

// ---------------------------------------------------------------------------
// OutputKind
// ---------------------------------------------------------------------------

/// The closed set of requestable output kinds.
///
/// Dispatch over this enum is an exhaustive match in `pressmill-render`, so
/// adding a kind is a compile-checked change to every arm that must know it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputKind {
    /// JSON dump of the deduplicated record set.
    Records,
    /// CSV export, one row per article.
    Tabular,
    /// TXM-style XML corpus markup.
    CorpusMarkup,
    /// Iramuteq-style keyword/co-occurrence corpus text.
    #[serde(rename = "co-occurrence-export")]
    Cooccurrence,
    /// Graph export — reserved, not yet implemented.
    GraphExport,
    /// Aggregate statistics as JSON.
    AggregateStats,
    /// Support-filtered, rank-ordered statistics as JSON.
    ProcessedStats,
    /// SVG frequency plots, zipped.
    Plots,
    /// Markdown narrative summary of the corpus.
    NarrativeSummary,
}

impl OutputKind {
    /// Every kind, in declaration order.
    pub const ALL: [OutputKind; 9] = [
        OutputKind::Records,
        OutputKind::Tabular,
        OutputKind::CorpusMarkup,
        OutputKind::Cooccurrence,
        OutputKind::GraphExport,
        OutputKind::AggregateStats,
        OutputKind::ProcessedStats,
        OutputKind::Plots,
        OutputKind::NarrativeSummary,
    ];

    /// Kinds that render from the shared statistics summary rather than the
    /// raw record set. If any of these is requested, the aggregator must
    /// complete before the kind's renderer starts.
    pub fn stats_dependent(self) -> bool {
        matches!(
            self,
            OutputKind::AggregateStats
                | OutputKind::ProcessedStats
                | OutputKind::Plots
                | OutputKind::NarrativeSummary
        )
    }

    /// Whether a renderer is registered for this kind.
    pub fn implemented(self) -> bool {
        !matches!(self, OutputKind::GraphExport)
    }

    /// Stable kebab-case name used in CLI flags and config files.
    pub fn as_str(self) -> &'static str {
        match self {
            OutputKind::Records => "records",
            OutputKind::Tabular => "tabular",
            OutputKind::CorpusMarkup => "corpus-markup",
            OutputKind::Cooccurrence => "co-occurrence-export",
            OutputKind::GraphExport => "graph-export",
            OutputKind::AggregateStats => "aggregate-stats",
            OutputKind::ProcessedStats => "processed-stats",
            OutputKind::Plots => "plots",
            OutputKind::NarrativeSummary => "narrative-summary",
        }
    }
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutputKind {
    type Err = crate::error::PressmillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| {
                let known = Self::ALL.map(OutputKind::as_str).join(", ");
                crate::error::PressmillError::validation(format!(
                    "unknown output kind '{s}' (expected one of: {known})"
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Rendered artifacts
// ---------------------------------------------------------------------------

/// On-the-wire format of a rendered artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    Csv,
    Json,
    Txt,
    Xml,
    Svg,
    Zip,
}

impl ArtifactFormat {
    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactFormat::Csv => "csv",
            ArtifactFormat::Json => "json",
            ArtifactFormat::Txt => "txt",
            ArtifactFormat::Xml => "xml",
            ArtifactFormat::Svg => "svg",
            ArtifactFormat::Zip => "zip",
        }
    }

    /// MIME type for delivery by an HTTP caller.
    pub fn media_type(self) -> &'static str {
        match self {
            ArtifactFormat::Csv => "text/csv",
            ArtifactFormat::Json => "application/json",
            ArtifactFormat::Txt => "text/plain",
            ArtifactFormat::Xml => "application/xml",
            ArtifactFormat::Svg => "image/svg+xml",
            ArtifactFormat::Zip => "application/zip",
        }
    }
}

/// Payload of a rendered artifact.
#[derive(Debug, Clone)]
pub enum ArtifactData {
    Text(String),
    Binary(Vec<u8>),
}

impl ArtifactData {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ArtifactData::Text(s) => s.as_bytes(),
            ArtifactData::Binary(b) => b,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            ArtifactData::Text(s) => s.into_bytes(),
            ArtifactData::Binary(b) => b,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

/// One produced artifact: payload, format tag, and filename.
/// Exactly one is produced per successfully rendered output kind.
#[derive(Debug, Clone)]
pub struct RenderedArtifact {
    pub data: ArtifactData,
    pub format: ArtifactFormat,
    pub filename: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pivot(title: &str) -> Pivot {
        Pivot {
            journal: "Le Quotidien, no. 482".into(),
            journal_clean: "Le Quotidien".into(),
            title: title.into(),
            complement: String::new(),
            year: 2014,
            month: 3,
            day: 4,
            hour: 18,
            minute: 32,
            second: 0,
            date: "2014 03 04".into(),
            epoch: 1_393_957_920,
            author: "Jane Doe".into(),
            text: "Body text.".into(),
            keywords: ["climat", "énergie"].into_iter().map(String::from).collect(),
            lang: "fr".into(),
        }
    }

    #[test]
    fn pivot_key_ignores_non_identity_fields() {
        let a = sample_pivot("Title");
        let mut b = sample_pivot("Title");
        b.text = "Completely different body.".into();
        b.keywords.clear();
        assert_eq!(a.key(), b.key());

        let c = sample_pivot("Other title");
        assert_ne!(a.key(), c.key());
    }

    #[test]
    fn keywords_serialize_as_joined_string() {
        let pivot = sample_pivot("Title");
        let json = serde_json::to_value(&pivot).expect("serialize");
        assert_eq!(json["keywords"], "climat, énergie");

        let back: Pivot = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back.keywords, pivot.keywords);
    }

    #[test]
    fn output_kind_roundtrip() {
        for kind in OutputKind::ALL {
            let parsed: OutputKind = kind.as_str().parse().expect("parse");
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn output_kind_unknown_is_actionable() {
        let err = "gephi".parse::<OutputKind>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("unknown output kind 'gephi'"));
        assert!(msg.contains("graph-export"));
    }

    #[test]
    fn stats_dependent_set() {
        let stats: Vec<_> = OutputKind::ALL
            .into_iter()
            .filter(|k| k.stats_dependent())
            .collect();
        assert_eq!(
            stats,
            vec![
                OutputKind::AggregateStats,
                OutputKind::ProcessedStats,
                OutputKind::Plots,
                OutputKind::NarrativeSummary,
            ]
        );
        assert!(!OutputKind::GraphExport.implemented());
        assert!(OutputKind::Tabular.implemented());
    }

    #[test]
    fn artifact_format_media_types() {
        assert_eq!(ArtifactFormat::Zip.media_type(), "application/zip");
        assert_eq!(ArtifactFormat::Csv.extension(), "csv");
        assert_eq!(ArtifactFormat::Svg.media_type(), "image/svg+xml");
    }

    #[test]
    fn run_id_display() {
        let id = RunId::new();
        assert_eq!(id.to_string().len(), 36);
    }
}
