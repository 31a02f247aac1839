//! Run parameters: record filters and minimum-support thresholds.

use serde::{Deserialize, Serialize};

use crate::error::{PressmillError, Result};

/// Immutable run configuration, constructed once per pipeline run and passed
/// by reference to every stage that filters or aggregates.
///
/// An unset specific threshold falls back to [`minimal_support`]; use the
/// accessor methods rather than reading the option fields directly.
///
/// [`minimal_support`]: Params::minimal_support
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    /// Drop records with an empty keyword set before aggregating.
    #[serde(default)]
    pub filter_keywords: bool,

    /// Drop records whose language is not a recognized two-letter code.
    #[serde(default)]
    pub filter_lang: bool,

    /// Overall minimum support: a value must appear in at least this many
    /// records to survive aggregation.
    #[serde(default = "default_support")]
    pub minimal_support: u32,

    /// Keyword-specific threshold; falls back to `minimal_support`.
    #[serde(default)]
    pub minimal_support_keywords: Option<u32>,

    /// Journal-specific threshold; falls back to `minimal_support`.
    #[serde(default)]
    pub minimal_support_journals: Option<u32>,

    /// Author-specific threshold; falls back to `minimal_support`.
    #[serde(default)]
    pub minimal_support_authors: Option<u32>,

    /// Publication-date-bucket threshold; falls back to `minimal_support`.
    #[serde(default)]
    pub minimal_support_dates: Option<u32>,
}

fn default_support() -> u32 {
    1
}

impl Default for Params {
    fn default() -> Self {
        Self {
            filter_keywords: false,
            filter_lang: false,
            minimal_support: default_support(),
            minimal_support_keywords: None,
            minimal_support_journals: None,
            minimal_support_authors: None,
            minimal_support_dates: None,
        }
    }
}

impl Params {
    /// Check that every threshold is a positive integer.
    pub fn validate(&self) -> Result<()> {
        let thresholds = [
            ("minimal_support", Some(self.minimal_support)),
            ("minimal_support_keywords", self.minimal_support_keywords),
            ("minimal_support_journals", self.minimal_support_journals),
            ("minimal_support_authors", self.minimal_support_authors),
            ("minimal_support_dates", self.minimal_support_dates),
        ];

        for (name, value) in thresholds {
            if value == Some(0) {
                return Err(PressmillError::validation(format!(
                    "{name} must be a positive integer (got 0)"
                )));
            }
        }

        Ok(())
    }

    pub fn keyword_support(&self) -> u32 {
        self.minimal_support_keywords.unwrap_or(self.minimal_support)
    }

    pub fn journal_support(&self) -> u32 {
        self.minimal_support_journals.unwrap_or(self.minimal_support)
    }

    pub fn author_support(&self) -> u32 {
        self.minimal_support_authors.unwrap_or(self.minimal_support)
    }

    pub fn date_support(&self) -> u32 {
        self.minimal_support_dates.unwrap_or(self.minimal_support)
    }
}
