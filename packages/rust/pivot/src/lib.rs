//! Harvested-export normalization: raw press-export markup → [`Pivot`] records.
//!
//! Export files carry one `<article>` element per harvested article, each with
//! a publication-name node, a title heading, a date line, an optional author
//! line, body paragraphs, and an optional subject/keyword line. Field nodes
//! are located through selector priority lists so the common dialect
//! variations all normalize to the same record.

mod cleanup;
mod dates;

use chrono::{Datelike, Timelike};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};

use pressmill_shared::{InputFile, Pivot, PressmillError, Result};

pub use cleanup::{clean_author, clean_journal, collapse_ws, split_keywords};
pub use dates::parse_timestamp;

/// Known publication-name containers, in priority order.
const JOURNAL_SELECTORS: [&str; 3] = [".doc-source", ".publication-name", "header .source"];

/// Known title containers, in priority order.
const TITLE_SELECTORS: [&str; 4] = [".doc-title", "header h1", "h1", "h2"];

/// Known subtitle/complement containers.
const COMPLEMENT_SELECTORS: [&str; 2] = [".doc-subtitle", ".subtitle"];

/// Known date-line containers (a `<time datetime=..>` attribute wins).
const DATE_SELECTORS: [&str; 3] = [".doc-date", ".publication-date", "time"];

/// Known author-line containers.
const AUTHOR_SELECTORS: [&str; 2] = [".doc-author", ".author"];

/// Known body containers.
const BODY_SELECTORS: [&str; 3] = [".doc-text", "section.text", ".text"];

/// Known subject/keyword-line containers.
const SUBJECT_SELECTORS: [&str; 3] = [".doc-subjects", ".subjects", ".keywords"];

/// Normalize one harvested export file into zero or more Pivot records.
///
/// Individual article blocks that cannot be normalized are skipped with a
/// warning; the file as a whole fails only when it contains no recognizable
/// article block at all (or none survives extraction). Pure function of the
/// file content, safe to run concurrently across files.
#[instrument(skip(file), fields(file = %file.name))]
pub fn normalize(file: &InputFile) -> Result<Vec<Pivot>> {
    let doc = Html::parse_document(&file.content);
    let lang = document_lang(&doc);

    let article_sel = Selector::parse("article").unwrap();
    let blocks: Vec<ElementRef> = doc.select(&article_sel).collect();

    if blocks.is_empty() {
        return Err(PressmillError::parse(
            &file.name,
            "no article blocks recognized — not a supported export file",
        ));
    }

    let mut pivots = Vec::with_capacity(blocks.len());
    for (i, block) in blocks.iter().enumerate() {
        match extract_article(*block, &lang) {
            Ok(pivot) => {
                debug!(article = i + 1, title = %pivot.title, "article normalized");
                pivots.push(pivot);
            }
            Err(reason) => {
                warn!(article = i + 1, %reason, "skipping article block");
            }
        }
    }

    if pivots.is_empty() {
        return Err(PressmillError::parse(
            &file.name,
            format!(
                "none of the {} article blocks could be normalized",
                blocks.len()
            ),
        ));
    }

    info!(articles = pivots.len(), blocks = blocks.len(), "file normalized");
    Ok(pivots)
}

/// Extract one Pivot from an `<article>` block.
///
/// Returns a human-readable reason on failure; the caller attributes it to
/// the block's position in the file.
fn extract_article(block: ElementRef<'_>, lang: &str) -> std::result::Result<Pivot, String> {
    let journal = first_text(block, &JOURNAL_SELECTORS)
        .ok_or_else(|| "missing publication name".to_string())?;

    let title =
        first_text(block, &TITLE_SELECTORS).ok_or_else(|| "missing title".to_string())?;

    let raw_date = extract_date_line(block).ok_or_else(|| "missing date line".to_string())?;
    let dt = dates::parse_timestamp(&raw_date)
        .ok_or_else(|| format!("unparseable date '{raw_date}'"))?;

    let text = extract_body(block).ok_or_else(|| "empty article body".to_string())?;

    let complement = first_text(block, &COMPLEMENT_SELECTORS).unwrap_or_default();
    let author = first_text(block, &AUTHOR_SELECTORS)
        .map(|a| cleanup::clean_author(&a))
        .unwrap_or_default();
    let keywords = first_text(block, &SUBJECT_SELECTORS)
        .map(|s| cleanup::split_keywords(&s))
        .unwrap_or_default();

    Ok(Pivot {
        journal_clean: cleanup::clean_journal(&journal),
        journal,
        title,
        complement,
        year: dt.year(),
        month: dt.month(),
        day: dt.day(),
        hour: dt.hour(),
        minute: dt.minute(),
        second: dt.second(),
        date: dt.format("%Y %m %d").to_string(),
        epoch: dt.and_utc().timestamp(),
        author,
        text,
        keywords,
        lang: lang.to_string(),
    })
}

/// First non-empty, whitespace-collapsed text among the given selectors.
fn first_text(scope: ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    for sel_str in selectors {
        let sel = Selector::parse(sel_str).unwrap();
        if let Some(el) = scope.select(&sel).next() {
            let text = cleanup::collapse_ws(&el.text().collect::<String>());
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// Date line for an article: a machine-readable `datetime` attribute on a
/// `<time>` element wins over any visible text.
fn extract_date_line(block: ElementRef<'_>) -> Option<String> {
    let time_sel = Selector::parse("time[datetime]").unwrap();
    if let Some(el) = block.select(&time_sel).next() {
        if let Some(dt) = el.value().attr("datetime") {
            if !dt.trim().is_empty() {
                return Some(dt.trim().to_string());
            }
        }
    }

    first_text(block, &DATE_SELECTORS)
}

/// Article body: paragraphs of the first matching container, joined with
/// blank lines; falls back to the container's raw text when it has no `<p>`.
fn extract_body(block: ElementRef<'_>) -> Option<String> {
    let p_sel = Selector::parse("p").unwrap();

    for sel_str in BODY_SELECTORS {
        let sel = Selector::parse(sel_str).unwrap();
        if let Some(container) = block.select(&sel).next() {
            let paras: Vec<String> = container
                .select(&p_sel)
                .map(|p| cleanup::collapse_ws(&p.text().collect::<String>()))
                .filter(|p| !p.is_empty())
                .collect();

            let body = if paras.is_empty() {
                cleanup::collapse_ws(&container.text().collect::<String>())
            } else {
                paras.join("\n\n")
            };

            if !body.is_empty() {
                return Some(body);
            }
        }
    }
    None
}

/// Document language from the root `lang` attribute, defaulting to `fr`.
fn document_lang(doc: &Html) -> String {
    doc.root_element()
        .value()
        .attr("lang")
        .map(|l| l.chars().take(2).collect::<String>().to_lowercase())
        .filter(|l| l.len() == 2 && l.chars().all(|c| c.is_ascii_alphabetic()))
        .unwrap_or_else(|| "fr".to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
