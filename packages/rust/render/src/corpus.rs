//! TXM-style XML corpus markup: a `<corpus>` of `<text>` elements whose
//! attributes carry the record metadata and whose body is the article text.

use pressmill_shared::{ArtifactData, ArtifactFormat, Pivot, RenderedArtifact, Result};

pub fn render(pivots: &[Pivot]) -> Result<RenderedArtifact> {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<corpus>\n");

    for p in pivots {
        let keywords = p.keywords.iter().cloned().collect::<Vec<_>>().join(", ");
        out.push_str(&format!(
            "  <text journal=\"{}\" journal_clean=\"{}\" title=\"{}\" date=\"{}\" \
             year=\"{}\" author=\"{}\" keywords=\"{}\" lang=\"{}\">\n",
            escape_xml(&p.journal),
            escape_xml(&p.journal_clean),
            escape_xml(&p.title),
            escape_xml(&p.date),
            p.year,
            escape_xml(&p.author),
            escape_xml(&keywords),
            escape_xml(&p.lang),
        ));
        out.push_str(&escape_xml(&p.text));
        out.push_str("\n  </text>\n");
    }

    out.push_str("</corpus>\n");

    Ok(RenderedArtifact {
        data: ArtifactData::Text(out),
        format: ArtifactFormat::Xml,
        filename: "corpus.xml".into(),
    })
}

/// Escape the five XML-reserved characters.
pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn pivot(title: &str, text: &str) -> Pivot {
        Pivot {
            journal: "L'Écho & Cie".into(),
            journal_clean: "L'Écho".into(),
            title: title.into(),
            complement: String::new(),
            year: 2014,
            month: 3,
            day: 4,
            hour: 0,
            minute: 0,
            second: 0,
            date: "2014 03 04".into(),
            epoch: 1_393_891_200,
            author: String::new(),
            text: text.into(),
            keywords: BTreeSet::new(),
            lang: "fr".into(),
        }
    }

    #[test]
    fn wraps_texts_in_corpus_element() {
        let artifact = render(&[pivot("A", "un"), pivot("B", "deux")]).unwrap();
        let ArtifactData::Text(xml) = &artifact.data else {
            panic!("expected text payload");
        };

        assert!(xml.starts_with("<?xml version=\"1.0\""));
        assert_eq!(xml.matches("<text ").count(), 2);
        assert_eq!(xml.matches("</text>").count(), 2);
        assert!(xml.trim_end().ends_with("</corpus>"));
        assert_eq!(artifact.format, ArtifactFormat::Xml);
        assert_eq!(artifact.filename, "corpus.xml");
    }

    #[test]
    fn escapes_reserved_characters() {
        let artifact = render(&[pivot("1 < 2 \"vrai\"", "corps & suite")]).unwrap();
        let ArtifactData::Text(xml) = &artifact.data else {
            panic!("expected text payload");
        };

        assert!(xml.contains("title=\"1 &lt; 2 &quot;vrai&quot;\""));
        assert!(xml.contains("corps &amp; suite"));
        assert!(xml.contains("journal=\"L&apos;Écho &amp; Cie\""));
    }

    #[test]
    fn empty_corpus_is_valid() {
        let artifact = render(&[]).unwrap();
        let ArtifactData::Text(xml) = &artifact.data else {
            panic!("expected text payload");
        };
        assert!(xml.contains("<corpus>\n</corpus>"));
    }
}
