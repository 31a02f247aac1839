//! Artifact packaging: one direct artifact or one composite ZIP archive.
//!
//! Packaging rules:
//! - exactly one requested output with exactly one successful, non-archive
//!   result → that artifact is delivered unwrapped;
//! - otherwise one composite archive is built, members inserted in result
//!   arrival order;
//! - a result whose declared format is itself an archive is opened and its
//!   members re-inserted namespaced by the result's filename stem;
//! - an empty result set packages into a valid empty archive.

use std::io::{Cursor, Read, Write};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, info};
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

use pressmill_shared::{ArtifactFormat, PressmillError, RenderedArtifact, Result};

/// Filename of a composite archive.
const ARCHIVE_NAME: &str = "result.zip";

/// Digest and size of one top-level member of the delivered artifact.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MemberDigest {
    pub name: String,
    pub sha256: String,
    pub size_bytes: usize,
}

/// The final deliverable of a pipeline run.
#[derive(Debug)]
pub struct PackagedArtifact {
    pub filename: String,
    pub format: ArtifactFormat,
    pub bytes: Vec<u8>,
    /// One entry per member of the delivered payload (a single entry for an
    /// unwrapped artifact), in insertion order.
    pub members: Vec<MemberDigest>,
}

/// Combine the completed (possibly partial) result set into the final
/// artifact. `requested` is the original request count, which decides whether
/// a lone success may be delivered unwrapped.
pub fn package(results: Vec<RenderedArtifact>, requested: usize) -> Result<PackagedArtifact> {
    if requested == 1 && results.len() == 1 && results[0].format != ArtifactFormat::Zip {
        let mut results = results;
        let result = results.remove(0);
        let bytes = result.data.into_bytes();
        let member = digest_member(result.filename.clone(), &bytes);

        debug!(file = %result.filename, bytes = bytes.len(), "delivering single artifact");
        return Ok(PackagedArtifact {
            filename: result.filename,
            format: result.format,
            bytes,
            members: vec![member],
        });
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let mut members = Vec::new();

    for result in results {
        info!(file = %result.filename, "adding to archive");

        if result.format == ArtifactFormat::Zip {
            // Flatten the nested archive under its own filename stem.
            let stem = file_stem(&result.filename);
            let inner_bytes = result.data.into_bytes();
            let mut inner = ZipArchive::new(Cursor::new(inner_bytes)).map_err(|e| {
                PressmillError::Archive(format!("nested archive {}: {e}", result.filename))
            })?;

            for i in 0..inner.len() {
                let mut entry = inner.by_index(i).map_err(|e| {
                    PressmillError::Archive(format!("nested archive {}: {e}", result.filename))
                })?;
                let mut buf = Vec::with_capacity(entry.size() as usize);
                entry.read_to_end(&mut buf).map_err(|e| {
                    PressmillError::Archive(format!("nested archive {}: {e}", result.filename))
                })?;

                let path = format!("{stem}/{}", entry.name());
                write_member(&mut zip, &path, &buf)?;
                members.push(digest_member(path, &buf));
            }
        } else {
            let bytes = result.data.into_bytes();
            write_member(&mut zip, &result.filename, &bytes)?;
            members.push(digest_member(result.filename, &bytes));
        }
    }

    let cursor = zip
        .finish()
        .map_err(|e| PressmillError::Archive(e.to_string()))?;

    debug!(members = members.len(), "composite archive built");
    Ok(PackagedArtifact {
        filename: ARCHIVE_NAME.into(),
        format: ArtifactFormat::Zip,
        bytes: cursor.into_inner(),
        members,
    })
}

fn write_member(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    path: &str,
    bytes: &[u8],
) -> Result<()> {
    zip.start_file(path, FileOptions::default())
        .map_err(|e| PressmillError::Archive(format!("{path}: {e}")))?;
    zip.write_all(bytes)
        .map_err(|e| PressmillError::Archive(format!("{path}: {e}")))?;
    Ok(())
}

/// Filename without its extension, used to namespace nested archive members.
fn file_stem(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string())
}

fn digest_member(name: String, bytes: &[u8]) -> MemberDigest {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    MemberDigest {
        name,
        sha256: format!("{:x}", hasher.finalize()),
        size_bytes: bytes.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pressmill_shared::ArtifactData;

    fn text_artifact(filename: &str, format: ArtifactFormat, content: &str) -> RenderedArtifact {
        RenderedArtifact {
            data: ArtifactData::Text(content.into()),
            format,
            filename: filename.into(),
        }
    }

    fn zip_artifact(filename: &str, entries: &[(&str, &str)]) -> RenderedArtifact {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            zip.start_file(*name, FileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        let bytes = zip.finish().unwrap().into_inner();
        RenderedArtifact {
            data: ArtifactData::Binary(bytes),
            format: ArtifactFormat::Zip,
            filename: filename.into(),
        }
    }

    fn member_names(bytes: Vec<u8>) -> Vec<String> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn single_request_single_result_is_unwrapped() {
        let artifact = text_artifact("corpus.csv", ArtifactFormat::Csv, "a,b\n1,2\n");
        let packaged = package(vec![artifact], 1).unwrap();

        assert_eq!(packaged.format, ArtifactFormat::Csv);
        assert_eq!(packaged.filename, "corpus.csv");
        assert_eq!(packaged.bytes, b"a,b\n1,2\n");
        assert_eq!(packaged.members.len(), 1);
        assert_eq!(packaged.members[0].sha256.len(), 64);
    }

    #[test]
    fn multiple_requests_build_one_archive() {
        let packaged = package(
            vec![
                text_artifact("corpus.csv", ArtifactFormat::Csv, "csv"),
                text_artifact("stats.json", ArtifactFormat::Json, "{}"),
            ],
            2,
        )
        .unwrap();

        assert_eq!(packaged.format, ArtifactFormat::Zip);
        assert_eq!(packaged.filename, "result.zip");
        assert_eq!(
            member_names(packaged.bytes),
            vec!["corpus.csv".to_string(), "stats.json".to_string()]
        );
    }

    #[test]
    fn members_follow_arrival_order() {
        let packaged = package(
            vec![
                text_artifact("z-last-started.txt", ArtifactFormat::Txt, "1"),
                text_artifact("a-finished-later.txt", ArtifactFormat::Txt, "2"),
            ],
            2,
        )
        .unwrap();

        assert_eq!(
            member_names(packaged.bytes),
            vec![
                "z-last-started.txt".to_string(),
                "a-finished-later.txt".to_string()
            ]
        );
    }

    #[test]
    fn nested_archive_is_flattened_under_its_stem() {
        let packaged = package(
            vec![
                zip_artifact("bundle.zip", &[("a.txt", "alpha"), ("b.txt", "beta")]),
                text_artifact("stats.json", ArtifactFormat::Json, "{}"),
            ],
            2,
        )
        .unwrap();

        let names = member_names(packaged.bytes.clone());
        assert_eq!(
            names,
            vec![
                "bundle/a.txt".to_string(),
                "bundle/b.txt".to_string(),
                "stats.json".to_string()
            ]
        );

        let mut archive = ZipArchive::new(Cursor::new(packaged.bytes)).unwrap();
        let mut content = String::new();
        archive
            .by_name("bundle/a.txt")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "alpha");
    }

    #[test]
    fn lone_archive_result_is_still_repackaged() {
        let packaged =
            package(vec![zip_artifact("plots.zip", &[("j.svg", "<svg/>")])], 1).unwrap();

        assert_eq!(packaged.format, ArtifactFormat::Zip);
        assert_eq!(packaged.filename, "result.zip");
        assert_eq!(member_names(packaged.bytes), vec!["plots/j.svg".to_string()]);
    }

    #[test]
    fn empty_result_set_packages_to_empty_archive() {
        let packaged = package(Vec::new(), 0).unwrap();

        assert_eq!(packaged.format, ArtifactFormat::Zip);
        assert!(packaged.members.is_empty());
        assert!(member_names(packaged.bytes).is_empty());
    }

    #[test]
    fn partial_result_set_packages_what_succeeded() {
        // Three outputs were requested but only two completed.
        let packaged = package(
            vec![
                text_artifact("corpus.csv", ArtifactFormat::Csv, "csv"),
                text_artifact("summary.md", ArtifactFormat::Txt, "# s"),
            ],
            3,
        )
        .unwrap();

        assert_eq!(packaged.format, ArtifactFormat::Zip);
        assert_eq!(member_names(packaged.bytes).len(), 2);
    }

    #[test]
    fn corrupt_nested_archive_is_an_archive_error() {
        let bogus = RenderedArtifact {
            data: ArtifactData::Binary(vec![1, 2, 3, 4]),
            format: ArtifactFormat::Zip,
            filename: "broken.zip".into(),
        };

        let err = package(vec![bogus], 2).unwrap_err();
        assert!(matches!(err, PressmillError::Archive(_)));
        assert!(err.to_string().contains("broken.zip"));
    }
}
