use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use primer_bot_core::{
    models::WorkflowRun,
    util::{entry_path, format_size},
};

use crate::{ActionsApi, Error, Result};

/// Downloads the first artifact of `run` named `name` and writes the zip archive to `output`.
pub async fn fetch_artifact<A: ActionsApi>(
    api: &A,
    run: &WorkflowRun,
    name: &str,
    output: &Path,
) -> Result<PathBuf> {
    let artifacts = api.list_run_artifacts(&run.repo, run.id).await?;
    let Some(artifact) = artifacts.into_iter().find(|a| a.name == name) else {
        return Err(Error::ArtifactNotFound { run_id: run.id, name: name.to_string() });
    };
    tracing::info!("Downloading artifact {} ({}) from run {}", artifact.name, artifact.id, run.id);
    let bytes = api.download_artifact(&run.repo, artifact.id).await?;
    fs::write(output, &bytes).map_err(Error::write(output))?;
    tracing::info!("Wrote {} ({})", output.display(), format_size(bytes.len()));
    Ok(output.to_path_buf())
}

/// Unpacks a zip archive into `dir`. Entries whose names would escape `dir` are skipped.
pub fn extract_archive(archive: &Path, dir: &Path) -> Result<Vec<PathBuf>> {
    let file = File::open(archive).map_err(Error::read(archive))?;
    let mut archive = zip::ZipArchive::new(file)?;
    let mut extracted = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(path) = entry.enclosed_name().and_then(|name| entry_path(dir, name)) else {
            tracing::warn!("Skipping archive entry with unsafe name {}", entry.name());
            continue;
        };
        if entry.is_dir() {
            fs::create_dir_all(&path).map_err(Error::write(&path))?;
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(Error::write(parent))?;
        }
        let mut out = File::create(&path).map_err(Error::write(&path))?;
        io::copy(&mut entry, &mut out).map_err(Error::write(&path))?;
        tracing::debug!("Extracted {}", path.display());
        extracted.push(path);
    }
    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use bytes::Bytes;
    use primer_bot_core::models::ArtifactEntry;
    use zip::{CompressionMethod, write::SimpleFileOptions};

    use super::*;
    use crate::testing::{FakeApi, repo};

    fn zip_bytes(files: &[(&str, &str)]) -> Bytes {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, contents) in files {
            writer.start_file(*name, options).unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        Bytes::from(writer.finish().unwrap().into_inner())
    }

    fn run() -> WorkflowRun { WorkflowRun { id: 42, repo: repo() } }

    #[tokio::test]
    async fn test_fetch_first_matching_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let api = FakeApi {
            artifacts: vec![
                ArtifactEntry { id: 1, name: "coverage".into() },
                ArtifactEntry { id: 2, name: "typeshed_primer_errors".into() },
                ArtifactEntry { id: 3, name: "typeshed_primer_errors".into() },
            ],
            archives: vec![(2, Bytes::from_static(b"first")), (3, Bytes::from_static(b"second"))],
            ..Default::default()
        };
        let output = dir.path().join("errors.zip");
        let path = fetch_artifact(&api, &run(), "typeshed_primer_errors", &output).await.unwrap();
        assert_eq!(path, output);
        assert_eq!(fs::read(&output).unwrap(), b"first");
    }

    #[tokio::test]
    async fn test_fetch_requires_exact_name() {
        let dir = tempfile::tempdir().unwrap();
        let api = FakeApi {
            artifacts: vec![ArtifactEntry { id: 1, name: "typeshed_primer_errors_old".into() }],
            archives: vec![(1, Bytes::from_static(b"zip"))],
            ..Default::default()
        };
        let output = dir.path().join("errors.zip");
        let err = fetch_artifact(&api, &run(), "typeshed_primer_errors", &output).await.unwrap_err();
        match &err {
            Error::ArtifactNotFound { run_id, name } => {
                assert_eq!(*run_id, 42);
                assert_eq!(name, "typeshed_primer_errors");
            }
            _ => panic!("unexpected error: {err:?}"),
        }
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_fetch_no_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let api = FakeApi::default();
        let err = fetch_artifact(&api, &run(), "typeshed_primer_errors", &dir.path().join("a.zip"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ArtifactNotFound { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn test_fetch_download_failure() {
        let dir = tempfile::tempdir().unwrap();
        let api = FakeApi {
            artifacts: vec![ArtifactEntry { id: 7, name: "typeshed_primer_errors".into() }],
            ..Default::default()
        };
        let err = fetch_artifact(&api, &run(), "typeshed_primer_errors", &dir.path().join("a.zip"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, Error::RemoteService { operation: "download artifact", .. }),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn test_fetch_then_extract() {
        let dir = tempfile::tempdir().unwrap();
        let api = FakeApi {
            artifacts: vec![ArtifactEntry { id: 5, name: "typeshed_primer_errors".into() }],
            archives: vec![(
                5,
                zip_bytes(&[
                    ("errors.txt", "stubs/foo.pyi:1:1: Y001 error\n"),
                    ("pr_number.txt", "1234\n"),
                ]),
            )],
            ..Default::default()
        };
        let archive = dir.path().join("errors.zip");
        fetch_artifact(&api, &run(), "typeshed_primer_errors", &archive).await.unwrap();
        let out = dir.path().join("out");
        let mut extracted = extract_archive(&archive, &out).unwrap();
        extracted.sort();
        assert_eq!(extracted, vec![out.join("errors.txt"), out.join("pr_number.txt")]);
        assert_eq!(fs::read_to_string(out.join("pr_number.txt")).unwrap(), "1234\n");
    }

    #[test]
    fn test_extract_nested_entries() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("errors.zip");
        fs::write(&archive, zip_bytes(&[("nested/deeper/errors.txt", "y")])).unwrap();
        let out = dir.path().join("out");
        let extracted = extract_archive(&archive, &out).unwrap();
        let expected = out.join("nested").join("deeper").join("errors.txt");
        assert_eq!(extracted, vec![expected.clone()]);
        assert_eq!(fs::read_to_string(expected).unwrap(), "y");
    }

    #[test]
    fn test_extract_invalid_archive() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("errors.zip");
        fs::write(&archive, b"not a zip").unwrap();
        let err = extract_archive(&archive, dir.path()).unwrap_err();
        assert!(matches!(err, Error::Archive(_)), "{err:?}");
    }

    #[test]
    fn test_extract_missing_archive() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract_archive(&dir.path().join("missing.zip"), dir.path()).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }), "{err:?}");
    }
}
