use async_trait::async_trait;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::catalog::{Origin, Source};
use crate::error::{Result, SourceError};
use crate::fetcher::Fetcher;

/// Documents on the local filesystem (the offline mirror under `/usr/share`).
pub struct LocalFiles;

#[async_trait]
impl Fetcher for LocalFiles {
    async fn list(&self, source: &Source) -> Result<Vec<String>> {
        ensure_filesystem(source)?;
        let pattern = source.path.clone();

        let files = tokio::task::spawn_blocking(move || -> Result<Vec<PathBuf>> {
            let root = resolve_directory(&pattern)?;
            find_documents(&root)
        })
        .await??;

        Ok(files
            .into_iter()
            .map(|path| path.to_string_lossy().into_owned())
            .collect())
    }

    async fn fetch(&self, source: &Source, path: &str) -> Result<Vec<u8>> {
        ensure_filesystem(source)?;
        Ok(tokio::fs::read(path).await?)
    }
}

fn ensure_filesystem(source: &Source) -> Result<()> {
    match source.origin {
        Origin::Filesystem => Ok(()),
        Origin::Gitlab { .. } => Err(SourceError::WrongOrigin {
            namespace: source.namespace.clone(),
            expected: "filesystem",
        }),
    }
}

/// Resolve a directory path that may contain glob metacharacters.
///
/// Versioned install directories (`libweston-14`) are expected to exist once; when several
/// match, the first in glob order wins.
pub fn resolve_directory(pattern: &str) -> Result<PathBuf> {
    let mut matched = Vec::new();
    for entry in glob::glob(pattern)? {
        match entry {
            Ok(path) if path.is_dir() => matched.push(path),
            Ok(_) => {}
            Err(e) => log::debug!("Skipping unreadable match for {pattern}: {e}"),
        }
    }

    if matched.len() > 1 {
        log::debug!(
            "{} directories match {pattern}, using {}",
            matched.len(),
            matched[0].display()
        );
    }

    matched
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::NoMatch(pattern.to_string()))
}

/// Every protocol document below `root`, sorted by path.
///
/// An unreadable root fails the whole listing; unreadable entries deeper down are skipped.
pub fn find_documents(root: &Path) -> Result<Vec<PathBuf>> {
    std::fs::metadata(root)?;

    let mut files = Vec::new();
    for result in WalkDir::new(root).sort_by_file_name() {
        match result {
            Ok(entry) => {
                if !entry.file_type().is_file() {
                    continue;
                }
                if is_document(entry.path()) {
                    files.push(entry.into_path());
                }
            }
            Err(e) => log::debug!("Failed to read entry: {e}"),
        }
    }

    log::debug!("Found {} documents under {}", files.len(), root.display());
    Ok(files)
}

/// Case-insensitive match on the document extension.
fn is_document(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| {
            name.to_lowercase()
                .ends_with(&format!(".{}", wlpv_protocol::DOCUMENT_EXTENSION))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::AccessMode;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn finds_documents_recursively() {
        let temp = tempdir().unwrap();
        let nested = temp.path().join("unstable").join("tablet");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("tablet-v2.xml"), b"<protocol/>").unwrap();
        fs::write(temp.path().join("wayland.XML"), b"<protocol/>").unwrap();
        fs::write(temp.path().join("README.md"), b"docs").unwrap();
        fs::create_dir_all(temp.path().join("fake.xml")).unwrap();

        let files = find_documents(temp.path()).unwrap();

        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|p| p.ends_with("tablet-v2.xml")));
        assert!(files.iter().any(|p| p.ends_with("wayland.XML")));
    }

    #[test]
    fn missing_root_is_an_error() {
        let temp = tempdir().unwrap();
        assert!(find_documents(&temp.path().join("absent")).is_err());
    }

    #[test]
    fn resolves_versioned_directory_by_glob() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("libweston-14")).unwrap();
        fs::write(temp.path().join("libweston.txt"), b"not a dir").unwrap();

        let pattern = format!("{}/libweston*", temp.path().display());
        let resolved = resolve_directory(&pattern).unwrap();
        assert!(resolved.ends_with("libweston-14"));

        let absent = format!("{}/nothing*", temp.path().display());
        assert!(matches!(
            resolve_directory(&absent),
            Err(SourceError::NoMatch(_))
        ));
        assert!(resolve_directory("[").is_err());
    }

    #[tokio::test]
    async fn lists_and_reads_a_tree_source() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.xml"), b"<protocol name=\"alpha\"/>").unwrap();
        fs::write(temp.path().join("b.xml"), b"<protocol name=\"beta\"/>").unwrap();

        let source = Source::filesystem("local", AccessMode::Tree, temp.path());
        let paths = LocalFiles.list(&source).await.unwrap();
        assert_eq!(paths.len(), 2);

        let bytes = LocalFiles.fetch(&source, &paths[0]).await.unwrap();
        assert_eq!(bytes, b"<protocol name=\"alpha\"/>".to_vec());
    }
}
