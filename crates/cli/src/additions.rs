use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use wlpv_protocol::DOCUMENT_EXTENSION;
use wlpv_sources::{find_documents, RawDocument};

/// Expand every `--add` pattern into document paths.
///
/// Directories contribute every `.xml` file beneath them; plain files are kept only when their
/// extension is `xml`. Patterns matching nothing contribute nothing.
pub fn collect_paths(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for pattern in patterns {
        let matches =
            glob::glob(pattern).with_context(|| format!("invalid pattern {pattern:?}"))?;

        for entry in matches {
            let path = entry.with_context(|| format!("failed to read a match of {pattern:?}"))?;
            let metadata = fs::metadata(&path)
                .with_context(|| format!("failed to stat {}", path.display()))?;

            if metadata.is_dir() {
                let found = find_documents(&path)
                    .with_context(|| format!("failed to scan {}", path.display()))?;
                paths.extend(found);
            } else if has_document_extension(&path) {
                paths.push(path);
            } else {
                log::debug!("skipping {}: not an .{DOCUMENT_EXTENSION} file", path.display());
            }
        }
    }

    Ok(paths)
}

fn has_document_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == DOCUMENT_EXTENSION)
}

/// Read the documents named by `patterns`. Any unreadable file is fatal.
pub fn load(patterns: &[String]) -> Result<Vec<RawDocument>> {
    collect_paths(patterns)?
        .into_iter()
        .map(|path| {
            let bytes =
                fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
            Ok(RawDocument::new(path.to_string_lossy(), bytes))
        })
        .collect()
}
