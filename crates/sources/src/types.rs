use std::collections::HashMap;
use std::path::Path;

/// One document exactly as a source delivered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// Path as listed by the source (repository path or filesystem path)
    pub path: String,

    /// Undecoded document bytes
    pub bytes: Vec<u8>,
}

impl RawDocument {
    pub fn new(path: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            bytes,
        }
    }

    /// Final path component, used to detect the same document arriving from two places.
    pub fn basename(&self) -> &str {
        Path::new(&self.path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.path)
    }
}

/// Everything one source produced.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub namespace: String,
    pub documents: Vec<RawDocument>,
}

/// A source that contributed nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    pub namespace: String,
    pub reason: String,
}

/// Result of running a whole catalog.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    /// Namespace → documents, in no particular order
    pub documents: HashMap<String, Vec<RawDocument>>,

    /// Sources that failed as a whole
    pub failures: Vec<SourceFailure>,
}

impl FetchOutcome {
    /// True when not a single source answered.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn document_count(&self) -> usize {
        self.documents.values().map(Vec::len).sum()
    }
}
