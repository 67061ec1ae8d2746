use async_trait::async_trait;

use crate::catalog::{Origin, Source};
use crate::error::Result;
use crate::gitlab::GitlabClient;
use crate::local::LocalFiles;

/// Access to the documents behind a [`Source`].
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    /// Paths of every document below a tree source.
    async fn list(&self, source: &Source) -> Result<Vec<String>>;

    /// Raw bytes of one document. For single-file sources `path` is `source.path`.
    async fn fetch(&self, source: &Source, path: &str) -> Result<Vec<u8>>;
}

/// Routes each source to the backend its origin names.
pub struct SourceFetcher {
    gitlab: GitlabClient,
    local: LocalFiles,
}

impl SourceFetcher {
    pub fn new() -> Result<Self> {
        Ok(Self {
            gitlab: GitlabClient::new()?,
            local: LocalFiles,
        })
    }
}

#[async_trait]
impl Fetcher for SourceFetcher {
    async fn list(&self, source: &Source) -> Result<Vec<String>> {
        match source.origin {
            Origin::Gitlab { .. } => self.gitlab.list(source).await,
            Origin::Filesystem => self.local.list(source).await,
        }
    }

    async fn fetch(&self, source: &Source, path: &str) -> Result<Vec<u8>> {
        match source.origin {
            Origin::Gitlab { .. } => self.gitlab.fetch(source, path).await,
            Origin::Filesystem => self.local.fetch(source, path).await,
        }
    }
}
