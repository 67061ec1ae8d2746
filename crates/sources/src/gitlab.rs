use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, Response, Url};
use serde::Deserialize;

use crate::catalog::{Origin, Source};
use crate::error::{Result, SourceError};
use crate::fetcher::Fetcher;

const PER_PAGE: &str = "100";

/// `GET /projects/:id/repository/files/:path` envelope. Only the payload matters.
#[derive(Debug, Deserialize)]
struct FileEnvelope {
    content: String,
}

/// One node of `GET /projects/:id/repository/tree`.
#[derive(Debug, Deserialize)]
struct TreeNode {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Thin client over the GitLab v4 repository API.
pub struct GitlabClient {
    http: Client,
}

impl GitlabClient {
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("wlpv/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    async fn get(&self, url: Url) -> Result<Response> {
        log::debug!("GET {url}");
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response)
    }

    /// Follows `x-next-page` until the listing is exhausted.
    async fn list_tree(
        &self,
        host: &str,
        project: &str,
        revision: &str,
        path: &str,
    ) -> Result<Vec<String>> {
        let mut paths = Vec::new();
        let mut page = 1u32;

        loop {
            let url = tree_url(host, project, revision, path, page)?;
            let response = self.get(url).await?;
            let next_page = response
                .headers()
                .get("x-next-page")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u32>().ok());

            let nodes: Vec<TreeNode> = response.json().await?;
            paths.extend(blob_paths(nodes));

            match next_page {
                Some(next) if next > page => page = next,
                _ => break,
            }
        }

        Ok(paths)
    }

    async fn fetch_file(
        &self,
        host: &str,
        project: &str,
        revision: &str,
        path: &str,
    ) -> Result<Vec<u8>> {
        let url = file_url(host, project, revision, path)?;
        let envelope: FileEnvelope = self.get(url).await?.json().await?;
        decode_content(&envelope.content)
    }
}

#[async_trait]
impl Fetcher for GitlabClient {
    async fn list(&self, source: &Source) -> Result<Vec<String>> {
        let (host, project, revision) = gitlab_origin(source)?;
        self.list_tree(host, project, revision, &source.path).await
    }

    async fn fetch(&self, source: &Source, path: &str) -> Result<Vec<u8>> {
        let (host, project, revision) = gitlab_origin(source)?;
        self.fetch_file(host, project, revision, path).await
    }
}

fn gitlab_origin(source: &Source) -> Result<(&str, &str, &str)> {
    match &source.origin {
        Origin::Gitlab {
            host,
            project,
            revision,
        } => Ok((host.as_str(), project.as_str(), revision.as_str())),
        Origin::Filesystem => Err(SourceError::WrongOrigin {
            namespace: source.namespace.clone(),
            expected: "gitlab",
        }),
    }
}

/// `{host}/api/v4/projects/{project}/repository/{tail...}`, every segment percent-encoded so
/// that `/` inside a project or file path becomes `%2F`.
fn repository_url(host: &str, project: &str, tail: &[&str]) -> Result<Url> {
    let mut url =
        Url::parse(host).map_err(|e| SourceError::InvalidUrl(format!("{host}: {e}")))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| SourceError::InvalidUrl(host.to_string()))?;
        segments
            .pop_if_empty()
            .extend(["api", "v4", "projects", project, "repository"])
            .extend(tail);
    }
    Ok(url)
}

pub(crate) fn file_url(host: &str, project: &str, revision: &str, path: &str) -> Result<Url> {
    let mut url = repository_url(host, project, &["files", path])?;
    url.query_pairs_mut().append_pair("ref", revision);
    Ok(url)
}

pub(crate) fn tree_url(
    host: &str,
    project: &str,
    revision: &str,
    path: &str,
    page: u32,
) -> Result<Url> {
    let mut url = repository_url(host, project, &["tree"])?;
    url.query_pairs_mut()
        .append_pair("path", path)
        .append_pair("ref", revision)
        .append_pair("per_page", PER_PAGE)
        .append_pair("recursive", "true")
        .append_pair("page", &page.to_string());
    Ok(url)
}

/// Blobs carrying the document extension; directories and other files are dropped.
fn blob_paths(nodes: Vec<TreeNode>) -> impl Iterator<Item = String> {
    let suffix = format!(".{}", wlpv_protocol::DOCUMENT_EXTENSION);
    nodes
        .into_iter()
        .filter(move |node| {
            node.kind == "blob" && node.path.len() > suffix.len() && node.path.ends_with(&suffix)
        })
        .map(|node| node.path)
}

/// GitLab wraps base64 at arbitrary widths; whitespace is not part of the payload.
fn decode_content(content: &str) -> Result<Vec<u8>> {
    let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(STANDARD.decode(compact)?)
}
