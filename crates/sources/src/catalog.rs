use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, SourceError};

/// Namespace reserved for documents named on the command line.
pub const USER_NAMESPACE: &str = "user";

const FREEDESKTOP: &str = "https://gitlab.freedesktop.org";
const KDE_INVENT: &str = "https://invent.kde.org";
const SYSTEM_PREFIX: &str = "/usr/share";

/// How a source exposes its documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    /// `path` names exactly one document
    File,

    /// `path` is a directory whose `.xml` descendants are all documents
    Tree,
}

/// Where a source lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Origin {
    /// A project on a GitLab instance, read through the REST API
    Gitlab {
        /// Scheme and host, e.g. `https://gitlab.freedesktop.org`
        host: String,
        /// Full project path, e.g. `wayland/wayland-protocols`
        project: String,
        /// Branch, tag or commit
        revision: String,
    },

    /// The local filesystem; `path` may be a glob that resolves to one directory
    Filesystem,
}

/// One catalog entry: where to find the documents of one namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub namespace: String,
    pub origin: Origin,
    pub mode: AccessMode,
    pub path: String,
}

impl Source {
    pub fn gitlab(
        namespace: &str,
        host: &str,
        project: &str,
        revision: &str,
        mode: AccessMode,
        path: &str,
    ) -> Self {
        Self {
            namespace: namespace.to_string(),
            origin: Origin::Gitlab {
                host: host.to_string(),
                project: project.to_string(),
                revision: revision.to_string(),
            },
            mode,
            path: path.to_string(),
        }
    }

    pub fn filesystem(namespace: &str, mode: AccessMode, path: impl AsRef<Path>) -> Self {
        Self {
            namespace: namespace.to_string(),
            origin: Origin::Filesystem,
            mode,
            path: path.as_ref().to_string_lossy().into_owned(),
        }
    }
}

/// Ordered list of sources. Order doubles as the namespace display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(rename = "source", default)]
    pub sources: Vec<Source>,
}

impl Catalog {
    pub fn new(sources: Vec<Source>) -> Self {
        Self { sources }
    }

    /// Upstream repositories on freedesktop.org and KDE Invent.
    pub fn online() -> Self {
        use AccessMode::{File, Tree};

        Self::new(vec![
            Source::gitlab(
                "core",
                FREEDESKTOP,
                "wayland/wayland",
                "main",
                File,
                "protocol/wayland.xml",
            ),
            Source::gitlab(
                "stable",
                FREEDESKTOP,
                "wayland/wayland-protocols",
                "main",
                Tree,
                "stable",
            ),
            Source::gitlab(
                "staging",
                FREEDESKTOP,
                "wayland/wayland-protocols",
                "main",
                Tree,
                "staging",
            ),
            Source::gitlab(
                "unstable",
                FREEDESKTOP,
                "wayland/wayland-protocols",
                "main",
                Tree,
                "unstable",
            ),
            Source::gitlab(
                "wlroots",
                FREEDESKTOP,
                "wlroots/wlr-protocols",
                "master",
                Tree,
                "unstable",
            ),
            Source::gitlab(
                "weston",
                FREEDESKTOP,
                "wayland/weston",
                "main",
                Tree,
                "protocol",
            ),
            Source::gitlab(
                "kde",
                KDE_INVENT,
                "libraries/plasma-wayland-protocols",
                "master",
                Tree,
                "src/protocols",
            ),
        ])
    }

    /// Protocols installed by distribution packages.
    pub fn offline() -> Self {
        Self::offline_under(SYSTEM_PREFIX)
    }

    /// Offline layout rooted somewhere other than `/usr/share`.
    pub fn offline_under(prefix: impl AsRef<Path>) -> Self {
        let prefix = prefix.as_ref();
        let tree = |namespace: &str, rel: &str| {
            Source::filesystem(namespace, AccessMode::Tree, prefix.join(rel))
        };

        Self::new(vec![
            tree("core", "wayland"),
            tree("stable", "wayland-protocols/stable"),
            tree("staging", "wayland-protocols/staging"),
            tree("unstable", "wayland-protocols/unstable"),
            tree("wlroots", "wlr-protocols"),
            tree("weston", "libweston*"),
            tree("kde", "plasma-wayland-protocols"),
        ])
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let catalog: Self = toml::from_str(raw)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(SourceError::InvalidCatalog("no sources defined".to_string()));
        }

        for source in &self.sources {
            if source.namespace.trim().is_empty() {
                return Err(SourceError::InvalidCatalog(format!(
                    "source for '{}' has an empty namespace",
                    source.path
                )));
            }
            if source.namespace == USER_NAMESPACE {
                return Err(SourceError::InvalidCatalog(format!(
                    "namespace '{USER_NAMESPACE}' is reserved"
                )));
            }
            if source.path.trim().is_empty() {
                return Err(SourceError::InvalidCatalog(format!(
                    "source '{}' has an empty path",
                    source.namespace
                )));
            }
        }

        Ok(())
    }

    /// Namespaces in first-seen order.
    pub fn namespaces(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for source in &self.sources {
            if !seen.contains(&source.namespace) {
                seen.push(source.namespace.clone());
            }
        }
        seen
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Source;
    type IntoIter = std::slice::Iter<'a, Source>;

    fn into_iter(self) -> Self::IntoIter {
        self.sources.iter()
    }
}
