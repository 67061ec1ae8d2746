use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use wlpv_sources::{fetch_all, AccessMode, Catalog, Fetcher, RawDocument, Source, SourceError};
use wlpv_store::{aggregate, USER_NAMESPACE};

/// In-memory stand-in for GitLab: one single-file project, one tree, one dead host.
struct FakeForge;

#[async_trait]
impl Fetcher for FakeForge {
    async fn list(&self, source: &Source) -> wlpv_sources::Result<Vec<String>> {
        match source.namespace.as_str() {
            "stable" => Ok(vec!["stable/a.xml".to_string(), "stable/b.xml".to_string()]),
            _ => Err(SourceError::NoMatch(source.path.clone())),
        }
    }

    async fn fetch(&self, source: &Source, path: &str) -> wlpv_sources::Result<Vec<u8>> {
        let name = match (source.namespace.as_str(), path) {
            ("wlroots", "protocol/demo.xml") => "wl_demo",
            ("stable", "stable/a.xml") => "alpha",
            ("stable", "stable/b.xml") => "beta",
            _ => return Err(SourceError::NoMatch(path.to_string())),
        };
        Ok(format!("<protocol name=\"{name}\"><copyright>test</copyright></protocol>").into_bytes())
    }
}

fn catalog() -> Catalog {
    let host = "https://forge.invalid";
    Catalog::new(vec![
        Source::gitlab("stable", host, "w/p", "main", AccessMode::Tree, "stable"),
        Source::gitlab("wlroots", host, "w/r", "main", AccessMode::File, "protocol/demo.xml"),
        Source::gitlab("kde", host, "k/p", "master", AccessMode::Tree, "src/protocols"),
    ])
}

#[tokio::test]
async fn failing_source_leaves_siblings_intact() {
    let catalog = catalog();
    let outcome = fetch_all(Arc::new(FakeForge), &catalog).await.expect("fetch");

    let mut populated: Vec<&str> = outcome.documents.keys().map(String::as_str).collect();
    populated.sort();
    assert_eq!(populated, vec!["stable", "wlroots"]);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].namespace, "kde");

    let store = aggregate(outcome.documents, Vec::new()).into_store(&catalog.namespaces());

    let listing: Vec<(&str, &str)> = store
        .entries()
        .map(|e| (e.namespace, e.protocol.name.as_str()))
        .collect();
    assert_eq!(
        listing,
        vec![
            ("stable", "alpha"),
            ("stable", "beta"),
            ("wlroots", "wl_demo"),
        ]
    );
    assert!(store.get("kde").is_none());
}

#[tokio::test]
async fn added_file_replaces_fetched_copy() {
    let catalog = catalog();
    let outcome = fetch_all(Arc::new(FakeForge), &catalog).await.expect("fetch");

    let user = vec![RawDocument::new(
        "/home/me/protocols/a.xml",
        b"<protocol name=\"alpha_local\"/>".to_vec(),
    )];
    let merged = aggregate(outcome.documents, user);
    assert_eq!(merged.warnings.len(), 1);
    assert_eq!(merged.warnings[0].basename, "a.xml");

    let store = merged.into_store(&catalog.namespaces());

    let stable: Vec<&str> = store
        .get("stable")
        .unwrap()
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(stable, vec!["beta"]);

    let user: Vec<&str> = store
        .get(USER_NAMESPACE)
        .unwrap()
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(user, vec!["alpha_local"]);
    assert_eq!(store.position("alpha_local"), Some(2));
}
