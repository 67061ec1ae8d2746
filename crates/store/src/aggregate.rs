use std::collections::{HashMap, HashSet};
use std::fmt;

use wlpv_protocol::{parse_protocol, Protocol};
use wlpv_sources::{RawDocument, USER_NAMESPACE};

use crate::store::ProtocolStore;

/// A system document dropped because the user named a file with the same basename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateWarning {
    pub basename: String,
    pub namespace: String,
    pub system_path: String,
}

impl fmt::Display for DuplicateWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "duplicate protocol file {}: using the added copy instead of {} ({})",
            self.basename, self.system_path, self.namespace
        )
    }
}

/// Parsed documents per namespace, before sorting.
#[derive(Debug, Default)]
pub struct Aggregate {
    pub namespaces: HashMap<String, Vec<Protocol>>,
    pub warnings: Vec<DuplicateWarning>,
}

impl Aggregate {
    /// Freeze into a store whose display order starts with `order`.
    pub fn into_store(self, order: &[String]) -> ProtocolStore {
        ProtocolStore::new(self.namespaces, order)
    }

    pub fn protocol_count(&self) -> usize {
        self.namespaces.values().map(Vec::len).sum()
    }
}

/// Drop every document of `system` whose basename also appears in `user`.
///
/// Survivors keep their relative order. Returns the removed documents in their original order.
pub fn remove_shadowed(system: &mut Vec<RawDocument>, user: &HashSet<&str>) -> Vec<RawDocument> {
    let (shadowed, kept): (Vec<RawDocument>, Vec<RawDocument>) = std::mem::take(system)
        .into_iter()
        .partition(|doc| user.contains(doc.basename()));
    *system = kept;
    shadowed
}

/// Merge fetched documents with user-supplied ones.
///
/// User documents always land in the `user` namespace. A system document sharing a basename
/// with a user document is removed and reported. Undecodable documents become blank records.
pub fn aggregate(system: HashMap<String, Vec<RawDocument>>, user: Vec<RawDocument>) -> Aggregate {
    let user_names: HashSet<&str> = user.iter().map(RawDocument::basename).collect();

    let mut labels: Vec<String> = system.keys().cloned().collect();
    labels.sort();

    let mut system = system;
    let mut result = Aggregate::default();

    for label in labels {
        let Some(mut documents) = system.remove(&label) else {
            continue;
        };

        for doc in remove_shadowed(&mut documents, &user_names) {
            let warning = DuplicateWarning {
                basename: doc.basename().to_string(),
                namespace: label.clone(),
                system_path: doc.path.clone(),
            };
            log::warn!("{warning}");
            result.warnings.push(warning);
        }

        let protocols = parse_all(&label, &documents);
        result.namespaces.insert(label, protocols);
    }

    if !user.is_empty() {
        let protocols = parse_all(USER_NAMESPACE, &user);
        result
            .namespaces
            .entry(USER_NAMESPACE.to_string())
            .or_default()
            .extend(protocols);
    }

    result
}

fn parse_all(namespace: &str, documents: &[RawDocument]) -> Vec<Protocol> {
    documents
        .iter()
        .map(|doc| {
            let protocol = parse_protocol(&doc.bytes);
            if protocol.is_blank() {
                log::debug!("{namespace}: {} decoded to an empty protocol", doc.path);
            }
            protocol
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(path: &str, name: &str) -> RawDocument {
        RawDocument::new(path, format!("<protocol name=\"{name}\"/>").into_bytes())
    }

    #[test]
    fn user_copy_wins_over_system_copy() {
        let mut system = HashMap::new();
        system.insert(
            "stable".to_string(),
            vec![
                doc("stable/xdg-shell/xdg-shell.xml", "xdg_shell_system"),
                doc("stable/viewporter/viewporter.xml", "viewporter"),
            ],
        );
        let user = vec![doc("/home/me/xdg-shell.xml", "xdg_shell_user")];

        let merged = aggregate(system, user);

        let stable: Vec<&str> = merged.namespaces["stable"]
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(stable, vec!["viewporter"]);
        assert_eq!(merged.namespaces[USER_NAMESPACE][0].name, "xdg_shell_user");
        assert_eq!(
            merged.warnings,
            vec![DuplicateWarning {
                basename: "xdg-shell.xml".to_string(),
                namespace: "stable".to_string(),
                system_path: "stable/xdg-shell/xdg-shell.xml".to_string(),
            }]
        );
    }

    #[test]
    fn removal_preserves_survivor_order() {
        let mut docs = vec![
            doc("a.xml", "a"),
            doc("dup.xml", "dup"),
            doc("b.xml", "b"),
            doc("c.xml", "c"),
        ];
        let user: HashSet<&str> = ["dup.xml"].into_iter().collect();

        let removed = remove_shadowed(&mut docs, &user);

        let kept: Vec<&str> = docs.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(kept, vec!["a.xml", "b.xml", "c.xml"]);
        assert_eq!(removed.len(), 1);
    }

    #[test]
    fn malformed_documents_become_blank_records() {
        let mut system = HashMap::new();
        system.insert(
            "core".to_string(),
            vec![
                RawDocument::new("broken.xml", b"<protocol".to_vec()),
                doc("wayland.xml", "wayland"),
            ],
        );

        let merged = aggregate(system, Vec::new());

        let core = &merged.namespaces["core"];
        assert_eq!(core.len(), 2);
        assert!(core[0].is_blank());
        assert_eq!(core[1].name, "wayland");
        assert!(!merged.namespaces.contains_key(USER_NAMESPACE));
    }

    #[test]
    fn user_documents_are_never_dropped() {
        let user = vec![doc("one.xml", "one"), doc("elsewhere/one.xml", "one_again")];

        let merged = aggregate(HashMap::new(), user);

        assert_eq!(merged.namespaces[USER_NAMESPACE].len(), 2);
        assert!(merged.warnings.is_empty());
        assert_eq!(merged.protocol_count(), 2);
    }
}
