use std::collections::HashMap;

use wlpv_protocol::Protocol;
use wlpv_sources::USER_NAMESPACE;

/// One bucket of protocols, sorted by name.
#[derive(Debug, Clone)]
pub struct Namespace {
    pub label: String,
    pub protocols: Vec<Protocol>,
}

/// A protocol together with the namespace it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct StoreEntry<'a> {
    pub namespace: &'a str,
    pub protocol: &'a Protocol,
}

/// Read-only protocol collection in display order.
#[derive(Debug, Clone, Default)]
pub struct ProtocolStore {
    namespaces: Vec<Namespace>,
}

impl ProtocolStore {
    /// Sort every namespace by protocol name (stable) and lay the namespaces out in display
    /// order: `order` first, then unlisted namespaces alphabetically, then `user`.
    pub fn new(mut map: HashMap<String, Vec<Protocol>>, order: &[String]) -> Self {
        let mut labels: Vec<String> = Vec::with_capacity(map.len());
        for label in order {
            if label != USER_NAMESPACE && map.contains_key(label) && !labels.contains(label) {
                labels.push(label.clone());
            }
        }

        let mut rest: Vec<String> = map
            .keys()
            .filter(|label| *label != USER_NAMESPACE && !labels.contains(label))
            .cloned()
            .collect();
        rest.sort();
        labels.extend(rest);

        if map.contains_key(USER_NAMESPACE) {
            labels.push(USER_NAMESPACE.to_string());
        }

        let namespaces = labels
            .into_iter()
            .filter_map(|label| {
                let mut protocols = map.remove(&label)?;
                protocols.sort_by(|a, b| a.name.cmp(&b.name));
                Some(Namespace { label, protocols })
            })
            .collect();

        Self { namespaces }
    }

    pub fn namespaces(&self) -> &[Namespace] {
        &self.namespaces
    }

    pub fn get(&self, label: &str) -> Option<&[Protocol]> {
        self.namespaces
            .iter()
            .find(|ns| ns.label == label)
            .map(|ns| ns.protocols.as_slice())
    }

    /// Every protocol, namespace by namespace in display order.
    pub fn entries(&self) -> impl Iterator<Item = StoreEntry<'_>> + '_ {
        self.namespaces.iter().flat_map(|ns| {
            ns.protocols.iter().map(move |protocol| StoreEntry {
                namespace: &ns.label,
                protocol,
            })
        })
    }

    /// Index of the first protocol called `name` in [`entries`](Self::entries) order.
    ///
    /// A name present in several namespaces resolves to the earliest namespace.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries().position(|entry| entry.protocol.name == name)
    }

    pub fn len(&self) -> usize {
        self.namespaces.iter().map(|ns| ns.protocols.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
