use std::collections::HashMap;

use crate::model::MapEntry;

/// identifier -> source_ref lookup over the map source.
///
/// Built once, read many times. Keys are stored uppercased, so lookups must
/// use the canonical form. A repeated identifier keeps the last `source_ref`
/// seen.
#[derive(Debug, Clone, Default)]
pub struct IdentifierIndex {
    refs: HashMap<String, String>,
    overwritten: usize,
}

impl IdentifierIndex {
    pub fn build(entries: &[MapEntry]) -> Self {
        let mut refs = HashMap::with_capacity(entries.len());
        let mut overwritten = 0;

        for entry in entries {
            let key = entry.identifier.trim().to_uppercase();
            if let Some(previous) = refs.insert(key, entry.source_ref.clone()) {
                if previous != entry.source_ref {
                    tracing::debug!(
                        identifier = %entry.identifier,
                        previous = %previous,
                        current = %entry.source_ref,
                        "duplicate identifier in map source, keeping last"
                    );
                }
                overwritten += 1;
            }
        }

        Self { refs, overwritten }
    }

    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.refs.get(identifier).map(String::as_str)
    }

    /// Distinct identifiers.
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Entries that replaced an earlier one with the same identifier.
    pub fn overwritten(&self) -> usize {
        self.overwritten
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, source_ref: &str) -> MapEntry {
        MapEntry {
            identifier: id.into(),
            source_ref: source_ref.into(),
        }
    }

    #[test]
    fn lookup_hits_and_misses() {
        let index = IdentifierIndex::build(&[entry("Q1", "node/5"), entry("Q2", "way/7")]);
        assert_eq!(index.get("Q1"), Some("node/5"));
        assert_eq!(index.get("Q2"), Some("way/7"));
        assert_eq!(index.get("Q3"), None);
        assert_eq!(index.len(), 2);
        assert_eq!(index.overwritten(), 0);
    }

    #[test]
    fn last_write_wins() {
        let index = IdentifierIndex::build(&[
            entry("Q1", "node/5"),
            entry("Q1", "way/9"),
            entry("Q1", "relation/2"),
        ]);
        assert_eq!(index.get("Q1"), Some("relation/2"));
        assert_eq!(index.len(), 1);
        assert_eq!(index.overwritten(), 2);
    }

    #[test]
    fn keys_are_canonical() {
        let index = IdentifierIndex::build(&[entry(" q7 ", "node/1"), entry("Q7", "way/2")]);
        assert_eq!(index.get("Q7"), Some("way/2"));
        assert_eq!(index.len(), 1);
        assert_eq!(index.overwritten(), 1);
    }

    #[test]
    fn empty_index() {
        let index = IdentifierIndex::build(&[]);
        assert!(index.is_empty());
        assert_eq!(index.get("Q1"), None);
    }
}
