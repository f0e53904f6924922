//! Identifier extraction and canonicalization.
//!
//! Canonical form is an uppercase `Q` followed by digits, e.g. `Q42`. Map tags
//! are scanned for every such token; reference cells are taken at face value
//! after stripping a URL prefix.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::{MatchingConfig, TagMatchMode};
use crate::model::{MapElement, MapEntry};

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)q[0-9]+").expect("identifier pattern is valid"))
}

/// Every identifier in a map tag value, uppercased, in order of appearance.
///
/// Multi-value tags (`Q42;Q7`) yield all of their identifiers.
pub fn extract_tag_identifiers(value: &str) -> Vec<String> {
    identifier_pattern()
        .find_iter(value)
        .map(|m| m.as_str().to_ascii_uppercase())
        .collect()
}

/// Canonicalize a reference-source identifier cell.
///
/// Accepts a bare id or an entity URL; keeps what follows the last `/`.
/// No validation: garbage comes out uppercased and simply never matches.
pub fn normalize_reference_identifier(raw: &str) -> String {
    let tail = match raw.rfind('/') {
        Some(pos) => &raw[pos + 1..],
        None => raw,
    };
    tail.trim().to_uppercase()
}

/// Decides which tag keys carry identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagKeyFilter {
    mode: TagMatchMode,
    marker: String,
}

impl TagKeyFilter {
    pub fn new(mode: TagMatchMode, marker: impl Into<String>) -> Self {
        Self {
            mode,
            marker: marker.into(),
        }
    }

    pub fn from_config(config: &MatchingConfig) -> Self {
        Self::new(config.tag_match_mode, config.tag_marker.clone())
    }

    pub fn mode(&self) -> TagMatchMode {
        self.mode
    }

    pub fn matches(&self, key: &str) -> bool {
        match self.mode {
            TagMatchMode::Suffix => key.ends_with(&self.marker),
            TagMatchMode::Contains => key.contains(&self.marker),
        }
    }
}

impl Default for TagKeyFilter {
    fn default() -> Self {
        Self::from_config(&MatchingConfig::default())
    }
}

/// All map entries one element contributes, in tag-key order.
pub fn map_entries_from_element(element: &MapElement, filter: &TagKeyFilter) -> Vec<MapEntry> {
    let source_ref = element.source_ref();

    element
        .tags
        .iter()
        .filter(|(key, _)| filter.matches(key))
        .flat_map(|(_, value)| extract_tag_identifiers(value))
        .map(|identifier| MapEntry {
            identifier,
            source_ref: source_ref.clone(),
        })
        .collect()
}

/// Map entries for a whole map source, preserving element order.
pub fn map_entries<'a, I>(elements: I, filter: &TagKeyFilter) -> Vec<MapEntry>
where
    I: IntoIterator<Item = &'a MapElement>,
{
    elements
        .into_iter()
        .flat_map(|element| map_entries_from_element(element, filter))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn element(kind: &str, id: i64, tags: &[(&str, &str)]) -> MapElement {
        MapElement {
            kind: kind.into(),
            id,
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn extracts_all_identifiers_from_multi_value_tag() {
        assert_eq!(extract_tag_identifiers("Q42;q7"), vec!["Q42", "Q7"]);
    }

    #[test]
    fn extract_ignores_noise() {
        assert_eq!(extract_tag_identifiers("see Q12 and Q"), vec!["Q12"]);
        assert!(extract_tag_identifiers("").is_empty());
        assert!(extract_tag_identifiers("no ids here").is_empty());
    }

    #[test]
    fn extract_only_takes_ascii_digits() {
        // Arabic-Indic digits
        assert!(extract_tag_identifiers("Q\u{0664}\u{0662}").is_empty());
        assert_eq!(extract_tag_identifiers("Q4\u{0662}"), vec!["Q4"]);
    }

    #[test]
    fn normalizes_entity_url() {
        assert_eq!(
            normalize_reference_identifier("http://example.org/entity/Q99"),
            "Q99"
        );
        assert_eq!(
            normalize_reference_identifier("http://www.wikidata.org/entity/q123"),
            "Q123"
        );
    }

    #[test]
    fn normalizes_bare_identifier() {
        assert_eq!(normalize_reference_identifier("q99"), "Q99");
        assert_eq!(normalize_reference_identifier(" Q5 "), "Q5");
    }

    #[test]
    fn malformed_reference_passes_through_uppercased() {
        assert_eq!(normalize_reference_identifier("abc-1"), "ABC-1");
        assert_eq!(normalize_reference_identifier("http://x/"), "");
    }

    #[test]
    fn suffix_mode_matches_key_endings() {
        let filter = TagKeyFilter::new(TagMatchMode::Suffix, "wikidata");
        assert!(filter.matches("wikidata"));
        assert!(filter.matches("ref:wikidata"));
        assert!(filter.matches("brand:wikidata"));
        assert!(!filter.matches("wikidata:note"));
        assert!(!filter.matches("name"));
    }

    #[test]
    fn contains_mode_matches_anywhere() {
        let filter = TagKeyFilter::new(TagMatchMode::Contains, "wikidata");
        assert!(filter.matches("wikidata:note"));
        assert!(filter.matches("subject:wikidata"));
        assert!(!filter.matches("wikipedia"));
    }

    #[test]
    fn element_with_suffix_key_yields_entries() {
        let el = element("node", 5, &[("ref:wikidata", "Q42;q7"), ("name", "Q1 Tower")]);
        let entries = map_entries_from_element(&el, &TagKeyFilter::default());
        assert_eq!(
            entries,
            vec![
                MapEntry { identifier: "Q42".into(), source_ref: "node/5".into() },
                MapEntry { identifier: "Q7".into(), source_ref: "node/5".into() },
            ]
        );
    }

    #[test]
    fn element_without_identifier_tags_yields_nothing() {
        let el = element("way", 9, &[("name", "Q1 Tower"), ("wikipedia", "de:Turm")]);
        assert!(map_entries_from_element(&el, &TagKeyFilter::default()).is_empty());
    }

    #[test]
    fn mode_changes_which_keys_count() {
        let el = element("relation", 3, &[("wikidata:old", "Q8")]);
        let suffix = TagKeyFilter::new(TagMatchMode::Suffix, "wikidata");
        let contains = TagKeyFilter::new(TagMatchMode::Contains, "wikidata");
        assert!(map_entries_from_element(&el, &suffix).is_empty());
        assert_eq!(map_entries_from_element(&el, &contains)[0].source_ref, "relation/3");
    }

    #[test]
    fn map_entries_preserves_element_order() {
        let els = vec![
            element("node", 1, &[("wikidata", "Q1")]),
            element("node", 2, &[("wikidata", "Q2")]),
        ];
        let entries = map_entries(&els, &TagKeyFilter::default());
        let ids: Vec<_> = entries.iter().map(|e| e.identifier.as_str()).collect();
        assert_eq!(ids, vec!["Q1", "Q2"]);
    }
}
