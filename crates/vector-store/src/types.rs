use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A metadata value: a closed set of scalar types.
///
/// Callers may attach arbitrary keys, but values are restricted to strings,
/// numbers, and booleans so persisted snapshots round-trip without silent
/// type coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Number(f64),
    Str(String),
}

impl MetadataValue {
    /// Borrow the string value, if this is a string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value, if this is a number
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<usize> for MetadataValue {
    fn from(value: usize) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Open string-keyed metadata mapping
pub type Metadata = BTreeMap<String, MetadataValue>;

/// Conjunction of exact metadata-field equalities.
///
/// An entry matches when every filter field is present in its metadata with
/// an equal value. The empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataFilter {
    fields: Metadata,
}

impl MetadataFilter {
    /// Create an empty filter
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: require `key == value`
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Check whether `metadata` satisfies every required equality
    #[must_use]
    pub fn matches(&self, metadata: &Metadata) -> bool {
        self.fields
            .iter()
            .all(|(key, value)| metadata.get(key) == Some(value))
    }

    /// Number of required equalities
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no equality is required
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One indexed chunk: the text, its metadata snapshot, and its embedding.
///
/// The backend exclusively owns the vector and the metadata snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub content: String,
    pub metadata: Metadata,
    pub vector: Vec<f32>,
}

/// One ranked search hit.
///
/// `score` is cosine similarity in `[-1, 1]`; higher is better.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub content: String,
    pub metadata: Metadata,
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(pairs: &[(&str, MetadataValue)]) -> Metadata {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = MetadataFilter::new();
        assert!(filter.matches(&Metadata::new()));
        assert!(filter.matches(&meta(&[("doc_id", "a".into())])));
    }

    #[test]
    fn test_filter_requires_all_fields() {
        let filter = MetadataFilter::new()
            .with("doc_id", "a")
            .with("chunk_id", 0usize);
        assert!(filter.matches(&meta(&[("doc_id", "a".into()), ("chunk_id", 0usize.into())])));
        assert!(!filter.matches(&meta(&[("doc_id", "a".into())])));
        assert!(!filter.matches(&meta(&[("doc_id", "b".into()), ("chunk_id", 0usize.into())])));
    }

    #[test]
    fn test_filter_is_exact_on_type() {
        let filter = MetadataFilter::new().with("flag", true);
        assert!(!filter.matches(&meta(&[("flag", "true".into())])));
        assert!(filter.matches(&meta(&[("flag", true.into())])));
    }

    #[test]
    fn test_metadata_value_roundtrip_json() {
        let metadata = meta(&[
            ("name", "doc".into()),
            ("chunk_id", 3usize.into()),
            ("draft", false.into()),
        ]);
        let json = serde_json::to_string(&metadata).unwrap();
        let back: Metadata = serde_json::from_str(&json).unwrap();
        assert_eq!(metadata, back);
    }
}
