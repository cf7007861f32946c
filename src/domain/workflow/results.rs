//! Accumulated step outputs, keyed by step id

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Insertion-ordered mapping from step id to the step's serialized output
///
/// Values are strings because they are substituted textually into later
/// parameter templates and rendered for the solver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultMap {
    entries: IndexMap<String, String>,
}

impl ResultMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a step output. Re-using a step id replaces the value and keeps
    /// the entry at its original position.
    pub fn insert(&mut self, step_id: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(step_id.into(), value.into());
    }

    pub fn get(&self, step_id: &str) -> Option<&str> {
        self.entries.get(step_id).map(String::as_str)
    }

    pub fn contains(&self, step_id: &str) -> bool {
        self.entries.contains_key(step_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry under the most recently inserted key
    pub fn last_inserted(&self) -> Option<(&str, &str)> {
        self.entries
            .last()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ResultMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_kept() {
        let mut results = ResultMap::new();
        results.insert("#E2", "b");
        results.insert("#E1", "a");

        let keys: Vec<_> = results.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["#E2", "#E1"]);
        assert_eq!(results.last_inserted(), Some(("#E1", "a")));
    }

    #[test]
    fn test_duplicate_key_overwrites_in_place() {
        let mut results = ResultMap::new();
        results.insert("#E1", "first");
        results.insert("#E2", "second");
        results.insert("#E1", "third");

        assert_eq!(results.len(), 2);
        assert_eq!(results.get("#E1"), Some("third"));
        assert_eq!(results.last_inserted(), Some(("#E2", "second")));
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let results: ResultMap = [("#E1", "\"u-42\""), ("#E2", "7")].into_iter().collect();
        let json = serde_json::to_string(&results).unwrap();

        assert_eq!(json, r##"{"#E1":"\"u-42\"","#E2":"7"}"##);

        let back: ResultMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, results);
    }

    #[test]
    fn test_empty_map() {
        let results = ResultMap::new();
        assert!(results.is_empty());
        assert!(results.last_inserted().is_none());
        assert!(!results.contains("#E1"));
    }
}
