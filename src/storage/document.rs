//! Persisted preference document
//!
//! Five parallel maps keyed by Discord user id. Absence of a key is a distinct
//! state from an empty or `false` value; defaults are resolved at read time by
//! the preference repository.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The durable root of everything the bot remembers about its users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceDocument {
    #[serde(default)]
    pub nicknames: BTreeMap<String, String>,
    #[serde(default, rename = "greeting_prefs")]
    pub greeting: BTreeMap<String, bool>,
    #[serde(default, rename = "silent_prefs")]
    pub silent: BTreeMap<String, bool>,
    #[serde(default)]
    pub memos: BTreeMap<String, MemoBook>,
    #[serde(default, rename = "model_prefs")]
    pub models: BTreeMap<String, String>,
}

impl PreferenceDocument {
    /// Drop entries keyed by an empty user id or memo keyword.
    ///
    /// Returns how many entries were removed.
    pub fn sanitize(&mut self) -> usize {
        let before = self.entry_count();

        self.nicknames.retain(|user, _| !user.is_empty());
        self.greeting.retain(|user, _| !user.is_empty());
        self.silent.retain(|user, _| !user.is_empty());
        self.models.retain(|user, _| !user.is_empty());
        self.memos.retain(|user, _| !user.is_empty());
        for book in self.memos.values_mut() {
            book.entries.retain(|keyword, _| !keyword.is_empty());
        }

        before - self.entry_count()
    }

    /// Remove every attribute stored for one user
    pub fn remove_user(&mut self, user_id: &str) {
        self.nicknames.remove(user_id);
        self.greeting.remove(user_id);
        self.silent.remove(user_id);
        self.memos.remove(user_id);
        self.models.remove(user_id);
    }

    pub fn clear(&mut self) {
        self.nicknames.clear();
        self.greeting.clear();
        self.silent.clear();
        self.memos.clear();
        self.models.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }

    fn entry_count(&self) -> usize {
        self.nicknames.len()
            + self.greeting.len()
            + self.silent.len()
            + self.models.len()
            + self.memos.len()
            + self.memos.values().map(MemoBook::len).sum::<usize>()
    }
}

/// One user's memos, kept in first-insertion order.
///
/// Serialized as a JSON object whose key order is the insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoBook {
    entries: IndexMap<String, String>,
}

impl MemoBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a memo. An overwritten keyword keeps its position.
    ///
    /// Returns `true` when an existing memo was replaced.
    pub fn upsert(&mut self, keyword: &str, content: &str) -> bool {
        self.entries
            .insert(keyword.to_string(), content.to_string())
            .is_some()
    }

    pub fn get(&self, keyword: &str) -> Option<&str> {
        self.entries.get(keyword).map(String::as_str)
    }

    /// Returns `true` if the keyword was present. Remaining memos keep their order.
    pub fn remove(&mut self, keyword: &str) -> bool {
        self.entries.shift_remove(keyword).is_some()
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_document_is_empty() {
        let doc = PreferenceDocument::default();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_persisted_key_names() {
        let mut doc = PreferenceDocument::default();
        doc.greeting.insert("1".to_string(), true);
        let value = serde_json::to_value(&doc).unwrap();
        let object = value.as_object().unwrap();

        for key in ["nicknames", "greeting_prefs", "silent_prefs", "memos", "model_prefs"] {
            assert!(object.contains_key(key), "missing key {key}");
        }
        assert_eq!(object.len(), 5);
    }

    #[test]
    fn test_missing_and_unknown_keys_tolerated() {
        let doc: PreferenceDocument =
            serde_json::from_str(r#"{"nicknames": {"1": "Aki"}, "legacy": 42}"#).unwrap();
        assert_eq!(doc.nicknames.get("1").map(String::as_str), Some("Aki"));
        assert!(doc.memos.is_empty());
        assert!(doc.models.is_empty());
    }

    #[test]
    fn test_memo_upsert_keeps_position() {
        let mut book = MemoBook::new();
        assert!(!book.upsert("b", "1"));
        assert!(!book.upsert("a", "2"));
        assert!(book.upsert("b", "3"));

        assert_eq!(book.keywords().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(book.get("b"), Some("3"));
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_memo_remove_reports_presence() {
        let mut book = MemoBook::new();
        book.upsert("k", "v");
        assert!(book.remove("k"));
        assert!(!book.remove("k"));
        assert!(book.is_empty());
    }

    #[test]
    fn test_memo_remove_keeps_remaining_order() {
        let mut book = MemoBook::new();
        for keyword in ["a", "b", "c", "d"] {
            book.upsert(keyword, "v");
        }
        assert!(book.remove("b"));
        assert_eq!(book.keywords().collect::<Vec<_>>(), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_memo_order_survives_json() {
        let json = r#"{"zeta": "1", "alpha": "2", "mid": "3"}"#;
        let book: MemoBook = serde_json::from_str(json).unwrap();
        assert_eq!(
            book.keywords().collect::<Vec<_>>(),
            vec!["zeta", "alpha", "mid"]
        );

        let encoded = serde_json::to_string(&book).unwrap();
        assert_eq!(encoded, r#"{"zeta":"1","alpha":"2","mid":"3"}"#);
    }

    #[test]
    fn test_duplicate_memo_keys_last_wins() {
        let book: MemoBook = serde_json::from_str(r#"{"k": "old", "x": "1", "k": "new"}"#).unwrap();
        assert_eq!(book.get("k"), Some("new"));
        assert_eq!(book.keywords().collect::<Vec<_>>(), vec!["k", "x"]);
    }

    #[test]
    fn test_sanitize_drops_empty_ids() {
        let mut doc: PreferenceDocument = serde_json::from_str(
            r#"{
                "nicknames": {"": "ghost", "1": "Aki"},
                "greeting_prefs": {"": true},
                "memos": {"1": {"": "blank", "k": "v"}}
            }"#,
        )
        .unwrap();

        assert_eq!(doc.sanitize(), 3);
        assert_eq!(doc.nicknames.len(), 1);
        assert!(doc.greeting.is_empty());
        assert_eq!(doc.memos["1"].keywords().collect::<Vec<_>>(), vec!["k"]);
    }

    #[test]
    fn test_remove_user_leaves_others() {
        let mut doc = PreferenceDocument::default();
        for user in ["1", "2"] {
            doc.nicknames.insert(user.to_string(), format!("n{user}"));
            doc.silent.insert(user.to_string(), true);
            doc.memos.entry(user.to_string()).or_default().upsert("k", "v");
        }

        doc.remove_user("1");
        assert!(!doc.nicknames.contains_key("1"));
        assert!(!doc.memos.contains_key("1"));
        assert!(doc.silent.contains_key("2"));
    }
}
