//! Throwaway inverted index backing the `search` operation

use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

/// Token → positions of the records containing it
#[derive(Debug, Default, Clone)]
pub struct TextIndex {
    postings: HashMap<String, BTreeSet<usize>>,
}

impl TextIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the text of `value` under `id`
    ///
    /// Strings are indexed as-is, numbers and booleans by their display
    /// form, arrays and objects by their leaves.
    pub fn add(&mut self, id: usize, value: &Value) {
        let mut text = String::new();
        collect_text(value, &mut text);
        for token in tokenize(&text) {
            self.postings.entry(token).or_default().insert(id);
        }
    }

    /// Ids whose text contains every token of `query`
    pub fn search(&self, query: &str) -> BTreeSet<usize> {
        let mut terms = tokenize(query).into_iter();
        let Some(first) = terms.next() else {
            return BTreeSet::new();
        };

        let mut hits = self.postings.get(&first).cloned().unwrap_or_default();
        for term in terms {
            if hits.is_empty() {
                break;
            }
            match self.postings.get(&term) {
                Some(ids) => hits = hits.intersection(ids).copied().collect(),
                None => hits.clear(),
            }
        }
        hits
    }

    /// Number of distinct tokens
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

/// Lowercased runs of alphanumeric characters
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn collect_text(value: &Value, out: &mut String) {
    match value {
        Value::Null => {}
        Value::String(s) => push_word(out, s),
        Value::Number(n) => push_word(out, &n.to_string()),
        Value::Bool(b) => push_word(out, &b.to_string()),
        Value::Array(items) => items.iter().for_each(|item| collect_text(item, out)),
        Value::Object(map) => map.values().for_each(|item| collect_text(item, out)),
    }
}

fn push_word(out: &mut String, word: &str) {
    if !out.is_empty() {
        out.push(' ');
    }
    out.push_str(word);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("Apple-pie, BANANA bread!"),
            vec!["apple", "pie", "banana", "bread"]
        );
        assert!(tokenize("  ...  ").is_empty());
    }

    #[test]
    fn test_search_intersects_terms() {
        let mut index = TextIndex::new();
        index.add(0, &json!("apple pie"));
        index.add(1, &json!("banana bread"));
        index.add(2, &json!("apple tart"));

        assert_eq!(index.search("apple"), BTreeSet::from([0, 2]));
        assert_eq!(index.search("Apple Tart"), BTreeSet::from([2]));
        assert_eq!(index.search("apple bread"), BTreeSet::new());
        assert_eq!(index.search(""), BTreeSet::new());
    }

    #[test]
    fn test_non_string_values() {
        let mut index = TextIndex::new();
        index.add(0, &json!(["rust", "cli"]));
        index.add(1, &json!({ "version": 2 }));
        index.add(2, &Value::Null);

        assert_eq!(index.search("cli"), BTreeSet::from([0]));
        assert_eq!(index.search("2"), BTreeSet::from([1]));
        assert_eq!(index.len(), 3);
    }
}
