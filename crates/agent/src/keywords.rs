//! Keyword sets
//!
//! Interest and purchase-intent detection is plain case-insensitive substring
//! matching against curated lists held as data.

use serde::{Deserialize, Serialize};

/// A named, lower-cased list of keywords
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordSet {
    name: String,
    keywords: Vec<String>,
}

impl KeywordSet {
    /// Build a set, normalizing to lowercase and dropping blanks and duplicates
    pub fn new<I, S>(name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if !keyword.is_empty() && !normalized.contains(&keyword) {
                normalized.push(keyword);
            }
        }

        Self {
            name: name.into(),
            keywords: normalized,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Whether any keyword occurs in `text`
    pub fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }

    /// Keywords found in `text`, in set order
    pub fn matched(&self, text: &str) -> Vec<&str> {
        let text = text.to_lowercase();
        self.keywords
            .iter()
            .filter(|k| text.contains(k.as_str()))
            .map(String::as_str)
            .collect()
    }
}
