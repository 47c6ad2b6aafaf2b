use std::collections::HashMap;

use crate::QuestionId;

/// Answers being filled in, keyed by question.
///
/// Values are the raw strings the user typed or picked. A missing key reads as
/// the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers {
    values: HashMap<QuestionId, String>,
}

impl Answers {
    /// Create a new empty answer set.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Set the raw value for a question.
    pub fn insert(&mut self, id: impl Into<QuestionId>, value: impl Into<String>) {
        self.values.insert(id.into(), value.into());
    }

    /// Builder form of [`Answers::insert`].
    pub fn with(mut self, id: impl Into<QuestionId>, value: impl Into<String>) -> Self {
        self.insert(id, value);
        self
    }

    /// Get the raw value for a question; absent answers are empty.
    pub fn get(&self, id: &QuestionId) -> &str {
        self.values.get(id).map(String::as_str).unwrap_or("")
    }

    /// Check if a value was ever set for the question (even an empty one).
    pub fn contains(&self, id: &QuestionId) -> bool {
        self.values.contains_key(id)
    }

    /// Check if the question has a non-empty raw value.
    pub fn has_value(&self, id: &QuestionId) -> bool {
        !self.get(id).is_empty()
    }

    /// Get an iterator over all id-value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &str)> {
        self.values.iter().map(|(id, value)| (id, value.as_str()))
    }

    /// Get the entries sorted by question id, for stable output.
    pub fn sorted(&self) -> Vec<(&QuestionId, &str)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Answers
where
    K: Into<QuestionId>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(id, value)| (id.into(), value.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Answers {
    type Item = (&'a QuestionId, &'a String);
    type IntoIter = std::collections::hash_map::Iter<'a, QuestionId, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Validation messages keyed by question.
///
/// Only questions that currently fail validation have an entry; a question
/// without an entry is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: HashMap<QuestionId, String>,
}

impl FieldErrors {
    /// Create an empty error map.
    pub fn new() -> Self {
        Self {
            errors: HashMap::new(),
        }
    }

    /// Record the outcome of validating one question; `None` clears its entry.
    pub fn set(&mut self, id: impl Into<QuestionId>, error: Option<String>) {
        let id = id.into();
        match error {
            Some(message) => {
                self.errors.insert(id, message);
            }
            None => {
                self.errors.remove(&id);
            }
        }
    }

    /// Get the message for a question, if it is invalid.
    pub fn get(&self, id: &QuestionId) -> Option<&str> {
        self.errors.get(id).map(String::as_str)
    }

    /// Check if any question is invalid.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get an iterator over all id-message pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &str)> {
        self.errors.iter().map(|(id, message)| (id, message.as_str()))
    }

    /// Get the number of invalid questions.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Check if there are no errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}
