//! Topic names and the locally persisted subscription set.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A validated topic name.
///
/// Accepted names are non-empty and consist only of ASCII letters, digits,
/// `-`, `_` and `.`. Every such name percent-encodes to itself, but `.` and
/// `..` are still dot segments and cannot be addressed in a request path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    /// Validates and wraps a topic name.
    pub fn parse(name: &str) -> Result<Self> {
        if Self::is_valid(name) {
            Ok(Self(name.to_string()))
        } else {
            Err(Error::InvalidTopic(name.to_string()))
        }
    }

    /// Returns true if `name` is an acceptable topic name.
    #[must_use]
    pub fn is_valid(name: &str) -> bool {
        !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    }

    /// Returns the topic name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the topic, returning the name.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Topic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Topic {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Topic::parse(&name).map_err(serde::de::Error::custom)
    }
}

/// The set of topics this device believes it is subscribed to.
///
/// Set semantics: inserting an existing topic is a no-op. Backed by a sorted
/// set so the persisted form is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicSet(BTreeSet<String>);

impl TopicSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a topic. Returns false if it was already present.
    pub fn insert(&mut self, topic: impl Into<String>) -> bool {
        self.0.insert(topic.into())
    }

    /// Removes a topic. Returns false if it was not present.
    pub fn remove(&mut self, topic: &str) -> bool {
        self.0.remove(topic)
    }

    /// Whether the topic is in the set.
    #[must_use]
    pub fn contains(&self, topic: &str) -> bool {
        self.0.contains(topic)
    }

    /// Number of topics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates topics in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Serializes to the JSON array used for persistence.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses the persisted JSON array form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<S: Into<String>> FromIterator<S> for TopicSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for TopicSet {
    type Item = String;
    type IntoIter = std::collections::btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
