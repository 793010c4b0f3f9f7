//! Node identifiers
//!
//! A node id is an opaque, author-chosen string (usually kebab-case, e.g.
//! `d1-start`). It doubles as the key in the dataset's node map, as the
//! target of an answer option and as the shareable locator fragment.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Node ID must not be empty")]
    Empty,

    #[error("Node ID must not contain whitespace: '{0}'")]
    ContainsWhitespace(String),
}

/// Identifier of a node in a decision graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Wraps a raw id without validation.
    ///
    /// Datasets are authored by hand, so ids coming out of a dataset are
    /// taken as-is; use [`str::parse`] for ids typed by a user.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the empty id
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NodeId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(IdError::Empty);
        }
        if s.chars().any(char::is_whitespace) {
            return Err(IdError::ContainsWhitespace(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trimmed_ids() {
        let id: NodeId = "  d1-start ".parse().unwrap();
        assert_eq!(id.as_str(), "d1-start");
    }

    #[test]
    fn rejects_empty_ids() {
        assert_eq!("".parse::<NodeId>(), Err(IdError::Empty));
        assert_eq!("   ".parse::<NodeId>(), Err(IdError::Empty));
    }

    #[test]
    fn rejects_inner_whitespace() {
        assert!(matches!(
            "two words".parse::<NodeId>(),
            Err(IdError::ContainsWhitespace(_))
        ));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = NodeId::new("end");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"end\"");

        let back: NodeId = serde_json::from_str("\"end\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn compares_with_str() {
        let id = NodeId::new("start");
        assert_eq!(id, "start");
        assert_eq!(id.to_string(), "start");
    }
}
