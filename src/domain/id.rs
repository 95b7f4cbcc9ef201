//! Identifiers for documents and tools
//!
//! Both are opaque strings. A document ID is unique across the whole tree;
//! a tool ID names one column of the tutorial grid.
//!
//! Neither may be empty or contain whitespace, and neither may contain `&`
//! or `#` so they survive a trip through the navigation query string
//! without surprises. Path separators and the `.`/`..` names are rejected
//! too, since a document ID names a file under the docs directory.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid document ID: '{0}' (must be non-empty, without whitespace, '&', '#' or path separators)")]
    InvalidDocumentId(String),

    #[error("Invalid tool ID: '{0}' (must be non-empty, without whitespace, '&', '#' or path separators)")]
    InvalidToolId(String),
}

fn is_valid(s: &str) -> bool {
    !s.is_empty()
        && s != "."
        && s != ".."
        && !s
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '&' | '#' | '/' | '\\'))
}

/// Identifier of one tutorial document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    /// Returns the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DocumentId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !is_valid(s) {
            return Err(IdError::InvalidDocumentId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for DocumentId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

/// Identifier of one tool column (e.g. `stripe`, `nextjs`, `firebase`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToolId(String);

impl ToolId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ToolId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !is_valid(s) {
            return Err(IdError::InvalidToolId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for ToolId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ToolId> for String {
    fn from(id: ToolId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_document_id() {
        let id: DocumentId = "stripe-account".parse().unwrap();
        assert_eq!(id.as_str(), "stripe-account");
        assert_eq!(id.to_string(), "stripe-account");
    }

    #[test]
    fn document_id_is_trimmed() {
        let id: DocumentId = "  next-setup \n".parse().unwrap();
        assert_eq!(id.as_str(), "next-setup");
    }

    #[test]
    fn reject_invalid_document_ids() {
        assert!("".parse::<DocumentId>().is_err());
        assert!("two words".parse::<DocumentId>().is_err());
        assert!("a&b".parse::<DocumentId>().is_err());
        assert!("a#b".parse::<DocumentId>().is_err());
    }

    #[test]
    fn reject_path_like_document_ids() {
        for raw in ["../secret", "/etc/passwd", "nested/doc", "..\\secret", "..", "."] {
            assert_eq!(
                raw.parse::<DocumentId>(),
                Err(IdError::InvalidDocumentId(raw.to_string())),
                "{raw}"
            );
        }
        assert!("v1.2-notes".parse::<DocumentId>().is_ok());
        assert!("..notes".parse::<DocumentId>().is_ok());
    }

    #[test]
    fn reject_invalid_tool_id() {
        assert_eq!(
            "".parse::<ToolId>(),
            Err(IdError::InvalidToolId(String::new()))
        );
    }

    #[test]
    fn serde_roundtrip_as_plain_string() {
        let id: DocumentId = "firebase-init".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"firebase-init\"");

        let parsed: DocumentId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn serde_rejects_invalid() {
        let result: Result<DocumentId, _> = serde_json::from_str("\"has space\"");
        assert!(result.is_err());
    }
}
