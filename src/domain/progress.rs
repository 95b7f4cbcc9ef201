//! Completion set: which documents the learner has finished

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{DocTree, DocType, DocumentId};

/// Set of completed document IDs
///
/// Serializes as a plain JSON array of strings, sorted. IDs that no longer
/// exist in the tree are kept but never counted or displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionSet {
    ids: BTreeSet<DocumentId>,
}

impl CompletionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.ids.contains(id)
    }

    /// Adds an ID, returning true if it was not already present
    pub fn insert(&mut self, id: DocumentId) -> bool {
        self.ids.insert(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentId> {
        self.ids.iter()
    }

    /// Counts completed documents of a tutorial, ignoring stale IDs
    pub fn progress_in(&self, tree: &DocTree, doc_type: &DocType) -> Progress {
        let total: Vec<&DocumentId> = tree.documents_in(doc_type).collect();
        let completed = total.iter().filter(|id| self.contains(id)).count();
        Progress {
            completed,
            total: total.len(),
        }
    }
}

impl FromIterator<DocumentId> for CompletionSet {
    fn from_iter<T: IntoIterator<Item = DocumentId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Completed/total counts for one tutorial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Completion percentage, 0 for empty tutorials
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed * 100) / self.total) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> DocumentId {
        s.parse().unwrap()
    }

    #[test]
    fn insert_is_idempotent() {
        let mut set = CompletionSet::new();
        assert!(set.insert(id("a")));
        assert!(!set.insert(id("a")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn serializes_as_sorted_array() {
        let set: CompletionSet = [id("b"), id("a")].into_iter().collect();
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["a","b"]"#);
    }

    #[test]
    fn deserializes_with_duplicates() {
        let set: CompletionSet = serde_json::from_str(r#"["a","a","c"]"#).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&id("c")));
    }

    #[test]
    fn percent_handles_empty() {
        let progress = Progress {
            completed: 0,
            total: 0,
        };
        assert_eq!(progress.percent(), 0);

        let progress = Progress {
            completed: 1,
            total: 3,
        };
        assert_eq!(progress.percent(), 33);
    }
}
