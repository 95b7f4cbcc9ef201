//! Display titles for documents

use std::collections::HashMap;

use super::DocumentId;

/// Title returned for documents missing from the registry
pub const FALLBACK_TITLE: &str = "Untitled document";

/// Static mapping from document ID to display title
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocTitleRegistry {
    titles: HashMap<DocumentId, String>,
}

impl DocTitleRegistry {
    pub fn new(titles: HashMap<DocumentId, String>) -> Self {
        Self { titles }
    }

    /// Returns the registered title, or [`FALLBACK_TITLE`] for unknown IDs
    pub fn get_doc_title(&self, id: &DocumentId) -> &str {
        self.titles
            .get(id)
            .map(String::as_str)
            .unwrap_or(FALLBACK_TITLE)
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.titles.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

impl FromIterator<(DocumentId, String)> for DocTitleRegistry {
    fn from_iter<T: IntoIterator<Item = (DocumentId, String)>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
