//! Single-document viewer
//!
//! Renders one document and exposes the completion action. The viewer
//! always opens, even for IDs missing from the tree or without a body: the
//! title falls back and the content is empty.

use std::collections::HashMap;

use crate::domain::{CompletionSet, DocumentId, TutorialConfig};
use crate::render::{walk, CodeHeader, MarkdownRenderer, Node};
use crate::storage::{Catalog, ProgressBackend, ProgressStore};

/// Where document bodies come from
pub trait DocumentSource {
    fn document(&self, id: &DocumentId) -> Option<String>;
}

impl DocumentSource for Catalog {
    fn document(&self, id: &DocumentId) -> Option<String> {
        Catalog::document(self, id)
    }
}

impl DocumentSource for HashMap<DocumentId, String> {
    fn document(&self, id: &DocumentId) -> Option<String> {
        self.get(id).cloned()
    }
}

/// Events a viewer reports back to its owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerEvent {
    /// The document was marked complete; carries the updated set
    Completed(CompletionSet),
    Closed,
}

/// An open document
#[derive(Debug, Clone, PartialEq)]
pub struct DocViewer {
    id: DocumentId,
    title: String,
    content: Vec<Node>,
    found: bool,
}

impl DocViewer {
    /// Loads and renders a document
    pub fn open(
        id: DocumentId,
        config: &TutorialConfig,
        source: &dyn DocumentSource,
        renderer: &MarkdownRenderer,
    ) -> Self {
        let title = config.titles.get_doc_title(&id).to_string();
        let body = source.document(&id);
        let found = body.is_some();
        let content = body.map(|b| renderer.render(&b)).unwrap_or_default();

        tracing::debug!(%id, found, "opened document viewer");

        Self {
            id,
            title,
            content,
            found,
        }
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &[Node] {
        &self.content
    }

    /// Whether a document body was found
    pub fn is_found(&self) -> bool {
        self.found
    }

    pub fn is_complete(&self, completed: &CompletionSet) -> bool {
        completed.contains(&self.id)
    }

    /// Filename headers of highlighted code blocks, in document order
    pub fn code_headers(&self) -> Vec<&CodeHeader> {
        let mut headers = Vec::new();
        walk(&self.content, &mut |node| {
            if let Node::Code(code) = node {
                if let Some(header) = &code.header {
                    headers.push(header);
                }
            }
        });
        headers
    }

    /// Marks this document complete
    pub fn complete<B: ProgressBackend>(&self, store: &ProgressStore<B>) -> ViewerEvent {
        ViewerEvent::Completed(store.mark_complete(self.id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocTitleRegistry, DocTree};
    use crate::storage::MemoryBackend;
    use std::collections::BTreeMap;

    fn id(s: &str) -> DocumentId {
        s.parse().unwrap()
    }

    fn config() -> TutorialConfig {
        TutorialConfig::new(
            DocTree::new(vec![], BTreeMap::new()).unwrap(),
            [(id("intro"), "Introduction".to_string())].into_iter().collect::<DocTitleRegistry>(),
        )
    }

    fn docs() -> HashMap<DocumentId, String> {
        [(
            id("intro"),
            "# Intro\n\n```ts:a.ts\nlet a = 1;\n```\n\n```bash:b.sh\nls\n```\n".to_string(),
        )]
        .into_iter()
        .collect()
    }

    #[test]
    fn opens_known_document() {
        let viewer = DocViewer::open(id("intro"), &config(), &docs(), &MarkdownRenderer::default());

        assert_eq!(viewer.title(), "Introduction");
        assert!(viewer.is_found());
        assert_eq!(viewer.content().len(), 3);

        let files: Vec<String> = viewer.code_headers().iter().map(|h| h.filename.clone()).collect();
        assert_eq!(files, vec!["a.ts", "b.sh"]);
    }

    #[test]
    fn unknown_document_opens_shell() {
        let viewer = DocViewer::open(id("ghost"), &config(), &docs(), &MarkdownRenderer::default());

        assert_eq!(viewer.title(), crate::domain::FALLBACK_TITLE);
        assert!(!viewer.is_found());
        assert!(viewer.content().is_empty());
    }

    #[test]
    fn complete_emits_updated_set() {
        let store = ProgressStore::new(MemoryBackend::new());
        let viewer = DocViewer::open(id("intro"), &config(), &docs(), &MarkdownRenderer::default());

        let ViewerEvent::Completed(set) = viewer.complete(&store) else {
            panic!("expected completion event");
        };
        assert!(viewer.is_complete(&set));
        assert_eq!(store.get_complete_docs(), set);
    }
}
