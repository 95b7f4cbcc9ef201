//! Step x tool grid and navigation state
//!
//! ```text
//!            select(id) / ?id=x
//!   Idle ─────────────────────────▶ DocOpen(id)
//!    ▲                                  │
//!    └──────── close() / complete ──────┘
//! ```
//!
//! The orchestrator owns the in-memory completion set used for checkmarks.
//! It is loaded once at construction and replaced with whatever the viewer
//! reports on completion, so the grid refreshes without another read.

use serde::Serialize;

use crate::domain::{CompletionSet, DocType, DocumentId, Progress, Tool, ToolId, Tutorial, TutorialConfig};
use crate::render::MarkdownRenderer;
use crate::storage::{ProgressBackend, ProgressStore};

use super::route;
use super::viewer::{DocViewer, DocumentSource, ViewerEvent};

/// Navigation state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NavState {
    #[default]
    Idle,
    DocOpen(DocumentId),
}

/// One document link in a grid cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocLink {
    pub id: DocumentId,
    pub title: String,
    /// Filled indicator when true, dimmed otherwise
    pub complete: bool,
    /// Query string that opens this document
    pub href: String,
}

/// Documents of one tool within one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridCell {
    pub tool: ToolId,
    pub links: Vec<DocLink>,
}

/// One step of the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridRow {
    /// 1-based step number
    pub number: usize,
    pub title: String,
    /// One cell per tool, in tool order
    pub cells: Vec<GridCell>,
}

/// The laid-out tutorial grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    pub tools: Vec<Tool>,
    pub rows: Vec<GridRow>,
}

impl Grid {
    /// All links in display order
    pub fn links(&self) -> impl Iterator<Item = &DocLink> {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter().flat_map(|cell| cell.links.iter()))
    }
}

pub struct TutorialOrchestrator<B: ProgressBackend, S: DocumentSource> {
    config: TutorialConfig,
    doc_type: DocType,
    store: ProgressStore<B>,
    source: S,
    renderer: MarkdownRenderer,
    completed: CompletionSet,
    state: NavState,
    viewer: Option<DocViewer>,
}

impl<B: ProgressBackend, S: DocumentSource> TutorialOrchestrator<B, S> {
    pub fn new(
        config: TutorialConfig,
        doc_type: DocType,
        store: ProgressStore<B>,
        source: S,
        renderer: MarkdownRenderer,
    ) -> Self {
        let completed = store.get_complete_docs();
        Self {
            config,
            doc_type,
            store,
            source,
            renderer,
            completed,
            state: NavState::Idle,
            viewer: None,
        }
    }

    pub fn config(&self) -> &TutorialConfig {
        &self.config
    }

    pub fn doc_type(&self) -> &DocType {
        &self.doc_type
    }

    /// Header metadata for the current tutorial, if configured
    pub fn tutorial(&self) -> Option<&Tutorial> {
        self.config.tree.tutorial(&self.doc_type)
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    pub fn completed(&self) -> &CompletionSet {
        &self.completed
    }

    pub fn progress(&self) -> Progress {
        self.completed.progress_in(&self.config.tree, &self.doc_type)
    }

    /// The open viewer, present exactly when the state is `DocOpen`
    pub fn viewer(&self) -> Option<&DocViewer> {
        self.viewer.as_ref()
    }

    /// Current navigation parameter as a query string
    pub fn query(&self) -> String {
        match &self.state {
            NavState::Idle => route::to_query(None),
            NavState::DocOpen(id) => route::to_query(Some(id)),
        }
    }

    /// Opens a document. Selecting while open replaces the open document.
    pub fn select(&mut self, id: DocumentId) {
        tracing::debug!(%id, "navigating to document");
        self.viewer = Some(DocViewer::open(
            id.clone(),
            &self.config,
            &self.source,
            &self.renderer,
        ));
        self.state = NavState::DocOpen(id);
    }

    /// Closes the viewer; a no-op when idle
    pub fn close(&mut self) {
        self.handle(ViewerEvent::Closed);
    }

    /// Sets navigation state from a query string
    pub fn apply_query(&mut self, query: &str) {
        match route::parse_query(query) {
            Some(id) if self.state == NavState::DocOpen(id.clone()) => {}
            Some(id) => self.select(id),
            None => self.close(),
        }
    }

    /// Marks the open document complete and returns to idle.
    ///
    /// Returns the updated set, or `None` when nothing is open or the open
    /// document is not in the tree. Nothing is written in either case.
    pub fn complete_open_doc(&mut self) -> Option<&CompletionSet> {
        let viewer = self.viewer.as_ref()?;
        if !self.config.tree.contains(viewer.id()) {
            tracing::debug!("not completing {}: not in the tree", viewer.id());
            return None;
        }
        let event = viewer.complete(&self.store);
        self.handle(event);
        Some(&self.completed)
    }

    fn handle(&mut self, event: ViewerEvent) {
        match event {
            ViewerEvent::Completed(set) => {
                self.completed = set;
            }
            ViewerEvent::Closed => {}
        }
        if self.state != NavState::Idle {
            tracing::debug!("closing document viewer");
        }
        self.viewer = None;
        self.state = NavState::Idle;
    }

    /// Lays out the grid: steps as rows, tools as columns
    pub fn grid(&self) -> Grid {
        let tools = self.config.tree.tools();
        let rows = self
            .config
            .tree
            .steps_for(&self.doc_type)
            .iter()
            .enumerate()
            .map(|(index, step)| GridRow {
                number: index + 1,
                title: step.title.clone(),
                cells: tools
                    .iter()
                    .map(|tool| GridCell {
                        tool: tool.id.clone(),
                        links: step
                            .docs_for(&tool.id)
                            .iter()
                            .map(|id| self.link(id))
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Grid {
            tools: tools.to_vec(),
            rows,
        }
    }

    fn link(&self, id: &DocumentId) -> DocLink {
        DocLink {
            id: id.clone(),
            title: self.config.titles.get_doc_title(id).to_string(),
            complete: self.completed.contains(id),
            href: route::to_query(Some(id)),
        }
    }
}
