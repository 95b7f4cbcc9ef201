//! Loaded project state shared by the document commands

use anyhow::{bail, Context, Result};

use crate::domain::{CompletionSet, DocType, DocumentId, Progress, TutorialConfig};
use crate::render::MarkdownRenderer;
use crate::storage::{Catalog, FileBackend, Project};
use crate::tutorial::TutorialOrchestrator;

/// A project with its tree loaded and renderer configured
pub struct Session {
    project: Project,
    config: TutorialConfig,
    renderer: MarkdownRenderer,
}

impl Session {
    /// Opens the project in the current directory or a parent
    pub fn open() -> Result<Self> {
        let project = Project::open_current()?;
        let config = project.catalog().load_config()?;
        let renderer = MarkdownRenderer::new(project.config().render_options()?);

        tracing::debug!(root = %project.root().display(), "loaded tutorial project");

        Ok(Self {
            project,
            config,
            renderer,
        })
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn config(&self) -> &TutorialConfig {
        &self.config
    }

    pub fn renderer(&self) -> &MarkdownRenderer {
        &self.renderer
    }

    /// Resolves a tutorial name, falling back to the configured default
    pub fn doc_type(&self, name: Option<&str>) -> Result<DocType> {
        let doc_type = match name {
            Some(name) => DocType::new(name.trim()),
            None => self.project.config().project.default_tutorial.clone(),
        };

        if self.config.tree.tutorial(&doc_type).is_none() {
            let known: Vec<&str> = self.config.tree.tutorials().map(|(t, _)| t.as_str()).collect();
            bail!(
                "Unknown tutorial '{}' (available: {})",
                doc_type,
                if known.is_empty() { "none".to_string() } else { known.join(", ") }
            );
        }
        Ok(doc_type)
    }

    /// Parses a document ID and checks that the tree lists it
    pub fn known_document(&self, raw: &str) -> Result<DocumentId> {
        let id: DocumentId = raw.parse().context("Invalid document ID")?;
        if !self.config.tree.contains(&id) {
            bail!("Document '{}' is not part of any tutorial", id);
        }
        Ok(id)
    }

    /// The tutorial listing a document, with its progress
    pub fn tutorial_of(&self, id: &DocumentId, completed: &CompletionSet) -> Option<(DocType, Progress)> {
        self.config
            .tree
            .tutorials()
            .find(|(doc_type, _)| self.config.tree.documents_in(doc_type).any(|d| d == id))
            .map(|(doc_type, _)| (doc_type.clone(), completed.progress_in(&self.config.tree, doc_type)))
    }

    /// Builds a navigator over this project's progress file and documents
    pub fn into_orchestrator(self, doc_type: DocType) -> TutorialOrchestrator<FileBackend, Catalog> {
        TutorialOrchestrator::new(
            self.config,
            doc_type,
            self.project.progress_store(),
            self.project.catalog(),
            self.renderer,
        )
    }
}
