//! The document tree: tutorials, their ordered steps and per-tool documents
//!
//! A tree is built once at startup and never mutated. Construction
//! validates the invariants the grid relies on:
//!
//! - Every document ID appears at most once across all tutorials
//! - Every tool referenced by a step is declared in the tool list
//!
//! Authoring order is preserved literally: steps, tools and the documents
//! inside a cell are never re-sorted.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{DocTitleRegistry, DocumentId, ToolId};

#[derive(Debug, Error, PartialEq)]
pub enum TreeError {
    #[error("Document '{0}' appears more than once in the tree")]
    DuplicateDocument(DocumentId),

    #[error("Tool '{0}' is declared more than once")]
    DuplicateTool(ToolId),

    #[error("Step '{step}' references undeclared tool '{tool}'")]
    UnknownTool { step: String, tool: ToolId },
}

/// Name of a tutorial type (e.g. `payments`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocType(String);

impl DocType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One tool column of the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    pub id: ToolId,
    pub title: String,
}

/// One row of the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub title: String,

    /// Documents per tool, in authored order. Tools without an entry
    /// render as an empty cell.
    #[serde(default)]
    pub tool: BTreeMap<ToolId, Vec<DocumentId>>,
}

impl Step {
    /// Documents for a tool, empty if the step has none
    pub fn docs_for(&self, tool: &ToolId) -> &[DocumentId] {
        self.tool.get(tool).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A tutorial type with its header metadata and steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tutorial {
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Usage scenarios shown under the header
    #[serde(default)]
    pub scenes: Vec<String>,

    #[serde(default)]
    pub video_url: Option<String>,

    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Immutable tree of tutorials
#[derive(Debug, Clone, PartialEq)]
pub struct DocTree {
    tools: Vec<Tool>,
    tutorials: BTreeMap<DocType, Tutorial>,
}

impl DocTree {
    /// Builds a tree, validating tool references and document uniqueness
    pub fn new(tools: Vec<Tool>, tutorials: BTreeMap<DocType, Tutorial>) -> Result<Self, TreeError> {
        let mut declared = HashSet::new();
        for tool in &tools {
            if !declared.insert(&tool.id) {
                return Err(TreeError::DuplicateTool(tool.id.clone()));
            }
        }

        let mut seen = HashSet::new();
        for tutorial in tutorials.values() {
            for step in &tutorial.steps {
                for (tool, docs) in &step.tool {
                    if !declared.contains(tool) {
                        return Err(TreeError::UnknownTool {
                            step: step.title.clone(),
                            tool: tool.clone(),
                        });
                    }
                    for id in docs {
                        if !seen.insert(id) {
                            return Err(TreeError::DuplicateDocument(id.clone()));
                        }
                    }
                }
            }
        }

        Ok(Self { tools, tutorials })
    }

    /// Tools in fixed display order
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn tutorial(&self, doc_type: &DocType) -> Option<&Tutorial> {
        self.tutorials.get(doc_type)
    }

    pub fn tutorials(&self) -> impl Iterator<Item = (&DocType, &Tutorial)> {
        self.tutorials.iter()
    }

    /// Steps configured for a tutorial type; empty for unknown types
    pub fn steps_for(&self, doc_type: &DocType) -> &[Step] {
        self.tutorials
            .get(doc_type)
            .map(|t| t.steps.as_slice())
            .unwrap_or(&[])
    }

    /// All documents of a tutorial in grid order (row by row, tool by tool)
    pub fn documents_in<'a>(&'a self, doc_type: &DocType) -> impl Iterator<Item = &'a DocumentId> + 'a {
        let steps = self.steps_for(doc_type);
        steps.iter().flat_map(move |step| {
            self.tools
                .iter()
                .flat_map(move |tool| step.docs_for(&tool.id).iter())
        })
    }

    /// Returns true if the ID is in any tutorial
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.tutorials
            .keys()
            .any(|doc_type| self.documents_in(doc_type).any(|d| d == id))
    }
}

/// Immutable configuration handed to the orchestrator at construction
#[derive(Debug, Clone, PartialEq)]
pub struct TutorialConfig {
    pub tree: DocTree,
    pub titles: DocTitleRegistry,
}

impl TutorialConfig {
    pub fn new(tree: DocTree, titles: DocTitleRegistry) -> Self {
        Self { tree, titles }
    }
}
