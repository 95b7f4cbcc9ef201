//! tutorial-kit - Multi-tool tutorials with markdown documents and progress
//!
//! A tutorial is a grid of steps (rows) by tools (columns); each cell lists
//! documents written in markdown. Documents render to a node tree with
//! alert boxes, external links, prefixed image paths and highlighted code
//! blocks with copy actions. Completed documents are tracked in a local
//! progress file and shown as checkmarks in the grid.

pub mod cli;
pub mod domain;
pub mod render;
pub mod storage;
pub mod tutorial;

pub use domain::{CompletionSet, DocTitleRegistry, DocTree, DocType, DocumentId, ToolId, TutorialConfig};
pub use render::{MarkdownRenderer, Node, RenderOptions};
pub use storage::{Project, ProgressStore};
pub use tutorial::{DocViewer, TutorialOrchestrator};
