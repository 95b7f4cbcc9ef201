//! Domain models for tutorial-kit
//!
//! Contains the tutorial data model without any I/O concerns.

mod id;
mod progress;
mod titles;
mod tree;

pub use id::{DocumentId, IdError, ToolId};
pub use progress::{CompletionSet, Progress};
pub use titles::{DocTitleRegistry, FALLBACK_TITLE};
pub use tree::{DocTree, DocType, Step, Tool, TreeError, Tutorial, TutorialConfig};
