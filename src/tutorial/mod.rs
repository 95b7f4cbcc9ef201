//! # Tutorial Navigation
//!
//! Composes the document tree, the progress store and the document viewer.
//!
//! - [`TutorialOrchestrator`] - Grid layout and `Idle`/`DocOpen` navigation
//! - [`DocViewer`] - One rendered document plus its completion action
//! - [`route`] - The `id` query parameter

mod orchestrator;
pub mod route;
mod viewer;

pub use orchestrator::{DocLink, Grid, GridCell, GridRow, NavState, TutorialOrchestrator};
pub use viewer::{DocViewer, DocumentSource, ViewerEvent};
