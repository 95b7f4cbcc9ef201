//! # Storage Layer
//!
//! Persistence for tutorial-kit with plain, hand-editable file formats.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Tools, titles, tutorials | TOML | `.tutor/tree.toml` |
//! | Documents | Markdown | `.tutor/docs/{id}.md` |
//! | Progress | JSON array of IDs | `.tutor/progress.json` |
//! | Config | TOML | `.tutor/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - [`FileBackend`] locks with `fs2` and writes via temp file + rename
//! - [`ProgressStore`] serializes read-modify-write within a process;
//!   separate processes are last-write-wins
//!
//! ## Project Structure
//!
//! ```text
//! .tutor/
//! ├── docs/
//! │   └── stripe-account.md   # One markdown file per document
//! ├── tree.toml               # Tools, titles and tutorial steps
//! ├── progress.json           # Completed document IDs
//! ├── config.toml             # Project configuration
//! └── .gitignore              # Ignores progress
//! ```
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point for accessing a tutorial project
//! - [`Catalog`] - Reads the tree and document bodies
//! - [`ProgressStore`] - Completion set over a [`ProgressBackend`]
//! - [`Config`] - Project and global configuration

mod catalog;
mod config;
mod progress;
mod project;
mod scaffold;

pub use catalog::{parse_tree, Catalog};
pub use config::{BuildProfile, Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig, SiteConfig, ViewerConfig, PROFILE_ENV};
pub use progress::{FileBackend, MemoryBackend, ProgressBackend, ProgressStore, StoreError};
pub use project::{Project, ProjectError};
