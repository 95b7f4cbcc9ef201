//! # Command-Line Interface
//!
//! User-facing commands, terminal rendering and the interactive viewer.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `init [path]` | Create `.tutor/` with a starter guide |
//! | `tutorials` | List tutorials with progress |
//! | `status [--tutorial t]` | Header, progress and step grid |
//! | `show <id>` | Render a document to the terminal |
//! | `complete <id>` | Mark a document complete |
//! | `copy <id> [--block n]` | Copy a code block with a filename header |
//! | `open [--tutorial t] [--id x \| --query q]` | Interactive viewer |
//!
//! ## Output Formats
//!
//! All commands support `--format`:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! The default comes from `default_format` in the global config.
//!
//! ## Logging
//!
//! Diagnostics go to stderr through `tracing`. `RUST_LOG` takes precedence;
//! otherwise `--verbose` enables debug output for this crate.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod clipboard;
mod doc;
mod output;
pub mod present;
mod query;
mod session;
mod tui;

pub use app::{run, Cli, Commands};
pub use clipboard::{PrintNotifier, SystemClipboard};
pub use output::{Output, OutputFormat};
