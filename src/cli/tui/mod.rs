//! Interactive tutorial viewer
//!
//! Shows the step x tool grid with completion checkmarks; Enter opens a
//! document in an overlay where it can be scrolled, marked complete and
//! its code blocks copied.

mod app;
mod event;
mod toast;
mod ui;
mod utils;
mod views;

use std::panic::{self, AssertUnwindSafe};

use anyhow::{anyhow, Result};

use super::clipboard::SystemClipboard;
use crate::storage::{Catalog, FileBackend};
use crate::tutorial::TutorialOrchestrator;
use app::App;
use event::{EventHandler, TICK_RATE};

/// Launches the TUI over a prepared orchestrator
pub fn run(orchestrator: TutorialOrchestrator<FileBackend, Catalog>, toast_ticks: u32) -> Result<()> {
    tracing::debug!(tutorial = %orchestrator.doc_type(), "starting TUI");

    let mut app = App::new(orchestrator, Box::new(SystemClipboard::new()), toast_ticks);
    let mut terminal = ui::init_terminal()?;
    let events = EventHandler::new(TICK_RATE);

    // Restore the terminal even if drawing panics
    let result = panic::catch_unwind(AssertUnwindSafe(|| app.run(&mut terminal, events)));
    let restored = ui::restore_terminal();

    match result {
        Ok(inner) => {
            restored?;
            inner
        }
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown error".to_string());
            Err(anyhow!("TUI panicked: {}", message))
        }
    }
}
