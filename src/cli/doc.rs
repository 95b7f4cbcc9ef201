//! Single-document commands: show, complete, copy

use std::io::{self, IsTerminal};

use anyhow::{bail, Context, Result};

use super::clipboard::{PrintNotifier, SystemClipboard};
use super::present;
use super::session::Session;
use super::Output;
use crate::domain::DocumentId;
use crate::render::{Clipboard, CopyAction};
use crate::tutorial::{DocViewer, ViewerEvent};

fn open_viewer(session: &Session, raw_id: &str) -> Result<DocViewer> {
    let id: DocumentId = raw_id.parse().context("Invalid document ID")?;
    let catalog = session.project().catalog();
    Ok(DocViewer::open(id, session.config(), &catalog, session.renderer()))
}

/// Renders a document to the terminal
pub fn show(output: &Output, raw_id: &str) -> Result<()> {
    let session = Session::open()?;
    let viewer = open_viewer(&session, raw_id)?;
    let completed = session.project().progress_store().get_complete_docs();
    let complete = viewer.is_complete(&completed);

    if !viewer.is_found() {
        tracing::warn!(id = %viewer.id(), "no document body found");
    }

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": viewer.id(),
            "title": viewer.title(),
            "found": viewer.is_found(),
            "complete": complete,
            "content": viewer.content(),
        }));
        return Ok(());
    }

    let mut stdout = io::stdout();
    let ansi = stdout.is_terminal();

    let heading = if complete {
        format!("{} [complete]", viewer.title())
    } else {
        viewer.title().to_string()
    };
    println!("{}", heading);
    println!("{}", "─".repeat(heading.chars().count()));
    println!();

    present::print_lines(&mut stdout, &present::document_lines(viewer.content()), ansi)?;
    Ok(())
}

/// Marks a document complete
pub fn complete(output: &Output, raw_id: &str) -> Result<()> {
    let session = Session::open()?;
    let id = session.known_document(raw_id)?;
    let viewer = DocViewer::open(id, session.config(), &session.project().catalog(), session.renderer());

    let store = session.project().progress_store();
    let ViewerEvent::Completed(completed) = viewer.complete(&store) else {
        return Ok(());
    };
    let tutorial = session.tutorial_of(viewer.id(), &completed);

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": viewer.id(),
            "title": viewer.title(),
            "tutorial": tutorial.as_ref().map(|(doc_type, _)| doc_type),
            "progress": tutorial.as_ref().map(|(_, progress)| progress),
            "completed": completed,
        }));
    } else {
        match tutorial {
            Some((doc_type, progress)) => output.success(&format!(
                "Completed '{}' ({}: {}/{})",
                viewer.title(),
                doc_type,
                progress.completed,
                progress.total
            )),
            None => output.success(&format!("Completed '{}'", viewer.title())),
        }
    }

    Ok(())
}

/// Copies a filename-bearing code block of a document.
///
/// `block` is 1-based and counts only blocks with a filename header.
pub fn copy(output: &Output, raw_id: &str, block: Option<usize>, to_stdout: bool) -> Result<()> {
    let session = Session::open()?;
    let viewer = open_viewer(&session, raw_id)?;
    let headers = viewer.code_headers();

    if headers.is_empty() {
        bail!("Document '{}' has no code blocks with a filename", viewer.id());
    }

    let index = block.unwrap_or(1);
    let Some(header) = index.checked_sub(1).and_then(|i| headers.get(i)) else {
        bail!("Block {} out of range (1-{})", index, headers.len());
    };

    tracing::debug!(file = %header.filename, "copying code block");

    if to_stdout {
        println!("{}", header.copy.text);
        return Ok(());
    }

    copy_with(output, &header.copy, &mut SystemClipboard::new());
    Ok(())
}

/// Runs a copy action; a clipboard failure only warns
fn copy_with(output: &Output, copy: &CopyAction, clipboard: &mut dyn Clipboard) -> bool {
    let mut notifier = PrintNotifier::new(output);
    let copied = copy.perform(clipboard, &mut notifier);
    if !copied {
        output.warning("Could not write to the clipboard; try --stdout");
    }
    copied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    struct BrokenClipboard;

    impl Clipboard for BrokenClipboard {
        fn set_text(&mut self, _text: &str) -> Result<()> {
            bail!("no display")
        }
    }

    #[derive(Default)]
    struct MemoryClipboard(Option<String>);

    impl Clipboard for MemoryClipboard {
        fn set_text(&mut self, text: &str) -> Result<()> {
            self.0 = Some(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn clipboard_failure_is_not_an_error() {
        let output = Output::new(OutputFormat::Text);
        assert!(!copy_with(&output, &CopyAction::new("npm i"), &mut BrokenClipboard));
    }

    #[test]
    fn copy_writes_clipboard() {
        let output = Output::new(OutputFormat::Json);
        let mut clipboard = MemoryClipboard::default();

        assert!(copy_with(&output, &CopyAction::new("npm i"), &mut clipboard));
        assert_eq!(clipboard.0.as_deref(), Some("npm i"));
    }
}
