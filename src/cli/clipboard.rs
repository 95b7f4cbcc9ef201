//! System clipboard and terminal notifications for the copy action

use anyhow::{Context, Result};

use super::Output;
use crate::render::{Clipboard, Notification, Notifier};

/// The desktop clipboard, opened on first use
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        if self.inner.is_none() {
            self.inner = Some(arboard::Clipboard::new().context("Clipboard is not available")?);
        }
        if let Some(clipboard) = self.inner.as_mut() {
            clipboard
                .set_text(text.to_string())
                .context("Failed to write to clipboard")?;
        }
        Ok(())
    }
}

/// Prints notifications as command output
pub struct PrintNotifier<'a> {
    output: &'a Output,
}

impl<'a> PrintNotifier<'a> {
    pub fn new(output: &'a Output) -> Self {
        Self { output }
    }
}

impl Notifier for PrintNotifier<'_> {
    fn success(&mut self, notification: Notification) {
        self.output.success(&notification.message);
    }
}
