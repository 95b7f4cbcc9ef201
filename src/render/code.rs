//! Code fence annotations and the copy-to-clipboard action
//!
//! A fence info string is `language` or `language:filename`. Blocks with a
//! filename get a header carrying a [`CopyAction`]; performing it is a user
//! interaction, never part of rendering.

use anyhow::Result;
use serde::Serialize;

/// Message shown after a successful copy
pub const COPIED_MESSAGE: &str = "Copied to clipboard";

/// A fenced code block as written in the source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    pub language: Option<String>,
    pub filename: Option<String>,
    pub source: String,
}

impl CodeBlock {
    /// Builds a block from a fence info string and its raw contents
    pub fn from_fence(info: &str, source: impl Into<String>) -> Self {
        let (language, filename) = parse_info(info);
        Self {
            language,
            filename,
            source: source.into(),
        }
    }

    /// Source with a single trailing newline removed
    pub fn trimmed_source(&self) -> &str {
        self.source.strip_suffix('\n').unwrap_or(&self.source)
    }
}

/// Splits `language:filename`; the first whitespace-separated word only
fn parse_info(info: &str) -> (Option<String>, Option<String>) {
    let word = info.split_whitespace().next().unwrap_or_default();
    let (language, filename) = match word.split_once(':') {
        Some((lang, file)) => (lang, Some(file)),
        None => (word, None),
    };

    let language = Some(language.trim().to_string()).filter(|s| !s.is_empty());
    let filename = filename
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty());
    (language, filename)
}

/// Header bar above a highlighted block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeHeader {
    pub filename: String,
    pub copy: CopyAction,
}

/// Where a notification is anchored on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToastPosition {
    BottomCenter,
}

/// A transient success notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
    pub position: ToastPosition,
}

/// Destination for copied text
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// Receiver for transient notifications
pub trait Notifier {
    fn success(&mut self, notification: Notification);
}

/// Copies the raw source of a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyAction {
    /// Source with the trailing newline stripped
    pub text: String,
}

impl CopyAction {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Writes to the clipboard and notifies on success.
    ///
    /// A clipboard failure is logged and swallowed; no notification is
    /// emitted in that case. Returns whether the copy succeeded.
    pub fn perform(&self, clipboard: &mut dyn Clipboard, notifier: &mut dyn Notifier) -> bool {
        match clipboard.set_text(&self.text) {
            Ok(()) => {
                notifier.success(Notification {
                    message: COPIED_MESSAGE.to_string(),
                    position: ToastPosition::BottomCenter,
                });
                true
            }
            Err(e) => {
                tracing::debug!("clipboard write failed: {:#}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeClipboard {
        text: Option<String>,
        fail: bool,
    }

    impl Clipboard for FakeClipboard {
        fn set_text(&mut self, text: &str) -> Result<()> {
            if self.fail {
                anyhow::bail!("no clipboard");
            }
            self.text = Some(text.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct Toasts(Vec<Notification>);

    impl Notifier for Toasts {
        fn success(&mut self, notification: Notification) {
            self.0.push(notification);
        }
    }

    #[test]
    fn language_only() {
        let block = CodeBlock::from_fence("ts", "x");
        assert_eq!(block.language.as_deref(), Some("ts"));
        assert_eq!(block.filename, None);
    }

    #[test]
    fn language_and_filename() {
        let block = CodeBlock::from_fence("ts:app.ts", "x");
        assert_eq!(block.language.as_deref(), Some("ts"));
        assert_eq!(block.filename.as_deref(), Some("app.ts"));
    }

    #[test]
    fn filename_with_path_and_extra_words() {
        let block = CodeBlock::from_fence("tsx:pages/index.tsx title=x", "x");
        assert_eq!(block.filename.as_deref(), Some("pages/index.tsx"));
    }

    #[test]
    fn empty_parts_are_absent() {
        assert_eq!(CodeBlock::from_fence("", "x").language, None);

        let block = CodeBlock::from_fence(":app.ts", "x");
        assert_eq!(block.language, None);
        assert_eq!(block.filename.as_deref(), Some("app.ts"));

        assert_eq!(CodeBlock::from_fence("ts:", "x").filename, None);
    }

    #[test]
    fn trimmed_source_drops_one_newline() {
        let block = CodeBlock::from_fence("bash", "ls\n\n");
        assert_eq!(block.trimmed_source(), "ls\n");
    }

    #[test]
    fn copy_success_notifies() {
        let mut clipboard = FakeClipboard::default();
        let mut toasts = Toasts::default();

        let copied = CopyAction::new("npm i stripe").perform(&mut clipboard, &mut toasts);

        assert!(copied);
        assert_eq!(clipboard.text.as_deref(), Some("npm i stripe"));
        assert_eq!(toasts.0.len(), 1);
        assert_eq!(toasts.0[0].message, COPIED_MESSAGE);
        assert_eq!(toasts.0[0].position, ToastPosition::BottomCenter);
    }

    #[test]
    fn copy_failure_is_silent() {
        let mut clipboard = FakeClipboard {
            fail: true,
            ..Default::default()
        };
        let mut toasts = Toasts::default();

        let copied = CopyAction::new("x").perform(&mut clipboard, &mut toasts);

        assert!(!copied);
        assert!(toasts.0.is_empty());
    }
}
