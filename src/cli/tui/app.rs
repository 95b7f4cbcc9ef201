//! TUI application state and key handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;

use super::event::{Event, EventHandler};
use super::toast::Toast;
use super::ui::Terminal;
use super::views;
use crate::cli::present;
use crate::render::Clipboard;
use crate::storage::ProgressBackend;
use crate::tutorial::{DocLink, DocumentSource, NavState, TutorialOrchestrator};

const PAGE: i32 = 10;

pub const GRID_HELP: &str = "↑/↓ select  Enter open  q quit";
pub const DOC_HELP: &str = "Esc close  j/k scroll  c complete  y copy  Tab next block";

/// Application state
pub struct App<B: ProgressBackend, S: DocumentSource> {
    orchestrator: TutorialOrchestrator<B, S>,
    clipboard: Box<dyn Clipboard>,
    toast: Toast,

    /// Index into the grid's links in display order
    selected: usize,

    /// Viewer scroll offset in lines
    scroll: u16,

    /// Which filename-bearing code block `y` copies
    code_index: usize,

    /// One-shot message, cleared on the next key
    status_message: Option<String>,

    should_quit: bool,
}

impl<B: ProgressBackend, S: DocumentSource> App<B, S> {
    pub fn new(orchestrator: TutorialOrchestrator<B, S>, clipboard: Box<dyn Clipboard>, toast_ticks: u32) -> Self {
        let mut app = Self {
            orchestrator,
            clipboard,
            toast: Toast::new(toast_ticks),
            selected: 0,
            scroll: 0,
            code_index: 0,
            status_message: None,
            should_quit: false,
        };
        app.sync_selection();
        app
    }

    /// Runs the main loop until quit
    pub fn run(&mut self, terminal: &mut Terminal, events: EventHandler) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;

            match events.next()? {
                Event::Key(key) => self.handle_key(key),
                Event::Tick => self.toast.tick(),
                Event::Resize => {}
            }
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        let [main, status] =
            Layout::vertical([Constraint::Min(5), Constraint::Length(3)]).areas(frame.area());

        views::grid::draw(frame, self, main);
        if let Some(viewer) = self.orchestrator.viewer() {
            views::doc::draw(frame, self, viewer, main);
        }
        views::draw_status_bar(frame, self, status);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        self.status_message = None;
        if self.orchestrator.viewer().is_some() {
            self.handle_doc_key(key);
        } else {
            self.handle_grid_key(key);
        }
    }

    fn handle_grid_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => {
                self.move_selection(1)
            }
            KeyCode::Char('k') | KeyCode::Up | KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => {
                self.move_selection(-1)
            }
            KeyCode::Enter => self.open_selected(),
            KeyCode::Char('?') => self.status_message = Some(GRID_HELP.to_string()),
            _ => {}
        }
    }

    fn handle_doc_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => {
                self.orchestrator.close();
                self.scroll = 0;
            }
            KeyCode::Char('j') | KeyCode::Down => self.scroll_by(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_by(-1),
            KeyCode::PageDown | KeyCode::Char(' ') => self.scroll_by(PAGE),
            KeyCode::PageUp => self.scroll_by(-PAGE),
            KeyCode::Home | KeyCode::Char('g') => self.scroll = 0,
            KeyCode::Char('c') => self.complete_open(),
            KeyCode::Char('y') => self.copy_block(),
            KeyCode::Tab => self.next_code_block(),
            KeyCode::Char('?') => self.status_message = Some(DOC_HELP.to_string()),
            _ => {}
        }
    }

    fn link_count(&self) -> usize {
        self.orchestrator.grid().links().count()
    }

    fn move_selection(&mut self, delta: i32) {
        let count = self.link_count();
        if count == 0 {
            return;
        }
        let next = self.selected as i64 + i64::from(delta);
        self.selected = next.clamp(0, count as i64 - 1) as usize;
    }

    /// Points the selection at the open document, if it is in the grid
    fn sync_selection(&mut self) {
        if let NavState::DocOpen(id) = self.orchestrator.state() {
            if let Some(index) = self.orchestrator.grid().links().position(|link| &link.id == id) {
                self.selected = index;
            }
        }
    }

    pub fn selected_link(&self) -> Option<DocLink> {
        self.orchestrator.grid().links().nth(self.selected).cloned()
    }

    fn open_selected(&mut self) {
        if let Some(link) = self.selected_link() {
            self.orchestrator.select(link.id);
            self.scroll = 0;
            self.code_index = 0;
        }
    }

    fn scroll_by(&mut self, delta: i32) {
        let Some(viewer) = self.orchestrator.viewer() else {
            return;
        };
        let max = present::document_lines(viewer.content()).len().saturating_sub(1) as i64;
        let next = i64::from(self.scroll) + i64::from(delta);
        self.scroll = next.clamp(0, max.min(i64::from(u16::MAX))) as u16;
    }

    fn complete_open(&mut self) {
        let title = self.orchestrator.viewer().map(|v| v.title().to_string());
        let Some(title) = title else {
            return;
        };
        if self.orchestrator.complete_open_doc().is_some() {
            self.scroll = 0;
            self.status_message = Some(format!("Completed '{}'", title));
        } else {
            self.status_message = Some("This document is not part of the tutorial".to_string());
        }
    }

    fn next_code_block(&mut self) {
        let count = self
            .orchestrator
            .viewer()
            .map(|v| v.code_headers().len())
            .unwrap_or(0);
        if count > 0 {
            self.code_index = (self.code_index + 1) % count;
        }
    }

    fn copy_block(&mut self) {
        let action = self
            .orchestrator
            .viewer()
            .and_then(|v| v.code_headers().get(self.code_index).map(|h| h.copy.clone()));

        match action {
            Some(action) => {
                action.perform(self.clipboard.as_mut(), &mut self.toast);
            }
            None => self.status_message = Some("No code block to copy".to_string()),
        }
    }

    pub fn orchestrator(&self) -> &TutorialOrchestrator<B, S> {
        &self.orchestrator
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn code_index(&self) -> usize {
        self.code_index
    }

    pub fn toast(&self) -> &Toast {
        &self.toast
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocType, DocumentId};
    use crate::render::{MarkdownRenderer, COPIED_MESSAGE};
    use crate::storage::{parse_tree, MemoryBackend, ProgressStore};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    const TREE: &str = r#"
[[tools]]
id = "stripe"
title = "Stripe"

[[tools]]
id = "nextjs"
title = "Next.js"

[titles]
s-1 = "Create account"
n-1 = "Checkout"

[tutorials.payments]
title = "Payments"

[[tutorials.payments.steps]]
title = "Setup"
tool.stripe = ["s-1"]
tool.nextjs = ["n-1"]
"#;

    #[derive(Clone, Default)]
    struct FakeClipboard {
        text: Arc<Mutex<Option<String>>>,
        fail: bool,
    }

    impl Clipboard for FakeClipboard {
        fn set_text(&mut self, text: &str) -> Result<()> {
            if self.fail {
                anyhow::bail!("no clipboard");
            }
            *self.text.lock().unwrap() = Some(text.to_string());
            Ok(())
        }
    }

    type TestApp = App<MemoryBackend, HashMap<DocumentId, String>>;

    fn app_with(clipboard: FakeClipboard) -> TestApp {
        let docs: HashMap<DocumentId, String> = [
            ("s-1", "# Account\n\nSign up.\n"),
            ("n-1", "```ts:lib/checkout.ts\nconst a = 1;\n```\n\n```bash:terminal\nnpm i\n```\n"),
        ]
        .into_iter()
        .map(|(id, body)| (id.parse().unwrap(), body.to_string()))
        .collect();

        let orchestrator = TutorialOrchestrator::new(
            parse_tree(TREE).unwrap(),
            DocType::new("payments"),
            ProgressStore::new(MemoryBackend::new()),
            docs,
            MarkdownRenderer::default(),
        );
        App::new(orchestrator, Box::new(clipboard), 4)
    }

    fn press(app: &mut TestApp, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn enter_opens_selected_document() {
        let mut app = app_with(FakeClipboard::default());
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.orchestrator().state(), &NavState::DocOpen("n-1".parse().unwrap()));
        assert_eq!(app.orchestrator().query(), "?id=n-1");
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut app = app_with(FakeClipboard::default());
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected(), 0);
        for _ in 0..5 {
            press(&mut app, KeyCode::Down);
        }
        assert_eq!(app.selected(), 1);
    }

    #[test]
    fn escape_closes_viewer_without_quitting() {
        let mut app = app_with(FakeClipboard::default());
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.orchestrator().state(), &NavState::Idle);
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn complete_key_marks_and_closes() {
        let mut app = app_with(FakeClipboard::default());
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('c'));

        assert_eq!(app.orchestrator().state(), &NavState::Idle);
        assert_eq!(app.status_message(), Some("Completed 'Create account'"));
        assert!(app.selected_link().unwrap().complete);
    }

    #[test]
    fn complete_key_ignores_unknown_document() {
        let mut app = app_with(FakeClipboard::default());
        app.orchestrator.apply_query("?id=not-in-tree");
        press(&mut app, KeyCode::Char('c'));

        assert_eq!(app.orchestrator().state(), &NavState::DocOpen("not-in-tree".parse().unwrap()));
        assert!(app.orchestrator().completed().is_empty());
        assert_eq!(app.status_message(), Some("This document is not part of the tutorial"));
    }

    #[test]
    fn copy_key_writes_clipboard_and_shows_toast() {
        let clipboard = FakeClipboard::default();
        let mut app = app_with(clipboard.clone());
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Char('y'));
        assert_eq!(clipboard.text.lock().unwrap().as_deref(), Some("const a = 1;"));
        assert_eq!(app.toast().current().map(|n| n.message.as_str()), Some(COPIED_MESSAGE));

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(clipboard.text.lock().unwrap().as_deref(), Some("npm i"));
    }

    #[test]
    fn failed_copy_shows_no_toast() {
        let clipboard = FakeClipboard {
            fail: true,
            ..Default::default()
        };
        let mut app = app_with(clipboard);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('y'));

        assert!(app.toast().current().is_none());
        assert_eq!(app.orchestrator().state(), &NavState::DocOpen("n-1".parse().unwrap()));
    }

    #[test]
    fn ctrl_c_quits_from_viewer() {
        let mut app = app_with(FakeClipboard::default());
        press(&mut app, KeyCode::Enter);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn open_document_is_preselected() {
        let docs: HashMap<DocumentId, String> = HashMap::new();
        let mut orchestrator = TutorialOrchestrator::new(
            parse_tree(TREE).unwrap(),
            DocType::new("payments"),
            ProgressStore::new(MemoryBackend::new()),
            docs,
            MarkdownRenderer::default(),
        );
        orchestrator.apply_query("?id=n-1");

        let app = App::new(orchestrator, Box::new(FakeClipboard::default()), 4);
        assert_eq!(app.selected(), 1);
    }
}
