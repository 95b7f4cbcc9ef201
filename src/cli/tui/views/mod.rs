//! Screen layouts

pub mod doc;
pub mod grid;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use super::app::{App, DOC_HELP, GRID_HELP};
use crate::storage::ProgressBackend;
use crate::tutorial::DocumentSource;

/// Bottom bar: a toast centered when one is visible, otherwise key hints
pub fn draw_status_bar<B: ProgressBackend, S: DocumentSource>(frame: &mut Frame, app: &App<B, S>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" tutor [{}] ", app.orchestrator().doc_type()));

    let paragraph = if let Some(toast) = app.toast().current() {
        Paragraph::new(toast.message.as_str())
            .style(Style::default().fg(Color::Black).bg(Color::Green))
            .alignment(Alignment::Center)
    } else {
        let hint = app.status_message().unwrap_or(if app.orchestrator().viewer().is_some() {
            DOC_HELP
        } else {
            GRID_HELP
        });
        Paragraph::new(hint)
    };

    frame.render_widget(paragraph.block(block), area);
}
