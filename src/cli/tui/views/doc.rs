//! Document overlay drawn above the grid

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::cli::present;
use crate::cli::tui::app::App;
use crate::cli::tui::utils::centered_rect;
use crate::storage::ProgressBackend;
use crate::tutorial::{DocViewer, DocumentSource};

pub fn draw<B: ProgressBackend, S: DocumentSource>(
    frame: &mut Frame,
    app: &App<B, S>,
    viewer: &DocViewer,
    area: Rect,
) {
    let area = centered_rect(90, 90, area);
    frame.render_widget(Clear, area);

    let complete = viewer.is_complete(app.orchestrator().completed());
    let mut title = vec![Span::styled(
        format!(" {} ", viewer.title()),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if complete {
        title.push(Span::styled("✓ complete ", Style::default().fg(Color::Green)));
    }

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(title));

    let headers = viewer.code_headers();
    if let Some(header) = headers.get(app.code_index()) {
        block = block.title_bottom(Line::from(format!(
            " {} {} ({}/{}) ",
            present::COPY_HINT,
            header.filename,
            app.code_index() + 1,
            headers.len()
        )));
    }

    let lines = if viewer.is_found() {
        present::document_lines(viewer.content())
    } else {
        vec![Line::styled(
            "No content for this document.",
            Style::default().fg(Color::DarkGray),
        )]
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll(), 0));

    frame.render_widget(paragraph, area);
}
