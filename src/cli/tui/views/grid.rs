//! Grid view: tutorial header, progress and the step x tool table

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, Wrap},
};

use crate::cli::tui::app::App;
use crate::cli::tui::utils::truncate_title;
use crate::storage::ProgressBackend;
use crate::tutorial::{DocLink, DocumentSource};

const STEP_COLUMN: u16 = 24;

pub fn draw<B: ProgressBackend, S: DocumentSource>(frame: &mut Frame, app: &App<B, S>, area: Rect) {
    let header = header_lines(app);
    let [header_area, progress_area, table_area] = Layout::vertical([
        Constraint::Length(header.len() as u16 + 2),
        Constraint::Length(3),
        Constraint::Min(4),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(header)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL)),
        header_area,
    );

    let progress = app.orchestrator().progress();
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Progress "))
        .gauge_style(Style::default().fg(Color::Green))
        .percent(u16::from(progress.percent()))
        .label(format!("{}/{}", progress.completed, progress.total));
    frame.render_widget(gauge, progress_area);

    draw_table(frame, app, table_area);
}

fn header_lines<B: ProgressBackend, S: DocumentSource>(app: &App<B, S>) -> Vec<Line<'static>> {
    let Some(tutorial) = app.orchestrator().tutorial() else {
        return vec![Line::from(app.orchestrator().doc_type().to_string())];
    };

    let mut lines = vec![Line::styled(
        tutorial.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if !tutorial.description.is_empty() {
        lines.push(Line::raw(tutorial.description.clone()));
    }
    if !tutorial.scenes.is_empty() {
        lines.push(Line::styled(
            format!("Scenes: {}", tutorial.scenes.join(" · ")),
            Style::default().fg(Color::Cyan),
        ));
    }
    if let Some(url) = &tutorial.video_url {
        lines.push(Line::styled(
            format!("Video: {}", url),
            Style::default().fg(Color::DarkGray),
        ));
    }
    lines
}

fn link_line(link: &DocLink, selected: bool, width: usize) -> Line<'static> {
    let (mark, mut style) = if link.complete {
        ("✓ ", Style::default().fg(Color::Green))
    } else {
        ("○ ", Style::default().fg(Color::DarkGray))
    };
    if selected {
        style = style.add_modifier(Modifier::REVERSED);
    }
    Line::styled(format!("{}{}", mark, truncate_title(&link.title, width.saturating_sub(2))), style)
}

fn draw_table<B: ProgressBackend, S: DocumentSource>(frame: &mut Frame, app: &App<B, S>, area: Rect) {
    let grid = app.orchestrator().grid();
    let columns = grid.tools.len().max(1);
    let cell_width = (area.width.saturating_sub(STEP_COLUMN + 2) as usize / columns).saturating_sub(1);

    let header = Row::new(
        std::iter::once(Cell::from("Step"))
            .chain(grid.tools.iter().map(|tool| Cell::from(tool.title.clone()))),
    )
    .style(Style::default().add_modifier(Modifier::BOLD))
    .bottom_margin(1);

    let mut index = 0;
    let rows: Vec<Row> = grid
        .rows
        .iter()
        .map(|row| {
            let height = row.cells.iter().map(|c| c.links.len()).max().unwrap_or(0).max(1);
            let step = Cell::from(Text::from(truncate_title(
                &format!("{}. {}", row.number, row.title),
                usize::from(STEP_COLUMN),
            )));
            let cells = row.cells.iter().map(|cell| {
                let lines: Vec<Line> = cell
                    .links
                    .iter()
                    .map(|link| {
                        let line = link_line(link, index == app.selected(), cell_width);
                        index += 1;
                        line
                    })
                    .collect();
                Cell::from(Text::from(lines))
            });
            let cells: Vec<Cell> = std::iter::once(step).chain(cells).collect();
            Row::new(cells).height(height as u16).bottom_margin(1)
        })
        .collect();

    let widths = std::iter::once(Constraint::Length(STEP_COLUMN))
        .chain(grid.tools.iter().map(|_| Constraint::Fill(1)));

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().borders(Borders::ALL).title(" Steps "));

    frame.render_widget(table, area);
}
