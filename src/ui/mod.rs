//! UI components module.
//!
//! Contains ratatui widgets for the storefront and the screen layout.

pub mod details;
pub mod filters;
pub mod grid;
pub mod header;

pub use details::render_details;
pub use filters::render_filters;
pub use grid::render_grid;
pub use header::render_header;

use crate::app::{App, UiMode};
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Below this width the filter panel stacks above the grid.
const SIDE_PANEL_MIN_WIDTH: u16 = 90;
/// Width of the filter panel when shown beside the grid.
const SIDE_PANEL_WIDTH: u16 = 34;

/// Screen areas of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppLayout {
    pub header: Rect,
    pub filters: Rect,
    pub grid: Rect,
    pub status: Rect,
}

impl AppLayout {
    /// Split the screen.
    ///
    /// # Details
    /// Wide terminals get the filter panel on the left of the grid; narrow
    /// ones get it stacked on top, one line per offered field.
    pub fn compute(area: Rect, app: &App) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Filters + grid
                Constraint::Length(3), // Status bar
            ])
            .split(area);

        let body = rows[1];
        let (filters, grid) = if body.width >= SIDE_PANEL_MIN_WIDTH {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(SIDE_PANEL_WIDTH), Constraint::Min(0)])
                .split(body);
            (columns[0], columns[1])
        } else {
            let panel_height = app.fields().len() as u16 + 2;
            let stacked = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(panel_height), Constraint::Min(0)])
                .split(body);
            (stacked[0], stacked[1])
        };

        Self {
            header: rows[0],
            filters,
            grid,
            status: rows[2],
        }
    }
}

/// Render the complete UI.
///
/// # Returns
/// * `AppLayout` - Areas used, for mouse hit-testing
pub fn render(f: &mut Frame, app: &App) -> AppLayout {
    let layout = AppLayout::compute(f.area(), app);
    let buf = f.buffer_mut();

    render_header(app, layout.header, buf);
    render_filters(app, layout.filters, buf);
    render_grid(app, layout.grid, buf);
    render_status(app, layout.status, buf);

    if app.mode == UiMode::Details {
        render_details(app, layout.grid, buf);
    }

    layout
}

fn key_hints(app: &App) -> String {
    match app.mode {
        UiMode::Browse => {
            let mut hints = String::from("'q' sair, setas mover, 'f' filtros, 'x' limpar filtros");
            if app.details_enabled {
                hints.push_str(", Enter detalhes");
            }
            hints
        }
        UiMode::Filters => "Tab/setas trocar campo, Ctrl-U apagar campo, Esc voltar".to_string(),
        UiMode::Details => "Esc ou Enter para voltar".to_string(),
    }
}

/// Render the status bar: last status message, or key hints.
pub fn render_status(app: &App, area: Rect, buf: &mut Buffer) {
    let text = match &app.status_message {
        Some(message) => format!("{}  |  {}", message, key_hints(app)),
        None => key_hints(app),
    };
    let status = Paragraph::new(Line::from(text))
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    Widget::render(status, area, buf);
}

/// Flatten a buffer to text, one line per row.
#[cfg(test)]
pub(crate) fn buffer_text(buf: &Buffer) -> String {
    let width = buf.area.width as usize;
    buf.content
        .chunks(width.max(1))
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
