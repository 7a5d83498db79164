//! Header widget rendering.
//!
//! Shows the store name, where the vehicles come from and the result count.

use crate::app::{App, LoadState};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Store name shown in the header.
pub const STORE_NAME: &str = "DGI Motors";

/// Render the header widget.
///
/// # Arguments
/// * `app` - Application state
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
pub fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
    let count = match &app.load_state {
        LoadState::Loading => "carregando...".to_string(),
        LoadState::Failed(_) => "indisponível".to_string(),
        LoadState::Idle | LoadState::Loaded(_) => format!(
            "{} de {} veículos",
            app.filtered_vehicles.len(),
            app.all_vehicles.len()
        ),
    };

    let line = Line::from(vec![
        Span::styled(
            STORE_NAME,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  |  ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.source.describe(), Style::default().fg(Color::Gray)),
        Span::styled("  |  ", Style::default().fg(Color::DarkGray)),
        Span::styled(count, Style::default().fg(Color::Cyan)),
    ]);

    let paragraph = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    Widget::render(paragraph, area, buf);
}
