//! Filters widget rendering.
//!
//! Displays one labelled input per offered filter field.

use crate::app::{App, UiMode};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Width reserved for field labels.
const LABEL_WIDTH: usize = 14;

/// Render the filters widget.
///
/// # Arguments
/// * `app` - Application state
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
///
/// # Details
/// Empty fields show their placeholder. The focused field is highlighted
/// while editing, and fields whose text was rejected are marked.
pub fn render_filters(app: &App, area: Rect, buf: &mut Buffer) {
    let is_active = app.mode == UiMode::Filters;
    let focused = app.focused_field();

    let lines: Vec<Line> = app
        .fields()
        .iter()
        .map(|field| {
            let is_focused = is_active && focused == Some(field);
            let text = app.inputs.text(field);

            let label_style = if is_focused {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Cyan)
            };

            let mut spans = vec![Span::styled(
                format!("{:<width$}", field.label(), width = LABEL_WIDTH),
                label_style,
            )];

            if text.is_empty() && !is_focused {
                spans.push(Span::styled(
                    field.placeholder(),
                    Style::default().fg(Color::DarkGray),
                ));
            } else {
                spans.push(Span::styled(
                    text.to_string(),
                    Style::default().fg(Color::White),
                ));
            }

            if is_focused {
                spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
            }

            if app.inputs.is_invalid(field) {
                spans.push(Span::styled(
                    " (inválido)",
                    Style::default().fg(Color::Red),
                ));
            }

            Line::from(spans)
        })
        .collect();

    let active = app.criteria.active_count(app.fields());
    let title = if is_active {
        "Filtros (editando - Esc para sair)".to_string()
    } else if active > 0 {
        format!("Filtros ({} ativos, 'f' editar)", active)
    } else {
        "Filtros ('f' editar)".to_string()
    };

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .style(if is_active {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            }),
    );

    Widget::render(paragraph, area, buf);
}
