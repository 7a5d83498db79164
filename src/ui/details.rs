//! Vehicle details popup.

use crate::app::App;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

/// Centered rectangle of at most `width` x `height` inside `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Render the details of the selected vehicle over `area`.
///
/// # Details
/// Shows year, price, description, image reference and every spec that
/// has a value. Renders nothing when no vehicle is selected.
pub fn render_details(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(vehicle) = app.selected_vehicle() else {
        return;
    };

    let label = Style::default().fg(Color::Cyan);
    let value = Style::default().fg(Color::White);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Ano: ", label),
            Span::styled(vehicle.year.to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("Preço: ", label),
            Span::styled(
                vehicle.format_price(&app.currency),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Imagem: ", label),
            Span::styled(vehicle.image_or_placeholder(), value),
        ]),
    ];

    if let Some(description) = &vehicle.description {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            description.as_str(),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }

    if let Some(specs) = &vehicle.specs {
        let entries = specs.entries();
        if !entries.is_empty() {
            lines.push(Line::from(""));
        }
        for (name, text) in entries {
            lines.push(Line::from(vec![
                Span::styled(format!("{}: ", name), label),
                Span::styled(text, value),
            ]));
        }
    }

    let popup = centered(area, 50, lines.len() as u16 + 2);
    Widget::render(Clear, popup, buf);

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(format!("{} (#{})", vehicle.title(), vehicle.id))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    Widget::render(paragraph, popup, buf);
}
