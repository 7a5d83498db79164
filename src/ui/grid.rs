//! Vehicle card grid rendering.
//!
//! Lays the filtered vehicles out as cards in a responsive grid and keeps
//! the selected card's row on screen.

use crate::app::{App, LoadState};
use crate::vehicles::VehicleRecord;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Card height including borders.
pub const CARD_HEIGHT: u16 = 7;

/// Number of card columns for a grid of the given width.
///
/// One column below 60 cells, two below 100, three otherwise.
pub fn columns_for_width(width: u16) -> usize {
    match width {
        0..60 => 1,
        60..100 => 2,
        _ => 3,
    }
}

/// Geometry of the visible part of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridView {
    /// Area inside the grid border
    pub inner: Rect,
    /// Cards per row
    pub columns: usize,
    /// Rows that fit on screen
    pub visible_rows: usize,
    /// First row on screen
    pub first_row: usize,
}

impl GridView {
    /// Compute what is on screen.
    ///
    /// # Arguments
    /// * `area` - Grid area including its border
    /// * `total` - Number of cards
    /// * `selected` - Selected card index
    ///
    /// # Details
    /// Scrolls so the selected row sits in the middle when possible,
    /// without scrolling past the last row.
    pub fn new(area: Rect, total: usize, selected: usize) -> Self {
        let inner = Rect {
            x: area.x.saturating_add(1),
            y: area.y.saturating_add(1),
            width: area.width.saturating_sub(2),
            height: area.height.saturating_sub(2),
        };
        let columns = columns_for_width(inner.width);
        let visible_rows = ((inner.height / CARD_HEIGHT) as usize).max(1);
        let total_rows = total.div_ceil(columns);
        let selected_row = selected / columns;

        let centered = selected_row.saturating_sub(visible_rows / 2);
        let max_first = total_rows.saturating_sub(visible_rows);

        Self {
            inner,
            columns,
            visible_rows,
            first_row: centered.min(max_first),
        }
    }

    fn card_width(&self) -> u16 {
        self.inner.width / self.columns as u16
    }

    /// Screen rectangle of card `index`, if it is visible.
    pub fn card_rect(&self, index: usize) -> Option<Rect> {
        let row = index / self.columns;
        if row < self.first_row || row >= self.first_row + self.visible_rows {
            return None;
        }
        let col = (index % self.columns) as u16;
        let y = self.inner.y + (row - self.first_row) as u16 * CARD_HEIGHT;
        let height = CARD_HEIGHT.min((self.inner.y + self.inner.height).saturating_sub(y));
        if height == 0 {
            return None;
        }
        Some(Rect {
            x: self.inner.x + col * self.card_width(),
            y,
            width: self.card_width(),
            height,
        })
    }

    /// Index of the card under a screen position.
    pub fn card_at(&self, total: usize, column: u16, row: u16) -> Option<usize> {
        let first = self.first_row * self.columns;
        let last = ((self.first_row + self.visible_rows) * self.columns).min(total);
        (first..last).find(|&index| {
            self.card_rect(index).is_some_and(|rect| {
                column >= rect.x
                    && column < rect.x + rect.width
                    && row >= rect.y
                    && row < rect.y + rect.height
            })
        })
    }
}

fn card_lines<'a>(app: &App, vehicle: &'a VehicleRecord) -> Vec<Line<'a>> {
    let mut lines = Vec::with_capacity(4);

    if app.fields().has_year() {
        lines.push(Line::from(Span::styled(
            vehicle.year.to_string(),
            Style::default().fg(Color::Gray),
        )));
    }

    lines.push(Line::from(Span::styled(
        vehicle.format_price(&app.currency),
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )));

    lines.push(Line::from(Span::styled(
        format!("Imagem: {}", vehicle.image_or_placeholder()),
        Style::default().fg(Color::DarkGray),
    )));

    if app.details_enabled {
        lines.push(Line::from(Span::styled(
            "[Enter] Ver Detalhes",
            Style::default().fg(Color::Blue),
        )));
    }

    lines
}

fn empty_message(app: &App) -> &'static str {
    match app.load_state {
        LoadState::Loading => "Carregando veículos...",
        LoadState::Failed(_) => "Não foi possível carregar os veículos",
        LoadState::Idle | LoadState::Loaded(_) => "Nenhum veículo encontrado",
    }
}

/// Render the card grid widget.
///
/// # Arguments
/// * `app` - Application state
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
///
/// # Details
/// Each card shows brand and model, the year when year filtering is
/// offered, the localized price, the image reference and, when enabled,
/// the details affordance. The selected card is highlighted.
pub fn render_grid(app: &App, area: Rect, buf: &mut Buffer) {
    let vehicles = &app.filtered_vehicles;
    let title = format!("Veículos ({}/{})", vehicles.len(), app.all_vehicles.len());
    let outer = Block::default().title(title).borders(Borders::ALL);

    if vehicles.is_empty() {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            empty_message(app),
            Style::default().fg(Color::Gray),
        )))
        .block(outer);
        Widget::render(paragraph, area, buf);
        return;
    }

    Widget::render(outer, area, buf);

    let selected = app.selected_index.min(vehicles.len() - 1);
    let view = GridView::new(area, vehicles.len(), selected);

    for (index, vehicle) in vehicles.iter().enumerate() {
        let Some(rect) = view.card_rect(index) else {
            continue;
        };
        let is_selected = index == selected;

        let border_style = if is_selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let title_style = Style::default()
            .fg(if is_selected { Color::Yellow } else { Color::White })
            .add_modifier(Modifier::BOLD);

        let card = Paragraph::new(card_lines(app, vehicle))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(Span::styled(vehicle.title(), title_style))
                    .borders(Borders::ALL)
                    .border_style(border_style),
            );
        Widget::render(card, rect, buf);
    }
}
