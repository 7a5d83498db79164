//! DGI Motors - terminal storefront for browsing vehicle listings.
//!
//! Main entry point and event loop for the application.

use anyhow::Context;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use dgi_motors::app::{App, UiMode};
use dgi_motors::config::Config;
use dgi_motors::logging;
use dgi_motors::ui::{self, AppLayout, grid};
use dgi_motors::vehicles::{DataSource, VehicleClient, catalog};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Main application entry point.
///
/// # Returns
/// * `Result<()>` - Success or error
///
/// # Details
/// Usage: `dgi-motors [CONFIG]` or `dgi-motors --init-config [CONFIG]`.
/// Loads configuration, starts logging, loads vehicles from the configured
/// source and runs the event loop.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let first = args.next();

    if first.as_deref() == Some("--init-config") {
        let path = match args.next() {
            Some(p) => PathBuf::from(p),
            None => Config::default_config_path()?,
        };
        Config::default().save(Some(&path))?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let config_path = first.map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?;
    let log_path = logging::init(&config)?;
    tracing::info!(log = %log_path.display(), source = ?config.source, "Starting DGI Motors");

    let mut app = App::new(&config);

    match &config.source {
        DataSource::Static => {
            app.set_vehicles(catalog::sample_vehicles());
            app.set_status(format!("{} veículos no catálogo", app.all_vehicles.len()));
        }
        DataSource::Remote { .. } => {
            let client = VehicleClient::from_config(&config)?;
            app.start_load(client);
        }
    }

    let mut terminal = setup_terminal()?;

    let result = run_app(&mut terminal, &mut app).await;

    restore_terminal(terminal.backend_mut())?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!("Exiting with error: {:#}", e);
    }
    tracing::info!("DGI Motors closed");
    result
}

/// Enter raw mode and the alternate screen.
///
/// # Details
/// If anything after `enable_raw_mode` fails, the terminal is restored
/// before the error is returned.
fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;

    let setup = || -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        Terminal::new(CrosstermBackend::new(stdout))
    };

    match setup() {
        Ok(terminal) => Ok(terminal),
        Err(e) => {
            if let Err(restore_err) = restore_terminal(&mut io::stdout()) {
                tracing::warn!("Failed to restore terminal: {}", restore_err);
            }
            Err(e).context("Failed to set up terminal")
        }
    }
}

/// Leave raw mode and the alternate screen.
fn restore_terminal<W: io::Write>(writer: &mut W) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(writer, LeaveAlternateScreen, DisableMouseCapture)
}

/// Main event loop.
///
/// # Arguments
/// * `terminal` - Terminal instance
/// * `app` - Application state
///
/// # Returns
/// * `Result<()>` - Success or error
///
/// # Details
/// Draws, applies a finished vehicle load, then handles at most one input
/// event. Polling with a timeout keeps the loop turning while a load runs.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    let mut layout = AppLayout::default();

    loop {
        terminal.draw(|f| {
            layout = ui::render(f, app);
        })?;
        app.set_grid_columns(grid::columns_for_width(layout.grid.width.saturating_sub(2)));

        app.poll_load().await;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if !handle_key_event(key, app) {
                        break;
                    }
                }
                Event::Mouse(mouse) => handle_mouse_event(mouse, app, &layout),
                _ => {}
            }
        }
    }

    Ok(())
}

/// Handle one key press.
///
/// # Returns
/// * `bool` - False when the application should quit
fn handle_key_event(key: KeyEvent, app: &mut App) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }

    match app.mode {
        UiMode::Browse => match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return false,
            KeyCode::Up | KeyCode::Char('k') => app.move_up(),
            KeyCode::Down | KeyCode::Char('j') => app.move_down(),
            KeyCode::Left | KeyCode::Char('h') => app.move_left(),
            KeyCode::Right | KeyCode::Char('l') => app.move_right(),
            KeyCode::Enter => app.open_details(),
            KeyCode::Char('f') | KeyCode::Char('/') => app.enter_filters(),
            KeyCode::Char('x') => app.clear_all_filters(),
            _ => {}
        },
        UiMode::Filters => match key.code {
            KeyCode::Esc | KeyCode::Enter => app.exit_filters(),
            KeyCode::Tab | KeyCode::Down => app.focus_next(),
            KeyCode::BackTab | KeyCode::Up => app.focus_previous(),
            KeyCode::Backspace => app.input_backspace(),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.clear_focused_input();
            }
            KeyCode::Char(c) => app.input_char(c),
            _ => {}
        },
        UiMode::Details => match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => app.close_details(),
            _ => {}
        },
    }

    true
}

/// Handle mouse events (scroll and click).
///
/// # Details
/// Scrolling moves the selection by rows; a left click on a card selects it.
fn handle_mouse_event(mouse: MouseEvent, app: &mut App, layout: &AppLayout) {
    if app.mode != UiMode::Browse {
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollUp => app.move_up(),
        MouseEventKind::ScrollDown => app.move_down(),
        MouseEventKind::Down(MouseButton::Left) => {
            let total = app.filtered_vehicles.len();
            let view = grid::GridView::new(layout.grid, total, app.selected_index);
            if let Some(index) = view.card_at(total, mouse.column, mouse.row) {
                app.select(index);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn static_app() -> App {
        let mut app = App::new(&Config::default());
        app.set_vehicles(catalog::sample_vehicles());
        app
    }

    #[test]
    fn test_restore_terminal_leaves_alternate_screen() {
        let mut out = Vec::new();
        restore_terminal(&mut out).unwrap();
        let written = String::from_utf8(out).unwrap();
        assert!(written.contains("\x1b[?1049l"));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = static_app();
        assert!(!handle_key_event(press(KeyCode::Char('q')), &mut app));
        assert!(!handle_key_event(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &mut app
        ));
    }

    #[test]
    fn test_typing_in_filter_mode_does_not_quit() {
        let mut app = static_app();
        assert!(handle_key_event(press(KeyCode::Char('f')), &mut app));
        assert_eq!(app.mode, UiMode::Filters);

        for ch in "toy".chars() {
            assert!(handle_key_event(press(KeyCode::Char(ch)), &mut app));
        }
        assert!(handle_key_event(press(KeyCode::Char('q')), &mut app));
        assert_eq!(app.criteria.brand.as_deref(), Some("toyq"));
        assert!(app.filtered_vehicles.is_empty());

        handle_key_event(press(KeyCode::Backspace), &mut app);
        assert_eq!(app.filtered_vehicles.len(), 1);

        handle_key_event(
            KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
            &mut app,
        );
        assert_eq!(app.criteria.brand, None);

        handle_key_event(press(KeyCode::Esc), &mut app);
        assert_eq!(app.mode, UiMode::Browse);
    }

    #[test]
    fn test_enter_opens_and_closes_details() {
        let mut app = static_app();
        handle_key_event(press(KeyCode::Right), &mut app);
        handle_key_event(press(KeyCode::Enter), &mut app);
        assert_eq!(app.mode, UiMode::Details);
        assert_eq!(app.selected_vehicle().map(|v| v.model.as_str()), Some("Civic"));
        handle_key_event(press(KeyCode::Esc), &mut app);
        assert_eq!(app.mode, UiMode::Browse);
    }

    #[test]
    fn test_click_selects_card() {
        let mut app = static_app();
        let layout = AppLayout::compute(ratatui::layout::Rect::new(0, 0, 140, 40), &app);
        app.set_grid_columns(grid::columns_for_width(layout.grid.width - 2));

        let view = grid::GridView::new(layout.grid, 4, 0);
        let target = view.card_rect(2).unwrap();
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: target.x + 2,
            row: target.y + 2,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse_event(click, &mut app, &layout);
        assert_eq!(app.selected_index, 2);
    }
}
