//! Application state management.
//!
//! Manages the vehicle list, filter form, selection, load state and UI mode.

use crate::config::Config;
use crate::filter::{FieldSet, Filter, FilterCriteria, FilterField};
use crate::input::FilterInputs;
use crate::vehicles::{CurrencyFormat, DataSource, LoadTask, VehicleClient, VehicleRecord};
use std::cmp;

/// Current UI mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    /// Browsing the card grid
    Browse,
    /// Editing the filter form
    Filters,
    /// Details of the selected vehicle
    Details,
}

/// Progress of the vehicle list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet
    Idle,
    /// Remote listing in flight
    Loading,
    /// List available with this many vehicles
    Loaded(usize),
    /// Remote listing failed; the list stays empty
    Failed(String),
}

/// Main application state.
#[derive(Debug)]
pub struct App {
    /// All vehicles from the data source
    pub all_vehicles: Vec<VehicleRecord>,
    /// Vehicles passing the current criteria, in source order
    pub filtered_vehicles: Vec<VehicleRecord>,
    /// Selected card index (in filtered_vehicles)
    pub selected_index: usize,
    /// Active criteria
    pub criteria: FilterCriteria,
    /// Raw text of the filter form
    pub inputs: FilterInputs,
    /// Index of the focused field within the enabled fields
    pub focused_field: usize,
    /// Current UI mode
    pub mode: UiMode,
    /// Where vehicles come from
    pub source: DataSource,
    /// Whether the details view is offered
    pub details_enabled: bool,
    /// Treat typed zero bounds as unset
    pub zero_disables_bounds: bool,
    /// Price rendering conventions
    pub currency: CurrencyFormat,
    /// Progress of the vehicle list
    pub load_state: LoadState,
    /// Status message to display
    pub status_message: Option<String>,
    /// Columns of the card grid at the last render
    pub grid_columns: usize,
    filter: Filter,
    load_task: Option<LoadTask>,
    load_generation: u64,
}

impl App {
    /// Create application state from configuration.
    ///
    /// # Details
    /// Starts with the configured default criteria and an empty list.
    pub fn new(config: &Config) -> Self {
        let criteria = config.default_filters.clone();
        Self {
            all_vehicles: Vec::new(),
            filtered_vehicles: Vec::new(),
            selected_index: 0,
            inputs: FilterInputs::from_criteria(&criteria, &config.currency),
            criteria,
            focused_field: 0,
            mode: UiMode::Browse,
            source: config.source.clone(),
            details_enabled: config.details_enabled(),
            zero_disables_bounds: config.zero_disables_bounds,
            currency: config.currency.clone(),
            load_state: LoadState::Idle,
            status_message: None,
            grid_columns: 1,
            filter: Filter::new(config.enabled_fields()),
            load_task: None,
            load_generation: 0,
        }
    }

    /// Filter fields offered in the form.
    pub fn fields(&self) -> &FieldSet {
        self.filter.fields()
    }

    /// Replace the vehicle list and apply current criteria.
    pub fn set_vehicles(&mut self, vehicles: Vec<VehicleRecord>) {
        self.load_state = LoadState::Loaded(vehicles.len());
        self.all_vehicles = vehicles;
        self.apply_filters();
    }

    /// Recompute the filtered list from the full list and criteria.
    pub fn apply_filters(&mut self) {
        self.filtered_vehicles = self.filter.apply(&self.all_vehicles, &self.criteria);
        self.selected_index = cmp::min(
            self.selected_index,
            self.filtered_vehicles.len().saturating_sub(1),
        );
        if self.filtered_vehicles.is_empty() && self.mode == UiMode::Details {
            self.mode = UiMode::Browse;
        }
    }

    /// Start the one-shot remote load.
    ///
    /// # Details
    /// Any load already in flight is dropped (and thereby aborted). Must be
    /// called from within a tokio runtime.
    pub fn start_load(&mut self, client: VehicleClient) {
        self.load_generation += 1;
        tracing::info!(generation = self.load_generation, endpoint = %client.endpoint(), "Starting vehicle load");
        self.load_task = Some(LoadTask::spawn(client, self.load_generation));
        self.load_state = LoadState::Loading;
        self.set_status("Carregando veículos...".to_string());
    }

    /// Whether a load is in flight.
    pub fn is_loading(&self) -> bool {
        self.load_task.is_some()
    }

    /// Apply the load result if the task has finished.
    ///
    /// # Returns
    /// * `bool` - True if a result was applied
    pub async fn poll_load(&mut self) -> bool {
        if !self.load_task.as_ref().is_some_and(LoadTask::is_finished) {
            return false;
        }
        let Some(mut task) = self.load_task.take() else {
            return false;
        };
        let result = task.join().await;
        self.finish_load(task.generation(), result)
    }

    /// Apply a finished load.
    ///
    /// # Arguments
    /// * `generation` - Token of the load that produced `result`
    /// * `result` - Vehicles or the failure
    ///
    /// # Returns
    /// * `bool` - False if the result belonged to a superseded load
    ///
    /// # Details
    /// A failure is logged and leaves the list empty.
    pub fn finish_load(&mut self, generation: u64, result: anyhow::Result<Vec<VehicleRecord>>) -> bool {
        if generation != self.load_generation {
            tracing::debug!(generation, current = self.load_generation, "Discarding stale vehicle load");
            return false;
        }

        match result {
            Ok(vehicles) => {
                let count = vehicles.len();
                self.set_vehicles(vehicles);
                if count == 0 {
                    self.set_status("Nenhum veículo disponível".to_string());
                } else {
                    self.set_status(format!("{} veículos carregados", count));
                }
            }
            Err(e) => {
                tracing::error!("Error fetching vehicles: {:#}", e);
                self.all_vehicles.clear();
                self.apply_filters();
                self.load_state = LoadState::Failed(e.to_string());
                self.set_status(format!("Erro ao carregar veículos: {}", e));
            }
        }
        true
    }

    /// Get the currently selected vehicle.
    pub fn selected_vehicle(&self) -> Option<&VehicleRecord> {
        self.filtered_vehicles.get(self.selected_index)
    }

    /// Record the column count of the rendered grid, for navigation.
    pub fn set_grid_columns(&mut self, columns: usize) {
        self.grid_columns = columns.max(1);
    }

    /// Previous card, wrapping to the last.
    pub fn move_left(&mut self) {
        let len = self.filtered_vehicles.len();
        if len == 0 {
            return;
        }
        self.selected_index = if self.selected_index == 0 {
            len - 1
        } else {
            self.selected_index - 1
        };
    }

    /// Next card, wrapping to the first.
    pub fn move_right(&mut self) {
        let len = self.filtered_vehicles.len();
        if len == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % len;
    }

    /// Card one row up; stays put on the first row.
    pub fn move_up(&mut self) {
        if self.selected_index >= self.grid_columns {
            self.selected_index -= self.grid_columns;
        }
    }

    /// Card one row down; on a partial last row, the last card.
    pub fn move_down(&mut self) {
        let len = self.filtered_vehicles.len();
        if len == 0 {
            return;
        }
        let target = self.selected_index + self.grid_columns;
        if target < len {
            self.selected_index = target;
        } else if self.selected_index / self.grid_columns < (len - 1) / self.grid_columns {
            self.selected_index = len - 1;
        }
    }

    /// Select a card by index if it exists.
    pub fn select(&mut self, index: usize) {
        if index < self.filtered_vehicles.len() {
            self.selected_index = index;
        }
    }

    /// The field under the form cursor.
    pub fn focused_field(&self) -> Option<FilterField> {
        self.fields().get(self.focused_field)
    }

    pub fn enter_filters(&mut self) {
        if self.fields().is_empty() {
            self.set_status("Nenhum filtro disponível".to_string());
            return;
        }
        self.focused_field = cmp::min(self.focused_field, self.fields().len() - 1);
        self.mode = UiMode::Filters;
    }

    pub fn exit_filters(&mut self) {
        self.mode = UiMode::Browse;
    }

    pub fn focus_next(&mut self) {
        let len = self.fields().len();
        if len > 0 {
            self.focused_field = (self.focused_field + 1) % len;
        }
    }

    pub fn focus_previous(&mut self) {
        let len = self.fields().len();
        if len > 0 {
            self.focused_field = (self.focused_field + len - 1) % len;
        }
    }

    /// Type a character into the focused field.
    pub fn input_char(&mut self, ch: char) {
        if let Some(field) = self.focused_field()
            && self.inputs.push(field, ch)
        {
            self.commit_input(field);
        }
    }

    /// Delete the last character of the focused field.
    pub fn input_backspace(&mut self) {
        if let Some(field) = self.focused_field()
            && self.inputs.pop(field)
        {
            self.commit_input(field);
        }
    }

    /// Empty the focused field.
    pub fn clear_focused_input(&mut self) {
        if let Some(field) = self.focused_field()
            && self.inputs.clear(field)
        {
            self.commit_input(field);
        }
    }

    /// Reset every criterion and the form.
    pub fn clear_all_filters(&mut self) {
        self.criteria.clear_all();
        self.inputs.clear_all();
        self.apply_filters();
        self.set_status("Filtros limpos".to_string());
    }

    fn commit_input(&mut self, field: FilterField) {
        self.inputs.apply_to(
            field,
            &mut self.criteria,
            self.zero_disables_bounds,
            &self.currency,
        );
        self.apply_filters();
    }

    /// Open the details view of the selected vehicle.
    pub fn open_details(&mut self) {
        if !self.details_enabled {
            return;
        }
        if self.selected_vehicle().is_some() {
            self.mode = UiMode::Details;
        }
    }

    pub fn close_details(&mut self) {
        self.mode = UiMode::Browse;
    }

    /// Set status message.
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicles::catalog::sample_vehicles;
    use httpmock::prelude::*;
    use std::time::Duration;

    fn static_app() -> App {
        let mut app = App::new(&Config::default());
        app.set_vehicles(sample_vehicles());
        app
    }

    fn type_into(app: &mut App, field: FilterField, text: &str) {
        app.enter_filters();
        let index = app
            .fields()
            .iter()
            .position(|f| f == field)
            .expect("field enabled");
        app.focused_field = index;
        for ch in text.chars() {
            app.input_char(ch);
        }
    }

    fn models(app: &App) -> Vec<&str> {
        app.filtered_vehicles.iter().map(|v| v.model.as_str()).collect()
    }

    async fn wait_for_load(app: &mut App) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !app.poll_load().await {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("load should finish");
    }

    #[test]
    fn test_app_new() {
        let app = App::new(&Config::default());
        assert!(app.all_vehicles.is_empty());
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.mode, UiMode::Browse);
        assert_eq!(app.load_state, LoadState::Idle);
        assert_eq!(app.fields(), &FieldSet::full());
    }

    #[test]
    fn test_app_set_vehicles() {
        let app = static_app();
        assert_eq!(app.all_vehicles.len(), 4);
        assert_eq!(app.filtered_vehicles, app.all_vehicles);
        assert_eq!(app.load_state, LoadState::Loaded(4));
    }

    #[test]
    fn test_app_default_filters_apply_on_load() {
        let config = Config {
            default_filters: FilterCriteria::default().with_brand("honda"),
            ..Config::default()
        };
        let mut app = App::new(&config);
        assert_eq!(app.inputs.text(FilterField::Brand), "honda");
        app.set_vehicles(sample_vehicles());
        assert_eq!(models(&app), vec!["Civic"]);
    }

    #[test]
    fn test_typing_narrows_results() {
        let mut app = static_app();
        type_into(&mut app, FilterField::Brand, "TOY");
        assert_eq!(app.criteria.brand.as_deref(), Some("TOY"));
        assert_eq!(models(&app), vec!["Corolla"]);

        app.input_backspace();
        app.input_backspace();
        app.input_backspace();
        assert_eq!(app.criteria.brand, None);
        assert_eq!(app.filtered_vehicles.len(), 4);
    }

    #[test]
    fn test_price_edit_keeps_order() {
        let mut app = static_app();
        type_into(&mut app, FilterField::MinPrice, "40000");
        assert_eq!(models(&app), vec!["Civic", "Mustang"]);
    }

    #[test]
    fn test_zero_input_follows_policy() {
        let mut app = static_app();
        type_into(&mut app, FilterField::MaxPrice, "0");
        assert_eq!(app.criteria.max_price, None);
        assert_eq!(app.filtered_vehicles.len(), 4);

        let config = Config {
            zero_disables_bounds: false,
            ..Config::default()
        };
        let mut literal = App::new(&config);
        literal.set_vehicles(sample_vehicles());
        type_into(&mut literal, FilterField::MaxPrice, "0");
        assert_eq!(literal.criteria.max_price, Some(0.0));
        assert!(literal.filtered_vehicles.is_empty());
    }

    #[test]
    fn test_invalid_numeric_input_is_unset() {
        let mut app = static_app();
        type_into(&mut app, FilterField::MinYear, "20-19");
        assert_eq!(app.criteria.min_year, None);
        assert!(app.inputs.is_invalid(FilterField::MinYear));
        assert_eq!(app.filtered_vehicles.len(), 4);
    }

    #[test]
    fn test_clear_all_filters() {
        let mut app = static_app();
        type_into(&mut app, FilterField::Model, "civic");
        assert_eq!(app.filtered_vehicles.len(), 1);
        app.clear_all_filters();
        assert!(app.criteria.is_unconstrained());
        assert_eq!(app.inputs.text(FilterField::Model), "");
        assert_eq!(app.filtered_vehicles.len(), 4);
    }

    #[test]
    fn test_focus_wraps_over_enabled_fields() {
        let config = Config {
            source: DataSource::remote("http://localhost:3001/veiculos"),
            ..Config::default()
        };
        let mut app = App::new(&config);
        app.enter_filters();
        assert_eq!(app.focused_field(), Some(FilterField::Model));
        app.focus_previous();
        assert_eq!(app.focused_field(), Some(FilterField::MaxPrice));
        app.focus_next();
        app.focus_next();
        assert_eq!(app.focused_field(), Some(FilterField::MinPrice));
    }

    #[test]
    fn test_grid_navigation() {
        let mut app = static_app();
        app.set_grid_columns(3);

        app.move_down();
        assert_eq!(app.selected_index, 3);
        app.move_down();
        assert_eq!(app.selected_index, 3);
        app.move_up();
        assert_eq!(app.selected_index, 0);
        app.move_up();
        assert_eq!(app.selected_index, 0);

        app.select(2);
        app.move_down();
        assert_eq!(app.selected_index, 3);

        app.move_right();
        assert_eq!(app.selected_index, 0);
        app.move_left();
        assert_eq!(app.selected_index, 3);
    }

    #[test]
    fn test_selection_clamped_after_filtering() {
        let mut app = static_app();
        app.select(3);
        type_into(&mut app, FilterField::Brand, "o");
        // Toyota, Honda, Ford, Volkswagen all contain "o"
        assert_eq!(app.selected_index, 3);
        app.input_char('r');
        assert_eq!(models(&app), vec!["Mustang"]);
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_details_only_when_enabled() {
        let mut app = static_app();
        app.open_details();
        assert_eq!(app.mode, UiMode::Details);
        app.close_details();

        let config = Config {
            show_details: Some(false),
            ..Config::default()
        };
        let mut plain = App::new(&config);
        plain.set_vehicles(sample_vehicles());
        plain.open_details();
        assert_eq!(plain.mode, UiMode::Browse);
    }

    #[test]
    fn test_stale_load_result_is_discarded() {
        let mut app = App::new(&Config::default());
        app.load_generation = 2;
        assert!(!app.finish_load(1, Ok(sample_vehicles())));
        assert!(app.all_vehicles.is_empty());
        assert!(app.finish_load(2, Ok(sample_vehicles())));
        assert_eq!(app.all_vehicles.len(), 4);
    }

    #[tokio::test]
    async fn test_remote_load_populates_list() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/veiculos");
                then.status(200).json_body(serde_json::json!([
                    {"id": 1, "brand": "Toyota", "model": "Corolla", "year": 2020, "price": 35000},
                    {"id": 2, "brand": "Honda", "model": "Civic", "year": 2018, "price": 45000}
                ]));
            })
            .await;

        let config = Config {
            source: DataSource::remote(server.url("/veiculos")),
            ..Config::default()
        };
        let mut app = App::new(&config);
        app.start_load(VehicleClient::from_config(&config).unwrap());
        assert_eq!(app.load_state, LoadState::Loading);

        wait_for_load(&mut app).await;
        assert!(!app.is_loading());
        assert_eq!(app.load_state, LoadState::Loaded(2));

        type_into(&mut app, FilterField::Model, "civ");
        assert_eq!(models(&app), vec!["Civic"]);
    }

    #[tokio::test]
    async fn test_remote_load_failure_leaves_list_empty() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/veiculos");
                then.status(503);
            })
            .await;

        let config = Config {
            source: DataSource::remote(server.url("/veiculos")),
            ..Config::default()
        };
        let mut app = App::new(&config);
        app.start_load(VehicleClient::from_config(&config).unwrap());
        wait_for_load(&mut app).await;

        assert!(app.all_vehicles.is_empty());
        assert!(app.filtered_vehicles.is_empty());
        assert!(matches!(app.load_state, LoadState::Failed(_)));
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_fails_open() {
        // Port 9 (discard) is closed on test machines.
        let client = VehicleClient::new("http://127.0.0.1:9/veiculos", Some(Duration::from_secs(2))).unwrap();
        let mut app = App::new(&Config::default());
        app.start_load(client);
        wait_for_load(&mut app).await;

        assert!(app.filtered_vehicles.is_empty());
        assert!(matches!(app.load_state, LoadState::Failed(_)));
    }

    #[tokio::test]
    async fn test_restarting_load_supersedes_previous() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/veiculos");
                then.status(200).json_body(serde_json::json!([
                    {"id": 1, "brand": "Fiat", "model": "Uno", "year": 2012, "price": 18500}
                ]));
            })
            .await;

        let client = VehicleClient::new(&server.url("/veiculos"), None).unwrap();
        let mut app = App::new(&Config::default());
        app.start_load(client.clone());
        app.start_load(client);
        assert_eq!(app.load_generation, 2);

        wait_for_load(&mut app).await;
        assert_eq!(app.all_vehicles.len(), 1);
    }
}
