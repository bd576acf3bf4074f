//! Command handlers - business logic for processing UI events

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::app::state::{Toast, ToastKind};
use crate::app::AppState;
use crate::catalog::sync::resolve;
use crate::catalog::{filter_catalog, CatalogView, EndpointKey, ExecutionOutcome, SearchOutcome, TreeRow};
use crate::constants::SETTINGS_PATH;
use crate::messages::ui_events::{InputMode, Panel};
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::Settings;

impl AppState {
    // ========================
    // Settings
    // ========================

    /// Command fetching the catalog from the gateway
    pub fn settings_request(&self) -> NetworkCommand {
        NetworkCommand::LoadSettings {
            url: resolve(&self.origin, SETTINGS_PATH),
        }
    }

    /// Install freshly loaded settings and render the full catalog
    pub fn apply_settings(&mut self, mut settings: Settings, fallback: bool) {
        let categories = std::mem::take(&mut settings.categories);
        info!(
            categories = categories.len(),
            fallback, "Catalog loaded"
        );
        self.settings = settings;
        self.settings_fallback = fallback;
        self.loading_settings = false;
        self.set_pristine(categories);
        self.search_query.clear();
        self.rebuild_view();
    }

    /// Re-render from the pristine catalog using the current query
    fn rebuild_view(&mut self) {
        let (view, no_results) = match filter_catalog(self.pristine(), &self.search_query) {
            SearchOutcome::All(all) => (CatalogView::build(all, &self.origin), false),
            SearchOutcome::Matches(found) => (CatalogView::build(&found, &self.origin), false),
            SearchOutcome::NoResults => (CatalogView::default(), true),
        };
        debug!(
            query = %self.search_query,
            categories = view.categories.len(),
            endpoints = view.endpoint_count(),
            "Catalog rendered"
        );
        self.view = view;
        self.no_results = no_results;
        self.selected_row = 0;
        self.selected_param = 0;
        self.cursor_position = 0;
        self.response_scroll = 0;
        if self.input_mode == InputMode::Editing {
            self.input_mode = InputMode::Normal;
        }
    }

    // ========================
    // Navigation
    // ========================

    pub fn next_panel(&mut self) {
        self.active_panel = self.active_panel.next();
    }

    pub fn prev_panel(&mut self) {
        self.active_panel = self.active_panel.prev();
    }

    pub fn select_prev(&mut self) {
        if self.selected_row > 0 {
            self.selected_row -= 1;
            self.on_selection_changed();
        }
    }

    pub fn select_next(&mut self) {
        if self.selected_row + 1 < self.view.rows().len() {
            self.selected_row += 1;
            self.on_selection_changed();
        }
    }

    fn on_selection_changed(&mut self) {
        self.selected_param = 0;
        self.response_scroll = 0;
    }

    /// Expand or collapse the row under the cursor
    pub fn toggle_selected(&mut self) {
        match self.selected_tree_row() {
            Some(TreeRow::Category(index)) => self.view.toggle_category(index),
            Some(TreeRow::Endpoint(key)) => self.view.toggle_endpoint(key),
            None => {}
        }
    }

    // ========================
    // Parameter form
    // ========================

    fn param_count(&self) -> usize {
        self.selected_key()
            .and_then(|key| self.view.endpoint(key))
            .map(|state| state.params.len())
            .unwrap_or(0)
    }

    pub fn next_param(&mut self) {
        let count = self.param_count();
        if count > 0 {
            self.selected_param = (self.selected_param + 1) % count;
            self.cursor_position = self.current_input().len();
        }
    }

    pub fn prev_param(&mut self) {
        let count = self.param_count();
        if count > 0 {
            self.selected_param = self.selected_param.checked_sub(1).unwrap_or(count - 1);
            self.cursor_position = self.current_input().len();
        }
    }

    /// Edit the focused parameter. Only possible on an expanded endpoint with inputs.
    pub fn start_editing(&mut self) {
        let editable = self
            .selected_key()
            .and_then(|key| self.view.endpoint(key))
            .map(|state| state.expanded && state.has_parameters())
            .unwrap_or(false);
        if !editable {
            return;
        }
        self.selected_param = self.selected_param.min(self.param_count() - 1);
        self.active_panel = Panel::Params;
        self.input_mode = InputMode::Editing;
        self.cursor_position = self.current_input().len();
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn move_cursor_left(&mut self) {
        let input = self.current_input();
        if self.cursor_position > 0 {
            let new_pos = input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.cursor_position = new_pos;
        }
    }

    pub fn move_cursor_right(&mut self) {
        let input = self.current_input();
        if self.cursor_position < input.len() {
            let new_pos = input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(input.len());
            self.cursor_position = new_pos;
        }
    }

    pub fn enter_char(&mut self, c: char) {
        let cursor_pos = self.cursor_position;
        let Some(input) = self.current_input_mut() else {
            return;
        };
        if cursor_pos <= input.len() {
            input.insert(cursor_pos, c);
            self.cursor_position = cursor_pos + c.len_utf8();
            self.synchronize_selected();
        }
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let cursor_pos = self.cursor_position;
        let Some(input) = self.current_input_mut() else {
            return;
        };
        let prev_pos = input[..cursor_pos]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);
        input.remove(prev_pos);
        self.cursor_position = prev_pos;
        self.synchronize_selected();
    }

    fn current_input_mut(&mut self) -> Option<&mut String> {
        let key = self.selected_key()?;
        let index = self.selected_param;
        self.view.endpoint_mut(key)?.value_mut(index)
    }

    /// Every edit recomputes the endpoint's URL
    fn synchronize_selected(&mut self) {
        if let Some(state) = self.selected_key().and_then(|key| self.view.endpoint_mut(key)) {
            state.synchronize();
        }
    }

    // ========================
    // Endpoint actions
    // ========================

    /// Start executing the selected endpoint. An earlier in-flight call for the
    /// same endpoint is superseded, not cancelled.
    pub fn execute_selected(&mut self) -> Option<NetworkCommand> {
        let key = self.selected_key()?;
        let id = self.next_id();
        let state = self.view.endpoint_mut(key)?;
        state.expanded = true;
        let url = state.synchronize().to_string();
        state.begin_request(id);
        self.response_scroll = 0;
        info!(id, method = state.method.as_str(), %url, "Executing endpoint");

        Some(NetworkCommand::ExecuteRequest {
            id,
            key,
            method: state.method.clone(),
            url,
        })
    }

    /// Blank the selected endpoint's inputs and hide its response
    pub fn clear_selected(&mut self) {
        let Some(state) = self.selected_key().and_then(|key| self.view.endpoint_mut(key)) else {
            return;
        };
        state.clear();
        self.cursor_position = 0;
        self.response_scroll = 0;
        self.notify(ToastKind::Info, "Form cleared");
    }

    /// Synchronized URL of the selected endpoint
    pub fn url_to_copy(&mut self) -> Option<String> {
        let key = self.selected_key()?;
        let state = self.view.endpoint_mut(key)?;
        Some(state.synchronize().to_string())
    }

    /// Displayed response text of the selected endpoint
    pub fn response_to_copy(&self) -> Option<String> {
        let key = self.selected_key()?;
        let panel = self.view.endpoint(key)?.response.as_ref()?;
        let text = panel.text();
        (!text.is_empty()).then_some(text)
    }

    // ========================
    // Response handling
    // ========================

    pub fn handle_response(&mut self, response: NetworkResponse) {
        match response {
            NetworkResponse::SettingsLoaded { settings, fallback } => {
                self.apply_settings(settings, fallback);
            }
            NetworkResponse::Success { id, key, status, status_text, content, time_ms } => {
                let outcome = ExecutionOutcome::Success { status, status_text, time_ms, content };
                if self.complete(id, key, outcome) {
                    self.notify(ToastKind::Success, "Request successful!");
                }
            }
            NetworkResponse::Error { id, key, error } => {
                let message = error.to_string();
                if self.complete(id, key, ExecutionOutcome::Failure(error)) {
                    warn!(id, error = %message, "Request failed");
                    self.notify(ToastKind::Error, format!("Request failed: {}", message));
                }
            }
        }
    }

    /// Hand a finished execution to its endpoint if that endpoint is still waiting for it
    fn complete(&mut self, id: u64, key: EndpointKey, outcome: ExecutionOutcome) -> bool {
        let completed = self
            .view
            .endpoint_mut(key)
            .is_some_and(|state| state.complete_request(id, outcome));
        if !completed {
            debug!(id, ?key, "Discarding stale response");
        }
        completed
    }

    // ========================
    // Search
    // ========================

    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Search;
    }

    pub fn stop_search(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn search_char(&mut self, c: char) {
        self.search_query.push(c);
        self.rebuild_view();
    }

    pub fn search_backspace(&mut self) {
        if self.search_query.pop().is_some() {
            self.rebuild_view();
        }
    }

    pub fn clear_search(&mut self) {
        self.search_query.clear();
        self.rebuild_view();
    }

    // ========================
    // Response scrolling
    // ========================

    pub fn scroll_up(&mut self) {
        self.response_scroll = self.response_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.response_scroll = self.response_scroll.saturating_add(1);
    }

    // ========================
    // Toasts and help
    // ========================

    /// Show a toast, replacing any current one
    pub fn notify(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.toast = Some(Toast::new(kind, message));
    }

    /// Drop an expired toast. Returns true when something changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }
}
