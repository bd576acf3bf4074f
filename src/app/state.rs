//! App state - pure data structure with no I/O logic

use std::time::{Duration, Instant};

use crate::catalog::{CatalogView, EndpointKey, TreeRow};
use crate::constants::TOAST_TTL_MS;
use crate::messages::render::{EndpointView, ParamView, RowView};
use crate::messages::ui_events::{InputMode, Panel};
use crate::messages::RenderState;
use crate::models::{Category, Settings};
use crate::network::content::sanitize;

/// Kind of a transient notification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

/// Short-lived notification, auto-dismissed after `TOAST_TTL_MS`
#[derive(Clone, Debug)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub shown_at: Instant,
}

impl Toast {
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Toast {
            kind,
            message: sanitize(&message.into()),
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= Duration::from_millis(TOAST_TTL_MS)
    }
}

/// Main application state - pure data, no I/O
pub struct AppState {
    /// Gateway origin catalog paths are resolved against
    pub origin: String,

    // Settings header (categories live in `pristine`)
    pub settings: Settings,
    pub loading_settings: bool,
    pub settings_fallback: bool,

    /// Catalog as loaded; read-only after `apply_settings`
    pristine: Vec<Category>,
    /// Rendered, possibly filtered, view with all per-endpoint state
    pub view: CatalogView,

    // Search
    pub search_query: String,
    pub no_results: bool,

    // UI state
    pub selected_row: usize,
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub selected_param: usize,
    pub cursor_position: usize,
    pub response_scroll: u16,

    // Overlays
    pub toast: Option<Toast>,
    pub show_help: bool,

    pub next_request_id: u64,
}

impl AppState {
    pub fn new(origin: impl Into<String>) -> Self {
        AppState {
            origin: origin.into(),
            settings: Settings::default(),
            loading_settings: true,
            settings_fallback: false,
            pristine: Vec::new(),
            view: CatalogView::default(),
            search_query: String::new(),
            no_results: false,
            selected_row: 0,
            active_panel: Panel::Tree,
            input_mode: InputMode::Normal,
            selected_param: 0,
            cursor_position: 0,
            response_scroll: 0,
            toast: None,
            show_help: false,
            next_request_id: 1,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn pristine(&self) -> &[Category] {
        &self.pristine
    }

    pub(crate) fn set_pristine(&mut self, categories: Vec<Category>) {
        self.pristine = categories;
    }

    /// Row under the cursor
    pub fn selected_tree_row(&self) -> Option<TreeRow> {
        self.view.rows().get(self.selected_row).copied()
    }

    /// Endpoint under the cursor, if the cursor is on an endpoint row
    pub fn selected_key(&self) -> Option<EndpointKey> {
        match self.selected_tree_row()? {
            TreeRow::Endpoint(key) => Some(key),
            TreeRow::Category(_) => None,
        }
    }

    /// Current value of the parameter being edited
    pub fn current_input(&self) -> &str {
        self.selected_key()
            .and_then(|key| self.view.endpoint(key))
            .and_then(|state| state.values.get(self.selected_param))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        let rows = self
            .view
            .rows()
            .into_iter()
            .filter_map(|row| match row {
                TreeRow::Category(ci) => self.view.categories.get(ci).map(|node| RowView::Category {
                    name: node.name.clone(),
                    icon: node.icon,
                    count: node.endpoint_count,
                    expanded: node.expanded,
                }),
                TreeRow::Endpoint(key) => self.view.endpoint(key).map(|state| RowView::Endpoint {
                    method: state.method.clone(),
                    path: state.path.clone(),
                    name: state.name.clone(),
                    status: state.status.clone(),
                    expanded: state.expanded,
                    loading: state.pending.is_some(),
                }),
            })
            .collect();

        let selected = self.selected_key().and_then(|key| {
            self.view.endpoint(key).map(|state| EndpointView {
                key,
                name: state.name.clone(),
                desc: state.desc.clone(),
                method: state.method.clone(),
                path: state.path.clone(),
                status: state.status.clone(),
                expanded: state.expanded,
                params: state
                    .params
                    .iter()
                    .zip(state.values.iter())
                    .map(|(p, v)| ParamView {
                        name: p.name.clone(),
                        param_type: p.param_type,
                        description: p.description,
                        value: v.clone(),
                    })
                    .collect(),
                url: state.url.clone(),
                response: state.response.clone(),
            })
        });

        RenderState {
            title: self.settings.name.clone(),
            creator: self.settings.creator.clone(),
            description: self.settings.description.clone(),
            loading_settings: self.loading_settings,
            settings_fallback: self.settings_fallback,
            links: [
                ("WhatsApp", &self.settings.link_whatsapp),
                ("YouTube", &self.settings.link_youtube),
            ]
            .into_iter()
            .filter_map(|(label, link)| {
                link.as_deref()
                    .filter(|url| !url.is_empty())
                    .map(|url| (label, sanitize(url)))
            })
            .collect(),
            rows,
            selected_row: self.selected_row,
            selected,
            empty_placeholder: !self.loading_settings && self.pristine.is_empty(),
            search_query: self.search_query.clone(),
            no_results: self.no_results,
            active_panel: self.active_panel,
            input_mode: self.input_mode,
            selected_param: self.selected_param,
            cursor_position: self.cursor_position,
            response_scroll: self.response_scroll,
            toast: self.toast.clone(),
            show_help: self.show_help,
        }
    }
}
