//! Render state - data structure sent from App layer to UI for rendering

use crate::app::state::Toast;
use crate::catalog::{EndpointKey, ResponsePanel};
use crate::messages::ui_events::{InputMode, Panel};
use crate::models::HttpMethod;

/// One visible line of the catalog tree
#[derive(Debug, Clone, PartialEq)]
pub enum RowView {
    Category {
        name: String,
        icon: &'static str,
        count: usize,
        expanded: bool,
    },
    Endpoint {
        method: HttpMethod,
        path: String,
        name: String,
        status: String,
        expanded: bool,
        loading: bool,
    },
}

/// One input field of the selected endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct ParamView {
    pub name: String,
    pub param_type: &'static str,
    pub description: &'static str,
    pub value: String,
}

/// Detail pane content for the endpoint under the cursor
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointView {
    pub key: EndpointKey,
    pub name: String,
    pub desc: String,
    pub method: HttpMethod,
    pub path: String,
    pub status: String,
    pub expanded: bool,
    pub params: Vec<ParamView>,
    pub url: String,
    pub response: Option<ResponsePanel>,
}

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    // Header
    pub title: String,
    pub creator: String,
    pub description: String,
    pub loading_settings: bool,
    pub settings_fallback: bool,
    /// Contact links as (label, url), only those the gateway provides
    pub links: Vec<(&'static str, String)>,

    // Catalog tree
    pub rows: Vec<RowView>,
    pub selected_row: usize,
    pub selected: Option<EndpointView>,
    /// Catalog has no data at all
    pub empty_placeholder: bool,

    // Search
    pub search_query: String,
    pub no_results: bool,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub selected_param: usize,
    pub cursor_position: usize,
    pub response_scroll: u16,

    // Overlays
    pub toast: Option<Toast>,
    pub show_help: bool,
}
