//! Catalog projection - builds the collapsible tree and per-endpoint state
//!
//! The view is addressed by `(category, endpoint)` position in the currently
//! rendered set, so it is always rebuilt as a whole and never patched.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};

use crate::catalog::params::{extract_parameters, split_template, Parameter};
use crate::catalog::sync::{initial_url, UrlSynchronizer};
use crate::models::{Category, HttpMethod};
use crate::network::content::{ExecuteError, ResponseContent};

/// Position of an endpoint in the rendered catalog
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EndpointKey {
    pub category: usize,
    pub endpoint: usize,
}

impl EndpointKey {
    pub fn new(category: usize, endpoint: usize) -> Self {
        EndpointKey { category, endpoint }
    }
}

/// One visible line of the tree
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeRow {
    Category(usize),
    Endpoint(EndpointKey),
}

/// Glyph shown next to well-known category names
pub fn category_icon(name: &str) -> &'static str {
    match name {
        "Downloader" => "📥",
        "Imagecreator" => "🖼",
        "Openai" => "🤖",
        "Random" => "🔀",
        "Search" => "🔍",
        "Stalker" => "👁",
        "Tools" => "🔧",
        "Orderkuota" => "💰",
        "AI Tools" => "🧠",
        _ => "📂",
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryNode {
    pub name: String,
    pub icon: &'static str,
    pub endpoint_count: usize,
    pub expanded: bool,
}

/// Result panel of an endpoint
#[derive(Clone, Debug, PartialEq)]
pub enum ResponsePanel {
    Loading,
    Success {
        status: u16,
        status_text: String,
        time_ms: u64,
        content: ResponseContent,
        received_at: DateTime<Local>,
    },
    Failed {
        message: String,
    },
}

impl ResponsePanel {
    pub fn status_label(&self) -> String {
        match self {
            ResponsePanel::Loading => String::from("Loading..."),
            ResponsePanel::Success { status, status_text, .. } => {
                format!("{} {}", status, status_text).trim_end().to_string()
            }
            ResponsePanel::Failed { .. } => String::from("Error"),
        }
    }

    /// Elapsed time display. Failures always show `0ms`.
    pub fn time_label(&self) -> String {
        match self {
            ResponsePanel::Loading => String::new(),
            ResponsePanel::Success { time_ms, .. } => format!("{}ms", time_ms),
            ResponsePanel::Failed { .. } => String::from("0ms"),
        }
    }

    pub fn text(&self) -> String {
        match self {
            ResponsePanel::Loading => String::new(),
            ResponsePanel::Success { content, .. } => content.to_text(),
            ResponsePanel::Failed { message } => format!("Error Occurred\n{}", message),
        }
    }
}

/// Outcome reported by the network layer for one execution
#[derive(Clone, Debug)]
pub enum ExecutionOutcome {
    Success {
        status: u16,
        status_text: String,
        time_ms: u64,
        content: ResponseContent,
    },
    Failure(ExecuteError),
}

/// Isolated UI state of one rendered endpoint
#[derive(Clone, Debug, PartialEq)]
pub struct EndpointState {
    pub name: String,
    pub desc: String,
    pub method: HttpMethod,
    /// Template base, shown as the endpoint's path
    pub path: String,
    pub template: String,
    pub status: String,
    pub expanded: bool,
    pub params: Vec<Parameter>,
    /// Current input values, parallel to `params`
    pub values: Vec<String>,
    sync: Option<UrlSynchronizer>,
    pub url: String,
    pub response: Option<ResponsePanel>,
    /// Latest-request slot; only the matching response is rendered
    pub pending: Option<u64>,
}

impl EndpointState {
    fn project(endpoint: &crate::models::Endpoint, origin: &str) -> Self {
        let template = endpoint.path.clone().unwrap_or_default();
        let (base, _) = split_template(&template);
        EndpointState {
            name: non_empty(endpoint.name.as_deref()).unwrap_or("Unnamed Endpoint").to_string(),
            desc: non_empty(endpoint.desc.as_deref()).unwrap_or("No description").to_string(),
            method: HttpMethod::parse(endpoint.method.as_deref()),
            path: base.to_string(),
            status: non_empty(endpoint.status.as_deref()).unwrap_or("ready").to_string(),
            expanded: false,
            params: Vec::new(),
            values: Vec::new(),
            sync: None,
            url: initial_url(origin, &template),
            template,
            response: None,
            pending: None,
        }
    }

    /// Second build phase: derive inputs from the template and freeze the URL base
    fn initialize_parameters(&mut self) {
        self.params = extract_parameters(&self.template);
        self.values = self.params.iter().map(|p| p.default_value.clone()).collect();
        if !self.params.is_empty() {
            self.synchronize();
        }
    }

    /// Recompute the request URL from the current inputs
    pub fn synchronize(&mut self) -> &str {
        let sync = self
            .sync
            .get_or_insert_with(|| UrlSynchronizer::freeze(&self.url));
        self.url = sync.synchronize(
            self.params
                .iter()
                .zip(self.values.iter())
                .map(|(p, v)| (p.name.as_str(), v.as_str())),
        );
        &self.url
    }

    pub fn has_parameters(&self) -> bool {
        !self.params.is_empty()
    }

    /// Mutable access to one input value
    pub fn value_mut(&mut self, index: usize) -> Option<&mut String> {
        self.values.get_mut(index)
    }

    /// Blank every input, hide the response and resynchronize
    pub fn clear(&mut self) {
        for value in &mut self.values {
            value.clear();
        }
        self.response = None;
        self.synchronize();
    }

    /// Enter the loading state for request `id`, superseding any earlier one
    pub fn begin_request(&mut self, id: u64) {
        self.pending = Some(id);
        self.response = Some(ResponsePanel::Loading);
    }

    /// Apply a finished execution. Returns false if `id` is no longer the latest.
    pub fn complete_request(&mut self, id: u64, outcome: ExecutionOutcome) -> bool {
        if self.pending != Some(id) {
            return false;
        }
        self.pending = None;
        self.response = Some(match outcome {
            ExecutionOutcome::Success { status, status_text, time_ms, content } => {
                ResponsePanel::Success {
                    status,
                    status_text,
                    time_ms,
                    content,
                    received_at: Local::now(),
                }
            }
            ExecutionOutcome::Failure(err) => ResponsePanel::Failed {
                message: crate::network::content::sanitize(&err.to_string()),
            },
        });
        true
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

/// The rendered (possibly filtered) catalog with all transient UI state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogView {
    pub categories: Vec<CategoryNode>,
    endpoints: BTreeMap<EndpointKey, EndpointState>,
}

impl CatalogView {
    /// Build the view in two phases: project the tree, then initialize parameters
    pub fn build(categories: &[Category], origin: &str) -> Self {
        let mut view = Self::project(categories, origin);
        view.initialize_parameters();
        view
    }

    fn project(categories: &[Category], origin: &str) -> Self {
        let mut view = CatalogView::default();
        for (ci, category) in categories.iter().enumerate() {
            let name = non_empty(category.name.as_deref()).unwrap_or("Unnamed Category");
            view.categories.push(CategoryNode {
                name: name.to_string(),
                icon: category_icon(category.name.as_deref().unwrap_or_default()),
                endpoint_count: category.items.len(),
                expanded: false,
            });
            for (ei, endpoint) in category.items.iter().enumerate() {
                view.endpoints
                    .insert(EndpointKey::new(ci, ei), EndpointState::project(endpoint, origin));
            }
        }
        view
    }

    fn initialize_parameters(&mut self) {
        for state in self.endpoints.values_mut() {
            state.initialize_parameters();
        }
    }

    /// True when there is nothing to render ("no data" placeholder)
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn endpoint(&self, key: EndpointKey) -> Option<&EndpointState> {
        self.endpoints.get(&key)
    }

    pub fn endpoint_mut(&mut self, key: EndpointKey) -> Option<&mut EndpointState> {
        self.endpoints.get_mut(&key)
    }

    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }

    /// Endpoints of one category, in order
    pub fn endpoints_in(&self, category: usize) -> impl Iterator<Item = (&EndpointKey, &EndpointState)> {
        self.endpoints
            .range(EndpointKey::new(category, 0)..EndpointKey::new(category + 1, 0))
    }

    pub fn toggle_category(&mut self, index: usize) {
        if let Some(node) = self.categories.get_mut(index) {
            node.expanded = !node.expanded;
        }
    }

    pub fn toggle_endpoint(&mut self, key: EndpointKey) {
        if let Some(state) = self.endpoints.get_mut(&key) {
            state.expanded = !state.expanded;
        }
    }

    /// Visible rows: every category, plus endpoints of expanded categories
    pub fn rows(&self) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        for (ci, node) in self.categories.iter().enumerate() {
            rows.push(TreeRow::Category(ci));
            if node.expanded {
                rows.extend(self.endpoints_in(ci).map(|(key, _)| TreeRow::Endpoint(*key)));
            }
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Endpoint;

    const ORIGIN: &str = "http://127.0.0.1:3000";

    fn openai() -> Vec<Category> {
        vec![Category::new(
            "Openai",
            vec![Endpoint::new("Image Generator", "/ai/image-generator?apikey=&prompt=")
                .with_desc("Generate AI Image from prompt")
                .with_method("GET")],
        )]
    }

    #[test]
    fn test_initial_render_is_collapsed() {
        let view = CatalogView::build(&openai(), ORIGIN);
        assert_eq!(view.rows(), vec![TreeRow::Category(0)]);
        assert_eq!(view.categories[0].icon, "🤖");
        assert_eq!(view.categories[0].endpoint_count, 1);
        assert!(!view.endpoint(EndpointKey::new(0, 0)).unwrap().expanded);
    }

    #[test]
    fn test_expand_and_edit_updates_url() {
        let mut view = CatalogView::build(&openai(), ORIGIN);
        let key = EndpointKey::new(0, 0);
        view.toggle_category(0);
        view.toggle_endpoint(key);
        assert_eq!(view.rows(), vec![TreeRow::Category(0), TreeRow::Endpoint(key)]);

        let state = view.endpoint_mut(key).unwrap();
        assert!(state.expanded);
        let names: Vec<_> = state.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["apikey", "prompt"]);
        assert_eq!(state.values, ["", ""]);
        assert!(state.url.ends_with("?apikey=&prompt="));

        state.value_mut(1).unwrap().push_str("hello");
        state.synchronize();
        assert!(state.url.ends_with("?apikey=&prompt=hello"));
    }

    #[test]
    fn test_toggles_are_local() {
        let categories = vec![Category::new(
            "Tools",
            vec![Endpoint::new("A", "/a"), Endpoint::new("B", "/b")],
        )];
        let mut view = CatalogView::build(&categories, ORIGIN);
        view.toggle_endpoint(EndpointKey::new(0, 0));
        assert!(view.endpoint(EndpointKey::new(0, 0)).unwrap().expanded);
        assert!(!view.endpoint(EndpointKey::new(0, 1)).unwrap().expanded);
        assert!(!view.categories[0].expanded);
        view.toggle_endpoint(EndpointKey::new(0, 0));
        assert!(!view.endpoint(EndpointKey::new(0, 0)).unwrap().expanded);
    }

    #[test]
    fn test_missing_fields_degrade() {
        let categories = vec![Category { name: None, items: vec![Endpoint::default()] }];
        let view = CatalogView::build(&categories, ORIGIN);
        assert_eq!(view.categories[0].name, "Unnamed Category");
        let state = view.endpoint(EndpointKey::new(0, 0)).unwrap();
        assert_eq!(state.name, "Unnamed Endpoint");
        assert_eq!(state.desc, "No description");
        assert_eq!(state.method, HttpMethod::GET);
        assert_eq!(state.status, "ready");
        assert!(!state.has_parameters());
        assert_eq!(state.url, ORIGIN);
    }

    #[test]
    fn test_empty_catalog() {
        let view = CatalogView::build(&[], ORIGIN);
        assert!(view.is_empty());
        assert!(view.rows().is_empty());
    }

    #[test]
    fn test_defaults_seed_inputs() {
        let categories = vec![Category::new("Search", vec![Endpoint::new("S", "/s?query=&limit=5")])];
        let view = CatalogView::build(&categories, ORIGIN);
        let state = view.endpoint(EndpointKey::new(0, 0)).unwrap();
        assert_eq!(state.values, ["", "5"]);
        assert_eq!(state.url, "http://127.0.0.1:3000/s?query=&limit=5");
    }

    #[test]
    fn test_clear_blanks_inputs_and_hides_response() {
        let mut view = CatalogView::build(&openai(), ORIGIN);
        let state = view.endpoint_mut(EndpointKey::new(0, 0)).unwrap();
        state.value_mut(0).unwrap().push_str("key");
        state.synchronize();
        state.begin_request(1);
        state.clear();
        assert!(state.response.is_none());
        assert!(state.url.ends_with("?apikey=&prompt="));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut view = CatalogView::build(&openai(), ORIGIN);
        let state = view.endpoint_mut(EndpointKey::new(0, 0)).unwrap();
        state.begin_request(1);
        state.begin_request(2);
        let stale = ExecutionOutcome::Failure(ExecuteError::Transport("late".into()));
        assert!(!state.complete_request(1, stale));
        assert_eq!(state.response, Some(ResponsePanel::Loading));

        let fresh = ExecutionOutcome::Success {
            status: 200,
            status_text: "OK".into(),
            time_ms: 12,
            content: ResponseContent::Text("hi".into()),
        };
        assert!(state.complete_request(2, fresh));
        let panel = state.response.as_ref().unwrap();
        assert_eq!(panel.status_label(), "200 OK");
        assert_eq!(panel.time_label(), "12ms");
        assert!(state.pending.is_none());
    }

    #[test]
    fn test_failure_panel_labels() {
        let panel = ResponsePanel::Failed { message: "bad".into() };
        assert_eq!(panel.status_label(), "Error");
        assert_eq!(panel.time_label(), "0ms");
        assert_eq!(ResponsePanel::Loading.status_label(), "Loading...");
    }
}
