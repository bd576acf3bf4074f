//! Catalog layer - parameter extraction, URL synchronization, rendering and search
//!
//! Everything here is pure data manipulation with no I/O, driven by the App layer.

pub mod loader;
pub mod params;
pub mod render;
pub mod search;
pub mod sync;

pub use loader::parse_settings;
pub use params::{extract_parameters, Parameter};
pub use render::{CatalogView, EndpointKey, EndpointState, ExecutionOutcome, ResponsePanel, TreeRow};
pub use search::{filter_catalog, SearchOutcome};
pub use sync::UrlSynchronizer;
