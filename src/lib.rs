//! # API Dock
//!
//! A terminal console for an API aggregation gateway, plus the gateway itself.
//!
//! ## Features
//! - Catalog loaded from the gateway's `/settings`, shown as a collapsible tree
//! - Parameter forms derived from each endpoint's path template
//! - Live request URL that follows every edit
//! - Execution with JSON highlighting, text and media handling
//! - Search across names, descriptions, paths, methods and categories
//! - Clipboard copy of URLs and responses
//! - Gateway server with a scrape-and-relay image generator
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod app;
pub mod catalog;
pub mod clipboard;
pub mod config;
pub mod constants;
pub mod gateway;
pub mod messages;
pub mod models;
pub mod network;
pub mod ui;

// Re-export commonly used types
pub use models::{Category, Endpoint, HttpMethod, Settings};
pub use catalog::{CatalogView, EndpointKey, UrlSynchronizer};
pub use messages::{UiEvent, NetworkCommand, NetworkResponse, RenderState};
pub use app::{AppState, AppActor, Toast, ToastKind};
pub use network::NetworkActor;
